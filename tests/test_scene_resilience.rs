// tests/test_scene_resilience.rs
// Scene setup against a backend that rejects some calls
// Verifies the flat-terrain fallback, recorded diagnostics and fatal DEM failures
//
// RELEVANT FILES: src/scene/configurator.rs, src/scene/diagnostics.rs, src/backend.rs

use std::cell::RefCell;
use std::rc::Rc;

use mapscene::camera::CameraError;
use mapscene::style::{GeoJsonData, Layer, Source, StyleImage, StyleResult, Terrain};
use mapscene::{
    FreeCameraOptions, HeadlessMap, MapBackend, SceneConfig, SceneConfigurator, SceneError,
    SetupStep, StaticBundle, StyleError, TerrainStatus,
};

/// Headless map that fails selected calls.
#[derive(Default)]
struct FlakyMap {
    inner: HeadlessMap,
    fail_terrain: bool,
    fail_sources: bool,
    fail_layers: bool,
}

impl MapBackend for FlakyMap {
    fn style_uri(&self) -> Option<&str> {
        self.inner.style_uri()
    }

    fn add_source(&mut self, id: &str, source: Source) -> StyleResult<()> {
        if self.fail_sources {
            return Err(StyleError::Invalid(format!("source {id} rejected")));
        }
        self.inner.add_source(id, source)
    }

    fn remove_source(&mut self, id: &str) -> StyleResult<()> {
        self.inner.remove_source(id)
    }

    fn source_exists(&self, id: &str) -> bool {
        self.inner.source_exists(id)
    }

    fn source(&self, id: &str) -> Option<Source> {
        self.inner.source(id)
    }

    fn update_geojson_source(&mut self, id: &str, data: GeoJsonData) -> StyleResult<()> {
        if self.fail_sources {
            return Err(StyleError::Invalid(format!("source {id} rejected")));
        }
        self.inner.update_geojson_source(id, data)
    }

    fn add_layer(&mut self, layer: Layer) -> StyleResult<()> {
        if self.fail_layers {
            return Err(StyleError::Invalid(format!("layer {} rejected", layer.id())));
        }
        self.inner.add_layer(layer)
    }

    fn layer_exists(&self, id: &str) -> bool {
        self.inner.layer_exists(id)
    }

    fn set_paint_property(
        &mut self,
        layer_id: &str,
        name: &str,
        value: serde_json::Value,
    ) -> StyleResult<()> {
        if self.fail_layers {
            return Err(StyleError::Invalid(format!("layer {layer_id} rejected")));
        }
        self.inner.set_paint_property(layer_id, name, value)
    }

    fn set_terrain(&mut self, terrain: Option<Terrain>) -> StyleResult<()> {
        if self.fail_terrain {
            return Err(StyleError::Invalid("terrain unsupported".to_string()));
        }
        self.inner.set_terrain(terrain)
    }

    fn terrain(&self) -> Option<Terrain> {
        self.inner.terrain()
    }

    fn add_image(&mut self, id: &str, image: StyleImage) -> StyleResult<()> {
        self.inner.add_image(id, image)
    }

    fn image_exists(&self, id: &str) -> bool {
        self.inner.image_exists(id)
    }

    fn add_style_model(&mut self, model_id: &str, uri: &str) -> StyleResult<()> {
        self.inner.add_style_model(model_id, uri)
    }

    fn style_model_exists(&self, model_id: &str) -> bool {
        self.inner.style_model_exists(model_id)
    }

    fn free_camera_options(&self) -> FreeCameraOptions {
        self.inner.free_camera_options()
    }

    fn set_free_camera_options(&mut self, options: FreeCameraOptions) -> Result<(), CameraError> {
        self.inner.set_free_camera_options(options)
    }
}

fn flaky(configure: impl FnOnce(&mut FlakyMap)) -> Rc<RefCell<FlakyMap>> {
    let mut map = FlakyMap::default();
    map.inner
        .load_style("mapbox://styles/mapbox/satellite-streets-v12")
        .unwrap();
    configure(&mut map);
    Rc::new(RefCell::new(map))
}

fn configurator(map: &Rc<RefCell<FlakyMap>>) -> SceneConfigurator<FlakyMap> {
    let assets = StaticBundle::new().with_resource("A320", "glb", "asset://A320.glb");
    let mut scene = SceneConfigurator::new(SceneConfig::default(), assets);
    scene.map_loaded(map);
    scene
}

#[test]
fn terrain_failure_leaves_flat_terrain_and_diagnostic() {
    let map = flaky(|m| m.fail_terrain = true);
    let mut scene = configurator(&map);

    let report = scene.setup().unwrap();
    assert_eq!(report.terrain, Some(TerrainStatus::Flat));
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].step, SetupStep::TerrainExaggeration);
    assert!(map.borrow().source_exists("mapbox-dem"));
    assert!(map.borrow().terrain().is_none());

    // camera and model steps still ran
    assert!(report.camera.is_some());
    assert_eq!(report.model_placed, Some(true));
}

#[test]
fn dem_source_failure_aborts_setup() {
    let map = flaky(|m| m.fail_sources = true);
    let mut scene = configurator(&map);

    let err = scene.setup().unwrap_err();
    assert!(matches!(err, SceneError::Style(StyleError::Invalid(_))));
    assert_eq!(map.borrow().inner.camera_commits(), 0);
    assert!(scene.diagnostics().has_step(SetupStep::TerrainSource));
}

#[test]
fn layer_failures_are_recorded_not_fatal() {
    let map = flaky(|m| m.fail_layers = true);
    let mut config = SceneConfig::default();
    config.marker.enabled = true;
    let assets = StaticBundle::new()
        .with_resource("A320", "glb", "asset://A320.glb")
        .with_image("pin", StyleImage::solid(4, [255, 0, 0, 255]));
    let mut scene = SceneConfigurator::new(config, assets);
    scene.map_loaded(&map);

    let report = scene.setup().unwrap();
    assert_eq!(report.model_placed, Some(false));
    assert_eq!(report.marker_placed, Some(false));
    let steps: Vec<SetupStep> = report.diagnostics.iter().map(|d| d.step).collect();
    assert_eq!(steps, vec![SetupStep::ModelLayer, SetupStep::MarkerLayer]);
    assert!(map.borrow().inner.rendered_models(12.0).is_empty());
}

#[test]
fn missing_asset_yields_diagnostic_and_no_rendered_model() {
    let map = flaky(|_| {});
    let mut scene = SceneConfigurator::new(SceneConfig::default(), StaticBundle::new());
    scene.map_loaded(&map);

    let report = scene.setup().unwrap();
    assert_eq!(report.model_placed, Some(false));
    assert!(report
        .diagnostics
        .iter()
        .any(|d| d.step == SetupStep::ModelAsset && d.message.contains("A320.glb")));
    assert!(map.borrow().inner.rendered_models(12.0).is_empty());

    // a later run records the miss again and forgets the earlier run
    let again = scene.setup().unwrap();
    assert_eq!(again.diagnostics.len(), 1);
    assert_eq!(scene.diagnostics().len(), 1);
    assert_eq!(scene.diagnostics().entries(), again.diagnostics.as_slice());
}

#[test]
fn camera_failure_is_recorded_by_setup() {
    let map = flaky(|_| {});
    let mut config = SceneConfig::default();
    config.camera.pitch = 90.0;
    let mut scene = SceneConfigurator::new(config, StaticBundle::new());
    scene.map_loaded(&map);

    let report = scene.setup().unwrap();
    assert!(report.camera.is_none());
    assert!(report.diagnostics.iter().any(|d| d.step == SetupStep::CameraPose));
}
