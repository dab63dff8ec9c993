//! Headless in-memory map backend.
//!
//! Holds a style document and camera state exactly as a renderer would, without
//! drawing anything. Used by the CLI and by tests to observe what scene setup
//! asked the renderer to do.

pub mod view;

use serde::Serialize;

use crate::backend::MapBackend;
use crate::camera::{CameraError, CameraOptions, FreeCameraOptions};
use crate::geo::LngLat;
use crate::style::{
    EvalContext, GeoJsonData, Layer, RasterLayer, RasterSource, Source, StyleDocument,
    StyleImage, StyleResult, Terrain,
};

pub use view::{MapView, SharedMap};

/// Source and layer id of the imagery base map.
pub const SATELLITE_SOURCE_ID: &str = "satellite";
pub const SATELLITE_TILES_URL: &str = "mapbox://mapbox.satellite";

/// A model the renderer would draw: one per feature of a visible model layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedModel {
    pub layer_id: String,
    pub model_id: String,
    pub uri: String,
    pub location: LngLat,
    pub translation: [f64; 3],
    pub rotation: [f64; 3],
}

#[derive(Debug, Clone)]
pub struct HeadlessMap {
    style_uri: Option<String>,
    style: StyleDocument,
    camera: CameraOptions,
    free_camera: FreeCameraOptions,
    camera_commits: usize,
}

impl HeadlessMap {
    pub fn new(camera: CameraOptions) -> Self {
        Self {
            style_uri: None,
            style: StyleDocument::new(""),
            camera,
            free_camera: FreeCameraOptions::default(),
            camera_commits: 0,
        }
    }

    /// Replace the style with the base satellite style named by `uri`.
    pub fn load_style(&mut self, uri: &str) -> StyleResult<()> {
        let name = uri.rsplit('/').next().unwrap_or(uri);
        let mut style = StyleDocument::new(name);
        style.add_source(
            SATELLITE_SOURCE_ID,
            Source::Raster(RasterSource {
                url: Some(SATELLITE_TILES_URL.to_string()),
                tile_size: Some(256),
                ..Default::default()
            }),
        )?;
        style.add_layer(Layer::Raster(RasterLayer::new(
            SATELLITE_SOURCE_ID,
            SATELLITE_SOURCE_ID,
        )))?;
        self.style = style;
        self.style_uri = Some(uri.to_string());
        log::info!("headless map loaded style {}", uri);
        Ok(())
    }

    pub fn style(&self) -> &StyleDocument {
        &self.style
    }

    pub fn camera(&self) -> &CameraOptions {
        &self.camera
    }

    /// Number of free camera commits so far.
    pub fn camera_commits(&self) -> usize {
        self.camera_commits
    }

    /// Resolve every model-layer feature to the model it would draw at `zoom`.
    pub fn rendered_models(&self, zoom: f64) -> Vec<RenderedModel> {
        let mut out = Vec::new();
        for layer in self.style.layers() {
            let Some(model) = layer.as_model() else {
                continue;
            };
            if !layer.in_zoom_range(zoom) {
                continue;
            }
            let Some(source) = self.style.source(&model.source).and_then(Source::as_geojson) else {
                continue;
            };
            let Some(model_id) = model.layout.model_id.as_ref() else {
                continue;
            };
            for feature in source.data.features() {
                let ctx = EvalContext::new(&feature.properties, zoom);
                let Some(id) = model_id.resolve(&ctx) else {
                    log::debug!("feature in {} has no model id", model.source);
                    continue;
                };
                let Some(uri) = self.style.model_uri(&id) else {
                    log::debug!("model {} is not registered", id);
                    continue;
                };
                out.push(RenderedModel {
                    layer_id: layer.id().to_string(),
                    model_id: id.clone(),
                    uri: uri.to_string(),
                    location: feature.coordinates(),
                    translation: model.translation().unwrap_or([0.0; 3]),
                    rotation: model.rotation().unwrap_or([0.0; 3]),
                });
            }
        }
        out
    }
}

impl Default for HeadlessMap {
    fn default() -> Self {
        Self::new(CameraOptions {
            center: LngLat::NULL_ISLAND,
            zoom: 0.0,
            pitch: 0.0,
            bearing: 0.0,
        })
    }
}

impl MapBackend for HeadlessMap {
    fn style_uri(&self) -> Option<&str> {
        self.style_uri.as_deref()
    }

    fn add_source(&mut self, id: &str, source: Source) -> StyleResult<()> {
        self.style.add_source(id, source)
    }

    fn remove_source(&mut self, id: &str) -> StyleResult<()> {
        self.style.remove_source(id).map(|_| ())
    }

    fn source_exists(&self, id: &str) -> bool {
        self.style.has_source(id)
    }

    fn source(&self, id: &str) -> Option<Source> {
        self.style.source(id).cloned()
    }

    fn update_geojson_source(&mut self, id: &str, data: GeoJsonData) -> StyleResult<()> {
        self.style.update_geojson_source(id, data)
    }

    fn add_layer(&mut self, layer: Layer) -> StyleResult<()> {
        self.style.add_layer(layer)
    }

    fn layer_exists(&self, id: &str) -> bool {
        self.style.has_layer(id)
    }

    fn set_paint_property(
        &mut self,
        layer_id: &str,
        name: &str,
        value: serde_json::Value,
    ) -> StyleResult<()> {
        self.style.set_paint_property(layer_id, name, value)
    }

    fn set_terrain(&mut self, terrain: Option<Terrain>) -> StyleResult<()> {
        self.style.set_terrain(terrain)
    }

    fn terrain(&self) -> Option<Terrain> {
        self.style.terrain().cloned()
    }

    fn add_image(&mut self, id: &str, image: StyleImage) -> StyleResult<()> {
        self.style.add_image(id, image)
    }

    fn image_exists(&self, id: &str) -> bool {
        self.style.has_image(id)
    }

    fn add_style_model(&mut self, model_id: &str, uri: &str) -> StyleResult<()> {
        self.style.add_model(model_id, uri)
    }

    fn style_model_exists(&self, model_id: &str) -> bool {
        self.style.has_model(model_id)
    }

    fn free_camera_options(&self) -> FreeCameraOptions {
        self.free_camera
    }

    fn set_free_camera_options(&mut self, options: FreeCameraOptions) -> Result<(), CameraError> {
        options.validate()?;
        self.free_camera.merge(&options);
        self.camera_commits += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{
        Expression, Feature, FeatureCollection, GeoJsonData, GeoJsonSource, ModelLayer,
        PropertyValue,
    };

    fn loaded() -> HeadlessMap {
        let mut map = HeadlessMap::default();
        map.load_style("mapbox://styles/mapbox/satellite-streets-v12")
            .unwrap();
        map
    }

    #[test]
    fn load_style_installs_satellite_base() {
        let map = loaded();
        assert_eq!(
            map.style_uri(),
            Some("mapbox://styles/mapbox/satellite-streets-v12")
        );
        assert_eq!(map.style().name, "satellite-streets-v12");
        assert!(map.source_exists(SATELLITE_SOURCE_ID));
        assert!(map.layer_exists(SATELLITE_SOURCE_ID));
    }

    #[test]
    fn camera_commit_merges_and_counts() {
        let mut map = loaded();
        let mut opts = FreeCameraOptions::new();
        opts.set_altitude(1000.0).unwrap();
        map.set_free_camera_options(opts).unwrap();

        let mut bad = FreeCameraOptions::new();
        bad.altitude = Some(-1.0);
        assert!(map.set_free_camera_options(bad).is_err());

        assert_eq!(map.free_camera_options().altitude, Some(1000.0));
        assert_eq!(map.camera_commits(), 1);
    }

    #[test]
    fn rendered_models_follow_feature_model_id() {
        let mut map = loaded();
        let loc = LngLat::from_lat_lon(10.0, 20.0).unwrap();
        map.add_style_model("plane", "file:///plane.glb").unwrap();
        map.add_source(
            "models",
            Source::GeoJson(GeoJsonSource::new(GeoJsonData::FeatureCollection(
                FeatureCollection {
                    features: vec![
                        Feature::point(loc).with_property("mid", "plane"),
                        Feature::point(loc).with_property("mid", "unregistered"),
                    ],
                },
            ))),
        )
        .unwrap();
        let mut layer = ModelLayer::new("models-layer", "models");
        layer.common.minzoom = Some(5.0);
        layer.layout.model_id = Some(PropertyValue::Expression(Expression::get("mid")));
        map.add_layer(Layer::Model(layer)).unwrap();

        let models = map.rendered_models(12.0);
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].model_id, "plane");
        assert_eq!(models[0].uri, "file:///plane.glb");
        assert_eq!(models[0].location, loc);
        assert!(map.rendered_models(4.0).is_empty());
    }
}
