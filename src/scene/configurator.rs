//! Scene setup against a loaded map.
//!
//! [`SceneConfigurator`] turns a [`SceneConfig`] into backend calls once the map
//! reports that its style has loaded. Every operation requires that load event;
//! before it, or after the map is dropped, operations return
//! [`SceneError::NotReady`].
//!
//! Failure policy per operation:
//! - terrain source: fatal, the error is returned
//! - terrain exaggeration: logged, recorded, terrain stays flat
//! - model and marker placement: logged, recorded, setup continues
//!
//! Sources and layers that already exist are updated in place: the GeoJSON
//! data is replaced and the model translation reset. Repeating the setup with
//! the same config (for instance on a duplicate load event) yields the same
//! style, while a new coordinate moves the model.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::assets::AssetBundle;
use crate::backend::MapBackend;
use crate::camera::{self, CameraError, FreeCameraOptions};
use crate::config::{ModelSettings, SceneConfig};
use crate::error::{SceneError, SceneResult};
use crate::geo::LngLat;
use crate::scene::diagnostics::{Diagnostic, Diagnostics, SetupStep};
use crate::scene::state::MapHandle;
use crate::style::{
    Expression, Feature, FeatureCollection, GeoJsonData, GeoJsonSource, Geometry, Layer,
    ModelLayer, PropertyValue, RasterDemSource, Source, StyleImage, StyleResult, SymbolLayer,
    Terrain,
};

/// Feature property carrying the subject heading next to the model id.
pub const HEADING_PROPERTY: &str = "heading";

const MODEL_TRANSLATION: &str = "model-translation";

const FALLBACK_MARKER_SIZE: u32 = 24;
const FALLBACK_MARKER_COLOR: [u8; 4] = [220, 32, 32, 255];

/// Outcome of terrain setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainStatus {
    /// Terrain renders with the configured exaggeration.
    Enabled,
    /// DEM source is present but terrain could not be enabled.
    Flat,
}

/// Summary of one [`SceneConfigurator::setup`] run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupReport {
    /// `None` when terrain is disabled in the config.
    pub terrain: Option<TerrainStatus>,
    /// Committed pose, `None` if the commit failed.
    pub camera: Option<FreeCameraOptions>,
    /// `None` when the step is disabled in the config.
    pub model_placed: Option<bool>,
    pub marker_placed: Option<bool>,
    /// Non-fatal failures of this run.
    pub diagnostics: Vec<Diagnostic>,
}

impl SetupReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

pub struct SceneConfigurator<B: MapBackend> {
    config: SceneConfig,
    assets: Box<dyn AssetBundle>,
    handle: MapHandle<B>,
    diagnostics: Diagnostics,
}

impl<B: MapBackend> SceneConfigurator<B> {
    pub fn new<A: AssetBundle + 'static>(config: SceneConfig, assets: A) -> Self {
        Self {
            config,
            assets: Box::new(assets),
            handle: MapHandle::NotReady,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn is_ready(&self) -> bool {
        self.handle.is_ready()
    }

    /// Handle the map's load event. A repeated event replaces the handle.
    pub fn map_loaded(&mut self, map: &Rc<RefCell<B>>) {
        if self.handle.is_ready() {
            log::warn!("map loaded event received again; re-binding scene to the map");
        } else {
            log::info!("map loaded; scene setup can start");
        }
        self.handle = MapHandle::ready(map);
    }

    /// Run the whole setup: terrain, camera pose, model, then marker.
    ///
    /// Only a missing map or a failed DEM source abort the run. Invalid
    /// coordinates or altitudes are recorded under the step that rejected
    /// them. Diagnostics of earlier runs are dropped.
    pub fn setup(&mut self) -> SceneResult<SetupReport> {
        self.handle.upgrade()?;
        self.diagnostics.clear();

        let terrain = if self.config.terrain.enabled {
            Some(self.add_terrain_layer()?)
        } else {
            None
        };

        let cam = self.config.camera.clone();
        let camera = match self.set_camera_pose(
            cam.altitude,
            cam.latitude,
            cam.longitude,
            cam.heading,
            cam.pitch,
        ) {
            Ok(pose) => Some(pose),
            Err(SceneError::NotReady) => return Err(SceneError::NotReady),
            Err(e) => {
                self.diagnostics.record(SetupStep::CameraPose, &e);
                None
            }
        };

        let model_placed = if self.config.model.enabled {
            let placed =
                self.place_model(cam.latitude, cam.longitude, cam.altitude, cam.heading);
            Some(self.recorded(SetupStep::ModelSource, placed)?)
        } else {
            None
        };

        let marker_placed = if self.config.marker.enabled {
            let placed = self.place_diagnostic_marker(cam.latitude, cam.longitude);
            Some(self.recorded(SetupStep::MarkerSource, placed)?)
        } else {
            None
        };

        let report = SetupReport {
            terrain,
            camera,
            model_placed,
            marker_placed,
            diagnostics: self.diagnostics.entries().to_vec(),
        };
        log::info!(
            "scene setup finished: terrain={:?} model={:?} marker={:?} diagnostics={}",
            report.terrain,
            report.model_placed,
            report.marker_placed,
            report.diagnostics.len()
        );
        Ok(report)
    }

    /// Add the DEM source and enable terrain on it.
    ///
    /// An existing source under the same id is reused. If it is not the
    /// configured DEM the mismatch is recorded and terrain is set on it anyway.
    pub fn add_terrain_layer(&mut self) -> SceneResult<TerrainStatus> {
        let map = self.handle.upgrade()?;
        let settings = self.config.terrain.clone();
        let mut map = map.borrow_mut();

        match map.source(&settings.source_id) {
            Some(Source::RasterDem(dem))
                if dem.url.as_deref() == Some(settings.url.as_str())
                    && dem.tile_size == Some(settings.tile_size) =>
            {
                log::debug!("terrain source {} already present", settings.source_id);
            }
            Some(existing) => {
                let mismatch = SceneError::config(format!(
                    "source '{}' is a {} source, not the DEM {} at tile size {}",
                    settings.source_id,
                    existing.kind(),
                    settings.url,
                    settings.tile_size
                ));
                self.diagnostics.record(SetupStep::TerrainSource, &mismatch);
            }
            None => {
                let dem = Source::RasterDem(RasterDemSource {
                    url: Some(settings.url.clone()),
                    tiles: None,
                    tile_size: Some(settings.tile_size),
                    maxzoom: Some(settings.max_zoom),
                });
                if let Err(e) = map.add_source(&settings.source_id, dem) {
                    self.diagnostics.record(SetupStep::TerrainSource, &e);
                    return Err(e.into());
                }
            }
        }

        let terrain = Terrain::new(&settings.source_id).with_exaggeration(settings.exaggeration);
        match map.set_terrain(Some(terrain)) {
            Ok(()) => {
                log::info!(
                    "terrain enabled on {} (exaggeration {})",
                    settings.source_id,
                    settings.exaggeration
                );
                Ok(TerrainStatus::Enabled)
            }
            Err(e) => {
                self.diagnostics.record(SetupStep::TerrainExaggeration, &e);
                Ok(TerrainStatus::Flat)
            }
        }
    }

    /// Commit a free camera pose. Bearing follows `heading`.
    pub fn set_camera_pose(
        &mut self,
        altitude: f64,
        lat: f64,
        lon: f64,
        heading: f64,
        pitch: f64,
    ) -> SceneResult<FreeCameraOptions> {
        let map = self.handle.upgrade()?;
        let location = LngLat::from_lat_lon(lat, lon).map_err(CameraError::from)?;

        let mut pose = map.borrow().free_camera_options();
        pose.set_altitude(altitude)?;
        pose.set_location(location);
        pose.set_pitch_bearing(pitch, heading)?;
        map.borrow_mut().set_free_camera_options(pose)?;

        log::info!(
            "camera at {} altitude {:.2} m, pitch {:.1}, bearing {:.1}",
            location,
            altitude,
            pitch,
            heading
        );
        Ok(pose)
    }

    /// Place the 3D model at a coordinate.
    ///
    /// Returns `true` when the model asset, source and layer are all on the map
    /// afterwards. A second call moves the existing feature and translation.
    /// Backend failures are recorded, not returned.
    pub fn place_model(
        &mut self,
        lat: f64,
        lon: f64,
        altitude: f64,
        heading: f64,
    ) -> SceneResult<bool> {
        let map = self.handle.upgrade()?;
        let location = LngLat::from_lat_lon(lat, lon)?;
        camera::validate_altitude(altitude)?;
        let m = self.config.model.clone();
        let mut ok = true;

        if map.borrow().style_model_exists(&m.model_id) {
            log::debug!("model {} already registered", m.model_id);
        } else {
            match self.assets.url_for_resource(&m.asset_name, &m.asset_extension) {
                Some(uri) => {
                    let result = map.borrow_mut().add_style_model(&m.model_id, &uri);
                    ok &= self.best_effort(SetupStep::ModelAsset, result);
                }
                None => {
                    let missing = SceneError::asset_not_found(format!(
                        "{}.{}",
                        m.asset_name, m.asset_extension
                    ));
                    self.diagnostics.record(SetupStep::ModelAsset, &missing);
                    ok = false;
                }
            }
        }

        let data = GeoJsonData::FeatureCollection(FeatureCollection {
            features: vec![model_feature(&m, location, heading)],
        });
        let result = if map.borrow().source_exists(&m.source_id) {
            log::debug!("model source {} already present; replacing its data", m.source_id);
            map.borrow_mut().update_geojson_source(&m.source_id, data)
        } else {
            let mut source = GeoJsonSource::new(data);
            source.maxzoom = Some(m.source_max_zoom);
            map.borrow_mut()
                .add_source(&m.source_id, Source::GeoJson(source))
        };
        ok &= self.best_effort(SetupStep::ModelSource, result);

        if map.borrow().layer_exists(&m.layer_id) {
            log::debug!(
                "model layer {} already present; translating it to {} m",
                m.layer_id,
                altitude
            );
            let result = map.borrow_mut().set_paint_property(
                &m.layer_id,
                MODEL_TRANSLATION,
                serde_json::json!([0.0, 0.0, altitude]),
            );
            ok &= self.best_effort(SetupStep::ModelLayer, result);
        } else {
            let mut layer = ModelLayer::new(&m.layer_id, &m.source_id);
            layer.common.minzoom = Some(m.min_zoom);
            layer.common.maxzoom = Some(m.max_zoom);
            layer.layout.model_id =
                Some(PropertyValue::Expression(Expression::get(&m.feature_key)));
            layer.paint.model_type = Some(m.model_type.into());
            layer.paint.model_scale = Some(m.scale.to_array().into());
            layer.paint.model_translation = Some([0.0, 0.0, altitude].into());
            layer.paint.model_rotation = Some(m.rotation.to_array().into());
            layer.paint.model_cutoff_fade_range = Some(m.cutoff_fade_range.into());
            let result = map.borrow_mut().add_layer(Layer::Model(layer));
            ok &= self.best_effort(SetupStep::ModelLayer, result);
        }

        if ok {
            log::info!("model {} placed at {}", m.model_id, location);
        }
        Ok(ok)
    }

    /// Drop a pin at a coordinate to check where the camera is looking.
    ///
    /// Independent of [`Self::set_camera_pose`]. Returns `true` when image,
    /// source and layer are all on the map afterwards.
    pub fn place_diagnostic_marker(&mut self, lat: f64, lon: f64) -> SceneResult<bool> {
        let map = self.handle.upgrade()?;
        let location = LngLat::from_lat_lon(lat, lon)?;
        let mk = self.config.marker.clone();
        let mut ok = true;

        if !map.borrow().image_exists(&mk.image_id) {
            let image = match self.assets.image(&mk.image_name) {
                Some(image) => image,
                None => {
                    let missing = SceneError::asset_not_found(&mk.image_name);
                    self.diagnostics.record(SetupStep::MarkerImage, &missing);
                    ok = false;
                    StyleImage::solid(FALLBACK_MARKER_SIZE, FALLBACK_MARKER_COLOR)
                }
            };
            let result = map.borrow_mut().add_image(&mk.image_id, image);
            ok &= self.best_effort(SetupStep::MarkerImage, result);
        }

        let point = GeoJsonData::Geometry(Geometry::Point {
            coordinates: location,
        });
        let result = if map.borrow().source_exists(&mk.source_id) {
            map.borrow_mut().update_geojson_source(&mk.source_id, point)
        } else {
            map.borrow_mut()
                .add_source(&mk.source_id, Source::GeoJson(GeoJsonSource::new(point)))
        };
        ok &= self.best_effort(SetupStep::MarkerSource, result);

        if !map.borrow().layer_exists(&mk.layer_id) {
            let mut layer = SymbolLayer::new(&mk.layer_id, &mk.source_id);
            layer.layout.icon_image = Some(mk.image_id.clone().into());
            layer.layout.icon_anchor = Some(mk.anchor.into());
            layer.layout.icon_offset = Some(mk.offset.into());
            let result = map.borrow_mut().add_layer(Layer::Symbol(layer));
            ok &= self.best_effort(SetupStep::MarkerLayer, result);
        }

        Ok(ok)
    }

    /// Record a rejected placement under `step`. Only `NotReady` is returned.
    fn recorded(&mut self, step: SetupStep, result: SceneResult<bool>) -> SceneResult<bool> {
        match result {
            Ok(placed) => Ok(placed),
            Err(SceneError::NotReady) => Err(SceneError::NotReady),
            Err(e) => {
                self.diagnostics.record(step, &e);
                Ok(false)
            }
        }
    }

    fn best_effort(&mut self, step: SetupStep, result: StyleResult<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                self.diagnostics.record(step, &e);
                false
            }
        }
    }
}

/// The single feature of the model source. Its `feature_key` property names
/// the model the layer draws.
fn model_feature(settings: &ModelSettings, location: LngLat, heading: f64) -> Feature {
    Feature::point(location)
        .with_property(&settings.feature_key, settings.model_id.as_str())
        .with_property(HEADING_PROPERTY, heading)
}
