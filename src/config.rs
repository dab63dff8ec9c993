// src/config.rs
// Scene configuration: camera pose, terrain, model and marker settings
// RELEVANT FILES: src/scene/configurator.rs, src/cli/args.rs, src/camera/validation.rs

use std::fs;
use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::camera::{self, CameraOptions};
use crate::error::{SceneError, SceneResult};
use crate::geo::LngLat;
use crate::style::{Anchor, ModelType};

/// Everything scene setup needs, fixed for the lifetime of a configurator.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub style_uri: String,
    pub camera: CameraSettings,
    pub terrain: TerrainSettings,
    pub model: ModelSettings,
    pub marker: MarkerSettings,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            style_uri: "mapbox://styles/mapbox/satellite-streets-v12".to_string(),
            camera: CameraSettings::default(),
            terrain: TerrainSettings::default(),
            model: ModelSettings::default(),
            marker: MarkerSettings::default(),
        }
    }
}

/// Initial camera and the subject's pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Meters.
    pub altitude: f64,
    pub heading: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            zoom: 12.0,
            pitch: 0.0,
            bearing: 186.0,
            latitude: 42.97330,
            longitude: -75.085930,
            altitude: 9753.60,
            heading: 180.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    pub enabled: bool,
    pub source_id: String,
    pub url: String,
    pub tile_size: u32,
    pub max_zoom: f64,
    pub exaggeration: f64,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            source_id: "mapbox-dem".to_string(),
            url: "mapbox://mapbox.mapbox-terrain-dem-v1".to_string(),
            tile_size: 514,
            max_zoom: 18.0,
            exaggeration: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub enabled: bool,
    pub asset_name: String,
    pub asset_extension: String,
    pub model_id: String,
    pub source_id: String,
    pub source_max_zoom: f64,
    pub layer_id: String,
    /// Feature property the layer reads the model id from.
    pub feature_key: String,
    pub model_type: ModelType,
    pub scale: DVec3,
    /// Degrees around x, y, z.
    pub rotation: DVec3,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub cutoff_fade_range: f64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            asset_name: "A320".to_string(),
            asset_extension: "glb".to_string(),
            model_id: "model-id-plane".to_string(),
            source_id: "source-id".to_string(),
            source_max_zoom: 4.0,
            layer_id: "model-layer-id".to_string(),
            feature_key: "model-id-key".to_string(),
            model_type: ModelType::Common3d,
            scale: DVec3::ONE,
            rotation: DVec3::new(0.0, 0.0, 90.0),
            min_zoom: 5.0,
            max_zoom: 23.0,
            cutoff_fade_range: 0.0,
        }
    }
}

/// Diagnostic pin used to check where the camera is focused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSettings {
    pub enabled: bool,
    pub image_id: String,
    /// Bundled icon name.
    pub image_name: String,
    pub source_id: String,
    pub layer_id: String,
    pub anchor: Anchor,
    pub offset: [f64; 2],
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            image_id: "red".to_string(),
            image_name: "pin".to_string(),
            source_id: "source_id".to_string(),
            layer_id: "layer_id".to_string(),
            anchor: Anchor::Bottom,
            offset: [0.0, 12.0],
        }
    }
}

impl SceneConfig {
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> SceneResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Subject coordinate.
    pub fn location(&self) -> SceneResult<LngLat> {
        LngLat::from_lat_lon(self.camera.latitude, self.camera.longitude)
            .map_err(SceneError::config)
    }

    /// Map camera the view starts with.
    pub fn camera_options(&self) -> SceneResult<CameraOptions> {
        let options = CameraOptions {
            center: self.location()?,
            zoom: self.camera.zoom,
            pitch: self.camera.pitch,
            bearing: self.camera.bearing,
        };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> SceneResult<()> {
        self.location()?;
        camera::validate_altitude(self.camera.altitude)?;
        camera::validate_zoom(self.camera.zoom)?;
        camera::validate_pitch(self.camera.pitch)?;
        camera::validate_bearing(self.camera.bearing)?;
        camera::validate_bearing(self.camera.heading)?;

        let t = &self.terrain;
        if t.tile_size == 0 {
            return Err(SceneError::config("terrain.tile_size must be > 0"));
        }
        if !t.exaggeration.is_finite() || t.exaggeration < 0.0 {
            return Err(SceneError::config("terrain.exaggeration must be finite and >= 0"));
        }
        if !t.max_zoom.is_finite() || t.max_zoom < 0.0 {
            return Err(SceneError::config("terrain.max_zoom must be finite and >= 0"));
        }

        let m = &self.model;
        if !(m.min_zoom.is_finite() && m.max_zoom.is_finite()) || m.min_zoom > m.max_zoom {
            return Err(SceneError::config(format!(
                "model zoom range [{}, {}] is invalid",
                m.min_zoom, m.max_zoom
            )));
        }
        if !m.scale.is_finite() || !m.rotation.is_finite() {
            return Err(SceneError::config("model scale and rotation must be finite"));
        }

        let ids = [
            ("terrain.source_id", &t.source_id),
            ("model.model_id", &m.model_id),
            ("model.source_id", &m.source_id),
            ("model.layer_id", &m.layer_id),
            ("model.feature_key", &m.feature_key),
            ("marker.image_id", &self.marker.image_id),
            ("marker.source_id", &self.marker.source_id),
            ("marker.layer_id", &self.marker.layer_id),
        ];
        for (name, id) in ids {
            if id.trim().is_empty() {
                return Err(SceneError::config(format!("{} must be non-empty", name)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = SceneConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.camera.altitude, 9753.60);
        assert_eq!(cfg.terrain.exaggeration, 1.5);
        assert_eq!(cfg.model.rotation, DVec3::new(0.0, 0.0, 90.0));
        assert!(!cfg.marker.enabled);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = SceneConfig::from_json_str(
            r#"{"camera": {"latitude": 46.5, "altitude": 1200.0}, "marker": {"enabled": true}}"#,
        )
        .unwrap();
        assert_eq!(cfg.camera.latitude, 46.5);
        assert_eq!(cfg.camera.longitude, -75.085930);
        assert_eq!(cfg.camera.altitude, 1200.0);
        assert!(cfg.marker.enabled);
        assert_eq!(cfg.marker.image_id, "red");
        assert_eq!(cfg.terrain.source_id, "mapbox-dem");
    }

    #[test]
    fn out_of_range_latitude_is_rejected() {
        let err = SceneConfig::from_json_str(r#"{"camera": {"latitude": 91.0}}"#).unwrap_err();
        assert!(matches!(err, SceneError::Config(_)));
    }

    #[test]
    fn negative_altitude_and_zoom_are_rejected() {
        let err = SceneConfig::from_json_str(r#"{"camera": {"altitude": -1.0}}"#).unwrap_err();
        assert!(matches!(err, SceneError::Camera(_)));
        assert!(SceneConfig::from_json_str(r#"{"camera": {"zoom": -2.0}}"#).is_err());
    }

    #[test]
    fn inverted_model_zoom_range_is_rejected() {
        let mut cfg = SceneConfig::default();
        cfg.model.min_zoom = 20.0;
        cfg.model.max_zoom = 5.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn vectors_use_array_json() {
        let json = serde_json::to_value(SceneConfig::default()).unwrap();
        assert_eq!(json["model"]["rotation"], serde_json::json!([0.0, 0.0, 90.0]));
        assert_eq!(json["model"]["model_type"], "common-3d");
        assert_eq!(json["marker"]["anchor"], "bottom");
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        std::fs::write(&path, r#"{"terrain": {"exaggeration": 2.0}}"#).unwrap();
        let cfg = SceneConfig::from_path(&path).unwrap();
        assert_eq!(cfg.terrain.exaggeration, 2.0);
        assert!(SceneConfig::from_path(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn camera_options_follow_settings() {
        let cam = SceneConfig::default().camera_options().unwrap();
        assert_eq!(cam.zoom, 12.0);
        assert_eq!(cam.bearing, 186.0);
        assert_eq!(cam.center.lat(), 42.97330);
    }
}
