//! Central error handling for scene setup
//!
//! Provides a unified SceneError enum covering the handle precondition,
//! style mutation failures, camera validation and configuration loading.

use crate::camera::CameraError;
use crate::geo::GeoError;
use crate::style::StyleError;

/// Centralized error type for all scene configuration operations
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    #[error("Map is not ready: configuration issued before the map finished loading")]
    NotReady,

    #[error("Style error: {0}")]
    Style(#[from] StyleError),

    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),

    #[error("Invalid location: {0}")]
    Geo(#[from] GeoError),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SceneError {
    /// Short category label used in log lines and diagnostics.
    pub fn category(&self) -> &'static str {
        match self {
            SceneError::NotReady => "NotReady",
            SceneError::Style(_) => "Style",
            SceneError::Camera(_) => "Camera",
            SceneError::Geo(_) => "Geo",
            SceneError::AssetNotFound(_) => "Asset",
            SceneError::Config(_) => "Config",
            SceneError::Io(_) => "IO",
            SceneError::Json(_) => "JSON",
        }
    }

    pub fn config<T: ToString>(msg: T) -> Self {
        SceneError::Config(msg.to_string())
    }

    pub fn asset_not_found<T: ToString>(name: T) -> Self {
        SceneError::AssetNotFound(name.to_string())
    }

    /// True when the error is the handle precondition failure.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, SceneError::NotReady)
    }
}

/// Result type alias for scene operations
pub type SceneResult<T> = Result<T, SceneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_prefixed_in_display() {
        let err = SceneError::config("latitude out of range");
        assert_eq!(err.category(), "Config");
        assert_eq!(err.to_string(), "Config error: latitude out of range");
    }

    #[test]
    fn style_errors_convert() {
        let err: SceneError = StyleError::DuplicateSource("mapbox-dem".into()).into();
        assert_eq!(err.category(), "Style");
        assert!(err.to_string().contains("mapbox-dem"));
        assert!(!err.is_not_ready());
        assert!(SceneError::NotReady.is_not_ready());
    }
}
