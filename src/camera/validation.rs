//! Camera parameter validation utilities
//!
//! Validation for free-camera and map-camera parameters before they are
//! committed to a backend.

use crate::geo::GeoError;

pub const ERROR_ALTITUDE: &str = "altitude must be finite and >= 0";
pub const ERROR_PITCH: &str = "pitch must be finite and in [0, 90)";
pub const ERROR_BEARING: &str = "bearing must be finite";
pub const ERROR_ZOOM: &str = "zoom must be finite and >= 0";
pub const ERROR_ORIENTATION: &str = "orientation quaternion must be finite and non-zero";

/// Error type for camera parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CameraError {
    #[error("{0}")]
    Invalid(&'static str),
    #[error("invalid camera location: {0}")]
    Location(#[from] GeoError),
}

pub fn validate_altitude(altitude: f64) -> Result<(), CameraError> {
    if !altitude.is_finite() || altitude < 0.0 {
        return Err(CameraError::Invalid(ERROR_ALTITUDE));
    }
    Ok(())
}

/// Pitch is measured from nadir; 90 would be a horizon-level camera, which
/// has no well-defined bearing from its up vector.
pub fn validate_pitch(pitch_deg: f64) -> Result<(), CameraError> {
    if !pitch_deg.is_finite() || !(0.0..90.0).contains(&pitch_deg) {
        return Err(CameraError::Invalid(ERROR_PITCH));
    }
    Ok(())
}

pub fn validate_bearing(bearing_deg: f64) -> Result<(), CameraError> {
    if !bearing_deg.is_finite() {
        return Err(CameraError::Invalid(ERROR_BEARING));
    }
    Ok(())
}

pub fn validate_zoom(zoom: f64) -> Result<(), CameraError> {
    if !zoom.is_finite() || zoom < 0.0 {
        return Err(CameraError::Invalid(ERROR_ZOOM));
    }
    Ok(())
}

pub fn validate_orientation(q: glam::DQuat) -> Result<(), CameraError> {
    if !q.is_finite() || q.length_squared() < 1e-12 {
        return Err(CameraError::Invalid(ERROR_ORIENTATION));
    }
    Ok(())
}
