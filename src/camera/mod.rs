//! Camera state handed to map backends.
//!
//! Two camera flavours exist:
//! - [`CameraOptions`]: map-relative center/zoom/pitch/bearing, the initial
//!   camera a map is created with.
//! - [`FreeCameraOptions`]: explicit world position and orientation. Bearing 0
//!   looks north, pitch 0 looks straight down, in a right-handed Mercator frame
//!   (x east, y south, z up).

pub mod validation;

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::geo::{LngLat, MercatorCoordinate};

pub use validation::{
    validate_altitude, validate_bearing, validate_orientation, validate_pitch, validate_zoom,
    CameraError,
};

/// Map-relative camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraOptions {
    pub center: LngLat,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

impl CameraOptions {
    pub fn validate(&self) -> Result<(), CameraError> {
        validate_zoom(self.zoom)?;
        validate_pitch(self.pitch)?;
        validate_bearing(self.bearing)?;
        Ok(())
    }
}

/// Free-flying camera pose.
///
/// Every component is optional; a backend keeps its current value for any
/// component left unset when the options are committed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FreeCameraOptions {
    #[serde(default)]
    pub location: Option<LngLat>,
    /// Meters above sea level.
    #[serde(default)]
    pub altitude: Option<f64>,
    #[serde(default)]
    pub orientation: Option<DQuat>,
}

impl FreeCameraOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_location(&mut self, location: LngLat) {
        self.location = Some(location);
    }

    pub fn set_altitude(&mut self, altitude: f64) -> Result<(), CameraError> {
        validate_altitude(altitude)?;
        self.altitude = Some(altitude);
        Ok(())
    }

    /// Set orientation from pitch and bearing in degrees.
    pub fn set_pitch_bearing(&mut self, pitch_deg: f64, bearing_deg: f64) -> Result<(), CameraError> {
        validate_pitch(pitch_deg)?;
        validate_bearing(bearing_deg)?;
        self.orientation = Some(orientation_from_pitch_bearing(pitch_deg, bearing_deg));
        Ok(())
    }

    /// Recover `(pitch, bearing)` in degrees, bearing normalized to `[0, 360)`.
    pub fn pitch_bearing(&self) -> Option<(f64, f64)> {
        self.orientation.map(pitch_bearing_from_orientation)
    }

    /// Viewing direction in the Mercator frame.
    pub fn forward(&self) -> Option<DVec3> {
        self.orientation.map(|q| q * DVec3::NEG_Z)
    }

    /// Camera position in mercator units, if both location and altitude are set.
    pub fn mercator_position(&self) -> Option<MercatorCoordinate> {
        Some(MercatorCoordinate::from_lng_lat(self.location?, self.altitude?))
    }

    pub fn validate(&self) -> Result<(), CameraError> {
        if let Some(altitude) = self.altitude {
            validate_altitude(altitude)?;
        }
        if let Some(q) = self.orientation {
            validate_orientation(q)?;
        }
        Ok(())
    }

    /// Overlay the components set in `other` onto `self`.
    pub fn merge(&mut self, other: &FreeCameraOptions) {
        if other.location.is_some() {
            self.location = other.location;
        }
        if other.altitude.is_some() {
            self.altitude = other.altitude;
        }
        if other.orientation.is_some() {
            self.orientation = other.orientation;
        }
    }
}

/// Rz(bearing) * Rx(-pitch), applied to a nadir-looking camera with north up.
pub fn orientation_from_pitch_bearing(pitch_deg: f64, bearing_deg: f64) -> DQuat {
    DQuat::from_rotation_z(bearing_deg.to_radians()) * DQuat::from_rotation_x(-pitch_deg.to_radians())
}

pub fn pitch_bearing_from_orientation(q: DQuat) -> (f64, f64) {
    let q = q.normalize();
    let forward = q * DVec3::NEG_Z;
    // Screen-up of the camera; north (-y) for an unrotated camera.
    let up = q * DVec3::NEG_Y;

    let horizontal = (forward.x * forward.x + forward.y * forward.y).sqrt();
    let pitch = horizontal.atan2(-forward.z).to_degrees();
    let bearing = up.x.atan2(-up.y).to_degrees().rem_euclid(360.0);
    (pitch, bearing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn nadir_camera_looks_down() {
        let mut cam = FreeCameraOptions::new();
        cam.set_pitch_bearing(0.0, 0.0).unwrap();
        let f = cam.forward().unwrap();
        assert!(approx(f.x, 0.0) && approx(f.y, 0.0) && approx(f.z, -1.0));
    }

    #[test]
    fn pitched_camera_faces_bearing() {
        let mut cam = FreeCameraOptions::new();
        cam.set_pitch_bearing(60.0, 90.0).unwrap();
        let f = cam.forward().unwrap();
        assert!(f.x > 0.5, "bearing 90 should face east, got {f:?}");
        assert!(approx(f.y, 0.0));
        assert!(f.z < 0.0);
    }

    #[test]
    fn pitch_bearing_recovers_inputs() {
        for &(p, b) in &[(0.0, 180.0), (45.0, 10.0), (30.0, 270.0), (10.0, 359.0)] {
            let mut cam = FreeCameraOptions::new();
            cam.set_pitch_bearing(p, b).unwrap();
            let (rp, rb) = cam.pitch_bearing().unwrap();
            assert!((rp - p).abs() < 1e-6, "pitch {p} -> {rp}");
            assert!((rb - b).abs() < 1e-6, "bearing {b} -> {rb}");
        }
    }

    #[test]
    fn negative_bearing_is_normalized() {
        let mut cam = FreeCameraOptions::new();
        cam.set_pitch_bearing(20.0, -90.0).unwrap();
        let (_, b) = cam.pitch_bearing().unwrap();
        assert!((b - 270.0).abs() < 1e-6);
    }

    #[test]
    fn invalid_inputs_leave_pose_untouched() {
        let mut cam = FreeCameraOptions::new();
        assert!(cam.set_altitude(-5.0).is_err());
        assert!(cam.set_pitch_bearing(95.0, 0.0).is_err());
        assert_eq!(cam, FreeCameraOptions::default());
    }

    #[test]
    fn merge_overlays_set_components() {
        let mut base = FreeCameraOptions::new();
        base.set_altitude(100.0).unwrap();
        base.set_location(LngLat::from_lat_lon(1.0, 2.0).unwrap());

        let mut update = FreeCameraOptions::new();
        update.set_altitude(200.0).unwrap();
        base.merge(&update);

        assert_eq!(base.altitude, Some(200.0));
        assert_eq!(base.location, Some(LngLat::from_lat_lon(1.0, 2.0).unwrap()));
        assert!(base.orientation.is_none());
    }

    #[test]
    fn mercator_position_needs_location_and_altitude() {
        let mut cam = FreeCameraOptions::new();
        assert!(cam.mercator_position().is_none());
        cam.set_location(LngLat::from_lat_lon(0.0, 0.0).unwrap());
        cam.set_altitude(0.0).unwrap();
        let m = cam.mercator_position().unwrap();
        assert!((m.x() - 0.5).abs() < 1e-12);
    }
}
