// src/geo/coordinate.rs
// Validated geographic coordinate (WGS84 degrees)
// RELEVANT FILES: src/geo/mercator.rs, src/config.rs

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for geographic operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("latitude must be finite and in [-90, 90], got {0}")]
    Latitude(f64),

    #[error("longitude must be finite and in [-180, 180], got {0}")]
    Longitude(f64),
}

/// A longitude/latitude pair in degrees.
///
/// Constructed through [`LngLat::from_lat_lon`], which enforces the coordinate ranges.
/// Serialized as `[lon, lat]`, the GeoJSON position order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    lon: f64,
    lat: f64,
}

impl LngLat {
    /// 0°N 0°E.
    pub const NULL_ISLAND: LngLat = LngLat { lon: 0.0, lat: 0.0 };

    /// Latitude first, as coordinates are usually quoted.
    pub fn from_lat_lon(lat: f64, lon: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::Latitude(lat));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(GeoError::Longitude(lon));
        }
        Ok(Self { lon, lat })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// GeoJSON position order.
    pub fn to_position(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl TryFrom<[f64; 2]> for LngLat {
    type Error = GeoError;

    fn try_from(position: [f64; 2]) -> Result<Self, Self::Error> {
        LngLat::from_lat_lon(position[1], position[0])
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(value: LngLat) -> Self {
        value.to_position()
    }
}

impl std::fmt::Display for LngLat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_range_bounds() {
        assert!(LngLat::from_lat_lon(90.0, 180.0).is_ok());
        assert!(LngLat::from_lat_lon(-90.0, -180.0).is_ok());
        let c = LngLat::from_lat_lon(42.97330, -75.085930).unwrap();
        assert_eq!(c.lat(), 42.97330);
        assert_eq!(c.lon(), -75.085930);
    }

    #[test]
    fn rejects_out_of_range_and_nan() {
        assert_eq!(LngLat::from_lat_lon(90.5, 0.0), Err(GeoError::Latitude(90.5)));
        assert_eq!(LngLat::from_lat_lon(0.0, -180.1), Err(GeoError::Longitude(-180.1)));
        assert!(LngLat::from_lat_lon(f64::NAN, 0.0).is_err());
        assert!(LngLat::from_lat_lon(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn serializes_in_geojson_order() {
        let c = LngLat::from_lat_lon(10.0, 20.0).unwrap();
        assert_eq!(serde_json::to_string(&c).unwrap(), "[20.0,10.0]");
        let back: LngLat = serde_json::from_str("[20.0,10.0]").unwrap();
        assert_eq!(back, c);
        assert!(serde_json::from_str::<LngLat>("[0.0,95.0]").is_err());
    }
}
