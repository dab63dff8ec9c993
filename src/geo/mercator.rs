// src/geo/mercator.rs
// Web-Mercator world coordinates used by the free camera
// RELEVANT FILES: src/geo/coordinate.rs, src/camera/mod.rs

use glam::DVec3;

use super::coordinate::LngLat;

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Equatorial circumference derived from [`EARTH_RADIUS_M`].
pub const EARTH_CIRCUMFERENCE_M: f64 = 2.0 * std::f64::consts::PI * EARTH_RADIUS_M;

/// Latitude limit of the square Web-Mercator world.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_6;

/// A position in the unit Web-Mercator square.
///
/// `x` grows east, `y` grows south, both in `[0, 1]`. `z` is height in the
/// same units, so one mercator unit spans the whole world at the equator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercatorCoordinate(pub DVec3);

impl MercatorCoordinate {
    /// Project a coordinate and altitude in meters.
    ///
    /// Latitudes beyond the Mercator limit are clamped.
    pub fn from_lng_lat(location: LngLat, altitude_m: f64) -> Self {
        let lat = location
            .lat()
            .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
        let x = mercator_x_from_lng(location.lon());
        let y = mercator_y_from_lat(lat);
        let z = altitude_m * meter_in_mercator_units(lat);
        Self(DVec3::new(x, y, z))
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }

    pub fn z(&self) -> f64 {
        self.0.z
    }

    pub fn lng(&self) -> f64 {
        self.0.x * 360.0 - 180.0
    }

    pub fn lat(&self) -> f64 {
        let y2 = 180.0 - self.0.y * 360.0;
        360.0 / std::f64::consts::PI * (y2 * std::f64::consts::PI / 180.0).exp().atan() - 90.0
    }

    /// Height in meters at this coordinate's latitude.
    pub fn altitude_m(&self) -> f64 {
        let units = meter_in_mercator_units(self.lat());
        if units == 0.0 {
            0.0
        } else {
            self.0.z / units
        }
    }
}

fn mercator_x_from_lng(lng: f64) -> f64 {
    (180.0 + lng) / 360.0
}

fn mercator_y_from_lat(lat: f64) -> f64 {
    let lat_rad = lat.to_radians();
    (180.0
        - (180.0 / std::f64::consts::PI)
            * (std::f64::consts::FRAC_PI_4 + lat_rad / 2.0).tan().ln())
        / 360.0
}

/// Number of mercator units covered by one meter at `lat`.
pub fn meter_in_mercator_units(lat: f64) -> f64 {
    let circumference = EARTH_CIRCUMFERENCE_M * lat.to_radians().cos();
    if circumference <= f64::EPSILON {
        0.0
    } else {
        1.0 / circumference
    }
}
