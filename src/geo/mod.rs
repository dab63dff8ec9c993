// src/geo/mod.rs
// Geographic coordinates and Web-Mercator helpers
// RELEVANT FILES: src/geo/coordinate.rs, src/geo/mercator.rs, src/camera/mod.rs

pub mod coordinate;
pub mod mercator;

pub use coordinate::{GeoError, LngLat};
pub use mercator::{meter_in_mercator_units, MercatorCoordinate, EARTH_CIRCUMFERENCE_M};
