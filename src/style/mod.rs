//! Style document model.
//!
//! This module provides a typed subset of the Mapbox GL Style Spec that scene
//! setup needs, and an in-memory document that backends mutate.
//!
//! Supported source types:
//! - `raster-dem`: terrain elevation tiles
//! - `raster`: imagery tiles (satellite base map)
//! - `geojson`: inline point features
//!
//! Supported layer types: `background`, `raster`, `symbol`, `model`.
//!
//! See <https://docs.mapbox.com/mapbox-gl-js/style-spec/> for full spec.

pub mod document;
pub mod expressions;
pub mod icon;
pub mod types;

pub use document::{parse_style, parse_style_str, StyleDocument, StyleError, StyleResult};
pub use expressions::{evaluate_expression, EvalContext, Expression};
pub use icon::StyleImage;
pub use types::{
    Anchor, BackgroundLayer, Feature, FeatureCollection, GeoJsonData, GeoJsonSource, Geometry,
    Layer, LayerCommon, ModelLayer, ModelLayout, ModelPaint, ModelType, PropertyValue,
    RasterDemSource, RasterLayer, RasterSource, Source, SymbolLayer, SymbolLayout, Terrain,
};
