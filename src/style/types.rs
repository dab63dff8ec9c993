//! Typed subset of the Mapbox GL style document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::geo::LngLat;
use crate::style::expressions::{EvalContext, Expression};

/// A style property: either a constant or a data-driven expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue<T> {
    Constant(T),
    Expression(Expression),
}

impl<T> PropertyValue<T> {
    pub fn constant(&self) -> Option<&T> {
        match self {
            PropertyValue::Constant(v) => Some(v),
            PropertyValue::Expression(_) => None,
        }
    }

    pub fn expression(&self) -> Option<&Expression> {
        match self {
            PropertyValue::Constant(_) => None,
            PropertyValue::Expression(e) => Some(e),
        }
    }
}

impl<T> From<T> for PropertyValue<T> {
    fn from(value: T) -> Self {
        PropertyValue::Constant(value)
    }
}

impl PropertyValue<String> {
    /// Resolve against a feature's properties.
    pub fn resolve(&self, ctx: &EvalContext) -> Option<String> {
        match self {
            PropertyValue::Constant(s) => Some(s.clone()),
            PropertyValue::Expression(e) => e.evaluate_string(ctx),
        }
    }
}

// ---------- Sources ----------

/// A style data source, keyed by id in the style document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Source {
    #[serde(rename = "raster-dem")]
    RasterDem(RasterDemSource),
    #[serde(rename = "raster")]
    Raster(RasterSource),
    #[serde(rename = "geojson")]
    GeoJson(GeoJsonSource),
}

impl Source {
    pub fn kind(&self) -> &'static str {
        match self {
            Source::RasterDem(_) => "raster-dem",
            Source::Raster(_) => "raster",
            Source::GeoJson(_) => "geojson",
        }
    }

    pub fn as_geojson(&self) -> Option<&GeoJsonSource> {
        match self {
            Source::GeoJson(s) => Some(s),
            _ => None,
        }
    }
}

/// Raster elevation tiles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RasterDemSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiles: Option<Vec<String>>,
    #[serde(rename = "tileSize", default, skip_serializing_if = "Option::is_none")]
    pub tile_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxzoom: Option<f64>,
}

/// Raster imagery tiles (satellite base layer).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RasterSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiles: Option<Vec<String>>,
    #[serde(rename = "tileSize", default, skip_serializing_if = "Option::is_none")]
    pub tile_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonSource {
    pub data: GeoJsonData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxzoom: Option<f64>,
}

impl GeoJsonSource {
    pub fn new(data: GeoJsonData) -> Self {
        Self {
            data,
            maxzoom: None,
        }
    }
}

/// Inline GeoJSON payload of a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeoJsonData {
    Geometry(Geometry),
    FeatureCollection(FeatureCollection),
    Feature(Feature),
}

impl GeoJsonData {
    /// All features, with a bare geometry treated as a property-less feature.
    pub fn features(&self) -> Vec<Feature> {
        match self {
            GeoJsonData::Geometry(g) => vec![Feature::new(g.clone())],
            GeoJsonData::Feature(f) => vec![f.clone()],
            GeoJsonData::FeatureCollection(fc) => fc.features.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: LngLat },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Feature {
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            properties: Map::new(),
        }
    }

    pub fn point(coordinates: LngLat) -> Self {
        Self::new(Geometry::Point { coordinates })
    }

    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn coordinates(&self) -> LngLat {
        match &self.geometry {
            Geometry::Point { coordinates } => *coordinates,
        }
    }
}

// ---------- Terrain ----------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terrain {
    pub source: String,
    #[serde(default = "default_exaggeration")]
    pub exaggeration: PropertyValue<f64>,
}

fn default_exaggeration() -> PropertyValue<f64> {
    PropertyValue::Constant(1.0)
}

impl Terrain {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            exaggeration: default_exaggeration(),
        }
    }

    pub fn with_exaggeration(mut self, exaggeration: f64) -> Self {
        self.exaggeration = PropertyValue::Constant(exaggeration);
        self
    }
}

// ---------- Layers ----------

/// A single style layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Layer {
    Background(BackgroundLayer),
    Raster(RasterLayer),
    Symbol(SymbolLayer),
    Model(ModelLayer),
}

impl Layer {
    pub fn id(&self) -> &str {
        &self.common().id
    }

    /// Source id referenced by the layer; background layers have none.
    pub fn source(&self) -> Option<&str> {
        match self {
            Layer::Background(_) => None,
            Layer::Raster(l) => Some(&l.source),
            Layer::Symbol(l) => Some(&l.source),
            Layer::Model(l) => Some(&l.source),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Layer::Background(_) => "background",
            Layer::Raster(_) => "raster",
            Layer::Symbol(_) => "symbol",
            Layer::Model(_) => "model",
        }
    }

    pub fn common(&self) -> &LayerCommon {
        match self {
            Layer::Background(l) => &l.common,
            Layer::Raster(l) => &l.common,
            Layer::Symbol(l) => &l.common,
            Layer::Model(l) => &l.common,
        }
    }

    /// Check if layer passes zoom range filter.
    pub fn in_zoom_range(&self, zoom: f64) -> bool {
        let c = self.common();
        let min_ok = c.minzoom.map(|z| zoom >= z).unwrap_or(true);
        let max_ok = c.maxzoom.map(|z| zoom <= z).unwrap_or(true);
        min_ok && max_ok
    }

    pub fn as_model(&self) -> Option<&ModelLayer> {
        match self {
            Layer::Model(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&SymbolLayer> {
        match self {
            Layer::Symbol(l) => Some(l),
            _ => None,
        }
    }
}

/// Fields shared by every layer type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayerCommon {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minzoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxzoom: Option<f64>,
}

impl LayerCommon {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundLayer {
    #[serde(flatten)]
    pub common: LayerCommon,
    #[serde(default)]
    pub paint: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterLayer {
    #[serde(flatten)]
    pub common: LayerCommon,
    pub source: String,
}

impl RasterLayer {
    pub fn new(id: &str, source: &str) -> Self {
        Self {
            common: LayerCommon::new(id),
            source: source.to_string(),
        }
    }
}

/// Icon anchor positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    Center,
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SymbolLayout {
    #[serde(rename = "icon-image", default, skip_serializing_if = "Option::is_none")]
    pub icon_image: Option<PropertyValue<String>>,
    #[serde(rename = "icon-anchor", default, skip_serializing_if = "Option::is_none")]
    pub icon_anchor: Option<PropertyValue<Anchor>>,
    #[serde(rename = "icon-offset", default, skip_serializing_if = "Option::is_none")]
    pub icon_offset: Option<PropertyValue<[f64; 2]>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolLayer {
    #[serde(flatten)]
    pub common: LayerCommon,
    pub source: String,
    #[serde(default)]
    pub layout: SymbolLayout,
}

impl SymbolLayer {
    pub fn new(id: &str, source: &str) -> Self {
        Self {
            common: LayerCommon::new(id),
            source: source.to_string(),
            layout: SymbolLayout::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    #[serde(rename = "common-3d")]
    Common3d,
    #[serde(rename = "location-indicator")]
    LocationIndicator,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelLayout {
    #[serde(rename = "model-id", default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<PropertyValue<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelPaint {
    #[serde(rename = "model-type", default, skip_serializing_if = "Option::is_none")]
    pub model_type: Option<PropertyValue<ModelType>>,
    #[serde(rename = "model-scale", default, skip_serializing_if = "Option::is_none")]
    pub model_scale: Option<PropertyValue<[f64; 3]>>,
    #[serde(rename = "model-translation", default, skip_serializing_if = "Option::is_none")]
    pub model_translation: Option<PropertyValue<[f64; 3]>>,
    #[serde(rename = "model-rotation", default, skip_serializing_if = "Option::is_none")]
    pub model_rotation: Option<PropertyValue<[f64; 3]>>,
    #[serde(
        rename = "model-cutoff-fade-range",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub model_cutoff_fade_range: Option<PropertyValue<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelLayer {
    #[serde(flatten)]
    pub common: LayerCommon,
    pub source: String,
    #[serde(default)]
    pub layout: ModelLayout,
    #[serde(default)]
    pub paint: ModelPaint,
}

impl ModelLayer {
    pub fn new(id: &str, source: &str) -> Self {
        Self {
            common: LayerCommon::new(id),
            source: source.to_string(),
            layout: ModelLayout::default(),
            paint: ModelPaint::default(),
        }
    }

    pub fn translation(&self) -> Option<[f64; 3]> {
        self.paint
            .model_translation
            .as_ref()
            .and_then(|v| v.constant().copied())
    }

    pub fn rotation(&self) -> Option<[f64; 3]> {
        self.paint
            .model_rotation
            .as_ref()
            .and_then(|v| v.constant().copied())
    }
}
