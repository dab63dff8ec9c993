//! In-memory style document: the mutable state a map renderer draws from.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::style::icon::StyleImage;
use crate::style::types::{GeoJsonData, Layer, Source, Terrain};

/// Error type for style mutation and parsing.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid style: {0}")]
    Invalid(String),
    #[error("Invalid id: {0}")]
    InvalidId(&'static str),
    #[error("Source '{0}' already exists")]
    DuplicateSource(String),
    #[error("Layer '{0}' already exists")]
    DuplicateLayer(String),
    #[error("Image '{0}' already exists")]
    DuplicateImage(String),
    #[error("Model '{0}' already exists")]
    DuplicateModel(String),
    #[error("Source '{0}' does not exist")]
    MissingSource(String),
    #[error("Layer '{0}' does not exist")]
    MissingLayer(String),
    #[error("Source '{source_id}' is still used by '{user}'")]
    SourceInUse { source_id: String, user: String },
    #[error("Source '{id}' is of type '{found}', expected '{expected}'")]
    WrongSourceType {
        id: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Invalid image: {0}")]
    InvalidImage(String),
}

/// Result type alias for style operations
pub type StyleResult<T> = Result<T, StyleError>;

/// Style document (version 8 of the GL style format).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    sources: BTreeMap<String, Source>,
    #[serde(default)]
    layers: Vec<Layer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    terrain: Option<Terrain>,
    /// Model id to model URI.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    models: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    images: BTreeMap<String, StyleImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyphs: Option<String>,
}

fn default_version() -> u32 {
    8
}

fn check_id(id: &str) -> StyleResult<()> {
    if id.trim().is_empty() {
        return Err(StyleError::InvalidId("ids must be non-empty"));
    }
    Ok(())
}

impl StyleDocument {
    pub fn new(name: &str) -> Self {
        Self {
            version: default_version(),
            name: name.to_string(),
            sources: BTreeMap::new(),
            layers: Vec::new(),
            terrain: None,
            models: BTreeMap::new(),
            images: BTreeMap::new(),
            sprite: None,
            glyphs: None,
        }
    }

    // ---------- sources ----------

    /// Add a source. An existing id is rejected, never overwritten.
    pub fn add_source(&mut self, id: &str, source: Source) -> StyleResult<()> {
        check_id(id)?;
        if self.sources.contains_key(id) {
            return Err(StyleError::DuplicateSource(id.to_string()));
        }
        self.sources.insert(id.to_string(), source);
        Ok(())
    }

    /// Remove a source that no layer or terrain references.
    pub fn remove_source(&mut self, id: &str) -> StyleResult<Source> {
        if !self.sources.contains_key(id) {
            return Err(StyleError::MissingSource(id.to_string()));
        }
        if let Some(layer) = self.layers.iter().find(|l| l.source() == Some(id)) {
            return Err(StyleError::SourceInUse {
                source_id: id.to_string(),
                user: layer.id().to_string(),
            });
        }
        if self.terrain.as_ref().map(|t| t.source == id).unwrap_or(false) {
            return Err(StyleError::SourceInUse {
                source_id: id.to_string(),
                user: "terrain".to_string(),
            });
        }
        self.sources
            .remove(id)
            .ok_or_else(|| StyleError::MissingSource(id.to_string()))
    }

    /// Replace the data of an existing GeoJSON source.
    pub fn update_geojson_source(&mut self, id: &str, data: GeoJsonData) -> StyleResult<()> {
        match self.sources.get_mut(id) {
            None => Err(StyleError::MissingSource(id.to_string())),
            Some(Source::GeoJson(source)) => {
                source.data = data;
                Ok(())
            }
            Some(other) => Err(StyleError::WrongSourceType {
                id: id.to_string(),
                expected: "geojson",
                found: other.kind(),
            }),
        }
    }

    pub fn source(&self, id: &str) -> Option<&Source> {
        self.sources.get(id)
    }

    pub fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    pub fn sources(&self) -> impl Iterator<Item = (&str, &Source)> {
        self.sources.iter().map(|(k, v)| (k.as_str(), v))
    }

    // ---------- layers ----------

    /// Append a layer on top. Its source must already exist.
    pub fn add_layer(&mut self, layer: Layer) -> StyleResult<()> {
        check_id(layer.id())?;
        if self.has_layer(layer.id()) {
            return Err(StyleError::DuplicateLayer(layer.id().to_string()));
        }
        if let Some(source) = layer.source() {
            if !self.sources.contains_key(source) {
                return Err(StyleError::MissingSource(source.to_string()));
            }
        }
        self.layers.push(layer);
        Ok(())
    }

    pub fn remove_layer(&mut self, id: &str) -> StyleResult<Layer> {
        let idx = self
            .layers
            .iter()
            .position(|l| l.id() == id)
            .ok_or_else(|| StyleError::MissingLayer(id.to_string()))?;
        Ok(self.layers.remove(idx))
    }

    /// Set one paint property of a layer, e.g. `model-translation`.
    ///
    /// The value must fit the property's type. Layers without that paint
    /// property reject it and stay unchanged.
    pub fn set_paint_property(
        &mut self,
        layer_id: &str,
        name: &str,
        value: serde_json::Value,
    ) -> StyleResult<()> {
        let idx = self
            .layers
            .iter()
            .position(|l| l.id() == layer_id)
            .ok_or_else(|| StyleError::MissingLayer(layer_id.to_string()))?;

        let mut json = serde_json::to_value(&self.layers[idx])?;
        let paint = json
            .as_object_mut()
            .map(|layer| layer.entry("paint").or_insert_with(|| serde_json::json!({})))
            .and_then(serde_json::Value::as_object_mut)
            .ok_or_else(|| StyleError::Invalid(format!("layer '{}' has no paint", layer_id)))?;
        paint.insert(name.to_string(), value);

        let updated: Layer = serde_json::from_value(json)?;
        let applied = serde_json::to_value(&updated)?;
        if applied.pointer(&format!("/paint/{}", name)).is_none() {
            return Err(StyleError::Invalid(format!(
                "layer '{}' has no paint property '{}'",
                layer_id, name
            )));
        }
        self.layers[idx] = updated;
        Ok(())
    }

    /// Find a layer by ID.
    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id() == id)
    }

    pub fn has_layer(&self, id: &str) -> bool {
        self.layer(id).is_some()
    }

    /// Layers in draw order, bottom first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Get all layers of a specific type.
    pub fn layers_by_kind(&self, kind: &str) -> Vec<&Layer> {
        self.layers.iter().filter(|l| l.kind() == kind).collect()
    }

    // ---------- terrain ----------

    /// Set or clear terrain. The source must be a raster-dem source.
    pub fn set_terrain(&mut self, terrain: Option<Terrain>) -> StyleResult<()> {
        if let Some(t) = &terrain {
            match self.sources.get(&t.source) {
                None => return Err(StyleError::MissingSource(t.source.clone())),
                Some(Source::RasterDem(_)) => {}
                Some(other) => {
                    return Err(StyleError::WrongSourceType {
                        id: t.source.clone(),
                        expected: "raster-dem",
                        found: other.kind(),
                    })
                }
            }
        }
        self.terrain = terrain;
        Ok(())
    }

    pub fn terrain(&self) -> Option<&Terrain> {
        self.terrain.as_ref()
    }

    // ---------- images & models ----------

    pub fn add_image(&mut self, id: &str, image: StyleImage) -> StyleResult<()> {
        check_id(id)?;
        if self.images.contains_key(id) {
            return Err(StyleError::DuplicateImage(id.to_string()));
        }
        self.images.insert(id.to_string(), image);
        Ok(())
    }

    pub fn image(&self, id: &str) -> Option<&StyleImage> {
        self.images.get(id)
    }

    pub fn has_image(&self, id: &str) -> bool {
        self.images.contains_key(id)
    }

    pub fn add_model(&mut self, id: &str, uri: &str) -> StyleResult<()> {
        check_id(id)?;
        if uri.trim().is_empty() {
            return Err(StyleError::Invalid(format!("model '{}' has an empty uri", id)));
        }
        if self.models.contains_key(id) {
            return Err(StyleError::DuplicateModel(id.to_string()));
        }
        self.models.insert(id.to_string(), uri.to_string());
        Ok(())
    }

    pub fn model_uri(&self, id: &str) -> Option<&str> {
        self.models.get(id).map(|s| s.as_str())
    }

    pub fn has_model(&self, id: &str) -> bool {
        self.models.contains_key(id)
    }

    // ---------- serialization ----------

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Check cross references: version, layer sources, terrain source.
    pub fn validate(&self) -> StyleResult<()> {
        if self.version != 8 {
            return Err(StyleError::Invalid(format!(
                "Unsupported style version: {} (expected 8)",
                self.version
            )));
        }
        for layer in &self.layers {
            if let Some(source) = layer.source() {
                if !self.sources.contains_key(source) {
                    return Err(StyleError::Invalid(format!(
                        "layer '{}' references missing source '{}'",
                        layer.id(),
                        source
                    )));
                }
            }
        }
        if let Some(t) = &self.terrain {
            if !matches!(self.sources.get(&t.source), Some(Source::RasterDem(_))) {
                return Err(StyleError::Invalid(format!(
                    "terrain references '{}', which is not a raster-dem source",
                    t.source
                )));
            }
        }
        Ok(())
    }
}

/// Parse a style JSON file.
pub fn parse_style(path: &Path) -> StyleResult<StyleDocument> {
    let content = fs::read_to_string(path)?;
    parse_style_str(&content)
}

/// Parse a style from a JSON string.
pub fn parse_style_str(json: &str) -> StyleResult<StyleDocument> {
    let doc: StyleDocument = serde_json::from_str(json)?;
    doc.validate()?;
    Ok(doc)
}
