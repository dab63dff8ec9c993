//! Contract between scene setup and a map renderer.
//!
//! A backend owns the live style and camera. Scene setup only ever talks to it
//! through this trait, so any renderer that can add sources and layers, set
//! terrain, register images and models, and take a free camera pose can host a
//! scene.

use crate::camera::{CameraError, FreeCameraOptions};
use crate::style::{GeoJsonData, Layer, Source, StyleImage, StyleResult, Terrain};

pub trait MapBackend {
    /// URI of the loaded base style, if any.
    fn style_uri(&self) -> Option<&str>;

    /// Add a source. Backends must reject an existing id with
    /// `StyleError::DuplicateSource` rather than replace it.
    fn add_source(&mut self, id: &str, source: Source) -> StyleResult<()>;

    fn remove_source(&mut self, id: &str) -> StyleResult<()>;

    fn source_exists(&self, id: &str) -> bool;

    /// A copy of the source with this id.
    fn source(&self, id: &str) -> Option<Source>;

    /// Replace the data of an existing GeoJSON source.
    fn update_geojson_source(&mut self, id: &str, data: GeoJsonData) -> StyleResult<()>;

    fn add_layer(&mut self, layer: Layer) -> StyleResult<()>;

    fn layer_exists(&self, id: &str) -> bool;

    /// Set one paint property of an existing layer. `value` is the style JSON
    /// of the property and must suit the layer's type.
    fn set_paint_property(
        &mut self,
        layer_id: &str,
        name: &str,
        value: serde_json::Value,
    ) -> StyleResult<()>;

    /// Set or clear terrain.
    fn set_terrain(&mut self, terrain: Option<Terrain>) -> StyleResult<()>;

    fn terrain(&self) -> Option<Terrain>;

    fn add_image(&mut self, id: &str, image: StyleImage) -> StyleResult<()>;

    fn image_exists(&self, id: &str) -> bool;

    /// Register a 3D model asset under `model_id`.
    fn add_style_model(&mut self, model_id: &str, uri: &str) -> StyleResult<()>;

    fn style_model_exists(&self, model_id: &str) -> bool;

    /// Current free camera pose.
    fn free_camera_options(&self) -> FreeCameraOptions;

    /// Commit a free camera pose. Components left unset keep their value.
    fn set_free_camera_options(&mut self, options: FreeCameraOptions) -> Result<(), CameraError>;
}
