//! Scene setup for a 3D map view.
//!
//! Once a map reports that its style has loaded, [`SceneConfigurator`] adds a
//! DEM terrain source with exaggeration, positions a free camera above a
//! coordinate, places a 3D model there and, optionally, a diagnostic pin.
//!
//! The renderer is reached only through [`MapBackend`]. [`HeadlessMap`] is an
//! in-memory implementation used by the `scene_setup` binary and the tests.

pub mod assets;
pub mod backend;
pub mod camera;
pub mod cli;
pub mod config;
pub mod error;
pub mod geo;
pub mod headless;
pub mod scene;
pub mod style;

pub use assets::{AssetBundle, DirectoryBundle, StaticBundle};
pub use backend::MapBackend;
pub use camera::{CameraError, CameraOptions, FreeCameraOptions};
pub use config::SceneConfig;
pub use error::{SceneError, SceneResult};
pub use geo::{GeoError, LngLat};
pub use headless::{HeadlessMap, MapView, SharedMap};
pub use scene::{Diagnostic, SceneConfigurator, SetupReport, SetupStep, TerrainStatus};
pub use style::{StyleDocument, StyleError};
