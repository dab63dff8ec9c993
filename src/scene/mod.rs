//! Scene setup: terrain, free camera, 3D model and diagnostic marker.

pub mod configurator;
pub mod diagnostics;
pub mod state;

pub use configurator::{SceneConfigurator, SetupReport, TerrainStatus, HEADING_PROPERTY};
pub use diagnostics::{Diagnostic, Diagnostics, SetupStep};
pub use state::MapHandle;
