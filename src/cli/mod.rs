//! Runner for the `scene_setup` binary.
//!
//! Loads a [`SceneConfig`], applies flag overrides, runs the scene setup against
//! a [`MapView`] once its style has loaded, and emits the resulting style and
//! camera state as JSON.

pub mod args;

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use serde::Serialize;

use crate::assets::{AssetBundle, DirectoryBundle, StaticBundle};
use crate::backend::MapBackend;
use crate::camera::FreeCameraOptions;
use crate::config::SceneConfig;
use crate::error::{SceneError, SceneResult};
use crate::headless::{HeadlessMap, MapView};
use crate::scene::{SceneConfigurator, SetupReport};
use crate::style::StyleDocument;

pub use args::{parse_f64, CliError, SceneCliArgs, USAGE};

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("{0}")]
    Args(#[from] CliError),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// What the map looks like after setup.
#[derive(Debug, Clone, Serialize)]
pub struct SceneOutput {
    pub style: StyleDocument,
    pub free_camera: FreeCameraOptions,
    pub report: SetupReport,
}

/// Build the scene on a fresh headless view.
///
/// Setup runs from the view's load event, the same way an embedding renderer
/// would drive it.
pub fn build_scene<A: AssetBundle + 'static>(
    config: SceneConfig,
    assets: A,
) -> SceneResult<SceneOutput> {
    let mut view = MapView::new(config.camera_options()?);
    let style_uri = config.style_uri.clone();
    let configurator: Rc<RefCell<SceneConfigurator<HeadlessMap>>> =
        Rc::new(RefCell::new(SceneConfigurator::new(config, assets)));
    let outcome: Rc<RefCell<Option<SceneResult<SetupReport>>>> = Rc::new(RefCell::new(None));

    {
        let configurator = Rc::clone(&configurator);
        let outcome = Rc::clone(&outcome);
        view.on_map_loaded(move |map| {
            let mut scene = configurator.borrow_mut();
            scene.map_loaded(map);
            *outcome.borrow_mut() = Some(scene.setup());
        });
    }

    view.load_style(&style_uri)?;
    let report = outcome.borrow_mut().take().unwrap_or(Err(SceneError::NotReady))?;

    let map = view.map();
    let map = map.borrow();
    Ok(SceneOutput {
        style: map.style().clone(),
        free_camera: map.free_camera_options(),
        report,
    })
}

/// Parse `args`, run the setup and write the JSON result.
///
/// Returns `None` when only the usage text was requested.
pub fn run(args: &[String]) -> Result<Option<SceneOutput>, RunError> {
    let cli = SceneCliArgs::parse(args)?;
    if cli.help {
        println!("{USAGE}");
        return Ok(None);
    }

    let mut config = match &cli.config {
        Some(path) => SceneConfig::from_path(path)?,
        None => SceneConfig::default(),
    };
    cli.apply(&mut config);
    config.validate()?;

    let output = match &cli.assets {
        Some(dir) => build_scene(config, DirectoryBundle::new(dir))?,
        None => {
            log::warn!("no --assets directory given; model and icon lookups will fail");
            build_scene(config, StaticBundle::new())?
        }
    };

    write_output(&output, cli.output.as_deref())?;
    Ok(Some(output))
}

fn write_output(output: &SceneOutput, path: Option<&Path>) -> SceneResult<()> {
    let json = serde_json::to_string_pretty(output)?;
    match path {
        Some(path) => {
            fs::write(path, json)?;
            log::info!("wrote scene state to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
