// src/assets.rs
// Asset bundles resolving named resources (3D models, icons) for scene setup
// RELEVANT FILES: src/scene/configurator.rs, src/style/icon.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use url::Url;

use crate::style::StyleImage;

/// Lookup of bundled resources by name.
pub trait AssetBundle {
    /// URI of `<name>.<extension>`, or `None` if the bundle lacks it.
    fn url_for_resource(&self, name: &str, extension: &str) -> Option<String>;

    /// Decoded icon image called `name`.
    fn image(&self, name: &str) -> Option<StyleImage>;
}

/// Resources stored as files below a root directory.
///
/// Icons are read from `<root>/<name>.png`.
#[derive(Debug, Clone)]
pub struct DirectoryBundle {
    root: PathBuf,
}

impl DirectoryBundle {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resource_path(&self, name: &str, extension: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, extension))
    }
}

impl AssetBundle for DirectoryBundle {
    fn url_for_resource(&self, name: &str, extension: &str) -> Option<String> {
        let path = self.resource_path(name, extension);
        if !path.is_file() {
            log::debug!("asset {} not found at {}", name, path.display());
            return None;
        }
        file_uri(&path)
    }

    fn image(&self, name: &str) -> Option<StyleImage> {
        let path = self.resource_path(name, "png");
        if !path.is_file() {
            return None;
        }
        match StyleImage::load_png(&path) {
            Ok(img) => Some(img),
            Err(e) => {
                log::warn!("failed to decode icon {}: {}", name, e);
                None
            }
        }
    }
}

/// Percent-encoded `file://` URI of an existing file.
fn file_uri(path: &Path) -> Option<String> {
    let absolute = match path.canonicalize() {
        Ok(p) => p,
        Err(_) if path.is_absolute() => path.to_path_buf(),
        Err(_) => std::env::current_dir().ok()?.join(path),
    };
    match Url::from_file_path(&absolute) {
        Ok(url) => Some(url.into()),
        Err(()) => {
            log::warn!("cannot express {} as a file URI", absolute.display());
            None
        }
    }
}

/// In-memory bundle, used by tests and embedders that ship assets elsewhere.
#[derive(Debug, Clone, Default)]
pub struct StaticBundle {
    urls: HashMap<String, String>,
    images: HashMap<String, StyleImage>,
}

impl StaticBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, name: &str, extension: &str, uri: &str) -> Self {
        self.urls
            .insert(format!("{}.{}", name, extension), uri.to_string());
        self
    }

    pub fn with_image(mut self, name: &str, image: StyleImage) -> Self {
        self.images.insert(name.to_string(), image);
        self
    }
}

impl AssetBundle for StaticBundle {
    fn url_for_resource(&self, name: &str, extension: &str) -> Option<String> {
        self.urls.get(&format!("{}.{}", name, extension)).cloned()
    }

    fn image(&self, name: &str) -> Option<StyleImage> {
        self.images.get(name).cloned()
    }
}
