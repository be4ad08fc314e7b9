//! Configuration and construction of a [`CozoDb`] session.

use std::path::PathBuf;

use serde_json::{Map, Value};

use super::CozoDb;
use crate::error::{Error, Result};
use crate::native;
use crate::provision;

/// Native artifact release the crate is built against. The crate version
/// tracks the engine release, so this doubles as the default artifact
/// version; [`CozoDbBuilder::artifact_version`] pins a different one.
pub(crate) const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configures and opens a [`CozoDb`] session.
///
/// Defaults to an in-memory engine with no storage path and empty options.
pub struct CozoDbBuilder {
    engine: String,
    storage_path: String,
    options: Value,
    version: String,
    cache_dir: Option<PathBuf>,
    library_path: Option<PathBuf>,
}

impl Default for CozoDbBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CozoDbBuilder {
    pub fn new() -> Self {
        Self {
            engine: "mem".to_string(),
            storage_path: String::new(),
            options: Value::Object(Map::new()),
            version: ENGINE_VERSION.to_string(),
            cache_dir: None,
            library_path: None,
        }
    }

    /// Storage backend selector, e.g. "mem", "sqlite" or "rocksdb".
    pub fn engine(mut self, kind: &str) -> Self {
        self.engine = kind.to_string();
        self
    }

    /// Path to the storage file or directory; its meaning depends on the
    /// engine kind and some engines ignore it.
    pub fn storage_path(mut self, path: &str) -> Self {
        self.storage_path = path.to_string();
        self
    }

    /// Engine-dependent options document passed verbatim to `open`.
    pub fn options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }

    /// Pin a specific native artifact release instead of the crate default.
    pub fn artifact_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Store downloaded artifacts under `dir` instead of the per-user cache
    /// directory.
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Use a native library already present at `path`, skipping provisioning
    /// entirely.
    pub fn library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.library_path = Some(path.into());
        self
    }

    /// Provision the native library if needed, load it, and open a session.
    ///
    /// A negative handle from the engine fails construction before any
    /// session exists, so a failed open can never be followed by a close.
    pub fn build(self) -> Result<CozoDb> {
        let library_path = match self.library_path {
            Some(path) => path,
            None => provision::resolve(&self.version, self.cache_dir.as_deref())?,
        };
        let bridge = native::ensure_loaded(&library_path)?;

        let options = self.options.to_string();
        let id = bridge.open(&self.engine, &self.storage_path, &options)?;
        if id < 0 {
            return Err(Error::Open(id));
        }
        Ok(CozoDb::from_handle(bridge, id))
    }
}
