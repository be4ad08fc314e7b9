//! Error types for the embedded driver.

use std::fmt;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure while locating, downloading, or installing the native library.
///
/// Nothing is retried internally; retry policy belongs to the caller.
#[derive(Error, Debug)]
pub enum ProvisioningError {
    #[error("no per-user cache directory is available on this system")]
    NoCacheDir,

    #[error("artifact download failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("artifact install failed: {0}")]
    Io(#[from] std::io::Error),
}

/// An operation the engine itself rejected.
///
/// Carries the engine's full error document. The string form prefers the
/// `display` field, then `message`, then the whole document.
#[derive(Debug, Clone)]
pub struct EngineError {
    pub details: Value,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(display) = self.details.get("display").and_then(Value::as_str) {
            return f.write_str(display);
        }
        if let Some(message) = self.details.get("message").and_then(Value::as_str) {
            return f.write_str(message);
        }
        write!(f, "{}", self.details)
    }
}

impl std::error::Error for EngineError {}

#[derive(Error, Debug)]
pub enum Error {
    /// The native library could not be located or installed. Fatal to
    /// session construction.
    #[error("native library provisioning failed: {0}")]
    Provisioning(#[from] ProvisioningError),

    /// The native library could not be loaded into the process. Fatal for
    /// the process; there is no unload-and-retry.
    #[error("cannot load native library {}: {}", .path.display(), .source)]
    Load {
        path: PathBuf,
        source: libloading::Error,
    },

    /// The engine refused to open a database.
    #[error("cannot open database: error code {0}")]
    Open(i32),

    /// The engine reported an operation failure. Recoverable; inspect the
    /// attached document.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A protocol document could not be encoded or decoded.
    #[error("invalid protocol document: {0}")]
    Protocol(#[from] serde_json::Error),

    /// A request string contained an interior NUL byte and cannot cross the
    /// foreign boundary.
    #[error("invalid request string: {0}")]
    InvalidRequest(#[from] std::ffi::NulError),
}
