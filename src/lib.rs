//! Embedded CozoDB for Rust.
//!
//! On first use the driver downloads the platform-specific native engine
//! library into a per-user cache, loads it into the process, and exposes a
//! session-based API over the engine's C entry points. Everything crossing
//! the boundary is a JSON document; the engine's `ok` discriminant becomes
//! a [`Result`].
//!
//! # Example
//!
//! ```no_run
//! use cozo_embedded::CozoDb;
//!
//! fn main() -> Result<(), cozo_embedded::Error> {
//!     let db = CozoDb::open_in_memory()?;
//!     for row in db.run("?[] <- [[1, 2, 3]]")? {
//!         println!("{}", row);
//!     }
//!     db.close();
//!     Ok(())
//! }
//! ```
//!
//! # Named parameters and header lookup
//!
//! ```no_run
//! use cozo_embedded::CozoDb;
//! use serde_json::{json, Map};
//!
//! # fn main() -> Result<(), cozo_embedded::Error> {
//! let db = CozoDb::open_in_memory()?;
//!
//! let mut params = Map::new();
//! params.insert("limit".to_string(), json!(10));
//! let rows = db.run_with_params("?[a] := a in [1, 2, 3], a < $limit", &params)?;
//! for row in &rows {
//!     let a = row.get_named("a");
//!     println!("a = {:?}", a);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Persistent engines and pinned releases
//!
//! ```no_run
//! use cozo_embedded::CozoDbBuilder;
//!
//! # fn main() -> Result<(), cozo_embedded::Error> {
//! let db = CozoDbBuilder::new()
//!     .engine("rocksdb")
//!     .storage_path("/var/lib/myapp/cozo")
//!     .artifact_version("0.7.5")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod platform;
pub mod protocol;
pub mod provision;

mod native;

pub use client::{CozoDb, CozoDbBuilder};
pub use error::{EngineError, Error, ProvisioningError, Result};
pub use platform::{Arch, Os, PlatformTag};
pub use protocol::{RelationHeader, RelationRow};
pub use provision::ArtifactDescriptor;

/// Load the native engine library at `path` into the process if none is
/// loaded yet. Idempotent; sessions opened afterwards reuse the loaded
/// library. Useful for preloading at startup or for injecting a library in
/// tests instead of provisioning one.
pub fn ensure_loaded(path: &std::path::Path) -> Result<()> {
    native::ensure_loaded(path).map(|_| ())
}
