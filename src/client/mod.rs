//! Session API over one open engine instance.

mod builder;

pub use builder::CozoDbBuilder;

use serde_json::{Map, Value};

use crate::error::Result;
use crate::native::NativeBridge;
use crate::protocol::{self, ExportRelationsRequest, ImportFromBackupRequest, RelationRow};

/// One open engine instance, addressed by an opaque integer handle.
///
/// The handle is the sole capability used for foreign calls; it is owned
/// exclusively by this value and released exactly once, either by [`close`]
/// or by the drop guard. Operations are blocking and expected to be issued
/// sequentially; the driver takes no lock around the handle.
///
/// [`close`]: CozoDb::close
#[derive(Debug)]
pub struct CozoDb {
    id: i32,
    bridge: &'static NativeBridge,
    closed: bool,
}

impl CozoDb {
    /// Open a non-persistent in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        CozoDbBuilder::new().build()
    }

    /// Open a database with the given engine kind and storage path.
    ///
    /// `engine` may be "mem", "sqlite", "rocksdb" and others, depending on
    /// what the native library was compiled with; `path` is ignored by some
    /// engines.
    pub fn open(engine: &str, path: &str) -> Result<Self> {
        CozoDbBuilder::new().engine(engine).storage_path(path).build()
    }

    pub(crate) fn from_handle(bridge: &'static NativeBridge, id: i32) -> Self {
        Self {
            id,
            bridge,
            closed: false,
        }
    }

    /// Run a CozoScript query with no parameters.
    pub fn run(&self, script: &str) -> Result<Vec<RelationRow>> {
        self.run_with_params(script, &Map::new())
    }

    /// Run a CozoScript query with named parameters.
    pub fn run_with_params(
        &self,
        script: &str,
        params: &Map<String, Value>,
    ) -> Result<Vec<RelationRow>> {
        let params = serde_json::to_string(params)?;
        let raw = self.bridge.run_query(self.id, script, &params)?;
        protocol::decode_rows(&raw)
    }

    /// Export the named relations; returns the engine's data payload.
    pub fn export_relations<S: AsRef<str>>(&self, relations: &[S]) -> Result<Value> {
        let request = serde_json::to_string(&ExportRelationsRequest::new(relations))?;
        let raw = self.bridge.export_relations(self.id, &request)?;
        protocol::decode_data(&raw)
    }

    /// Import data in the format produced by [`export_relations`]. The
    /// target relations must already exist; triggers do not run.
    ///
    /// [`export_relations`]: CozoDb::export_relations
    pub fn import_relations(&self, payload: &Value) -> Result<()> {
        let raw = self.bridge.import_relations(self.id, &payload.to_string())?;
        protocol::decode_unit(&raw)
    }

    /// Back up the database to a file. The engine rejects a backup path that
    /// already holds data.
    pub fn backup(&self, path: &str) -> Result<()> {
        let raw = self.bridge.backup(self.id, path)?;
        protocol::decode_unit(&raw)
    }

    /// Restore the database from a backup file. The engine rejects a restore
    /// into a non-empty database.
    pub fn restore(&self, path: &str) -> Result<()> {
        let raw = self.bridge.restore(self.id, path)?;
        protocol::decode_unit(&raw)
    }

    /// Import the named relations from a backup file. The relations must
    /// already exist; triggers do not run.
    pub fn import_relations_from_backup<S: AsRef<str>>(
        &self,
        path: &str,
        relations: &[S],
    ) -> Result<()> {
        let request = serde_json::to_string(&ImportFromBackupRequest::new(path, relations))?;
        let raw = self.bridge.import_from_backup(self.id, &request)?;
        protocol::decode_unit(&raw)
    }

    /// Close the database and report the engine's status.
    ///
    /// Consumes the session, so no operation can follow; the drop guard will
    /// not close a second time.
    pub fn close(mut self) -> bool {
        self.closed = true;
        self.bridge.close(self.id)
    }
}

impl Drop for CozoDb {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if !self.bridge.close(self.id) {
            tracing::warn!("engine reported failure closing handle {}", self.id);
        }
    }
}
