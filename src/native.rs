//! Process-wide loader for the native engine library and its entry points.
//!
//! The library is loaded at most once per process. Loading an already-loaded
//! library is a no-op; a load failure (missing file, missing symbol, ABI
//! mismatch) is fatal for the process, with no unload-and-retry.

use std::ffi::{c_char, CStr, CString};
use std::path::Path;
use std::sync::OnceLock;

use libloading::Library;

use crate::error::{Error, Result};

type OpenFn = unsafe extern "C" fn(*const c_char, *const c_char, *const c_char) -> i32;
type CloseFn = unsafe extern "C" fn(i32) -> bool;
type QueryFn = unsafe extern "C" fn(i32, *const c_char, *const c_char) -> *mut c_char;
type DocFn = unsafe extern "C" fn(i32, *const c_char) -> *mut c_char;
type FreeFn = unsafe extern "C" fn(*mut c_char);

/// Entry points resolved from the engine library, all keyed by an integer
/// session handle and exchanging only primitive strings.
#[derive(Debug)]
struct Symbols {
    open_db: OpenFn,
    close_db: CloseFn,
    run_query: QueryFn,
    export_relations: DocFn,
    import_relations: DocFn,
    backup_db: DocFn,
    restore_db: DocFn,
    import_from_backup: DocFn,
    free_str: FreeFn,
}

/// The loaded engine library and its resolved entry points.
#[derive(Debug)]
pub(crate) struct NativeBridge {
    symbols: Symbols,
    // Keeps the library mapped for the lifetime of the process; the function
    // pointers in `symbols` are only valid while this handle is alive.
    _lib: Library,
}

static BRIDGE: OnceLock<NativeBridge> = OnceLock::new();

/// Load the engine library at `path` unless one is already loaded.
///
/// The first successful load wins for the whole process; later calls return
/// the existing bridge regardless of `path`. A lost race between two
/// first-time callers drops the duplicate handle, which is harmless: the
/// dynamic loader reference-counts the mapping.
pub(crate) fn ensure_loaded(path: &Path) -> Result<&'static NativeBridge> {
    if let Some(bridge) = BRIDGE.get() {
        return Ok(bridge);
    }
    let bridge = NativeBridge::load(path)?;
    Ok(BRIDGE.get_or_init(|| bridge))
}

impl NativeBridge {
    fn load(path: &Path) -> Result<Self> {
        let load_err = |source| Error::Load {
            path: path.to_path_buf(),
            source,
        };

        // SAFETY: the symbol names and signatures are the engine's published
        // C ABI; resolving them against anything else fails here instead of
        // at call time.
        unsafe {
            let lib = Library::new(path).map_err(load_err)?;
            let symbols = Symbols {
                open_db: *lib.get::<OpenFn>(b"cozo_open_db\0").map_err(load_err)?,
                close_db: *lib.get::<CloseFn>(b"cozo_close_db\0").map_err(load_err)?,
                run_query: *lib.get::<QueryFn>(b"cozo_run_query\0").map_err(load_err)?,
                export_relations: *lib
                    .get::<DocFn>(b"cozo_export_relations\0")
                    .map_err(load_err)?,
                import_relations: *lib
                    .get::<DocFn>(b"cozo_import_relations\0")
                    .map_err(load_err)?,
                backup_db: *lib.get::<DocFn>(b"cozo_backup_db\0").map_err(load_err)?,
                restore_db: *lib.get::<DocFn>(b"cozo_restore_db\0").map_err(load_err)?,
                import_from_backup: *lib
                    .get::<DocFn>(b"cozo_import_from_backup\0")
                    .map_err(load_err)?,
                free_str: *lib.get::<FreeFn>(b"cozo_free_str\0").map_err(load_err)?,
            };
            tracing::debug!("native library loaded from {}", path.display());
            Ok(NativeBridge { symbols, _lib: lib })
        }
    }

    /// Open a database; a negative return value is an engine error code.
    pub(crate) fn open(&self, engine: &str, path: &str, options: &str) -> Result<i32> {
        let engine = CString::new(engine)?;
        let path = CString::new(path)?;
        let options = CString::new(options)?;
        Ok(unsafe { (self.symbols.open_db)(engine.as_ptr(), path.as_ptr(), options.as_ptr()) })
    }

    pub(crate) fn close(&self, id: i32) -> bool {
        unsafe { (self.symbols.close_db)(id) }
    }

    pub(crate) fn run_query(&self, id: i32, script: &str, params: &str) -> Result<String> {
        let script = CString::new(script)?;
        let params = CString::new(params)?;
        tracing::debug!("running query on handle {}", id);
        let raw = unsafe { (self.symbols.run_query)(id, script.as_ptr(), params.as_ptr()) };
        Ok(self.take_string(raw))
    }

    pub(crate) fn export_relations(&self, id: i32, payload: &str) -> Result<String> {
        self.call_doc(self.symbols.export_relations, id, payload)
    }

    pub(crate) fn import_relations(&self, id: i32, payload: &str) -> Result<String> {
        self.call_doc(self.symbols.import_relations, id, payload)
    }

    pub(crate) fn backup(&self, id: i32, path: &str) -> Result<String> {
        self.call_doc(self.symbols.backup_db, id, path)
    }

    pub(crate) fn restore(&self, id: i32, path: &str) -> Result<String> {
        self.call_doc(self.symbols.restore_db, id, path)
    }

    pub(crate) fn import_from_backup(&self, id: i32, payload: &str) -> Result<String> {
        self.call_doc(self.symbols.import_from_backup, id, payload)
    }

    fn call_doc(&self, entry: DocFn, id: i32, payload: &str) -> Result<String> {
        let payload = CString::new(payload)?;
        let raw = unsafe { entry(id, payload.as_ptr()) };
        Ok(self.take_string(raw))
    }

    /// Copy a native-owned string and hand the original back to the engine's
    /// free routine.
    fn take_string(&self, raw: *mut c_char) -> String {
        if raw.is_null() {
            return String::new();
        }
        // SAFETY: the engine returns NUL-terminated UTF-8 it owns; it is
        // freed exactly once, right after the copy.
        let copied = unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned();
        unsafe { (self.symbols.free_str)(raw) };
        copied
    }
}
