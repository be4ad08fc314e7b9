//! Locates, downloads, and caches the platform-specific native library.
//!
//! Artifacts live in a per-user cache directory, one file per
//! (version, platform) pair. A file already present in the cache is taken
//! at face value: no freshness or integrity check is performed, and nothing
//! is ever evicted. Deleting the file forces a re-download.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use flate2::read::GzDecoder;
use tempfile::NamedTempFile;

use crate::error::ProvisioningError;
use crate::platform::PlatformTag;

/// Base URL of engine release downloads.
const RELEASE_BASE_URL: &str = "https://github.com/cozodb/cozo/releases/download";

/// Filename prefix shared by all native artifacts.
const LIB_PREFIX: &str = "libcozo_c";

/// Directory under the user cache dir holding downloaded artifacts.
const CACHE_DIR_NAME: &str = "cozo-native-lib";

/// Deterministic identity of one native artifact.
///
/// Filename and URL encode both version and platform, so distinct releases
/// never collide in the cache directory.
#[derive(Debug, Clone)]
pub struct ArtifactDescriptor {
    version: String,
    platform: PlatformTag,
}

impl ArtifactDescriptor {
    pub fn new(version: &str, platform: PlatformTag) -> Self {
        Self {
            version: version.to_string(),
            platform,
        }
    }

    /// Artifact filename, e.g. `libcozo_c-0.7.6-x86_64-unknown-linux-gnu.so`.
    pub fn filename(&self) -> String {
        format!(
            "{}-{}-{}-{}{}",
            LIB_PREFIX,
            self.version,
            self.platform.arch_segment(),
            self.platform.os_segment(),
            self.platform.lib_extension()
        )
    }

    /// Versioned release URL of the gzip-compressed artifact.
    pub fn download_url(&self) -> String {
        format!("{}/v{}/{}.gz", RELEASE_BASE_URL, self.version, self.filename())
    }
}

fn default_cache_dir() -> Result<PathBuf, ProvisioningError> {
    dirs::cache_dir()
        .or_else(dirs::home_dir)
        .map(|base| base.join(CACHE_DIR_NAME))
        .ok_or(ProvisioningError::NoCacheDir)
}

/// Resolve the native library for `version`, downloading it on first use.
///
/// `cache_dir` overrides the per-user cache directory; pass `None` outside
/// of tests. Resolution is idempotent: once the artifact is cached, no
/// network access happens again for the same (version, platform).
pub fn resolve(version: &str, cache_dir: Option<&Path>) -> Result<PathBuf, ProvisioningError> {
    let descriptor = ArtifactDescriptor::new(version, PlatformTag::detect());

    let dir = match cache_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_cache_dir()?,
    };
    fs::create_dir_all(&dir)?;

    let target = dir.join(descriptor.filename());
    if target.exists() {
        tracing::debug!("native library found in cache at {}", target.display());
        return Ok(target);
    }

    download_and_install(&descriptor, &dir, &target)?;
    Ok(target)
}

/// Fetch the compressed artifact, decompress it into a temporary file in the
/// cache directory, and rename it into the final slot.
fn download_and_install(
    descriptor: &ArtifactDescriptor,
    dir: &Path,
    target: &Path,
) -> Result<(), ProvisioningError> {
    let url = descriptor.download_url();
    tracing::info!("native library not found, downloading from {}", url);

    // Artifacts are large; the fetch blocks until completion or I/O failure.
    let client = reqwest::blocking::Client::builder()
        .timeout(None::<Duration>)
        .build()?;
    let compressed = client.get(&url).send()?.error_for_status()?.bytes()?;

    let mut staged = NamedTempFile::new_in(dir)?;
    let mut decoder = GzDecoder::new(compressed.as_ref());
    io::copy(&mut decoder, &mut staged)?;

    // Another process may have installed the same artifact while we were
    // downloading; the file already in place wins.
    if target.exists() {
        return Ok(());
    }
    match staged.persist(target) {
        Ok(_) => {}
        Err(_) if target.exists() => {}
        Err(err) => return Err(ProvisioningError::Io(err.error)),
    }

    tracing::info!("native library stored in {}", target.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_is_deterministic() {
        let platform = PlatformTag::from_raw("linux", "x86_64");
        let a = ArtifactDescriptor::new("0.7.6", platform);
        let b = ArtifactDescriptor::new("0.7.6", platform);
        assert_eq!(a.filename(), b.filename());
        assert_eq!(a.filename(), "libcozo_c-0.7.6-x86_64-unknown-linux-gnu.so");
    }

    #[test]
    fn test_filenames_distinct_across_versions_and_platforms() {
        let linux = PlatformTag::from_raw("linux", "x86_64");
        let mac = PlatformTag::from_raw("macos", "aarch64");
        let windows = PlatformTag::from_raw("windows", "amd64");

        let names = [
            ArtifactDescriptor::new("0.7.5", linux).filename(),
            ArtifactDescriptor::new("0.7.6", linux).filename(),
            ArtifactDescriptor::new("0.7.6", mac).filename(),
            ArtifactDescriptor::new("0.7.6", windows).filename(),
        ];
        for (i, a) in names.iter().enumerate() {
            for b in names.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
        assert_eq!(names[2], "libcozo_c-0.7.6-aarch64-apple-darwin.dylib");
        assert_eq!(names[3], "libcozo_c-0.7.6-x86_64-pc-windows-msvc.dll");
    }

    #[test]
    fn test_download_url_shape() {
        let platform = PlatformTag::from_raw("linux", "x86_64");
        let descriptor = ArtifactDescriptor::new("0.7.6", platform);
        assert_eq!(
            descriptor.download_url(),
            "https://github.com/cozodb/cozo/releases/download/v0.7.6/libcozo_c-0.7.6-x86_64-unknown-linux-gnu.so.gz"
        );
    }

    #[test]
    fn test_resolve_returns_cached_artifact_without_network() {
        let cache = tempfile::tempdir().unwrap();
        let descriptor = ArtifactDescriptor::new("0.0.0-test", PlatformTag::detect());
        let path = cache.path().join(descriptor.filename());
        fs::write(&path, b"not really a library").unwrap();

        // A pre-seeded cache short-circuits before any network access; a
        // download attempt for this fake version would fail loudly.
        let resolved = resolve("0.0.0-test", Some(cache.path())).unwrap();
        assert_eq!(resolved, path);

        let again = resolve("0.0.0-test", Some(cache.path())).unwrap();
        assert_eq!(again, path);
    }

    #[test]
    fn test_resolve_creates_cache_dir_before_fetching() {
        let cache = tempfile::tempdir().unwrap();
        let nested = cache.path().join("deeper").join("cache");

        // The fake version cannot be fetched, but the cache directory must
        // exist by the time the fetch is attempted.
        let result = resolve("0.0.0-test", Some(&nested));
        assert!(result.is_err());
        assert!(nested.is_dir());
    }
}
