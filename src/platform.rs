//! Platform detection for native artifact naming.
//!
//! Matching is substring-based and never fails: an unrecognized OS or
//! architecture maps to `Unknown`, which flows into an artifact name that
//! simply will not resolve downstream. A missing-artifact error there beats
//! a hard validation error here.

use std::env;

/// Operating system component of a platform tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Mac,
    Windows,
    Linux,
    Unknown,
}

/// CPU architecture component of a platform tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X86_64,
    Arm64,
    Unknown,
}

/// Canonical (os, arch) pair naming the native artifact for this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformTag {
    pub os: Os,
    pub arch: Arch,
}

impl PlatformTag {
    /// Detect the platform of the running process.
    pub fn detect() -> Self {
        Self::from_raw(env::consts::OS, env::consts::ARCH)
    }

    /// Map raw OS and architecture names to a tag.
    pub fn from_raw(os: &str, arch: &str) -> Self {
        let os_name = os.to_lowercase();
        let arch_name = arch.to_lowercase();

        let os = if os_name.contains("mac") {
            Os::Mac
        } else if os_name.contains("windows") {
            Os::Windows
        } else if os_name.contains("linux") {
            Os::Linux
        } else {
            Os::Unknown
        };

        let arch = if arch_name.contains("amd64") || arch_name.contains("x86_64") {
            Arch::X86_64
        } else if arch_name.contains("aarch64") {
            Arch::Arm64
        } else {
            Arch::Unknown
        };

        Self { os, arch }
    }

    /// Architecture segment of the artifact filename.
    pub(crate) fn arch_segment(&self) -> &'static str {
        match self.arch {
            Arch::X86_64 => "x86_64",
            Arch::Arm64 => "aarch64",
            Arch::Unknown => "unknown",
        }
    }

    /// OS triple segment of the artifact filename.
    pub(crate) fn os_segment(&self) -> &'static str {
        match self.os {
            Os::Mac => "apple-darwin",
            Os::Windows => "pc-windows-msvc",
            Os::Linux => "unknown-linux-gnu",
            Os::Unknown => "unknown",
        }
    }

    /// Shared-library extension used by the OS.
    pub(crate) fn lib_extension(&self) -> &'static str {
        match self.os {
            Os::Mac => ".dylib",
            Os::Windows => ".dll",
            Os::Linux | Os::Unknown => ".so",
        }
    }
}
