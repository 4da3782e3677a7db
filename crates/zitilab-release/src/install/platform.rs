//! Platform descriptor: which `{os}-{arch}` release build to use

use crate::error::ReleaseError;
use crate::install::archive::ArchiveFormat;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Linux,
    Darwin,
    Windows,
}

impl Os {
    /// Maps an OS name (`std::env::consts::OS` style) to a release OS
    pub fn from_name(name: &str) -> Result<Self, ReleaseError> {
        match name.to_ascii_lowercase().as_str() {
            "linux" => Ok(Os::Linux),
            "macos" | "darwin" => Ok(Os::Darwin),
            "windows" => Ok(Os::Windows),
            _ => Err(ReleaseError::UnsupportedPlatform {
                kind: "operating system",
                value: name.to_string(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::Darwin => "darwin",
            Os::Windows => "windows",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    Amd64,
    Arm64,
    Arm,
}

impl Arch {
    /// Maps a CPU architecture name to a release architecture
    ///
    /// Any 32-bit ARM flavour (`arm`, `armv7l`, ...) maps to [`Arch::Arm`].
    pub fn from_name(name: &str) -> Result<Self, ReleaseError> {
        let name_lower = name.to_ascii_lowercase();
        match name_lower.as_str() {
            "x86_64" | "amd64" => Ok(Arch::Amd64),
            "aarch64" | "arm64" => Ok(Arch::Arm64),
            other if other.starts_with("arm") => Ok(Arch::Arm),
            _ => Err(ReleaseError::UnsupportedPlatform {
                kind: "architecture",
                value: name.to_string(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
            Arch::Arm => "arm",
        }
    }
}

/// The `{os, arch}` pair a release asset must be built for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Detects the platform this process runs on
    pub fn detect() -> Result<Self, ReleaseError> {
        Self::from_names(std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn from_names(os: &str, arch: &str) -> Result<Self, ReleaseError> {
        Ok(Self {
            os: Os::from_name(os)?,
            arch: Arch::from_name(arch)?,
        })
    }

    /// Asset name prefix for `product`, e.g. `ziti-linux-amd64-`
    pub fn asset_prefix(&self, product: &str) -> String {
        format!("{product}-{self}-")
    }

    /// Executable file name inside the archive and on disk
    pub fn executable_name(&self, product: &str) -> String {
        match self.os {
            Os::Windows => format!("{product}.exe"),
            Os::Linux | Os::Darwin => product.to_string(),
        }
    }

    pub fn archive_format(&self) -> ArchiveFormat {
        match self.os {
            Os::Windows => ArchiveFormat::Zip,
            Os::Linux | Os::Darwin => ArchiveFormat::Tar,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os.as_str(), self.arch.as_str())
    }
}
