//! Staging: one version-scoped directory per release tag
//!
//! ```text
//! {home}/{product}-bin/{product}-{tag}/{product}[.exe]
//! ```
//!
//! A file already present at that path means the version is staged; nothing is
//! downloaded again. Staging is not guarded against concurrent acquisitions of
//! the same tag.

use crate::error::ReleaseError;
use crate::github::GithubReleases;
use crate::install::archive::{find_executable_member, open_archive};
use crate::install::download::{discard_download, download_to_temp};
use crate::install::platform::Platform;
use crate::install::release::ReleaseRef;
use crate::install::resolve::resolve_release;
use crate::install::source::{ProgressFn, ReleaseSource};
use log::{debug, info};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use zitilab_core::ReleaseConfig;

/// A product executable staged on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagedExecutable {
    /// Release tag the executable came from
    pub version: String,
    pub path: PathBuf,
}

impl StagedExecutable {
    /// Directory containing the executable
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }
}

/// Per-call knobs of [`acquire`]
#[derive(Debug, Clone, Copy, Default)]
pub struct AcquireOptions {
    /// Append the staging directory to this process's `PATH`
    pub add_to_path: bool,
    /// Optional progress callback (bytes_downloaded, total_bytes)
    pub progress: Option<ProgressFn>,
}

/// Resolves, downloads and stages the product for the current platform
///
/// `version_override` wins over `config.version`; with neither set the latest
/// release is used.
///
/// # Errors
///
/// See [`Stager::acquire`]; additionally `UnsupportedPlatform` when the
/// running platform has no release build.
pub fn acquire(
    config: &ReleaseConfig,
    version_override: Option<&str>,
    options: &AcquireOptions,
) -> Result<StagedExecutable, ReleaseError> {
    let platform = Platform::detect()?;
    let source = GithubReleases::new(config)?;
    Stager::new(config, source, platform).acquire(version_override, options)
}

/// Artifact resolver and stager for one configuration, source and platform
#[derive(Debug)]
pub struct Stager<'a, S> {
    config: &'a ReleaseConfig,
    source: S,
    platform: Platform,
}

impl<'a, S: ReleaseSource> Stager<'a, S> {
    pub fn new(config: &'a ReleaseConfig, source: S, platform: Platform) -> Self {
        Self {
            config,
            source,
            platform,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Directory the executable for `tag` is staged in
    pub fn staging_dir(&self, tag: &str) -> PathBuf {
        match &self.config.bin_dir {
            Some(bin_dir) => bin_dir.clone(),
            None => {
                let product = &self.config.product;
                self.config
                    .home
                    .join(format!("{product}-bin"))
                    .join(format!("{product}-{tag}"))
            }
        }
    }

    /// Full path of the staged executable for `tag`
    pub fn executable_path(&self, tag: &str) -> PathBuf {
        self.staging_dir(tag)
            .join(self.platform.executable_name(&self.config.product))
    }

    /// Resolves the release and makes sure its executable is staged
    ///
    /// # Errors
    ///
    /// - `NoMatchingAsset` / `VersionNotFound` from resolution
    /// - `Http` for transport failures (not retried)
    /// - `ExecutableNotInArchive` if the archive lacks the executable
    /// - `ExtractionFailed` / `IoError` for archive or filesystem failures
    pub fn acquire(
        &self,
        version_override: Option<&str>,
        options: &AcquireOptions,
    ) -> Result<StagedExecutable, ReleaseError> {
        let version = version_override.or(self.config.version.as_deref());
        let release = resolve_release(
            &self.source,
            &self.config.product,
            self.platform,
            version,
        )?;
        info!("using tag={} archive={}", release.tag, release.archive_name);

        let staging_dir = self.staging_dir(&release.tag);
        let executable = self.executable_path(&release.tag);

        if executable.is_file() {
            info!("existing {} at {}", self.config.product, executable.display());
        } else {
            self.stage(&release, &staging_dir, &executable, options.progress)?;
            info!("extracted to {}", executable.display());
        }

        if options.add_to_path && add_to_path(&staging_dir) {
            info!("added {} to PATH", staging_dir.display());
        }

        Ok(StagedExecutable {
            version: release.tag,
            path: executable,
        })
    }

    fn stage(
        &self,
        release: &ReleaseRef,
        staging_dir: &Path,
        executable: &Path,
        progress: Option<ProgressFn>,
    ) -> Result<(), ReleaseError> {
        debug!("creating {}", staging_dir.display());
        fs::create_dir_all(staging_dir).map_err(|e| {
            ReleaseError::io(format!("create staging directory {}", staging_dir.display()), e)
        })?;

        let download = download_to_temp(
            &self.source,
            release,
            self.config.tmp_dir.as_deref(),
            progress,
        )?;
        let staged = self.extract(download.path(), release, staging_dir, executable);
        discard_download(download);
        staged
    }

    fn extract(
        &self,
        archive_path: &Path,
        release: &ReleaseRef,
        staging_dir: &Path,
        executable: &Path,
    ) -> Result<(), ReleaseError> {
        let executable_name = self.platform.executable_name(&self.config.product);
        let mut reader = open_archive(
            self.platform.archive_format(),
            archive_path,
            &release.archive_name,
        )?;

        let members = reader.list_members()?;
        let member = find_executable_member(&members, &executable_name).ok_or_else(|| {
            ReleaseError::ExecutableNotInArchive {
                executable: executable_name.clone(),
                archive: release.archive_name.clone(),
            }
        })?;

        // Sets the exec bits before the executable appears at its final path
        reader.stage(member, staging_dir, executable)
    }
}

/// Appends `dir` to this process's `PATH` unless `PATH` already mentions it
///
/// Containment is a plain substring check. Returns whether `PATH` changed.
pub fn add_to_path(dir: &Path) -> bool {
    let current = std::env::var_os("PATH").unwrap_or_default();
    if current
        .to_string_lossy()
        .contains(dir.to_string_lossy().as_ref())
    {
        return false;
    }

    let mut new_path = OsString::from(&current);
    if !new_path.is_empty() {
        new_path.push(if cfg!(windows) { ";" } else { ":" });
    }
    new_path.push(dir.as_os_str());

    // SAFETY: acquisition is single-threaded; callers asking for PATH
    // augmentation do so before spawning threads that read the environment.
    unsafe {
        std::env::set_var("PATH", new_path);
    }
    true
}
