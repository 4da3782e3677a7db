//! Asset download into a private temporary file

use crate::error::ReleaseError;
use crate::install::release::ReleaseRef;
use crate::install::source::{ProgressFn, ReleaseSource};
use log::debug;
use std::path::Path;
use tempfile::NamedTempFile;

/// Downloads the archive of `release` into a new temporary file
///
/// The file lives in `tmp_dir` (system temp dir when `None`) and is deleted
/// when the returned handle is dropped, including on every error path inside
/// this function.
///
/// # Errors
///
/// Transfer errors from `source` are returned unchanged; no retry is made.
pub fn download_to_temp<S: ReleaseSource + ?Sized>(
    source: &S,
    release: &ReleaseRef,
    tmp_dir: Option<&Path>,
    progress: Option<ProgressFn>,
) -> Result<NamedTempFile, ReleaseError> {
    let mut temp_file = match tmp_dir {
        Some(dir) => NamedTempFile::new_in(dir),
        None => NamedTempFile::new(),
    }
    .map_err(|e| ReleaseError::io("create temporary file for download", e))?;

    let downloaded = source.download_asset(
        &release.tag,
        &release.archive_name,
        temp_file.as_file_mut(),
        progress,
    )?;

    // Sync before the archive is reopened by path
    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| ReleaseError::io("sync temporary file", e))?;

    debug!(
        "downloaded {} ({downloaded} bytes) to {}",
        release.archive_name,
        temp_file.path().display()
    );
    Ok(temp_file)
}

/// Deletes a finished download, logging instead of failing if that is not possible
///
/// On some platforms a file still held open elsewhere cannot be removed yet;
/// a stray temporary file is not worth failing the acquisition for.
pub fn discard_download(temp_file: NamedTempFile) {
    let path = temp_file.path().to_path_buf();
    if let Err(err) = temp_file.close() {
        debug!("could not remove temporary download {}: {err}", path.display());
    }
}
