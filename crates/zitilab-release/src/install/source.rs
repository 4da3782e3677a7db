//! The two HTTP collaborators of the resolver, behind one trait
//!
//! Production code uses [`GithubReleases`](crate::github::GithubReleases);
//! tests can inject a fake that counts calls or serves canned archives.

use crate::error::ReleaseError;
use crate::install::release::Release;
use std::io::Write;

/// Progress callback (bytes_downloaded, total_bytes)
pub type ProgressFn = fn(u64, u64);

/// Which release the index should return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseQuery<'a> {
    Latest,
    Tag(&'a str),
}

pub trait ReleaseSource {
    /// Fetches release metadata; `Ok(None)` means the release does not exist
    fn fetch_release(&self, query: ReleaseQuery<'_>) -> Result<Option<Release>, ReleaseError>;

    /// Streams the asset `asset_name` of release `tag` into `out`, returning the byte count
    fn download_asset(
        &self,
        tag: &str,
        asset_name: &str,
        out: &mut dyn Write,
        progress: Option<ProgressFn>,
    ) -> Result<u64, ReleaseError>;
}

impl<S: ReleaseSource + ?Sized> ReleaseSource for &S {
    fn fetch_release(&self, query: ReleaseQuery<'_>) -> Result<Option<Release>, ReleaseError> {
        (**self).fetch_release(query)
    }

    fn download_asset(
        &self,
        tag: &str,
        asset_name: &str,
        out: &mut dyn Write,
        progress: Option<ProgressFn>,
    ) -> Result<u64, ReleaseError> {
        (**self).download_asset(tag, asset_name, out, progress)
    }
}
