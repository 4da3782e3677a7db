//! Asset selection for platform-specific archives

use crate::error::ReleaseError;
use crate::install::platform::Platform;
use crate::install::release::{Asset, Release};

/// Selects the first asset whose name starts with `{product}-{os}-{arch}-`
///
/// # Errors
///
/// Returns `ReleaseError::NoMatchingAsset` if no asset has the prefix.
pub fn select_asset<'a>(
    release: &'a Release,
    product: &str,
    platform: Platform,
) -> Result<&'a Asset, ReleaseError> {
    let prefix = platform.asset_prefix(product);
    release
        .assets
        .iter()
        .find(|asset| asset.name.starts_with(&prefix))
        .ok_or_else(|| ReleaseError::NoMatchingAsset {
            tag: release.tag_name.clone(),
            prefix,
        })
}
