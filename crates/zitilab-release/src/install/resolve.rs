//! Release resolution: latest or explicit tag → [`ReleaseRef`]

use crate::error::ReleaseError;
use crate::install::platform::Platform;
use crate::install::release::ReleaseRef;
use crate::install::select::select_asset;
use crate::install::source::{ReleaseQuery, ReleaseSource};
use log::debug;

/// Resolves the release to stage and the archive to download for `platform`
///
/// With `version = None` the "latest" release is used. With an explicit tag
/// only that tag is queried; a missing tag and a tag without an asset for this
/// platform both fail with `VersionNotFound`, distinguished by `reason`.
///
/// # Errors
///
/// - `NoMatchingAsset` if the latest release has no asset for `platform`
/// - `VersionNotFound` if the explicit tag is unusable
/// - `Http` for transport failures
pub fn resolve_release<S: ReleaseSource + ?Sized>(
    source: &S,
    product: &str,
    platform: Platform,
    version: Option<&str>,
) -> Result<ReleaseRef, ReleaseError> {
    match version {
        None => {
            let release = source.fetch_release(ReleaseQuery::Latest)?.ok_or_else(|| {
                ReleaseError::VersionNotFound {
                    tag: "latest".to_string(),
                    reason: "repository has no published release".to_string(),
                }
            })?;
            let asset = select_asset(&release, product, platform)?;
            debug!("latest release is {} ({})", release.tag_name, asset.name);

            Ok(ReleaseRef {
                tag: release.tag_name.clone(),
                archive_name: asset.name.clone(),
            })
        }
        Some(tag) => {
            let release = source.fetch_release(ReleaseQuery::Tag(tag))?.ok_or_else(|| {
                ReleaseError::VersionNotFound {
                    tag: tag.to_string(),
                    reason: "release tag does not exist".to_string(),
                }
            })?;
            let asset = select_asset(&release, product, platform).map_err(|err| match err {
                ReleaseError::NoMatchingAsset { prefix, .. } => ReleaseError::VersionNotFound {
                    tag: tag.to_string(),
                    reason: format!("no asset starting with '{prefix}'"),
                },
                other => other,
            })?;

            Ok(ReleaseRef {
                tag: tag.to_string(),
                archive_name: asset.name.clone(),
            })
        }
    }
}
