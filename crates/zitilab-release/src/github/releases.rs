//! Release-index and blob-download client for GitHub

use crate::error::ReleaseError;
use crate::github::client::build_client;
use crate::github::url::{add_path_segments, parse_base_url};
use crate::install::release::Release;
use crate::install::source::{ProgressFn, ReleaseQuery, ReleaseSource};
use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::ACCEPT;
use std::io::{Read, Write};
use url::Url;
use zitilab_core::ReleaseConfig;

const GITHUB_JSON: &str = "application/vnd.github+json";

/// [`ReleaseSource`] backed by the GitHub REST API and release downloads
///
/// - metadata: `GET {api}/repos/{owner}/{name}/releases/latest` or `.../releases/tags/{tag}`
/// - blobs: `GET {base}/{owner}/{name}/releases/download/{tag}/{asset}`
#[derive(Debug, Clone)]
pub struct GithubReleases {
    client: Client,
    api_base: Url,
    download_base: Url,
    owner: String,
    name: String,
    token: Option<String>,
}

impl GithubReleases {
    /// Creates a client for the repository named in `config`
    ///
    /// # Errors
    ///
    /// Returns error if either base URL is invalid or the HTTP client cannot be built
    pub fn new(config: &ReleaseConfig) -> Result<Self, ReleaseError> {
        let api_base = parse_base_url(&config.api_base_url)?;
        let download_base = parse_base_url(&config.download_base_url)?;
        let client = build_client(config.timeout).map_err(|e| ReleaseError::Http {
            url: api_base.clone(),
            source: e,
        })?;

        Ok(Self {
            client,
            api_base,
            download_base,
            owner: config.repo_owner.clone(),
            name: config.repo_name.clone(),
            token: config.token.clone(),
        })
    }

    /// URL of the release-index document for `query`
    pub fn release_url(&self, query: ReleaseQuery<'_>) -> Result<Url, ReleaseError> {
        let mut url = self.api_base.clone();
        match query {
            ReleaseQuery::Latest => add_path_segments(
                &mut url,
                &["repos", self.owner.as_str(), self.name.as_str(), "releases", "latest"],
            )?,
            ReleaseQuery::Tag(tag) => add_path_segments(
                &mut url,
                &["repos", self.owner.as_str(), self.name.as_str(), "releases", "tags", tag],
            )?,
        }
        Ok(url)
    }

    /// URL of a release asset download
    pub fn asset_url(&self, tag: &str, asset_name: &str) -> Result<Url, ReleaseError> {
        let mut url = self.download_base.clone();
        add_path_segments(
            &mut url,
            &[self.owner.as_str(), self.name.as_str(), "releases", "download", tag, asset_name],
        )?;
        Ok(url)
    }

    fn get(&self, url: &Url, authenticated: bool) -> Result<Response, ReleaseError> {
        let mut request = self.client.get(url.as_str());
        if authenticated {
            request = request.header(ACCEPT, GITHUB_JSON);
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }
        }

        request.send().map_err(|e| ReleaseError::Http {
            url: url.clone(),
            source: e,
        })
    }
}

impl ReleaseSource for GithubReleases {
    fn fetch_release(&self, query: ReleaseQuery<'_>) -> Result<Option<Release>, ReleaseError> {
        let url = self.release_url(query)?;
        debug!("fetching release metadata from {url}");

        let response = self.get(&url, true)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = response.error_for_status().map_err(|e| ReleaseError::Http {
            url: url.clone(),
            source: e.without_url(),
        })?;

        response
            .json::<Release>()
            .map(Some)
            .map_err(|e| ReleaseError::Http { url, source: e })
    }

    fn download_asset(
        &self,
        tag: &str,
        asset_name: &str,
        out: &mut dyn Write,
        progress: Option<ProgressFn>,
    ) -> Result<u64, ReleaseError> {
        let url = self.asset_url(tag, asset_name)?;
        debug!("downloading {url}");

        let mut response = self.get(&url, false)?;

        // Check status and convert to error without unwrap
        if let Err(err) = response.error_for_status_ref() {
            return Err(ReleaseError::Http {
                url,
                source: err.without_url(),
            });
        }

        let total = response.content_length().unwrap_or(0);
        let mut downloaded: u64 = 0;
        let mut buffer = [0; 8192];

        loop {
            let bytes_read = response
                .read(&mut buffer)
                .map_err(|e| ReleaseError::io("read from HTTP response", e))?;

            if bytes_read == 0 {
                break;
            }

            out.write_all(&buffer[..bytes_read])
                .map_err(|e| ReleaseError::io("write downloaded bytes", e))?;

            downloaded += bytes_read as u64;

            // Invoke progress callback if provided
            if let Some(callback) = progress {
                callback(downloaded, total.max(downloaded));
            }
        }

        Ok(downloaded)
    }
}
