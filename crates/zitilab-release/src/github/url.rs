//! URL construction helpers for GitHub resources

use thiserror::Error;
use url::Url;

/// Parses a configured base URL (API host or download host)
///
/// # Errors
///
/// Returns `UrlError::ParseError` if `raw` is not an absolute URL
pub fn parse_base_url(raw: &str) -> Result<Url, UrlError> {
    let url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(UrlError::CannotBeABase { url });
    }
    Ok(url)
}

/// Appends percent-encoded path segments to `url`
///
/// Existing path segments are kept, so a base such as
/// `https://ghe.example.com/api/v3` keeps its prefix.
///
/// # Errors
///
/// Returns error if URL cannot be a base
pub fn add_path_segments(url: &mut Url, segments: &[&str]) -> Result<(), UrlError> {
    // path_segments_mut borrows url, so keep a copy for the error
    let url_for_error = url.clone();
    url.path_segments_mut()
        .map_err(|_| UrlError::CannotBeABase { url: url_for_error })?
        .pop_if_empty()
        .extend(segments);
    Ok(())
}

/// URL construction errors
#[derive(Debug, Error)]
pub enum UrlError {
    /// URL cannot be used as a base
    #[error("URL cannot be a base: {url}")]
    CannotBeABase {
        /// The problematic URL
        url: Url,
    },

    /// Invalid URL parse error
    #[error("Invalid URL: {0}")]
    ParseError(#[from] url::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_path_segments_to_host_root() {
        let mut url = parse_base_url("https://github.com").unwrap();
        add_path_segments(&mut url, &["openziti", "ziti", "releases"]).unwrap();
        assert_eq!(url.as_str(), "https://github.com/openziti/ziti/releases");
    }

    #[test]
    fn test_add_path_segments_keeps_base_prefix() {
        let mut url = parse_base_url("https://ghe.example.com/api/v3").unwrap();
        add_path_segments(&mut url, &["repos", "openziti", "ziti"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/openziti/ziti"
        );
    }

    #[test]
    fn test_add_path_segments_prevents_injection() {
        let mut url = parse_base_url("https://api.github.com").unwrap();
        add_path_segments(&mut url, &["repos", "../../../etc/passwd"]).unwrap();
        assert!(url.as_str().contains("%2F"));
        assert!(!url.as_str().contains("/etc/passwd"));
    }

    #[test]
    fn test_parse_base_url_rejects_relative() {
        assert!(parse_base_url("api.github.com").is_err());
    }

    #[test]
    fn test_parse_base_url_rejects_non_base() {
        assert!(matches!(
            parse_base_url("mailto:dev@example.com"),
            Err(UrlError::CannotBeABase { .. })
        ));
    }
}
