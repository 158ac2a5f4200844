//! Origin normalization for instance base URLs.
//!
//! An instance is identified on the wire by its origin: scheme + host +
//! port, no path, query, or fragment. All comparisons between stored
//! profiles and caller-supplied URLs go through [`normalize_origin`] so
//! that `HTTPS://Host.com:443/workflow/123` and `https://host.com` resolve
//! to the same instance.

use url::{Origin, Url};

use crate::error::CoreError;

/// Reduces an absolute URL to its normalized origin form.
///
/// Normalization rules:
/// - scheme and hostname are lowercased
/// - default ports (80 for http, 443 for https) are stripped
/// - path, query, and fragment are dropped
///
/// Only `http` and `https` URLs are accepted; anything else (including
/// relative URLs and opaque schemes) is rejected.
///
/// # Errors
///
/// Returns [`CoreError::InvalidUrl`] if the input does not parse as an
/// absolute http(s) URL with a host.
pub fn normalize_origin(input: &str) -> Result<String, CoreError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidUrl("empty URL".to_string()));
    }

    let url = Url::parse(trimmed).map_err(|e| CoreError::InvalidUrl(format!("{trimmed}: {e}")))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(CoreError::InvalidUrl(format!(
                "unsupported scheme: {other}"
            )));
        }
    }

    match url.origin() {
        // ascii_serialization lowercases the host and omits default ports.
        Origin::Tuple(..) => Ok(url.origin().ascii_serialization()),
        Origin::Opaque(_) => Err(CoreError::InvalidUrl(format!("{trimmed}: opaque origin"))),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_path_and_query() {
        assert_eq!(
            normalize_origin("https://host.com/workflow/123?tab=2").unwrap(),
            "https://host.com"
        );
    }

    #[test]
    fn folds_case_and_default_port() {
        assert_eq!(
            normalize_origin("HTTPS://Host.com:443").unwrap(),
            "https://host.com"
        );
        assert_eq!(
            normalize_origin("HTTP://EXAMPLE.org:80/x").unwrap(),
            "http://example.org"
        );
    }

    #[test]
    fn keeps_non_default_port() {
        assert_eq!(
            normalize_origin("http://localhost:5678/home").unwrap(),
            "http://localhost:5678"
        );
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(normalize_origin("ftp://host.com").is_err());
        assert!(normalize_origin("file:///etc/passwd").is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(normalize_origin("").is_err());
        assert!(normalize_origin("not a url").is_err());
        assert!(normalize_origin("/relative/path").is_err());
    }
}
