//! Post URL parsing: pulling the stable shortcode out of a permalink.

use regex::Regex;

use crate::error::IngestError;

/// Extracts the post shortcode from a permalink of the form
/// `https://…/p/<shortcode>/…`.
///
/// # Errors
///
/// Returns [`IngestError::InvalidUrl`] when the URL has no `/p/<shortcode>`
/// path segment.
pub fn extract_post_id(url: &str) -> Result<String, IngestError> {
    let re = Regex::new(r"/p/([A-Za-z0-9_-]+)").expect("valid post path regex");
    re.captures(url)
        .map(|c| c[1].to_string())
        .ok_or_else(|| IngestError::InvalidUrl {
            url: url.to_string(),
        })
}

/// Rebuilds the canonical permalink for a shortcode. This is the form the
/// dedup key is stored in, regardless of how the source URL was spelled.
#[must_use]
pub fn canonical_post_url(post_id: &str) -> String {
    format!("https://www.instagram.com/p/{post_id}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_shortcode_from_full_permalink() {
        let id = extract_post_id("https://platform.example/p/ABC123/").unwrap();
        assert_eq!(id, "ABC123");
    }

    #[test]
    fn extracts_shortcode_with_trailing_query() {
        let id = extract_post_id("https://www.instagram.com/p/DJt_Q2IxQ8L/?utm_source=ig").unwrap();
        assert_eq!(id, "DJt_Q2IxQ8L");
    }

    #[test]
    fn shortcode_may_contain_underscore_and_dash() {
        let id = extract_post_id("https://www.instagram.com/p/aB_c-9/").unwrap();
        assert_eq!(id, "aB_c-9");
    }

    #[test]
    fn non_post_url_is_invalid() {
        let result = extract_post_id("https://platform.example/not-a-post");
        assert!(
            matches!(result, Err(IngestError::InvalidUrl { .. })),
            "expected InvalidUrl, got: {result:?}"
        );
    }

    #[test]
    fn empty_url_is_invalid() {
        assert!(matches!(
            extract_post_id(""),
            Err(IngestError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn canonical_url_round_trips_through_extraction() {
        let url = canonical_post_url("XYZ789");
        assert_eq!(extract_post_id(&url).unwrap(), "XYZ789");
    }
}
