//! Shareable form links.
//!
//! A form is shared as `<origin>/form-viewer/<formId>`. There is no access
//! control; anyone with the link can view and submit the form.

use clipboard::{ClipboardContext, ClipboardProvider};
use log::*;
use regex::Regex;
use std::sync::OnceLock;

const VIEWER_PATH: &str = "form-viewer";

/// Errors that can occur while sharing a form.
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    /// System clipboard could not be reached or written
    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),
}

/// Return the link under which the form can be viewed.
///
pub fn share_url(origin: &str, form_id: &str) -> String {
    format!("{}/{}/{}", origin.trim_end_matches('/'), VIEWER_PATH, form_id)
}

const SHARE_PATTERN: &str =
    r"^(?:[a-zA-Z][a-zA-Z0-9+.-]*://[^/]+)?/form-viewer/([A-Za-z0-9_-]+)/?(?:[?#].*)?$";

fn share_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| match Regex::new(SHARE_PATTERN) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!("Failed to compile share link pattern: {}", e);
                None
            }
        })
        .as_ref()
}

/// Extract the form id from a share link, or from a bare id.
///
pub fn parse_share_url(url: &str) -> Option<String> {
    let url = url.trim();
    if crate::state::ids::is_valid(url) {
        return Some(url.to_string());
    }
    share_pattern()?
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
}

/// Place `text` on the system clipboard.
///
pub fn copy_to_clipboard(text: &str) -> Result<(), ShareError> {
    let mut context: ClipboardContext =
        ClipboardProvider::new().map_err(|e| ShareError::Clipboard(e.to_string()))?;
    context
        .set_contents(text.to_string())
        .map_err(|e| ShareError::Clipboard(e.to_string()))?;
    debug!("Copied {} to clipboard", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_viewer_link() {
        assert_eq!(
            share_url("https://forms.example.com", "abc123"),
            "https://forms.example.com/form-viewer/abc123"
        );
        assert_eq!(
            share_url("http://localhost:3000/", "abc123"),
            "http://localhost:3000/form-viewer/abc123"
        );
    }

    #[test]
    fn parses_what_it_builds() {
        let url = share_url("http://localhost:3000", "Xy_9-kLmN0");
        assert_eq!(parse_share_url(&url), Some("Xy_9-kLmN0".to_string()));
    }

    #[test]
    fn parses_paths_bare_ids_and_query_strings() {
        assert_eq!(parse_share_url("/form-viewer/abc123"), Some("abc123".to_string()));
        assert_eq!(parse_share_url("abc123"), Some("abc123".to_string()));
        assert_eq!(
            parse_share_url("https://x.io/form-viewer/abc123/?ref=mail"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn rejects_other_links() {
        assert_eq!(parse_share_url("https://x.io/form-builder/abc123"), None);
        assert_eq!(parse_share_url("https://x.io/form-viewer/"), None);
        assert_eq!(parse_share_url("https://x.io/form-viewer/a/b"), None);
        assert_eq!(parse_share_url(""), None);
    }

    #[test]
    fn test_share_error_display() {
        let error = ShareError::Clipboard("no display".to_string());
        assert!(error.to_string().contains("no display"));
    }
}
