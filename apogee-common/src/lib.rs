//! Common types shared across the Apogee harvester crates.
//!
//! This crate defines the error taxonomy, the scraped-item record, and the
//! observability helpers used throughout the workspace. It is intentionally
//! lightweight so that every crate can depend on it without heavy transitive
//! costs.

use serde::Serialize;

pub mod observability;

/// One scraped detail page.
///
/// A record is built entirely while its page is loaded, handed to the store,
/// and dropped. Nothing persists across items and processing order does not
/// affect the artifacts written.
#[derive(Debug, Clone, Serialize)]
pub struct ItemRecord {
    /// Stable external identifier; artifacts are named from it.
    pub nasa_id: String,
    /// Source of the binary download.
    pub image_url: String,
    /// Keyword values in document order, label markers excluded.
    /// Absent on the page → empty.
    pub keywords: Vec<String>,
    pub center: Option<String>,
    /// Verbatim page text; no date parsing is attempted.
    pub date_created: Option<String>,
    pub center_website: Option<String>,
    pub description: Option<String>,
}

/// Error types used across the harvester.
#[derive(thiserror::Error, Debug)]
pub enum HarvesterError {
    /// A page's anchor element never appeared within the navigation bound.
    /// Fatal for the landing page, per-item recoverable for detail pages.
    #[error("timed out after {timeout_secs}s waiting for `{selector}` on {url}")]
    NavigationTimeout {
        url: String,
        selector: String,
        timeout_secs: u64,
    },

    /// A query for `nasa_id` or `image_url` matched nothing. The item is
    /// abandoned with no artifacts written.
    #[error("required field `{field}` not found on page")]
    RequiredField { field: &'static str },

    /// The image URL carries no derivable `.ext` suffix.
    #[error("no file extension in image url: {url}")]
    Extension { url: String },

    /// Network fault while fetching the binary.
    #[error("download of {url} failed: {reason}")]
    Download { url: String, reason: String },

    /// Filesystem fault while writing an artifact.
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),

    /// The WebDriver session itself is unusable. Not expected to recover in
    /// isolation, so the run controller aborts instead of skipping the item.
    #[error("browser session unusable: {0}")]
    Session(String),

    /// Anything outside the per-item taxonomy (setup, unexpected transport).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HarvesterError {
    /// Session faults abort the whole run; every other variant is scoped to
    /// the item being processed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Session(_))
    }
}

/// Convenient alias for results that use [`HarvesterError`].
pub type Result<T> = std::result::Result<T, HarvesterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_session_faults_are_fatal() {
        assert!(HarvesterError::Session("gone".into()).is_fatal());
        assert!(!HarvesterError::RequiredField { field: "nasa_id" }.is_fatal());
        assert!(!HarvesterError::NavigationTimeout {
            url: "https://images.nasa.gov/details-x".into(),
            selector: "#details-info".into(),
            timeout_secs: 10,
        }
        .is_fatal());
        assert!(!HarvesterError::Extension {
            url: "https://images.nasa.gov/asset/noext".into()
        }
        .is_fatal());
    }

    #[test]
    fn timeout_message_names_page_and_marker() {
        let err = HarvesterError::NavigationTimeout {
            url: "https://images.nasa.gov".into(),
            selector: "#landing-assets".into(),
            timeout_secs: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("#landing-assets"));
        assert!(msg.contains("https://images.nasa.gov"));
    }
}
