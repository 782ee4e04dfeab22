//! Structural markers for the gallery's landing and detail pages.
//!
//! The gallery is an Angular app, so `data-ng-*` attributes are the most
//! stable hooks it exposes. If the site is restyled these are the first
//! thing to re-check.

/// Element whose presence marks the landing page as loaded.
pub const INDEX_ANCHOR: &str = "#landing-assets";
/// Detail links within the landing container, document order.
pub const INDEX_LINKS: &str = "#landing-assets > div > a";

/// Element whose presence marks a detail page as loaded.
pub const DETAIL_ANCHOR: &str = "#details-info";
/// The item identifier, populated after the client-side render.
pub const NASA_ID: &str = r#"span[data-ng-bind="media.NASAID"]"#;
/// The full-resolution image; its `src` drives the binary download.
pub const DETAIL_IMG: &str = "img#details_img";
/// Keyword value spans; the `.detail-lbl` label span is excluded here so the
/// extractor sees values only.
pub const KEYWORDS: &str = "li#detail-keywords span:not(.detail-lbl)";
/// XPath: the label/value pairs have no ids, only the label text to key on.
pub const CENTER: &str = r#"//span[text()="Center:"]/following-sibling::span"#;
/// XPath, same shape as [`CENTER`].
pub const DATE_CREATED: &str = r#"//span[text()="Date Created:"]/following-sibling::span"#;
pub const CENTER_WEBSITE: &str = r#"li[data-ng-if="media.Center.website"] a"#;
pub const DESCRIPTION: &str = "span#editDescription";
