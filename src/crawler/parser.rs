//! HTML parser for extracting references
//!
//! This module pulls raw reference strings out of fetched HTML:
//! - Navigable link targets (from `<a href>` tags)
//! - Non-navigable assets (images, scripts, stylesheets, icons, media)
//!
//! Values are returned as written in the document, trimmed; resolving and
//! scoping them is the visit strategy's job.

use scraper::{Html, Selector};

/// Selector for anchors that name a navigable target
const ANCHOR_SELECTOR: &str = "a[href]";

/// Selector for every element that references an asset
const ASSET_SELECTOR: &str = "img[src], script[src], link[rel~='stylesheet'][href], \
     link[rel~='icon'][href], source[src], video[src], audio[src]";

/// Extracts `href` values of anchors in document order
///
/// **Excluded:** anchors with a `download` attribute and empty hrefs.
///
/// # Example
///
/// ```
/// use site_mapper::crawler::extract_anchor_targets;
///
/// let html = r#"<a href="/about">About</a><a href="/file.pdf" download>PDF</a>"#;
/// assert_eq!(extract_anchor_targets(html), vec!["/about".to_string()]);
/// ```
pub fn extract_anchor_targets(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut targets = Vec::new();

    if let Ok(selector) = Selector::parse(ANCHOR_SELECTOR) {
        for element in document.select(&selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                let href = href.trim();
                if !href.is_empty() {
                    targets.push(href.to_string());
                }
            }
        }
    }

    targets
}

/// Extracts asset references in document order
///
/// `<link>` elements contribute their `href`, every other element its `src`.
pub fn extract_asset_references(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut assets = Vec::new();

    if let Ok(selector) = Selector::parse(ASSET_SELECTOR) {
        for element in document.select(&selector) {
            let attribute = match element.value().name() {
                "link" => "href",
                _ => "src",
            };

            if let Some(value) = element.value().attr(attribute) {
                let value = value.trim();
                if !value.is_empty() {
                    assets.push(value.to_string());
                }
            }
        }
    }

    assets
}
