//! Visit strategies
//!
//! A strategy turns a fetched page into the references recorded for it and
//! the URLs handed back to the frontier. The set of strategies is closed and
//! chosen once per run from the configured `VisitMode`.

use crate::config::VisitMode;
use crate::crawler::parser::{extract_anchor_targets, extract_asset_references};
use crate::url::{has_http_scheme, Scope, UrlVerifier};
use std::collections::HashSet;
use url::Url;

/// Asset references that never name a fetchable resource
const INLINE_ASSET_PREFIXES: &[&str] = &["data:", "javascript:"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitStrategy {
    /// Records in-scope links and queues them for visiting
    LinkFollower,

    /// Records assets; queues nothing
    AssetCollector,
}

impl From<VisitMode> for VisitStrategy {
    fn from(mode: VisitMode) -> Self {
        match mode {
            VisitMode::Link => Self::LinkFollower,
            VisitMode::Asset => Self::AssetCollector,
        }
    }
}

/// Result of running a strategy over one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Recorded as the page's references, in discovery order
    pub references: Vec<String>,

    /// Submitted to the frontier
    pub to_visit: Vec<String>,
}

impl VisitStrategy {
    pub fn extract(
        &self,
        page_url: &str,
        html: &str,
        scope: &Scope,
        verifier: &dyn UrlVerifier,
    ) -> Extraction {
        match self {
            Self::LinkFollower => follow_links(page_url, html, scope, verifier),
            Self::AssetCollector => collect_assets(page_url, html, scope),
        }
    }
}

/// Link-follower: every in-scope anchor target, once, excluding the page itself
fn follow_links(page_url: &str, html: &str, scope: &Scope, verifier: &dyn UrlVerifier) -> Extraction {
    let page_key = scope.key_of(page_url);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for href in extract_anchor_targets(html) {
        let Some(url) = link_target(&href, scope, verifier) else {
            continue;
        };

        let key = scope.key_of(&url);
        if key == page_key {
            continue;
        }

        if seen.insert(key) {
            links.push(url);
        }
    }

    tracing::debug!("{} in-scope links on {}", links.len(), page_url);

    Extraction {
        references: links.clone(),
        to_visit: links,
    }
}

/// Cleans, scopes and resolves one anchor target
///
/// Returns None if the link should be excluded:
/// - same-page fragments (`#section`)
/// - anything the verifier rejects, before or after resolution
/// - relative references that cannot be resolved
/// - anything that does not resolve to an `http(s)` URL
fn link_target(href: &str, scope: &Scope, verifier: &dyn UrlVerifier) -> Option<String> {
    let href = href.trim();
    if href.starts_with('#') {
        return None;
    }

    let without_fragment = match href.find('#') {
        Some(idx) => &href[..idx],
        None => href,
    };
    let candidate = without_fragment.trim_end_matches('/');

    if !verifier.is_in_scope(candidate, scope) {
        tracing::debug!("Out of scope: {}", href);
        return None;
    }

    let absolute = if has_http_scheme(candidate) {
        candidate.to_string()
    } else {
        scope.domain().resolve(candidate)?
    };

    // Resolution can still leave the domain (`https:host`, `\\host`)
    if !has_http_scheme(&absolute) || !verifier.is_in_scope(&absolute, scope) {
        tracing::debug!("Out of scope once resolved: {} -> {}", href, absolute);
        return None;
    }

    Some(absolute)
}

/// Asset-collector: asset references resolved against the page, nothing queued
fn collect_assets(page_url: &str, html: &str, scope: &Scope) -> Extraction {
    let base = Url::parse(page_url).ok();
    let mut seen = HashSet::new();
    let mut assets = Vec::new();

    for reference in extract_asset_references(html) {
        if is_inline(&reference) {
            continue;
        }

        let resolved = match &base {
            Some(base) => base.join(&reference).ok().map(String::from),
            None => scope.domain().resolve(&reference),
        };

        if let Some(url) = resolved {
            if seen.insert(url.clone()) {
                assets.push(url);
            }
        }
    }

    tracing::debug!("{} assets on {}", assets.len(), page_url);

    Extraction {
        references: assets,
        to_visit: Vec::new(),
    }
}

fn is_inline(reference: &str) -> bool {
    INLINE_ASSET_PREFIXES.iter().any(|prefix| {
        reference
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}
