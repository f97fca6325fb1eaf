//! Listing-page URLs and `rel="next"` link discovery.
//!
//! The incident site paginates its listing with a `page` query parameter and
//! marks the link to the following page with `rel="next"`:
//!
//! ```text
//! <a class="page-link" href="https://iwaspoisoned.com/?page=2" rel="next">›</a>
//! ```

use std::sync::LazyLock;

use reqwest::Url;
use scraper::{Html, Selector};

use crate::error::ScraperError;

static NEXT_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[rel~="next"]"#).expect("valid CSS selector"));

/// What a listing page says about the page after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextLink {
    /// No `rel="next"` anchor: this is the last page.
    Absent,
    /// A `rel="next"` anchor without a usable `href`.
    Malformed,
    /// The raw `href` of the next-page anchor.
    Href(String),
}

/// Finds the first `<a rel="next">` element in listing-page markup.
#[must_use]
pub fn find_next_link(markup: &str) -> NextLink {
    let document = Html::parse_document(markup);
    let Some(anchor) = document.select(&NEXT_LINK).next() else {
        return NextLink::Absent;
    };

    match anchor.value().attr("href").map(str::trim) {
        Some(href) if !href.is_empty() => NextLink::Href(href.to_owned()),
        _ => NextLink::Malformed,
    }
}

/// Resolves a next-page `href` against the page it was found on.
///
/// Returns `None` when the `href` cannot form a valid URL.
#[must_use]
pub fn resolve_next(current: &Url, href: &str) -> Option<Url> {
    current.join(href).ok()
}

/// Builds the listing URL for `page`, e.g. `https://iwaspoisoned.com/?page=3`.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if `base_url` is not an absolute URL.
pub fn listing_url(base_url: &str, page: u32) -> Result<Url, ScraperError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    let mut url = Url::parse(&normalised).map_err(|e| ScraperError::InvalidUrl {
        url: base_url.to_owned(),
        reason: e.to_string(),
    })?;
    url.query_pairs_mut().append_pair("page", &page.to_string());
    Ok(url)
}
