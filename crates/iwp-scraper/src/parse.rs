//! Markup extraction for listing and detail pages.
//!
//! Everything here is synchronous and works on owned strings so that parsed
//! documents never live across an `.await`.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Marketing phrase the site appends to every incident link title.
pub const TITLE_SUFFIX: &str = "- Got Food Poisoning? Report it now";

const SYMPTOMS_PREFIX: &str = "Symptoms:";
const REPORT_TYPE_PREFIX: &str = "Report Type:";

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid CSS selector")
}

static CARD: LazyLock<Selector> = LazyLock::new(|| selector("div.row.div-report-box"));
static SUMMARY_BOX: LazyLock<Selector> = LazyLock::new(|| selector("div.report-first-box"));
static DESCRIPTION_BOX: LazyLock<Selector> = LazyLock::new(|| selector("div.report-second-box"));
static REPORT_DATE: LazyLock<Selector> = LazyLock::new(|| selector("p.report-date"));
static REPORT_TAG: LazyLock<Selector> = LazyLock::new(|| selector("p.report-tag"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static DETAIL_CONTAINER: LazyLock<Selector> = LazyLock::new(|| selector("div.single-incident"));
static DETAIL_ADDRESS: LazyLock<Selector> =
    LazyLock::new(|| selector("span.pl-1.py-0.text-muted"));

/// Summary fields of one incident card, before its detail page is visited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentCard {
    pub date: String,
    pub title: String,
    /// Detail-page href exactly as it appears in the markup (trimmed).
    pub href: String,
    pub report_type: String,
    pub symptoms: Vec<String>,
    pub misc_tag: String,
    pub description: String,
}

/// A card whose markup does not have the layout the extractor relies on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageShapeError {
    #[error("incident card {card_index} has no {section} section")]
    MissingSection {
        card_index: usize,
        section: &'static str,
    },
}

/// Cards extracted from one listing page.
///
/// Extraction stops at the first malformed card; `cards` then holds every
/// card before it and `shape_error` says why it stopped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardExtraction {
    pub cards: Vec<IncidentCard>,
    pub shape_error: Option<PageShapeError>,
}

/// Extracts every incident card from listing-page markup.
///
/// Returns `None` for empty markup. A page with no cards yields an empty
/// extraction, not an error.
#[must_use]
pub fn extract_incident_cards(markup: &str) -> Option<CardExtraction> {
    if markup.is_empty() {
        return None;
    }

    let document = Html::parse_document(markup);
    let mut extraction = CardExtraction::default();

    for (card_index, card) in document.select(&CARD).enumerate() {
        match extract_card(card, card_index) {
            Ok(parsed) => extraction.cards.push(parsed),
            Err(e) => {
                extraction.shape_error = Some(e);
                break;
            }
        }
    }

    Some(extraction)
}

fn extract_card(card: ElementRef<'_>, card_index: usize) -> Result<IncidentCard, PageShapeError> {
    let summary = card
        .select(&SUMMARY_BOX)
        .next()
        .ok_or(PageShapeError::MissingSection {
            card_index,
            section: "summary",
        })?;
    let description_box = card
        .select(&DESCRIPTION_BOX)
        .next()
        .ok_or(PageShapeError::MissingSection {
            card_index,
            section: "description",
        })?;

    let date = summary
        .select(&REPORT_DATE)
        .next()
        .map(element_text)
        .unwrap_or_default();

    let link = summary.select(&LINK).next();
    let title = link
        .and_then(|a| a.value().attr("title"))
        .map(strip_title_suffix)
        .unwrap_or_default();
    let href = link
        .and_then(|a| a.value().attr("href"))
        .map(|h| h.trim().to_owned())
        .unwrap_or_default();

    let mut parsed = IncidentCard {
        date,
        title,
        href,
        ..IncidentCard::default()
    };

    for tag in summary.select(&REPORT_TAG) {
        apply_report_tag(&mut parsed, &element_text(tag));
    }

    parsed.description = description_box
        .select(&PARAGRAPH)
        .map(element_text)
        .collect::<String>();

    Ok(parsed)
}

/// Routes one report tag's text to the field its prefix names.
///
/// Unrecognized tags overwrite `misc_tag`, so the last one wins.
fn apply_report_tag(card: &mut IncidentCard, text: &str) {
    if let Some(rest) = text.strip_prefix(SYMPTOMS_PREFIX) {
        card.symptoms = rest
            .split_whitespace()
            .map(|s| s.trim_end_matches(','))
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();
    } else if let Some(rest) = text.strip_prefix(REPORT_TYPE_PREFIX) {
        rest.trim().clone_into(&mut card.report_type);
    } else {
        text.clone_into(&mut card.misc_tag);
    }
}

/// Removes [`TITLE_SUFFIX`] and everything after it.
#[must_use]
pub fn strip_title_suffix(title: &str) -> String {
    match title.find(TITLE_SUFFIX) {
        Some(i) => title[..i].trim().to_owned(),
        None => title.to_owned(),
    }
}

/// Extracts the whitespace-collapsed address text from a detail page.
///
/// Missing container or address node yields an empty string.
#[must_use]
pub fn extract_detail_address(markup: &str) -> String {
    let document = Html::parse_document(markup);
    document
        .select(&DETAIL_CONTAINER)
        .next()
        .and_then(|container| container.select(&DETAIL_ADDRESS).next())
        .map(|span| collapse_whitespace(&element_text(span)))
        .unwrap_or_default()
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_owned()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
