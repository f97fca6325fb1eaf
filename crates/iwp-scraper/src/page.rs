//! Turns one listing page into persisted-ready incident records.

use iwp_core::{AddressInfo, IncidentRecord};
use reqwest::Url;

use crate::address::US_COUNTRY;
use crate::client::IwpClient;
use crate::error::ScraperError;
use crate::parse::{extract_incident_cards, IncidentCard, PageShapeError};

/// Keeps only incidents whose raw address names both a country and a region.
///
/// Matching is a case-sensitive substring test on the raw address text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionFilter {
    pub country: String,
    pub region: String,
}

impl RegionFilter {
    /// A US filter for `region`, e.g. `"Illinois"`.
    #[must_use]
    pub fn us_state(region: impl Into<String>) -> Self {
        Self {
            country: US_COUNTRY.to_owned(),
            region: region.into(),
        }
    }

    #[must_use]
    pub fn retains(&self, address: &AddressInfo) -> bool {
        let raw = address.raw();
        raw.contains(&self.country) && raw.contains(&self.region)
    }
}

impl Default for RegionFilter {
    fn default() -> Self {
        Self::us_state("Illinois")
    }
}

/// Result of parsing one listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageOutcome {
    /// Records that passed the region filter, in page order.
    pub records: Vec<IncidentRecord>,
    /// Cards extracted before any shape error.
    pub cards_seen: usize,
    /// Set when a malformed card cut extraction short.
    pub shape_error: Option<PageShapeError>,
}

/// Parses a listing page, visiting each card's detail page for its address.
///
/// Returns `Ok(None)` for empty markup. Cards without a detail link, and
/// cards whose address falls outside `filter`, are skipped. Detail pages are
/// fetched one at a time in page order.
///
/// # Errors
///
/// Propagates the first detail-page fetch failure; a failed fetch aborts the
/// whole page.
pub async fn parse_incident_page(
    client: &IwpClient,
    markup: &str,
    page_url: &Url,
    filter: &RegionFilter,
) -> Result<Option<PageOutcome>, ScraperError> {
    let Some(extraction) = extract_incident_cards(markup) else {
        return Ok(None);
    };

    let mut outcome = PageOutcome {
        records: Vec::with_capacity(extraction.cards.len()),
        cards_seen: extraction.cards.len(),
        shape_error: extraction.shape_error,
    };

    for card in extraction.cards {
        let Some(detail_url) = resolve_detail_url(page_url, &card.href) else {
            tracing::warn!(
                href = %card.href,
                title = %card.title,
                "skipping card with unusable detail link"
            );
            continue;
        };

        let Some(address) = client.fetch_incident_address(&detail_url).await? else {
            tracing::debug!(title = %card.title, "skipping card without detail link");
            continue;
        };

        if !filter.retains(&address) {
            continue;
        }

        outcome.records.push(into_record(card, detail_url, address));
    }

    Ok(Some(outcome))
}

/// Makes a card's href absolute. An empty href stays empty; an href that
/// cannot be joined yields `None`.
fn resolve_detail_url(page_url: &Url, href: &str) -> Option<String> {
    if href.is_empty() {
        return Some(String::new());
    }
    page_url.join(href).ok().map(String::from)
}

fn into_record(card: IncidentCard, url: String, address: AddressInfo) -> IncidentRecord {
    IncidentRecord {
        title: card.title,
        date: card.date,
        url,
        report_type: card.report_type,
        symptoms: card.symptoms,
        misc_tag: card.misc_tag,
        description: card.description,
        address,
    }
}

#[cfg(test)]
mod tests {
    use iwp_core::StructuredAddress;

    use super::*;

    fn unstructured(raw: &str) -> AddressInfo {
        AddressInfo::Unstructured {
            raw: raw.to_owned(),
        }
    }

    #[test]
    fn default_filter_is_illinois_united_states() {
        let filter = RegionFilter::default();
        assert_eq!(filter.country, "United States");
        assert_eq!(filter.region, "Illinois");
    }

    #[test]
    fn filter_requires_both_country_and_region() {
        let filter = RegionFilter::default();
        assert!(filter.retains(&AddressInfo::Structured(StructuredAddress {
            raw: "520 West Taylor Street, Chicago, 60607 Illinois, United States".to_owned(),
            ..StructuredAddress::default()
        })));
        assert!(!filter.retains(&unstructured("Chicago, Illinois")));
        assert!(!filter.retains(&unstructured(
            "1 Main St, Oviedo, 32765 Florida, United States"
        )));
        assert!(!filter.retains(&unstructured("")));
    }

    #[test]
    fn filter_is_case_sensitive() {
        let filter = RegionFilter::us_state("Illinois");
        assert!(!filter.retains(&unstructured("Chicago, 60607 illinois, United States")));
    }

    #[test]
    fn detail_url_resolution() {
        let page = Url::parse("https://iwaspoisoned.com/?page=4").unwrap();
        assert_eq!(resolve_detail_url(&page, ""), Some(String::new()));
        assert_eq!(
            resolve_detail_url(&page, "/incident/abc-1#emailscroll").as_deref(),
            Some("https://iwaspoisoned.com/incident/abc-1#emailscroll")
        );
        assert_eq!(
            resolve_detail_url(&page, "https://iwaspoisoned.com/incident/x").as_deref(),
            Some("https://iwaspoisoned.com/incident/x")
        );
        assert_eq!(resolve_detail_url(&page, "http://[::1"), None);
    }

    #[tokio::test]
    async fn empty_markup_parses_to_none_without_requests() {
        let client = IwpClient::new(5, "iwp-test/0.1").unwrap();
        let page = Url::parse("https://iwaspoisoned.com/?page=1").unwrap();
        let outcome = parse_incident_page(&client, "", &page, &RegionFilter::default())
            .await
            .unwrap();
        assert!(outcome.is_none());
    }
}
