//! Paginated crawl over the incident listing.

use std::time::Duration;

use iwp_core::IncidentSink;
use reqwest::Url;
use tokio_util::sync::CancellationToken;

use crate::client::IwpClient;
use crate::error::ScraperError;
use crate::page::{parse_incident_page, RegionFilter};
use crate::pagination::{find_next_link, listing_url, resolve_next, NextLink};

/// Settings for one crawl.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Site root, e.g. `https://iwaspoisoned.com`.
    pub base_url: String,
    pub start_page: u32,
    /// Maximum number of listing pages to fetch. `0` fetches nothing.
    pub max_pages: u32,
    /// Pause before following each `rel="next"` link.
    pub page_delay: Duration,
    pub filter: RegionFilter,
}

impl ScrapeOptions {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            start_page: 1,
            max_pages: 20_000,
            page_delay: Duration::from_secs(2),
            filter: RegionFilter::default(),
        }
    }
}

/// Why a crawl ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The last fetched page had no `rel="next"` link.
    NoNextLink,
    /// The `rel="next"` link had no usable target.
    MalformedNextLink,
    /// `max_pages` pages were fetched.
    PageBudgetExhausted,
    /// The cancellation token fired between pages.
    Cancelled,
}

impl StopReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StopReason::NoNextLink => "no_next_link",
            StopReason::MalformedNextLink => "malformed_next_link",
            StopReason::PageBudgetExhausted => "page_budget_exhausted",
            StopReason::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Totals for a finished crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub pages_visited: u32,
    pub incidents_persisted: u64,
    pub stop_reason: StopReason,
}

/// Walks listing pages one at a time, persisting each page before moving on.
///
/// The scraper owns its HTTP client and store for the duration of a run.
/// Both are released when the scraper is dropped, whichever way the run ends.
pub struct IncidentScraper<S> {
    client: IwpClient,
    sink: S,
    options: ScrapeOptions,
}

impl<S: IncidentSink> IncidentScraper<S> {
    #[must_use]
    pub fn new(client: IwpClient, sink: S, options: ScrapeOptions) -> Self {
        Self {
            client,
            sink,
            options,
        }
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the scraper and hands back its store.
    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Runs the crawl from `options.start_page`.
    ///
    /// Cancellation is checked before each page fetch and during the
    /// inter-page delay; a page already being processed is always finished.
    ///
    /// # Errors
    ///
    /// Any listing or detail fetch failure, or a store failure, aborts the run.
    /// Pages persisted before the failure stay persisted.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<ScrapeSummary, ScraperError> {
        let max_pages = self.options.max_pages;
        let mut summary = ScrapeSummary {
            pages_visited: 0,
            incidents_persisted: 0,
            stop_reason: StopReason::PageBudgetExhausted,
        };

        if max_pages == 0 {
            return Ok(summary);
        }

        let mut current = listing_url(&self.options.base_url, self.options.start_page)?;
        let mut page_number = self.options.start_page;

        loop {
            if cancel.is_cancelled() {
                summary.stop_reason = StopReason::Cancelled;
                break;
            }

            let markup = self.client.fetch_html(current.as_str()).await?;
            summary.pages_visited += 1;

            let inserted = self.persist_page(&markup, &current, page_number).await?;
            summary.incidents_persisted += inserted as u64;

            let next = match find_next_link(&markup) {
                NextLink::Absent => {
                    summary.stop_reason = StopReason::NoNextLink;
                    break;
                }
                NextLink::Malformed => {
                    tracing::warn!(page = page_number, "next-page link has no target; stopping");
                    summary.stop_reason = StopReason::MalformedNextLink;
                    break;
                }
                NextLink::Href(href) => {
                    if let Some(url) = resolve_next(&current, &href) {
                        url
                    } else {
                        tracing::warn!(
                            page = page_number,
                            href = %href,
                            "next-page link is not a valid URL; stopping"
                        );
                        summary.stop_reason = StopReason::MalformedNextLink;
                        break;
                    }
                }
            };

            if summary.pages_visited >= max_pages {
                summary.stop_reason = StopReason::PageBudgetExhausted;
                break;
            }

            if !self.options.page_delay.is_zero() {
                tokio::select! {
                    () = cancel.cancelled() => {
                        summary.stop_reason = StopReason::Cancelled;
                        break;
                    }
                    () = tokio::time::sleep(self.options.page_delay) => {}
                }
            }

            current = next;
            page_number = page_number.saturating_add(1);
        }

        tracing::info!(
            pages_visited = summary.pages_visited,
            incidents_persisted = summary.incidents_persisted,
            stop_reason = %summary.stop_reason,
            "scrape finished"
        );

        Ok(summary)
    }

    /// Parses one listing page and writes its retained incidents.
    ///
    /// Returns how many records were inserted.
    async fn persist_page(
        &self,
        markup: &str,
        page_url: &Url,
        page_number: u32,
    ) -> Result<usize, ScraperError> {
        let outcome =
            parse_incident_page(&self.client, markup, page_url, &self.options.filter).await?;
        let Some(outcome) = outcome else {
            tracing::info!(page = page_number, "Page {page_number}: no incidents captured");
            return Ok(0);
        };

        if let Some(ref shape_error) = outcome.shape_error {
            tracing::warn!(
                page = page_number,
                cards_seen = outcome.cards_seen,
                error = %shape_error,
                "listing page had an unexpected layout; keeping cards parsed so far"
            );
        }

        if outcome.records.is_empty() {
            tracing::info!(page = page_number, "Page {page_number}: no incidents captured");
            return Ok(0);
        }

        let parsed = outcome.records.len();
        let inserted = self
            .sink
            .insert_many(&outcome.records)
            .await
            .map_err(|e| ScraperError::Store(Box::new(e)))?;
        let total = self
            .sink
            .count()
            .await
            .map_err(|e| ScraperError::Store(Box::new(e)))?;

        tracing::info!(
            page = page_number,
            max_pages = self.options.max_pages,
            inserted,
            parsed,
            total,
            "Page {page_number} of {}: {inserted} of {parsed} incidents added to DB. Total incidents: {total}",
            self.options.max_pages,
        );

        Ok(inserted)
    }
}
