//! `scrape` command handler.

use std::convert::Infallible;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use iwp_core::{AppConfig, IncidentRecord, IncidentSink};
use iwp_db::IncidentStore;
use iwp_scraper::{IncidentScraper, IwpClient, RegionFilter, ScrapeOptions, ScrapeSummary};
use tokio_util::sync::CancellationToken;

/// Sink for `--dry-run`: logs each record and keeps only a running count.
#[derive(Debug, Default)]
pub(crate) struct DryRunSink {
    seen: AtomicU64,
}

impl IncidentSink for DryRunSink {
    type Error = Infallible;

    async fn insert_many(&self, records: &[IncidentRecord]) -> Result<usize, Infallible> {
        for record in records {
            tracing::info!(
                title = %record.title,
                url = %record.url,
                address = %record.address.raw(),
                "dry-run: would store incident"
            );
        }
        self.seen.fetch_add(records.len() as u64, Ordering::Relaxed);
        Ok(records.len())
    }

    async fn count(&self) -> Result<u64, Infallible> {
        Ok(self.seen.load(Ordering::Relaxed))
    }
}

pub(crate) fn scrape_options(
    config: &AppConfig,
    start_page: u32,
    max_pages: u32,
) -> ScrapeOptions {
    ScrapeOptions {
        start_page,
        max_pages,
        page_delay: Duration::from_millis(config.scraper_page_delay_ms),
        filter: RegionFilter::us_state(config.region_filter.clone()),
        ..ScrapeOptions::new(config.base_url.clone())
    }
}

/// Cancels `token` on the first Ctrl-C. The current page is finished first.
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("received ctrl-c; stopping after the current page");
            token.cancel();
        }
    });
}

/// Crawl the listing and persist retained incidents.
///
/// Outside of dry-run the crawl is recorded as a scrape run, marked
/// `succeeded` with its totals or `failed` with the error text.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built, the run row cannot be
/// created, or the crawl itself fails.
pub(crate) async fn run_scrape(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    start_page: u32,
    max_pages: u32,
    dry_run: bool,
) -> anyhow::Result<()> {
    let client = IwpClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
    )?;
    let options = scrape_options(config, start_page, max_pages);
    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    if dry_run {
        let scraper = IncidentScraper::new(client, DryRunSink::default(), options);
        let summary = scraper.run(&cancel).await?;
        print_summary("dry-run: ", &summary);
        return Ok(());
    }

    let run = iwp_db::create_scrape_run(
        pool,
        i32::try_from(start_page).unwrap_or(i32::MAX),
        i32::try_from(max_pages).unwrap_or(i32::MAX),
    )
    .await?;
    tracing::info!(run_id = run.id, start_page, max_pages, "scrape run started");

    let store = IncidentStore::for_run(pool.clone(), run.id);
    let scraper = IncidentScraper::new(client, store, options);

    match scraper.run(&cancel).await {
        Ok(summary) => {
            if let Err(err) = iwp_db::complete_scrape_run(
                pool,
                run.id,
                i32::try_from(summary.pages_visited).unwrap_or(i32::MAX),
                i64::try_from(summary.incidents_persisted).unwrap_or(i64::MAX),
                summary.stop_reason.as_str(),
            )
            .await
            {
                crate::fail_run_best_effort(pool, run.id, format!("{err:#}")).await;
                return Err(err.into());
            }
            print_summary("", &summary);
            Ok(())
        }
        Err(err) => {
            crate::fail_run_best_effort(pool, run.id, format!("{err:#}")).await;
            Err(err.into())
        }
    }
}

fn print_summary(prefix: &str, summary: &ScrapeSummary) {
    println!(
        "{prefix}visited {} pages, {} incidents retained (stopped: {})",
        summary.pages_visited, summary.incidents_persisted, summary.stop_reason
    );
}
