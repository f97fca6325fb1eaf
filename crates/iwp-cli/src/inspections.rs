//! `inspections` command handlers.

use clap::Subcommand;
use iwp_core::AppConfig;
use iwp_inspections::InspectionsClient;

/// Sub-commands available under `inspections`.
#[derive(Debug, Subcommand)]
pub enum InspectionsCommands {
    /// Download, clean and store the inspections snapshot
    Ingest {
        /// Maximum number of feed rows to request (defaults to `IWP_INSPECTIONS_LIMIT`)
        #[arg(long)]
        limit: Option<u32>,
        /// Report what would be stored without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
}

/// Replace the stored inspections with a fresh, cleaned snapshot of the feed.
///
/// # Errors
///
/// Returns an error if the feed cannot be fetched or the snapshot cannot be
/// written.
pub(crate) async fn run_inspections_ingest(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    limit: Option<u32>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let client = InspectionsClient::with_feed_url(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        &config.inspections_url,
    )?;
    let limit = limit.unwrap_or(config.inspections_limit);

    let inspections = client.fetch_inspections(limit).await?;

    if dry_run {
        println!(
            "dry-run: would store {} cleaned inspections (limit {limit})",
            inspections.len()
        );
        return Ok(());
    }

    let written = iwp_db::replace_inspections(pool, &inspections).await?;
    println!("stored {written} inspections");
    Ok(())
}
