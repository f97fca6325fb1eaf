//! `runs` command handlers.

use clap::Subcommand;

/// Sub-commands available under `runs`.
#[derive(Debug, Subcommand)]
pub enum RunsCommands {
    /// Show the most recent scrape runs
    List {
        /// Maximum number of runs to show
        #[arg(long, default_value = "20")]
        limit: u32,
    },
}

/// Print recent scrape runs, newest first.
///
/// # Errors
///
/// Returns an error if the runs cannot be read.
pub(crate) async fn run_runs_list(pool: &sqlx::PgPool, limit: u32) -> anyhow::Result<()> {
    let runs = iwp_db::list_scrape_runs(pool, i64::from(limit)).await?;
    if runs.is_empty() {
        println!("no scrape runs recorded");
        return Ok(());
    }

    println!("| id | status | started | pages | incidents | stop reason |");
    println!("|---|---|---|---|---|---|");
    for run in &runs {
        let outcome = run
            .stop_reason
            .as_deref()
            .or(run.error_message.as_deref())
            .unwrap_or("\u{2014}");
        println!(
            "| {} | {} | {} | {}/{} | {} | {} |",
            run.id,
            run.status,
            run.started_at.format("%Y-%m-%d %H:%M"),
            run.pages_visited,
            run.max_pages,
            run.incidents_persisted,
            outcome.replace('|', "\\|"),
        );
    }
    Ok(())
}
