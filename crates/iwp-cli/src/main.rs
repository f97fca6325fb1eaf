mod inspections;
mod merge;
mod runs;
mod scrape;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::inspections::InspectionsCommands;
use crate::runs::RunsCommands;

#[derive(Debug, Parser)]
#[command(name = "iwp-cli")]
#[command(about = "Food-poisoning incident scraper and inspection merge")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Crawl the incident listing and store retained incidents
    Scrape {
        /// Listing page to start from
        #[arg(long, default_value_t = 1)]
        start_page: u32,
        /// Maximum number of listing pages to fetch (defaults to `IWP_SCRAPER_MAX_PAGES`)
        #[arg(long)]
        max_pages: Option<u32>,
        /// Log retained incidents instead of writing them to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// City food-inspection data
    Inspections {
        #[command(subcommand)]
        command: InspectionsCommands,
    },
    /// Join stored incidents with stored inspections and write a CSV
    Merge {
        /// Output CSV path
        #[arg(long)]
        out: std::path::PathBuf,
    },
    /// Scrape run history
    Runs {
        #[command(subcommand)]
        command: RunsCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("iwp-cli ready; run with --help for commands");
        return Ok(());
    };

    let config = iwp_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = iwp_db::PoolConfig::from_app_config(&config);
    let pool = iwp_db::connect_pool(&config.database_url, pool_config).await?;

    let result = dispatch(&pool, &config, command).await;
    pool.close().await;
    result
}

async fn dispatch(
    pool: &sqlx::PgPool,
    config: &iwp_core::AppConfig,
    command: Commands,
) -> anyhow::Result<()> {
    match command {
        Commands::Db {
            command: DbCommands::Ping,
        } => {
            iwp_db::ping(pool).await?;
            println!("database ok");
        }
        Commands::Db {
            command: DbCommands::Migrate,
        } => {
            let applied = iwp_db::run_migrations(pool).await?;
            println!("applied {applied} migrations");
        }
        Commands::Scrape {
            start_page,
            max_pages,
            dry_run,
        } => {
            let max_pages = max_pages.unwrap_or(config.scraper_max_pages);
            scrape::run_scrape(pool, config, start_page, max_pages, dry_run).await?;
        }
        Commands::Inspections {
            command: InspectionsCommands::Ingest { limit, dry_run },
        } => {
            inspections::run_inspections_ingest(pool, config, limit, dry_run).await?;
        }
        Commands::Merge { out } => merge::run_merge(pool, &out).await?,
        Commands::Runs {
            command: RunsCommands::List { limit },
        } => runs::run_runs_list(pool, limit).await?,
    }
    Ok(())
}

/// Attempt to mark a scrape run as failed, logging any secondary error.
async fn fail_run_best_effort(pool: &sqlx::PgPool, run_id: i64, message: String) {
    if let Err(mark_err) = iwp_db::fail_scrape_run(pool, run_id, &message).await {
        tracing::error!(
            run_id,
            error = %mark_err,
            "failed to mark scrape run as failed"
        );
    }
}
