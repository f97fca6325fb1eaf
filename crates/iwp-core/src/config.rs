use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://iwaspoisoned.com";
pub const DEFAULT_INSPECTIONS_URL: &str = "https://data.cityofchicago.org/resource/cwig-ma7x.json";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("IWP_ENV", "development"))?;
    let log_level = or_default("IWP_LOG_LEVEL", "info");
    let base_url = or_default("IWP_BASE_URL", DEFAULT_BASE_URL)
        .trim_end_matches('/')
        .to_string();

    let db_max_connections = parse_u32("IWP_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("IWP_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("IWP_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let scraper_request_timeout_secs = parse_u64("IWP_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default(
        "IWP_SCRAPER_USER_AGENT",
        "iwp-etl/0.1 (incident-research)",
    );
    let scraper_page_delay_ms = parse_u64("IWP_SCRAPER_PAGE_DELAY_MS", "2000")?;
    let scraper_max_pages = parse_u32("IWP_SCRAPER_MAX_PAGES", "20000")?;

    let region_filter = or_default("IWP_REGION_FILTER", "Illinois");
    if region_filter.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "IWP_REGION_FILTER".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    let inspections_url = or_default("IWP_INSPECTIONS_URL", DEFAULT_INSPECTIONS_URL);
    let inspections_limit = parse_u32("IWP_INSPECTIONS_LIMIT", "150000")?;

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        base_url,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_page_delay_ms,
        scraper_max_pages,
        region_filter,
        inspections_url,
        inspections_limit,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "IWP_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
