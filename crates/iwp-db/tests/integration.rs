//! Offline unit tests for iwp-db pool configuration and row types.
//! These tests do not require a live database connection.

use iwp_core::{AppConfig, Environment};
use iwp_db::{DbError, PoolConfig, ScrapeRunRow};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        log_level: "info".to_string(),
        base_url: "https://iwaspoisoned.com".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        scraper_request_timeout_secs: 30,
        scraper_user_agent: "ua".to_string(),
        scraper_page_delay_ms: 2000,
        scraper_max_pages: 20_000,
        region_filter: "Illinois".to_string(),
        inspections_url: "https://data.example.com/inspections.json".to_string(),
        inspections_limit: 100,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`ScrapeRunRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn scrape_run_row_has_expected_fields() {
    use chrono::Utc;
    use uuid::Uuid;

    let row = ScrapeRunRow {
        id: 1_i64,
        public_id: Uuid::new_v4(),
        status: "running".to_string(),
        start_page: 1_i32,
        max_pages: 20_000_i32,
        pages_visited: 0_i32,
        incidents_persisted: 0_i64,
        stop_reason: None,
        error_message: None,
        started_at: Utc::now(),
        completed_at: None,
    };

    assert_eq!(row.status, "running");
    assert_eq!(row.max_pages, 20_000);
    assert!(row.stop_reason.is_none());
    assert!(row.completed_at.is_none());
}

#[test]
fn invalid_transition_error_names_run_and_expected_status() {
    let err = DbError::InvalidRunTransition {
        id: 12,
        expected_status: "running",
    };
    assert_eq!(err.to_string(), "scrape run 12 is not running");
}
