#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    /// Root of the incident site; listing pages are `<base_url>/?page=N`.
    pub base_url: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    /// Courtesy pause before following a `rel="next"` link.
    pub scraper_page_delay_ms: u64,
    pub scraper_max_pages: u32,
    /// Region that, together with "United States", an incident address must
    /// mention to be retained.
    pub region_filter: String,
    pub inspections_url: String,
    pub inspections_limit: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("base_url", &self.base_url)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field("scraper_page_delay_ms", &self.scraper_page_delay_ms)
            .field("scraper_max_pages", &self.scraper_max_pages)
            .field("region_filter", &self.region_filter)
            .field("inspections_url", &self.inspections_url)
            .field("inspections_limit", &self.inspections_limit)
            .finish()
    }
}
