pub mod app_config;
pub mod config;
pub mod incident;
pub mod inspection;
pub mod sink;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use incident::{AddressInfo, IncidentRecord, StructuredAddress};
pub use inspection::Inspection;
pub use sink::IncidentSink;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
