pub mod address;
pub mod client;
pub mod crawl;
pub mod error;
pub mod page;
pub mod pagination;
pub mod parse;

pub use address::parse_address;
pub use client::IwpClient;
pub use crawl::{IncidentScraper, ScrapeOptions, ScrapeSummary, StopReason};
pub use error::ScraperError;
pub use page::{parse_incident_page, PageOutcome, RegionFilter};
pub use parse::{extract_incident_cards, IncidentCard, PageShapeError};
