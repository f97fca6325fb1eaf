pub mod client;
pub mod error;
pub mod merge;
pub mod normalize;
pub mod types;

pub use client::{InspectionsClient, DEFAULT_FEED_URL};
pub use error::InspectionsError;
pub use merge::{merge, normalize_business_name, IncidentRow, MergedRow};
pub use normalize::{clean_inspection, clean_inspections, RejectReason};
pub use types::RawInspection;
