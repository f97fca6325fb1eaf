//! Destination for incidents produced by a scrape run.

use std::future::Future;

use crate::incident::IncidentRecord;

/// Insert-only store of incident documents.
///
/// The scraper writes each listing page through [`IncidentSink::insert_many`]
/// before advancing, so a failed run loses at most the page in flight.
pub trait IncidentSink {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Inserts every record as a new document and returns how many were
    /// written. No uniqueness is enforced.
    fn insert_many(
        &self,
        records: &[IncidentRecord],
    ) -> impl Future<Output = Result<usize, Self::Error>> + Send;

    /// Total number of documents currently held.
    fn count(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send;
}
