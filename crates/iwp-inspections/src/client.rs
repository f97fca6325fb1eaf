//! HTTP client for the city food-inspection open-data feed.
//!
//! The feed is a Socrata resource: a GET returns a JSON array of rows, and the
//! `$limit` query parameter caps how many are returned.

use std::time::Duration;

use iwp_core::Inspection;
use reqwest::{Client, Url};

use crate::error::InspectionsError;
use crate::normalize::clean_inspections;
use crate::types::RawInspection;

pub const DEFAULT_FEED_URL: &str = "https://data.cityofchicago.org/resource/cwig-ma7x.json";

/// Client for the inspections feed.
///
/// Use [`InspectionsClient::new`] for the production feed or
/// [`InspectionsClient::with_feed_url`] to point at a mock server in tests.
pub struct InspectionsClient {
    client: Client,
    feed_url: Url,
}

impl InspectionsClient {
    /// Creates a client pointed at the production feed.
    ///
    /// # Errors
    ///
    /// Returns [`InspectionsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, InspectionsError> {
        Self::with_feed_url(timeout_secs, user_agent, DEFAULT_FEED_URL)
    }

    /// Creates a client for an arbitrary feed URL.
    ///
    /// # Errors
    ///
    /// Returns [`InspectionsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`InspectionsError::InvalidUrl`] if
    /// `feed_url` is not a valid URL.
    pub fn with_feed_url(
        timeout_secs: u64,
        user_agent: &str,
        feed_url: &str,
    ) -> Result<Self, InspectionsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let feed_url = Url::parse(feed_url).map_err(|e| InspectionsError::InvalidUrl {
            url: feed_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, feed_url })
    }

    /// Fetches up to `limit` raw rows.
    ///
    /// # Errors
    ///
    /// - [`InspectionsError::UnexpectedStatus`] on a non-2xx status.
    /// - [`InspectionsError::Http`] on network failure.
    /// - [`InspectionsError::Deserialize`] if the body is not a JSON array of
    ///   objects.
    pub async fn fetch_raw(&self, limit: u32) -> Result<Vec<RawInspection>, InspectionsError> {
        let url = self.build_url(limit);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(InspectionsError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| InspectionsError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    /// Fetches up to `limit` rows and keeps only the ones that clean
    /// successfully.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_raw`].
    pub async fn fetch_inspections(&self, limit: u32) -> Result<Vec<Inspection>, InspectionsError> {
        let raw = self.fetch_raw(limit).await?;
        let fetched = raw.len();
        let cleaned = clean_inspections(raw);
        tracing::info!(fetched, kept = cleaned.len(), "cleaned inspection rows");
        Ok(cleaned)
    }

    /// Appends `$limit` to the feed URL, keeping any query it already has.
    fn build_url(&self, limit: u32) -> Url {
        let mut url = self.feed_url.clone();
        url.query_pairs_mut().append_pair("$limit", &limit.to_string());
        url
    }
}
