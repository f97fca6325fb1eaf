//! HTTP session used for listing pages and incident detail pages.

use std::time::Duration;

use iwp_core::AddressInfo;
use reqwest::Client;

use crate::address::parse_address;
use crate::error::ScraperError;
use crate::parse::extract_detail_address;

/// Thin `reqwest` wrapper that turns non-2xx responses into typed errors.
///
/// Requests are never retried; a transport failure is returned to the caller
/// as [`ScraperError::Http`].
#[derive(Debug, Clone)]
pub struct IwpClient {
    client: Client,
}

impl IwpClient {
    /// Creates a client with the configured request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// GETs `url` and returns the response body as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::NotFound`]: HTTP 404.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::Http`]: network or TLS failure, or an unusable URL.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }

    /// Visits an incident detail page and parses its address.
    ///
    /// Returns `Ok(None)` without making a request when `detail_url` is
    /// empty. A detail page without an address node parses as an empty
    /// unstructured address.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_html`].
    pub async fn fetch_incident_address(
        &self,
        detail_url: &str,
    ) -> Result<Option<AddressInfo>, ScraperError> {
        if detail_url.is_empty() {
            return Ok(None);
        }

        let markup = self.fetch_html(detail_url).await?;
        let address_text = extract_detail_address(&markup);
        if address_text.is_empty() {
            tracing::debug!(detail_url, "detail page has no address text");
        }

        Ok(Some(parse_address(&address_text)))
    }
}
