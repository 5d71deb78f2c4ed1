use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::FetchError;

/// Fetches raw listing bodies. `query` is appended to `url` when non-empty.
#[async_trait]
pub trait ListingTransport: Send + Sync {
    async fn fetch_page(
        &self,
        url: Url,
        query: &[(&'static str, String)],
    ) -> Result<String, FetchError>;
}

pub struct HttpListingTransport {
    http: Client,
}

impl HttpListingTransport {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }
}

impl Default for HttpListingTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListingTransport for HttpListingTransport {
    async fn fetch_page(
        &self,
        url: Url,
        query: &[(&'static str, String)],
    ) -> Result<String, FetchError> {
        let mut request = self.http.get(url.clone());
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "listing: response received");
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}
