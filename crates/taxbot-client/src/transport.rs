//! Transport abstraction for reaching the tax endpoint

use async_trait::async_trait;
use reqwest::{Url, header::CONTENT_TYPE};

use crate::{
    error::{Error, Result},
    types::TaxRequest,
};

/// Endpoint used when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "https://api.example.com/tax/calculate";

/// Sends one calculation request and hands back the raw response body
#[async_trait]
pub trait TaxTransport: Send + Sync {
    /// POST the request; a success status yields the body text
    async fn calculate(&self, request: &TaxRequest) -> Result<String>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Create a transport for the given endpoint URL
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Err(Error::InvalidConfig("endpoint URL is empty".to_string()));
        }
        let endpoint = Url::parse(endpoint)
            .map_err(|e| Error::InvalidConfig(format!("invalid endpoint '{}': {}", endpoint, e)))?;

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
        })
    }

    /// The endpoint requests are sent to
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

#[async_trait]
impl TaxTransport for HttpTransport {
    async fn calculate(&self, request: &TaxRequest) -> Result<String> {
        tracing::debug!(
            endpoint = %self.endpoint,
            income = request.income,
            country = %request.country,
            "posting tax calculation"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "tax endpoint returned an error status");
            return Err(Error::Status { status });
        }

        Ok(response.text().await?)
    }
}
