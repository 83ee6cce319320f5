//! HTTP client for the upstream sports-data API
//!
//! One GET per call, no retries: a failed attempt surfaces immediately.

use reqwest::{Client, Url, header};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::{Error, Result};

/// Upstream error bodies are truncated to this many characters in messages
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: Url,
}

impl UpstreamClient {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let base_url = config.base_url()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET `url` and parse the body as JSON
    pub async fn get_json(&self, url: Url) -> Result<Value> {
        debug!(url = %url, "GET request");

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Upstream request failed");
            Error::Http(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(url = %url, status = status.as_u16(), "Upstream returned error status");
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                url: url.to_string(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(url = %url, error = %e, "Upstream body is not valid JSON");
            Error::Json(e)
        })
    }
}
