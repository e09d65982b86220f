//! Store HTTP Client
//!
//! Sends a single query to the store. There is no retry: a transport failure
//! is returned to the caller as-is.

use reqwest::{Client, Response};
use std::time::Duration;

use crate::config::StoreConfig;
use crate::query::{QueryError, QueryRequest, Result};

/// HTTP client for the store's query endpoint
pub struct StoreClient {
    client: Client,
}

impl StoreClient {
    /// Create a client. Without `request_timeout_secs` the transport default
    /// applies.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder.build().map_err(QueryError::Transport)?;
        Ok(Self { client })
    }

    /// Send `request` and return the response with its body unread.
    pub async fn execute(&self, request: &QueryRequest) -> Result<Response> {
        tracing::debug!(method = %request.method(), url = request.target(), "sending query");

        let response = self
            .client
            .request(request.method().into(), request.url().clone())
            .send()
            .await
            .map_err(QueryError::Transport)?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "store responded");

        if !status.is_success() {
            let message = match response.text().await {
                Ok(body) => body.trim().to_string(),
                Err(e) => {
                    tracing::debug!(error = %e, "failed to read error response body");
                    format!("unreadable response body: {}", e)
                }
            };
            return Err(QueryError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}
