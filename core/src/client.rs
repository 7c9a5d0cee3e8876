use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;
use tracing::{debug, instrument};

use crate::config::AshramConfig;
use crate::errors::{AshramError, AshramResult};
use crate::types::{ChatRequest, ChatResponse};

/// Anything able to deliver a request envelope and hand back the response envelope.
///
/// Handlers only see this trait, so they can be driven without a network.
#[async_trait]
pub trait GuidanceTransport: Send + Sync + Debug {
    async fn send(&self, request: &ChatRequest) -> AshramResult<ChatResponse>;
}

/// Client for the chat-gita endpoint
#[derive(Debug, Clone)]
pub struct AshramClient {
    client: Client,
    endpoint: String,
}

impl AshramClient {
    /// Create a new client posting to the configured endpoint
    pub fn new(config: &AshramConfig) -> AshramResult<Self> {
        let endpoint = config.endpoint().to_string();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(AshramError::ConfigError(format!(
                "Endpoint must be an http(s) URL, got '{}'",
                endpoint
            )));
        }

        Ok(Self {
            client: Client::new(),
            endpoint,
        })
    }

    /// The URL requests are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GuidanceTransport for AshramClient {
    #[instrument(skip(self, request), fields(feature = ?request.feature))]
    async fn send(&self, request: &ChatRequest) -> AshramResult<ChatResponse> {
        debug!("Posting request to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| AshramError::RequestError(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.map_err(|e| {
                AshramError::ResponseError(format!("Failed to read error response: {}", e))
            })?;

            return Err(AshramError::HttpError {
                status_code: status.as_u16(),
                message: format!("Request failed: {}", error_body),
            });
        }

        let response_body = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| AshramError::ParsingError(format!("Failed to parse response: {}", e)))?;

        debug!(success = response_body.success, "Received response");
        Ok(response_body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_endpoint() {
        let config = AshramConfig {
            endpoint: Some("ftp://example.test/api".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            AshramClient::new(&config),
            Err(AshramError::ConfigError(_))
        ));
    }

    #[test]
    fn test_uses_configured_endpoint() {
        let client = AshramClient::new(&AshramConfig::default()).unwrap();
        assert_eq!(client.endpoint(), crate::config::DEFAULT_ENDPOINT);
    }
}
