//! HTTP delivery of encoded envelopes.
//!
//! The client only needs "POST these bytes, give me the body back". Anything
//! that can do that implements `Transport`; `HttpTransport` is the reqwest
//! implementation used in production.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::RpcError;

#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` to `endpoint` and return the response body.
    ///
    /// A non-200 status is `RpcError::HttpStatus`; a connection or read
    /// failure is `RpcError::Transport`.
    async fn post(&self, endpoint: &str, body: Vec<u8>) -> Result<Vec<u8>, RpcError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, RpcError> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| RpcError::Transport(e.to_string()))?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, endpoint: &str, body: Vec<u8>) -> Result<Vec<u8>, RpcError> {
        let response = self
            .http_client
            .post(endpoint)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        match response.status() {
            reqwest::StatusCode::OK => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| RpcError::Transport(e.to_string()))?;
                debug!(endpoint, len = bytes.len(), "received response");
                Ok(bytes.to_vec())
            }
            status => Err(RpcError::HttpStatus(status.as_u16())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_from_default_config() {
        assert!(HttpTransport::new(&ClientConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let config = ClientConfig {
            request_timeout_ms: 500,
            ..Default::default()
        };
        let transport = HttpTransport::new(&config).unwrap();
        let err = transport
            .post("http://127.0.0.1:1/rpc", vec![1, 2, 3])
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::Transport(_)));
    }
}
