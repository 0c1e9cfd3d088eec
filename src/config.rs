//! Client configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RpcError;

pub const DEFAULT_ENDPOINT: &str = "https://pgorelease.nianticlabs.com/plfe/rpc";
pub const DEFAULT_USER_AGENT: &str = "Niantic App";

/// Settings fixed for the lifetime of a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Initial RPC endpoint. The server may redirect away from it.
    pub endpoint: String,
    pub user_agent: String,
    /// Build fingerprint carried in every signature.
    pub version_hash: u32,
    /// Refresh the access token automatically when the server rejects it.
    pub refresh_auth_tokens: bool,
    /// Offset added to every "since start" timestamp so a fresh process
    /// does not look like a freshly launched app.
    pub start_time_adjustment_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            version_hash: 0,
            refresh_auth_tokens: false,
            start_time_adjustment_ms: 0,
            request_timeout_ms: 30_000,
        }
    }
}

impl ClientConfig {
    pub fn from_json_str(json: &str) -> Result<Self, RpcError> {
        serde_json::from_str(json).map_err(|e| RpcError::Config(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RpcError> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| RpcError::Config(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_json_str(&raw)
    }
}
