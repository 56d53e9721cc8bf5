use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::RpcError;
use crate::networks::{get_network, LOCAL};

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`JsonRpcClient`](crate::client::JsonRpcClient).
///
/// Every field has a default, so a JSON config only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// HTTP(S) endpoint of the node.
    pub rpc_url: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: LOCAL.rpc_url.to_string(),
            timeout_secs: 60,
            user_agent: APP_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            ..Self::default()
        }
    }

    /// Uses the public endpoint of a well-known network.
    pub fn for_network(chain_id: u64) -> Result<Self, RpcError> {
        let network = get_network(chain_id)
            .ok_or_else(|| RpcError::Config(format!("unknown chain id {chain_id}")))?;
        Ok(Self::new(network.rpc_url))
    }

    /// Parses and validates a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, RpcError> {
        let config: Self = serde_json::from_str(json).map_err(|e| RpcError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RpcError> {
        if !(self.rpc_url.starts_with("http://") || self.rpc_url.starts_with("https://")) {
            return Err(RpcError::Config(format!(
                "rpc_url {:?} must be an http(s) url",
                self.rpc_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(RpcError::Config("timeout_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_node() {
        let config = ClientConfig::default();
        assert_eq!(config.rpc_url, "http://127.0.0.1:8545");
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert!(config.user_agent.starts_with("eth-rpc/"));
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let config = ClientConfig::from_json(r#"{"rpc_url": "https://node.example"}"#).unwrap();
        assert_eq!(config.rpc_url, "https://node.example");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn from_json_rejects_bad_values() {
        assert!(ClientConfig::from_json(r#"{"rpc_url": "ftp://node"}"#).is_err());
        assert!(ClientConfig::from_json(r#"{"timeout_secs": 0}"#).is_err());
        assert!(ClientConfig::from_json("not json").is_err());
    }

    #[test]
    fn for_network_uses_registry() {
        let config = ClientConfig::for_network(11155111).unwrap();
        assert_eq!(config.rpc_url, "https://rpc.sepolia.org");
        assert!(matches!(ClientConfig::for_network(424242), Err(RpcError::Config(_))));
    }
}
