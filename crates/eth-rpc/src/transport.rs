use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{RpcError, TransportError};

/// Moves one JSON-RPC envelope to the node and returns the decoded response
/// body.
///
/// Implementations do not interpret the body; error objects are handled by
/// the client.
pub trait Transport {
    fn send(&self, envelope: &Value) -> Result<Value, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, envelope: &Value) -> Result<Value, TransportError> {
        (**self).send(envelope)
    }
}

/// Blocking HTTP POST transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, RpcError> {
        config.validate()?;

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .map_err(|e| RpcError::Config(e.to_string()))?;

        Ok(Self {
            client,
            url: config.rpc_url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Transport for HttpTransport {
    fn send(&self, envelope: &Value) -> Result<Value, TransportError> {
        let response = self
            .client
            .post(&self.url)
            .json(envelope)
            .send()?
            .error_for_status()?;
        Ok(response.json::<Value>()?)
    }
}
