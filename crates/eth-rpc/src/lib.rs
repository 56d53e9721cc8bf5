//! JSON-RPC access to an EVM node.
//!
//! This crate provides:
//! - The [`NodeApi`] seam the transaction pipeline talks to
//! - A closed [`RpcMethod`] enum covering every request the client can send
//! - [`JsonRpcClient`], one generic request path over a pluggable [`Transport`]
//! - Log filters and typed log entries
//! - Client configuration and a registry of well-known networks

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod method;
pub mod networks;
pub mod transport;

pub use api::NodeApi;
pub use client::JsonRpcClient;
pub use config::ClientConfig;
pub use error::{RpcError, TransportError};
pub use filter::{parse_topic, Log, LogFilter, Topic, TopicFilter};
pub use method::{BlockTag, CallRequest, RpcMethod};
pub use transport::{HttpTransport, Transport};
