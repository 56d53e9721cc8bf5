//! Contract calls and signed legacy transactions over JSON-RPC.
//!
//! [`Contract`] binds an ABI to a deployed address and a [`NodeApi`]
//! implementation; [`TransactionBuilder`] holds the send pipeline and exposes
//! its stages for callers that want to inspect the transaction before it is
//! broadcast.
//!
//! [`NodeApi`]: eth_rpc::NodeApi

pub mod builder;
pub mod config;
pub mod contract;
pub mod error;
pub mod transaction;

pub use builder::TransactionBuilder;
pub use config::{GasMargin, TxConfig};
pub use contract::Contract;
pub use error::ContractError;
pub use transaction::{SignedTransaction, TransactionFields};
