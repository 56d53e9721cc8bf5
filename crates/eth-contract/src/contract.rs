use eth_codec::abi::Abi;
use eth_codec::address::Address;
use eth_rpc::{parse_topic, Log, LogFilter, NodeApi, TopicFilter};
use eth_signer::Wallet;
use num_bigint::BigUint;
use tracing::debug;

use crate::builder::TransactionBuilder;
use crate::config::TxConfig;
use crate::error::ContractError;

/// A deployed contract: its address, its parsed ABI and the node to reach it
/// through.
#[derive(Debug)]
pub struct Contract<N> {
    node: N,
    abi: Abi,
    address: Address,
    config: TxConfig,
}

impl<N: NodeApi> Contract<N> {
    /// Parses `abi_json` and binds it to the contract at `address`.
    pub fn at(node: N, abi_json: &str, address: Address) -> Result<Self, ContractError> {
        Ok(Self {
            node,
            abi: Abi::from_json(abi_json)?,
            address,
            config: TxConfig::default(),
        })
    }

    pub fn with_config(mut self, config: TxConfig) -> Self {
        self.config = config;
        self
    }

    pub fn builder(&self) -> TransactionBuilder<'_, N> {
        TransactionBuilder::new(&self.node, &self.abi, self.address, &self.config)
    }

    /// Sends a state-changing call from `wallet` and returns the transaction
    /// hash.
    pub fn send<S: AsRef<str>>(
        &self,
        wallet: &Wallet,
        function: &str,
        args: &[S],
    ) -> Result<String, ContractError> {
        self.builder().send(wallet, function, args, None)
    }

    /// Like [`send`](Self::send), transferring `value` wei along with the
    /// call.
    pub fn send_with_value<S: AsRef<str>>(
        &self,
        wallet: &Wallet,
        function: &str,
        args: &[S],
        value: BigUint,
    ) -> Result<String, ContractError> {
        self.builder().send(wallet, function, args, Some(value))
    }

    /// Executes a read-only call and returns the raw result data.
    pub fn call<S: AsRef<str>>(&self, function: &str, args: &[S]) -> Result<String, ContractError> {
        self.builder().call(function, args)
    }

    /// Filter matching `event` logs emitted by this contract.
    pub fn event_filter(&self, event: &str) -> Result<LogFilter, ContractError> {
        let topic = parse_topic(&self.abi.event_topic(event)?)?;
        Ok(LogFilter::new()
            .address(self.address)
            .topic(TopicFilter::Exact(topic)))
    }

    /// Fetches logs matching `filter`, restricted to this contract's address.
    pub fn logs(&self, filter: LogFilter) -> Result<Vec<Log>, ContractError> {
        let logs = self.node.logs(&filter.address(self.address))?;
        debug!(count = logs.len(), "fetched contract logs");
        Ok(logs)
    }

    /// Name of the event whose topic hash is `topic`.
    pub fn decode_event(&self, topic: &str) -> Result<&str, ContractError> {
        Ok(self.abi.decode_event_name(topic)?)
    }

    pub fn function_names(&self) -> Vec<&str> {
        self.abi.function_names()
    }

    pub fn event_names(&self) -> Vec<&str> {
        self.abi.event_names()
    }

    pub fn abi(&self) -> &Abi {
        &self.abi
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn config(&self) -> &TxConfig {
        &self.config
    }

    pub fn node(&self) -> &N {
        &self.node
    }
}
