//! Builds, signs and broadcasts contract transactions.
//!
//! A send runs the stages in order and stops at the first failure:
//!
//! 1. validate the function name and argument count
//! 2. encode the call data
//! 3. estimate gas (with the configured margin), read the gas price and the
//!    sender nonce
//! 4. assemble the unsigned fields
//! 5. sign the RLP payload
//! 6. frame the signed transaction and broadcast it
//!
//! Nothing reaches the node's mempool unless every stage before the
//! broadcast succeeded.

use eth_codec::abi::Abi;
use eth_codec::address::Address;
use eth_codec::numeric::strip_0x;
use eth_codec::CodecError;
use eth_rpc::{CallRequest, NodeApi};
use eth_signer::{SignerError, Wallet};
use num_bigint::BigUint;
use tracing::debug;

use crate::config::TxConfig;
use crate::error::ContractError;
use crate::transaction::{SignedTransaction, TransactionFields};

/// Transaction pipeline for one contract.
#[derive(Debug)]
pub struct TransactionBuilder<'a, N> {
    node: &'a N,
    abi: &'a Abi,
    contract: Address,
    config: &'a TxConfig,
}

impl<'a, N: NodeApi> TransactionBuilder<'a, N> {
    pub fn new(node: &'a N, abi: &'a Abi, contract: Address, config: &'a TxConfig) -> Self {
        Self {
            node,
            abi,
            contract,
            config,
        }
    }

    /// Checks the function and argument count, then encodes the call data.
    pub fn encode<S: AsRef<str>>(&self, function: &str, args: &[S]) -> Result<String, ContractError> {
        self.abi
            .check_arguments(function, args.len())
            .map_err(ContractError::Argument)?;
        Ok(self.abi.encode_call_data(function, args)?)
    }

    /// Runs everything up to signing: the unsigned fields with gas, gas
    /// price and nonce filled in from the node.
    pub fn prepare<S: AsRef<str>>(
        &self,
        from: &Address,
        function: &str,
        args: &[S],
        value: Option<BigUint>,
    ) -> Result<TransactionFields, ContractError> {
        let data = self.encode(function, args)?;
        let value = value.unwrap_or_default();

        let request = CallRequest::new(self.contract, data.as_str())
            .from(*from)
            .value(value.clone());
        let estimate = self.node.estimate_gas(&request)?;
        let gas_limit = self.config.gas_margin.apply(&estimate);
        let gas_price = self.node.gas_price()?;
        let nonce = self.node.transaction_count(from, self.config.nonce_block)?;

        debug!(
            function,
            %estimate,
            %gas_limit,
            %gas_price,
            %nonce,
            "prepared transaction"
        );

        let data = hex::decode(strip_0x(&data))
            .map_err(|e| CodecError::InvalidEncoding(format!("call data is not hex: {e}")))?;

        Ok(TransactionFields {
            nonce: Some(nonce),
            gas_price: Some(gas_price),
            gas_limit: Some(gas_limit),
            to: Some(self.contract),
            value: Some(value),
            data,
        })
    }

    /// Signs `fields` with `wallet` and frames the signed transaction.
    pub fn sign(
        &self,
        fields: TransactionFields,
        wallet: &Wallet,
    ) -> Result<SignedTransaction, ContractError> {
        let chain_id = self.config.chain_id;
        let signature = wallet.sign_bytes(&fields.signing_payload(chain_id))?;
        let signed = fields.into_signed(&signature, chain_id);

        debug!(hash = %signed.hash(), v = %signed.v(), "signed transaction");
        Ok(signed)
    }

    /// Submits a signed transaction; returns the hash reported by the node.
    pub fn broadcast(&self, signed: &SignedTransaction) -> Result<String, ContractError> {
        let hash = self.node.send_raw_transaction(&signed.raw_hex())?;
        debug!(%hash, "broadcast transaction");
        Ok(hash)
    }

    /// Runs the whole pipeline for `wallet` and returns the transaction hash.
    pub fn send<S: AsRef<str>>(
        &self,
        wallet: &Wallet,
        function: &str,
        args: &[S],
        value: Option<BigUint>,
    ) -> Result<String, ContractError> {
        if wallet.is_locked() {
            return Err(SignerError::LockedWallet.into());
        }

        let fields = self.prepare(wallet.address(), function, args, value)?;
        let signed = self.sign(fields, wallet)?;
        self.broadcast(&signed)
    }

    /// Executes a read-only call and returns the raw result data.
    pub fn call<S: AsRef<str>>(&self, function: &str, args: &[S]) -> Result<String, ContractError> {
        let data = self.encode(function, args)?;
        let request = CallRequest::new(self.contract, data);
        let result = self.node.call(&request, self.config.call_block)?;

        debug!(function, %result, "read-only call");
        Ok(result)
    }
}
