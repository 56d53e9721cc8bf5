use eth_codec::address::Address;
use num_bigint::BigUint;

use crate::error::RpcError;
use crate::filter::{Log, LogFilter};
use crate::method::{BlockTag, CallRequest};

/// The node queries the transaction pipeline depends on.
///
/// [`JsonRpcClient`](crate::client::JsonRpcClient) is the production
/// implementation; tests substitute an in-memory node.
pub trait NodeApi {
    /// `eth_estimateGas`.
    fn estimate_gas(&self, request: &CallRequest) -> Result<BigUint, RpcError>;

    /// `eth_gasPrice`.
    fn gas_price(&self) -> Result<BigUint, RpcError>;

    /// `eth_getTransactionCount`.
    fn transaction_count(&self, address: &Address, block: BlockTag) -> Result<BigUint, RpcError>;

    /// `eth_sendRawTransaction`; returns the transaction hash reported by the
    /// node.
    fn send_raw_transaction(&self, raw_hex: &str) -> Result<String, RpcError>;

    /// `eth_call`; returns the raw 0x-prefixed result data.
    fn call(&self, request: &CallRequest, block: BlockTag) -> Result<String, RpcError>;

    /// `eth_chainId`.
    fn chain_id(&self) -> Result<u64, RpcError>;

    /// `eth_getLogs`.
    fn logs(&self, filter: &LogFilter) -> Result<Vec<Log>, RpcError>;
}

impl<N: NodeApi + ?Sized> NodeApi for &N {
    fn estimate_gas(&self, request: &CallRequest) -> Result<BigUint, RpcError> {
        (**self).estimate_gas(request)
    }

    fn gas_price(&self) -> Result<BigUint, RpcError> {
        (**self).gas_price()
    }

    fn transaction_count(&self, address: &Address, block: BlockTag) -> Result<BigUint, RpcError> {
        (**self).transaction_count(address, block)
    }

    fn send_raw_transaction(&self, raw_hex: &str) -> Result<String, RpcError> {
        (**self).send_raw_transaction(raw_hex)
    }

    fn call(&self, request: &CallRequest, block: BlockTag) -> Result<String, RpcError> {
        (**self).call(request, block)
    }

    fn chain_id(&self) -> Result<u64, RpcError> {
        (**self).chain_id()
    }

    fn logs(&self, filter: &LogFilter) -> Result<Vec<Log>, RpcError> {
        (**self).logs(filter)
    }
}
