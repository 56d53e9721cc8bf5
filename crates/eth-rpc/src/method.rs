//! The closed set of requests the client knows how to send.

use eth_codec::address::Address;
use eth_codec::numeric::biguint_to_hex;
use num_bigint::BigUint;
use num_traits::Zero;
use serde_json::{json, Map, Value};

use crate::filter::LogFilter;

/// Block selector for state queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockTag {
    #[default]
    Latest,
    Pending,
    Earliest,
    Number(u64),
}

impl BlockTag {
    pub fn to_param(&self) -> String {
        match self {
            BlockTag::Latest => "latest".into(),
            BlockTag::Pending => "pending".into(),
            BlockTag::Earliest => "earliest".into(),
            BlockTag::Number(n) => format!("0x{n:x}"),
        }
    }
}

impl serde::Serialize for BlockTag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_param())
    }
}

impl<'de> serde::Deserialize<'de> for BlockTag {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = <String as serde::Deserialize>::deserialize(deserializer)?;
        match tag.as_str() {
            "latest" => Ok(BlockTag::Latest),
            "pending" => Ok(BlockTag::Pending),
            "earliest" => Ok(BlockTag::Earliest),
            other => {
                let digits = other.strip_prefix("0x").ok_or_else(|| {
                    serde::de::Error::custom(format!("unknown block tag {other:?}"))
                })?;
                u64::from_str_radix(digits, 16)
                    .map(BlockTag::Number)
                    .map_err(serde::de::Error::custom)
            }
        }
    }
}

/// Renders a JSON-RPC quantity: `0x`-prefixed, no leading zeros, `0x0` for
/// zero.
pub fn to_quantity(value: &BigUint) -> String {
    if value.is_zero() {
        "0x0".into()
    } else {
        biguint_to_hex(value, true)
    }
}

/// Transaction-shaped parameter of `eth_call` and `eth_estimateGas`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Option<Address>,
    pub to: Address,
    /// 0x-prefixed call data.
    pub data: String,
    pub value: Option<BigUint>,
}

impl CallRequest {
    pub fn new(to: Address, data: impl Into<String>) -> Self {
        Self {
            from: None,
            to,
            data: data.into(),
            value: None,
        }
    }

    pub fn from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    pub fn value(mut self, value: BigUint) -> Self {
        self.value = Some(value);
        self
    }

    /// JSON object with unset members omitted.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        if let Some(from) = &self.from {
            object.insert("from".into(), Value::String(from.to_string()));
        }
        object.insert("to".into(), Value::String(self.to.to_string()));
        if let Some(value) = &self.value {
            object.insert("value".into(), Value::String(to_quantity(value)));
        }
        if !self.data.is_empty() {
            object.insert("data".into(), Value::String(self.data.clone()));
        }
        Value::Object(object)
    }
}

/// Every JSON-RPC method the client supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcMethod {
    ClientVersion,
    NetVersion,
    ChainId,
    BlockNumber,
    GasPrice,
    GetBalance { address: Address, block: BlockTag },
    GetTransactionCount { address: Address, block: BlockTag },
    GetCode { address: Address, block: BlockTag },
    EstimateGas(CallRequest),
    Call { request: CallRequest, block: BlockTag },
    /// 0x-prefixed signed transaction bytes.
    SendRawTransaction(String),
    GetTransactionByHash(String),
    GetTransactionReceipt(String),
    /// `full` asks for transaction objects instead of hashes.
    GetBlockByNumber { block: BlockTag, full: bool },
    GetBlockByHash { hash: String, full: bool },
    GetLogs(LogFilter),
    NewFilter(LogFilter),
    /// Filter ids are the opaque quantities returned by `eth_newFilter`.
    GetFilterChanges(String),
    GetFilterLogs(String),
    UninstallFilter(String),
}

impl RpcMethod {
    /// Wire name of the method.
    pub fn name(&self) -> &'static str {
        match self {
            RpcMethod::ClientVersion => "web3_clientVersion",
            RpcMethod::NetVersion => "net_version",
            RpcMethod::ChainId => "eth_chainId",
            RpcMethod::BlockNumber => "eth_blockNumber",
            RpcMethod::GasPrice => "eth_gasPrice",
            RpcMethod::GetBalance { .. } => "eth_getBalance",
            RpcMethod::GetTransactionCount { .. } => "eth_getTransactionCount",
            RpcMethod::GetCode { .. } => "eth_getCode",
            RpcMethod::EstimateGas(_) => "eth_estimateGas",
            RpcMethod::Call { .. } => "eth_call",
            RpcMethod::SendRawTransaction(_) => "eth_sendRawTransaction",
            RpcMethod::GetTransactionByHash(_) => "eth_getTransactionByHash",
            RpcMethod::GetTransactionReceipt(_) => "eth_getTransactionReceipt",
            RpcMethod::GetBlockByNumber { .. } => "eth_getBlockByNumber",
            RpcMethod::GetBlockByHash { .. } => "eth_getBlockByHash",
            RpcMethod::GetLogs(_) => "eth_getLogs",
            RpcMethod::NewFilter(_) => "eth_newFilter",
            RpcMethod::GetFilterChanges(_) => "eth_getFilterChanges",
            RpcMethod::GetFilterLogs(_) => "eth_getFilterLogs",
            RpcMethod::UninstallFilter(_) => "eth_uninstallFilter",
        }
    }

    /// Positional params array.
    pub fn params(&self) -> Value {
        match self {
            RpcMethod::ClientVersion
            | RpcMethod::NetVersion
            | RpcMethod::ChainId
            | RpcMethod::BlockNumber
            | RpcMethod::GasPrice => json!([]),
            RpcMethod::GetBalance { address, block }
            | RpcMethod::GetTransactionCount { address, block }
            | RpcMethod::GetCode { address, block } => {
                json!([address.to_string(), block.to_param()])
            }
            RpcMethod::EstimateGas(request) => json!([request.to_json()]),
            RpcMethod::Call { request, block } => json!([request.to_json(), block.to_param()]),
            RpcMethod::SendRawTransaction(raw) => json!([raw]),
            RpcMethod::GetTransactionByHash(hash) | RpcMethod::GetTransactionReceipt(hash) => {
                json!([hash])
            }
            RpcMethod::GetBlockByNumber { block, full } => json!([block.to_param(), full]),
            RpcMethod::GetBlockByHash { hash, full } => json!([hash, full]),
            RpcMethod::GetLogs(filter) | RpcMethod::NewFilter(filter) => json!([filter.to_json()]),
            RpcMethod::GetFilterChanges(id)
            | RpcMethod::GetFilterLogs(id)
            | RpcMethod::UninstallFilter(id) => json!([id]),
        }
    }
}
