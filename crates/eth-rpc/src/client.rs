use std::sync::atomic::{AtomicU64, Ordering};

use eth_codec::address::Address;
use eth_codec::numeric::hex_to_biguint;
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use serde_json::{json, Value};
use tracing::{debug, trace};

use crate::api::NodeApi;
use crate::config::ClientConfig;
use crate::error::RpcError;
use crate::filter::{Log, LogFilter};
use crate::method::{BlockTag, CallRequest, RpcMethod};
use crate::transport::{HttpTransport, Transport};

/// JSON-RPC 2.0 client.
///
/// Request ids come from a per-client counter starting at 0; concurrent
/// callers on one client never share an id.
#[derive(Debug)]
pub struct JsonRpcClient<T = HttpTransport> {
    transport: T,
    next_id: AtomicU64,
}

impl JsonRpcClient<HttpTransport> {
    /// Connects over HTTP using `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, RpcError> {
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }
}

impl<T: Transport> JsonRpcClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(0),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends `method` and returns the `result` member of the response.
    pub fn request(&self, method: RpcMethod) -> Result<Value, RpcError> {
        let name = method.name();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let envelope = json!({
            "jsonrpc": "2.0",
            "method": name,
            "params": method.params(),
            "id": id,
        });
        trace!(%envelope, "rpc request");

        let mut response = self.transport.send(&envelope).map_err(|e| RpcError::Transport {
            method: name.to_string(),
            message: e.0,
        })?;
        trace!(%response, "rpc response");

        if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
            let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            debug!(method = name, code, %message, "node returned an error");
            return Err(RpcError::Node {
                method: name.to_string(),
                code,
                message,
            });
        }

        match response.get_mut("result") {
            Some(result) => Ok(result.take()),
            None => Err(RpcError::InvalidResponse {
                method: name.to_string(),
                message: "response has neither result nor error".into(),
            }),
        }
    }

    fn request_string(&self, method: RpcMethod) -> Result<String, RpcError> {
        let name = method.name();
        match self.request(method)? {
            Value::String(s) => Ok(s),
            other => Err(RpcError::InvalidResponse {
                method: name.to_string(),
                message: format!("expected a string, got {other}"),
            }),
        }
    }

    fn request_quantity(&self, method: RpcMethod) -> Result<BigUint, RpcError> {
        let name = method.name();
        let text = self.request_string(method)?;
        hex_to_biguint(&text).map_err(|e| RpcError::InvalidResponse {
            method: name.to_string(),
            message: e.to_string(),
        })
    }

    pub fn client_version(&self) -> Result<String, RpcError> {
        self.request_string(RpcMethod::ClientVersion)
    }

    pub fn net_version(&self) -> Result<String, RpcError> {
        self.request_string(RpcMethod::NetVersion)
    }

    pub fn block_number(&self) -> Result<u64, RpcError> {
        let number = self.request_quantity(RpcMethod::BlockNumber)?;
        number.to_u64().ok_or_else(|| RpcError::InvalidResponse {
            method: RpcMethod::BlockNumber.name().to_string(),
            message: format!("block number {number} does not fit in u64"),
        })
    }

    pub fn balance(&self, address: &Address, block: BlockTag) -> Result<BigUint, RpcError> {
        self.request_quantity(RpcMethod::GetBalance {
            address: *address,
            block,
        })
    }

    /// Deployed bytecode; `0x` for accounts without code.
    pub fn code(&self, address: &Address, block: BlockTag) -> Result<String, RpcError> {
        self.request_string(RpcMethod::GetCode {
            address: *address,
            block,
        })
    }

    /// The transaction object, or `None` if the node does not know the hash.
    pub fn transaction_by_hash(&self, hash: &str) -> Result<Option<Value>, RpcError> {
        let value = self.request(RpcMethod::GetTransactionByHash(hash.to_string()))?;
        Ok((!value.is_null()).then_some(value))
    }

    /// The receipt, or `None` while the transaction is pending.
    pub fn transaction_receipt(&self, hash: &str) -> Result<Option<Value>, RpcError> {
        let value = self.request(RpcMethod::GetTransactionReceipt(hash.to_string()))?;
        Ok((!value.is_null()).then_some(value))
    }

    /// The block object, or `None` if the node has no such block. With
    /// `full` set, transactions are objects rather than hashes.
    pub fn block_by_number(&self, block: BlockTag, full: bool) -> Result<Option<Value>, RpcError> {
        let value = self.request(RpcMethod::GetBlockByNumber { block, full })?;
        Ok((!value.is_null()).then_some(value))
    }

    pub fn block_by_hash(&self, hash: &str, full: bool) -> Result<Option<Value>, RpcError> {
        let value = self.request(RpcMethod::GetBlockByHash {
            hash: hash.to_string(),
            full,
        })?;
        Ok((!value.is_null()).then_some(value))
    }

    /// Installs a log filter on the node and returns its id.
    pub fn new_filter(&self, filter: &LogFilter) -> Result<String, RpcError> {
        let id = self.request_string(RpcMethod::NewFilter(filter.clone()))?;
        debug!(%id, "installed log filter");
        Ok(id)
    }

    /// Logs matching filter `id` since the previous poll.
    pub fn filter_changes(&self, id: &str) -> Result<Vec<Log>, RpcError> {
        self.request_logs(RpcMethod::GetFilterChanges(id.to_string()))
    }

    /// Every log matching filter `id`.
    pub fn filter_logs(&self, id: &str) -> Result<Vec<Log>, RpcError> {
        self.request_logs(RpcMethod::GetFilterLogs(id.to_string()))
    }

    /// Returns `false` if the node did not know the filter.
    pub fn uninstall_filter(&self, id: &str) -> Result<bool, RpcError> {
        let method = RpcMethod::UninstallFilter(id.to_string());
        let name = method.name();
        match self.request(method)? {
            Value::Bool(removed) => Ok(removed),
            other => Err(RpcError::InvalidResponse {
                method: name.to_string(),
                message: format!("expected a boolean, got {other}"),
            }),
        }
    }

    fn request_logs(&self, method: RpcMethod) -> Result<Vec<Log>, RpcError> {
        let name = method.name();
        let value = self.request(method)?;
        serde_json::from_value(value).map_err(|e| RpcError::InvalidResponse {
            method: name.to_string(),
            message: format!("malformed log list: {e}"),
        })
    }
}

impl<T: Transport> NodeApi for JsonRpcClient<T> {
    fn estimate_gas(&self, request: &CallRequest) -> Result<BigUint, RpcError> {
        self.request_quantity(RpcMethod::EstimateGas(request.clone()))
    }

    fn gas_price(&self) -> Result<BigUint, RpcError> {
        self.request_quantity(RpcMethod::GasPrice)
    }

    fn transaction_count(&self, address: &Address, block: BlockTag) -> Result<BigUint, RpcError> {
        self.request_quantity(RpcMethod::GetTransactionCount {
            address: *address,
            block,
        })
    }

    fn send_raw_transaction(&self, raw_hex: &str) -> Result<String, RpcError> {
        self.request_string(RpcMethod::SendRawTransaction(raw_hex.to_string()))
    }

    fn call(&self, request: &CallRequest, block: BlockTag) -> Result<String, RpcError> {
        self.request_string(RpcMethod::Call {
            request: request.clone(),
            block,
        })
    }

    fn chain_id(&self) -> Result<u64, RpcError> {
        let id = self.request_quantity(RpcMethod::ChainId)?;
        id.to_u64().ok_or_else(|| RpcError::InvalidResponse {
            method: RpcMethod::ChainId.name().to_string(),
            message: format!("chain id {id} does not fit in u64"),
        })
    }

    fn logs(&self, filter: &LogFilter) -> Result<Vec<Log>, RpcError> {
        self.request_logs(RpcMethod::GetLogs(filter.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::error::TransportError;
    use crate::filter::{parse_topic, TopicFilter};

    const TRANSFER_TOPIC: &str =
        "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

    /// Records every envelope and replays canned responses in order.
    #[derive(Default)]
    struct MockTransport {
        sent: RefCell<Vec<Value>>,
        responses: RefCell<VecDeque<Result<Value, TransportError>>>,
    }

    impl MockTransport {
        fn replying(responses: Vec<Result<Value, TransportError>>) -> Self {
            Self {
                sent: RefCell::default(),
                responses: RefCell::new(responses.into()),
            }
        }
    }

    impl Transport for MockTransport {
        fn send(&self, envelope: &Value) -> Result<Value, TransportError> {
            self.sent.borrow_mut().push(envelope.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError("no canned response".into())))
        }
    }

    fn ok(result: Value) -> Result<Value, TransportError> {
        Ok(json!({"jsonrpc": "2.0", "id": 0, "result": result}))
    }

    fn sender() -> Address {
        "0x2222222222222222222222222222222222222222".parse().unwrap()
    }

    #[test]
    fn ids_start_at_zero_and_increase() {
        let client = JsonRpcClient::with_transport(MockTransport::replying(vec![
            ok(json!("0x3b9aca00")),
            ok(json!("0x3b9aca00")),
        ]));

        client.gas_price().unwrap();
        client.gas_price().unwrap();

        let sent = client.transport().sent.borrow();
        assert_eq!(sent[0]["id"], json!(0));
        assert_eq!(sent[1]["id"], json!(1));
    }

    #[test]
    fn envelope_shape() {
        let client = JsonRpcClient::with_transport(MockTransport::replying(vec![ok(json!("0x5"))]));

        let nonce = client.transaction_count(&sender(), BlockTag::Pending).unwrap();
        assert_eq!(nonce, BigUint::from(5u32));

        let sent = client.transport().sent.borrow();
        assert_eq!(
            sent[0],
            json!({
                "jsonrpc": "2.0",
                "method": "eth_getTransactionCount",
                "params": ["0x2222222222222222222222222222222222222222", "pending"],
                "id": 0
            })
        );
    }

    #[test]
    fn node_error_is_mapped() {
        let client = JsonRpcClient::with_transport(MockTransport::replying(vec![Ok(json!({
            "jsonrpc": "2.0",
            "id": 0,
            "error": {"code": -32000, "message": "nonce too low"}
        }))]));

        let err = client.send_raw_transaction("0xf86c").unwrap_err();
        assert_eq!(
            err,
            RpcError::Node {
                method: "eth_sendRawTransaction".into(),
                code: -32000,
                message: "nonce too low".into(),
            }
        );
    }

    #[test]
    fn transport_error_is_tagged_with_method() {
        let client = JsonRpcClient::with_transport(MockTransport::replying(vec![Err(
            TransportError("connection refused".into()),
        )]));

        let err = client.gas_price().unwrap_err();
        assert_eq!(
            err,
            RpcError::Transport {
                method: "eth_gasPrice".into(),
                message: "connection refused".into(),
            }
        );
    }

    #[test]
    fn missing_result_is_invalid() {
        let client =
            JsonRpcClient::with_transport(MockTransport::replying(vec![Ok(json!({"id": 0}))]));
        assert!(matches!(
            client.chain_id(),
            Err(RpcError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn non_hex_quantity_is_invalid() {
        let client = JsonRpcClient::with_transport(MockTransport::replying(vec![ok(json!("0xzz"))]));
        assert!(matches!(
            client.estimate_gas(&CallRequest::new(sender(), "0x")),
            Err(RpcError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn non_ascii_quantity_is_invalid() {
        let client = JsonRpcClient::with_transport(MockTransport::replying(vec![
            ok(json!("1é")),
            ok(json!("0xé")),
        ]));
        assert!(matches!(
            client.gas_price(),
            Err(RpcError::InvalidResponse { ref method, .. }) if method == "eth_gasPrice"
        ));
        assert!(matches!(
            client.chain_id(),
            Err(RpcError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn null_receipt_is_none() {
        let client = JsonRpcClient::with_transport(MockTransport::replying(vec![ok(Value::Null)]));
        assert_eq!(client.transaction_receipt("0xabc").unwrap(), None);
    }

    #[test]
    fn chain_id_and_block_number() {
        let client = JsonRpcClient::with_transport(MockTransport::replying(vec![
            ok(json!("0xaa36a7")),
            ok(json!("0x10")),
        ]));
        assert_eq!(client.chain_id().unwrap(), 11155111);
        assert_eq!(client.block_number().unwrap(), 16);
    }

    #[test]
    fn call_passes_block_tag() {
        let client = JsonRpcClient::with_transport(MockTransport::replying(vec![ok(json!(
            "0x00000000000000000000000000000000000000000000000000000000000003e8"
        ))]));

        let data = client
            .call(&CallRequest::new(sender(), "0x18160ddd"), BlockTag::Latest)
            .unwrap();
        assert!(data.ends_with("3e8"));

        let sent = client.transport().sent.borrow();
        assert_eq!(sent[0]["method"], json!("eth_call"));
        assert_eq!(sent[0]["params"][1], json!("latest"));
    }

    #[test]
    fn logs_envelope_and_decoding() {
        let client = JsonRpcClient::with_transport(MockTransport::replying(vec![ok(json!([{
            "address": "0x2222222222222222222222222222222222222222",
            "topics": [TRANSFER_TOPIC],
            "data": "0x",
            "blockNumber": "0x10",
            "logIndex": "0x0",
            "removed": false
        }]))]));

        let filter = LogFilter::new()
            .to_block(BlockTag::Number(16))
            .address(sender())
            .topic(TopicFilter::Exact(parse_topic(TRANSFER_TOPIC).unwrap()));
        let logs = client.logs(&filter).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].topic0(), Some(TRANSFER_TOPIC));

        let sent = client.transport().sent.borrow();
        assert_eq!(
            sent[0],
            json!({
                "jsonrpc": "2.0",
                "method": "eth_getLogs",
                "params": [{
                    "fromBlock": "0x0",
                    "toBlock": "0x10",
                    "address": "0x2222222222222222222222222222222222222222",
                    "topics": [TRANSFER_TOPIC]
                }],
                "id": 0
            })
        );
    }

    #[test]
    fn malformed_logs_are_invalid() {
        let client = JsonRpcClient::with_transport(MockTransport::replying(vec![ok(json!("0x1"))]));
        assert!(matches!(
            client.logs(&LogFilter::new()),
            Err(RpcError::InvalidResponse { ref method, .. }) if method == "eth_getLogs"
        ));
    }

    #[test]
    fn filter_lifecycle() {
        let client = JsonRpcClient::with_transport(MockTransport::replying(vec![
            ok(json!("0x7")),
            ok(json!([])),
            ok(json!([{"address": "0x2222222222222222222222222222222222222222", "topics": []}])),
            ok(json!(true)),
        ]));

        let id = client.new_filter(&LogFilter::new().address(sender())).unwrap();
        assert_eq!(id, "0x7");
        assert!(client.filter_changes(&id).unwrap().is_empty());
        assert_eq!(client.filter_logs(&id).unwrap().len(), 1);
        assert!(client.uninstall_filter(&id).unwrap());

        let sent = client.transport().sent.borrow();
        let methods: Vec<&Value> = sent.iter().map(|e| &e["method"]).collect();
        assert_eq!(
            methods,
            [
                &json!("eth_newFilter"),
                &json!("eth_getFilterChanges"),
                &json!("eth_getFilterLogs"),
                &json!("eth_uninstallFilter"),
            ]
        );
        assert_eq!(
            sent[0]["params"],
            json!([{"fromBlock": "0x0", "address": "0x2222222222222222222222222222222222222222"}])
        );
        for envelope in &sent[1..] {
            assert_eq!(envelope["params"], json!(["0x7"]));
        }
    }

    #[test]
    fn block_lookups() {
        let client = JsonRpcClient::with_transport(MockTransport::replying(vec![
            ok(json!({"number": "0x10", "transactions": []})),
            ok(Value::Null),
        ]));

        let block = client.block_by_number(BlockTag::Number(16), true).unwrap().unwrap();
        assert_eq!(block["number"], json!("0x10"));
        assert_eq!(client.block_by_hash("0xabc", false).unwrap(), None);

        let sent = client.transport().sent.borrow();
        assert_eq!(sent[0]["method"], json!("eth_getBlockByNumber"));
        assert_eq!(sent[0]["params"], json!(["0x10", true]));
        assert_eq!(sent[1]["method"], json!("eth_getBlockByHash"));
        assert_eq!(sent[1]["params"], json!(["0xabc", false]));
    }
}
