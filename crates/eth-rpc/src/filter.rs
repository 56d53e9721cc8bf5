//! Log filters and the log objects nodes return for them.

use eth_codec::address::Address;
use eth_codec::numeric::strip_0x;
use eth_codec::CodecError;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::method::BlockTag;

/// One 32-byte topic value.
pub type Topic = [u8; 32];

/// Parses a topic, left-padding short values to 32 bytes.
///
/// Both `0xddf2…` and an unprefixed `ddf2…` are accepted; `0x1` becomes
/// the topic `0x00…01`.
pub fn parse_topic(text: &str) -> Result<Topic, CodecError> {
    let digits = strip_0x(text);
    if digits.len() > 64 {
        return Err(CodecError::InvalidEncoding(format!(
            "topic {text:?} is longer than 32 bytes"
        )));
    }
    let padded = format!("{digits:0>64}");
    let bytes = hex::decode(&padded)
        .map_err(|e| CodecError::InvalidEncoding(format!("invalid topic {text:?}: {e}")))?;

    let mut topic = [0u8; 32];
    topic.copy_from_slice(&bytes);
    Ok(topic)
}

/// Match rule for one topic position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TopicFilter {
    /// Wildcard, sent as `null`.
    #[default]
    Any,
    Exact(Topic),
    /// Matches if the log topic equals any of the values.
    OneOf(Vec<Topic>),
}

impl TopicFilter {
    fn to_param(&self) -> Value {
        match self {
            TopicFilter::Any => Value::Null,
            TopicFilter::Exact(topic) => topic_param(topic),
            TopicFilter::OneOf(topics) => Value::Array(topics.iter().map(topic_param).collect()),
        }
    }
}

fn topic_param(topic: &Topic) -> Value {
    Value::String(format!("0x{}", hex::encode(topic)))
}

/// Filter object for `eth_getLogs` and `eth_newFilter`.
///
/// An unset `from_block` is sent as block `0x0`; the node's default range
/// would otherwise only cover the latest block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogFilter {
    pub from_block: Option<BlockTag>,
    pub to_block: Option<BlockTag>,
    pub address: Option<Address>,
    pub topics: Vec<TopicFilter>,
}

impl LogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_block(mut self, block: BlockTag) -> Self {
        self.from_block = Some(block);
        self
    }

    pub fn to_block(mut self, block: BlockTag) -> Self {
        self.to_block = Some(block);
        self
    }

    pub fn address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    /// Appends the rule for the next topic position.
    pub fn topic(mut self, topic: TopicFilter) -> Self {
        self.topics.push(topic);
        self
    }

    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        let from = self
            .from_block
            .map_or_else(|| "0x0".to_string(), |block| block.to_param());
        object.insert("fromBlock".into(), Value::String(from));
        if let Some(to) = &self.to_block {
            object.insert("toBlock".into(), Value::String(to.to_param()));
        }
        if let Some(address) = &self.address {
            object.insert("address".into(), Value::String(address.to_string()));
        }
        if !self.topics.is_empty() {
            let topics = self.topics.iter().map(TopicFilter::to_param).collect();
            object.insert("topics".into(), Value::Array(topics));
        }
        Value::Object(object)
    }
}

/// A log entry as returned by `eth_getLogs`, `eth_getFilterLogs` and
/// `eth_getFilterChanges`.
///
/// Quantities stay in their 0x-prefixed wire form; pending logs carry no
/// block or transaction fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub address: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub block_hash: Option<String>,
    #[serde(default)]
    pub transaction_hash: Option<String>,
    #[serde(default)]
    pub log_index: Option<String>,
    #[serde(default)]
    pub removed: bool,
}

impl Log {
    /// The event signature topic; absent for anonymous events.
    pub fn topic0(&self) -> Option<&str> {
        self.topics.first().map(String::as_str)
    }
}
