//! Contract interface tables and call-data encoding.
//!
//! Only the static word types `address` and `uint8`..`uint256` can be
//! encoded as arguments. Every other type still loads, so signatures,
//! selectors and event topics stay correct, but encoding an argument of that
//! type fails with [`CodecError::UnsupportedType`].

use std::collections::HashMap;

use num_bigint::BigUint;
use serde::Deserialize;
use tracing::warn;

use crate::address::Address;
use crate::error::CodecError;
use crate::hash;
use crate::numeric::{biguint_to_hex, decimal_to_biguint, hex_to_biguint, strip_0x, zero_pad, WORD_HEX_LEN};

/// Parsed parameter type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// A 20-byte address, left-padded to one word.
    Address,
    /// An unsigned integer of the given bit width (8..=256, step 8).
    Uint(u16),
    /// Any type this codec does not encode.
    Other(String),
}

impl ParamType {
    /// Classifies a type string from an interface description.
    pub fn parse(type_name: &str) -> Self {
        if type_name == "address" {
            return ParamType::Address;
        }
        if let Some(digits) = type_name.strip_prefix("uint") {
            let canonical = !digits.starts_with('0') && digits.bytes().all(|b| b.is_ascii_digit());
            if let (true, Ok(bits)) = (canonical, digits.parse::<u16>()) {
                if (8..=256).contains(&bits) && bits % 8 == 0 {
                    return ParamType::Uint(bits);
                }
            }
        }
        ParamType::Other(type_name.to_string())
    }
}

/// One function or event input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    /// Type exactly as declared, used for canonical signatures.
    pub type_name: String,
    pub kind: ParamType,
    /// Only meaningful for event inputs.
    pub indexed: bool,
}

/// A callable contract function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSpec {
    pub name: String,
    pub inputs: Vec<Param>,
}

impl FunctionSpec {
    /// Canonical signature, e.g. `transfer(address,uint256)`.
    pub fn signature(&self) -> String {
        canonical_signature(&self.name, &self.inputs)
    }

    pub fn selector(&self) -> [u8; 4] {
        hash::selector(&self.signature())
    }
}

/// An event the contract can emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSpec {
    pub name: String,
    pub inputs: Vec<Param>,
}

impl EventSpec {
    /// Canonical signature, e.g. `Transfer(address,address,uint256)`.
    pub fn signature(&self) -> String {
        canonical_signature(&self.name, &self.inputs)
    }

    /// Full 32-byte topic hash of the signature.
    pub fn topic(&self) -> [u8; 32] {
        hash::topic(&self.signature())
    }
}

fn canonical_signature(name: &str, inputs: &[Param]) -> String {
    let types: Vec<&str> = inputs.iter().map(|p| p.type_name.as_str()).collect();
    format!("{name}({})", types.join(","))
}

#[derive(Deserialize)]
struct RawEntry {
    #[serde(rename = "type")]
    kind: Option<String>,
    name: Option<String>,
    #[serde(default)]
    inputs: Vec<RawParam>,
}

#[derive(Deserialize)]
struct RawParam {
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    type_name: String,
    #[serde(default)]
    indexed: bool,
}

/// A contract interface: functions and events by name, plus a reverse index
/// from event topic hash to event name.
///
/// Built once by [`Abi::from_json`] and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Abi {
    functions: HashMap<String, FunctionSpec>,
    events: HashMap<String, EventSpec>,
    event_topics: HashMap<[u8; 32], String>,
    function_order: Vec<String>,
    event_order: Vec<String>,
}

impl Abi {
    /// Parses a JSON interface description.
    ///
    /// Entries of type `function` (or with no type) and `event` are kept;
    /// constructors, fallbacks, receive functions and custom errors are
    /// skipped. A kept entry without a name, or an input without a type, is
    /// rejected here rather than at use.
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        let entries: Vec<RawEntry> =
            serde_json::from_str(json).map_err(|e| CodecError::MalformedAbi(e.to_string()))?;

        let mut abi = Abi::default();
        for (position, entry) in entries.into_iter().enumerate() {
            let is_event = match entry.kind.as_deref() {
                None | Some("function") => false,
                Some("event") => true,
                Some(_) => continue,
            };

            let (name, inputs) = parse_entry(position, entry)?;
            if is_event {
                abi.insert_event(EventSpec { name, inputs })?;
            } else {
                let function = FunctionSpec { name: name.clone(), inputs };
                match abi.functions.insert(name.clone(), function) {
                    Some(previous) => {
                        warn!(function = %previous.name, "overloaded function, keeping last declaration");
                    }
                    None => abi.function_order.push(name),
                }
            }
        }

        Ok(abi)
    }

    fn insert_event(&mut self, event: EventSpec) -> Result<(), CodecError> {
        let topic = event.topic();
        if let Some(existing) = self.event_topics.get(&topic) {
            if *existing != event.name {
                return Err(CodecError::EventHashCollision {
                    topic: format!("0x{}", hex::encode(topic)),
                    existing: existing.clone(),
                    incoming: event.name,
                });
            }
        }
        self.event_topics.insert(topic, event.name.clone());

        let name = event.name.clone();
        match self.events.insert(name.clone(), event) {
            Some(previous) => {
                warn!(event = %previous.name, "overloaded event, keeping last declaration");
            }
            None => self.event_order.push(name),
        }
        Ok(())
    }

    pub fn function(&self, name: &str) -> Result<&FunctionSpec, CodecError> {
        self.functions
            .get(name)
            .ok_or_else(|| CodecError::UnknownFunction(name.to_string()))
    }

    pub fn event(&self, name: &str) -> Result<&EventSpec, CodecError> {
        self.events
            .get(name)
            .ok_or_else(|| CodecError::UnknownEvent(name.to_string()))
    }

    /// Function names in declaration order. An overloaded name appears once,
    /// at the position of its first declaration.
    pub fn function_names(&self) -> Vec<&str> {
        self.function_order.iter().map(String::as_str).collect()
    }

    /// Event names in declaration order.
    pub fn event_names(&self) -> Vec<&str> {
        self.event_order.iter().map(String::as_str).collect()
    }

    pub fn function_signature(&self, name: &str) -> Result<String, CodecError> {
        Ok(self.function(name)?.signature())
    }

    pub fn event_signature(&self, name: &str) -> Result<String, CodecError> {
        Ok(self.event(name)?.signature())
    }

    /// 4-byte selector of the named function.
    pub fn selector(&self, name: &str) -> Result<[u8; 4], CodecError> {
        Ok(self.function(name)?.selector())
    }

    /// Selector as 8 lowercase hex digits, no prefix.
    pub fn selector_hex(&self, name: &str) -> Result<String, CodecError> {
        Ok(hex::encode(self.selector(name)?))
    }

    /// Topic hash of the named event, 0x-prefixed.
    pub fn event_topic(&self, name: &str) -> Result<String, CodecError> {
        Ok(format!("0x{}", hex::encode(self.event(name)?.topic())))
    }

    /// Looks up the function and checks the argument count without encoding.
    pub fn check_arguments(&self, name: &str, arg_count: usize) -> Result<&FunctionSpec, CodecError> {
        let function = self.function(name)?;
        if function.inputs.len() != arg_count {
            return Err(CodecError::ArgumentCountMismatch {
                function: name.to_string(),
                expected: function.inputs.len(),
                actual: arg_count,
            });
        }
        Ok(function)
    }

    /// Encodes a call: `0x` + selector + one 64-digit word per argument.
    ///
    /// Addresses are passed as 0x-prefixed hex, unsigned integers as decimal
    /// strings.
    pub fn encode_call_data<S: AsRef<str>>(&self, name: &str, args: &[S]) -> Result<String, CodecError> {
        let function = self.check_arguments(name, args.len())?;

        let mut data = String::with_capacity(2 + 8 + WORD_HEX_LEN * args.len());
        data.push_str("0x");
        data.push_str(&hex::encode(function.selector()));

        for (param, arg) in function.inputs.iter().zip(args) {
            data.push_str(&encode_word(function, param, arg.as_ref())?);
        }

        Ok(data)
    }

    /// Resolves a log topic (with or without prefix) to its event name.
    pub fn decode_event_name(&self, topic_hash: &str) -> Result<&str, CodecError> {
        let bytes = hex::decode(strip_0x(topic_hash))
            .map_err(|e| CodecError::InvalidEncoding(format!("invalid topic {topic_hash:?}: {e}")))?;
        let topic: [u8; 32] = bytes.try_into().map_err(|_| {
            CodecError::InvalidEncoding(format!("topic {topic_hash:?} is not 32 bytes"))
        })?;

        self.event_topics
            .get(&topic)
            .map(String::as_str)
            .ok_or_else(|| CodecError::UnknownEvent(topic_hash.to_string()))
    }
}

fn parse_entry(position: usize, entry: RawEntry) -> Result<(String, Vec<Param>), CodecError> {
    let name = match entry.name {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Err(CodecError::MalformedAbi(format!(
                "entry {position} has no name"
            )))
        }
    };

    let inputs = entry
        .inputs
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            if raw.type_name.is_empty() {
                return Err(CodecError::MalformedAbi(format!(
                    "input {i} of {name} has no type"
                )));
            }
            Ok(Param {
                kind: ParamType::parse(&raw.type_name),
                name: raw.name,
                type_name: raw.type_name,
                indexed: raw.indexed,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((name, inputs))
}

fn encode_word(function: &FunctionSpec, param: &Param, arg: &str) -> Result<String, CodecError> {
    match &param.kind {
        ParamType::Address => {
            let address: Address = arg.parse()?;
            Ok(zero_pad(&address.to_hex(), WORD_HEX_LEN))
        }
        ParamType::Uint(bits) => {
            let value = decimal_to_biguint(arg)?;
            if value.bits() > u64::from(*bits) {
                return Err(CodecError::ValueOutOfRange {
                    param_type: param.type_name.clone(),
                    value: arg.to_string(),
                });
            }
            Ok(zero_pad(&biguint_to_hex(&value, false), WORD_HEX_LEN))
        }
        ParamType::Other(type_name) => Err(CodecError::UnsupportedType {
            function: function.name.clone(),
            param_type: type_name.clone(),
        }),
    }
}

fn first_word(data: &str) -> Result<&str, CodecError> {
    let digits = strip_0x(data);
    if let Some(c) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(CodecError::InvalidEncoding(format!(
            "non-hex digit {c:?} in return data"
        )));
    }
    digits.get(..WORD_HEX_LEN).ok_or_else(|| {
        CodecError::InvalidEncoding(format!(
            "expected at least {WORD_HEX_LEN} hex digits, got {}",
            digits.len()
        ))
    })
}

/// Reads the first word of call return data as an unsigned integer.
pub fn decode_uint(data: &str) -> Result<BigUint, CodecError> {
    hex_to_biguint(first_word(data)?)
}

/// Reads the first word of call return data as an address.
pub fn decode_address(data: &str) -> Result<Address, CodecError> {
    let word = first_word(data)?;
    let (padding, address) = word.split_at(WORD_HEX_LEN - 2 * Address::LEN);
    if padding.chars().any(|c| c != '0') {
        return Err(CodecError::InvalidEncoding(format!(
            "word {word} is not a left-padded address"
        )));
    }
    format!("0x{}", address.to_ascii_lowercase()).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ERC20_ABI: &str = r#"[
        {"type": "function", "name": "transfer", "inputs": [
            {"name": "to", "type": "address"},
            {"name": "amount", "type": "uint256"}
        ], "outputs": [{"name": "", "type": "bool"}]},
        {"type": "function", "name": "balanceOf", "inputs": [
            {"name": "owner", "type": "address"}
        ]},
        {"type": "function", "name": "setName", "inputs": [
            {"name": "name", "type": "string"}
        ]},
        {"type": "function", "name": "setLimit", "inputs": [
            {"name": "limit", "type": "uint8"}
        ]},
        {"type": "function", "name": "totalSupply", "inputs": []},
        {"type": "event", "name": "Transfer", "inputs": [
            {"name": "from", "type": "address", "indexed": true},
            {"name": "to", "type": "address", "indexed": true},
            {"name": "value", "type": "uint256", "indexed": false}
        ]},
        {"type": "event", "name": "Approval", "inputs": [
            {"name": "owner", "type": "address", "indexed": true},
            {"name": "spender", "type": "address", "indexed": true},
            {"name": "value", "type": "uint256", "indexed": false}
        ]},
        {"type": "constructor", "inputs": [{"name": "supply", "type": "uint256"}]}
    ]"#;

    const TRANSFER_TOPIC: &str =
        "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

    fn erc20() -> Abi {
        Abi::from_json(ERC20_ABI).unwrap()
    }

    #[test]
    fn param_type_classification() {
        assert_eq!(ParamType::parse("address"), ParamType::Address);
        assert_eq!(ParamType::parse("uint8"), ParamType::Uint(8));
        assert_eq!(ParamType::parse("uint256"), ParamType::Uint(256));
        assert_eq!(ParamType::parse("uint7"), ParamType::Other("uint7".into()));
        assert_eq!(ParamType::parse("uint264"), ParamType::Other("uint264".into()));
        assert_eq!(ParamType::parse("uint"), ParamType::Other("uint".into()));
        assert_eq!(ParamType::parse("uint08"), ParamType::Other("uint08".into()));
        assert_eq!(ParamType::parse("bool"), ParamType::Other("bool".into()));
        assert_eq!(ParamType::parse("address[]"), ParamType::Other("address[]".into()));
    }

    #[test]
    fn load_builds_tables() {
        let abi = erc20();
        assert_eq!(
            abi.function_names(),
            vec!["transfer", "balanceOf", "setName", "setLimit", "totalSupply"]
        );
        assert_eq!(abi.event_names(), vec!["Transfer", "Approval"]);
    }

    #[test]
    fn canonical_signatures() {
        let abi = erc20();
        assert_eq!(abi.function_signature("transfer").unwrap(), "transfer(address,uint256)");
        assert_eq!(abi.function_signature("totalSupply").unwrap(), "totalSupply()");
        assert_eq!(
            abi.event_signature("Transfer").unwrap(),
            "Transfer(address,address,uint256)"
        );
    }

    #[test]
    fn transfer_selector_vector() {
        let abi = erc20();
        assert_eq!(abi.selector_hex("transfer").unwrap(), "a9059cbb");
        assert_eq!(abi.selector_hex("balanceOf").unwrap(), "70a08231");
    }

    #[test]
    fn selector_of_unknown_function() {
        assert!(matches!(
            erc20().selector("mint"),
            Err(CodecError::UnknownFunction(name)) if name == "mint"
        ));
    }

    #[test]
    fn encode_transfer_vector() {
        let data = erc20()
            .encode_call_data("transfer", &["0x1111111111111111111111111111111111111111", "1000"])
            .unwrap();

        let expected = format!(
            "0xa9059cbb{}{}",
            zero_pad("1111111111111111111111111111111111111111", 64),
            zero_pad("3e8", 64)
        );
        assert_eq!(data, expected);
        assert_eq!(data.len(), 2 + 8 + 128);
    }

    #[test]
    fn encode_zero_amount_is_all_zero_word() {
        let data = erc20()
            .encode_call_data("transfer", &["0x1111111111111111111111111111111111111111", "0"])
            .unwrap();
        assert!(data.ends_with(&"0".repeat(64)));
    }

    #[test]
    fn encode_checksummed_address_lowercases() {
        let data = erc20()
            .encode_call_data("balanceOf", &["0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"])
            .unwrap();
        assert!(data.ends_with("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
    }

    #[test]
    fn encode_no_arguments() {
        let args: [&str; 0] = [];
        assert_eq!(erc20().encode_call_data("totalSupply", &args).unwrap(), "0x18160ddd");
    }

    #[test]
    fn argument_count_mismatch() {
        let err = erc20()
            .encode_call_data("transfer", &["0x1111111111111111111111111111111111111111"])
            .unwrap_err();
        assert_eq!(
            err,
            CodecError::ArgumentCountMismatch {
                function: "transfer".into(),
                expected: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn unknown_function() {
        let err = erc20().encode_call_data("mint", &["1"]).unwrap_err();
        assert!(matches!(err, CodecError::UnknownFunction(_)));
    }

    #[test]
    fn unsupported_type_is_rejected() {
        let err = erc20().encode_call_data("setName", &["hello"]).unwrap_err();
        assert_eq!(
            err,
            CodecError::UnsupportedType {
                function: "setName".into(),
                param_type: "string".into(),
            }
        );
    }

    #[test]
    fn uint_value_out_of_range() {
        let abi = erc20();
        assert!(abi.encode_call_data("setLimit", &["255"]).is_ok());
        assert!(matches!(
            abi.encode_call_data("setLimit", &["256"]),
            Err(CodecError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        let abi = erc20();
        assert!(matches!(
            abi.encode_call_data("balanceOf", &["0x1234"]),
            Err(CodecError::InvalidEncoding(_))
        ));
        assert!(matches!(
            abi.encode_call_data("transfer", &["0x1111111111111111111111111111111111111111", "1e3"]),
            Err(CodecError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn decode_event_name_by_topic() {
        let abi = erc20();
        assert_eq!(abi.decode_event_name(TRANSFER_TOPIC).unwrap(), "Transfer");
        assert_eq!(
            abi.decode_event_name(&TRANSFER_TOPIC[2..].to_uppercase()).unwrap(),
            "Transfer"
        );
        assert_eq!(abi.event_topic("Transfer").unwrap(), TRANSFER_TOPIC);
    }

    #[test]
    fn decode_unknown_event() {
        let unknown = format!("0x{}", "00".repeat(32));
        assert!(matches!(
            erc20().decode_event_name(&unknown),
            Err(CodecError::UnknownEvent(_))
        ));
        assert!(matches!(
            erc20().decode_event_name("0x1234"),
            Err(CodecError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn event_params_keep_indexed_flag() {
        let abi = erc20();
        let transfer = abi.event("Transfer").unwrap();
        let indexed: Vec<bool> = transfer.inputs.iter().map(|p| p.indexed).collect();
        assert_eq!(indexed, vec![true, true, false]);
    }

    #[test]
    fn entry_without_type_is_a_function() {
        let abi = Abi::from_json(r#"[{"name": "ping", "inputs": []}]"#).unwrap();
        assert_eq!(abi.function_signature("ping").unwrap(), "ping()");
    }

    #[test]
    fn entry_without_name_is_rejected() {
        let err = Abi::from_json(r#"[{"type": "function", "inputs": []}]"#).unwrap_err();
        assert!(matches!(err, CodecError::MalformedAbi(_)));
    }

    #[test]
    fn input_without_type_is_rejected() {
        let err = Abi::from_json(r#"[{"type": "event", "name": "E", "inputs": [{"name": "x"}]}]"#)
            .unwrap_err();
        assert!(matches!(err, CodecError::MalformedAbi(_)));
    }

    #[test]
    fn non_array_is_rejected() {
        assert!(matches!(
            Abi::from_json(r#"{"type": "function"}"#),
            Err(CodecError::MalformedAbi(_))
        ));
    }

    #[test]
    fn overloaded_event_keeps_last_and_both_topics() {
        let abi = Abi::from_json(
            r#"[
                {"type": "event", "name": "Log", "inputs": [{"name": "a", "type": "uint256"}]},
                {"type": "event", "name": "Log", "inputs": [{"name": "a", "type": "address"}]}
            ]"#,
        )
        .unwrap();

        assert_eq!(abi.event_signature("Log").unwrap(), "Log(address)");
        let first = format!("0x{}", hex::encode(hash::topic("Log(uint256)")));
        assert_eq!(abi.decode_event_name(&first).unwrap(), "Log");
    }

    #[test]
    fn duplicate_event_entry_is_not_a_collision() {
        let json = r#"[
            {"type": "event", "name": "Ping", "inputs": []},
            {"type": "event", "name": "Ping", "inputs": []}
        ]"#;
        assert!(Abi::from_json(json).is_ok());
    }

    #[test]
    fn colliding_topic_is_reported() {
        let mut abi = Abi::default();
        abi.insert_event(EventSpec { name: "Ping".into(), inputs: vec![] }).unwrap();

        // Two names can only share a topic through a corrupted table; force it.
        let topic = hash::topic("Ping()");
        abi.event_topics.insert(topic, "Other".into());

        let err = abi
            .insert_event(EventSpec { name: "Ping".into(), inputs: vec![] })
            .unwrap_err();
        assert!(matches!(err, CodecError::EventHashCollision { .. }));
    }

    #[test]
    fn decode_uint_return_data() {
        let data = format!("0x{}", zero_pad("3e8", 64));
        assert_eq!(decode_uint(&data).unwrap(), BigUint::from(1000u32));
        assert!(decode_uint("0x1234").is_err());
    }

    #[test]
    fn decode_address_return_data() {
        let data = zero_pad("dead000000000000000000000000000000000000", 64);
        let address = decode_address(&data).unwrap();
        assert_eq!(address.to_string(), "0xdead000000000000000000000000000000000000");

        let bad = "1".repeat(64);
        assert!(decode_address(&bad).is_err());
    }

    #[test]
    fn non_ascii_return_data_is_rejected() {
        let data = format!("{}é{}", "0".repeat(23), "0".repeat(39));
        assert!(matches!(decode_address(&data), Err(CodecError::InvalidEncoding(_))));
        assert!(matches!(decode_uint(&data), Err(CodecError::InvalidEncoding(_))));
        assert!(matches!(decode_uint("0xé"), Err(CodecError::InvalidEncoding(_))));
    }

    #[test]
    fn non_ascii_argument_is_rejected() {
        let abi = erc20();
        assert!(abi.encode_call_data("balanceOf", &["1é"]).is_err());
        assert!(abi.encode_call_data("transfer", &["0x1é", "1"]).is_err());
        assert!(abi.encode_call_data("transfer", &["0x1111111111111111111111111111111111111111", "é"]).is_err());
    }

    #[test]
    fn overloaded_names_keep_first_position() {
        let abi = Abi::from_json(
            r#"[
                {"type": "function", "name": "b", "inputs": []},
                {"type": "function", "name": "a", "inputs": []},
                {"type": "function", "name": "b", "inputs": [{"name": "x", "type": "uint256"}]},
                {"type": "event", "name": "Z", "inputs": []},
                {"type": "event", "name": "Y", "inputs": []}
            ]"#,
        )
        .unwrap();

        assert_eq!(abi.function_names(), ["b", "a"]);
        assert_eq!(abi.function_signature("b").unwrap(), "b(uint256)");
        assert_eq!(abi.event_names(), ["Z", "Y"]);
    }
}
