use eth_rpc::BlockTag;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::error::ContractError;

/// Safety factor applied to the node's gas estimate, as an exact fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGasMargin")]
pub struct GasMargin {
    numerator: u64,
    denominator: u64,
}

#[derive(Deserialize)]
struct RawGasMargin {
    numerator: u64,
    denominator: u64,
}

impl TryFrom<RawGasMargin> for GasMargin {
    type Error = ContractError;

    fn try_from(raw: RawGasMargin) -> Result<Self, Self::Error> {
        GasMargin::new(raw.numerator, raw.denominator)
    }
}

impl Default for GasMargin {
    fn default() -> Self {
        Self {
            numerator: 3,
            denominator: 2,
        }
    }
}

impl GasMargin {
    pub fn new(numerator: u64, denominator: u64) -> Result<Self, ContractError> {
        if denominator == 0 {
            return Err(ContractError::Config(
                "gas margin denominator must be non-zero".into(),
            ));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn numerator(&self) -> u64 {
        self.numerator
    }

    pub fn denominator(&self) -> u64 {
        self.denominator
    }

    /// `estimate * numerator / denominator`, rounded down.
    pub fn apply(&self, estimate: &BigUint) -> BigUint {
        estimate * self.numerator / self.denominator
    }
}

/// Per-contract transaction settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TxConfig {
    /// EIP-155 chain id. `None` signs without replay protection.
    pub chain_id: Option<u64>,
    pub gas_margin: GasMargin,
    /// Block the sender nonce is read at.
    pub nonce_block: BlockTag,
    /// Block read-only calls execute against.
    pub call_block: BlockTag,
}

impl Default for TxConfig {
    fn default() -> Self {
        Self {
            chain_id: None,
            gas_margin: GasMargin::default(),
            nonce_block: BlockTag::Pending,
            call_block: BlockTag::Latest,
        }
    }
}

impl TxConfig {
    pub fn from_json(json: &str) -> Result<Self, ContractError> {
        serde_json::from_str(json).map_err(|e| ContractError::Config(e.to_string()))
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn with_gas_margin(mut self, gas_margin: GasMargin) -> Self {
        self.gas_margin = gas_margin;
        self
    }
}
