use thiserror::Error;

/// Encoding, hashing and ABI errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("unknown event: {0}")]
    UnknownEvent(String),

    #[error("argument count mismatch for {function}: expected {expected}, got {actual}")]
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("unsupported parameter type {param_type} in {function}")]
    UnsupportedType { function: String, param_type: String },

    #[error("value {value} does not fit in {param_type}")]
    ValueOutOfRange { param_type: String, value: String },

    #[error("malformed abi: {0}")]
    MalformedAbi(String),

    #[error("event topic {topic} maps to both {existing} and {incoming}")]
    EventHashCollision {
        topic: String,
        existing: String,
        incoming: String,
    },

    #[error("rlp error: {0}")]
    Rlp(String),
}

impl From<alloy_rlp::Error> for CodecError {
    fn from(e: alloy_rlp::Error) -> Self {
        CodecError::Rlp(e.to_string())
    }
}
