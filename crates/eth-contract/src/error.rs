use eth_codec::CodecError;
use eth_rpc::RpcError;
use eth_signer::error::SignerError;
use thiserror::Error;

/// Failure of a contract call or transaction. Every variant is terminal for
/// the call in flight.
#[derive(Debug, Error)]
pub enum ContractError {
    /// The function is unknown or was given the wrong number of arguments.
    #[error("invalid arguments: {0}")]
    Argument(CodecError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Signer(#[from] SignerError),

    #[error("network error: {0}")]
    Network(#[from] RpcError),

    #[error("invalid transaction config: {0}")]
    Config(String),
}
