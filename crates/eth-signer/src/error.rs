use eth_codec::CodecError;
use thiserror::Error;

/// Key and signing errors.
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("wallet is locked: no private key held")]
    LockedWallet,

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
