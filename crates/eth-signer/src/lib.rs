//! secp256k1 key handling for transaction signing.
//!
//! A [`Wallet`] owns at most one private key, derives its address once, and
//! signs Keccak-256 digests with low-s ECDSA.

pub mod error;
pub mod wallet;

pub use error::SignerError;
pub use wallet::{recover_address, Signature, Wallet};
