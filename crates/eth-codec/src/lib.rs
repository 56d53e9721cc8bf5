//! Encoding primitives for talking to EVM nodes.
//!
//! This crate provides:
//! - Exact decimal/hex conversion for arbitrary-precision quantities
//! - Keccak-256 hashing helpers (selectors, event topics)
//! - RLP encoding and decoding of flat byte-string lists
//! - 20-byte address parsing, derivation and EIP-55 checksums
//! - A contract ABI table with selector and call-data encoding

pub mod abi;
pub mod address;
pub mod error;
pub mod hash;
pub mod numeric;
pub mod rlp;

pub use error::CodecError;
