use std::fmt;
use std::str::FromStr;

use crate::error::CodecError;
use crate::hash::keccak256;
use crate::numeric::{has_0x, strip_0x};

/// A 20-byte account address.
///
/// Displays as lowercase 0x-prefixed hex; [`Address::to_checksum`] gives the
/// EIP-55 mixed-case form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    /// Byte length of an address.
    pub const LEN: usize = 20;

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Derives the address of an uncompressed secp256k1 public key
    /// (65 bytes, starting with 0x04).
    ///
    /// The address is the last 20 bytes of Keccak-256 over the 64 coordinate
    /// bytes, i.e. the key without its form byte.
    pub fn from_public_key(uncompressed_pubkey: &[u8; 65]) -> Result<Self, CodecError> {
        if uncompressed_pubkey[0] != 0x04 {
            return Err(CodecError::InvalidEncoding(
                "uncompressed key must start with 0x04".into(),
            ));
        }

        let hash = keccak256(&uncompressed_pubkey[1..]);

        let mut addr = [0u8; 20];
        addr.copy_from_slice(&hash[12..]);
        Ok(Self(addr))
    }

    /// Lowercase hex without prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Applies EIP-55 mixed-case checksum encoding.
    pub fn to_checksum(&self) -> String {
        let hex_part = self.to_hex();

        // EIP-55: hash the lowercase hex address (without 0x).
        let hash = keccak256(hex_part.as_bytes());

        let mut checksummed = String::with_capacity(42);
        checksummed.push_str("0x");

        for (i, c) in hex_part.chars().enumerate() {
            // High nibble for even positions, low nibble for odd ones.
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                checksummed.push(c.to_ascii_uppercase());
            } else {
                checksummed.push(c);
            }
        }

        checksummed
    }
}

impl FromStr for Address {
    type Err = CodecError;

    /// Parses `0x` + 40 hex digits.
    ///
    /// All-lowercase and all-uppercase input is accepted as-is; mixed case
    /// must carry a valid EIP-55 checksum.
    fn from_str(address: &str) -> Result<Self, Self::Err> {
        if !has_0x(address) {
            return Err(CodecError::InvalidEncoding(format!(
                "address {address:?} must start with 0x"
            )));
        }

        let hex_part = strip_0x(address);
        if hex_part.len() != 40 {
            return Err(CodecError::InvalidEncoding(format!(
                "expected 40 hex characters, got {}",
                hex_part.len()
            )));
        }

        let bytes = hex::decode(hex_part)
            .map_err(|e| CodecError::InvalidEncoding(format!("invalid address hex: {e}")))?;
        let mut addr = [0u8; 20];
        addr.copy_from_slice(&bytes);
        let parsed = Self(addr);

        let is_all_lower = hex_part.chars().all(|c| !c.is_ascii_uppercase());
        let is_all_upper = hex_part.chars().all(|c| !c.is_ascii_lowercase());
        if !is_all_lower && !is_all_upper && parsed.to_checksum()[2..] != *hex_part {
            return Err(CodecError::InvalidEncoding(format!(
                "address {address:?} has an invalid EIP-55 checksum"
            )));
        }

        Ok(parsed)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}
