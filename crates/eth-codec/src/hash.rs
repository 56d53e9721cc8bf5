use sha3::{Digest, Keccak256};

use crate::error::CodecError;
use crate::numeric::has_0x;

/// Keccak-256 of the empty input.
pub const EMPTY_HASH: [u8; 32] = [
    0xc5, 0xd2, 0x46, 0x01, 0x86, 0xf7, 0x23, 0x3c, 0x92, 0x7e, 0x7d, 0xb2, 0xdc, 0xc7, 0x03, 0xc0,
    0xe5, 0x00, 0xb6, 0x53, 0xca, 0x82, 0x27, 0x3b, 0x7b, 0xfa, 0xd8, 0x04, 0x5d, 0x85, 0xa4, 0x70,
];

/// Keccak-256 digest of `data`.
pub fn keccak256(data: impl AsRef<[u8]>) -> [u8; 32] {
    Keccak256::digest(data.as_ref()).into()
}

/// Keccak-256 digest of `data` as 0x-prefixed lowercase hex.
pub fn keccak256_hex(data: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(keccak256(data)))
}

/// The 4-byte function selector of a canonical signature such as
/// `transfer(address,uint256)`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash[..4]);
    out
}

/// The 32-byte log topic of a canonical event signature.
pub fn topic(signature: &str) -> [u8; 32] {
    keccak256(signature.as_bytes())
}

/// Node-style `sha3`: 0x-prefixed input is hashed as bytes, anything else as
/// UTF-8 text.
///
/// Returns `None` when the digest is the hash of empty input.
pub fn sha3(value: &str) -> Result<Option<String>, CodecError> {
    let hash = if has_0x(value) {
        let bytes = hex::decode(&value[2..])
            .map_err(|e| CodecError::InvalidEncoding(format!("invalid hex {value:?}: {e}")))?;
        keccak256(bytes)
    } else {
        keccak256(value.as_bytes())
    };

    if hash == EMPTY_HASH {
        return Ok(None);
    }
    Ok(Some(format!("0x{}", hex::encode(hash))))
}
