//! RLP for flat lists of byte strings.
//!
//! Legacy transactions are a single list whose items are all byte strings,
//! so that is the only shape supported here. Quantities must already be in
//! minimal big-endian form; see [`quantity_bytes`].

use alloy_rlp::{Encodable, Header};
use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::CodecError;

/// Encodes a single byte string.
pub fn encode_bytes(item: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(item.length());
    item.encode(&mut out);
    out
}

/// Encodes `items` as one RLP list of byte strings.
pub fn encode_list<T: AsRef<[u8]>>(items: &[T]) -> Vec<u8> {
    let payload_length: usize = items.iter().map(|item| item.as_ref().length()).sum();
    let header = Header {
        list: true,
        payload_length,
    };

    let mut out = Vec::with_capacity(header.length() + payload_length);
    header.encode(&mut out);
    for item in items {
        item.as_ref().encode(&mut out);
    }
    out
}

/// Decodes a single RLP list of byte strings.
///
/// Nested lists and trailing bytes are rejected.
pub fn decode_list(mut data: &[u8]) -> Result<Vec<Vec<u8>>, CodecError> {
    let header = Header::decode(&mut data)?;
    if !header.list {
        return Err(CodecError::Rlp("expected a list".into()));
    }
    if data.len() != header.payload_length {
        return Err(CodecError::Rlp(format!(
            "list payload is {} bytes, header says {}",
            data.len(),
            header.payload_length
        )));
    }

    let mut items = Vec::new();
    while !data.is_empty() {
        let item = Header::decode(&mut data)?;
        if item.list {
            return Err(CodecError::Rlp("nested lists are not supported".into()));
        }
        if data.len() < item.payload_length {
            return Err(alloy_rlp::Error::InputTooShort.into());
        }
        let (payload, rest) = data.split_at(item.payload_length);
        items.push(payload.to_vec());
        data = rest;
    }

    Ok(items)
}

/// Minimal big-endian bytes of a quantity; unset and zero are both empty.
pub fn quantity_bytes(value: Option<&BigUint>) -> Vec<u8> {
    match value {
        Some(v) if !v.is_zero() => v.to_bytes_be(),
        _ => Vec::new(),
    }
}

/// Minimal big-endian bytes of a 32-byte integer such as a signature scalar.
pub fn trim_leading_zeros(word: &[u8]) -> &[u8] {
    let start = word.iter().position(|&b| b != 0).unwrap_or(word.len());
    &word[start..]
}
