//! Exact conversions between decimal text, hex text and [`BigUint`].
//!
//! Quantities travel over JSON-RPC as hex strings and are written by callers
//! as decimal strings; nothing here goes through floating point.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::CodecError;

/// Hex digits in one 32-byte ABI word.
pub const WORD_HEX_LEN: usize = 64;

/// Fractional decimal digits of one ether expressed in wei.
pub const ETHER_DECIMALS: usize = 18;

/// Returns `true` if `value` starts with `0x` or `0X`.
pub fn has_0x(value: &str) -> bool {
    value
        .as_bytes()
        .get(..2)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(b"0x"))
}

/// Removes a leading `0x`/`0X` if present.
pub fn strip_0x(value: &str) -> &str {
    if has_0x(value) {
        &value[2..]
    } else {
        value
    }
}

/// Returns `value` with exactly one lowercase `0x` prefix.
pub fn add_0x(value: &str) -> String {
    format!("0x{}", strip_0x(value))
}

/// Left-pads `hex` with `'0'` up to `width` characters.
///
/// Input already at least `width` long is returned unchanged.
pub fn zero_pad(hex: &str, width: usize) -> String {
    format!("{hex:0>width$}")
}

/// Parses a strict decimal digit string.
pub fn decimal_to_biguint(value: &str) -> Result<BigUint, CodecError> {
    if value.is_empty() {
        return Err(CodecError::InvalidEncoding("empty decimal value".into()));
    }
    if let Some(c) = value.chars().find(|c| !c.is_ascii_digit()) {
        return Err(CodecError::InvalidEncoding(format!(
            "non-decimal digit {c:?} in {value:?}"
        )));
    }

    BigUint::parse_bytes(value.as_bytes(), 10)
        .ok_or_else(|| CodecError::InvalidEncoding(format!("invalid decimal value {value:?}")))
}

/// Parses hex text, with or without prefix, in any letter case.
///
/// An empty digit string evaluates to zero.
pub fn hex_to_biguint(hex: &str) -> Result<BigUint, CodecError> {
    let digits = strip_0x(hex);
    if digits.is_empty() {
        return Ok(BigUint::zero());
    }
    if let Some(c) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(CodecError::InvalidEncoding(format!(
            "non-hex digit {c:?} in {hex:?}"
        )));
    }

    BigUint::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| CodecError::InvalidEncoding(format!("invalid hex value {hex:?}")))
}

/// Renders `value` as lowercase hex, most significant digit first.
///
/// Zero renders as an empty digit string.
pub fn biguint_to_hex(value: &BigUint, with_prefix: bool) -> String {
    let digits = if value.is_zero() {
        String::new()
    } else {
        value.to_str_radix(16)
    };

    if with_prefix {
        format!("0x{digits}")
    } else {
        digits
    }
}

/// Converts a decimal string to hex text.
pub fn decimal_to_hex(value: &str, with_prefix: bool) -> Result<String, CodecError> {
    let n = decimal_to_biguint(value)?;
    Ok(biguint_to_hex(&n, with_prefix))
}

/// Converts hex text to a decimal string.
pub fn hex_to_decimal(hex: &str) -> Result<String, CodecError> {
    Ok(hex_to_biguint(hex)?.to_str_radix(10))
}

/// Converts a decimal ether amount such as `"1.5"` to wei.
pub fn eth_to_wei(ether: &str) -> Result<BigUint, CodecError> {
    let (whole, fraction) = match ether.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (ether, ""),
    };

    if fraction.len() > ETHER_DECIMALS {
        return Err(CodecError::InvalidEncoding(format!(
            "{ether:?} has more than {ETHER_DECIMALS} fractional digits"
        )));
    }

    let whole = if whole.is_empty() && !fraction.is_empty() {
        BigUint::zero()
    } else {
        decimal_to_biguint(whole)?
    };
    let fraction = if fraction.is_empty() {
        BigUint::zero()
    } else {
        let padded = format!("{fraction:0<ETHER_DECIMALS$}");
        decimal_to_biguint(&padded)?
    };

    Ok(whole * wei_per_ether() + fraction)
}

/// Renders a wei amount as ether with exactly 18 fractional digits.
pub fn wei_to_eth(wei: &BigUint) -> String {
    let unit = wei_per_ether();
    let whole = wei / &unit;
    let fraction = wei % &unit;

    format!("{whole}.{}", zero_pad(&fraction.to_string(), ETHER_DECIMALS))
}

fn wei_per_ether() -> BigUint {
    BigUint::from(10u8).pow(ETHER_DECIMALS as u32)
}
