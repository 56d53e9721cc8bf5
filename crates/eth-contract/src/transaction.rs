//! Legacy (pre-typed) transactions: the six unsigned fields and the nine
//! signed ones, in RLP.

use eth_codec::address::Address;
use eth_codec::hash::keccak256;
use eth_codec::numeric::strip_0x;
use eth_codec::rlp::{decode_list, encode_list, quantity_bytes, trim_leading_zeros};
use eth_codec::CodecError;
use eth_signer::{recover_address, Signature, SignerError};
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

/// Unsigned transaction fields. `None` and empty `data` encode as the empty
/// string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFields {
    pub nonce: Option<BigUint>,
    pub gas_price: Option<BigUint>,
    pub gas_limit: Option<BigUint>,
    pub to: Option<Address>,
    pub value: Option<BigUint>,
    pub data: Vec<u8>,
}

/// A chain id of zero means no replay protection.
fn replay_chain_id(chain_id: Option<u64>) -> Option<u64> {
    chain_id.filter(|&id| id != 0)
}

/// `v = parity + 27`, or `parity + chain_id * 2 + 35` under EIP-155.
pub fn recovery_v(recovery_parity: u8, chain_id: Option<u64>) -> BigUint {
    let base = match replay_chain_id(chain_id) {
        Some(id) => BigUint::from(id) * 2u32 + 35u32,
        None => BigUint::from(27u32),
    };
    base + recovery_parity
}

impl TransactionFields {
    /// The six unsigned RLP items, in wire order.
    pub fn unsigned_items(&self) -> Vec<Vec<u8>> {
        vec![
            quantity_bytes(self.nonce.as_ref()),
            quantity_bytes(self.gas_price.as_ref()),
            quantity_bytes(self.gas_limit.as_ref()),
            self.to.map(|to| to.as_bytes().to_vec()).unwrap_or_default(),
            quantity_bytes(self.value.as_ref()),
            self.data.clone(),
        ]
    }

    /// The bytes whose Keccak-256 digest gets signed.
    ///
    /// With a chain id the list is extended with `[chain_id, "", ""]`.
    pub fn signing_payload(&self, chain_id: Option<u64>) -> Vec<u8> {
        let mut items = self.unsigned_items();
        if let Some(id) = replay_chain_id(chain_id) {
            items.push(quantity_bytes(Some(&BigUint::from(id))));
            items.push(Vec::new());
            items.push(Vec::new());
        }
        encode_list(&items)
    }

    /// Attaches `signature` and frames the nine-item transaction.
    pub fn into_signed(self, signature: &Signature, chain_id: Option<u64>) -> SignedTransaction {
        let v = recovery_v(signature.recovery_parity, chain_id);
        SignedTransaction::new(self, v, signature.r, signature.s)
    }
}

/// A signed transaction and its wire bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    fields: TransactionFields,
    v: BigUint,
    r: [u8; 32],
    s: [u8; 32],
    raw: Vec<u8>,
}

impl SignedTransaction {
    fn new(fields: TransactionFields, v: BigUint, r: [u8; 32], s: [u8; 32]) -> Self {
        let mut items = fields.unsigned_items();
        items.push(quantity_bytes(Some(&v)));
        items.push(trim_leading_zeros(&r).to_vec());
        items.push(trim_leading_zeros(&s).to_vec());
        let raw = encode_list(&items);

        Self {
            fields,
            v,
            r,
            s,
            raw,
        }
    }

    /// Parses a signed legacy transaction from 0x-prefixed (or bare) hex.
    pub fn decode(raw_hex: &str) -> Result<Self, CodecError> {
        let raw = hex::decode(strip_0x(raw_hex))
            .map_err(|e| CodecError::InvalidEncoding(format!("raw transaction is not hex: {e}")))?;
        let items = decode_list(&raw)?;
        let [nonce, gas_price, gas_limit, to, value, data, v, r, s]: [Vec<u8>; 9] =
            items.try_into().map_err(|items: Vec<Vec<u8>>| {
                CodecError::Rlp(format!("expected 9 transaction fields, got {}", items.len()))
            })?;

        let to = match to.len() {
            0 => None,
            Address::LEN => {
                let mut bytes = [0u8; 20];
                bytes.copy_from_slice(&to);
                Some(Address::from_bytes(bytes))
            }
            n => return Err(CodecError::Rlp(format!("recipient is {n} bytes"))),
        };

        let fields = TransactionFields {
            nonce: decode_quantity(&nonce),
            gas_price: decode_quantity(&gas_price),
            gas_limit: decode_quantity(&gas_limit),
            to,
            value: decode_quantity(&value),
            data,
        };

        let decoded = Self::new(
            fields,
            BigUint::from_bytes_be(&v),
            word(&r, "r")?,
            word(&s, "s")?,
        );
        if decoded.raw != raw {
            return Err(CodecError::Rlp("transaction is not canonically encoded".into()));
        }
        Ok(decoded)
    }

    pub fn fields(&self) -> &TransactionFields {
        &self.fields
    }

    pub fn v(&self) -> &BigUint {
        &self.v
    }

    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Wire form, as passed to `eth_sendRawTransaction`.
    pub fn raw_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw))
    }

    /// Keccak-256 of the raw bytes, 0x-prefixed.
    pub fn hash(&self) -> String {
        format!("0x{}", hex::encode(keccak256(&self.raw)))
    }

    /// Chain id recovered from `v`; `None` for pre-EIP-155 signatures.
    pub fn chain_id(&self) -> Option<u64> {
        let v = self.v.to_u64()?;
        if v >= 35 {
            Some((v - 35) / 2)
        } else {
            None
        }
    }

    fn recovery_parity(&self) -> Result<u8, SignerError> {
        let base = match self.chain_id() {
            Some(id) => BigUint::from(id) * 2u32 + 35u32,
            None => BigUint::from(27u32),
        };
        if self.v < base {
            return Err(SignerError::SigningFailed(format!("invalid v {}", self.v)));
        }
        match (&self.v - base).to_u8() {
            Some(parity @ (0 | 1)) => Ok(parity),
            _ => Err(SignerError::SigningFailed(format!("invalid v {}", self.v))),
        }
    }

    /// Recovers the sender address from the signature.
    pub fn recover_signer(&self) -> Result<Address, SignerError> {
        let signature = Signature {
            r: self.r,
            s: self.s,
            recovery_parity: self.recovery_parity()?,
        };
        recover_address(&self.fields.signing_payload(self.chain_id()), &signature)
    }
}

fn decode_quantity(bytes: &[u8]) -> Option<BigUint> {
    let value = BigUint::from_bytes_be(bytes);
    (!value.is_zero()).then_some(value)
}

fn word(bytes: &[u8], name: &str) -> Result<[u8; 32], CodecError> {
    if bytes.len() > 32 {
        return Err(CodecError::Rlp(format!("{name} is {} bytes", bytes.len())));
    }
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(bytes);
    Ok(out)
}
