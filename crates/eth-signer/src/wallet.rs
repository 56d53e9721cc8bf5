use std::fmt;

use eth_codec::address::Address;
use eth_codec::hash::keccak256;
use eth_codec::numeric::strip_0x;
use eth_codec::CodecError;
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};
use rand_core::OsRng;
use zeroize::{Zeroize, Zeroizing};

use crate::error::SignerError;

/// A low-s secp256k1 ECDSA signature over a Keccak-256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    /// 0 or 1: parity of the y coordinate of the ephemeral point.
    pub recovery_parity: u8,
}

/// A private key together with the address derived from it.
struct KeyMaterial {
    signing_key: SigningKey,
}

/// An account handle: always an address, optionally the key behind it.
///
/// The key never leaves the wallet except through
/// [`Wallet::export_private_key`].
pub struct Wallet {
    key: Option<KeyMaterial>,
    address: Address,
}

impl Wallet {
    /// Loads a wallet from a 32-byte private key in hex, with or without
    /// `0x`.
    pub fn from_private_key(private_key_hex: &str) -> Result<Self, SignerError> {
        let digits = strip_0x(private_key_hex);
        if digits.len() != 64 {
            return Err(SignerError::InvalidPrivateKey(format!(
                "expected 64 hex characters, got {}",
                digits.len()
            )));
        }

        let decoded = Zeroizing::new(
            hex::decode(digits).map_err(|e| SignerError::InvalidPrivateKey(e.to_string()))?,
        );
        let mut key_bytes = [0u8; 32];
        key_bytes.copy_from_slice(&decoded);

        let wallet = Self::from_bytes(&key_bytes);
        key_bytes.zeroize();
        wallet
    }

    /// Loads a wallet from raw private key bytes.
    pub fn from_bytes(private_key: &[u8; 32]) -> Result<Self, SignerError> {
        let signing_key = SigningKey::from_bytes(private_key.into())
            .map_err(|e| SignerError::InvalidPrivateKey(e.to_string()))?;
        Self::from_signing_key(signing_key)
    }

    /// Generates a fresh key from the operating system RNG.
    pub fn random() -> Result<Self, SignerError> {
        Self::from_signing_key(SigningKey::random(&mut OsRng))
    }

    /// An address-only wallet. Every signing attempt fails with
    /// [`SignerError::LockedWallet`].
    pub fn locked(address: Address) -> Self {
        Self { key: None, address }
    }

    fn from_signing_key(signing_key: SigningKey) -> Result<Self, SignerError> {
        let address = address_of(signing_key.verifying_key())?;
        Ok(Self {
            key: Some(KeyMaterial { signing_key }),
            address,
        })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn is_locked(&self) -> bool {
        self.key.is_none()
    }

    /// The private key as 0x-prefixed hex, wiped from memory on drop.
    pub fn export_private_key(&self) -> Result<Zeroizing<String>, SignerError> {
        let key = self.key.as_ref().ok_or(SignerError::LockedWallet)?;

        let mut bytes: [u8; 32] = key.signing_key.to_bytes().into();
        let exported = Zeroizing::new(format!("0x{}", hex::encode(bytes)));
        bytes.zeroize();
        Ok(exported)
    }

    /// Signs hex-encoded message bytes.
    pub fn sign(&self, message_hex: &str) -> Result<Signature, SignerError> {
        let message = hex::decode(strip_0x(message_hex)).map_err(|e| {
            CodecError::InvalidEncoding(format!("message is not hex: {e}"))
        })?;
        self.sign_bytes(&message)
    }

    /// Hashes `message` with Keccak-256 and signs the digest.
    pub fn sign_bytes(&self, message: &[u8]) -> Result<Signature, SignerError> {
        self.sign_digest(&keccak256(message))
    }

    /// Signs a precomputed 32-byte digest (RFC 6979 deterministic nonce).
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<Signature, SignerError> {
        let key = self.key.as_ref().ok_or(SignerError::LockedWallet)?;

        let (signature, recovery_id): (EcdsaSignature, RecoveryId) = key
            .signing_key
            .sign_prehash(digest)
            .map_err(|e| SignerError::SigningFailed(e.to_string()))?;

        // Low-s form; negating s flips the recovery parity.
        let (signature, recovery_id) = match signature.normalize_s() {
            Some(normalized) => (
                normalized,
                RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced()),
            ),
            None => (signature, recovery_id),
        };

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&signature.r().to_bytes());
        s.copy_from_slice(&signature.s().to_bytes());

        Ok(Signature {
            r,
            s,
            recovery_parity: recovery_id.is_y_odd() as u8,
        })
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .field("locked", &self.is_locked())
            .finish()
    }
}

/// Recovers the address that produced `signature` over `message`.
pub fn recover_address(message: &[u8], signature: &Signature) -> Result<Address, SignerError> {
    let digest = keccak256(message);

    let ecdsa = EcdsaSignature::from_scalars(signature.r, signature.s)
        .map_err(|e| SignerError::SigningFailed(e.to_string()))?;
    let recovery_id = RecoveryId::from_byte(signature.recovery_parity).ok_or_else(|| {
        SignerError::SigningFailed(format!(
            "invalid recovery parity {}",
            signature.recovery_parity
        ))
    })?;

    let verifying_key = VerifyingKey::recover_from_prehash(&digest, &ecdsa, recovery_id)
        .map_err(|e| SignerError::SigningFailed(e.to_string()))?;
    address_of(&verifying_key)
}

fn address_of(verifying_key: &VerifyingKey) -> Result<Address, SignerError> {
    let point = verifying_key.to_encoded_point(false);
    let uncompressed: [u8; 65] = point
        .as_bytes()
        .try_into()
        .map_err(|_| CodecError::InvalidEncoding("invalid uncompressed public key".into()))?;
    Ok(Address::from_public_key(&uncompressed)?)
}
