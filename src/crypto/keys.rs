//! ECDSA key management
//!
//! Provides key pair handling, prehash signing with a recovery id, and
//! signer recovery on the secp256k1 curve. Addresses follow the Ethereum
//! convention: the last 20 bytes of keccak-256 over the uncompressed
//! public key without its leading tag byte.

use rand::rngs::OsRng;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use thiserror::Error;

use super::hash::keccak256;
use crate::core::Address;

/// Errors that can occur during key operations
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Could not recover signer from signature")]
    RecoveryFailed,
    #[error("Secp256k1 error: {0}")]
    Secp256k1Error(#[from] secp256k1::Error),
}

/// A key pair consisting of a private key and its corresponding public key
#[derive(Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let (secret_key, public_key) = secp.generate_keypair(&mut OsRng);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from an existing secret key
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from a raw 32-byte scalar
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let secret_key = SecretKey::from_slice(bytes).map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Create a key pair from a hex-encoded private key
    ///
    /// A leading `0x` or `0X` is optional. Zero and out-of-range scalars are rejected.
    pub fn from_private_key_hex(hex_key: &str) -> Result<Self, KeyError> {
        let digits = hex_key
            .strip_prefix("0x")
            .or_else(|| hex_key.strip_prefix("0X"))
            .unwrap_or(hex_key);
        let bytes = hex::decode(digits).map_err(|_| KeyError::InvalidPrivateKey)?;
        Self::from_bytes(&bytes)
    }

    /// Get the private key as a hex string
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }

    /// Get the public key as a hex string (uncompressed format)
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize_uncompressed())
    }

    /// Address controlled by this key
    pub fn address(&self) -> Address {
        public_key_to_address(&self.public_key)
    }

    /// Sign a 32-byte digest, returning a recoverable signature
    pub fn sign_prehash(&self, digest: &[u8; 32]) -> Result<RecoverableSignature, KeyError> {
        sign_prehash(&self.secret_key, digest)
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Convert a public key to an address
pub fn public_key_to_address(public_key: &PublicKey) -> Address {
    let uncompressed = public_key.serialize_uncompressed();
    Address::from_digest(&keccak256(&uncompressed[1..]))
}

/// Sign a 32-byte digest with a secret key
///
/// Nonces are derived with RFC 6979, so the same key and digest always give
/// the same signature. The digest is signed as-is, with no message prefix.
pub fn sign_prehash(
    secret_key: &SecretKey,
    digest: &[u8; 32],
) -> Result<RecoverableSignature, KeyError> {
    let secp = Secp256k1::new();
    let message = Message::from_digest_slice(digest)?;
    Ok(secp.sign_ecdsa_recoverable(&message, secret_key))
}

/// Rebuild a recoverable signature from its compact parts
pub fn recoverable_from_parts(
    r: &[u8; 32],
    s: &[u8; 32],
    recovery_id: u8,
) -> Result<RecoverableSignature, KeyError> {
    let recid = RecoveryId::from_i32(recovery_id as i32).map_err(|_| KeyError::InvalidSignature)?;
    let mut compact = [0u8; 64];
    compact[..32].copy_from_slice(r);
    compact[32..].copy_from_slice(s);
    RecoverableSignature::from_compact(&compact, recid).map_err(|_| KeyError::InvalidSignature)
}

/// Recover the address that produced `signature` over `digest`
pub fn recover_address(
    digest: &[u8; 32],
    signature: &RecoverableSignature,
) -> Result<Address, KeyError> {
    let secp = Secp256k1::new();
    let message = Message::from_digest_slice(digest)?;
    let public_key = secp
        .recover_ecdsa(&message, signature)
        .map_err(|_| KeyError::RecoveryFailed)?;
    Ok(public_key_to_address(&public_key))
}
