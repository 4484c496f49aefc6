//! Cryptographic utilities
//!
//! This module provides:
//! - Keccak-256 hashing
//! - ECDSA key management (secp256k1) with public-key recovery

pub mod hash;
pub mod keys;

pub use hash::{keccak256, keccak256_concat, keccak256_hex};
pub use keys::{
    public_key_to_address, recover_address, recoverable_from_parts, sign_prehash, KeyError,
    KeyPair,
};
