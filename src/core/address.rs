//! 20-byte account and contract identities
//!
//! Addresses are the last 20 bytes of a keccak-256 digest, written as
//! `0x`-prefixed lowercase hex.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of an address in bytes
pub const ADDRESS_LEN: usize = 20;

/// Errors that can occur while parsing an address
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid address length: expected {ADDRESS_LEN} bytes, got {0}")]
    InvalidLength(usize),
    #[error("Invalid address hex: {0}")]
    InvalidHex(String),
}

/// An account or contract identity
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The all-zero address
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Wrap raw bytes
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Build an address from a slice that must be exactly 20 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        let raw: [u8; ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|_| AddressError::InvalidLength(bytes.len()))?;
        Ok(Self(raw))
    }

    /// Take the trailing 20 bytes of a 32-byte digest
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        let mut raw = [0u8; ADDRESS_LEN];
        raw.copy_from_slice(&digest[32 - ADDRESS_LEN..]);
        Self(raw)
    }

    /// Borrow the raw bytes
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Lowercase hex without prefix
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}
