//! Canonical transfer message
//!
//! The co-signer signs keccak-256 over a tightly packed record:
//!
//! ```text
//! offset  size  field
//!      0    20  token contract
//!     20    20  spender (destination)
//!     40    20  multisig account (source)
//!     60    32  amount, big-endian
//!     92    32  nonce, big-endian
//! ```
//!
//! There are no length prefixes or separators. The verifier rebuilds the same
//! bytes from its own inputs, so any change to field order or width makes
//! every signature unverifiable.

use crate::core::{Address, U256, ADDRESS_LEN};
use crate::crypto::keccak256;
use serde::{Deserialize, Serialize};

/// Size of the packed message in bytes
pub const PACKED_LEN: usize = 3 * ADDRESS_LEN + 2 * 32;

/// The logical unit a co-signature authorizes
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransferRequest {
    /// Asset contract the transfer happens on
    pub token_contract: Address,
    /// Destination of funds
    pub spender: Address,
    /// Source of funds
    pub multisig_account: Address,
    /// Amount to move
    pub amount: U256,
    /// Nonce the request is bound to
    pub nonce: U256,
}

impl TransferRequest {
    pub fn new(
        token_contract: Address,
        spender: Address,
        multisig_account: Address,
        amount: U256,
        nonce: U256,
    ) -> Self {
        Self {
            token_contract,
            spender,
            multisig_account,
            amount,
            nonce,
        }
    }

    /// Packed encoding of the request
    pub fn encode_packed(&self) -> [u8; PACKED_LEN] {
        let mut out = [0u8; PACKED_LEN];
        let mut offset = 0;
        for field in [
            self.token_contract.as_bytes().as_slice(),
            self.spender.as_bytes().as_slice(),
            self.multisig_account.as_bytes().as_slice(),
            &self.amount.to_be_bytes()[..],
            &self.nonce.to_be_bytes()[..],
        ] {
            out[offset..offset + field.len()].copy_from_slice(field);
            offset += field.len();
        }
        debug_assert_eq!(offset, PACKED_LEN);
        out
    }

    /// Digest the co-signer signs and the verifier recomputes
    pub fn message_hash(&self) -> [u8; 32] {
        keccak256(&self.encode_packed())
    }
}
