//! Chain-state capabilities
//!
//! Reading a nonce and submitting a transfer are separate traits. The
//! authorization builder only accepts a [`NonceQuery`], whose methods all
//! take `&self`, so it has no path to the mutating [`TransferVerifier`]
//! entry point.

use crate::core::{Address, U256};
use crate::multisig::signature::EncodedSignature;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors from a read-only chain query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Unknown multisig account: {0}")]
    UnknownAccount(Address),
    #[error("Chain state unavailable: {0}")]
    Unavailable(String),
}

/// Read-only view of a token contract's multisig nonces
pub trait NonceQuery {
    /// Identity of the token contract being queried
    fn token_address(&self) -> Result<Address, QueryError>;

    /// Current nonce counter of a multisig account
    fn nonce(&self, account: &Address) -> Result<U256, QueryError>;
}

/// State-changing 2-of-3 transfer entry point
pub trait TransferVerifier: NonceQuery {
    type Receipt;
    type Error: std::error::Error;

    /// Verify a co-signed transfer and apply it atomically
    ///
    /// On error no nonce or balance has changed.
    fn transfer_2of3(
        &mut self,
        multisig_account: &Address,
        spender: &Address,
        amount: U256,
        nonce: U256,
        signature: &EncodedSignature,
        caller: &Address,
    ) -> Result<Self::Receipt, Self::Error>;
}

impl<T: NonceQuery + ?Sized> NonceQuery for &T {
    fn token_address(&self) -> Result<Address, QueryError> {
        (**self).token_address()
    }

    fn nonce(&self, account: &Address) -> Result<U256, QueryError> {
        (**self).nonce(account)
    }
}

impl<T: NonceQuery + ?Sized> NonceQuery for Arc<T> {
    fn token_address(&self) -> Result<Address, QueryError> {
        (**self).token_address()
    }

    fn nonce(&self, account: &Address) -> Result<U256, QueryError> {
        (**self).nonce(account)
    }
}

impl<T: NonceQuery> NonceQuery for RwLock<T> {
    fn token_address(&self) -> Result<Address, QueryError> {
        self.read()
            .map_err(|e| QueryError::Unavailable(e.to_string()))?
            .token_address()
    }

    fn nonce(&self, account: &Address) -> Result<U256, QueryError> {
        self.read()
            .map_err(|e| QueryError::Unavailable(e.to_string()))?
            .nonce(account)
    }
}
