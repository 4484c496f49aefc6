//! Off-chain co-signature construction
//!
//! The second holder reads the account's nonce, binds the signature to the
//! next value (`current + 1`), and signs the packed transfer message. The
//! verifier accepts that signature only while its counter still equals
//! `current`, and advancing the counter on success retires it.

use crate::core::{Address, U256};
use crate::crypto::{KeyError, KeyPair};
use crate::multisig::message::TransferRequest;
use crate::multisig::query::{NonceQuery, QueryError};
use crate::multisig::signature::{EncodedSignature, Signature, SignatureError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors while building an authorization
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid signer key: {0}")]
    InvalidKey(#[source] KeyError),
    #[error("Nonce query failed: {0}")]
    QueryFailed(#[from] QueryError),
    #[error("Nonce counter exhausted for account {0}")]
    NonceOverflow(Address),
    #[error("Signing failed: {0}")]
    SigningFailed(#[source] SignatureError),
}

/// A nonce and the co-signature bound to it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    pub nonce: U256,
    pub signature: Signature,
}

impl Authorization {
    /// Signature in the verifier's call format
    pub fn encoded_signature(&self) -> EncodedSignature {
        self.signature.encoded()
    }
}

impl From<Authorization> for (U256, Signature) {
    fn from(auth: Authorization) -> Self {
        (auth.nonce, auth.signature)
    }
}

/// Build a co-signature from a hex-encoded private key
///
/// The key is parsed before the chain is queried, so a malformed key never
/// costs a lookup. The parsed key is dropped when the call returns.
pub fn build_authorization<Q: NonceQuery + ?Sized>(
    chain: &Q,
    signer_key: &str,
    multisig_account: &Address,
    spender: &Address,
    amount: U256,
) -> Result<Authorization, AuthError> {
    let key = KeyPair::from_private_key_hex(signer_key).map_err(AuthError::InvalidKey)?;
    build_authorization_with_key(chain, &key, multisig_account, spender, amount)
}

/// Build a co-signature with an already parsed key
pub fn build_authorization_with_key<Q: NonceQuery + ?Sized>(
    chain: &Q,
    key: &KeyPair,
    multisig_account: &Address,
    spender: &Address,
    amount: U256,
) -> Result<Authorization, AuthError> {
    let token = chain.token_address()?;
    let current = chain.nonce(multisig_account)?;
    let nonce = current
        .checked_add(U256::ONE)
        .ok_or(AuthError::NonceOverflow(*multisig_account))?;

    let request = TransferRequest::new(token, *spender, *multisig_account, amount, nonce);
    let digest = request.message_hash();
    let signature = key
        .sign_prehash(&digest)
        .map_err(SignatureError::from)
        .and_then(Signature::try_from)
        .map_err(AuthError::SigningFailed)?;

    log::debug!(
        "Co-signed {} from {} to {} on {} at nonce {} (signer {})",
        amount,
        multisig_account,
        spender,
        token,
        nonce,
        key.address()
    );

    Ok(Authorization { nonce, signature })
}
