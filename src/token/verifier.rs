//! Co-signed transfers out of multisig accounts
//!
//! A transfer is accepted when the caller may submit for the account, the
//! supplied nonce is exactly one past the stored counter, and the signature
//! over the packed request recovers to a permitted co-signer. Under the
//! default policy that means the first holder (or the account itself) calls
//! and the second holder signs. All checks run before any state is written.

use super::token::{Token, TokenError, TransferEvent};
use crate::core::{Address, U256};
use crate::multisig::{EncodedSignature, NonceQuery, QueryError, TransferRequest, TransferVerifier};

impl Token {
    /// Current nonce of a registered multisig account
    pub fn current_nonce(&self, account: &Address) -> Option<U256> {
        self.nonces.get(account).copied()
    }

    /// Verify a co-signed transfer and apply it
    ///
    /// On success the account's nonce becomes `nonce` and the transfer event
    /// is returned. On any error neither the nonce nor a balance changes.
    pub fn transfer_2of3(
        &mut self,
        multisig_account: &Address,
        spender: &Address,
        amount: U256,
        nonce: U256,
        signature: &EncodedSignature,
        caller: &Address,
    ) -> Result<TransferEvent, TokenError> {
        let applied = self
            .check_2of3(multisig_account, spender, amount, nonce, signature, caller)
            .and_then(|()| self.move_balance(multisig_account, spender, amount));

        if let Err(e) = applied {
            log::warn!(
                "Rejected 2-of-3 transfer from {} to {} (caller {}): {}",
                multisig_account,
                spender,
                caller,
                e
            );
            return Err(e);
        }

        self.nonces.insert(*multisig_account, nonce);
        let event = self.record_transfer(multisig_account, spender, amount);

        log::info!(
            "2-of-3 transfer {} {} from {} to {} at nonce {}",
            amount,
            self.symbol(),
            multisig_account,
            spender,
            nonce
        );

        Ok(event)
    }

    fn check_2of3(
        &self,
        multisig_account: &Address,
        spender: &Address,
        amount: U256,
        nonce: U256,
        signature: &EncodedSignature,
        caller: &Address,
    ) -> Result<(), TokenError> {
        let account = self
            .multisigs
            .get(multisig_account)
            .ok_or(TokenError::UnknownMultisig(*multisig_account))?;

        let policy = self.config.cosign_policy;
        if !account.may_submit(policy, caller) {
            return Err(TokenError::Unauthorized {
                caller: *caller,
                account: *multisig_account,
            });
        }

        let current = self.current_nonce(multisig_account).unwrap_or(U256::ZERO);
        let expected = current.checked_add(U256::ONE);
        if expected != Some(nonce) {
            return Err(TokenError::NonceMismatch {
                expected: expected.unwrap_or(U256::MAX),
                supplied: nonce,
            });
        }

        let request = TransferRequest::new(self.address, *spender, *multisig_account, amount, nonce);
        let signer = signature
            .recover_signer(&request.message_hash())
            .map_err(|e| TokenError::BadSignature(e.to_string()))?;

        if !account.may_cosign(policy, caller, &signer) {
            return Err(TokenError::BadSignature(format!(
                "recovered {} which may not co-sign for caller {}",
                signer, caller
            )));
        }

        Ok(())
    }
}

impl NonceQuery for Token {
    fn token_address(&self) -> Result<Address, QueryError> {
        Ok(self.address)
    }

    fn nonce(&self, account: &Address) -> Result<U256, QueryError> {
        self.current_nonce(account)
            .ok_or(QueryError::UnknownAccount(*account))
    }
}

impl TransferVerifier for Token {
    type Receipt = TransferEvent;
    type Error = TokenError;

    fn transfer_2of3(
        &mut self,
        multisig_account: &Address,
        spender: &Address,
        amount: U256,
        nonce: U256,
        signature: &EncodedSignature,
        caller: &Address,
    ) -> Result<TransferEvent, TokenError> {
        Token::transfer_2of3(self, multisig_account, spender, amount, nonce, signature, caller)
    }
}
