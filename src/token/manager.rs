//! Token manager for deploying and looking up tokens
//!
//! Several independent token contracts can coexist; each gets its own
//! address, which is part of every co-signed message on it.

use crate::core::{Address, U256};
use crate::crypto::keccak256_concat;
use crate::token::token::{Token, TokenConfig, TokenError, TransferEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Manages all deployed tokens
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TokenManager {
    /// All tokens by address
    tokens: HashMap<Address, Token>,
    /// Deployment counter for address generation
    nonce: u64,
}

impl TokenManager {
    /// Create a new token manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploy a new token, crediting the initial supply to `creator`
    pub fn deploy(&mut self, config: TokenConfig, creator: &Address) -> Result<Address, TokenError> {
        let address = self.generate_address(creator);
        self.nonce += 1;

        if self.tokens.contains_key(&address) {
            return Err(TokenError::TokenAlreadyExists(address));
        }

        let token = Token::new(address, config, *creator)?;
        log::info!(
            "Token deployed: {} ({}) at {}",
            token.name(),
            token.symbol(),
            address
        );
        self.tokens.insert(address, token);

        Ok(address)
    }

    /// Address = keccak256(creator || deploy counter)[12..]
    fn generate_address(&self, creator: &Address) -> Address {
        let counter = self.nonce.to_be_bytes();
        Address::from_digest(&keccak256_concat([creator.as_bytes().as_slice(), &counter[..]]))
    }

    /// Get a token by address
    pub fn get(&self, address: &Address) -> Option<&Token> {
        self.tokens.get(address)
    }

    /// Get mutable reference to a token
    pub fn get_mut(&mut self, address: &Address) -> Option<&mut Token> {
        self.tokens.get_mut(address)
    }

    /// List all tokens
    pub fn list(&self) -> Vec<&Token> {
        self.tokens.values().collect()
    }

    /// Get token count
    pub fn count(&self) -> usize {
        self.tokens.len()
    }

    /// Check if a token exists
    pub fn exists(&self, address: &Address) -> bool {
        self.tokens.contains_key(address)
    }

    /// Transfer tokens on a deployed token
    pub fn transfer(
        &mut self,
        token_address: &Address,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<TransferEvent, TokenError> {
        let token = self
            .tokens
            .get_mut(token_address)
            .ok_or(TokenError::TokenNotFound(*token_address))?;

        token.transfer(from, to, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_creation() {
        let manager = TokenManager::new();
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn test_deploy_distinct_addresses() {
        let mut manager = TokenManager::new();
        let creator = Address::new([0xc0; 20]);

        let a = manager.deploy(TokenConfig::default(), &creator).unwrap();
        let b = manager.deploy(TokenConfig::default(), &creator).unwrap();

        assert_ne!(a, b);
        assert_eq!(manager.count(), 2);
        assert!(manager.exists(&a));
        assert_eq!(manager.get(&b).unwrap().balance_of(&creator), U256::from(1_000_000u64));
        assert_eq!(manager.list().len(), 2);
    }

    #[test]
    fn test_transfer_via_manager() {
        let mut manager = TokenManager::new();
        let creator = Address::new([0xc0; 20]);
        let recipient = Address::new([0xee; 20]);
        let token = manager.deploy(TokenConfig::default(), &creator).unwrap();

        manager
            .transfer(&token, &creator, &recipient, U256::from(5u64))
            .unwrap();
        assert_eq!(
            manager.get(&token).unwrap().balance_of(&recipient),
            U256::from(5u64)
        );

        let missing = Address::new([0x01; 20]);
        assert!(matches!(
            manager.transfer(&missing, &creator, &recipient, U256::ONE),
            Err(TokenError::TokenNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut manager = TokenManager::new();
        let config = TokenConfig {
            decimals: 30,
            ..TokenConfig::default()
        };
        assert!(manager.deploy(config, &Address::new([0xc0; 20])).is_err());
        assert_eq!(manager.count(), 0);
    }
}
