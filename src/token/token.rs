//! ERC-20 style token ledger
//!
//! Balances, direct transfers, and the multisig registry. The co-signed
//! transfer path lives in [`super::verifier`].

use crate::core::{Address, U256};
use crate::multisig::{AccountError, CosignPolicy, Holders, MultisigAccount};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Number of transfer events kept per token
pub const MAX_HISTORY: usize = 100;

/// Token-related errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: U256, need: U256 },
    #[error("Balance overflow crediting {0}")]
    BalanceOverflow(Address),
    #[error("Token not found: {0}")]
    TokenNotFound(Address),
    #[error("Token already exists: {0}")]
    TokenAlreadyExists(Address),
    #[error("Invalid symbol: must be 1-10 characters")]
    InvalidSymbol,
    #[error("Invalid name: must be 1-50 characters")]
    InvalidName,
    #[error("Invalid decimals: must be 0-18")]
    InvalidDecimals,
    #[error("Invalid supply: must be greater than 0")]
    InvalidSupply,
    #[error("Invalid config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
    #[error("Invalid multisig holders: {0}")]
    InvalidHolders(#[from] AccountError),
    #[error("Multisig already registered: {0}")]
    MultisigAlreadyRegistered(Address),
    #[error("Unknown multisig account: {0}")]
    UnknownMultisig(Address),
    #[error("Caller {caller} may not move funds from {account}")]
    Unauthorized { caller: Address, account: Address },
    #[error("Nonce mismatch: expected {expected}, got {supplied}")]
    NonceMismatch { expected: U256, supplied: U256 },
    #[error("Bad co-signature: {0}")]
    BadSignature(String),
}

fn default_name() -> String {
    "RU Token".to_string()
}

fn default_symbol() -> String {
    "RUT".to_string()
}

fn default_decimals() -> u8 {
    18
}

fn default_supply() -> U256 {
    U256::from(1_000_000u64)
}

/// Token configuration (immutable after deployment)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenConfig {
    /// Token name (e.g., "My Token")
    #[serde(default = "default_name")]
    pub name: String,
    /// Token symbol (e.g., "MTK")
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Decimal places (usually 18)
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    /// Supply credited to the creator at deployment
    #[serde(default = "default_supply")]
    pub initial_supply: U256,
    /// Which holders may submit and co-sign multisig transfers
    #[serde(default)]
    pub cosign_policy: CosignPolicy,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            symbol: default_symbol(),
            decimals: default_decimals(),
            initial_supply: default_supply(),
            cosign_policy: CosignPolicy::default(),
        }
    }
}

impl TokenConfig {
    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self, TokenError> {
        let config: TokenConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field ranges
    pub fn validate(&self) -> Result<(), TokenError> {
        if self.name.is_empty() || self.name.chars().count() > 50 {
            return Err(TokenError::InvalidName);
        }

        if self.symbol.is_empty() || self.symbol.chars().count() > 10 {
            return Err(TokenError::InvalidSymbol);
        }

        if self.decimals > 18 {
            return Err(TokenError::InvalidDecimals);
        }

        if self.initial_supply.is_zero() {
            return Err(TokenError::InvalidSupply);
        }

        Ok(())
    }
}

/// Transfer event (emitted when tokens are transferred)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransferEvent {
    pub token: Address,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub timestamp: DateTime<Utc>,
}

/// An ERC-20 style fungible token with 2-of-3 multisig accounts
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Token {
    /// Contract address
    pub address: Address,
    /// Token configuration
    pub config: TokenConfig,
    /// Deployer, credited with the initial supply
    pub creator: Address,
    /// Deployment timestamp
    pub created_at: DateTime<Utc>,
    balances: HashMap<Address, U256>,
    pub(super) multisigs: HashMap<Address, MultisigAccount>,
    pub(super) nonces: HashMap<Address, U256>,
    /// Transfer history (last 100)
    pub transfer_history: Vec<TransferEvent>,
}

impl Token {
    /// Deploy a token with the whole supply allocated to `creator`
    pub fn new(address: Address, config: TokenConfig, creator: Address) -> Result<Self, TokenError> {
        config.validate()?;

        let mut balances = HashMap::new();
        balances.insert(creator, config.initial_supply);

        Ok(Self {
            address,
            config,
            creator,
            created_at: Utc::now(),
            balances,
            multisigs: HashMap::new(),
            nonces: HashMap::new(),
            transfer_history: Vec::new(),
        })
    }

    // =========================================================================
    // View functions
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn symbol(&self) -> &str {
        &self.config.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.config.decimals
    }

    pub fn total_supply(&self) -> U256 {
        self.config.initial_supply
    }

    /// Get balance of an address
    pub fn balance_of(&self, address: &Address) -> U256 {
        self.balances.get(address).copied().unwrap_or(U256::ZERO)
    }

    /// Get holder count
    pub fn holder_count(&self) -> usize {
        self.balances.values().filter(|b| !b.is_zero()).count()
    }

    /// Look up a registered multisig account
    pub fn multisig(&self, address: &Address) -> Option<&MultisigAccount> {
        self.multisigs.get(address)
    }

    pub fn is_multisig(&self, address: &Address) -> bool {
        self.multisigs.contains_key(address)
    }

    pub fn multisig_count(&self) -> usize {
        self.multisigs.len()
    }

    // =========================================================================
    // Mutating functions
    // =========================================================================

    /// Transfer tokens from `from` to `to`
    ///
    /// Zero amounts and self-transfers succeed and still emit an event.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<TransferEvent, TokenError> {
        self.move_balance(from, to, amount)?;
        let event = self.record_transfer(from, to, amount);
        log::info!("Transfer {} {} from {} to {}", amount, self.symbol(), from, to);
        Ok(event)
    }

    /// Register a multisig account over three distinct holders
    ///
    /// Registration is one-shot: the same holder triple cannot be registered
    /// twice on one token.
    pub fn register_multisig(
        &mut self,
        first: Address,
        second: Address,
        third: Address,
    ) -> Result<Address, TokenError> {
        let account = MultisigAccount::new(Holders::new(first, second, third)?);
        let address = account.address();

        if self.multisigs.contains_key(&address) {
            return Err(TokenError::MultisigAlreadyRegistered(address));
        }

        self.multisigs.insert(address, account);
        self.nonces.insert(address, U256::ZERO);

        log::info!(
            "Multisig {} registered on {} (holders {}, {}, {})",
            address,
            self.address,
            first,
            second,
            third
        );

        Ok(address)
    }

    /// Debit and credit, writing nothing unless both sides succeed
    pub(super) fn move_balance(
        &mut self,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<(), TokenError> {
        let from_balance = self.balance_of(from);
        let debited = from_balance
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                have: from_balance,
                need: amount,
            })?;

        if from == to {
            return Ok(());
        }

        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::BalanceOverflow(*to))?;

        self.balances.insert(*from, debited);
        self.balances.insert(*to, credited);
        Ok(())
    }

    pub(super) fn record_transfer(
        &mut self,
        from: &Address,
        to: &Address,
        value: U256,
    ) -> TransferEvent {
        let event = TransferEvent {
            token: self.address,
            from: *from,
            to: *to,
            value,
            timestamp: Utc::now(),
        };

        self.transfer_history.push(event.clone());
        if self.transfer_history.len() > MAX_HISTORY {
            self.transfer_history.remove(0);
        }

        event
    }
}
