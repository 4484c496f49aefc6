//! ERC-20 style token with 2-of-3 multisig transfers
//!
//! Provides a fungible token ledger with:
//! - Balances per address and direct transfers
//! - One-shot registration of multisig accounts
//! - Co-signed transfers out of multisig accounts, guarded by a per-account nonce
//!
//! # Example
//!
//! ```ignore
//! use multisig_cosign::token::{TokenConfig, TokenManager};
//!
//! let mut manager = TokenManager::new();
//! let token = manager.deploy(TokenConfig::default(), &creator)?;
//!
//! let multisig = manager.get_mut(&token).unwrap().register_multisig(first, second, third)?;
//! manager.transfer(&token, &creator, &multisig, 800u64.into())?;
//! ```

pub mod manager;
pub mod token;
pub mod verifier;

pub use manager::TokenManager;
pub use token::{Token, TokenConfig, TokenError, TransferEvent, MAX_HISTORY};
