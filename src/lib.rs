//! Multisig-Cosign: 2-of-3 co-signed token transfers
//!
//! This crate provides the off-chain half and a reference on-chain half of a
//! 2-of-3 multisig transfer:
//! - Keccak-256 hashing and secp256k1 signing with public-key recovery
//! - A fixed 124-byte packed transfer message binding token, spender,
//!   account, amount and nonce
//! - An authorization builder that reads the next nonce from the chain and
//!   co-signs the transfer
//! - An ERC-20 style token that registers multisig accounts and verifies
//!   co-signed transfers against a per-account nonce
//!
//! # Example
//!
//! ```rust
//! use multisig_cosign::{build_authorization, Address, KeyPair, TokenConfig, TokenManager, U256};
//!
//! let holders: Vec<KeyPair> = (1..=3u8)
//!     .map(|i| KeyPair::from_bytes(&[i; 32]).unwrap())
//!     .collect();
//! let creator = Address::new([0xa1; 20]);
//! let recipient = Address::new([0xa2; 20]);
//!
//! // Deploy a token and fund a multisig account
//! let mut manager = TokenManager::new();
//! let token_address = manager.deploy(TokenConfig::default(), &creator).unwrap();
//! let token = manager.get_mut(&token_address).unwrap();
//! let multisig = token
//!     .register_multisig(holders[0].address(), holders[1].address(), holders[2].address())
//!     .unwrap();
//! token.transfer(&creator, &multisig, U256::from(800u64)).unwrap();
//!
//! // Second holder co-signs off-chain
//! let amount = U256::from(200u64);
//! let auth = build_authorization(
//!     &*token,
//!     &holders[1].private_key_hex(),
//!     &multisig,
//!     &recipient,
//!     amount,
//! )
//! .unwrap();
//! assert_eq!(auth.nonce, U256::ONE);
//!
//! // First holder submits
//! token
//!     .transfer_2of3(
//!         &multisig,
//!         &recipient,
//!         amount,
//!         auth.nonce,
//!         &auth.encoded_signature(),
//!         &holders[0].address(),
//!     )
//!     .unwrap();
//! assert_eq!(token.balance_of(&recipient), amount);
//! ```

pub mod core;
pub mod crypto;
pub mod multisig;
pub mod token;

// Re-export commonly used types
pub use core::{Address, U256};
pub use crypto::{keccak256, KeyPair};
pub use multisig::{
    build_authorization, build_authorization_with_key, AuthError, Authorization, CosignPolicy,
    EncodedSignature, MultisigAccount, NonceQuery, QueryError, Signature, TransferRequest,
    TransferVerifier,
};
pub use token::{Token, TokenConfig, TokenError, TokenManager, TransferEvent};
