//! 2-of-3 multisig transfer authorization
//!
//! A multisig account has three holders. By default the first holder submits
//! a transfer and the second holder authorizes it off-chain by signing a
//! packed message bound to the account's next nonce.
//!
//! # Example
//!
//! ```ignore
//! use multisig_cosign::multisig::build_authorization;
//!
//! // Second holder co-signs against a read-only view of the token
//! let auth = build_authorization(&token, &second_holder_key, &multisig, &recipient, amount)?;
//!
//! // First holder submits it
//! token.transfer_2of3(&multisig, &recipient, amount, auth.nonce, &auth.encoded_signature(), &first_holder)?;
//! ```

pub mod account;
pub mod builder;
pub mod message;
pub mod query;
pub mod signature;

pub use account::{AccountError, CosignPolicy, Holders, MultisigAccount};
pub use builder::{build_authorization, build_authorization_with_key, AuthError, Authorization};
pub use message::{TransferRequest, PACKED_LEN};
pub use query::{NonceQuery, QueryError, TransferVerifier};
pub use signature::{EncodedSignature, Signature, SignatureError, V_OFFSET};
