//! Primitive value types shared by every module
//!
//! This module contains:
//! - 20-byte addresses
//! - 256-bit unsigned integers

pub mod address;
pub mod uint;

pub use address::{Address, AddressError, ADDRESS_LEN};
pub use uint::{ParseU256Error, U256};
