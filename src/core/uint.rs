//! 256-bit unsigned integers
//!
//! The value is kept as 32 big-endian bytes, which is also its packed wire
//! form, so encoding never needs a conversion step.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while parsing or narrowing a [`U256`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseU256Error {
    #[error("Empty integer literal")]
    Empty,
    #[error("Invalid digit in integer literal: {0:?}")]
    InvalidDigit(char),
    #[error("Integer literal does not fit in 256 bits")]
    Overflow,
    #[error("Value does not fit in the target integer type")]
    Narrowing,
}

/// Unsigned 256-bit integer
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct U256([u8; 32]);

impl U256 {
    pub const ZERO: U256 = U256([0u8; 32]);
    pub const ONE: U256 = {
        let mut raw = [0u8; 32];
        raw[31] = 1;
        U256(raw)
    };
    pub const MAX: U256 = U256([0xff; 32]);

    /// Construct from big-endian bytes
    pub const fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Big-endian byte representation
    pub const fn to_be_bytes(&self) -> [u8; 32] {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Addition returning `None` on overflow
    pub fn checked_add(self, rhs: U256) -> Option<U256> {
        let mut out = [0u8; 32];
        let mut carry = 0u16;
        for i in (0..32).rev() {
            let sum = self.0[i] as u16 + rhs.0[i] as u16 + carry;
            out[i] = sum as u8;
            carry = sum >> 8;
        }
        (carry == 0).then_some(U256(out))
    }

    /// Subtraction returning `None` on underflow
    pub fn checked_sub(self, rhs: U256) -> Option<U256> {
        if self < rhs {
            return None;
        }
        let mut out = [0u8; 32];
        let mut borrow = 0i16;
        for i in (0..32).rev() {
            let mut diff = self.0[i] as i16 - rhs.0[i] as i16 - borrow;
            borrow = 0;
            if diff < 0 {
                diff += 256;
                borrow = 1;
            }
            out[i] = diff as u8;
        }
        Some(U256(out))
    }

    /// `self * mul + add` in place, returning false on overflow
    fn mul_add_small(&mut self, mul: u32, add: u32) -> bool {
        let mut carry = add;
        for byte in self.0.iter_mut().rev() {
            let v = *byte as u32 * mul + carry;
            *byte = v as u8;
            carry = v >> 8;
        }
        carry == 0
    }

    /// Divide in place by a small divisor, returning the remainder
    fn div_rem_small(&mut self, div: u32) -> u32 {
        let mut rem = 0u32;
        for byte in self.0.iter_mut() {
            let cur = (rem << 8) | *byte as u32;
            *byte = (cur / div) as u8;
            rem = cur % div;
        }
        rem
    }

    fn parse_radix(digits: &str, radix: u32) -> Result<Self, ParseU256Error> {
        if digits.is_empty() {
            return Err(ParseU256Error::Empty);
        }
        let mut value = U256::ZERO;
        for c in digits.chars() {
            if c == '_' {
                continue;
            }
            let d = c.to_digit(radix).ok_or(ParseU256Error::InvalidDigit(c))?;
            if !value.mul_add_small(radix, d) {
                return Err(ParseU256Error::Overflow);
            }
        }
        Ok(value)
    }
}

impl From<u64> for U256 {
    fn from(value: u64) -> Self {
        let mut raw = [0u8; 32];
        raw[24..].copy_from_slice(&value.to_be_bytes());
        Self(raw)
    }
}

impl From<u128> for U256 {
    fn from(value: u128) -> Self {
        let mut raw = [0u8; 32];
        raw[16..].copy_from_slice(&value.to_be_bytes());
        Self(raw)
    }
}

impl TryFrom<U256> for u128 {
    type Error = ParseU256Error;

    fn try_from(value: U256) -> Result<Self, Self::Error> {
        if value.0[..16].iter().any(|b| *b != 0) {
            return Err(ParseU256Error::Narrowing);
        }
        let mut low = [0u8; 16];
        low.copy_from_slice(&value.0[16..]);
        Ok(u128::from_be_bytes(low))
    }
}

impl FromStr for U256 {
    type Err = ParseU256Error;

    /// Accepts decimal, or hex with a `0x` prefix
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex_digits) => Self::parse_radix(hex_digits, 16),
            None => Self::parse_radix(s, 10),
        }
    }
}

impl TryFrom<String> for U256 {
    type Error = ParseU256Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<U256> for String {
    fn from(value: U256) -> Self {
        value.to_string()
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        let mut n = *self;
        let mut digits = Vec::with_capacity(78);
        while !n.is_zero() {
            let rem = n.div_rem_small(10);
            digits.push(b'0' + rem as u8);
        }
        digits.reverse();
        // Only ASCII digits were pushed
        f.write_str(&String::from_utf8_lossy(&digits))
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U256({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_values_are_right_aligned() {
        let v = U256::from(200u64);
        let bytes = v.to_be_bytes();
        assert_eq!(bytes[31], 0xc8);
        assert!(bytes[..31].iter().all(|b| *b == 0));
        assert_eq!(U256::ONE, U256::from(1u64));
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = U256::from(u64::MAX);
        let b = a.checked_add(U256::ONE).unwrap();
        assert_eq!(b, U256::from(u64::MAX as u128 + 1));
        assert_eq!(b.checked_sub(U256::ONE), Some(a));

        assert_eq!(U256::MAX.checked_add(U256::ONE), None);
        assert_eq!(U256::ZERO.checked_sub(U256::ONE), None);
    }

    #[test]
    fn test_decimal_display_and_parse() {
        assert_eq!(U256::ZERO.to_string(), "0");
        assert_eq!(U256::from(800u64).to_string(), "800");
        assert_eq!(
            U256::MAX.to_string(),
            "115792089237316195423570985008687907853269984665640564039457584007913129639935"
        );
        let parsed: U256 = U256::MAX.to_string().parse().unwrap();
        assert_eq!(parsed, U256::MAX);
        assert_eq!("0xff".parse::<U256>().unwrap(), U256::from(255u64));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<U256>(), Err(ParseU256Error::Empty));
        assert_eq!("12a".parse::<U256>(), Err(ParseU256Error::InvalidDigit('a')));
        assert_eq!(
            "115792089237316195423570985008687907853269984665640564039457584007913129639936"
                .parse::<U256>(),
            Err(ParseU256Error::Overflow)
        );
    }

    #[test]
    fn test_narrowing_to_u128() {
        assert_eq!(u128::try_from(U256::from(u128::MAX)), Ok(u128::MAX));
        assert_eq!(
            u128::try_from(U256::MAX),
            Err(ParseU256Error::Narrowing)
        );
    }

    #[test]
    fn test_ordering_matches_numeric_order() {
        assert!(U256::from(1u64) < U256::from(256u64));
        assert!(U256::from(u128::MAX) < U256::MAX);
    }
}
