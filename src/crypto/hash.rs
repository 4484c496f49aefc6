//! Keccak-256 hashing
//!
//! This is the pre-standard Keccak padding used by Ethereum-style chains,
//! not NIST SHA3-256. The two produce different digests for the same input.

use sha3::{Digest, Keccak256};

/// Computes the Keccak-256 digest of the input data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Computes the Keccak-256 digest of several byte slices, fed in order
/// with no separators or length prefixes
pub fn keccak256_concat<I, T>(parts: I) -> [u8; 32]
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part.as_ref());
    }
    hasher.finalize().into()
}

/// Computes Keccak-256 and returns it as a hex string
pub fn keccak256_hex(data: &[u8]) -> String {
    hex::encode(keccak256(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty() {
        assert_eq!(
            keccak256_hex(b""),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_concat_matches_single_buffer() {
        let joined = keccak256(b"hello world");
        let parts = keccak256_concat([&b"hello"[..], b" ", b"world"]);
        assert_eq!(joined, parts);
    }
}
