//! Co-signature values and their call encoding
//!
//! Internally a signature carries the raw recovery id (0 or 1). On the wire
//! the recovery byte is `v = recovery_id + 27`, the legacy offset the
//! verifier expects. Apply the offset exactly once, in [`Signature::encoded`].

use crate::core::Address;
use crate::crypto::{recover_address, recoverable_from_parts, KeyError};
use secp256k1::ecdsa::RecoverableSignature;
use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Offset added to the recovery id in the call encoding
pub const V_OFFSET: u8 = 27;

/// Length of the flat `r || s || v` form
pub const ENCODED_LEN: usize = 65;

/// Errors for malformed signature input
#[derive(Error, Debug)]
pub enum SignatureError {
    #[error("Invalid {field} length: expected {expected} bytes, got {got}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("Invalid recovery byte v={0}: expected 27 or 28")]
    InvalidRecoveryByte(u8),
    #[error("Invalid recovery id {0}: expected 0 or 1")]
    InvalidRecoveryId(u8),
    #[error("Crypto error: {0}")]
    CryptoError(#[from] KeyError),
}

fn word(field: &'static str, bytes: &[u8]) -> Result<[u8; 32], SignatureError> {
    bytes.try_into().map_err(|_| SignatureError::InvalidLength {
        field,
        expected: 32,
        got: bytes.len(),
    })
}

/// A recoverable ECDSA signature
///
/// The recovery id is checked on construction and deserialization, so
/// [`Signature::encoded`] cannot produce an out-of-range `v`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(with = "hex::serde")]
    r: [u8; 32],
    #[serde(with = "hex::serde")]
    s: [u8; 32],
    #[serde(deserialize_with = "checked_recovery_id")]
    recovery_id: u8,
}

fn checked_recovery_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let id = u8::deserialize(deserializer)?;
    if id > 1 {
        return Err(de::Error::custom(SignatureError::InvalidRecoveryId(id)));
    }
    Ok(id)
}

impl Signature {
    /// Build from components; `recovery_id` must be 0 or 1
    pub fn new(r: [u8; 32], s: [u8; 32], recovery_id: u8) -> Result<Self, SignatureError> {
        if recovery_id > 1 {
            return Err(SignatureError::InvalidRecoveryId(recovery_id));
        }
        Ok(Self { r, s, recovery_id })
    }

    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Raw recovery id, 0 or 1
    pub fn recovery_id(&self) -> u8 {
        self.recovery_id
    }

    /// Convert to the verifier's call format
    pub fn encoded(&self) -> EncodedSignature {
        EncodedSignature {
            r: self.r,
            s: self.s,
            v: self.recovery_id + V_OFFSET,
        }
    }

    /// Rebuild the library signature type
    pub fn to_recoverable(&self) -> Result<RecoverableSignature, SignatureError> {
        Ok(recoverable_from_parts(&self.r, &self.s, self.recovery_id)?)
    }

    /// Recover the signer of `digest`
    pub fn recover_signer(&self, digest: &[u8; 32]) -> Result<Address, SignatureError> {
        Ok(recover_address(digest, &self.to_recoverable()?)?)
    }
}

impl TryFrom<RecoverableSignature> for Signature {
    type Error = SignatureError;

    fn try_from(signature: RecoverableSignature) -> Result<Self, Self::Error> {
        let (recid, compact) = signature.serialize_compact();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&compact[..32]);
        s.copy_from_slice(&compact[32..]);
        Signature::new(r, s, recid.to_i32() as u8)
    }
}

/// Signature as passed to the verifier: `(r, s, v)` with `v = recovery_id + 27`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedSignature {
    #[serde(with = "hex::serde")]
    pub r: [u8; 32],
    #[serde(with = "hex::serde")]
    pub s: [u8; 32],
    pub v: u8,
}

impl EncodedSignature {
    /// Build from loose parts, checking the component lengths
    pub fn from_parts(r: &[u8], s: &[u8], v: u8) -> Result<Self, SignatureError> {
        Ok(Self {
            r: word("r", r)?,
            s: word("s", s)?,
            v,
        })
    }

    /// Parse the flat 65-byte `r || s || v` form
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != ENCODED_LEN {
            return Err(SignatureError::InvalidLength {
                field: "signature",
                expected: ENCODED_LEN,
                got: bytes.len(),
            });
        }
        Self::from_parts(&bytes[..32], &bytes[32..64], bytes[64])
    }

    /// Flat 65-byte `r || s || v` form
    pub fn to_bytes(&self) -> [u8; ENCODED_LEN] {
        let mut out = [0u8; ENCODED_LEN];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    /// Strip the offset, accepting only v = 27 or v = 28
    pub fn recovery_id(&self) -> Result<u8, SignatureError> {
        match self.v {
            27 | 28 => Ok(self.v - V_OFFSET),
            other => Err(SignatureError::InvalidRecoveryByte(other)),
        }
    }

    /// Back to the internal representation
    pub fn decoded(&self) -> Result<Signature, SignatureError> {
        Signature::new(self.r, self.s, self.recovery_id()?)
    }

    /// Recover the signer of `digest`
    pub fn recover_signer(&self, digest: &[u8; 32]) -> Result<Address, SignatureError> {
        self.decoded()?.recover_signer(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{keccak256, KeyPair};

    fn signed() -> (KeyPair, [u8; 32], Signature) {
        let kp = KeyPair::from_bytes(&[3u8; 32]).unwrap();
        let digest = keccak256(b"co-sign me");
        let sig = Signature::try_from(kp.sign_prehash(&digest).unwrap()).unwrap();
        (kp, digest, sig)
    }

    #[test]
    fn test_offset_applied_once() {
        let (_, _, sig) = signed();
        assert!(sig.recovery_id() <= 1);

        let encoded = sig.encoded();
        assert_eq!(encoded.v, sig.recovery_id() + 27);
        assert_eq!(&encoded.r, sig.r());
        assert_eq!(&encoded.s, sig.s());
        assert_eq!(encoded.decoded().unwrap(), sig);
    }

    #[test]
    fn test_out_of_range_recovery_id_rejected() {
        let (_, _, sig) = signed();
        assert!(Signature::new(*sig.r(), *sig.s(), 1).is_ok());
        assert!(matches!(
            Signature::new(*sig.r(), *sig.s(), 2),
            Err(SignatureError::InvalidRecoveryId(2))
        ));

        let mut json = serde_json::to_value(sig).unwrap();
        json["recovery_id"] = serde_json::json!(250);
        let result: Result<Signature, _> = serde_json::from_value(json);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Invalid recovery id 250"));

        let back: Signature = serde_json::from_value(serde_json::to_value(sig).unwrap()).unwrap();
        assert_eq!(back, sig);
    }

    #[test]
    fn test_encoded_recovers_signer() {
        let (kp, digest, sig) = signed();
        assert_eq!(sig.recover_signer(&digest).unwrap(), kp.address());
        assert_eq!(sig.encoded().recover_signer(&digest).unwrap(), kp.address());
    }

    #[test]
    fn test_missing_or_doubled_offset_rejected() {
        let (_, _, sig) = signed();

        let mut raw = sig.encoded();
        raw.v = sig.recovery_id();
        assert!(matches!(
            raw.recovery_id(),
            Err(SignatureError::InvalidRecoveryByte(_))
        ));

        let mut doubled = sig.encoded();
        doubled.v += V_OFFSET;
        assert!(matches!(
            doubled.recover_signer(&[0u8; 32]),
            Err(SignatureError::InvalidRecoveryByte(_))
        ));
    }

    #[test]
    fn test_flipped_recovery_id_recovers_someone_else() {
        let (kp, digest, sig) = signed();
        let mut flipped = sig.encoded();
        flipped.v = if flipped.v == 27 { 28 } else { 27 };

        // Recovery may also fail outright for the wrong parity
        let recovered = flipped.recover_signer(&digest);
        assert!(recovered.map_or(true, |address| address != kp.address()));
    }

    #[test]
    fn test_from_parts_length_checks() {
        assert!(EncodedSignature::from_parts(&[0u8; 32], &[0u8; 32], 27).is_ok());
        assert!(matches!(
            EncodedSignature::from_parts(&[0u8; 31], &[0u8; 32], 27),
            Err(SignatureError::InvalidLength { field: "r", got: 31, .. })
        ));
        assert!(matches!(
            EncodedSignature::from_parts(&[0u8; 32], &[0u8; 33], 27),
            Err(SignatureError::InvalidLength { field: "s", got: 33, .. })
        ));
        assert!(EncodedSignature::from_bytes(&[0u8; 64]).is_err());
    }

    #[test]
    fn test_flat_form() {
        let (_, _, sig) = signed();
        let encoded = sig.encoded();
        let bytes = encoded.to_bytes();
        assert_eq!(bytes[64], encoded.v);
        assert_eq!(EncodedSignature::from_bytes(&bytes).unwrap(), encoded);
    }

    #[test]
    fn test_serde_hex_components() {
        let (_, _, sig) = signed();
        let json = serde_json::to_value(sig.encoded()).unwrap();
        assert_eq!(json["r"], serde_json::json!(hex::encode(sig.r())));
        assert_eq!(json["v"], serde_json::json!(sig.recovery_id() + 27));
    }
}
