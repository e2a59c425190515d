//! Secret key and keyed digest for the commit-reveal scheme.

use crate::error::DuelError;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha3::Sha3_256;
use std::fmt;
use std::str::FromStr;

/// Length in bytes of both the secret key and the digest
pub const KEY_LEN: usize = 32;

type HmacSha3_256 = Hmac<Sha3_256>;

/// 256-bit secret key, revealed once after the counterpart has answered
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecretKey(#[serde(with = "hex_bytes")] [u8; KEY_LEN]);

impl SecretKey {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for SecretKey {
    type Err = DuelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_hex(s, "key").map(Self)
    }
}

/// Commitment = HMAC-SHA3-256(hex(key), decimal(value))
///
/// The MAC key is the lowercase hex text of the secret key, the same string
/// shown to the counterpart on reveal, so any HMAC tool fed that text
/// reproduces the digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(#[serde(with = "hex_bytes")] [u8; KEY_LEN]);

impl Commitment {
    /// Compute the commitment to `value` under `key`
    pub fn new(value: u32, key: &SecretKey) -> Self {
        Self(keyed_mac(value, key).finalize().into_bytes().into())
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Verify that the given value and key produce this commitment.
    /// The comparison runs in constant time.
    pub fn verify(&self, value: u32, key: &SecretKey) -> bool {
        keyed_mac(value, key).verify_slice(&self.0).is_ok()
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for Commitment {
    type Err = DuelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_hex(s, "digest").map(Self)
    }
}

/// Check a revealed `(value, key)` pair against a previously published digest.
///
/// A mismatch means the house changed its draw after committing, so the
/// round that used it must be voided.
pub fn verify_reveal(
    commitment: &Commitment,
    value: u32,
    key: &SecretKey,
) -> Result<(), DuelError> {
    if commitment.verify(value, key) {
        Ok(())
    } else {
        Err(DuelError::FairnessViolation {
            digest: commitment.to_string(),
            value,
        })
    }
}

fn keyed_mac(value: u32, key: &SecretKey) -> HmacSha3_256 {
    let mut mac = HmacSha3_256::new_from_slice(key.to_string().as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(value.to_string().as_bytes());
    mac
}

fn decode_hex(s: &str, what: &str) -> Result<[u8; KEY_LEN], DuelError> {
    let bytes = hex::decode(s.trim())
        .map_err(|e| DuelError::InvalidInput(format!("{} is not valid hex: {}", what, e)))?;
    bytes.try_into().map_err(|bytes: Vec<u8>| {
        DuelError::InvalidInput(format!(
            "{} must be {} bytes, got {}",
            what,
            KEY_LEN,
            bytes.len()
        ))
    })
}

mod hex_bytes {
    use super::KEY_LEN;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; KEY_LEN], s: S) -> Result<S::Ok, S::Error> {
        hex::encode(bytes).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; KEY_LEN], D::Error> {
        let hex_str = String::deserialize(d)?;
        let bytes = hex::decode(&hex_str).map_err(serde::de::Error::custom)?;
        if bytes.len() != KEY_LEN {
            return Err(serde::de::Error::custom("expected 32 bytes"));
        }
        let mut arr = [0u8; KEY_LEN];
        arr.copy_from_slice(&bytes);
        Ok(arr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> SecretKey {
        SecretKey::from_bytes([byte; KEY_LEN])
    }

    #[test]
    fn test_commitment_verification() {
        let key = key(7);
        let commitment = Commitment::new(4, &key);

        assert!(commitment.verify(4, &key));
        assert!(verify_reveal(&commitment, 4, &key).is_ok());
    }

    #[test]
    fn test_different_values_different_commitments() {
        let key = key(1);
        assert_ne!(Commitment::new(0, &key), Commitment::new(1, &key));
    }

    #[test]
    fn test_different_keys_different_commitments() {
        assert_ne!(Commitment::new(3, &key(1)), Commitment::new(3, &key(2)));
    }

    #[test]
    fn test_wrong_value_is_fairness_violation() {
        let key = key(9);
        let commitment = Commitment::new(2, &key);

        match verify_reveal(&commitment, 5, &key) {
            Err(DuelError::FairnessViolation { value, digest }) => {
                assert_eq!(value, 5);
                assert_eq!(digest, commitment.to_string());
            }
            other => panic!("expected fairness violation, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_key_fails_verification() {
        let commitment = Commitment::new(2, &key(1));
        assert!(!commitment.verify(2, &key(2)));
    }

    #[test]
    fn test_digest_is_hmac_sha3_over_decimal_string() {
        // HMAC-SHA3-256 keyed by the hex text of the key over b"42"
        let key = key(0x0b);
        let mut mac = HmacSha3_256::new_from_slice("0b".repeat(KEY_LEN).as_bytes()).unwrap();
        mac.update(b"42");
        let expected: [u8; KEY_LEN] = mac.finalize().into_bytes().into();

        assert_eq!(Commitment::new(42, &key).as_bytes(), &expected);
    }

    #[test]
    fn test_digest_matches_external_hmac_tool() {
        // Node: crypto.createHmac("sha3-256", "ab".repeat(32)).update("3").digest("hex")
        let commitment = Commitment::new(3, &key(0xab));
        assert_eq!(
            commitment.to_string(),
            "fb8baeb776941a94afb1e5f61eb299ae8024e6d27fa441c4ffbebadffbcf1191"
        );
    }

    #[test]
    fn test_hex_round_trip_through_from_str() {
        let key = key(0xab);
        let commitment = Commitment::new(1, &key);

        let parsed_key: SecretKey = key.to_string().parse().unwrap();
        let parsed_commitment: Commitment = commitment.to_string().parse().unwrap();

        assert_eq!(parsed_key, key);
        assert_eq!(parsed_commitment, commitment);
    }

    #[test]
    fn test_from_str_rejects_short_or_non_hex() {
        assert!(matches!(
            "abcd".parse::<SecretKey>(),
            Err(DuelError::InvalidInput(_))
        ));
        assert!(matches!(
            "zz".parse::<Commitment>(),
            Err(DuelError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_serializes_as_lowercase_hex() {
        let key = key(0xff);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{}\"", "ff".repeat(KEY_LEN)));

        let back: SecretKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
