//! Randomness sources for the house's draws.

use super::commitment::{SecretKey, KEY_LEN};
use crate::error::DuelError;
use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use sha3::{Digest, Sha3_256};
use std::collections::VecDeque;

/// Source of secret keys and uniform draws for the house.
///
/// Production code must use a cryptographically secure source: a predictable
/// draw lets the counterpart compute the house's value before the reveal.
pub trait EntropySource {
    /// Draw a fresh 256-bit secret key
    fn secret_key(&mut self) -> Result<SecretKey, DuelError>;

    /// Draw an unbiased integer in `[0, range)`. `range` is never zero.
    fn uniform(&mut self, range: u32) -> Result<u32, DuelError>;
}

impl<E: EntropySource + ?Sized> EntropySource for &mut E {
    fn secret_key(&mut self) -> Result<SecretKey, DuelError> {
        (**self).secret_key()
    }

    fn uniform(&mut self, range: u32) -> Result<u32, DuelError> {
        (**self).uniform(range)
    }
}

/// Operating-system CSPRNG
#[derive(Clone, Copy, Debug, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn secret_key(&mut self) -> Result<SecretKey, DuelError> {
        let mut bytes = [0u8; KEY_LEN];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| DuelError::Entropy(e.to_string()))?;
        Ok(SecretKey::from_bytes(bytes))
    }

    fn uniform(&mut self, range: u32) -> Result<u32, DuelError> {
        if range == 0 {
            return Err(DuelError::InvalidConfiguration(
                "uniform range must be positive".into(),
            ));
        }
        // gen_range rejection-samples, so ranges that do not divide 2^32 stay unbiased
        Ok(OsRng.gen_range(0..range))
    }
}

/// Replays a fixed list of draws, for tests and reproducible demos.
///
/// Keys are derived from an internal counter, so every key differs.
#[derive(Clone, Debug, Default)]
pub struct ScriptedEntropy {
    draws: VecDeque<u32>,
    keys_issued: u64,
}

impl ScriptedEntropy {
    /// Create a source that returns `draws` in order from `uniform`
    pub fn new(draws: impl IntoIterator<Item = u32>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            keys_issued: 0,
        }
    }

    /// Draws not yet consumed
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }

    /// Number of keys handed out so far
    pub fn keys_issued(&self) -> u64 {
        self.keys_issued
    }
}

impl EntropySource for ScriptedEntropy {
    fn secret_key(&mut self) -> Result<SecretKey, DuelError> {
        self.keys_issued += 1;
        let mut hasher = Sha3_256::new();
        hasher.update(b"scripted-entropy");
        hasher.update(self.keys_issued.to_be_bytes());
        Ok(SecretKey::from_bytes(hasher.finalize().into()))
    }

    fn uniform(&mut self, range: u32) -> Result<u32, DuelError> {
        let value = self
            .draws
            .pop_front()
            .ok_or_else(|| DuelError::Entropy("scripted draws exhausted".into()))?;
        if value >= range {
            return Err(DuelError::Entropy(format!(
                "scripted draw {} outside [0, {})",
                value, range
            )));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_os_entropy_stays_in_range() {
        let mut entropy = OsEntropy;
        for range in [1u32, 2, 3, 6, 7, 1000] {
            for _ in 0..200 {
                assert!(entropy.uniform(range).unwrap() < range);
            }
        }
    }

    #[test]
    fn test_os_entropy_rejects_empty_range() {
        assert!(matches!(
            OsEntropy.uniform(0),
            Err(DuelError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_os_entropy_keys_are_distinct() {
        let mut entropy = OsEntropy;
        let keys: HashSet<SecretKey> = (0..256).map(|_| entropy.secret_key().unwrap()).collect();
        assert_eq!(keys.len(), 256);
    }

    #[test]
    fn test_scripted_entropy_replays_in_order() {
        let mut entropy = ScriptedEntropy::new([0, 1, 3]);
        assert_eq!(entropy.uniform(2).unwrap(), 0);
        assert_eq!(entropy.uniform(3).unwrap(), 1);
        assert_eq!(entropy.remaining(), 1);
        assert_eq!(entropy.uniform(6).unwrap(), 3);
        assert!(matches!(entropy.uniform(6), Err(DuelError::Entropy(_))));
    }

    #[test]
    fn test_scripted_entropy_rejects_out_of_range_draw() {
        let mut entropy = ScriptedEntropy::new([5]);
        assert!(matches!(entropy.uniform(2), Err(DuelError::Entropy(_))));
    }

    #[test]
    fn test_scripted_keys_differ() {
        let mut entropy = ScriptedEntropy::default();
        let a = entropy.secret_key().unwrap();
        let b = entropy.secret_key().unwrap();
        assert_ne!(a, b);
        assert_eq!(entropy.keys_issued(), 2);
    }
}
