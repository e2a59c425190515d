//! Single-use fair random draw with commit-reveal.

use super::commitment::{Commitment, SecretKey};
use super::entropy::{EntropySource, OsEntropy};
use crate::error::DuelError;
use serde::{Deserialize, Serialize};

/// Value and key disclosed by [`FairRandomCommitment::reveal`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reveal {
    pub value: u32,
    pub key: SecretKey,
}

impl Reveal {
    /// Check this reveal against the digest published before it
    pub fn verify(&self, commitment: &Commitment) -> Result<(), DuelError> {
        super::verify_reveal(commitment, self.value, &self.key)
    }
}

#[derive(Debug)]
enum DrawState {
    Fresh,
    Committed {
        range: u32,
        commitment: Commitment,
        reveal: Reveal,
    },
    Revealed,
}

/// A uniformly random integer in `[0, range)` that the house commits to
/// before the counterpart acts, and discloses afterwards.
///
/// Each instance backs exactly one draw: `commit` once, `reveal` once. Any
/// other call order is a [`DuelError::StateViolation`].
#[derive(Debug)]
pub struct FairRandomCommitment {
    state: DrawState,
}

impl Default for FairRandomCommitment {
    fn default() -> Self {
        Self::new()
    }
}

impl FairRandomCommitment {
    pub fn new() -> Self {
        Self {
            state: DrawState::Fresh,
        }
    }

    /// Draw from the operating-system CSPRNG and return the digest
    pub fn commit(&mut self, range: u32) -> Result<Commitment, DuelError> {
        self.commit_with(range, &mut OsEntropy)
    }

    /// Draw a key and a value from `entropy` and return only the digest
    pub fn commit_with<E: EntropySource + ?Sized>(
        &mut self,
        range: u32,
        entropy: &mut E,
    ) -> Result<Commitment, DuelError> {
        match self.state {
            DrawState::Fresh => {}
            DrawState::Committed { .. } => {
                return Err(DuelError::StateViolation("commit called twice before reveal"))
            }
            DrawState::Revealed => {
                return Err(DuelError::StateViolation("commitment reused after reveal"))
            }
        }
        if range == 0 {
            return Err(DuelError::InvalidConfiguration(
                "commitment range must be positive".into(),
            ));
        }

        let key = entropy.secret_key()?;
        let value = entropy.uniform(range)?;
        let commitment = Commitment::new(value, &key);

        self.state = DrawState::Committed {
            range,
            commitment,
            reveal: Reveal { value, key },
        };
        Ok(commitment)
    }

    /// Disclose the committed value and key. Allowed exactly once.
    pub fn reveal(&mut self) -> Result<Reveal, DuelError> {
        match std::mem::replace(&mut self.state, DrawState::Revealed) {
            DrawState::Committed { reveal, .. } => Ok(reveal),
            DrawState::Fresh => {
                self.state = DrawState::Fresh;
                Err(DuelError::StateViolation("reveal called before commit"))
            }
            DrawState::Revealed => Err(DuelError::StateViolation("key already revealed")),
        }
    }

    /// Range of the pending draw, if committed and not yet revealed
    pub fn range(&self) -> Option<u32> {
        match &self.state {
            DrawState::Committed { range, .. } => Some(*range),
            _ => None,
        }
    }

    /// Published digest of the pending draw
    pub fn commitment(&self) -> Option<&Commitment> {
        match &self.state {
            DrawState::Committed { commitment, .. } => Some(commitment),
            _ => None,
        }
    }
}
