//! The set of dice both sides choose from.

use super::Dice;
use crate::error::DuelError;
use serde::{Deserialize, Serialize};

/// Fewest dice a duel can be played with
pub const MIN_DICE: usize = 3;

/// Ordered, immutable list of at least [`MIN_DICE`] dice
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Dice>", into = "Vec<Dice>")]
pub struct Catalog {
    dice: Vec<Dice>,
}

impl Catalog {
    pub fn new(dice: Vec<Dice>) -> Result<Self, DuelError> {
        if dice.len() < MIN_DICE {
            return Err(too_few(dice.len()));
        }
        Ok(Self { dice })
    }

    /// Parse one dice per entry, e.g. `["2,2,4,4,9,9", "6,8,1,1,8,6", "7,5,3,7,5,3"]`.
    /// The first unparseable entry is named in the error.
    pub fn parse<S: AsRef<str>>(entries: &[S]) -> Result<Self, DuelError> {
        if entries.len() < MIN_DICE {
            return Err(too_few(entries.len()));
        }
        let dice = entries
            .iter()
            .map(|entry| entry.as_ref().parse::<Dice>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(dice)
    }

    pub fn get(&self, index: usize) -> Option<&Dice> {
        self.dice.get(index)
    }

    pub fn len(&self) -> usize {
        self.dice.len()
    }

    /// Always false: construction requires [`MIN_DICE`] dice
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dice> {
        self.dice.iter()
    }
}

fn too_few(count: usize) -> DuelError {
    DuelError::InvalidConfiguration(format!(
        "at least {} dice configurations are required, got {}",
        MIN_DICE, count
    ))
}

impl TryFrom<Vec<Dice>> for Catalog {
    type Error = DuelError;

    fn try_from(dice: Vec<Dice>) -> Result<Self, Self::Error> {
        Self::new(dice)
    }
}

impl From<Catalog> for Vec<Dice> {
    fn from(catalog: Catalog) -> Self {
        catalog.dice
    }
}
