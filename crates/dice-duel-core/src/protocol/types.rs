//! Protocol types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique duel identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DuelId(Uuid);

impl DuelId {
    /// Create a new random duel ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DuelId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for DuelId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl fmt::Debug for DuelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DuelId({})", self.0)
    }
}

impl fmt::Display for DuelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two sides of a duel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    /// The side that owns the randomness source
    House,
    /// The distrusting side answering prompts
    Counterpart,
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::House => write!(f, "house"),
            Party::Counterpart => write!(f, "counterpart"),
        }
    }
}

/// Outcome of comparing the two throws
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelResult {
    Win(Party),
    Tie,
}

impl DuelResult {
    /// Higher throw wins; equal throws tie
    pub fn from_throws(house_throw: i64, counterpart_throw: i64) -> Self {
        match counterpart_throw.cmp(&house_throw) {
            std::cmp::Ordering::Greater => DuelResult::Win(Party::Counterpart),
            std::cmp::Ordering::Less => DuelResult::Win(Party::House),
            std::cmp::Ordering::Equal => DuelResult::Tie,
        }
    }

    /// `None` on a tie
    pub fn winner(&self) -> Option<Party> {
        match self {
            DuelResult::Win(party) => Some(*party),
            DuelResult::Tie => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DuelResult::Win(Party::House) => "house wins",
            DuelResult::Win(Party::Counterpart) => "counterpart wins",
            DuelResult::Tie => "tie",
        }
    }
}

impl fmt::Display for DuelResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// States of a round, in protocol order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelPhase {
    SelectingFirstMover,
    SelectingDice,
    SelectingRollOffset,
    Resolved,
}

impl fmt::Display for DuelPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DuelPhase::SelectingFirstMover => "selecting first mover",
            DuelPhase::SelectingDice => "selecting dice",
            DuelPhase::SelectingRollOffset => "selecting roll offset",
            DuelPhase::Resolved => "resolved",
        };
        write!(f, "{}", name)
    }
}

/// Which of the two committed draws of a round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Draw {
    /// 1-bit draw deciding who moves first
    CoinFlip,
    /// House's share of the shared roll offset
    RollOffset,
}
