//! Prompts sent to the counterpart and events narrated to it.

use crate::crypto::{Commitment, SecretKey};
use crate::dice::Dice;
use crate::error::DuelError;
use crate::protocol::{DuelPhase, DuelResult, Draw, Party};
use serde::{Deserialize, Serialize};

/// Token that aborts the duel
pub const EXIT_TOKEN: &str = "X";
/// Token that asks for the probability table
pub const HELP_TOKEN: &str = "?";

/// One selectable answer of a prompt
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptOption {
    pub value: u32,
    pub label: String,
}

/// A request for exactly one choice from the counterpart.
///
/// Besides the listed options the counterpart may always answer with
/// [`EXIT_TOKEN`] or [`HELP_TOKEN`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub phase: DuelPhase,
    pub options: Vec<PromptOption>,
}

impl Prompt {
    /// Prompt offering every integer in `[0, range)`
    pub fn range(phase: DuelPhase, range: u32) -> Self {
        Self {
            phase,
            options: (0..range)
                .map(|value| PromptOption {
                    value,
                    label: value.to_string(),
                })
                .collect(),
        }
    }

    /// Interpret a raw token typed by the counterpart.
    ///
    /// Anything other than a listed value or a control token is
    /// [`DuelError::InvalidInput`].
    pub fn parse(&self, token: &str) -> Result<Selection, DuelError> {
        let token = token.trim();
        if token.eq_ignore_ascii_case(EXIT_TOKEN) {
            return Ok(Selection::Exit);
        }
        if token == HELP_TOKEN {
            return Ok(Selection::Help);
        }
        match token.parse::<u32>() {
            Ok(value) if self.options.iter().any(|o| o.value == value) => {
                Ok(Selection::Value(value))
            }
            _ => Err(DuelError::InvalidInput(format!(
                "{:?} is not an option while {}",
                token, self.phase
            ))),
        }
    }
}

/// Parsed answer to a [`Prompt`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    Value(u32),
    Help,
    Exit,
}

/// Narration of a round, emitted strictly in protocol order.
///
/// For each draw, `Committed` is always emitted before the matching `Revealed`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DuelEvent {
    /// House fixed a value in `[0, range)` and published its digest
    Committed {
        draw: Draw,
        range: u32,
        commitment: Commitment,
    },
    /// House disclosed the committed value and its key
    Revealed {
        draw: Draw,
        value: u32,
        key: SecretKey,
    },
    /// A reveal was checked against its digest
    RevealVerified { draw: Draw },
    FirstMoverChosen { first_mover: Party },
    DiceChosen {
        party: Party,
        index: usize,
        dice: Dice,
    },
    OffsetCombined {
        house_number: u32,
        counterpart_number: u32,
        offset: u32,
        range: u32,
    },
    Thrown { party: Party, face: i64 },
    Resolved {
        result: DuelResult,
        house_throw: i64,
        counterpart_throw: i64,
    },
    /// Token rejected; the same prompt follows
    InvalidInput { phase: DuelPhase, token: String },
    /// Counterpart asked for help; the same prompt follows
    HelpRequested { phase: DuelPhase },
}
