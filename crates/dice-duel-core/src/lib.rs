//! Dice Duel Core Library
//!
//! This crate provides the fair commit-reveal draw, dice and catalog types,
//! and the orchestrator that plays one round of a non-transitive dice duel
//! between the house and a distrusting counterpart.

pub mod crypto;
pub mod dice;
pub mod duel;
pub mod error;
pub mod protocol;

pub use crypto::{Commitment, EntropySource, FairRandomCommitment, OsEntropy, SecretKey};
pub use dice::{Catalog, Dice};
pub use duel::{Counterpart, DuelConfig, DuelOrchestrator};
pub use error::DuelError;
pub use protocol::{DuelEvent, DuelOutcome, DuelReport, DuelResult, Party};
