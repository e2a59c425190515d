//! Cryptographic primitives for the dice duel.
//!
//! This module provides:
//! - SecretKey and Commitment (HMAC-SHA3-256 digest) for commit-reveal
//! - FairRandomCommitment, the single-use fair draw built on them
//! - EntropySource with OS-backed and scripted implementations

mod commitment;
mod entropy;
mod fair_random;

pub use commitment::{verify_reveal, Commitment, SecretKey, KEY_LEN};
pub use entropy::{EntropySource, OsEntropy, ScriptedEntropy};
pub use fair_random::{FairRandomCommitment, Reveal};
