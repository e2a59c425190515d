//! Duel orchestration and the counterpart seam.

mod mock;
mod orchestrator;
mod traits;

pub use mock::ScriptedCounterpart;
pub use orchestrator::{DuelConfig, DuelOrchestrator, COIN_FLIP_RANGE, DEFAULT_ROLL_RANGE};
pub use traits::Counterpart;
