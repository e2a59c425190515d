//! Protocol types, messages, and round transcripts.

mod messages;
mod report;
mod types;

pub use messages::{DuelEvent, Prompt, PromptOption, Selection, EXIT_TOKEN, HELP_TOKEN};
pub use report::{combine_offset, DuelOutcome, DuelReport, RevealedDraw};
pub use types::{DuelId, DuelPhase, DuelResult, Draw, Party};
