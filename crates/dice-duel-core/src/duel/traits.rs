//! The counterpart seam of the orchestrator.

use crate::error::DuelError;
use crate::protocol::{DuelEvent, Prompt};

/// The side of the duel that answers prompts and watches the narration.
///
/// Calls are synchronous: the orchestrator blocks in [`Counterpart::request`]
/// until a token is available. Events arrive in protocol order.
pub trait Counterpart {
    /// Ask for one raw token answering `prompt`
    fn request(&mut self, prompt: &Prompt) -> Result<String, DuelError>;

    /// Report progress of the round
    fn notify(&mut self, event: &DuelEvent) -> Result<(), DuelError>;
}

impl<C: Counterpart + ?Sized> Counterpart for &mut C {
    fn request(&mut self, prompt: &Prompt) -> Result<String, DuelError> {
        (**self).request(prompt)
    }

    fn notify(&mut self, event: &DuelEvent) -> Result<(), DuelError> {
        (**self).notify(event)
    }
}
