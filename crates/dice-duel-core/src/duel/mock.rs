//! Scripted counterpart for testing.

use super::traits::Counterpart;
use crate::error::DuelError;
use crate::protocol::{DuelEvent, Prompt};
use std::collections::VecDeque;
use std::io;

/// Answers prompts from a fixed token list and records everything it sees
#[derive(Clone, Debug, Default)]
pub struct ScriptedCounterpart {
    tokens: VecDeque<String>,
    prompts: Vec<Prompt>,
    events: Vec<DuelEvent>,
}

impl ScriptedCounterpart {
    /// Create a counterpart that answers with `tokens` in order
    pub fn new<S: Into<String>>(tokens: impl IntoIterator<Item = S>) -> Self {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Every prompt received, in order
    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    /// Every event received, in order
    pub fn events(&self) -> &[DuelEvent] {
        &self.events
    }

    /// Tokens not yet consumed
    pub fn remaining(&self) -> usize {
        self.tokens.len()
    }
}

impl Counterpart for ScriptedCounterpart {
    fn request(&mut self, prompt: &Prompt) -> Result<String, DuelError> {
        self.prompts.push(prompt.clone());
        self.tokens.pop_front().ok_or_else(|| {
            DuelError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "scripted tokens exhausted",
            ))
        })
    }

    fn notify(&mut self, event: &DuelEvent) -> Result<(), DuelError> {
        self.events.push(event.clone());
        Ok(())
    }
}
