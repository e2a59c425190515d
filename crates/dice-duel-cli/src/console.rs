//! Counterpart that plays through a text console.

use crate::help::display_probabilities;
use dice_duel_core::protocol::{Draw, DuelPhase, Prompt, EXIT_TOKEN, HELP_TOKEN};
use dice_duel_core::{Catalog, Counterpart, DuelError, DuelEvent, Party};
use std::io::{self, BufRead, Write};

/// Reads selections from `input` and narrates the round to `output`
pub struct ConsoleCounterpart<R, W> {
    input: R,
    output: W,
    catalog: Catalog,
}

impl<R: BufRead, W: Write> ConsoleCounterpart<R, W> {
    pub fn new(input: R, output: W, catalog: Catalog) -> Self {
        Self {
            input,
            output,
            catalog,
        }
    }

    fn print_menu(&mut self, prompt: &Prompt) -> io::Result<()> {
        match prompt.phase {
            DuelPhase::SelectingFirstMover => writeln!(self.output, "Try to guess my selection.")?,
            DuelPhase::SelectingDice => writeln!(self.output, "Choose your dice:")?,
            DuelPhase::SelectingRollOffset => {
                writeln!(self.output, "Add your number modulo {}.", prompt.options.len())?
            }
            DuelPhase::Resolved => {}
        }
        for option in &prompt.options {
            writeln!(self.output, "{} - {}", option.value, option.label)?;
        }
        writeln!(self.output, "{} - exit", EXIT_TOKEN)?;
        writeln!(self.output, "{} - help", HELP_TOKEN)?;
        write!(self.output, "Your selection: ")?;
        self.output.flush()
    }

    fn narrate(&mut self, event: &DuelEvent) -> io::Result<()> {
        let out = &mut self.output;
        match event {
            DuelEvent::Committed {
                draw,
                range,
                commitment,
            } => {
                let intro = match draw {
                    Draw::CoinFlip => "Let's determine who makes the first move.",
                    Draw::RollOffset => "It's time for my throw.",
                };
                writeln!(out, "{}", intro)?;
                writeln!(
                    out,
                    "I selected a random value in the range 0..{} (HMAC={}).",
                    range.saturating_sub(1),
                    commitment
                )
            }
            DuelEvent::Revealed { draw, value, key } => match draw {
                Draw::CoinFlip => writeln!(out, "My selection: {} (KEY={}).", value, key),
                Draw::RollOffset => writeln!(out, "My number is {} (KEY={}).", value, key),
            },
            DuelEvent::RevealVerified { .. } => {
                writeln!(out, "The key reproduces the HMAC shown earlier.")
            }
            DuelEvent::FirstMoverChosen { first_mover } => match first_mover {
                Party::Counterpart => writeln!(out, "You make the first move."),
                Party::House => writeln!(out, "I make the first move."),
            },
            DuelEvent::DiceChosen { party, dice, .. } => match party {
                Party::House => writeln!(out, "I choose the {} dice.", dice),
                Party::Counterpart => writeln!(out, "You choose the {} dice.", dice),
            },
            DuelEvent::OffsetCombined {
                house_number,
                counterpart_number,
                offset,
                range,
            } => writeln!(
                out,
                "The result is {} + {} = {} (mod {}).",
                house_number, counterpart_number, offset, range
            ),
            DuelEvent::Thrown { party, face } => match party {
                Party::House => writeln!(out, "My throw is {}.", face),
                Party::Counterpart => writeln!(out, "Your throw is {}.", face),
            },
            DuelEvent::Resolved {
                result,
                house_throw,
                counterpart_throw,
            } => match result.winner() {
                Some(Party::Counterpart) => {
                    writeln!(out, "You win ({} > {})!", counterpart_throw, house_throw)
                }
                Some(Party::House) => {
                    writeln!(out, "I win ({} > {})!", house_throw, counterpart_throw)
                }
                None => writeln!(out, "It's a tie ({} = {})!", counterpart_throw, house_throw),
            },
            DuelEvent::InvalidInput { .. } => writeln!(out, "Invalid selection. Try again."),
            DuelEvent::HelpRequested { .. } => display_probabilities(&self.catalog, out),
        }
    }
}

impl<R: BufRead, W: Write> Counterpart for ConsoleCounterpart<R, W> {
    fn request(&mut self, prompt: &Prompt) -> Result<String, DuelError> {
        self.print_menu(prompt)?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(DuelError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before a selection was made",
            )));
        }
        Ok(line)
    }

    fn notify(&mut self, event: &DuelEvent) -> Result<(), DuelError> {
        self.narrate(event)?;
        Ok(())
    }
}
