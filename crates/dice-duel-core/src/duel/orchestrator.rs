//! One round of the dice duel, driven end to end.

use super::traits::Counterpart;
use crate::crypto::{Commitment, EntropySource, FairRandomCommitment, OsEntropy};
use crate::dice::Catalog;
use crate::error::DuelError;
use crate::protocol::{
    combine_offset, Draw, DuelEvent, DuelId, DuelOutcome, DuelPhase, DuelReport, DuelResult,
    Party, Prompt, PromptOption, RevealedDraw, Selection,
};
use std::ops::ControlFlow;
use tracing::{debug, info};

/// Range of the first-mover coin flip
pub const COIN_FLIP_RANGE: u32 = 2;
/// Default modulus for the shared roll offset
pub const DEFAULT_ROLL_RANGE: u32 = 6;

/// Tunable rules of a duel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuelConfig {
    /// Modulus of the roll offset, independent of any dice's face count
    pub roll_range: u32,
    /// Check every reveal against its digest and void the round on mismatch
    pub verify_reveals: bool,
    /// Remove the house's dice from the counterpart's choices
    pub exclusive_dice: bool,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            roll_range: DEFAULT_ROLL_RANGE,
            verify_reveals: false,
            exclusive_dice: false,
        }
    }
}

/// Per-round state. Created when a round starts and dropped when it ends.
#[derive(Debug)]
struct DuelState {
    id: DuelId,
    phase: DuelPhase,
    coin_flip: Option<RevealedDraw>,
    counterpart_guess: Option<u32>,
    first_mover: Option<Party>,
    house_dice: Option<usize>,
    counterpart_dice: Option<usize>,
    roll: Option<RevealedDraw>,
    counterpart_number: Option<u32>,
    offset: Option<u32>,
}

impl DuelState {
    fn new() -> Self {
        Self {
            id: DuelId::new(),
            phase: DuelPhase::SelectingFirstMover,
            coin_flip: None,
            counterpart_guess: None,
            first_mover: None,
            house_dice: None,
            counterpart_dice: None,
            roll: None,
            counterpart_number: None,
            offset: None,
        }
    }

    fn advance(&mut self, phase: DuelPhase) {
        debug!("Duel {}: {} -> {}", self.id, self.phase, phase);
        self.phase = phase;
    }

    fn into_report(
        self,
        house_throw: i64,
        counterpart_throw: i64,
        result: DuelResult,
    ) -> Result<DuelReport, DuelError> {
        let incomplete = || DuelError::StateViolation("round resolved before every phase ran");
        Ok(DuelReport {
            duel_id: self.id,
            coin_flip: self.coin_flip.ok_or_else(incomplete)?,
            counterpart_guess: self.counterpart_guess.ok_or_else(incomplete)?,
            first_mover: self.first_mover.ok_or_else(incomplete)?,
            house_dice: self.house_dice.ok_or_else(incomplete)?,
            counterpart_dice: self.counterpart_dice.ok_or_else(incomplete)?,
            roll: self.roll.ok_or_else(incomplete)?,
            counterpart_number: self.counterpart_number.ok_or_else(incomplete)?,
            offset: self.offset.ok_or_else(incomplete)?,
            house_throw,
            counterpart_throw,
            result,
        })
    }
}

/// Drives rounds of the duel between the house and a [`Counterpart`].
///
/// The state machine runs `SelectingFirstMover -> SelectingDice ->
/// SelectingRollOffset -> Resolved`. Invalid tokens and help requests
/// re-prompt the current state without drawing again; the exit token aborts
/// the round without a result.
pub struct DuelOrchestrator<E = OsEntropy> {
    catalog: Catalog,
    config: DuelConfig,
    entropy: E,
}

impl DuelOrchestrator<OsEntropy> {
    /// Orchestrator drawing from the operating-system CSPRNG
    pub fn new(catalog: Catalog, config: DuelConfig) -> Result<Self, DuelError> {
        Self::with_entropy(catalog, config, OsEntropy)
    }
}

impl<E: EntropySource> DuelOrchestrator<E> {
    /// Orchestrator drawing from `entropy`
    pub fn with_entropy(
        catalog: Catalog,
        config: DuelConfig,
        entropy: E,
    ) -> Result<Self, DuelError> {
        if config.roll_range == 0 {
            return Err(DuelError::InvalidConfiguration(
                "roll range must be positive".into(),
            ));
        }
        if u32::try_from(catalog.len()).is_err() {
            return Err(DuelError::InvalidConfiguration("too many dice".into()));
        }
        Ok(Self {
            catalog,
            config,
            entropy,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &DuelConfig {
        &self.config
    }

    /// Play one round to the end or until the counterpart exits
    pub fn play<C: Counterpart + ?Sized>(
        &mut self,
        counterpart: &mut C,
    ) -> Result<DuelOutcome, DuelError> {
        let mut state = DuelState::new();
        info!(
            "Duel {} started with {} dice, roll range {}",
            state.id,
            self.catalog.len(),
            self.config.roll_range
        );

        if self.select_first_mover(&mut state, counterpart)?.is_break()
            || self.select_dice(&mut state, counterpart)?.is_break()
            || self.select_roll_offset(&mut state, counterpart)?.is_break()
        {
            info!("Duel {} aborted by counterpart during {}", state.id, state.phase);
            return Ok(DuelOutcome::Aborted { phase: state.phase });
        }

        let report = self.resolve(state, counterpart)?;
        info!("Duel {} resolved: {}", report.duel_id, report.result);
        Ok(DuelOutcome::Resolved(report))
    }

    fn select_first_mover<C: Counterpart + ?Sized>(
        &mut self,
        state: &mut DuelState,
        counterpart: &mut C,
    ) -> Result<ControlFlow<()>, DuelError> {
        let mut coin = FairRandomCommitment::new();
        let commitment = self.commit(&mut coin, Draw::CoinFlip, COIN_FLIP_RANGE, counterpart)?;

        let prompt = Prompt::range(DuelPhase::SelectingFirstMover, COIN_FLIP_RANGE);
        let Some(guess) = ask(&prompt, counterpart)? else {
            return Ok(ControlFlow::Break(()));
        };

        let coin_flip = self.reveal(coin, commitment, Draw::CoinFlip, counterpart)?;
        let first_mover = if guess != coin_flip.value {
            Party::Counterpart
        } else {
            Party::House
        };
        counterpart.notify(&DuelEvent::FirstMoverChosen { first_mover })?;

        state.coin_flip = Some(coin_flip);
        state.counterpart_guess = Some(guess);
        state.first_mover = Some(first_mover);
        state.advance(DuelPhase::SelectingDice);
        Ok(ControlFlow::Continue(()))
    }

    fn select_dice<C: Counterpart + ?Sized>(
        &mut self,
        state: &mut DuelState,
        counterpart: &mut C,
    ) -> Result<ControlFlow<()>, DuelError> {
        // No commitment: this draw is never compared against a counterpart guess
        let house = self.entropy.uniform(self.catalog.len() as u32)? as usize;
        let house_dice = self
            .catalog
            .get(house)
            .ok_or(DuelError::StateViolation("house dice index outside catalog"))?;
        counterpart.notify(&DuelEvent::DiceChosen {
            party: Party::House,
            index: house,
            dice: house_dice.clone(),
        })?;

        let prompt = Prompt {
            phase: DuelPhase::SelectingDice,
            options: self
                .catalog
                .iter()
                .enumerate()
                .filter(|(index, _)| !self.config.exclusive_dice || *index != house)
                .map(|(index, dice)| PromptOption {
                    value: index as u32,
                    label: dice.to_string(),
                })
                .collect(),
        };
        let Some(choice) = ask(&prompt, counterpart)? else {
            return Ok(ControlFlow::Break(()));
        };
        let index = choice as usize;
        let dice = self
            .catalog
            .get(index)
            .ok_or(DuelError::StateViolation("prompt offered a dice outside the catalog"))?;
        counterpart.notify(&DuelEvent::DiceChosen {
            party: Party::Counterpart,
            index,
            dice: dice.clone(),
        })?;

        state.house_dice = Some(house);
        state.counterpart_dice = Some(index);
        state.advance(DuelPhase::SelectingRollOffset);
        Ok(ControlFlow::Continue(()))
    }

    fn select_roll_offset<C: Counterpart + ?Sized>(
        &mut self,
        state: &mut DuelState,
        counterpart: &mut C,
    ) -> Result<ControlFlow<()>, DuelError> {
        let range = self.config.roll_range;
        let mut roll = FairRandomCommitment::new();
        let commitment = self.commit(&mut roll, Draw::RollOffset, range, counterpart)?;

        let prompt = Prompt::range(DuelPhase::SelectingRollOffset, range);
        let Some(counterpart_number) = ask(&prompt, counterpart)? else {
            return Ok(ControlFlow::Break(()));
        };

        let revealed = self.reveal(roll, commitment, Draw::RollOffset, counterpart)?;
        let offset = combine_offset(revealed.value, counterpart_number, range);
        counterpart.notify(&DuelEvent::OffsetCombined {
            house_number: revealed.value,
            counterpart_number,
            offset,
            range,
        })?;

        state.roll = Some(revealed);
        state.counterpart_number = Some(counterpart_number);
        state.offset = Some(offset);
        state.advance(DuelPhase::Resolved);
        Ok(ControlFlow::Continue(()))
    }

    fn resolve<C: Counterpart + ?Sized>(
        &self,
        state: DuelState,
        counterpart: &mut C,
    ) -> Result<DuelReport, DuelError> {
        let (Some(house), Some(theirs), Some(offset)) =
            (state.house_dice, state.counterpart_dice, state.offset)
        else {
            return Err(DuelError::StateViolation(
                "resolving before dice and offset are chosen",
            ));
        };
        let dice = |index: usize| {
            self.catalog
                .get(index)
                .ok_or(DuelError::StateViolation("dice index outside catalog"))
        };

        // Both dice are read at the same offset
        let house_throw = dice(house)?.roll(u64::from(offset));
        counterpart.notify(&DuelEvent::Thrown {
            party: Party::House,
            face: house_throw,
        })?;
        let counterpart_throw = dice(theirs)?.roll(u64::from(offset));
        counterpart.notify(&DuelEvent::Thrown {
            party: Party::Counterpart,
            face: counterpart_throw,
        })?;

        let result = DuelResult::from_throws(house_throw, counterpart_throw);
        counterpart.notify(&DuelEvent::Resolved {
            result,
            house_throw,
            counterpart_throw,
        })?;
        state.into_report(house_throw, counterpart_throw, result)
    }

    /// Commit to a fresh draw and publish its digest before anything else
    fn commit<C: Counterpart + ?Sized>(
        &mut self,
        fair: &mut FairRandomCommitment,
        draw: Draw,
        range: u32,
        counterpart: &mut C,
    ) -> Result<Commitment, DuelError> {
        let commitment = fair.commit_with(range, &mut self.entropy)?;
        debug!("Committed {:?} over 0..{}: {}", draw, range, commitment);
        counterpart.notify(&DuelEvent::Committed {
            draw,
            range,
            commitment,
        })?;
        Ok(commitment)
    }

    /// Reveal a draw whose digest was already published
    fn reveal<C: Counterpart + ?Sized>(
        &self,
        mut fair: FairRandomCommitment,
        commitment: Commitment,
        draw: Draw,
        counterpart: &mut C,
    ) -> Result<RevealedDraw, DuelError> {
        let range = fair
            .range()
            .ok_or(DuelError::StateViolation("reveal called before commit"))?;
        let reveal = fair.reveal()?;
        counterpart.notify(&DuelEvent::Revealed {
            draw,
            value: reveal.value,
            key: reveal.key.clone(),
        })?;

        if self.config.verify_reveals {
            reveal.verify(&commitment)?;
            counterpart.notify(&DuelEvent::RevealVerified { draw })?;
        }
        debug!("Revealed {:?}: {}", draw, reveal.value);

        Ok(RevealedDraw {
            range,
            commitment,
            value: reveal.value,
            key: reveal.key,
        })
    }
}

/// Prompt until the counterpart gives a valid value (`Some`) or exits (`None`)
fn ask<C: Counterpart + ?Sized>(
    prompt: &Prompt,
    counterpart: &mut C,
) -> Result<Option<u32>, DuelError> {
    loop {
        let token = counterpart.request(prompt)?;
        match prompt.parse(&token) {
            Ok(Selection::Value(value)) => return Ok(Some(value)),
            Ok(Selection::Exit) => return Ok(None),
            Ok(Selection::Help) => {
                counterpart.notify(&DuelEvent::HelpRequested {
                    phase: prompt.phase,
                })?;
            }
            Err(e) if e.is_recoverable() => {
                debug!("{}", e);
                counterpart.notify(&DuelEvent::InvalidInput {
                    phase: prompt.phase,
                    token: token.trim().to_string(),
                })?;
            }
            Err(e) => return Err(e),
        }
    }
}
