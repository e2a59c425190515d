//! Transcript of a finished round.

use crate::crypto::{verify_reveal, Commitment, SecretKey};
use crate::dice::Dice;
use crate::error::DuelError;
use crate::protocol::{DuelId, DuelPhase, DuelResult, Party};
use serde::{Deserialize, Serialize};

/// A committed draw after its reveal
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedDraw {
    pub range: u32,
    pub commitment: Commitment,
    pub value: u32,
    pub key: SecretKey,
}

impl RevealedDraw {
    pub fn verify(&self) -> Result<(), DuelError> {
        if self.value >= self.range {
            return Err(DuelError::FairnessViolation {
                digest: self.commitment.to_string(),
                value: self.value,
            });
        }
        verify_reveal(&self.commitment, self.value, &self.key)
    }
}

/// Everything needed to audit a resolved round offline
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelReport {
    pub duel_id: DuelId,
    pub coin_flip: RevealedDraw,
    pub counterpart_guess: u32,
    pub first_mover: Party,
    pub house_dice: usize,
    pub counterpart_dice: usize,
    pub roll: RevealedDraw,
    pub counterpart_number: u32,
    pub offset: u32,
    pub house_throw: i64,
    pub counterpart_throw: i64,
    pub result: DuelResult,
}

impl DuelReport {
    /// Re-check both draws and every value derived from them.
    ///
    /// `dice` must be the catalog the round was played with, in order.
    pub fn verify(&self, dice: &[Dice]) -> Result<(), DuelError> {
        self.coin_flip.verify()?;
        self.roll.verify()?;

        let mismatch = |field: &'static str| DuelError::TamperedReport {
            duel_id: self.duel_id.to_string(),
            field,
        };

        let expected_first = if self.counterpart_guess != self.coin_flip.value {
            Party::Counterpart
        } else {
            Party::House
        };
        if expected_first != self.first_mover {
            return Err(mismatch("first mover"));
        }
        if self.counterpart_number >= self.roll.range {
            return Err(mismatch("counterpart number out of range"));
        }
        if combine_offset(self.roll.value, self.counterpart_number, self.roll.range) != self.offset {
            return Err(mismatch("offset"));
        }

        let house = dice.get(self.house_dice).ok_or_else(|| mismatch("house dice"))?;
        let counterpart = dice
            .get(self.counterpart_dice)
            .ok_or_else(|| mismatch("counterpart dice"))?;
        let offset = u64::from(self.offset);
        if house.roll(offset) != self.house_throw || counterpart.roll(offset) != self.counterpart_throw
        {
            return Err(mismatch("throws"));
        }
        if DuelResult::from_throws(self.house_throw, self.counterpart_throw) != self.result {
            return Err(mismatch("result"));
        }
        Ok(())
    }
}

/// `(house + counterpart) mod range`, without overflow
pub fn combine_offset(house_number: u32, counterpart_number: u32, range: u32) -> u32 {
    ((u64::from(house_number) + u64::from(counterpart_number)) % u64::from(range)) as u32
}

/// How a duel ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DuelOutcome {
    /// The round reached a result
    Resolved(DuelReport),
    /// The counterpart exited; no result exists
    Aborted { phase: DuelPhase },
}

impl DuelOutcome {
    pub fn report(&self) -> Option<&DuelReport> {
        match self {
            DuelOutcome::Resolved(report) => Some(report),
            DuelOutcome::Aborted { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KEY_LEN;

    fn draw(range: u32, value: u32, key_byte: u8) -> RevealedDraw {
        let key = SecretKey::from_bytes([key_byte; KEY_LEN]);
        RevealedDraw {
            range,
            commitment: Commitment::new(value, &key),
            value,
            key,
        }
    }

    fn catalog() -> Vec<Dice> {
        ["2,2,4,4,9,9", "6,8,1,1,8,6", "7,5,3,7,5,3"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect()
    }

    fn reference_report() -> DuelReport {
        DuelReport {
            duel_id: DuelId::new(),
            coin_flip: draw(2, 0, 1),
            counterpart_guess: 1,
            first_mover: Party::Counterpart,
            house_dice: 1,
            counterpart_dice: 2,
            roll: draw(6, 3, 2),
            counterpart_number: 2,
            offset: 5,
            house_throw: 6,
            counterpart_throw: 3,
            result: DuelResult::Win(Party::House),
        }
    }

    #[test]
    fn test_reference_report_verifies() {
        assert!(reference_report().verify(&catalog()).is_ok());
    }

    #[test]
    fn test_tampered_value_is_fairness_violation() {
        let mut report = reference_report();
        report.roll.value = 4;
        assert!(matches!(
            report.verify(&catalog()),
            Err(DuelError::FairnessViolation { value: 4, .. })
        ));
    }

    #[test]
    fn test_value_outside_range_is_fairness_violation() {
        let mut report = reference_report();
        report.coin_flip = draw(2, 7, 9);
        assert!(matches!(
            report.verify(&catalog()),
            Err(DuelError::FairnessViolation { .. })
        ));
    }

    #[test]
    fn test_tampered_derived_values_rejected() {
        let cases: [(fn(&mut DuelReport), &str); 5] = [
            (|r: &mut DuelReport| r.result = DuelResult::Win(Party::Counterpart), "result"),
            (|r: &mut DuelReport| r.offset = 4, "offset"),
            (|r: &mut DuelReport| r.first_mover = Party::House, "first mover"),
            (|r: &mut DuelReport| r.house_throw = 8, "throws"),
            (|r: &mut DuelReport| r.counterpart_dice = 7, "counterpart dice"),
        ];
        for (tamper, expected) in cases {
            let mut report = reference_report();
            tamper(&mut report);
            let err = report.verify(&catalog()).unwrap_err();
            match &err {
                DuelError::TamperedReport { duel_id, field } => {
                    assert_eq!(*field, expected);
                    assert_eq!(duel_id, &report.duel_id.to_string());
                }
                other => panic!("expected tampered report, got {:?}", other),
            }
            assert!(!err.is_recoverable());
        }
    }

    #[test]
    fn test_report_json_round_trip_still_verifies() {
        let report = reference_report();
        let json = serde_json::to_string_pretty(&report).unwrap();
        let back: DuelReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
        assert!(back.verify(&catalog()).is_ok());
    }

    #[test]
    fn test_combine_offset() {
        assert_eq!(combine_offset(3, 2, 6), 5);
        assert_eq!(combine_offset(5, 5, 6), 4);
        assert_eq!(combine_offset(u32::MAX, u32::MAX, 7), ((2 * u64::from(u32::MAX)) % 7) as u32);
    }

    #[test]
    fn test_outcome_report_accessor() {
        assert!(DuelOutcome::Aborted {
            phase: DuelPhase::SelectingDice
        }
        .report()
        .is_none());
        let report = reference_report();
        assert_eq!(
            DuelOutcome::Resolved(report.clone()).report(),
            Some(&report)
        );
    }
}
