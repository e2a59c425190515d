//! A single die with arbitrary face values.

use crate::error::DuelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered, non-empty list of face values
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct Dice {
    faces: Vec<i64>,
}

impl Dice {
    /// Create a die, rejecting an empty face list
    pub fn new(faces: Vec<i64>) -> Result<Self, DuelError> {
        if faces.is_empty() {
            return Err(DuelError::InvalidConfiguration(
                "a dice needs at least one face".into(),
            ));
        }
        Ok(Self { faces })
    }

    /// Face shown at `offset`, wrapping around the face count
    pub fn roll(&self, offset: u64) -> i64 {
        self.faces[(offset % self.faces.len() as u64) as usize]
    }

    pub fn faces(&self) -> &[i64] {
        &self.faces
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Always false: construction rejects empty dice
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl TryFrom<Vec<i64>> for Dice {
    type Error = DuelError;

    fn try_from(faces: Vec<i64>) -> Result<Self, Self::Error> {
        Self::new(faces)
    }
}

impl From<Dice> for Vec<i64> {
    fn from(dice: Dice) -> Self {
        dice.faces
    }
}

/// Parses `"2,2,4,4,9,9"`. Every face must be a complete integer.
impl FromStr for Dice {
    type Err = DuelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let faces = s
            .split(',')
            .map(|face| face.trim().parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| {
                DuelError::InvalidConfiguration(format!(
                    "invalid dice configuration '{}': all values must be integers",
                    s
                ))
            })?;
        Self::new(faces)
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces: Vec<String> = self.faces.iter().map(|v| v.to_string()).collect();
        write!(f, "[{}]", faces.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dice(faces: &[i64]) -> Dice {
        Dice::new(faces.to_vec()).unwrap()
    }

    #[test]
    fn test_roll_indexes_faces() {
        let d = dice(&[6, 8, 1, 1, 8, 6]);
        assert_eq!(d.roll(0), 6);
        assert_eq!(d.roll(1), 8);
        assert_eq!(d.roll(2), 1);
        assert_eq!(d.roll(5), 6);
    }

    #[test]
    fn test_roll_is_periodic() {
        for faces in [vec![2, 2, 4, 4, 9, 9], vec![1, 5, 9], vec![-3], vec![7, 0, 2, 4, 1]] {
            let d = Dice::new(faces).unwrap();
            let len = d.len() as u64;
            for offset in 0..50u64 {
                assert_eq!(d.roll(offset), d.roll(offset + len));
                assert_eq!(d.roll(offset), d.roll(offset % len));
            }
        }
    }

    #[test]
    fn test_roll_handles_large_offsets() {
        let d = dice(&[1, 2, 3]);
        assert_eq!(d.roll(u64::MAX), d.roll(u64::MAX % 3));
    }

    #[test]
    fn test_empty_dice_rejected() {
        assert!(matches!(
            Dice::new(vec![]),
            Err(DuelError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_parse_faces() {
        let d: Dice = "2,2,4,4,9,9".parse().unwrap();
        assert_eq!(d.faces(), &[2, 2, 4, 4, 9, 9]);

        let spaced: Dice = " 1, -2 ,3".parse().unwrap();
        assert_eq!(spaced.faces(), &[1, -2, 3]);
    }

    #[test]
    fn test_parse_rejects_partial_integers() {
        for bad in ["2a,3", "1,,2", "", "x", "1.5,2"] {
            let err = bad.parse::<Dice>().unwrap_err();
            assert!(matches!(err, DuelError::InvalidConfiguration(_)), "{}", bad);
        }
    }

    #[test]
    fn test_parse_error_names_entry() {
        let err = "1,two,3".parse::<Dice>().unwrap_err();
        assert!(err.to_string().contains("'1,two,3'"));
    }

    #[test]
    fn test_display() {
        assert_eq!(dice(&[7, 5, 3]).to_string(), "[7,5,3]");
    }

    #[test]
    fn test_deserialize_validates() {
        let d: Dice = serde_json::from_str("[1,2,3]").unwrap();
        assert_eq!(d.faces(), &[1, 2, 3]);
        assert!(serde_json::from_str::<Dice>("[]").is_err());
    }
}
