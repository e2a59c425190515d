//! Probability table shown for the help token.

use dice_duel_core::Catalog;
use std::io::{self, Write};

/// Print the pairwise win-probability table for `catalog`.
///
/// The probabilities themselves are not computed yet; each pairing is listed
/// with a placeholder so the help screen still shows which dice face which.
// TODO: compute P(row beats column) over all face pairs once the intended
// tie handling is settled.
pub fn display_probabilities<W: Write>(catalog: &Catalog, out: &mut W) -> io::Result<()> {
    let rule = "=".repeat(30);
    writeln!(out)?;
    writeln!(out, "Probability of winning table:")?;
    writeln!(out, "{}", rule)?;
    for (i, row) in catalog.iter().enumerate() {
        for (j, column) in catalog.iter().enumerate() {
            if i == j {
                continue;
            }
            writeln!(
                out,
                "Dice {} {} vs dice {} {}: not computed",
                i, row, j, column
            )?;
        }
    }
    writeln!(out, "{}", rule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_every_ordered_pair_once() {
        let catalog = Catalog::parse(&["1,2", "3,4", "5,6"]).unwrap();
        let mut out = Vec::new();
        display_probabilities(&catalog, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let rows: Vec<&str> = text.lines().filter(|l| l.starts_with("Dice ")).collect();
        assert_eq!(rows.len(), 6);
        assert!(rows.contains(&"Dice 0 [1,2] vs dice 2 [5,6]: not computed"));
        assert!(!text.contains("Dice 1 [3,4] vs dice 1"));
    }
}
