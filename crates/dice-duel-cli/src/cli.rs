//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use dice_duel_core::duel::DEFAULT_ROLL_RANGE;
use dice_duel_core::DuelConfig;
use std::path::PathBuf;

/// Provably fair non-transitive dice duel
#[derive(Debug, Parser)]
#[command(name = "dice-duel")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Provably fair non-transitive dice duel", long_about = None)]
pub struct Cli {
    /// Log filter (trace, debug, info, warn, error, or an EnvFilter directive)
    #[arg(long, global = true, env = "DICE_DUEL_LOG", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Play one round against the house
    Play(PlayArgs),

    /// Check a revealed value and key against a published HMAC, or audit a saved transcript
    Verify(VerifyArgs),
}

#[derive(Debug, Args)]
pub struct PlayArgs {
    /// Dice as comma-separated faces, at least three (e.g. 2,2,4,4,9,9 6,8,1,1,8,6 7,5,3,7,5,3)
    #[arg(value_name = "DICE", allow_hyphen_values = true)]
    pub dice: Vec<String>,

    /// Modulus of the shared roll offset
    #[arg(long, env = "DICE_DUEL_ROLL_RANGE", default_value_t = DEFAULT_ROLL_RANGE)]
    pub roll_range: u32,

    /// Check every reveal against its HMAC and void the round on mismatch
    #[arg(long, env = "DICE_DUEL_VERIFY")]
    pub verify: bool,

    /// Do not let the counterpart pick the house's dice
    #[arg(long)]
    pub exclusive_dice: bool,

    /// Print the round transcript as JSON once it resolves
    #[arg(long)]
    pub json: bool,

    /// Also write the JSON transcript to this file
    #[arg(long, value_name = "FILE")]
    pub save_report: Option<PathBuf>,
}

impl PlayArgs {
    pub fn config(&self) -> DuelConfig {
        DuelConfig {
            roll_range: self.roll_range,
            verify_reveals: self.verify,
            exclusive_dice: self.exclusive_dice,
        }
    }
}

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Published HMAC, hex
    #[arg(long, required_unless_present = "report", requires_all = ["value", "key"])]
    pub digest: Option<String>,

    /// Revealed value
    #[arg(long, requires = "digest")]
    pub value: Option<u32>,

    /// Revealed key, hex
    #[arg(long, requires = "digest")]
    pub key: Option<String>,

    /// JSON transcript written by `play --save-report`
    #[arg(long, value_name = "FILE", conflicts_with = "digest", requires = "dice")]
    pub report: Option<PathBuf>,

    /// Catalog the audited round was played with, in the original order
    #[arg(value_name = "DICE", allow_hyphen_values = true)]
    pub dice: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_play_defaults() {
        let cli = Cli::try_parse_from([
            "dice-duel",
            "play",
            "2,2,4,4,9,9",
            "6,8,1,1,8,6",
            "7,5,3,7,5,3",
        ])
        .unwrap();
        let Commands::Play(args) = cli.command else {
            panic!("expected play");
        };
        assert_eq!(args.dice.len(), 3);
        assert_eq!(args.config(), DuelConfig::default());
        assert!(!args.json);
    }

    #[test]
    fn test_play_flags() {
        let cli = Cli::try_parse_from([
            "dice-duel",
            "play",
            "--roll-range",
            "10",
            "--verify",
            "--exclusive-dice",
            "--json",
            "-1,2,3",
            "4,5,6",
            "7,8,9",
        ])
        .unwrap();
        let Commands::Play(args) = cli.command else {
            panic!("expected play");
        };
        assert_eq!(args.dice[0], "-1,2,3");
        let config = args.config();
        assert_eq!(config.roll_range, 10);
        assert!(config.verify_reveals);
        assert!(config.exclusive_dice);
        assert!(args.json);
    }

    #[test]
    fn test_too_few_dice_left_to_catalog_validation() {
        // clap accepts any count; the catalog reports the error with its own message
        let cli = Cli::try_parse_from(["dice-duel", "play", "1,2"]).unwrap();
        let Commands::Play(args) = cli.command else {
            panic!("expected play");
        };
        assert_eq!(args.dice, vec!["1,2".to_string()]);
    }

    #[test]
    fn test_verify_args() {
        let cli = Cli::try_parse_from([
            "dice-duel",
            "verify",
            "--digest",
            "ab",
            "--value",
            "3",
            "--key",
            "cd",
        ])
        .unwrap();
        let Commands::Verify(args) = cli.command else {
            panic!("expected verify");
        };
        assert_eq!(args.value, Some(3));
        assert_eq!(args.digest.as_deref(), Some("ab"));
        assert_eq!(args.key.as_deref(), Some("cd"));
        assert!(args.report.is_none());
    }

    #[test]
    fn test_verify_report_args() {
        let cli = Cli::try_parse_from([
            "dice-duel",
            "verify",
            "--report",
            "round.json",
            "2,2,4,4,9,9",
            "6,8,1,1,8,6",
            "7,5,3,7,5,3",
        ])
        .unwrap();
        let Commands::Verify(args) = cli.command else {
            panic!("expected verify");
        };
        assert_eq!(args.report, Some(PathBuf::from("round.json")));
        assert_eq!(args.dice.len(), 3);
        assert!(args.digest.is_none());
    }

    #[test]
    fn test_verify_needs_digest_or_report() {
        assert!(Cli::try_parse_from(["dice-duel", "verify"]).is_err());
        assert!(Cli::try_parse_from(["dice-duel", "verify", "--digest", "ab"]).is_err());
        assert!(Cli::try_parse_from(["dice-duel", "verify", "--report", "round.json"]).is_err());
        assert!(Cli::try_parse_from([
            "dice-duel",
            "verify",
            "--report",
            "round.json",
            "--digest",
            "ab",
            "1,2",
        ])
        .is_err());
    }
}
