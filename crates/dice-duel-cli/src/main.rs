//! Dice Duel CLI
//!
//! Plays one round of a provably fair non-transitive dice duel on the console.
//!
//! # Usage
//!
//! ```bash
//! # Play with three dice
//! dice-duel play 2,2,4,4,9,9 6,8,1,1,8,6 7,5,3,7,5,3
//!
//! # Check every reveal and keep the transcript
//! dice-duel play --verify --save-report round.json 2,2,4,4,9,9 6,8,1,1,8,6 7,5,3,7,5,3
//!
//! # Audit a published HMAC after the key was revealed
//! dice-duel verify --digest <HMAC> --value 3 --key <KEY>
//!
//! # Audit a whole saved round against its dice
//! dice-duel verify --report round.json 2,2,4,4,9,9 6,8,1,1,8,6 7,5,3,7,5,3
//! ```

mod cli;
mod console;
mod help;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, PlayArgs, VerifyArgs};
use console::ConsoleCounterpart;
use dice_duel_core::crypto::verify_reveal;
use dice_duel_core::{
    Catalog, Commitment, Dice, DuelOrchestrator, DuelOutcome, DuelReport, SecretKey,
};
use std::fs;
use std::io;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Play(args) => play(args),
        Commands::Verify(args) => verify(args),
    }
}

/// Logs go to stderr so they never interleave with the duel narration
fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level)
        .with_context(|| format!("invalid log level '{}'", level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}

fn play(args: PlayArgs) -> anyhow::Result<()> {
    let catalog = Catalog::parse(args.dice.as_slice())?;
    info!("Loaded {} dice", catalog.len());

    let mut duel = DuelOrchestrator::new(catalog.clone(), args.config())?;
    let stdin = io::stdin();
    let mut console = ConsoleCounterpart::new(stdin.lock(), io::stdout(), catalog);

    match duel.play(&mut console)? {
        DuelOutcome::Resolved(report) => {
            let json = serde_json::to_string_pretty(&report)?;
            if args.json {
                println!("{}", json);
            }
            if let Some(path) = &args.save_report {
                fs::write(path, json)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!("Saved report {} to {}", report.duel_id, path.display());
            }
        }
        DuelOutcome::Aborted { phase } => info!("Exited during {}", phase),
    }
    Ok(())
}

fn verify(args: VerifyArgs) -> anyhow::Result<()> {
    match (args.report, args.digest, args.value, args.key) {
        (Some(path), ..) => {
            let report = audit_report_file(&path, &args.dice)?;
            println!("OK: report {} verifies ({})", report.duel_id, report.result);
        }
        (None, Some(digest), Some(value), Some(key)) => {
            let commitment: Commitment = digest.parse()?;
            let key: SecretKey = key.parse()?;
            verify_reveal(&commitment, value, &key)?;
            println!("OK: value {} matches HMAC {}", value, commitment);
        }
        _ => anyhow::bail!("pass either --report or all of --digest, --value and --key"),
    }
    Ok(())
}

fn audit_report_file(path: &Path, dice: &[String]) -> anyhow::Result<DuelReport> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    audit_report(&json, dice)
}

/// Parse a saved transcript and re-check it against the catalog it was played with
fn audit_report(json: &str, dice: &[String]) -> anyhow::Result<DuelReport> {
    let catalog = Catalog::parse(dice)?;
    let report: DuelReport = serde_json::from_str(json).context("malformed report")?;
    let dice: Vec<Dice> = catalog.iter().cloned().collect();
    report.verify(&dice)?;
    Ok(report)
}
