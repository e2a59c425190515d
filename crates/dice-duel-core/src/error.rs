//! Error type shared by every layer of the duel.

use thiserror::Error;

/// Errors from catalog parsing, commitments, and duel orchestration
#[derive(Debug, Error)]
pub enum DuelError {
    /// Bad catalog or duel parameters. Fatal, raised before any duel starts.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Bad menu token. Recoverable: the same state is prompted again.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Commitment API misuse (reveal before commit, double commit, double reveal)
    #[error("State violation: {0}")]
    StateViolation(&'static str),

    /// A revealed value and key do not reproduce the published digest
    #[error("Fairness violation: revealed value {value} does not match digest {digest}")]
    FairnessViolation { digest: String, value: u32 },

    /// A transcript whose derived values disagree with its own draws
    #[error("Tampered report {duel_id}: {field} does not match its draws")]
    TamperedReport { duel_id: String, field: &'static str },

    #[error("Entropy source failure: {0}")]
    Entropy(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DuelError {
    /// Whether the duel may continue by prompting the same state again
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DuelError::InvalidInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_invalid_input_is_recoverable() {
        assert!(DuelError::InvalidInput("abc".into()).is_recoverable());
        assert!(!DuelError::InvalidConfiguration("too few dice".into()).is_recoverable());
        assert!(!DuelError::StateViolation("reveal before commit").is_recoverable());
        assert!(!DuelError::FairnessViolation {
            digest: "00".into(),
            value: 1
        }
        .is_recoverable());
        assert!(!DuelError::TamperedReport {
            duel_id: "d".into(),
            field: "result"
        }
        .is_recoverable());
    }

    #[test]
    fn test_fairness_violation_message_names_digest() {
        let err = DuelError::FairnessViolation {
            digest: "abcd".into(),
            value: 3,
        };
        assert_eq!(
            err.to_string(),
            "Fairness violation: revealed value 3 does not match digest abcd"
        );
    }
}
