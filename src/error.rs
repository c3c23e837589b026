//! Errors that abort a tournament run.
//!
//! Only configuration problems and collaborator failures are errors. A result block with
//! missing participant lines is not: it is scored with default values (see
//! [`match_record`](crate::match_record)).

use thiserror::Error;

/// Everything that can stop a run before all matches are played.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TournamentError {
    /// Participant count outside of `{2, 4}`. Reported before any match is attempted.
    #[error("participant count must be 2 or 4, got {0}")]
    InvalidParticipantCount(usize),

    /// A match record (or outcome) whose length disagrees with the configured count.
    #[error("expected {expected} participants in match record, found {found}")]
    ParticipantMismatch {
        /// Configured participant count.
        expected: usize,
        /// Length actually found.
        found: usize,
    },

    /// The external game could not be run, or printed nothing usable.
    #[error("game {game}: {reason}")]
    ExternalProcess {
        /// 1-based number of the match that failed.
        game: u32,
        /// Human readable cause.
        reason: String,
    },
}

impl TournamentError {
    /// True for errors caused by the run configuration rather than by the game itself.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            TournamentError::InvalidParticipantCount(_)
                | TournamentError::ParticipantMismatch { .. }
        )
    }
}
