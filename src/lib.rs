//! # Snake Tournament
//!
//! Runs a multi-agent snake game repeatedly and turns the batch of match results into
//! tournament statistics.
//!
//! It provides:
//! - A tie-aware scoring engine ([`scoring::score`]) turning one match into battle points
//! - An aggregator ([`TournamentStats`](crate::tournament_stats::TournamentStats)) collecting
//!   totals, win and survival rates, and a rank histogram per participant
//! - A sequential driver ([`Tournament`](crate::tournament::Tournament)) playing matches
//!   through a [`MatchSource`](crate::match_runner::MatchSource)
//! - A text report, with or without ANSI colors ([`report`])
//!
//! # Scoring
//!
//! Participants are ranked by in-game score, then by elapsed time. Rank positions 1 to 4 are
//! worth 3, 2, 1 and 0 battle points. Participants with equal scores whose times are within
//! 3% of the fastest of them share evenly the points of the positions they occupy.
//!
//! # Documentation Overview
//!
//! - For the ranking rules and their edge cases, see the [`scoring`] module.
//! - For what is accumulated across matches, see [`tournament_stats`].
//! - For configuring a run, see [`Configuration`](crate::configuration::Configuration).
//! - For plugging in another way of playing matches, implement
//!   [`MatchSource`](crate::match_runner::MatchSource).
//!
//! # Usage Example
//!
//! ```no_run
//! use snake_tournament::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Configuration::new()
//!         .with_games(20)
//!         .with_participants(4)
//!         .with_command("npm run submit-test");
//!
//!     let mut source = CommandMatchSource::new(&config);
//!     let tournament = Tournament::new(config)?;
//!     let summary = tournament.run(&mut source)?;
//!
//!     let report = summary.stats.report();
//!     println!("{}", render(&report, ReportStyle::Colored, Some(summary.elapsed)));
//!     Ok(())
//! }
//! ```
//!
//! ## Game Requirements
//!
//! The command must print one line per participant at the end of the game:
//!
//! ```text
//! Snake 1: 12 points (survived) spent 35.120ms
//! Snake 2: 7 points (died in round 41) spent 29.004ms
//! ```
//!
//! and may print a `Game seed: <seed>` line, kept for reproducibility.
#![warn(missing_docs)]

pub mod configuration;
pub mod error;
/// Optional trace log file.
pub mod logger;
pub mod match_record;
pub mod match_runner;
pub mod report;
pub mod scoring;
pub mod tournament;
pub mod tournament_stats;

/// Commonly used types and traits for quick access.
///
/// Import this prelude to get started easily:
/// ```rust
/// use snake_tournament::prelude::*;
/// ```
///
/// Includes:
/// - [`Configuration`](crate::configuration::Configuration)
/// - [`Tournament`](crate::tournament::Tournament)
/// - the [`MatchSource`](crate::match_runner::MatchSource) trait and its command implementation
/// - the scoring and report entry points
pub mod prelude {
    pub use crate::configuration::Configuration;
    pub use crate::error::TournamentError;
    pub use crate::match_record::{MatchRecord, ParticipantResult, ParticipantStatus};
    pub use crate::match_runner::{CommandMatchSource, MatchSource};
    pub use crate::report::{render, ReportStyle};
    pub use crate::scoring::{score, MatchOutcome};
    pub use crate::tournament::{Tournament, TournamentSummary};
    pub use crate::tournament_stats::{TournamentReport, TournamentStats};
}
