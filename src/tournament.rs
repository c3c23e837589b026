//! Sequential tournament driver.
//!
//! A [`Tournament`] plays the configured number of matches one after another: each match
//! is fetched from a [`MatchSource`], scored, and folded into a [`TournamentStats`] owned by
//! the run. The first error aborts the whole run.

use std::time::{Duration, Instant};

use tracing::{error, info, instrument};

use crate::{
    configuration::Configuration,
    error::TournamentError,
    match_runner::MatchSource,
    scoring::score,
    tournament_stats::TournamentStats,
};

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct TournamentSummary {
    /// Final statistics.
    pub stats: TournamentStats,
    /// Wall time of the whole run.
    pub elapsed: Duration,
}

/// A validated tournament setup.
#[derive(Debug, Clone)]
pub struct Tournament {
    config: Configuration,
}

impl Tournament {
    /// Validates `config` and creates the tournament.
    ///
    /// # Errors
    /// [`TournamentError::InvalidParticipantCount`] unless the configuration asks for 2 or 4
    /// participants. No match is attempted in that case.
    pub fn new(config: Configuration) -> Result<Self, TournamentError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration of the run.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Plays every match with `source` and returns the final statistics.
    ///
    /// # Errors
    /// Stops at the first failing match: a collaborator error, or a record that does not have
    /// one entry per participant.
    #[instrument(skip_all, fields(games = self.config.games, participants = self.config.participants))]
    pub fn run<S: MatchSource>(&self, source: &mut S) -> Result<TournamentSummary, TournamentError> {
        let start = Instant::now();
        let mut stats = TournamentStats::new(self.config.participants);

        for game in 1..=self.config.games {
            if let Err(e) = Self::play_one(game, source, &mut stats) {
                error!(game, "tournament aborted: {e}");
                return Err(e);
            }
        }

        let elapsed = start.elapsed();
        info!(
            games = stats.games(),
            draws = stats.draws(),
            elapsed_secs = elapsed.as_secs_f64(),
            "tournament finished"
        );
        Ok(TournamentSummary { stats, elapsed })
    }

    fn play_one<S: MatchSource>(
        game: u32,
        source: &mut S,
        stats: &mut TournamentStats,
    ) -> Result<(), TournamentError> {
        let record = source.run_one_match(game)?;
        let outcome = score(&record);
        stats.accumulate(&outcome, &record)?;
        info!(
            game,
            seed = record.seed(),
            battle_points = ?outcome.battle_points,
            winners = ?outcome.winners,
            is_draw = outcome.is_draw,
            "match scored"
        );
        Ok(())
    }
}
