//! Aggregation of match outcomes into tournament statistics.
//!
//! [`TournamentStats`] is the single accumulator of a run. It is created for a fixed number
//! of participants, updated once per match with [`TournamentStats::accumulate`], and read
//! once at the end through [`TournamentStats::report`].

use std::{cmp, collections::BTreeMap, fmt};

use serde::Serialize;
use tracing::trace;

use crate::{error::TournamentError, match_record::MatchRecord, scoring::MatchOutcome};

/// Battle points to display rank, as used by the rank histogram.
const POINTS_TO_RANK: [(f64, f64); 7] = [
    (3.0, 1.0),
    (2.0, 2.0),
    (1.0, 3.0),
    (0.0, 4.0),
    (2.5, 1.5),
    (1.5, 2.5),
    (0.5, 3.5),
];

/// Derives the histogram rank from a participant's battle points for one match.
///
/// Values missing from the lookup fall back to `4 - points`. This is only an estimate:
/// [`MatchOutcome::ranks`] holds the exact rank.
pub fn display_rank(points: f64) -> f64 {
    POINTS_TO_RANK
        .iter()
        .find_map(|&(p, rank)| (p == points).then_some(rank))
        .unwrap_or(4.0 - points)
}

/// A rank value usable as an ordered map key (ranks may be fractional, e.g. `1.5`).
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct RankKey(pub f64);

impl PartialEq for RankKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == cmp::Ordering::Equal
    }
}

impl Eq for RankKey {}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for RankKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{}", self.0)
        } else {
            write!(f, "{:.1}", self.0)
        }
    }
}

/// Running totals of one participant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticipantStats {
    /// Sum of in-game scores.
    pub total_score: u64,
    /// Sum of elapsed times, in milliseconds.
    pub total_time: f64,
    /// Sum of battle points.
    pub battle_points: f64,
    /// Matches won outright (draws excluded).
    pub wins: u32,
    /// Matches survived.
    pub survived: u32,
    /// Matches not survived, including unknown statuses.
    pub died: u32,
    /// How many times each display rank was obtained.
    pub rank_counts: BTreeMap<RankKey, u32>,
    /// Per-match scores, in play order.
    pub scores: Vec<u64>,
    /// Per-match times, in play order.
    pub times: Vec<f64>,
}

/// Statistics of a whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentStats {
    participants: Vec<ParticipantStats>,
    draws: u32,
    games: u32,
    seeds: Vec<String>,
}

impl TournamentStats {
    /// Creates empty statistics for `participants` slots.
    pub fn new(participants: usize) -> Self {
        Self {
            participants: vec![ParticipantStats::default(); participants],
            draws: 0,
            games: 0,
            seeds: vec![],
        }
    }

    /// Per-participant totals, indexed by slot.
    pub fn participants(&self) -> &[ParticipantStats] {
        &self.participants
    }

    /// Number of drawn matches.
    pub fn draws(&self) -> u32 {
        self.draws
    }

    /// Number of matches accumulated so far.
    pub fn games(&self) -> u32 {
        self.games
    }

    /// Seeds of every accumulated match, in play order.
    pub fn seeds(&self) -> &[String] {
        &self.seeds
    }

    /// Folds one scored match into the statistics.
    ///
    /// # Errors
    /// [`TournamentError::ParticipantMismatch`] if the record or the outcome does not have
    /// one entry per participant. The statistics are left untouched in that case.
    pub fn accumulate(
        &mut self,
        outcome: &MatchOutcome,
        record: &MatchRecord,
    ) -> Result<(), TournamentError> {
        let expected = self.participants.len();
        for found in [
            record.len(),
            outcome.battle_points.len(),
            outcome.ranks.len(),
        ] {
            if found != expected {
                return Err(TournamentError::ParticipantMismatch { expected, found });
            }
        }

        for (j, (stats, result)) in self.participants.iter_mut().zip(record.results()).enumerate()
        {
            let points = outcome.battle_points[j];
            stats.total_score += result.score;
            stats.total_time += result.time_ms;
            stats.battle_points += points;
            stats.scores.push(result.score);
            stats.times.push(result.time_ms);
            if result.status.survived() {
                stats.survived += 1;
            } else {
                stats.died += 1;
            }
            *stats
                .rank_counts
                .entry(RankKey(display_rank(points)))
                .or_default() += 1;
        }

        if outcome.is_draw {
            self.draws += 1;
        } else {
            for &winner in &outcome.winners {
                if let Some(stats) = self.participants.get_mut(winner) {
                    stats.wins += 1;
                }
            }
        }

        self.games += 1;
        self.seeds.push(record.seed().to_owned());
        trace!(games = self.games, draws = self.draws, "match accumulated");
        Ok(())
    }

    /// Builds the final report. Does not modify the statistics.
    pub fn report(&self) -> TournamentReport {
        let games = self.games;
        let mut order = (0..self.participants.len()).collect::<Vec<_>>();
        // stable: equal points keep slot order
        order.sort_by(|&a, &b| {
            self.participants[b]
                .battle_points
                .total_cmp(&self.participants[a].battle_points)
        });

        let standings = order
            .into_iter()
            .enumerate()
            .map(|(place, j)| {
                let stats = &self.participants[j];
                Standing {
                    participant: j,
                    place: place + 1,
                    total_score: stats.total_score,
                    total_time: stats.total_time,
                    battle_points: stats.battle_points,
                    wins: stats.wins,
                    survived: stats.survived,
                    died: stats.died,
                    win_rate: rate(stats.wins, games),
                    survival_rate: rate(stats.survived, games),
                    average_score: average(stats.total_score as f64, games),
                    average_time: average(stats.total_time, games),
                    score_spread: spread(&stats.scores),
                    time_spread: spread(&stats.times),
                    rank_distribution: stats
                        .rank_counts
                        .iter()
                        .map(|(&rank, &count)| RankShare {
                            rank,
                            count,
                            percentage: rate(count, games) * 100.0,
                        })
                        .collect(),
                }
            })
            .collect();

        TournamentReport {
            total_games: games,
            draws: self.draws,
            draw_rate: rate(self.draws, games),
            standings,
        }
    }
}

fn spread<T: Copy + PartialOrd>(values: &[T]) -> Option<Spread<T>> {
    let (&first, rest) = values.split_first()?;
    let mut spread = Spread {
        min: first,
        max: first,
    };
    for &value in rest {
        if value < spread.min {
            spread.min = value;
        }
        if value > spread.max {
            spread.max = value;
        }
    }
    Some(spread)
}

fn rate(count: u32, games: u32) -> f64 {
    average(f64::from(count), games)
}

fn average(total: f64, games: u32) -> f64 {
    if games == 0 {
        0.0
    } else {
        total / f64::from(games)
    }
}

/// Read-only summary of a run, best participant first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TournamentReport {
    /// Matches played.
    pub total_games: u32,
    /// Drawn matches.
    pub draws: u32,
    /// `draws / total_games`, in `[0, 1]`.
    pub draw_rate: f64,
    /// Participants by descending battle points.
    pub standings: Vec<Standing>,
}

/// One line of the final ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    /// 0-based participant slot.
    pub participant: usize,
    /// 1-based place in the ranking.
    pub place: usize,
    /// Sum of in-game scores.
    pub total_score: u64,
    /// Sum of elapsed times, in milliseconds.
    pub total_time: f64,
    /// Sum of battle points.
    pub battle_points: f64,
    /// Outright wins.
    pub wins: u32,
    /// Matches survived.
    pub survived: u32,
    /// Matches not survived.
    pub died: u32,
    /// `wins / total_games`.
    pub win_rate: f64,
    /// `survived / total_games`.
    pub survival_rate: f64,
    /// Mean in-game score per match.
    pub average_score: f64,
    /// Mean elapsed time per match, in milliseconds.
    pub average_time: f64,
    /// Lowest and highest in-game score of a single match, `None` before the first match.
    pub score_spread: Option<Spread<u64>>,
    /// Fastest and slowest single-match time, in milliseconds.
    pub time_spread: Option<Spread<f64>>,
    /// Rank histogram, ascending rank.
    pub rank_distribution: Vec<RankShare>,
}

/// Smallest and largest value seen over the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spread<T> {
    /// Smallest value.
    pub min: T,
    /// Largest value.
    pub max: T,
}

/// One histogram entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankShare {
    /// Display rank.
    pub rank: RankKey,
    /// Occurrences.
    pub count: u32,
    /// `count / total_games`, in percent.
    pub percentage: f64,
}
