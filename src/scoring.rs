//! Scoring engine: turns one match into tie-aware ranks and battle points.
//!
//! Participants are ordered by score (descending) then elapsed time (ascending). Rank
//! positions `0, 1, 2, 3` are worth `3, 2, 1, 0` battle points. Participants with the same
//! score whose times are within [`SIMILAR_TIME_THRESHOLD_PERCENT`] of the fastest of them
//! are co-ranked: they share evenly the points of every position they span.
//!
//! ```
//! use snake_tournament::match_record::MatchRecord;
//! use snake_tournament::scoring::score;
//!
//! let record = MatchRecord::from_columns("", &[10, 10], &[100.0, 101.0], &[true, true]).unwrap();
//! let outcome = score(&record);
//! assert_eq!(outcome.battle_points, vec![2.5, 2.5]);
//! assert!(outcome.is_draw);
//! ```

use std::{collections::BTreeSet, ops::Range};

use serde::Serialize;

use crate::match_record::MatchRecord;

/// Battle points per absolute rank position (0-based). Positions past the end are worth 0.
pub const POINTS_PER_RANK: [f64; 4] = [3.0, 2.0, 1.0, 0.0];

/// Relative time difference, in percent, under which two equal scores are tied.
pub const SIMILAR_TIME_THRESHOLD_PERCENT: f64 = 3.0;

/// Battle points awarded to rank `position`.
pub fn points_for_rank(position: usize) -> f64 {
    POINTS_PER_RANK.get(position).copied().unwrap_or(0.0)
}

/// Points distributed in a match with `participants` players.
pub fn total_points(participants: usize) -> f64 {
    (0..participants).map(points_for_rank).sum()
}

/// True when `other` is less than 3% slower than `anchor`.
///
/// A zero anchor never matches anything.
pub fn is_similar_time(anchor: f64, other: f64) -> bool {
    anchor > 0.0 && (other - anchor) / anchor * 100.0 < SIMILAR_TIME_THRESHOLD_PERCENT
}

/// Result of scoring one match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchOutcome {
    /// Battle points per participant slot.
    pub battle_points: Vec<f64>,
    /// Every participant sharing the maximum score, regardless of time.
    pub winners: BTreeSet<usize>,
    /// The two leading participants are tied on score and on time.
    pub is_draw: bool,
    /// Exact 1-based rank per participant slot. Co-ranked participants get the mean of the
    /// positions they span (e.g. `1.5` for a tie on the first two places).
    pub ranks: Vec<f64>,
}

/// A set of co-ranked participants: same score and similar time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankGroup {
    /// Absolute rank positions (0-based) spanned by the group.
    pub positions: Range<usize>,
    /// Participant slots, fastest first.
    pub members: Vec<usize>,
}

impl RankGroup {
    /// Points shared by the group.
    pub fn total_points(&self) -> f64 {
        self.positions.clone().map(points_for_rank).sum()
    }

    /// Points given to each member.
    pub fn points_each(&self) -> f64 {
        self.total_points() / self.members.len() as f64
    }

    /// 1-based rank shown for each member.
    pub fn display_rank(&self) -> f64 {
        let span = self.positions.len() as f64;
        self.positions.clone().map(|p| (p + 1) as f64).sum::<f64>() / span
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    index: usize,
    score: u64,
    time: f64,
}

fn sorted_entries(record: &MatchRecord) -> Vec<Entry> {
    let mut entries = record
        .results()
        .iter()
        .enumerate()
        .map(|(index, r)| Entry {
            index,
            score: r.score,
            time: r.time_ms,
        })
        .collect::<Vec<_>>();
    entries.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.time.total_cmp(&b.time))
            .then(a.index.cmp(&b.index))
    });
    entries
}

/// Partitions a match into co-ranked groups, best group first.
pub fn rank_groups(record: &MatchRecord) -> Vec<RankGroup> {
    let entries = sorted_entries(record);
    let mut groups = Vec::with_capacity(entries.len());
    let mut offset = 0;

    for same_score in entries.chunk_by(|a, b| a.score == b.score) {
        let mut start = 0;
        while start < same_score.len() {
            let anchor = same_score[start].time;
            let mut end = start + 1;
            while end < same_score.len() && is_similar_time(anchor, same_score[end].time) {
                end += 1;
            }
            groups.push(RankGroup {
                positions: offset + start..offset + end,
                members: same_score[start..end].iter().map(|e| e.index).collect(),
            });
            start = end;
        }
        offset += same_score.len();
    }
    groups
}

/// Scores one match. Pure: the same record always yields the same outcome.
pub fn score(record: &MatchRecord) -> MatchOutcome {
    let n = record.len();
    let mut battle_points = vec![0.0; n];
    let mut ranks = vec![0.0; n];

    for group in rank_groups(record) {
        let points = group.points_each();
        let rank = group.display_rank();
        for &member in &group.members {
            battle_points[member] = points;
            ranks[member] = rank;
        }
    }

    let winners = match record.scores().max() {
        Some(best) => record
            .scores()
            .enumerate()
            .filter_map(|(j, s)| (s == best).then_some(j))
            .collect(),
        None => BTreeSet::new(),
    };

    let entries = sorted_entries(record);
    let is_draw = match entries.as_slice() {
        [first, second, ..] => {
            first.score == second.score && is_similar_time(first.time, second.time)
        }
        _ => false,
    };

    MatchOutcome {
        battle_points,
        winners,
        is_draw,
        ranks,
    }
}
