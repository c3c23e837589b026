//! One finished match, as reported by the game.
//!
//! The game prints a result block at the end of each run:
//!
//! ```text
//! Game seed: 0x00000000deadbeef
//! ...
//! === FINAL RESULTS ===
//! Snake scores:
//! Snake 1: 12 points (survived) spent 35.120ms
//! Snake 2: 7 points (died in round 41) spent 29.004ms
//! ```
//!
//! [`parse_match_output`] turns that text into a [`MatchRecord`]. Parsing is tolerant: a
//! participant whose line is missing keeps a score of `0`, a time of `0.0` and an
//! [`Unknown`](ParticipantStatus::Unknown) status, and is reported through
//! [`ParsedOutput::missing`] so the caller can decide how loudly to complain.

use std::fmt;

use crate::error::TournamentError;

/// How a participant left the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParticipantStatus {
    /// Still alive when the game ended.
    Survived,
    /// Eliminated during the given round.
    Died {
        /// Round of the elimination, as printed by the game.
        round: u32,
    },
    /// No result line was found for this participant.
    #[default]
    Unknown,
}

impl ParticipantStatus {
    /// Only [`Survived`](Self::Survived) counts as a survival; `Unknown` counts as a death.
    pub fn survived(&self) -> bool {
        matches!(self, ParticipantStatus::Survived)
    }
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticipantStatus::Survived => write!(f, "survived"),
            ParticipantStatus::Died { round } => write!(f, "died in round {round}"),
            ParticipantStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Result of a single participant in a single match.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParticipantResult {
    /// Points scored in game.
    pub score: u64,
    /// Thinking time spent by the participant, in milliseconds.
    pub time_ms: f64,
    /// Final status.
    pub status: ParticipantStatus,
}

impl ParticipantResult {
    /// Creates a participant result.
    pub fn new(score: u64, time_ms: f64, status: ParticipantStatus) -> Self {
        Self {
            score,
            time_ms,
            status,
        }
    }
}

/// Outcome of one match, one entry per participant slot.
///
/// Immutable once built: it is consumed by the scoring engine and the aggregator, then
/// dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    seed: String,
    results: Vec<ParticipantResult>,
}

impl MatchRecord {
    /// Creates a record from per-participant results, indexed by participant slot.
    pub fn new(seed: impl Into<String>, results: Vec<ParticipantResult>) -> Self {
        Self {
            seed: seed.into(),
            results,
        }
    }

    /// Creates a record from parallel columns.
    ///
    /// # Errors
    /// [`TournamentError::ParticipantMismatch`] if the columns do not have the same length.
    pub fn from_columns(
        seed: impl Into<String>,
        scores: &[u64],
        times: &[f64],
        survived: &[bool],
    ) -> Result<Self, TournamentError> {
        let expected = scores.len();
        for found in [times.len(), survived.len()] {
            if found != expected {
                return Err(TournamentError::ParticipantMismatch { expected, found });
            }
        }
        let results = scores
            .iter()
            .zip(times)
            .zip(survived)
            .map(|((&score, &time_ms), &alive)| {
                let status = if alive {
                    ParticipantStatus::Survived
                } else {
                    ParticipantStatus::Died { round: 0 }
                };
                ParticipantResult::new(score, time_ms, status)
            })
            .collect();
        Ok(Self::new(seed, results))
    }

    /// Opaque seed printed by the game, empty if none was printed.
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True if the record holds no participant at all.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// All participant results, indexed by slot.
    pub fn results(&self) -> &[ParticipantResult] {
        &self.results
    }

    /// Score of participant `j`. Panics if `j` is out of range.
    pub fn score(&self, j: usize) -> u64 {
        self.results[j].score
    }

    /// Elapsed time of participant `j`, in milliseconds.
    pub fn time(&self, j: usize) -> f64 {
        self.results[j].time_ms
    }

    /// Whether participant `j` survived.
    pub fn survived(&self, j: usize) -> bool {
        self.results[j].status.survived()
    }

    /// Scores, in slot order.
    pub fn scores(&self) -> impl Iterator<Item = u64> + '_ {
        self.results.iter().map(|r| r.score)
    }
}

/// A parsed result block together with which participants were actually found.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedOutput {
    /// The record, with defaults for missing participants.
    pub record: MatchRecord,
    /// `found[j]` is true when a result line for participant `j` was parsed.
    pub found: Vec<bool>,
}

impl ParsedOutput {
    /// 0-based indices of participants whose line was missing.
    pub fn missing(&self) -> Vec<usize> {
        self.found
            .iter()
            .enumerate()
            .filter_map(|(j, found)| (!found).then_some(j))
            .collect()
    }

    /// True when no participant line was found at all.
    pub fn is_blank(&self) -> bool {
        !self.found.iter().any(|&f| f)
    }
}

const SEED_MARKER: &str = "Game seed:";
const PARTICIPANT_MARKER: &str = "Snake ";

/// Parses the full text output of one game run for `participants` slots.
///
/// The last seed line wins. For each participant, the first matching result line wins;
/// lines for participants beyond `participants` are ignored.
pub fn parse_match_output(output: &str, participants: usize) -> ParsedOutput {
    let mut seed = String::new();
    let mut results = vec![ParticipantResult::default(); participants];
    let mut found = vec![false; participants];

    for line in output.lines() {
        if let Some(value) = parse_seed_line(line) {
            seed = value.to_owned();
            continue;
        }
        let Some((number, result)) = parse_participant_line(line) else {
            continue;
        };
        let slot = number - 1;
        if slot < participants && !found[slot] {
            results[slot] = result;
            found[slot] = true;
        }
    }

    ParsedOutput {
        record: MatchRecord::new(seed, results),
        found,
    }
}

/// Returns the seed printed on a `Game seed:` line.
pub fn parse_seed_line(line: &str) -> Option<&str> {
    let (_, value) = line.split_once(SEED_MARKER)?;
    Some(value.trim())
}

/// Parses `Snake <k>: <score> points (<status>) spent <time>ms`, returning the 1-based `k`.
///
/// The pattern may appear anywhere in the line.
pub fn parse_participant_line(line: &str) -> Option<(usize, ParticipantResult)> {
    line.match_indices(PARTICIPANT_MARKER)
        .find_map(|(pos, marker)| parse_participant_fields(&line[pos + marker.len()..]))
}

fn parse_participant_fields(rest: &str) -> Option<(usize, ParticipantResult)> {
    let (number, rest) = rest.split_once(": ")?;
    let number = parse_digits::<usize>(number)?;
    if number == 0 {
        return None;
    }

    let (score, rest) = rest.split_once(" points (")?;
    let score = parse_digits::<u64>(score)?;

    let (status, rest) = rest.split_once(") spent ")?;
    let status = if status == "survived" {
        ParticipantStatus::Survived
    } else {
        let round = status.strip_prefix("died in round ")?;
        ParticipantStatus::Died {
            round: parse_digits(round)?,
        }
    };

    let (time, _) = rest.split_once("ms")?;
    if time.is_empty() || !time.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let time_ms = time.parse::<f64>().ok()?;

    Some((number, ParticipantResult::new(score, time_ms, status)))
}

fn parse_digits<T: std::str::FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOUR_SNAKES: &str = "\
> snake@1.0.0 submit-test
Starting 4snakes mode with 4 snakes, board size 8x8, 10 foods, 100 rounds
Game seed: 0x00000000075bcd15

=== FINAL RESULTS ===
Snake scores:
Snake 1: 12 points (survived) spent 35.120ms
Snake 2: 7 points (died in round 41) spent 29.004ms
Snake 3: 7 points (survived) spent 29.500ms
Snake 4: 0 points (died in round 3) spent 1.250ms
";

    #[test]
    fn parses_full_result_block() {
        let parsed = parse_match_output(FOUR_SNAKES, 4);
        assert!(parsed.missing().is_empty());
        let record = parsed.record;
        assert_eq!(record.seed(), "0x00000000075bcd15");
        assert_eq!(record.scores().collect::<Vec<_>>(), vec![12, 7, 7, 0]);
        assert_eq!(record.time(0), 35.12);
        assert_eq!(
            record.results()[1].status,
            ParticipantStatus::Died { round: 41 }
        );
        assert!(record.survived(2));
        assert!(!record.survived(3));
    }

    #[test]
    fn missing_lines_default_to_zero_and_unknown() {
        let text = "Game seed: 42\nSnake 2: 5 points (survived) spent 10.000ms\n";
        let parsed = parse_match_output(text, 2);
        assert_eq!(parsed.missing(), vec![0]);
        assert!(!parsed.is_blank());
        let first = parsed.record.results()[0];
        assert_eq!(first, ParticipantResult::default());
        assert_eq!(first.status, ParticipantStatus::Unknown);
        assert!(!parsed.record.survived(0));
    }

    #[test]
    fn blank_output_is_detected() {
        let parsed = parse_match_output("npm ERR! missing script: submit-test\n", 2);
        assert!(parsed.is_blank());
        assert_eq!(parsed.record.seed(), "");
        assert_eq!(parsed.record.len(), 2);
    }

    #[test]
    fn extra_participants_and_duplicates_are_ignored() {
        let text = "\
Snake 1: 3 points (survived) spent 1.000ms
Snake 1: 9 points (survived) spent 9.000ms
Snake 3: 4 points (survived) spent 2.000ms
";
        let parsed = parse_match_output(text, 2);
        assert_eq!(parsed.record.score(0), 3);
        assert_eq!(parsed.missing(), vec![1]);
    }

    #[test]
    fn rejects_malformed_participant_lines() {
        assert!(parse_participant_line("Snake scores:").is_none());
        assert!(parse_participant_line("Snake 0: 1 points (survived) spent 1.0ms").is_none());
        assert!(parse_participant_line("Snake 1: -1 points (survived) spent 1.0ms").is_none());
        assert!(parse_participant_line("Snake 1: 1 points (asleep) spent 1.0ms").is_none());
        assert!(parse_participant_line("Snake 1: 1 points (survived) spent 1e3ms").is_none());
    }

    #[test]
    fn scores_beyond_u32_are_kept() {
        let (_, result) =
            parse_participant_line("Snake 1: 5000000000 points (survived) spent 1.0ms").unwrap();
        assert_eq!(result.score, 5_000_000_000);
    }

    #[test]
    fn participant_pattern_may_be_prefixed() {
        let (k, result) =
            parse_participant_line("\x1b[32m  Snake 2: 8 points (survived) spent 0.5ms").unwrap();
        assert_eq!(k, 2);
        assert_eq!(result.score, 8);
        assert_eq!(result.time_ms, 0.5);
    }

    #[test]
    fn from_columns_checks_lengths() {
        let err = MatchRecord::from_columns("", &[1, 2], &[1.0], &[true, true]).unwrap_err();
        assert_eq!(
            err,
            TournamentError::ParticipantMismatch {
                expected: 2,
                found: 1
            }
        );
        let record = MatchRecord::from_columns("s", &[1, 2], &[1.0, 2.0], &[true, false]).unwrap();
        assert!(record.survived(0));
        assert!(!record.survived(1));
    }
}
