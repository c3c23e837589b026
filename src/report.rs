//! Text rendering of the game output and of the final statistics.
//!
//! Both renderers share one [`ReportStyle`] switch: [`Colored`](ReportStyle::Colored) uses ANSI
//! escape codes, [`Plain`](ReportStyle::Plain) produces the same text without them.

use std::{fmt, time::Duration};

use crate::tournament_stats::TournamentReport;

const RESET: &str = "\x1b[0m";
const BRIGHT: &str = "\x1b[1m";
const BLACK: &str = "\x1b[30m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";
const BG_BLUE: &str = "\x1b[44m";
const BG_YELLOW: &str = "\x1b[43m";
const BG_WHITE: &str = "\x1b[47m";

const PARTICIPANT_COLORS: [&str; 4] = [RED, GREEN, BLUE, MAGENTA];
const RULE_WIDTH: usize = 60;

/// Whether rendered text carries ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportStyle {
    /// No escape codes.
    Plain,
    /// ANSI colors.
    #[default]
    Colored,
}

impl ReportStyle {
    /// `Colored` when `color` is true.
    pub fn from_color(color: bool) -> Self {
        if color {
            ReportStyle::Colored
        } else {
            ReportStyle::Plain
        }
    }

    fn code(self, code: &'static str) -> &'static str {
        match self {
            ReportStyle::Plain => "",
            ReportStyle::Colored => code,
        }
    }
}

/// Display label of participant slot `j`.
pub fn participant_label(j: usize) -> String {
    format!("Snake {}", j + 1)
}

/// Banner printed before each match.
pub fn game_banner(game: u32, total: u32, style: ReportStyle) -> String {
    format!(
        "\n{}{} Running Game {game}/{total} {}",
        style.code(BG_BLUE),
        style.code(WHITE),
        style.code(RESET)
    )
}

/// Highlights one line of game output: seed in cyan, the results header in yellow, and
/// participant lines in green or red depending on survival.
pub fn colorize_game_line(line: &str, style: ReportStyle) -> String {
    let color = if line.contains("Game seed:") {
        CYAN
    } else if line.contains("FINAL RESULTS") {
        return format!(
            "{}{}{line}{}",
            style.code(YELLOW),
            style.code(BRIGHT),
            style.code(RESET)
        );
    } else if line.contains("Snake") && line.contains("points") {
        if line.contains("survived") {
            GREEN
        } else if line.contains("died") {
            RED
        } else {
            return line.to_owned();
        }
    } else {
        return line.to_owned();
    };
    format!("{}{line}{}", style.code(color), style.code(RESET))
}

/// Final statistics, ready to be printed with `{}`.
pub struct RenderedReport<'a> {
    report: &'a TournamentReport,
    style: ReportStyle,
    elapsed: Option<Duration>,
}

/// Wraps `report` for display. `elapsed` is the wall time of the whole run, if known.
pub fn render(
    report: &TournamentReport,
    style: ReportStyle,
    elapsed: Option<Duration>,
) -> RenderedReport<'_> {
    RenderedReport {
        report,
        style,
        elapsed,
    }
}

impl fmt::Display for RenderedReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = |code| self.style.code(code);
        let report = self.report;
        let heavy = "=".repeat(RULE_WIDTH);
        let light = "-".repeat(RULE_WIDTH);

        writeln!(f, "{}{}{heavy}{}", c(BG_WHITE), c(BLACK), c(RESET))?;
        writeln!(
            f,
            "{}{}{}{:^width$}{}",
            c(BG_YELLOW),
            c(BLACK),
            c(BRIGHT),
            "FINAL STATISTICS",
            c(RESET),
            width = RULE_WIDTH
        )?;
        writeln!(f, "{}{}{heavy}{}", c(BG_WHITE), c(BLACK), c(RESET))?;
        writeln!(f, "{}Total Games: {}{}{}", c(WHITE), c(YELLOW), report.total_games, c(RESET))?;
        if let Some(elapsed) = self.elapsed {
            writeln!(
                f,
                "{}Total Time: {}{:.2} seconds{}",
                c(WHITE),
                c(YELLOW),
                elapsed.as_secs_f64(),
                c(RESET)
            )?;
        }
        writeln!(f, "{}{light}{}", c(CYAN), c(RESET))?;

        for standing in &report.standings {
            let color = c(PARTICIPANT_COLORS[standing.participant % PARTICIPANT_COLORS.len()]);
            let label = |f: &mut fmt::Formatter<'_>, name: &str| {
                write!(f, "{color}  {name}: {}", c(WHITE))
            };

            writeln!(
                f,
                "{color}{}{} {}(Rank {}):{}",
                c(BRIGHT),
                participant_label(standing.participant),
                c(WHITE),
                standing.place,
                c(RESET)
            )?;
            label(f, "Total Score")?;
            writeln!(f, "{}{}", standing.total_score, c(RESET))?;
            label(f, "Total Battle Points")?;
            writeln!(f, "{:.1}{}", standing.battle_points, c(RESET))?;
            label(f, "Total Execution Time")?;
            writeln!(f, "{:.3}ms{}", standing.total_time, c(RESET))?;
            label(f, "Average Score")?;
            writeln!(f, "{:.2}{}", standing.average_score, c(RESET))?;
            label(f, "Average Execution Time")?;
            writeln!(f, "{:.3}ms{}", standing.average_time, c(RESET))?;
            if let Some(spread) = standing.score_spread {
                label(f, "Score Range")?;
                writeln!(f, "{} - {}{}", spread.min, spread.max, c(RESET))?;
            }
            if let Some(spread) = standing.time_spread {
                label(f, "Execution Time Range")?;
                writeln!(f, "{:.3}ms - {:.3}ms{}", spread.min, spread.max, c(RESET))?;
            }
            label(f, "Wins")?;
            writeln!(
                f,
                "{} ({:.1}%){}",
                standing.wins,
                standing.win_rate * 100.0,
                c(RESET)
            )?;
            label(f, "Survival Rate")?;
            writeln!(f, "{:.1}%{}", standing.survival_rate * 100.0, c(RESET))?;
            label(f, "Rank Distribution")?;
            let distribution = standing
                .rank_distribution
                .iter()
                .map(|share| {
                    format!(
                        "Rank {}: {} ({:.1}%)",
                        share.rank, share.count, share.percentage
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(f, "{distribution}{}", c(RESET))?;
            writeln!(f, "{}{light}{}", c(CYAN), c(RESET))?;
        }

        if report.total_games > 0 {
            let draw_percent = report.draw_rate * 100.0;
            let color = if draw_percent > 30.0 {
                RED
            } else if draw_percent > 10.0 {
                YELLOW
            } else {
                GREEN
            };
            writeln!(
                f,
                "{}Draws: {}{} ({:.1}%){}",
                c(WHITE),
                c(color),
                report.draws,
                draw_percent,
                c(RESET)
            )?;
        }
        write!(f, "{}{}{heavy}{}", c(BG_WHITE), c(BLACK), c(RESET))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{match_record::MatchRecord, scoring::score, tournament_stats::TournamentStats};

    fn sample_report() -> TournamentReport {
        let mut stats = TournamentStats::new(2);
        for (scores, times) in [([10, 10], [100.0, 101.0]), ([3, 8], [5.0, 6.0])] {
            let record =
                MatchRecord::from_columns("", &scores, &times, &[true, false]).unwrap();
            stats.accumulate(&score(&record), &record).unwrap();
        }
        stats.report()
    }

    #[test]
    fn plain_report_has_no_escape_codes() {
        let text = render(&sample_report(), ReportStyle::Plain, None).to_string();
        assert!(!text.contains('\x1b'));
        assert!(text.contains("Total Games: 2"));
        assert!(!text.contains("Total Time"));
        assert!(text.contains("Snake 2 (Rank 1):"));
        assert!(text.contains("  Total Battle Points: 5.5"));
        assert!(text.contains("  Wins: 1 (50.0%)"));
        assert!(text.contains("  Survival Rate: 0.0%"));
        assert!(text.contains("  Score Range: 8 - 10"));
        assert!(text.contains("  Execution Time Range: 6.000ms - 101.000ms"));
        assert!(text.contains("Rank Distribution: Rank 1: 1 (50.0%), Rank 1.5: 1 (50.0%)"));
        assert!(text.contains("Draws: 1 (50.0%)"));
    }

    #[test]
    fn best_participant_comes_first() {
        let text = render(&sample_report(), ReportStyle::Plain, None).to_string();
        let second = text.find("Snake 2 (Rank 1)").unwrap();
        let first = text.find("Snake 1 (Rank 2)").unwrap();
        assert!(second < first);
    }

    #[test]
    fn colored_report_and_elapsed_time() {
        let text = render(
            &sample_report(),
            ReportStyle::Colored,
            Some(Duration::from_millis(1500)),
        )
        .to_string();
        assert!(text.contains(RED));
        assert!(text.contains("Score Range: "));
        assert!(text.contains("1.50 seconds"));
    }

    #[test]
    fn game_lines_are_highlighted() {
        let style = ReportStyle::Colored;
        assert_eq!(
            colorize_game_line("Game seed: 0x1", style),
            format!("{CYAN}Game seed: 0x1{RESET}")
        );
        assert!(colorize_game_line("Snake 1: 3 points (survived) spent 1.0ms", style)
            .starts_with(GREEN));
        assert!(colorize_game_line("Snake 1: 3 points (died in round 2) spent 1.0ms", style)
            .starts_with(RED));
        assert_eq!(colorize_game_line("hello", style), "hello");
        assert_eq!(
            colorize_game_line("Game seed: 0x1", ReportStyle::Plain),
            "Game seed: 0x1"
        );
    }

    #[test]
    fn ranges_and_draws_are_omitted_without_games() {
        let report = TournamentStats::new(2).report();
        let text = render(&report, ReportStyle::Plain, None).to_string();
        assert!(text.contains("Total Games: 0"));
        assert!(!text.contains("Range"));
        assert!(!text.contains("Draws"));
    }

    #[test]
    fn labels_are_one_based() {
        assert_eq!(participant_label(0), "Snake 1");
        assert_eq!(participant_label(3), "Snake 4");
    }
}
