//! Running the external game, one match per call.
//!
//! The tournament only talks to the game through [`MatchSource`]. The provided
//! [`CommandMatchSource`] runs a shell command, optionally echoes what it prints, and parses
//! the result block with [`parse_match_output`].

use std::{
    io::{self, BufRead, BufReader, Write},
    process::{Command, Stdio},
};

use anyhow::{bail, Context};
use tracing::{debug, instrument, warn};

use crate::{
    configuration::Configuration,
    error::TournamentError,
    match_record::{parse_match_output, MatchRecord},
    report::{colorize_game_line, game_banner, participant_label, ReportStyle},
};

/// Something able to play one match and report its result.
pub trait MatchSource {
    /// Plays match number `game` (1-based) and returns its record.
    ///
    /// # Errors
    /// [`TournamentError::ExternalProcess`] if the match could not be played or produced no
    /// usable result.
    fn run_one_match(&mut self, game: u32) -> Result<MatchRecord, TournamentError>;
}

/// Plays matches by running a shell command, e.g. `npm run submit-test`.
///
/// Stderr is redirected into stdout so that both streams reach the parser, and the echo,
/// in the order the game wrote them.
#[derive(Debug, Clone)]
pub struct CommandMatchSource {
    command: String,
    participants: usize,
    total_games: u32,
    verbose: bool,
    style: ReportStyle,
}

impl CommandMatchSource {
    /// Builds a source from the run configuration.
    pub fn new(config: &Configuration) -> Self {
        Self {
            command: config.command.clone(),
            participants: config.participants,
            total_games: config.games,
            verbose: config.verbose,
            style: ReportStyle::from_color(config.color),
        }
    }

    fn play<W: Write>(&self, game: u32, echo: &mut W) -> Result<MatchRecord, TournamentError> {
        let external = |e: anyhow::Error| TournamentError::ExternalProcess {
            game,
            reason: format!("{e:#}"),
        };

        if self.verbose {
            writeln!(echo, "{}", game_banner(game, self.total_games, self.style))
                .context("could not echo the game banner")
                .map_err(external)?;
        }
        let text = self.execute(echo).map_err(external)?;

        let parsed = parse_match_output(&text, self.participants);
        if parsed.is_blank() {
            return Err(TournamentError::ExternalProcess {
                game,
                reason: "no participant result line in the game output".to_owned(),
            });
        }
        let missing = parsed.missing();
        if !missing.is_empty() {
            let names = missing
                .iter()
                .map(|&j| participant_label(j))
                .collect::<Vec<_>>()
                .join(", ");
            warn!(
                game,
                "no valid result line for {names} (missing or malformed), scoring them as 0 points, 0ms, unknown status"
            );
        }
        debug!(game, seed = parsed.record.seed(), "match output parsed");
        Ok(parsed.record)
    }

    /// Runs the command, echoing each line as it is printed, and returns the whole output.
    fn execute<W: Write>(&self, echo: &mut W) -> anyhow::Result<String> {
        let mut child = shell_command(&self.command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("could not launch command '{}'", self.command))?;
        let stdout = child
            .stdout
            .take()
            .context("the game output was not captured")?;

        let mut text = String::new();
        for line in BufReader::new(stdout).split(b'\n') {
            let line = line.context("could not read the game output")?;
            let line = String::from_utf8_lossy(&line);
            let line = line.strip_suffix('\r').unwrap_or(&line);
            if self.verbose {
                writeln!(echo, "{}", colorize_game_line(line, self.style))
                    .context("could not echo the game output")?;
            }
            text.push_str(line);
            text.push('\n');
        }

        let status = child
            .wait()
            .context("failed to wait for the end of the game")?;
        if !status.success() {
            let last = text.lines().rev().find(|l| !l.trim().is_empty());
            bail!(
                "command '{}' failed ({}){}",
                self.command,
                status,
                last.map(|l| format!(": {}", l.trim())).unwrap_or_default()
            );
        }
        Ok(text)
    }
}

impl MatchSource for CommandMatchSource {
    #[instrument(skip(self), fields(command = %self.command))]
    fn run_one_match(&mut self, game: u32) -> Result<MatchRecord, TournamentError> {
        self.play(game, &mut io::stdout().lock())
    }
}

/// Wraps `command` in the platform shell, with stderr merged into stdout.
fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", &format!("({command}) 2>&1")]);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", &format!("exec 2>&1\n{command}")]);
        cmd
    }
}
