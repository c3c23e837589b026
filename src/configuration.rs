//! Config for a tournament run
//!
//! Configuration can be created programmatically using [`Configuration::new()`] or by reading
//! environment variables using [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! The following environment variables can be used to override configuration values. All
//! values are optional. Flags are case-insensitive: set the value to `"true"` to enable one.
//!
//! - `SNAKE_GAMES` — Number of matches to play (default: `10`)
//! - `SNAKE_COUNT` — Number of participants per match, `2` or `4` (default: `2`)
//! - `SNAKE_COMMAND` — Shell command running one match (default: `npm run submit-test`)
//! - `SNAKE_VERBOSE` — Echo the game output while it runs (default: `true`)
//! - `SNAKE_COLOR` — Use ANSI colors in the echoed output and the report (default: `true`)
//! - `SNAKE_LOG` — Enable logging to a file (default: `false`)

use crate::error::TournamentError;

/// Shell command used when none is configured.
pub const DEFAULT_COMMAND: &str = "npm run submit-test";

/// Participant counts the game supports.
pub const SUPPORTED_PARTICIPANTS: [usize; 2] = [2, 4];

/// Configuration of a tournament run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub(crate) games: u32,
    pub(crate) participants: usize,
    pub(crate) command: String,
    pub(crate) verbose: bool,
    pub(crate) color: bool,
    pub(crate) log: bool,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - 10 matches of 2 participants are played.
    /// - Each match runs `npm run submit-test`.
    /// - The game output is echoed to stdout, with colors.
    /// - Logging to file is disabled.
    pub fn new() -> Self {
        Self {
            games: 10,
            participants: 2,
            command: DEFAULT_COMMAND.to_owned(),
            verbose: true,
            color: true,
            log: false,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// The following environment variables are recognized:
    /// - `SNAKE_GAMES`: number of matches (default: `10`)
    /// - `SNAKE_COUNT`: participants per match (default: `2`)
    /// - `SNAKE_COMMAND`: command running one match (default: `npm run submit-test`)
    /// - `SNAKE_VERBOSE`: if set to `"true"`, echoes the game output (default: `true`)
    /// - `SNAKE_COLOR`: if set to `"true"`, enables ANSI colors (default: `true`)
    /// - `SNAKE_LOG`: if set to `"true"`, enables logging to file (default: `false`)
    ///
    /// Unset or unparsable numbers keep their default value.
    pub fn from_env() -> Self {
        fn get_env_flag(var: &str, default: bool) -> bool {
            match std::env::var(var) {
                Ok(val) => val.eq_ignore_ascii_case("true"),
                Err(_) => default,
            }
        }

        fn get_env_parsed<T: std::str::FromStr>(var: &str, default: T) -> T {
            std::env::var(var)
                .ok()
                .and_then(|val| val.trim().parse().ok())
                .unwrap_or(default)
        }

        let defaults = Self::new();
        Self {
            games: get_env_parsed("SNAKE_GAMES", defaults.games),
            participants: get_env_parsed("SNAKE_COUNT", defaults.participants),
            command: std::env::var("SNAKE_COMMAND").unwrap_or(defaults.command),
            verbose: get_env_flag("SNAKE_VERBOSE", defaults.verbose),
            color: get_env_flag("SNAKE_COLOR", defaults.color),
            log: get_env_flag("SNAKE_LOG", defaults.log),
        }
    }

    /// Set the number of matches to play.
    pub fn with_games(mut self, value: u32) -> Self {
        self.games = value;
        self
    }

    /// Set the number of participants per match. Only 2 and 4 are accepted by
    /// [`validate`](Self::validate).
    pub fn with_participants(mut self, value: usize) -> Self {
        self.participants = value;
        self
    }

    /// Set the shell command running one match.
    pub fn with_command(mut self, value: impl Into<String>) -> Self {
        self.command = value.into();
        self
    }

    /// Enable or disable echoing of the game output.
    pub fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    /// Enable or disable ANSI colors.
    pub fn with_color(mut self, value: bool) -> Self {
        self.color = value;
        self
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    /// Number of matches to play.
    pub fn games(&self) -> u32 {
        self.games
    }

    /// Participants per match.
    pub fn participants(&self) -> usize {
        self.participants
    }

    /// Command running one match.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Whether the game output is echoed.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Whether ANSI colors are used.
    pub fn color(&self) -> bool {
        self.color
    }

    /// Whether a log file is written.
    pub fn log(&self) -> bool {
        self.log
    }

    /// Checks the participant count.
    ///
    /// # Errors
    /// [`TournamentError::InvalidParticipantCount`] unless the count is 2 or 4.
    pub fn validate(&self) -> Result<(), TournamentError> {
        if SUPPORTED_PARTICIPANTS.contains(&self.participants) {
            Ok(())
        } else {
            Err(TournamentError::InvalidParticipantCount(self.participants))
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
