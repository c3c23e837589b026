use anyhow::Context;
use clap::Parser;
use snake_tournament::{logger::init_logger, prelude::*};

/// Run the snake game several times and print tournament statistics.
///
/// Every option falls back to its `SNAKE_*` environment variable, then to its default.
#[derive(Parser, Debug)]
#[command(name = "snake-tournament", version, about)]
struct Args {
    /// Number of games to run [env: SNAKE_GAMES, default: 10]
    #[arg(short, long)]
    games: Option<u32>,

    /// Number of snakes per game, 2 or 4 [env: SNAKE_COUNT, default: 2]
    #[arg(short, long)]
    snakes: Option<usize>,

    /// Shell command running one game [env: SNAKE_COMMAND, default: "npm run submit-test"]
    #[arg(short, long)]
    command: Option<String>,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,

    /// Do not echo the game output
    #[arg(short, long)]
    quiet: bool,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,

    /// Write a trace log file in the current directory
    #[arg(long)]
    log: bool,
}

impl Args {
    fn into_configuration(self) -> Configuration {
        let mut config = Configuration::from_env();
        if let Some(games) = self.games {
            config = config.with_games(games);
        }
        if let Some(snakes) = self.snakes {
            config = config.with_participants(snakes);
        }
        if let Some(command) = self.command {
            config = config.with_command(command);
        }
        if self.no_color {
            config = config.with_color(false);
        }
        if self.quiet || self.json {
            config = config.with_verbose(false);
        }
        if self.log {
            config = config.with_log(true);
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let json = args.json;
    let config = args.into_configuration();

    if config.log() {
        let file = init_logger()?;
        eprintln!("logging to {file}");
    }

    let tournament = Tournament::new(config).context("invalid configuration")?;
    let style = ReportStyle::from_color(tournament.config().color());
    let mut source = CommandMatchSource::new(tournament.config());
    let summary = tournament
        .run(&mut source)
        .context("tournament aborted")?;

    let report = summary.stats.report();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("could not serialize the report")?
        );
    } else {
        println!("\n{}", render(&report, style, Some(summary.elapsed)));
    }
    Ok(())
}
