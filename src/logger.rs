use std::fs::File;

use anyhow::Context;
use time::{format_description::parse, OffsetDateTime, UtcOffset};
use tracing::{subscriber::set_global_default, Level};
use tracing_subscriber::{
    fmt::{time::OffsetTime, writer::BoxMakeWriter},
    FmtSubscriber,
};

const LOG_FILE_FORMAT: &str = "[year]-[month]-[day]_[hour]:[minute]:[second]_log.txt";
const EVENT_TIME_FORMAT: &str = "[year]-[month]-[day] [hour]:[minute]:[second]";

/// Sends every tracing event of the run to a new `<date>_<time>_log.txt` file in the
/// current directory, and returns the file name.
///
/// Falls back to UTC when the local offset cannot be determined.
pub fn init_logger() -> anyhow::Result<String> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let file_name = log_file_name(OffsetDateTime::now_utc().to_offset(offset))?;
    let file = File::create(&file_name)
        .with_context(|| format!("could not create log file '{file_name}'"))?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .with_timer(OffsetTime::new(offset, parse(EVENT_TIME_FORMAT)?))
        .with_writer(BoxMakeWriter::new(file))
        .finish();

    set_global_default(subscriber)
        .context("a global tracing subscriber is already installed, run without --log")?;
    Ok(file_name)
}

fn log_file_name(now: OffsetDateTime) -> anyhow::Result<String> {
    Ok(now.format(&parse(LOG_FILE_FORMAT)?)?)
}
