//! Logging for the sketch navigation executables
//!
//! Records go to the terminal with coloured level tags and to the session's log file as plain
//! text, both prefixed with the seconds elapsed since the session epoch.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::Colorize;
use log::{self, info, Level, Record};
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a log level at least as verbose as `INFO`, found `{0}`")]
    InvalidMinLogLevel(log::LevelFilter),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// # Notes
///
/// - `min_level` must be at least as verbose as `log::Level::Info`, so that
///   movement reports always reach the log file.
/// - Debug and trace records also show the module they came from, without the crate name.
///
/// # Safety
///
/// - This function must only be called once to prevent corrupting logs.
pub fn logger_init(
    min_level: self::LevelFilter,
    session: &session::Session,
) -> Result<(), LoggerInitError> {
    if min_level < log::Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level));
    }

    let log_file = fern::log_file(session.log_file_path.clone())
        .map_err(LoggerInitError::LogFileInitError)?;

    let terminal = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}",
                format_record(
                    session::get_elapsed_seconds(),
                    &level_tag(record.level()).to_string(),
                    record,
                    message
                )
            ))
        })
        .chain(std::io::stdout());

    let file = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}",
                format_record(
                    session::get_elapsed_seconds(),
                    plain_level_tag(record.level()),
                    record,
                    message
                )
            ))
        })
        .chain(log_file);

    fern::Dispatch::new()
        .level(min_level)
        .level_for("zmq", LevelFilter::Info)
        .level_for("rustyline", LevelFilter::Warn)
        .chain(terminal)
        .chain(file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session epoch: {}", session::get_epoch());
    info!("    Log level: {:?}", min_level);
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn format_record(
    elapsed_s: f64,
    level_tag: &str,
    record: &Record,
    message: &std::fmt::Arguments,
) -> String {
    if record.level() > Level::Info {
        format!(
            "[{:10.6} {}] {}: {}",
            elapsed_s,
            level_tag,
            short_target(record.target()),
            message
        )
    } else {
        format!("[{:10.6} {}] {}", elapsed_s, level_tag, message)
    }
}

/// Drop the crate name from a target, `sketch_lib::motion_exec` becomes `motion_exec`.
fn short_target(target: &str) -> &str {
    match target.find("::") {
        Some(i) => &target[i + 2..],
        None => target,
    }
}

fn plain_level_tag(level: Level) -> &'static str {
    match level {
        Level::Trace => "TRC",
        Level::Debug => "DBG",
        Level::Info => "INF",
        Level::Warn => "WRN",
        Level::Error => "ERR",
    }
}

fn level_tag(level: Level) -> colored::ColoredString {
    let tag = plain_level_tag(level);
    match level {
        Level::Trace => tag.dimmed().italic(),
        Level::Debug => tag.dimmed(),
        Level::Info => tag.normal(),
        Level::Warn => tag.yellow(),
        Level::Error => tag.red().bold(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_format_record() {
        let line = format_record(
            1.5,
            "DBG",
            &Record::builder()
                .level(Level::Debug)
                .target("sketch_lib::motion_exec")
                .build(),
            &format_args!("Goal in odom"),
        );
        assert_eq!(line, "[  1.500000 DBG] motion_exec: Goal in odom");

        let line = format_record(
            0.25,
            "INF",
            &Record::builder()
                .level(Level::Info)
                .target("sketch_exec")
                .build(),
            &format_args!("Arrived at the goal"),
        );
        assert_eq!(line, "[  0.250000 INF] Arrived at the goal");
    }
}
