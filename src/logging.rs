//! Logger setup: timestamped lines on stderr via fern.

use log::LevelFilter;
use std::env;

/// Environment variable overriding the log level.
pub const LOG_LEVEL_VAR: &str = "PITWALL_LOG";

/// Parse a level name; unknown names fall back to `Info`.
pub fn parse_level(name: &str) -> LevelFilter {
    match name.trim().to_ascii_uppercase().as_str() {
        "OFF" => LevelFilter::Off,
        "ERROR" => LevelFilter::Error,
        "WARN" => LevelFilter::Warn,
        "DEBUG" => LevelFilter::Debug,
        "TRACE" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Level from `PITWALL_LOG` if set, otherwise `default`.
pub fn level_from_env(default: LevelFilter) -> LevelFilter {
    env::var(LOG_LEVEL_VAR)
        .map(|value| parse_level(&value))
        .unwrap_or(default)
}

pub fn setup_logging(level: LevelFilter) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .level(level)
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .chain(std::io::stderr())
        .apply()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("WARN"), LevelFilter::Warn);
        assert_eq!(parse_level(" trace "), LevelFilter::Trace);
        assert_eq!(parse_level("loud"), LevelFilter::Info);
    }
}
