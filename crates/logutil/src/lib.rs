//! Utilities for logging.

use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    HumanReadable,
    Json,
}

/// Configure the global tracing subscriber.
///
/// `default_level` is used unless overridden by `RUST_LOG`. Errors from
/// setting the subscriber are ignored (a subscriber may already be set, e.g.
/// when called more than once in tests).
pub fn configure_global_logger<W>(default_level: Level, format: LogFormat, writer: W)
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(default_level).into())
        .from_env_lossy();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true);

    let _ = match format {
        LogFormat::HumanReadable => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

/// Parse a log level from a string, defaulting to INFO for anything
/// unrecognized.
pub fn level_from_str(s: &str) -> Level {
    s.parse().unwrap_or(Level::INFO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_levels() {
        assert_eq!(Level::TRACE, level_from_str("trace"));
        assert_eq!(Level::DEBUG, level_from_str("DEBUG"));
        assert_eq!(Level::INFO, level_from_str("not a level"));
    }

    #[test]
    fn configure_twice() {
        configure_global_logger(Level::DEBUG, LogFormat::HumanReadable, std::io::stderr);
        configure_global_logger(Level::DEBUG, LogFormat::Json, std::io::stderr);
    }
}
