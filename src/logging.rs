use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn env_filter(verbosity: u8) -> Result<EnvFilter> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    build_filter(rust_log.as_deref(), verbosity)
}

/// A non-empty `RUST_LOG` replaces the verbosity default entirely.
fn build_filter(rust_log: Option<&str>, verbosity: u8) -> Result<EnvFilter> {
    match rust_log.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("Invalid RUST_LOG: {}", directives)),
        None => EnvFilter::try_new(format!("mentors={}", level_for(verbosity)))
            .context("Invalid default log directive"),
    }
}

/// Logs to stderr. Used by every command except `browse`.
pub fn init(verbosity: u8) -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(verbosity)?)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("Failed to install log subscriber")
}

/// Logs to a daily file in `dir` so output never lands on the terminal UI.
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init_to_file(verbosity: u8, dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    let appender = tracing_appender::rolling::daily(dir, "mentors.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(verbosity)?)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .try_init()
        .context("Failed to install log subscriber")?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(1), "info");
        assert_eq!(level_for(2), "debug");
        assert_eq!(level_for(9), "debug");
    }

    #[test]
    fn test_default_filter_follows_verbosity() {
        let filter = build_filter(None, 0).unwrap();
        assert_eq!(filter.to_string(), "mentors=warn");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));

        let filter = build_filter(Some("  "), 2).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_rust_log_overrides_default() {
        let filter = build_filter(Some("mentors=debug"), 0).unwrap();
        assert_eq!(filter.to_string(), "mentors=debug");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));

        let filter = build_filter(Some("trace"), 0).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn test_invalid_rust_log_is_an_error() {
        let err = build_filter(Some("mentors=loud"), 0).unwrap_err();
        assert!(err.to_string().contains("Invalid RUST_LOG"));
    }
}
