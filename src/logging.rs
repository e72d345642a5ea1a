use clap::ValueEnum;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    fn default_filter(self) -> String {
        format!("breakeven={}", self.as_str())
    }
}

/// Installs a stderr subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: LogLevel) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.default_filter()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .compact(),
        )
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_level_builds_a_valid_filter() {
        for level in LogLevel::value_variants() {
            let directive = level.default_filter();
            assert!(
                EnvFilter::try_new(&directive).is_ok(),
                "invalid directive {directive}"
            );
        }
    }

    #[test]
    fn level_names_parse_case_insensitively() {
        assert_eq!(LogLevel::from_str("debug", true), Ok(LogLevel::Debug));
        assert_eq!(LogLevel::from_str("WARN", true), Ok(LogLevel::Warn));
        assert!(LogLevel::from_str("verbos", true).is_err());
    }
}
