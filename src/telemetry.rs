//! Tracing subscriber setup

use config::{LogFormat, LoggingConfig};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::errors::CurioError;

/// Install a global tracing subscriber using the provided logging settings
///
/// `RUST_LOG` directives override the configured level. Calling this twice
/// returns an error instead of replacing the first subscriber.
pub fn init(logging: &LoggingConfig) -> Result<(), CurioError> {
    let default_level = parse_level(&logging.level)?;

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|err| CurioError::Telemetry(format!("failed to install tracing subscriber: {err}")))
}

fn parse_level(level: &str) -> Result<LevelFilter, CurioError> {
    level
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| CurioError::Telemetry(format!("unknown log level '{level}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("info").unwrap(), LevelFilter::INFO);
        assert_eq!(parse_level(" WARN ").unwrap(), LevelFilter::WARN);
        assert!(parse_level("chatty").is_err());
    }

    #[test]
    fn test_second_init_fails() {
        let logging = LoggingConfig::default();
        // another test may have installed the subscriber first
        let _ = init(&logging);
        assert!(init(&logging).is_err());
    }
}
