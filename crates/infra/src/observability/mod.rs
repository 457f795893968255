//! Log subscriber setup
//!
//! Library code only emits `tracing` events; the embedding application
//! decides whether and how they are printed by calling [`init_tracing`]
//! once at start-up.

use beautywiki_domain::constants::DEFAULT_LOG_FILTER;
use beautywiki_domain::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber
///
/// `RUST_LOG` wins over `config.filter`; an unparsable filter falls back to
/// `info`. Returns `false` when a global subscriber was already installed,
/// so calling this twice is harmless.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let result = if config.json {
        builder.json().with_current_span(true).try_init()
    } else {
        builder.compact().try_init()
    };

    match result {
        Ok(()) => {
            tracing::debug!(json = config.json, "Tracing initialized");
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_a_no_op() {
        let config = LoggingConfig { filter: "not a [valid filter".to_string(), json: false };
        init_tracing(&config);

        assert!(!init_tracing(&LoggingConfig::default()));
    }
}
