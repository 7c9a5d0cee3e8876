use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::EnvFilter;

const FALLBACK_LEVEL: &str = "warn";

/// Installs the global subscriber. `RUST_LOG` wins, then `--verbose`, then the configured level.
///
/// Records emitted through `log` are forwarded to the same subscriber.
pub fn init(verbose: bool, configured_level: Option<&str>) {
    let (default_level, rejected) = default_level(verbose, configured_level);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&default_level))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if let Some(level) = rejected {
        tracing::warn!(
            "Unknown log level {:?} in config, using {}",
            level,
            FALLBACK_LEVEL
        );
    }
}

/// Level used when `RUST_LOG` is unset, plus the configured value if it was not a level
fn default_level(verbose: bool, configured_level: Option<&str>) -> (String, Option<String>) {
    if verbose {
        return ("debug".to_string(), None);
    }

    match configured_level.map(str::trim) {
        None => (FALLBACK_LEVEL.to_string(), None),
        Some(raw) => match Level::from_str(raw) {
            Ok(level) => (level.to_string().to_ascii_lowercase(), None),
            Err(_) => (FALLBACK_LEVEL.to_string(), Some(raw.to_string())),
        },
    }
}
