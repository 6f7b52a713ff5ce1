use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber. Logs go to stderr so stdout stays clean for
/// command output.
///
/// # Errors
/// Returns an error if `RUST_LOG` or the configured level is not a valid
/// filter, or a subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = env_filter(rust_log.as_deref(), &config.level)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}

/// `RUST_LOG` wins when set and non-empty; a malformed value is an error.
fn env_filter(rust_log: Option<&str>, level: &str) -> Result<EnvFilter> {
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
        EnvFilter::try_new(directives)
            .with_context(|| format!("invalid {} '{directives}'", EnvFilter::DEFAULT_ENV))
    } else {
        EnvFilter::try_new(level).with_context(|| format!("invalid logging.level '{level}'"))
    }
}
