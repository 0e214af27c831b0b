//! Tracing setup for the `playground` binary. Logs go to stderr.

use playground_config::{LogFormat, LoggingSection};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directives, overriding `logging.level`.
pub const LOG_ENV: &str = "PLAYGROUND_LOG";
/// `text` or `json`, overriding `logging.format`.
pub const LOG_FORMAT_ENV: &str = "PLAYGROUND_LOG_FORMAT";

pub fn init(section: &LoggingSection) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&section.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let format = std::env::var(LOG_FORMAT_ENV)
        .ok()
        .and_then(|v| v.parse::<LogFormat>().ok())
        .unwrap_or(section.format);

    let registry = tracing_subscriber::registry().with(filter);
    // A subscriber may already be installed; keep it.
    let _ = match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init(),
    };
}
