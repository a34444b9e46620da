//! Logging setup for the binary.
//!
//! Logs go to stderr so stdout carries only the conversation transcript.
//! Default level is `weather_agent=info,toolgraph=info` when `RUST_LOG` is not set.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "weather_agent=info,toolgraph=info";

/// Installs the global subscriber. Calling it twice is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init();
}
