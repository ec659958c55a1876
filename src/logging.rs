use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Configuration for the logging system.
pub struct LogConfig {
    /// Default log level when RUST_LOG is not set.
    pub log_level: Level,
    /// Whether to colour log output.
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            ansi: console::colors_enabled_stderr(),
        }
    }
}

/// Install a stderr subscriber.
///
/// Stdout is reserved for the `v<requested>,v<previous>` line, so every log
/// line goes to stderr. The filter is runtime configurable via RUST_LOG and
/// defaults to the configured level for this crate.
///
/// Calling this twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init_logging(config: LogConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("semver_tag={}", config.log_level)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi)
        .with_target(false)
        .with_filter(env_filter);

    let _ = tracing_subscriber::registry().with(stderr_layer).try_init();
}
