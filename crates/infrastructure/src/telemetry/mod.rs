//! Telemetry bootstrap
//!
//! Initializes the tracing subscriber for the whole process: an `EnvFilter`
//! honoring `RUST_LOG` with a configurable fallback, and either a
//! human-readable or JSON fmt layer.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Telemetry configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Log format: "json" or "text"
    pub log_format: String,
    /// Filter directive used when RUST_LOG is unset
    pub default_directive: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            default_directive: "visage_server=debug,tower_http=debug".to_string(),
        }
    }
}

/// Initialize the global tracing subscriber
///
/// Must be called at most once per process; typically from `main`.
pub fn init_telemetry(config: &TelemetryConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_directive));

    if config.log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
