//! Tracing subscriber bootstrap.

use bookstore_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
///
/// Fails if a global subscriber is already installed.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(&settings.log_level)))?;

    let registry = tracing_subscriber::registry().with(filter);
    match settings.log_format {
        LogFormat::Pretty => registry.with(fmt::layer()).try_init()?,
        LogFormat::Json => registry.with(fmt::layer().json()).try_init()?,
    }

    tracing::info!(
        target: "bookstore-telemetry",
        level = %settings.log_level,
        format = ?settings.log_format,
        "telemetry initialized"
    );
    Ok(())
}

fn default_directives(level: &str) -> String {
    format!("{level},tower_http={level},sqlx=warn")
}
