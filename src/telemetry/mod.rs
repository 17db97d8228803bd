mod config;

pub use config::{LogFormat, TelemetryConfig};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Logs go to stderr so reports on
/// stdout stay machine readable.
pub fn init_telemetry() -> crate::Result<()> {
    let config = TelemetryConfig::from_env();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };

    installed.map_err(|e| {
        crate::ApiFlowsError::TelemetryError(format!("Failed to install tracing subscriber: {}", e))
    })?;

    tracing::debug!(format = ?config.format, "Tracing initialized");
    Ok(())
}
