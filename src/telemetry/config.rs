#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub format: LogFormat,
    /// Fallback filter directive when `RUST_LOG` is not set
    pub default_filter: String,
}

impl TelemetryConfig {
    pub fn from_env() -> Self {
        let format = match std::env::var("APIFLOWS_LOG_FORMAT")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };

        let level = std::env::var("APIFLOWS_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());

        Self {
            format,
            default_filter: format!("apiflows={}", level),
        }
    }
}
