use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiFlowsError {
    #[error("Failed to load workflows document: {0}")]
    DocumentLoadError(String),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Telemetry error: {0}")]
    TelemetryError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ApiFlowsError>;
