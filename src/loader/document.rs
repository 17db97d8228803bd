use crate::error::{ApiFlowsError, Result};
use crate::models::WorkflowsSpec;
use std::fs;
use std::path::Path;

/// Text format of a workflows document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Pick the format from a file extension (`.yaml`, `.yml` or `.json`)
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Ok(DocumentFormat::Yaml),
            Some("json") => Ok(DocumentFormat::Json),
            _ => Err(ApiFlowsError::UnsupportedFormat(format!(
                "{} (expected .yaml, .yml or .json)",
                path.display()
            ))),
        }
    }
}

/// Parse a workflows document without validating it
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<WorkflowsSpec> {
    let spec = match format {
        DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| {
            ApiFlowsError::DocumentLoadError(format!("Failed to parse workflows YAML: {}", e))
        })?,
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| {
            ApiFlowsError::DocumentLoadError(format!("Failed to parse workflows JSON: {}", e))
        })?,
    };

    Ok(spec)
}

/// Load a workflows document from a file
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<WorkflowsSpec> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path)?;

    let content = fs::read_to_string(path).map_err(|e| {
        ApiFlowsError::DocumentLoadError(format!("Failed to read file {}: {}", path.display(), e))
    })?;

    tracing::debug!(path = %path.display(), ?format, "Parsing workflows document");
    parse_document(&content, format)
}
