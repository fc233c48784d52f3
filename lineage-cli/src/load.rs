//! Reading documents and configuration from disk.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lineage::Document;
use lineage_validator::ValidatorConfig;

/// Serialized document formats the CLI reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.yaml` and `.yml` files are YAML; everything else is read as JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Parse a document from text in the given format.
///
/// # Errors
///
/// Returns an error if the text is not a valid serialized document.
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<Document> {
    let doc = match format {
        DocumentFormat::Json => serde_json::from_str(content)?,
        DocumentFormat::Yaml => serde_saphyr::from_str(content)?,
    };
    Ok(doc)
}

/// Read and parse a document file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_document(path: &Path) -> Result<Document> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let format = DocumentFormat::from_path(path);
    let doc = parse_document(&content, format)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        records = doc.record_count(),
        "loaded document"
    );
    Ok(doc)
}

/// Read a JSON validator configuration. Missing fields keep their defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON.
pub fn load_config(path: &Path) -> Result<ValidatorConfig> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid configuration in {}", path.display()))
}
