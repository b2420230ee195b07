//! Optional side-export of the converted document.
//!
//! Export happens between conversion and chunking and never touches the
//! primary output: it exists so users can inspect (or cache) what the
//! converter saw before chunk boundaries are applied. Files are named from
//! the input stem — `report.pdf` exports as `report.json` / `report.md`.

use crate::document::ConvertedDocument;
use crate::error::Pdf2ChunksError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Which side-export files to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// No side-exports (default).
    #[default]
    None,
    /// Pretty-printed dictionary export (`<stem>.json`).
    Json,
    /// Markdown export (`<stem>.md`).
    Markdown,
    /// Both of the above.
    Both,
}

impl ExportFormat {
    fn wants_json(self) -> bool {
        matches!(self, ExportFormat::Json | ExportFormat::Both)
    }

    fn wants_markdown(self) -> bool {
        matches!(self, ExportFormat::Markdown | ExportFormat::Both)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::None => write!(f, "none"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Markdown => write!(f, "markdown"),
            ExportFormat::Both => write!(f, "both"),
        }
    }
}

/// Write the requested side-export files for a converted document.
///
/// No-op when `format` is [`ExportFormat::None`] or `folder` is empty. The
/// folder (and parents) are created if absent. Returns the list of files
/// written.
pub async fn export_document(
    doc: &ConvertedDocument,
    source_name: &str,
    format: ExportFormat,
    folder: &str,
) -> Result<Vec<PathBuf>, Pdf2ChunksError> {
    if format == ExportFormat::None || folder.is_empty() {
        return Ok(Vec::new());
    }

    let folder = PathBuf::from(folder);
    tokio::fs::create_dir_all(&folder)
        .await
        .map_err(|e| Pdf2ChunksError::ExportWriteFailed {
            path: folder.clone(),
            source: e,
        })?;

    let stem = Path::new(source_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    let mut written = Vec::new();

    if format.wants_json() {
        let path = folder.join(format!("{stem}.json"));
        let body = serde_json::to_string_pretty(&doc.to_json_value())
            .map_err(|e| Pdf2ChunksError::Internal(format!("JSON export serialisation: {e}")))?;
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| Pdf2ChunksError::ExportWriteFailed {
                path: path.clone(),
                source: e,
            })?;
        info!("Exported JSON to {}", path.display());
        written.push(path);
    }

    if format.wants_markdown() {
        let path = folder.join(format!("{stem}.md"));
        tokio::fs::write(&path, doc.to_markdown())
            .await
            .map_err(|e| Pdf2ChunksError::ExportWriteFailed {
                path: path.clone(),
                source: e,
            })?;
        info!("Exported Markdown to {}", path.display());
        written.push(path);
    }

    Ok(written)
}
