//! Conversion entry points: PDF in, structured document out.
//!
//! Control flow is strictly linear — validate, select a pipeline, convert —
//! with no branching back and no retries. The only non-fatal degradation
//! happens before conversion starts: a VLM model whose provider cannot be
//! instantiated (missing API key, unsupported provider id) logs a warning
//! and falls back to the standard text pipeline, so the run still produces
//! valid output.

use crate::config::RunConfig;
use crate::document::ConvertedDocument;
use crate::error::Pdf2ChunksError;
use crate::models::resolve_model;
use crate::pipeline::{extract, input, vlm};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Convert a PDF file into a [`ConvertedDocument`].
///
/// This is the primary entry point for the library. The pipeline is chosen
/// by `config.model`: `"default"` (or any unknown name) uses pdfium text
/// extraction, a model-table name uses the VLM pipeline. The configured
/// `timeout_secs` deadline covers the conversion stage; `0` disables it.
///
/// # Errors
/// Returns `Err(Pdf2ChunksError)` for all failures: missing/invalid input,
/// corrupt PDF, a failed page conversion, or an elapsed deadline. There is
/// no partial output.
pub async fn convert(
    pdf_path: impl AsRef<Path>,
    config: &RunConfig,
) -> Result<ConvertedDocument, Pdf2ChunksError> {
    let pdf_path = input::validate_input(pdf_path.as_ref())?;
    info!("Converting {} (model: {})", pdf_path.display(), config.model);

    if config.timeout_secs > 0 {
        tokio::time::timeout(
            Duration::from_secs(config.timeout_secs),
            run_pipeline(&pdf_path, config),
        )
        .await
        .map_err(|_| Pdf2ChunksError::ConversionTimeout {
            secs: config.timeout_secs,
        })?
    } else {
        run_pipeline(&pdf_path, config).await
    }
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    pdf_path: impl AsRef<Path>,
    config: &RunConfig,
) -> Result<ConvertedDocument, Pdf2ChunksError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2ChunksError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(convert(pdf_path, config))
}

/// Select and run the conversion pipeline for a validated input path.
async fn run_pipeline(
    pdf_path: &Path,
    config: &RunConfig,
) -> Result<ConvertedDocument, Pdf2ChunksError> {
    // ── Step 1: Document metadata ────────────────────────────────────────
    let metadata = extract::extract_metadata(pdf_path).await?;
    info!("PDF has {} pages", metadata.page_count);

    // ── Step 2: Pipeline selection ───────────────────────────────────────
    let spec = resolve_model(&config.model);

    // ── Step 3: Convert ──────────────────────────────────────────────────
    match spec {
        None => extract::extract_document(pdf_path, config, metadata).await,
        Some(spec) => match vlm::create_provider(spec) {
            Ok(provider) => vlm::convert_document(pdf_path, provider, config, metadata).await,
            Err(e) => {
                warn!("{}: falling back to the standard text pipeline", e);
                extract::extract_document(pdf_path, config, metadata).await
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;

    #[tokio::test]
    async fn missing_input_is_file_not_found() {
        let config = RunConfig::default();
        let err = convert("/no/such/file.pdf", &config).await.unwrap_err();
        assert!(matches!(err, Pdf2ChunksError::FileNotFound { .. }));
    }
}
