//! Error types for the pdf2chunks library.
//!
//! A single fatal error enum covers the whole pipeline. This tool is
//! deliberately all-or-nothing: a page that cannot be converted aborts the
//! run rather than producing a document with silent holes, because a chunk
//! stream with missing spans poisons downstream retrieval in ways that are
//! hard to detect. The one non-fatal degradation — an unavailable VLM
//! provider — is handled before conversion starts by falling back to the
//! standard pipeline, and never surfaces here.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2chunks library.
#[derive(Debug, Error)]
pub enum Pdf2ChunksError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install the pdfium shared library and either place it next to the binary\n\
or set PDFIUM_DYNAMIC_LIB_PATH to the directory that contains it."
    )]
    PdfiumBindingFailed(String),

    /// pdfium could not extract the text layer of a page.
    #[error("Text extraction failed for page {page}: {detail}")]
    TextExtractionFailed { page: usize, detail: String },

    /// pdfium-render returned an error while rasterising a page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── VLM errors ────────────────────────────────────────────────────────
    /// The requested provider could not be created (missing API key etc.).
    ///
    /// Raised only when a caller asks for a provider directly; the
    /// orchestration layer degrades to the standard pipeline instead of
    /// propagating this.
    #[error("VLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The vision model failed to transcribe a page.
    #[error("VLM transcription failed for page {page}: {detail}")]
    PageConversionFailed { page: usize, detail: String },

    // ── Orchestration errors ──────────────────────────────────────────────
    /// The conversion stage exceeded the configured deadline.
    #[error("Conversion timed out after {secs}s\nRaise --timeout, cap pages with --max-pages, or use a faster model.")]
    ConversionTimeout { secs: u64 },

    /// The chunking stage failed (tokenizer initialisation, splitter error).
    #[error("Chunking failed: {0}")]
    ChunkingFailed(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write a side-export file.
    #[error("Failed to write export file '{path}': {source}")]
    ExportWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the primary output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_display() {
        let e = Pdf2ChunksError::FileNotFound {
            path: PathBuf::from("/tmp/missing.pdf"),
        };
        let msg = e.to_string();
        assert!(msg.contains("/tmp/missing.pdf"), "got: {msg}");
    }

    #[test]
    fn not_a_pdf_shows_magic() {
        let e = Pdf2ChunksError::NotAPdf {
            path: PathBuf::from("doc.pdf"),
            magic: *b"PK\x03\x04",
        };
        assert!(e.to_string().contains("not a valid PDF"));
    }

    #[test]
    fn timeout_display() {
        let e = Pdf2ChunksError::ConversionTimeout { secs: 300 };
        assert!(e.to_string().contains("300s"));
        assert!(e.to_string().contains("--timeout"));
    }

    #[test]
    fn provider_not_configured_display() {
        let e = Pdf2ChunksError::ProviderNotConfigured {
            provider: "anthropic".into(),
            hint: "set ANTHROPIC_API_KEY".into(),
        };
        assert!(e.to_string().contains("anthropic"));
        assert!(e.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn output_write_failed_keeps_source() {
        use std::error::Error as _;
        let e = Pdf2ChunksError::OutputWriteFailed {
            path: PathBuf::from("out.json"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        assert!(e.source().is_some());
    }
}
