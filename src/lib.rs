//! # pdf2chunks
//!
//! Convert PDF documents into retrieval-ready text chunks with heading and
//! page metadata.
//!
//! ## Why this crate?
//!
//! Embedding pipelines want semantically coherent spans of text, not raw
//! pages. This crate converts a PDF into a structured document — either by
//! extracting embedded text via pdfium, or by letting a Vision Language
//! Model read rasterised pages — and then delegates chunk boundary
//! selection to a hierarchical markdown splitter with a token budget. The
//! output is a flat JSON record per chunk: a unique id, the chunk text, and
//! a metadata block (index, source filename, heading trail, page number).
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    validate the local file (existence, %PDF magic)
//!  ├─ 2. Convert  standard: pdfium text extraction per page
//!  │              VLM:      rasterise → PNG/base64 → vision model per page
//!  ├─ 3. Export   optional <stem>.json / <stem>.md side-files
//!  ├─ 4. Chunk    hierarchical markdown splitting under a token budget
//!  └─ 5. Flatten  chunk records {id, text, metadata} → output JSON
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2chunks::{chunk_document, convert, RunConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RunConfig::default();
//!     let doc = convert("document.pdf", &config).await?;
//!     let chunks = chunk_document(&doc, "document.pdf", config.max_tokens)?;
//!     println!("{} chunks", chunks.total_chunks);
//!     Ok(())
//! }
//! ```
//!
//! ## Choosing a Model
//!
//! With `--model default` the embedded text layer of the PDF is used — fast,
//! free, and good enough for born-digital documents. Scanned documents and
//! complex layouts need a VLM:
//!
//! | Model name | Provider | Best for |
//! |------------|----------|----------|
//! | `gpt-4.1-nano` | openai | Fast, cheap default VLM |
//! | `gpt-4.1-mini` | openai | Balance of cost and accuracy |
//! | `claude-sonnet` | anthropic | Tables, complex layouts |
//! | `gemini-flash` | gemini | Alternative cheap option |
//! | `pixtral` | mistral | European hosting |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2chunks` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod chunker;
pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod export;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use chunker::chunk_document;
pub use config::{Accelerator, RunConfig, RunConfigBuilder, TableMode};
pub use convert::{convert, convert_sync};
pub use document::{ConvertedDocument, DocItem, DocumentMetadata, Heading, ItemBody, Provenance};
pub use error::Pdf2ChunksError;
pub use export::{export_document, ExportFormat};
pub use models::{resolve_model, VlmModelSpec, DEFAULT_MODEL};
pub use output::{ChunkDocument, ChunkMetadata, ChunkRecord};
pub use progress::{ConversionProgressCallback, ProgressCallback};
