//! Run configuration for PDF chunking.
//!
//! All behaviour is controlled through [`RunConfig`], built via its
//! [`RunConfigBuilder`]. Keeping every knob in one immutable struct makes it
//! trivial to share configs across threads, log them, and diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field. The
//! builder lets callers set only what they care about and rely on the
//! documented defaults for the rest.

use crate::error::Pdf2ChunksError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for one conversion-and-chunking run.
///
/// Built via [`RunConfig::builder()`] or [`RunConfig::default()`].
/// Constructed once per invocation and never mutated afterwards.
///
/// # Example
/// ```rust
/// use pdf2chunks::RunConfig;
///
/// let config = RunConfig::builder()
///     .model("claude-sonnet")
///     .workers(8)
///     .max_tokens(256)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct RunConfig {
    /// Model selector. `"default"` (or any name not in the model table)
    /// selects the standard pdfium text pipeline; a known VLM name selects
    /// the vision pipeline. Default: `"default"`.
    pub model: String,

    /// Worker count. Drives the number of concurrent VLM page calls; the
    /// pdfium text backend is single-threaded and ignores it. Default: 4.
    pub workers: usize,

    /// Accelerator hint. Recorded and logged for run reproducibility; the
    /// remote VLM providers and pdfium have no device selection, so neither
    /// backend consumes it. Default: [`Accelerator::Auto`].
    pub accelerator: Accelerator,

    /// OCR request flag. OCR is inherent to the VLM pipeline. The standard
    /// pipeline cannot run OCR — with this flag set, pages that yield no
    /// embedded text are reported with a hint to pick a VLM model.
    /// Default: false.
    pub ocr: bool,

    /// Whether table structure should be preserved. Shapes the VLM system
    /// prompt (see [`crate::prompts`]). Default: true.
    pub tables: bool,

    /// Table fidelity when `tables` is set. `Accurate` asks the VLM for GFM
    /// tables with an HTML fallback for complex ones; `Fast` asks for plain
    /// pipe tables only. Default: [`TableMode::Accurate`].
    pub table_mode: TableMode,

    /// Conversion deadline in seconds; `0` disables it. The deadline covers
    /// the conversion stage only, not export or chunking. Default: 300.
    pub timeout_secs: u64,

    /// Maximum number of pages to convert; `0` means unlimited. Default: 0.
    pub max_pages: usize,

    /// Maximum tokens per chunk, measured with a cl100k tokenizer.
    /// Default: 512.
    pub max_tokens: usize,

    /// Optional progress callback fired per converted page.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            model: crate::models::DEFAULT_MODEL.to_string(),
            workers: 4,
            accelerator: Accelerator::default(),
            ocr: false,
            tables: true,
            table_mode: TableMode::default(),
            timeout_secs: 300,
            max_pages: 0,
            max_tokens: 512,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("model", &self.model)
            .field("workers", &self.workers)
            .field("accelerator", &self.accelerator)
            .field("ocr", &self.ocr)
            .field("tables", &self.tables)
            .field("table_mode", &self.table_mode)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_pages", &self.max_pages)
            .field("max_tokens", &self.max_tokens)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl RunConfig {
    /// Create a new builder for `RunConfig`.
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RunConfig`].
#[derive(Debug)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn workers(mut self, n: usize) -> Self {
        self.config.workers = n.max(1);
        self
    }

    pub fn accelerator(mut self, accel: Accelerator) -> Self {
        self.config.accelerator = accel;
        self
    }

    pub fn ocr(mut self, v: bool) -> Self {
        self.config.ocr = v;
        self
    }

    pub fn tables(mut self, v: bool) -> Self {
        self.config.tables = v;
        self
    }

    pub fn table_mode(mut self, mode: TableMode) -> Self {
        self.config.table_mode = mode;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn max_pages(mut self, n: usize) -> Self {
        self.config.max_pages = n;
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n.max(1);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RunConfig, Pdf2ChunksError> {
        let c = &self.config;
        if c.workers == 0 {
            return Err(Pdf2ChunksError::InvalidConfig("Workers must be ≥ 1".into()));
        }
        if c.max_tokens == 0 {
            return Err(Pdf2ChunksError::InvalidConfig(
                "Max tokens per chunk must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Device hint for local inference backends.
///
/// Carried on the config for run reproducibility. Neither the remote VLM
/// providers nor pdfium select a device, so the hint is logged and
/// otherwise inert in this implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accelerator {
    /// Let the backend decide (default).
    #[default]
    Auto,
    /// Force CPU.
    Cpu,
    /// Apple Metal Performance Shaders.
    Mps,
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accelerator::Auto => write!(f, "auto"),
            Accelerator::Cpu => write!(f, "cpu"),
            Accelerator::Mps => write!(f, "mps"),
        }
    }
}

/// Table extraction fidelity for the VLM pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableMode {
    /// Plain GFM pipe tables only; no HTML fallback.
    Fast,
    /// GFM tables with alignment markers and an HTML fallback for complex
    /// tables (default).
    #[default]
    Accurate,
}

impl fmt::Display for TableMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableMode::Fast => write!(f, "fast"),
            TableMode::Accurate => write!(f, "accurate"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_table() {
        let c = RunConfig::default();
        assert_eq!(c.model, "default");
        assert_eq!(c.workers, 4);
        assert_eq!(c.accelerator, Accelerator::Auto);
        assert!(!c.ocr);
        assert!(c.tables);
        assert_eq!(c.table_mode, TableMode::Accurate);
        assert_eq!(c.timeout_secs, 300);
        assert_eq!(c.max_pages, 0);
        assert_eq!(c.max_tokens, 512);
    }

    #[test]
    fn builder_clamps_workers() {
        let c = RunConfig::builder().workers(0).build().unwrap();
        assert_eq!(c.workers, 1);
    }

    #[test]
    fn builder_clamps_max_tokens() {
        let c = RunConfig::builder().max_tokens(0).build().unwrap();
        assert_eq!(c.max_tokens, 1);
    }

    #[test]
    fn builder_sets_fields() {
        let c = RunConfig::builder()
            .model("pixtral")
            .ocr(true)
            .tables(false)
            .table_mode(TableMode::Fast)
            .timeout_secs(0)
            .max_pages(10)
            .build()
            .unwrap();
        assert_eq!(c.model, "pixtral");
        assert!(c.ocr);
        assert!(!c.tables);
        assert_eq!(c.table_mode, TableMode::Fast);
        assert_eq!(c.timeout_secs, 0);
        assert_eq!(c.max_pages, 10);
    }

    #[test]
    fn accelerator_display_round_trip() {
        assert_eq!(Accelerator::Auto.to_string(), "auto");
        assert_eq!(Accelerator::Cpu.to_string(), "cpu");
        assert_eq!(Accelerator::Mps.to_string(), "mps");
    }
}
