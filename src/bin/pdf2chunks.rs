//! CLI binary for pdf2chunks.
//!
//! A thin shim over the library crate that maps CLI flags to `RunConfig`,
//! drives convert → export → chunk → write, and prints status lines to
//! stderr. The primary output goes to `--output` only; stdout is never
//! written, so the tool composes cleanly in pipelines.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2chunks::{
    chunk_document, convert, export_document, Accelerator, ConversionProgressCallback,
    ExportFormat, RunConfig, TableMode,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a single bar over converted pages. Pages can
/// complete out-of-order in VLM mode, so the bar tracks a count, not a
/// position. indicatif draws to stderr and stays silent when stderr is not
/// a terminal.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Create a callback whose bar length is set by `on_conversion_start`
    /// once the page count is known.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
        self.bar.set_message("");
    }

    fn on_page_converted(&self, page_no: usize, total_pages: usize) {
        self.bar.set_message(format!("page {page_no}/{total_pages}"));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, _total_pages: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Chunk a PDF with the embedded text layer (no API key needed)
  pdf2chunks --input report.pdf --output report.chunks.json

  # Smaller chunks for short-context embedding models
  pdf2chunks --input report.pdf --output out.json --max-tokens 256

  # Scanned document: let a vision model read the pages
  pdf2chunks --input scan.pdf --output out.json --model gpt-4.1-nano --ocr

  # Keep the intermediate document next to the chunks
  pdf2chunks --input report.pdf --output out.json \
      --export-format both --export-folder ./converted

SUPPORTED MODELS:
  default        embedded text layer via pdfium (no network, no API key)
  gpt-4.1-nano   OpenAI      (OPENAI_API_KEY)
  gpt-4.1-mini   OpenAI      (OPENAI_API_KEY)
  claude-sonnet  Anthropic   (ANTHROPIC_API_KEY)
  gemini-flash   Google      (GEMINI_API_KEY)
  pixtral        Mistral     (MISTRAL_API_KEY)

  A model whose provider cannot be configured falls back to `default`
  with a warning; the run still produces chunks.

ENVIRONMENT VARIABLES:
  PDFIUM_DYNAMIC_LIB_PATH  Directory containing the pdfium shared library
  RUST_LOG                 Log filter (default: warn)
"#;

/// Chunk PDF documents into retrieval-ready JSON records.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2chunks",
    version,
    about = "Chunk PDF documents into retrieval-ready JSON records",
    long_about = "Convert a PDF into semantically coherent text chunks with heading and page \
metadata, ready for embedding or retrieval pipelines. Conversion uses the embedded text layer \
by default, or a Vision Language Model for scanned and complex documents.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input PDF file path.
    #[arg(long)]
    input: PathBuf,

    /// Output JSON file path.
    #[arg(long)]
    output: PathBuf,

    /// Conversion model: `default` for the embedded text layer, or one of
    /// the supported VLM names (see --help).
    #[arg(long, default_value = "default")]
    model: String,

    /// Number of worker threads (concurrent VLM page calls).
    #[arg(long, default_value_t = 4)]
    workers: usize,

    /// Accelerator device hint.
    #[arg(long, value_enum, default_value = "auto")]
    accelerator: AcceleratorArg,

    /// Conversion timeout in seconds (0 disables).
    #[arg(long, default_value_t = 300)]
    timeout: u64,

    /// Maximum pages to process (0 = unlimited).
    #[arg(long, default_value_t = 0)]
    max_pages: usize,

    /// Maximum tokens per chunk.
    #[arg(long, default_value_t = 512)]
    max_tokens: usize,

    /// Enable table structure extraction (default).
    #[arg(long, overrides_with = "no_tables")]
    tables: bool,

    /// Disable table structure extraction.
    #[arg(long, overrides_with = "tables")]
    no_tables: bool,

    /// Table extraction mode.
    #[arg(long, value_enum, default_value = "accurate")]
    table_mode: TableModeArg,

    /// Enable OCR for scanned documents (requires a VLM model).
    #[arg(long)]
    ocr: bool,

    /// Side-export format for the converted document.
    #[arg(long, value_enum, default_value = "none")]
    export_format: ExportFormatArg,

    /// Folder for side-exported documents.
    #[arg(long, default_value = "")]
    export_folder: String,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum AcceleratorArg {
    Auto,
    Cpu,
    Mps,
}

impl From<AcceleratorArg> for Accelerator {
    fn from(v: AcceleratorArg) -> Self {
        match v {
            AcceleratorArg::Auto => Accelerator::Auto,
            AcceleratorArg::Cpu => Accelerator::Cpu,
            AcceleratorArg::Mps => Accelerator::Mps,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum TableModeArg {
    Fast,
    Accurate,
}

impl From<TableModeArg> for TableMode {
    fn from(v: TableModeArg) -> Self {
        match v {
            TableModeArg::Fast => TableMode::Fast,
            TableModeArg::Accurate => TableMode::Accurate,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ExportFormatArg {
    None,
    Json,
    Markdown,
    Both,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(v: ExportFormatArg) -> Self {
        match v {
            ExportFormatArg::None => ExportFormat::None,
            ExportFormatArg::Json => ExportFormat::Json,
            ExportFormatArg::Markdown => ExportFormat::Markdown,
            ExportFormatArg::Both => ExportFormat::Both,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Library logs go to stderr behind RUST_LOG (default: warnings only);
    // the status lines below are the primary user feedback.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    // ── Validate input ───────────────────────────────────────────────────
    // The one user error with a defined exit code: missing input is 1, and
    // no output file is written.
    if !cli.input.exists() {
        eprintln!("Error: Input file not found: {}", cli.input.display());
        std::process::exit(1);
    }

    let tables = !cli.no_tables;
    let table_mode: TableMode = cli.table_mode.into();

    eprintln!("Converting document: {}", cli.input.display());
    eprintln!("  Model: {}", cli.model);
    eprintln!("  Workers: {}", cli.workers);
    eprintln!("  Accelerator: {}", Accelerator::from(cli.accelerator));
    eprintln!("  Tables: {tables} ({table_mode})");
    eprintln!("  OCR: {}", cli.ocr);

    // ── Build config ─────────────────────────────────────────────────────
    let progress = CliProgressCallback::new_dynamic();
    let config = RunConfig::builder()
        .model(cli.model.as_str())
        .workers(cli.workers)
        .accelerator(cli.accelerator.into())
        .ocr(cli.ocr)
        .tables(tables)
        .table_mode(table_mode)
        .timeout_secs(cli.timeout)
        .max_pages(cli.max_pages)
        .max_tokens(cli.max_tokens)
        .progress_callback(progress as Arc<dyn ConversionProgressCallback>)
        .build()
        .context("Invalid configuration")?;

    // ── Convert ──────────────────────────────────────────────────────────
    let doc = convert(&cli.input, &config)
        .await
        .context("Conversion failed")?;

    let source_name = cli
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    // ── Optional side-export ─────────────────────────────────────────────
    let exported = export_document(
        &doc,
        &source_name,
        cli.export_format.into(),
        &cli.export_folder,
    )
    .await
    .context("Export failed")?;
    for path in &exported {
        eprintln!("Exported to: {}", path.display());
    }

    // ── Chunk and write ──────────────────────────────────────────────────
    eprintln!("Chunking document...");
    let chunks =
        chunk_document(&doc, &source_name, config.max_tokens).context("Chunking failed")?;

    chunks
        .write_to_file(&cli.output)
        .await
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    eprintln!(
        "Wrote {} chunks to {}",
        chunks.total_chunks,
        cli.output.display()
    );

    Ok(())
}
