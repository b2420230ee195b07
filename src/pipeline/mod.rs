//! Pipeline stages for PDF conversion.
//!
//! Each submodule implements exactly one transformation step, so stages are
//! independently testable and a backend can be swapped without touching the
//! others.
//!
//! ## Data Flow
//!
//! ```text
//! standard:  input ──▶ extract ─────────────────────────▶ document items
//!            (path)    (pdfium text layer)
//!
//! VLM:       input ──▶ render ──▶ encode ──▶ vlm ──▶ postprocess ──▶ items
//!            (path)    (pdfium)   (base64)   (vision)  (cleanup)
//! ```
//!
//! 1. [`input`]   — validate the user-supplied path (existence, magic bytes)
//! 2. [`extract`] — pdfium text-layer extraction; runs in `spawn_blocking`
//!    because pdfium is not async-safe
//! 3. [`render`]  — rasterise pages for the VLM pipeline
//! 4. [`encode`]  — PNG-encode and base64-wrap each page image
//! 5. [`vlm`]     — concurrent vision calls; the only stage with network I/O
//! 6. [`postprocess`] — deterministic cleanup of VLM markdown before it is
//!    ingested into document items

pub mod encode;
pub mod extract;
pub mod input;
pub mod postprocess;
pub mod render;
pub mod vlm;
