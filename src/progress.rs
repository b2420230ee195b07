//! Progress-callback trait for per-page conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::RunConfigBuilder::progress_callback`] to receive events
//! as the pipeline converts each page. Callbacks are the least-invasive
//! integration point: the CLI forwards them to a terminal progress bar, a
//! host application could forward them to a channel or a log — without the
//! library knowing how the host communicates.
//!
//! Page failures abort the run, so there is no per-page error event; a
//! failed conversion surfaces as the `Err` returned by
//! [`crate::convert::convert`].

use std::sync::Arc;

/// Called by the conversion pipeline as it processes each page.
///
/// Implementations must be `Send + Sync`: with a VLM model pages are
/// converted concurrently and `on_page_converted` may fire from several
/// tasks at once. All methods default to no-ops so callers only override
/// what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once, before any page is converted, with the number of pages
    /// the run will actually process (after the `max_pages` cap).
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called when a page has been converted.
    ///
    /// * `page_no` — 1-indexed page number
    /// * `total_pages` — pages in this run
    fn on_page_converted(&self, page_no: usize, total_pages: usize) {
        let _ = (page_no, total_pages);
    }

    /// Called once after every page has been converted.
    fn on_conversion_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RunConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
