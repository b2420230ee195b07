//! Page rasterisation for the VLM pipeline.
//!
//! ## Why cap pixels, not DPI?
//!
//! Page sizes vary wildly: an A0 poster rendered at a fixed DPI could
//! produce a 13 000 × 18 000 px image and exhaust memory. Capping the
//! longest edge keeps allocations bounded regardless of physical page size,
//! and 2 000 px sits in the sweet spot where vision models can still read
//! fine print while request bodies stay under API upload limits.

use crate::error::Pdf2ChunksError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Longest-edge pixel cap for rendered pages.
const MAX_RENDERED_PIXELS: i32 = 2000;

/// Rasterise the first `limit` pages of a PDF into images.
///
/// Runs inside `spawn_blocking` since pdfium operations are CPU-bound.
///
/// # Returns
/// A vector of `(page_index_0based, DynamicImage)` tuples in page order.
pub async fn rasterize_pages(
    pdf_path: &Path,
    limit: usize,
) -> Result<Vec<(usize, DynamicImage)>, Pdf2ChunksError> {
    let path = pdf_path.to_path_buf();

    tokio::task::spawn_blocking(move || rasterize_pages_blocking(&path, limit))
        .await
        .map_err(|e| Pdf2ChunksError::Internal(format!("Render task panicked: {e}")))?
}

fn rasterize_pages_blocking(
    pdf_path: &Path,
    limit: usize,
) -> Result<Vec<(usize, DynamicImage)>, Pdf2ChunksError> {
    let pdfium = super::extract::bind_pdfium()?;

    let document =
        pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| Pdf2ChunksError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: format!("{e:?}"),
            })?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    let limit = limit.min(total_pages);
    info!("Rasterising {} of {} pages", limit, total_pages);

    let render_config = PdfRenderConfig::new()
        .set_target_width(MAX_RENDERED_PIXELS)
        .set_maximum_height(MAX_RENDERED_PIXELS);

    let mut results = Vec::with_capacity(limit);

    for idx in 0..limit {
        let page = pages
            .get(idx as u16)
            .map_err(|e| Pdf2ChunksError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{e:?}"),
            })?;

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            Pdf2ChunksError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{e:?}"),
            }
        })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            idx + 1,
            image.width(),
            image.height()
        );

        results.push((idx, image));
    }

    Ok(results)
}
