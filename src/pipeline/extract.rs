//! Standard pipeline: pdfium text-layer extraction.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the work onto the blocking
//! thread pool so Tokio worker threads never stall on page parsing.
//!
//! ## What this backend does and does not do
//!
//! It reads the embedded text layer page by page and shapes it into
//! blank-line-delimited paragraph items. It does not run OCR and does not
//! reconstruct table structure — that level of page understanding is the
//! VLM pipeline's job. Scanned pages therefore come back empty here, which
//! is reported loudly rather than silently producing an empty chunk stream.

use crate::config::RunConfig;
use crate::document::{ConvertedDocument, DocItem, DocumentMetadata, Heading, Provenance};
use crate::error::Pdf2ChunksError;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Bind to a pdfium shared library: an explicit `PDFIUM_DYNAMIC_LIB_PATH`
/// directory first, then next to the executable, then the system library.
pub(crate) fn bind_pdfium() -> Result<Pdfium, Pdf2ChunksError> {
    let bindings = if let Ok(dir) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
    } else {
        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
    };

    bindings
        .map(Pdfium::new)
        .map_err(|e| Pdf2ChunksError::PdfiumBindingFailed(format!("{e:?}")))
}

/// Number of pages this run will convert, after the `max_pages` cap.
pub(crate) fn effective_page_limit(total_pages: usize, max_pages: usize) -> usize {
    if max_pages > 0 {
        total_pages.min(max_pages)
    } else {
        total_pages
    }
}

/// Extract the text layer of the PDF into a [`ConvertedDocument`].
///
/// Runs inside `spawn_blocking` since pdfium operations are CPU-bound.
pub async fn extract_document(
    pdf_path: &Path,
    config: &RunConfig,
    metadata: DocumentMetadata,
) -> Result<ConvertedDocument, Pdf2ChunksError> {
    let path = pdf_path.to_path_buf();
    let config = config.clone();

    tokio::task::spawn_blocking(move || extract_document_blocking(&path, &config, metadata))
        .await
        .map_err(|e| Pdf2ChunksError::Internal(format!("Extraction task panicked: {e}")))?
}

fn extract_document_blocking(
    pdf_path: &Path,
    config: &RunConfig,
    metadata: DocumentMetadata,
) -> Result<ConvertedDocument, Pdf2ChunksError> {
    let pdfium = bind_pdfium()?;

    let document =
        pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| Pdf2ChunksError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: format!("{e:?}"),
            })?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    let limit = effective_page_limit(total_pages, config.max_pages);
    info!(
        "Extracting text layer: {} of {} pages",
        limit, total_pages
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(limit);
    }

    let mut items = Vec::new();

    // The metadata title acts as the document-level heading; it has no page
    // provenance because it comes from the info dictionary, not a page.
    if let Some(title) = metadata.title.as_deref() {
        if !title.trim().is_empty() {
            items.push(DocItem::heading(
                Heading::Plain(title.trim().to_string()),
                vec![],
            ));
        }
    }

    for idx in 0..limit {
        let page_no = idx + 1;
        let page = pages
            .get(idx as u16)
            .map_err(|e| Pdf2ChunksError::TextExtractionFailed {
                page: page_no,
                detail: format!("{e:?}"),
            })?;

        let text = page
            .text()
            .map_err(|e| Pdf2ChunksError::TextExtractionFailed {
                page: page_no,
                detail: format!("{e:?}"),
            })?
            .all();

        let blocks = page_blocks(&text);
        if blocks.is_empty() {
            if config.ocr {
                warn!(
                    "Page {page_no} has no extractable text; OCR needs a VLM model (see --model)"
                );
            } else {
                warn!("Page {page_no} has no extractable text");
            }
        }
        debug!("Page {page_no}: {} text blocks", blocks.len());

        let prov = vec![Provenance {
            page_no: page_no as u32,
        }];
        for block in blocks {
            items.push(DocItem::paragraph(block, prov.clone()));
        }

        if let Some(ref cb) = config.progress_callback {
            cb.on_page_converted(page_no, limit);
        }
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(limit);
    }

    Ok(ConvertedDocument {
        metadata,
        items,
        pages_converted: limit,
    })
}

/// Split raw page text into blank-line-delimited blocks, normalising line
/// endings and dropping whitespace-only fragments.
fn page_blocks(text: &str) -> Vec<String> {
    let normalised = text.replace("\r\n", "\n").replace('\r', "\n");
    normalised
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(str::to_string)
        .collect()
}

/// Extract document metadata from a PDF without reading page content.
pub async fn extract_metadata(pdf_path: &Path) -> Result<DocumentMetadata, Pdf2ChunksError> {
    let path = pdf_path.to_path_buf();

    tokio::task::spawn_blocking(move || extract_metadata_blocking(&path))
        .await
        .map_err(|e| Pdf2ChunksError::Internal(format!("Metadata task panicked: {e}")))?
}

fn extract_metadata_blocking(pdf_path: &Path) -> Result<DocumentMetadata, Pdf2ChunksError> {
    let pdfium = bind_pdfium()?;

    let document =
        pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| Pdf2ChunksError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: format!("{e:?}"),
            })?;

    let metadata = document.metadata();
    let pages = document.pages();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    Ok(DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
        modification_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
        page_count: pages.len() as usize,
        pdf_version: format!("{:?}", document.version()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_limit_unlimited_when_zero() {
        assert_eq!(effective_page_limit(12, 0), 12);
    }

    #[test]
    fn page_limit_caps_large_documents() {
        assert_eq!(effective_page_limit(12, 5), 5);
        assert_eq!(effective_page_limit(3, 5), 3);
    }

    #[test]
    fn page_blocks_split_on_blank_lines() {
        let blocks = page_blocks("First block\nsecond line\n\nSecond block\r\n\r\nThird");
        assert_eq!(blocks, vec!["First block\nsecond line", "Second block", "Third"]);
    }

    #[test]
    fn page_blocks_drop_whitespace_only() {
        assert!(page_blocks("  \n\n\t\n\n").is_empty());
        assert!(page_blocks("").is_empty());
    }
}
