//! VLM pipeline: one vision call per rasterised page.
//!
//! Pages are independent transcription jobs, so they run concurrently with
//! `buffer_unordered(workers)` — vision APIs are network-bound and N
//! in-flight calls cut wall-clock time almost linearly. Any page failure
//! aborts the whole conversion: a chunk stream with a missing page is worse
//! than no output, and the process exit carries the provider's error text.

use crate::config::RunConfig;
use crate::document::{items_from_markdown, ConvertedDocument, DocumentMetadata};
use crate::error::Pdf2ChunksError;
use crate::models::VlmModelSpec;
use crate::pipeline::{encode, postprocess, render};
use edgequake_llm::{ChatMessage, CompletionOptions, ImageData, LLMProvider, ProviderFactory};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Sampling temperature for transcription. Near-zero keeps the model
/// faithful to what is on the page.
const TEMPERATURE: f32 = 0.1;

/// Output-token budget per page. Dense pages (tables, code listings) can
/// exceed 2 000 tokens; 4 096 covers the long tail without letting a
/// runaway response grow unbounded.
const PAGE_OUTPUT_TOKENS: usize = 4096;

/// Instantiate the provider for a model-table entry.
///
/// Fails when the factory cannot build the provider (unsupported provider
/// id, missing API key). The orchestration layer treats that failure as
/// non-fatal and degrades to the standard pipeline.
pub fn create_provider(spec: &VlmModelSpec) -> Result<Arc<dyn LLMProvider>, Pdf2ChunksError> {
    ProviderFactory::create_llm_provider(spec.provider, spec.model_id).map_err(|e| {
        Pdf2ChunksError::ProviderNotConfigured {
            provider: spec.provider.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Convert a PDF by transcribing each rasterised page with the vision
/// model, then ingesting the per-page markdown into document items.
pub async fn convert_document(
    pdf_path: &Path,
    provider: Arc<dyn LLMProvider>,
    config: &RunConfig,
    metadata: DocumentMetadata,
) -> Result<ConvertedDocument, Pdf2ChunksError> {
    let limit = super::extract::effective_page_limit(metadata.page_count, config.max_pages);
    info!("VLM conversion: {} pages, {} workers", limit, config.workers);

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(limit);
    }

    let rendered = render::rasterize_pages(pdf_path, limit).await?;
    let system_prompt = crate::prompts::system_prompt(config);

    let mut pages: Vec<(usize, String)> = stream::iter(rendered.into_iter().map(|(idx, img)| {
        let provider = Arc::clone(&provider);
        let system_prompt = system_prompt.clone();
        let config = config.clone();
        async move {
            let page_no = idx + 1;
            let image =
                encode::encode_page(&img).map_err(|e| Pdf2ChunksError::RasterisationFailed {
                    page: page_no,
                    detail: format!("Image encoding failed: {e}"),
                })?;

            let markdown = transcribe_page(&provider, page_no, image, &system_prompt).await?;

            if let Some(ref cb) = config.progress_callback {
                cb.on_page_converted(page_no, limit);
            }
            Ok::<(usize, String), Pdf2ChunksError>((idx, markdown))
        }
    }))
    .buffer_unordered(config.workers)
    .try_collect()
    .await?;

    // buffer_unordered yields in completion order; restore page order.
    pages.sort_by_key(|(idx, _)| *idx);

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(limit);
    }

    let mut items = Vec::new();
    for (idx, markdown) in pages {
        let cleaned = postprocess::clean_markdown(&markdown);
        items.extend(items_from_markdown(&cleaned, idx as u32 + 1));
    }

    Ok(ConvertedDocument {
        metadata,
        items,
        pages_converted: limit,
    })
}

/// Transcribe a single page image to markdown.
///
/// The request is a system message carrying the transcription rules plus a
/// user message whose only content is the page image — vision APIs require
/// at least one user turn, and the image carries everything that matters.
async fn transcribe_page(
    provider: &Arc<dyn LLMProvider>,
    page_no: usize,
    image: ImageData,
    system_prompt: &str,
) -> Result<String, Pdf2ChunksError> {
    let messages = vec![
        ChatMessage::system(system_prompt),
        ChatMessage::user_with_images("", vec![image]),
    ];

    let options = CompletionOptions {
        temperature: Some(TEMPERATURE),
        max_tokens: Some(PAGE_OUTPUT_TOKENS),
        ..Default::default()
    };

    let response = provider.chat(&messages, Some(&options)).await.map_err(|e| {
        Pdf2ChunksError::PageConversionFailed {
            page: page_no,
            detail: format!("{e}"),
        }
    })?;

    debug!(
        "Page {}: {} input tokens, {} output tokens",
        page_no, response.prompt_tokens, response.completion_tokens
    );

    Ok(response.content)
}
