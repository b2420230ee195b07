//! Chunk the converted document and flatten the result into output records.
//!
//! Boundary selection is delegated entirely to `text-splitter`'s
//! [`MarkdownSplitter`], sized with a cl100k tokenizer so the token budget
//! matches what embedding models actually count. What this module adds is
//! attribution: the document is rendered to markdown once with per-item
//! byte spans, and each chunk's start offset is mapped back to the items it
//! covers to recover the heading trail and the page number.

use crate::document::{ConvertedDocument, DocItem, Heading, ItemBody, ItemSpan};
use crate::error::Pdf2ChunksError;
use crate::output::{ChunkDocument, ChunkMetadata, ChunkRecord};
use text_splitter::{ChunkConfig, MarkdownSplitter};
use tracing::{debug, info};
use uuid::Uuid;

/// Chunk a converted document under `max_tokens` and flatten each chunk
/// into a [`ChunkRecord`].
///
/// The splitter's output sequence is consumed exactly once, in order;
/// `chunk_index` is the position in that sequence. Chunks with no heading
/// context get an empty heading list, and chunks whose first covered item
/// has no page provenance get `page: None` — both are valid outcomes, not
/// errors.
pub fn chunk_document(
    doc: &ConvertedDocument,
    source: &str,
    max_tokens: usize,
) -> Result<ChunkDocument, Pdf2ChunksError> {
    let (markdown, spans) = doc.render_with_spans();

    let tokenizer = tiktoken_rs::cl100k_base()
        .map_err(|e| Pdf2ChunksError::ChunkingFailed(format!("tokenizer init: {e}")))?;
    let splitter = MarkdownSplitter::new(ChunkConfig::new(max_tokens).with_sizer(tokenizer));

    let mut chunks = Vec::new();
    for (chunk_index, (offset, text)) in splitter.chunk_indices(&markdown).enumerate() {
        let first_item = first_covered_item(&spans, offset);
        let headings = match first_item {
            Some(idx) => heading_trail(&doc.items, idx),
            None => Vec::new(),
        };
        let page = first_item.and_then(|idx| doc.items[idx].page());

        debug!(
            "Chunk {}: {} bytes, {} headings, page {:?}",
            chunk_index,
            text.len(),
            headings.len(),
            page
        );

        chunks.push(ChunkRecord {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            metadata: ChunkMetadata {
                chunk_index,
                source: source.to_string(),
                headings,
                page,
            },
        });
    }

    info!("Produced {} chunks from {}", chunks.len(), source);

    Ok(ChunkDocument {
        source: source.to_string(),
        total_chunks: chunks.len(),
        chunks,
    })
}

/// Index of the first item whose span overlaps or follows `offset`.
///
/// The splitter trims leading whitespace, so a chunk offset normally lands
/// inside an item span; if it lands in an inter-item gap, the chunk's
/// content starts with the next item.
fn first_covered_item(spans: &[ItemSpan], offset: usize) -> Option<usize> {
    let idx = spans.partition_point(|s| s.end <= offset);
    (idx < spans.len()).then_some(idx)
}

/// Heading trail active at item `last` (inclusive).
///
/// Leveled headings maintain an outline stack: a new heading pops every
/// entry at its level or deeper before pushing itself. Plain headings are
/// document-level and reset the trail.
fn heading_trail(items: &[DocItem], last: usize) -> Vec<String> {
    let mut trail: Vec<(u8, &str)> = Vec::new();

    for item in &items[..=last] {
        if let ItemBody::Heading(h) = &item.body {
            match h {
                Heading::Plain(text) => {
                    trail.clear();
                    trail.push((1, text));
                }
                Heading::Leveled { text, level } => {
                    while trail.last().is_some_and(|(l, _)| *l >= *level) {
                        trail.pop();
                    }
                    trail.push((*level, text));
                }
            }
        }
    }

    trail.into_iter().map(|(_, t)| t.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocItem, DocumentMetadata, Heading, Provenance};
    use std::collections::HashSet;

    fn page(n: u32) -> Vec<Provenance> {
        vec![Provenance { page_no: n }]
    }

    fn leveled(text: &str, level: u8) -> Heading {
        Heading::Leveled {
            text: text.into(),
            level,
        }
    }

    fn doc(items: Vec<DocItem>) -> ConvertedDocument {
        ConvertedDocument {
            metadata: DocumentMetadata::default(),
            items,
            pages_converted: 0,
        }
    }

    #[test]
    fn small_document_is_a_single_chunk() {
        let d = doc(vec![
            DocItem::heading(leveled("Intro", 1), page(1)),
            DocItem::paragraph("A short paragraph.", page(1)),
        ]);
        let out = chunk_document(&d, "doc.pdf", 512).unwrap();

        assert_eq!(out.total_chunks, 1);
        assert_eq!(out.chunks.len(), 1);
        let chunk = &out.chunks[0];
        assert_eq!(chunk.metadata.chunk_index, 0);
        assert_eq!(chunk.metadata.source, "doc.pdf");
        assert_eq!(chunk.metadata.headings, vec!["Intro"]);
        assert_eq!(chunk.metadata.page, Some(1));
        assert!(chunk.text.contains("A short paragraph."));
    }

    #[test]
    fn total_chunks_matches_and_indices_are_sequential() {
        let mut items = Vec::new();
        for section in 0..6 {
            items.push(DocItem::heading(
                leveled(&format!("Section {section}"), 2),
                page(section + 1),
            ));
            items.push(DocItem::paragraph(
                "Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
                 Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua."
                    .repeat(3),
                page(section + 1),
            ));
        }
        let out = chunk_document(&doc(items), "doc.pdf", 64).unwrap();

        assert!(out.total_chunks > 1, "budget of 64 tokens must split");
        assert_eq!(out.total_chunks, out.chunks.len());
        for (i, chunk) in out.chunks.iter().enumerate() {
            assert_eq!(chunk.metadata.chunk_index, i);
        }
    }

    #[test]
    fn chunk_ids_are_unique() {
        let items = (0..4)
            .map(|i| {
                DocItem::paragraph(
                    format!("Paragraph number {i}. ").repeat(40),
                    page(i as u32 + 1),
                )
            })
            .collect();
        let out = chunk_document(&doc(items), "doc.pdf", 32).unwrap();

        assert!(out.total_chunks > 1);
        let ids: HashSet<&str> = out.chunks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), out.total_chunks);
    }

    #[test]
    fn no_headings_yields_empty_list_not_null() {
        let d = doc(vec![DocItem::paragraph("Plain body text.", page(1))]);
        let out = chunk_document(&d, "doc.pdf", 512).unwrap();
        assert_eq!(out.chunks[0].metadata.headings, Vec::<String>::new());
    }

    #[test]
    fn missing_provenance_yields_no_page() {
        let d = doc(vec![
            DocItem::heading(Heading::Plain("Report".into()), vec![]),
            DocItem::paragraph("Body.", vec![]),
        ]);
        let out = chunk_document(&d, "doc.pdf", 512).unwrap();
        assert_eq!(out.chunks[0].metadata.page, None);
    }

    #[test]
    fn empty_document_has_zero_chunks() {
        let out = chunk_document(&doc(vec![]), "doc.pdf", 512).unwrap();
        assert_eq!(out.total_chunks, 0);
        assert!(out.chunks.is_empty());
    }

    #[test]
    fn trail_pops_deeper_levels() {
        let items = vec![
            DocItem::heading(leveled("Top", 1), page(1)),
            DocItem::heading(leveled("Deep", 3), page(1)),
            DocItem::heading(leveled("Mid", 2), page(1)),
            DocItem::paragraph("text", page(1)),
        ];
        assert_eq!(heading_trail(&items, 3), vec!["Top", "Mid"]);
    }

    #[test]
    fn trail_replaces_same_level() {
        let items = vec![
            DocItem::heading(leveled("One", 2), page(1)),
            DocItem::heading(leveled("Two", 2), page(1)),
        ];
        assert_eq!(heading_trail(&items, 1), vec!["Two"]);
    }

    #[test]
    fn plain_heading_resets_trail() {
        let items = vec![
            DocItem::heading(leveled("Old", 1), page(1)),
            DocItem::heading(leveled("Older", 2), page(1)),
            DocItem::heading(Heading::Plain("Fresh".into()), page(2)),
        ];
        assert_eq!(heading_trail(&items, 2), vec!["Fresh"]);
    }

    #[test]
    fn first_covered_item_handles_gaps_and_end() {
        let spans = [
            ItemSpan { start: 0, end: 7 },
            ItemSpan { start: 9, end: 20 },
        ];
        assert_eq!(first_covered_item(&spans, 0), Some(0));
        assert_eq!(first_covered_item(&spans, 6), Some(0));
        // Offset inside the inter-item gap resolves to the next item.
        assert_eq!(first_covered_item(&spans, 8), Some(1));
        assert_eq!(first_covered_item(&spans, 19), Some(1));
        assert_eq!(first_covered_item(&spans, 20), None);
        assert_eq!(first_covered_item(&[], 0), None);
    }
}
