//! The converted-document data model.
//!
//! Both conversion backends produce the same owned structure: an ordered
//! list of [`DocItem`]s with page provenance, plus document metadata. The
//! chunking stage renders the items to markdown once and maps chunk byte
//! offsets back to items, so heading trails and page numbers come from a
//! single source of truth instead of being re-derived per chunk.
//!
//! Headings are a tagged union resolved at ingestion time: the two places a
//! heading can come from (an ATX line in VLM markdown, or a text-only
//! source such as the PDF metadata title or a setext underline) become two
//! variants, and downstream code only ever calls [`Heading::text`].

use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;

/// Document-level metadata pulled from the PDF info dictionary.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    /// Total pages in the document (before any `max_pages` cap).
    pub page_count: usize,
    pub pdf_version: String,
}

/// Where a piece of document content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Provenance {
    /// 1-indexed page number.
    pub page_no: u32,
}

/// A section heading, resolved to one of its two source shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Heading {
    /// A heading known only by its text: the PDF metadata title, or a
    /// setext-underlined line in VLM markdown. Treated as document-level —
    /// it resets the heading trail.
    Plain(String),
    /// An ATX heading with an explicit outline level (1–6).
    Leveled { text: String, level: u8 },
}

impl Heading {
    /// The heading text, regardless of variant.
    pub fn text(&self) -> &str {
        match self {
            Heading::Plain(text) => text,
            Heading::Leveled { text, .. } => text,
        }
    }

    /// Outline level; plain headings sit at the top of the outline.
    pub fn level(&self) -> u8 {
        match self {
            Heading::Plain(_) => 1,
            Heading::Leveled { level, .. } => *level,
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

/// The content of a document item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemBody {
    Heading(Heading),
    /// A block of body text: a paragraph, list, table, or code block. The
    /// text is kept verbatim so markdown constructs survive the round trip
    /// into the chunker.
    Paragraph(String),
}

/// One reading-order element of the converted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocItem {
    pub body: ItemBody,
    /// Pages this item was produced from. Empty for items that do not come
    /// from page content (e.g. the metadata title heading).
    pub prov: Vec<Provenance>,
}

impl DocItem {
    pub fn heading(h: Heading, prov: Vec<Provenance>) -> Self {
        Self {
            body: ItemBody::Heading(h),
            prov,
        }
    }

    pub fn paragraph(text: impl Into<String>, prov: Vec<Provenance>) -> Self {
        Self {
            body: ItemBody::Paragraph(text.into()),
            prov,
        }
    }

    /// First provenance page, if any.
    pub fn page(&self) -> Option<u32> {
        self.prov.first().map(|p| p.page_no)
    }

    fn kind_str(&self) -> &'static str {
        match &self.body {
            ItemBody::Heading(_) => "heading",
            ItemBody::Paragraph(_) => "paragraph",
        }
    }

    fn text(&self) -> &str {
        match &self.body {
            ItemBody::Heading(h) => h.text(),
            ItemBody::Paragraph(t) => t,
        }
    }
}

/// Byte span of one item within the rendered markdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSpan {
    pub start: usize,
    pub end: usize,
}

/// The structured document produced by either conversion backend.
#[derive(Debug, Clone)]
pub struct ConvertedDocument {
    pub metadata: DocumentMetadata,
    pub items: Vec<DocItem>,
    /// Pages actually converted (after the `max_pages` cap).
    pub pages_converted: usize,
}

impl ConvertedDocument {
    /// Render the document as markdown.
    pub fn to_markdown(&self) -> String {
        self.render_with_spans().0
    }

    /// Render the document as markdown, also reporting each item's byte
    /// span in the rendered string. Spans are in item order and
    /// non-overlapping; items are separated by a blank line.
    pub fn render_with_spans(&self) -> (String, Vec<ItemSpan>) {
        let mut out = String::new();
        let mut spans = Vec::with_capacity(self.items.len());

        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                out.push_str("\n\n");
            }
            let start = out.len();
            match &item.body {
                ItemBody::Heading(h) => {
                    for _ in 0..h.level() {
                        out.push('#');
                    }
                    out.push(' ');
                    out.push_str(h.text());
                }
                ItemBody::Paragraph(text) => out.push_str(text),
            }
            spans.push(ItemSpan {
                start,
                end: out.len(),
            });
        }

        (out, spans)
    }

    /// Dictionary export of the full document, used by the JSON side-export.
    pub fn to_json_value(&self) -> Value {
        let items: Vec<Value> = self
            .items
            .iter()
            .map(|item| {
                let mut v = json!({
                    "kind": item.kind_str(),
                    "text": item.text(),
                    "prov": item.prov,
                });
                if let ItemBody::Heading(h) = &item.body {
                    v["level"] = json!(h.level());
                }
                v
            })
            .collect();

        json!({
            "metadata": self.metadata,
            "pages_converted": self.pages_converted,
            "items": items,
        })
    }
}

// ── Markdown ingestion ───────────────────────────────────────────────────

/// Parse one page of markdown into document items, attributing every item
/// to `page_no`.
///
/// ATX headings become [`Heading::Leveled`]; a line underlined with `=`
/// becomes [`Heading::Plain`]; everything else accumulates into
/// blank-line-delimited paragraph blocks kept verbatim. Dash underlines are
/// deliberately not treated as setext headings — they collide with
/// horizontal rules and table separators, and VLM output uses ATX for
/// subsections anyway.
pub fn items_from_markdown(markdown: &str, page_no: u32) -> Vec<DocItem> {
    let prov = vec![Provenance { page_no }];
    let lines: Vec<&str> = markdown.lines().collect();
    let mut items = Vec::new();
    let mut para: Vec<&str> = Vec::new();

    let flush = |para: &mut Vec<&str>, items: &mut Vec<DocItem>| {
        if !para.is_empty() {
            items.push(DocItem::paragraph(para.join("\n"), prov.clone()));
            para.clear();
        }
    };

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];

        if line.trim().is_empty() {
            flush(&mut para, &mut items);
            i += 1;
            continue;
        }

        if let Some((level, text)) = parse_atx_heading(line) {
            flush(&mut para, &mut items);
            items.push(DocItem::heading(
                Heading::Leveled {
                    text: text.to_string(),
                    level,
                },
                prov.clone(),
            ));
            i += 1;
            continue;
        }

        if para.is_empty() && i + 1 < lines.len() && is_setext_underline(lines[i + 1]) {
            items.push(DocItem::heading(
                Heading::Plain(line.trim().to_string()),
                prov.clone(),
            ));
            i += 2;
            continue;
        }

        para.push(line);
        i += 1;
    }
    flush(&mut para, &mut items);

    items
}

/// `# Title` → `(1, "Title")`, up to six `#`. Requires the space after the
/// marker, per CommonMark, so `#hashtag` stays body text.
fn parse_atx_heading(line: &str) -> Option<(u8, &str)> {
    let trimmed = line.trim_start();
    let hashes = trimmed.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &trimmed[hashes..];
    let text = rest.strip_prefix(' ')?.trim();
    if text.is_empty() {
        return None;
    }
    Some((hashes as u8, text))
}

/// A setext h1 underline: two or more `=` and nothing else.
fn is_setext_underline(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 2 && trimmed.bytes().all(|b| b == b'=')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: u32) -> Vec<Provenance> {
        vec![Provenance { page_no: n }]
    }

    #[test]
    fn heading_text_covers_both_variants() {
        assert_eq!(Heading::Plain("Intro".into()).text(), "Intro");
        assert_eq!(
            Heading::Leveled {
                text: "Details".into(),
                level: 2
            }
            .text(),
            "Details"
        );
    }

    #[test]
    fn render_with_spans_covers_every_item() {
        let doc = ConvertedDocument {
            metadata: DocumentMetadata::default(),
            items: vec![
                DocItem::heading(
                    Heading::Leveled {
                        text: "Title".into(),
                        level: 1,
                    },
                    page(1),
                ),
                DocItem::paragraph("First paragraph.", page(1)),
                DocItem::paragraph("Second paragraph.", page(2)),
            ],
            pages_converted: 2,
        };

        let (md, spans) = doc.render_with_spans();
        assert_eq!(spans.len(), 3);
        assert_eq!(&md[spans[0].start..spans[0].end], "# Title");
        assert_eq!(&md[spans[1].start..spans[1].end], "First paragraph.");
        assert_eq!(&md[spans[2].start..spans[2].end], "Second paragraph.");
        // Items are blank-line separated.
        assert!(md.contains("# Title\n\nFirst paragraph."));
    }

    #[test]
    fn plain_heading_renders_as_h1() {
        let doc = ConvertedDocument {
            metadata: DocumentMetadata::default(),
            items: vec![DocItem::heading(Heading::Plain("Report".into()), vec![])],
            pages_converted: 0,
        };
        assert_eq!(doc.to_markdown(), "# Report");
    }

    #[test]
    fn ingest_atx_headings_and_paragraphs() {
        let md = "# Title\n\nSome text\nspanning two lines.\n\n## Section\n\nMore text.";
        let items = items_from_markdown(md, 3);
        assert_eq!(items.len(), 4);
        assert_eq!(
            items[0].body,
            ItemBody::Heading(Heading::Leveled {
                text: "Title".into(),
                level: 1
            })
        );
        assert_eq!(
            items[1].body,
            ItemBody::Paragraph("Some text\nspanning two lines.".into())
        );
        assert_eq!(
            items[2].body,
            ItemBody::Heading(Heading::Leveled {
                text: "Section".into(),
                level: 2
            })
        );
        assert!(items.iter().all(|i| i.page() == Some(3)));
    }

    #[test]
    fn ingest_heading_without_blank_line_after() {
        let md = "## Section\nBody right after.";
        let items = items_from_markdown(md, 1);
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0].body, ItemBody::Heading(_)));
        assert_eq!(items[1].body, ItemBody::Paragraph("Body right after.".into()));
    }

    #[test]
    fn ingest_setext_becomes_plain_heading() {
        let md = "Annual Report\n=============\n\nBody text.";
        let items = items_from_markdown(md, 1);
        assert_eq!(
            items[0].body,
            ItemBody::Heading(Heading::Plain("Annual Report".into()))
        );
        assert_eq!(items[1].body, ItemBody::Paragraph("Body text.".into()));
    }

    #[test]
    fn ingest_dash_underline_is_not_a_heading() {
        let md = "Not a heading\n---\n\nText.";
        let items = items_from_markdown(md, 1);
        assert!(matches!(items[0].body, ItemBody::Paragraph(_)));
    }

    #[test]
    fn ingest_hashtag_without_space_is_body_text() {
        let items = items_from_markdown("#hashtag in prose", 1);
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0].body, ItemBody::Paragraph(_)));
    }

    #[test]
    fn ingest_table_block_stays_verbatim() {
        let md = "| A | B |\n| --- | --- |\n| 1 | 2 |";
        let items = items_from_markdown(md, 2);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].body, ItemBody::Paragraph(md.into()));
    }

    #[test]
    fn json_export_shape() {
        let doc = ConvertedDocument {
            metadata: DocumentMetadata {
                title: Some("T".into()),
                page_count: 2,
                ..Default::default()
            },
            items: vec![
                DocItem::heading(Heading::Plain("T".into()), vec![]),
                DocItem::paragraph("body", page(1)),
            ],
            pages_converted: 2,
        };
        let v = doc.to_json_value();
        assert_eq!(v["pages_converted"], 2);
        assert_eq!(v["metadata"]["title"], "T");
        assert_eq!(v["items"][0]["kind"], "heading");
        assert_eq!(v["items"][0]["level"], 1);
        assert_eq!(v["items"][1]["kind"], "paragraph");
        assert_eq!(v["items"][1]["prov"][0]["page_no"], 1);
    }
}
