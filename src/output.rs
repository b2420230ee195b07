//! Output record types and the primary JSON write.
//!
//! These are the only entities this tool constructs itself; everything
//! upstream is reshaped external-library output. The serialised field names
//! are a stable interface for downstream embedding pipelines — change them
//! and every consumer breaks, so they are pinned by tests.

use crate::error::Pdf2ChunksError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Metadata block attached to every chunk record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Zero-based position in the chunker's output sequence.
    pub chunk_index: usize,
    /// Source file name (not the full path).
    pub source: String,
    /// Heading trail active at the chunk start; empty when the chunk has no
    /// heading context. Never null.
    pub headings: Vec<String>,
    /// 1-indexed page number of the chunk's first document item, when the
    /// item carries provenance. Serialised as `null` otherwise.
    pub page: Option<u32>,
}

/// One retrieval-ready chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// UUIDv4, unique within one run.
    pub id: String,
    pub text: String,
    pub metadata: ChunkMetadata,
}

/// The primary output document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkDocument {
    /// Source file name, repeated from the per-chunk metadata for
    /// convenience.
    pub source: String,
    /// Always equals `chunks.len()`.
    pub total_chunks: usize,
    pub chunks: Vec<ChunkRecord>,
}

impl ChunkDocument {
    /// Serialise to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, Pdf2ChunksError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Pdf2ChunksError::Internal(format!("Output serialisation: {e}")))
    }

    /// Write the output JSON atomically (temp file + rename), creating
    /// parent directories as needed. A failed conversion can therefore
    /// never leave a truncated output file behind.
    pub async fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), Pdf2ChunksError> {
        let path = path.as_ref();
        let body = self.to_json()?;

        let write_err = |e: std::io::Error| Pdf2ChunksError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
            }
        }

        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, body).await.map_err(write_err)?;
        tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ChunkDocument {
        ChunkDocument {
            source: "doc.pdf".into(),
            total_chunks: 1,
            chunks: vec![ChunkRecord {
                id: "00000000-0000-4000-8000-000000000000".into(),
                text: "chunk text".into(),
                metadata: ChunkMetadata {
                    chunk_index: 0,
                    source: "doc.pdf".into(),
                    headings: vec!["Intro".into()],
                    page: None,
                },
            }],
        }
    }

    #[test]
    fn serialised_field_names_are_stable() {
        let v: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        assert_eq!(v["source"], "doc.pdf");
        assert_eq!(v["total_chunks"], 1);
        let chunk = &v["chunks"][0];
        assert!(chunk["id"].is_string());
        assert_eq!(chunk["text"], "chunk text");
        assert_eq!(chunk["metadata"]["chunk_index"], 0);
        assert_eq!(chunk["metadata"]["headings"][0], "Intro");
    }

    #[test]
    fn absent_page_serialises_as_null() {
        let v: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        assert!(v["chunks"][0]["metadata"]["page"].is_null());
        // The key itself must be present, not skipped.
        assert!(v["chunks"][0]["metadata"]
            .as_object()
            .unwrap()
            .contains_key("page"));
    }

    #[tokio::test]
    async fn atomic_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        sample().write_to_file(&path).await.unwrap();

        assert!(path.is_file());
        assert!(!path.with_extension("json.tmp").exists());

        let round_trip: ChunkDocument =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(round_trip.total_chunks, 1);
        assert_eq!(round_trip.chunks[0].metadata.page, None);
    }
}
