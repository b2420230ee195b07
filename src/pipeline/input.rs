//! Input validation: confirm the user-supplied path is a readable PDF.
//!
//! A missing input is the one user error this tool reports cleanly (the CLI
//! turns it into exit code 1), so the check happens before any converter
//! state is built. We also validate the `%PDF` magic bytes up front: pdfium
//! error strings for non-PDF input are cryptic, and four bytes of I/O buys
//! a meaningful message.

use crate::error::Pdf2ChunksError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate a local PDF path, checking existence, readability, and magic
/// bytes. Returns the path unchanged on success.
pub fn validate_input(path: &Path) -> Result<PathBuf, Pdf2ChunksError> {
    if !path.exists() {
        return Err(Pdf2ChunksError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(Pdf2ChunksError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Pdf2ChunksError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(Pdf2ChunksError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("Validated input PDF: {}", path.display());
    Ok(path.to_path_buf())
}
