//! Input resolution: validate the source PDF path and decide where the PNG
//! files go.
//!
//! Validation only looks at the file system and the file name. Whether the
//! bytes really are a PDF is the engine's call; a `.pdf` file that pdfium
//! cannot parse surfaces as [`Pdf2PngError::CorruptPdf`].

use crate::error::Pdf2PngError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Check that `path` exists and carries a `.pdf` extension (any case).
///
/// Existence is checked first, so a missing `notes.txt` is reported as
/// not found rather than as the wrong type.
pub fn validate_source(path: &Path) -> Result<(), Pdf2PngError> {
    if !path.exists() {
        return Err(Pdf2PngError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    if !has_pdf_extension(path) {
        return Err(Pdf2PngError::NotAPdf {
            path: path.to_path_buf(),
        });
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(())
}

/// `true` when the file name ends in `.pdf`, compared case-insensitively.
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Decide the directory PNG files are written to, creating it if needed.
///
/// * `requested = None` → the source file's own directory (`.` for a bare
///   file name). Nothing is created.
/// * `requested = Some(dir)` → `dir`, created with all missing parents. An
///   existing directory is fine.
pub fn resolve_output_dir(source: &Path, requested: Option<&Path>) -> Result<PathBuf, Pdf2PngError> {
    match requested {
        None => Ok(source_dir(source)),
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| Pdf2PngError::OutputDirFailed {
                path: dir.to_path_buf(),
                source: e,
            })?;
            debug!("Output directory ready: {}", dir.display());
            Ok(dir.to_path_buf())
        }
    }
}

fn source_dir(source: &Path) -> PathBuf {
    match source.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
