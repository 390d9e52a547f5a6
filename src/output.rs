//! Result types returned by [`crate::convert`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything a successful conversion produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Written PNG files, one per converted page, in ascending page order.
    pub files: Vec<PathBuf>,
    /// Directory the files were written to.
    pub output_dir: PathBuf,
    pub stats: ConversionStats,
}

impl ConversionOutput {
    /// Consume the output, keeping only the file list.
    pub fn into_files(self) -> Vec<PathBuf> {
        self.files
    }
}

/// Counters and timings for one conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages in the source document.
    pub total_pages: usize,
    /// Pages written as PNG (equals `total_pages` unless a page selection was used).
    pub converted_pages: usize,
    /// Resolution the pages were rendered at.
    pub dpi: u32,
    pub total_duration_ms: u64,
}
