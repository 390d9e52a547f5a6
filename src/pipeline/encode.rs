//! Image encoding: `DynamicImage` → PNG file named after the source PDF.
//!
//! Files are written to a sibling `*.png.tmp` first and renamed into place,
//! so a reader never observes a half-written PNG under the final name and a
//! re-run replaces the previous output in one step.

use crate::error::Pdf2PngError;
use image::DynamicImage;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// The source file's name without its extension, e.g. `report` for
/// `/tmp/report.pdf`.
pub fn source_stem(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Output file name for 1-indexed `page_num`: `<stem>_PAGE_<n>.png`.
pub fn page_filename(stem: &str, page_num: usize) -> String {
    format!("{stem}_PAGE_{page_num}.png")
}

/// Encode `img` as PNG and write it to `path`, replacing any existing file.
pub fn write_png(img: &DynamicImage, path: &Path, page_num: usize) -> Result<(), Pdf2PngError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| Pdf2PngError::EncodeFailed {
            page: page_num,
            detail: e.to_string(),
        })?;

    let tmp_path = path.with_extension("png.tmp");
    let written = std::fs::write(&tmp_path, &buf).and_then(|()| std::fs::rename(&tmp_path, path));
    if let Err(e) = written {
        // A short write leaves a truncated temp file; never leave it behind.
        let _ = std::fs::remove_file(&tmp_path);
        return Err(Pdf2PngError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        });
    }

    debug!("Wrote {} ({} bytes)", path.display(), buf.len());
    Ok(())
}
