//! Page rasterisation: DPI → scale factor → pixel buffer.
//!
//! PDF page geometry is measured in points, 72 to the inch. Rendering at
//! `dpi` therefore means scaling both axes by `dpi / 72`; a US-Letter page
//! (612 × 792 pt) at 150 DPI comes out at 1275 × 1650 px.

use crate::engine::RasterDocument;
use crate::error::Pdf2PngError;
use image::DynamicImage;
use tracing::debug;

/// PDF user-space units per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Uniform scale factor applied to both axes when rendering at `dpi`.
pub fn scale_for_dpi(dpi: u32) -> f32 {
    dpi as f32 / POINTS_PER_INCH
}

/// Rasterise the page at 0-based `index` of `document` at `dpi`.
pub fn render_page(
    document: &dyn RasterDocument,
    index: usize,
    dpi: u32,
) -> Result<DynamicImage, Pdf2PngError> {
    let scale = scale_for_dpi(dpi);
    let image = document.render_page(index, scale)?;
    debug!(
        "Rendered page {} at {:.3}x → {}x{} px",
        index + 1,
        scale,
        image.width(),
        image.height()
    );
    Ok(image)
}
