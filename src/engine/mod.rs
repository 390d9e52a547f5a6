//! The rendering-engine seam.
//!
//! The converter never talks to PDFium directly. It needs exactly three
//! things from an engine: open a document, report how many pages it has,
//! and rasterise one page at a given scale. Releasing the document is the
//! document value's `Drop`, so a handle held in a local binding is closed on
//! every exit path, `?` included.
//!
//! [`pdfium::PdfiumEngine`] is the production implementation. Tests plug in
//! their own engine through [`crate::convert::convert_with_engine`].

pub mod pdfium;

use crate::error::Pdf2PngError;
use image::DynamicImage;
use std::path::Path;

/// Something that can open PDF documents for rasterisation.
pub trait RasterEngine {
    /// Open the document at `path`.
    ///
    /// The returned document stays open until it is dropped.
    fn open<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Box<dyn RasterDocument + 'a>, Pdf2PngError>;
}

/// An open document.
pub trait RasterDocument {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Rasterise the page at 0-based `index`, scaling PDF points by `scale`
    /// on both axes.
    fn render_page(&self, index: usize, scale: f32) -> Result<DynamicImage, Pdf2PngError>;
}
