//! PDFium-backed [`RasterEngine`] built on `pdfium-render`.
//!
//! ## Library resolution
//!
//! `pdfium-render` loads libpdfium dynamically. [`PdfiumEngine::bind`] looks
//! for it in this order, first match wins:
//!
//! 1. `PDFIUM_LIB_PATH`: a library file, or a directory containing one
//! 2. the directory of the running executable
//! 3. the current working directory
//! 4. the system library search path

use super::{RasterDocument, RasterEngine};
use crate::error::Pdf2PngError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit pdfium library.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Rasterises PDF pages through libpdfium.
pub struct PdfiumEngine {
    pdfium: Pdfium,
}

impl PdfiumEngine {
    /// Bind to libpdfium, searching the locations listed in the module docs.
    pub fn bind() -> Result<Self, Pdf2PngError> {
        if let Some(explicit) = std::env::var_os(PDFIUM_LIB_PATH_ENV).filter(|v| !v.is_empty()) {
            let path = library_file(Path::new(&explicit));
            let bindings = Pdfium::bind_to_library(&path).map_err(|e| {
                Pdf2PngError::PdfiumBindingFailed(format!("{}: {:?}", path.display(), e))
            })?;
            debug!("Bound pdfium from {}", path.display());
            return Ok(Self::from_pdfium(Pdfium::new(bindings)));
        }

        for dir in local_search_dirs() {
            let path = Pdfium::pdfium_platform_library_name_at_path(&dir);
            if !path.exists() {
                continue;
            }
            if let Ok(bindings) = Pdfium::bind_to_library(&path) {
                debug!("Bound pdfium from {}", path.display());
                return Ok(Self::from_pdfium(Pdfium::new(bindings)));
            }
        }

        let bindings = Pdfium::bind_to_system_library()
            .map_err(|e| Pdf2PngError::PdfiumBindingFailed(format!("system library: {:?}", e)))?;
        debug!("Bound system pdfium");
        Ok(Self::from_pdfium(Pdfium::new(bindings)))
    }

    /// Wrap an already-bound [`Pdfium`] instance.
    pub fn from_pdfium(pdfium: Pdfium) -> Self {
        Self { pdfium }
    }
}

impl RasterEngine for PdfiumEngine {
    fn open<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Box<dyn RasterDocument + 'a>, Pdf2PngError> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, password)
            .map_err(|e| {
                let err_str = format!("{:?}", e);
                if err_str.contains("Password") || err_str.contains("password") {
                    if password.is_some() {
                        Pdf2PngError::WrongPassword {
                            path: path.to_path_buf(),
                        }
                    } else {
                        Pdf2PngError::PasswordRequired {
                            path: path.to_path_buf(),
                        }
                    }
                } else {
                    Pdf2PngError::CorruptPdf {
                        path: path.to_path_buf(),
                        detail: err_str,
                    }
                }
            })?;

        info!("PDF loaded: {} pages", document.pages().len());

        Ok(Box::new(PdfiumDocument {
            document,
            path: path.to_path_buf(),
        }))
    }
}

/// An open pdfium document. Dropping it closes the underlying handle.
struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
    path: PathBuf,
}

impl RasterDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render_page(&self, index: usize, scale: f32) -> Result<DynamicImage, Pdf2PngError> {
        let page = self
            .document
            .pages()
            .get(index as u16)
            .map_err(|e| Pdf2PngError::RasterisationFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            })?;

        let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            Pdf2PngError::RasterisationFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            }
        })?;

        Ok(bitmap.as_image())
    }
}

impl Drop for PdfiumDocument<'_> {
    fn drop(&mut self) {
        debug!("Closing {}", self.path.display());
    }
}

/// Resolve `PDFIUM_LIB_PATH` to a library file: a directory is searched
/// for the platform library name.
fn library_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        Pdfium::pdfium_platform_library_name_at_path(&path.to_path_buf())
    } else {
        path.to_path_buf()
    }
}

fn local_search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::with_capacity(2);
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }
    dirs.push(PathBuf::from("./"));
    dirs
}
