//! Conversion entry points.
//!
//! [`convert`] is the whole program in one call: validate, open, render every
//! page in order, write one PNG per page, close. [`convert_with_engine`] is
//! the same procedure against any [`RasterEngine`], which is how the tests
//! drive it without libpdfium.
//!
//! The open document is a local `Box<dyn RasterDocument>`; it is dropped,
//! and therefore closed, on every path out of the function, including an
//! early `?` from a failing page.

use crate::config::{validate_dpi, ConversionConfig, PageSelection};
use crate::engine::pdfium::PdfiumEngine;
use crate::engine::RasterEngine;
use crate::error::Pdf2PngError;
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::{encode, input, render};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Rasterise every selected page of a PDF into PNG files.
///
/// # Arguments
/// * `source` — path to a local `.pdf` file
/// * `config` — output directory, DPI, page selection, password
///
/// # Errors
/// * [`Pdf2PngError::FileNotFound`] — `source` does not exist
/// * [`Pdf2PngError::NotAPdf`] / [`Pdf2PngError::InvalidDpi`] — bad input
/// * render errors from pdfium, I/O errors from writing files
///
/// On error no file list is returned; PNGs written for earlier pages stay on
/// disk.
///
/// # Example
/// ```rust,no_run
/// use pdf2png::{convert, ConversionConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ConversionConfig::builder().output_dir("./pages").dpi(200).build()?;
/// let output = convert("document.pdf", &config)?;
/// for file in &output.files {
///     println!("{}", file.display());
/// }
/// # Ok(())
/// # }
/// ```
pub fn convert(
    source: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2PngError> {
    let source = source.as_ref();
    // Input and output-directory errors must not depend on libpdfium being
    // installed.
    validate_request(source, config)?;
    input::resolve_output_dir(source, config.output_dir.as_deref())?;
    let engine = PdfiumEngine::bind()?;
    convert_with_engine(&engine, source, config)
}

/// Rasterise `source` into `output_dir` (or next to the PDF) at `dpi`
/// (default 150) and return the written files in page order.
pub fn rasterize(
    source: impl AsRef<Path>,
    output_dir: Option<&Path>,
    dpi: Option<u32>,
) -> Result<Vec<PathBuf>, Pdf2PngError> {
    let mut config = ConversionConfig::default();
    config.output_dir = output_dir.map(Path::to_path_buf);
    if let Some(dpi) = dpi {
        config.dpi = dpi;
    }
    convert(source, &config).map(ConversionOutput::into_files)
}

/// [`convert`] against an explicit engine.
pub fn convert_with_engine<E: RasterEngine + ?Sized>(
    engine: &E,
    source: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2PngError> {
    let total_start = Instant::now();
    let source = source.as_ref();
    info!("Starting conversion: {}", source.display());

    // ── Step 1: Validate input ───────────────────────────────────────────
    validate_request(source, config)?;

    // ── Step 2: Resolve output directory ─────────────────────────────────
    let output_dir = input::resolve_output_dir(source, config.output_dir.as_deref())?;
    let stem = encode::source_stem(source);

    // ── Step 3: Open document ────────────────────────────────────────────
    let document = engine.open(source, config.password.as_deref())?;
    let total_pages = document.page_count();

    // ── Step 4: Compute page indices ─────────────────────────────────────
    let page_indices = config.pages.to_indices(total_pages);
    if page_indices.is_empty() && config.pages != PageSelection::All {
        return Err(Pdf2PngError::PageOutOfRange {
            page: config.pages.first_requested(),
            total: total_pages,
        });
    }
    debug!(
        "Selected {} of {} pages at {} DPI",
        page_indices.len(),
        total_pages,
        config.dpi
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(page_indices.len());
    }

    // ── Step 5: Render and write each page ───────────────────────────────
    let selected = page_indices.len();
    let mut files = Vec::with_capacity(selected);

    for &idx in &page_indices {
        let page_num = idx + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, selected);
        }

        let filename = encode::page_filename(&stem, page_num);
        let path = output_dir.join(&filename);

        let written = render::render_page(document.as_ref(), idx, config.dpi)
            .and_then(|image| encode::write_png(&image, &path, page_num));

        if let Err(e) = written {
            warn!("Page {} failed: {}", page_num, e);
            if let Some(ref cb) = config.progress_callback {
                cb.on_page_error(page_num, selected, &e.to_string());
            }
            return Err(e);
        }

        info!("Created: {}", filename);
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_written(page_num, selected, &path);
        }
        files.push(path);
    }

    // ── Step 6: Release document ─────────────────────────────────────────
    drop(document);

    let stats = ConversionStats {
        total_pages,
        converted_pages: files.len(),
        dpi: config.dpi,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {}/{} pages, {}ms total",
        stats.converted_pages, total_pages, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(files.len(), &output_dir);
    }

    Ok(ConversionOutput {
        files,
        output_dir,
        stats,
    })
}

/// Async wrapper around [`convert`].
///
/// pdfium is blocking, CPU-bound work, so the conversion runs on tokio's
/// blocking pool instead of stalling an async worker thread.
#[cfg(feature = "async")]
pub async fn convert_async(
    source: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2PngError> {
    let source = source.as_ref().to_path_buf();
    let config = config.clone();

    tokio::task::spawn_blocking(move || convert(&source, &config))
        .await
        .map_err(|e| Pdf2PngError::Internal(format!("Conversion task panicked: {}", e)))?
}

fn validate_request(source: &Path, config: &ConversionConfig) -> Result<(), Pdf2PngError> {
    input::validate_source(source)?;
    validate_dpi(config.dpi)?;
    Ok(())
}
