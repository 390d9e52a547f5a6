//! # pdf2png
//!
//! Rasterise every page of a PDF document to its own PNG file.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input   check the file exists and is a .pdf; resolve output directory
//!  ├─ 2. Open    load the document through the rendering engine (pdfium)
//!  ├─ 3. Render  rasterise each page at dpi/72 scale, in page order
//!  ├─ 4. Encode  write <stem>_PAGE_<n>.png
//!  └─ 5. Close   release the document, return the written paths
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2png::{convert, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .output_dir("./high_quality")
//!         .dpi(300)
//!         .build()?;
//!     let output = convert("report.pdf", &config)?;
//!     println!("Created {} PNG files", output.files.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2png` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `async` | off     | Adds `convert_async`, which runs the conversion on tokio's blocking pool |
//!
//! ## PDFium
//!
//! Rendering uses libpdfium via `pdfium-render`. See
//! [`engine::pdfium::PdfiumEngine::bind`] for where the library is looked up;
//! `PDFIUM_LIB_PATH` overrides the search.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{parse_dpi, ConversionConfig, ConversionConfigBuilder, PageSelection, DEFAULT_DPI};
#[cfg(feature = "async")]
pub use convert::convert_async;
pub use convert::{convert, convert_with_engine, rasterize};
pub use engine::pdfium::PdfiumEngine;
pub use engine::{RasterDocument, RasterEngine};
pub use error::{ErrorKind, Pdf2PngError};
pub use output::{ConversionOutput, ConversionStats};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
