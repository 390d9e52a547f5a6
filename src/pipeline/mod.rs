//! Pipeline stages for PDF-to-PNG conversion.
//!
//! Each submodule implements exactly one step; [`crate::convert`] strings
//! them together.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ encode
//! (path)    (engine)   (PNG file)
//! ```
//!
//! 1. [`input`]  — validate the source path and resolve the output directory
//! 2. [`render`] — turn a DPI into a scale factor and rasterise one page
//! 3. [`encode`] — name the page's file and write the pixels as PNG

pub mod encode;
pub mod input;
pub mod render;
