//! Error types for the pdf2png library.
//!
//! Every failure is fatal for the conversion it occurs in: there is no
//! per-page tolerance, because a PNG sequence with a hole in it is not a
//! usable result. All variants live in one enum, [`Pdf2PngError`], and each
//! variant belongs to exactly one [`ErrorKind`] so callers can branch on the
//! broad category without matching every variant:
//!
//! | Kind | Meaning |
//! |------|---------|
//! | [`ErrorKind::NotFound`]     | the source PDF does not exist |
//! | [`ErrorKind::InvalidInput`] | wrong extension, bad DPI, bad page selection |
//! | [`ErrorKind::Render`]       | the engine could not open or rasterise the document |
//! | [`ErrorKind::Io`]           | the output directory or a PNG file could not be written |

use std::path::PathBuf;
use thiserror::Error;

/// Broad category of a [`Pdf2PngError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    Render,
    Io,
}

/// All errors returned by the pdf2png library.
#[derive(Debug, Error)]
pub enum Pdf2PngError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Source file was not found at the given path.
    #[error("PDF file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Source file exists but does not carry a `.pdf` extension.
    #[error("Input file must be a PDF: '{path}'")]
    NotAPdf { path: PathBuf },

    /// DPI was zero, negative or not a number.
    #[error("Invalid DPI '{value}': must be a positive integer")]
    InvalidDpi { value: String },

    /// The page selection matched no page of the document.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The engine could not parse the document.
    #[error("PDF '{path}' could not be opened: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// The engine returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// The rendered pixels could not be encoded as PNG.
    #[error("PNG encoding failed for page {page}: {detail}")]
    EncodeFailed { page: usize, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create the output directory.
    #[error("Failed to create output directory '{path}'")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write a PNG file.
    #[error("Failed to write output file '{path}'")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error("Failed to bind to pdfium library: {0}")]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2PngError {
    /// The broad category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Pdf2PngError::FileNotFound { .. } => ErrorKind::NotFound,
            Pdf2PngError::NotAPdf { .. }
            | Pdf2PngError::InvalidDpi { .. }
            | Pdf2PngError::PageOutOfRange { .. }
            | Pdf2PngError::InvalidConfig(_) => ErrorKind::InvalidInput,
            Pdf2PngError::CorruptPdf { .. }
            | Pdf2PngError::PasswordRequired { .. }
            | Pdf2PngError::WrongPassword { .. }
            | Pdf2PngError::RasterisationFailed { .. }
            | Pdf2PngError::EncodeFailed { .. }
            | Pdf2PngError::PdfiumBindingFailed(_)
            | Pdf2PngError::Internal(_) => ErrorKind::Render,
            Pdf2PngError::OutputDirFailed { .. } | Pdf2PngError::OutputWriteFailed { .. } => {
                ErrorKind::Io
            }
        }
    }

    /// Multi-line follow-up advice for errors the user can fix by changing
    /// their setup. `Display` is always a single line.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Pdf2PngError::PdfiumBindingFailed(_) => Some(concat!(
                "You can:\n",
                "  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n",
                "  • Place libpdfium next to the pdf2png executable or in the current directory.\n",
                "  • Install pdfium system-wide (pre-built binaries: https://github.com/bblanchon/pdfium-binaries).",
            )),
            Pdf2PngError::PasswordRequired { .. } => {
                Some("Provide the password with --password <PASSWORD>.")
            }
            _ => None,
        }
    }
}
