//! Configuration types for PDF-to-PNG conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The builder validates on `build()`,
//! so a config obtained from it is always usable; `convert` re-checks the
//! DPI anyway because the fields are public.

use crate::error::Pdf2PngError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Resolution used when the caller does not choose one.
///
/// The CLI and [`ConversionConfig::default`] both read this constant.
pub const DEFAULT_DPI: u32 = 150;

/// Configuration for a PDF-to-PNG conversion.
///
/// # Example
/// ```rust
/// use pdf2png::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .dpi(300)
///     .output_dir("./high_quality")
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 300);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Directory the PNG files are written to.
    ///
    /// `None` writes next to the source PDF. A directory that does not exist
    /// yet is created, including missing parents.
    pub output_dir: Option<PathBuf>,

    /// Rendering resolution in dots per inch. Must be ≥ 1. Default: 150.
    ///
    /// PDF user space is 72 points per inch, so each page is scaled by
    /// `dpi / 72`: 72 DPI renders one pixel per point, 144 DPI two.
    pub dpi: u32,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Page selection. Default: All pages.
    pub pages: PageSelection,

    /// Receives per-page events while the conversion runs.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            dpi: DEFAULT_DPI,
            password: None,
            pages: PageSelection::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("output_dir", &self.output_dir)
            .field("dpi", &self.dpi)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("pages", &self.pages)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2PngError> {
        validate_dpi(self.config.dpi)?;
        if let PageSelection::Range(start, end) = self.config.pages {
            if start == 0 || start > end {
                return Err(Pdf2PngError::InvalidConfig(format!(
                    "page range {start}-{end} is empty or not 1-indexed"
                )));
            }
        }
        Ok(self.config)
    }
}

/// Reject a DPI of zero.
pub fn validate_dpi(dpi: u32) -> Result<u32, Pdf2PngError> {
    if dpi == 0 {
        return Err(Pdf2PngError::InvalidDpi {
            value: dpi.to_string(),
        });
    }
    Ok(dpi)
}

/// Parse a user-supplied DPI string ("150", " 300 ").
///
/// Non-numeric, negative and zero values are all [`Pdf2PngError::InvalidDpi`].
pub fn parse_dpi(s: &str) -> Result<u32, Pdf2PngError> {
    let dpi = s.trim().parse::<u32>().map_err(|_| Pdf2PngError::InvalidDpi {
        value: s.to_string(),
    })?;
    validate_dpi(dpi)
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Specifies which pages of the PDF to convert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Convert all pages (default).
    #[default]
    All,
    /// Convert a single page (1-indexed).
    Single(usize),
    /// Convert a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Convert specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// The first page number a caller asked for, used in out-of-range errors.
    pub(crate) fn first_requested(&self) -> usize {
        match self {
            PageSelection::All => 1,
            PageSelection::Single(p) => *p,
            PageSelection::Range(start, _) => *start,
            PageSelection::Set(pages) => pages.iter().copied().min().unwrap_or(0),
        }
    }
}

/// Parses `all`, a single page (`5`), an inclusive range (`3-15`) or a
/// comma-separated set (`1,3,5`). Pages are 1-indexed.
impl FromStr for PageSelection {
    type Err = Pdf2PngError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let page = |p: &str| -> Result<usize, Pdf2PngError> {
            match p.trim().parse::<usize>() {
                Ok(n) if n >= 1 => Ok(n),
                _ => Err(Pdf2PngError::InvalidConfig(format!(
                    "invalid page number '{}' (pages are 1-indexed)",
                    p.trim()
                ))),
            }
        };

        if s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }
        if let Some((start, end)) = s.split_once('-') {
            let (start, end) = (page(start)?, page(end)?);
            if start > end {
                return Err(Pdf2PngError::InvalidConfig(format!(
                    "invalid page range '{start}-{end}': start must be <= end"
                )));
            }
            return Ok(PageSelection::Range(start, end));
        }
        if s.contains(',') {
            let pages = s.split(',').map(|p| page(p)).collect::<Result<Vec<_>, _>>()?;
            return Ok(PageSelection::Set(pages));
        }
        Ok(PageSelection::Single(page(s)?))
    }
}
