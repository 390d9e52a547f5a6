//! Library usage.
//!
//! Run with:
//!   cargo run --example usage -- COB_TEST_PROF.pdf

use pdf2png::{convert, rasterize, ConversionConfig};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let pdf = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "COB_TEST_PROF.pdf".to_string());

    // Next to the PDF, 150 DPI.
    let files = rasterize(&pdf, None, None)?;
    println!("Created {} PNG files beside the PDF", files.len());

    // Into a folder.
    let files = rasterize(&pdf, Some(Path::new("./extracted_images")), None)?;
    println!("Created {} PNG files in ./extracted_images", files.len());

    // Into a folder at a higher resolution.
    let config = ConversionConfig::builder()
        .output_dir("./high_quality")
        .dpi(300)
        .build()?;
    let output = convert(&pdf, &config)?;
    println!(
        "Created {} PNG files in {} ({}ms)",
        output.files.len(),
        output.output_dir.display(),
        output.stats.total_duration_ms
    );

    Ok(())
}
