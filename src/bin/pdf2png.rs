//! CLI binary for pdf2png.
//!
//! A thin shim over the library crate: positional arguments map onto
//! `ConversionConfig`, per-page progress comes back through a
//! `ConversionProgressCallback`.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2png::{
    convert, parse_dpi, ConversionConfig, ConversionOutput, ConversionProgressCallback,
    PageSelection, Pdf2PngError, ProgressCallback, DEFAULT_DPI,
};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const EXAMPLE: &str = "Example: pdf2png document.pdf ./output 200";

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Prints `Created: <file>` for every page and, on a terminal, keeps a
/// progress bar on stderr below those lines.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Print the per-page `Created:` lines.
    echo: bool,
}

impl CliProgressCallback {
    fn new(show_bar: bool, echo: bool) -> Arc<Self> {
        let bar = if show_bar {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.set_prefix("Opening");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        } else {
            ProgressBar::hidden()
        };

        Arc::new(Self { bar, echo })
    }

    /// Remove the bar or spinner from the terminal, whatever state it is in.
    fn clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} pages  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Rendering");
    }

    fn on_page_start(&self, page_num: usize, _total_pages: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_written(&self, _page_num: usize, _total_pages: usize, path: &Path) {
        if self.echo {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            self.bar.suspend(|| println!("Created: {name}"));
        }
        self.bar.inc(1);
    }

    fn on_page_error(&self, _page_num: usize, _total_pages: usize, _error: &str) {
        self.clear();
    }

    fn on_conversion_complete(&self, _total_pages: usize, _output_dir: &Path) {
        self.clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Pages next to the PDF, 150 DPI
  pdf2png document.pdf

  # Into a folder (created if missing)
  pdf2png document.pdf ./extracted_images

  # Into a folder at 300 DPI
  pdf2png document.pdf ./high_quality 300

  # Only pages 2 to 4 of an encrypted file
  pdf2png --pages 2-4 --password secret statement.pdf ./out

OUTPUT:
  One PNG per page, named <stem>_PAGE_<n>.png (n starts at 1, no padding).
  Existing files with the same name are overwritten.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH     Path to libpdfium (file or directory)
  PDF2PNG_DPI         Default for the [DPI] argument
  PDF2PNG_PASSWORD    PDF user password
  PDF2PNG_PAGES       Default for --pages
  RUST_LOG            Log filter, e.g. RUST_LOG=pdf2png=debug

ERRORS:
  Failures print one `Error: <message>` line and exit with status 1.
  With --verbose, setup errors (missing libpdfium, missing password) are
  followed by advice on how to fix them.
"#;

/// Convert each page of a PDF to a separate PNG file.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2png",
    version,
    about = "Convert each page of a PDF to a separate PNG file",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Source PDF file.
    pdf_file: PathBuf,

    /// Folder for the PNG files. Default: the PDF's own folder.
    output_folder: Option<PathBuf>,

    /// Rendering resolution in dots per inch. Default: 150.
    #[arg(env = "PDF2PNG_DPI", allow_negative_numbers = true)]
    dpi: Option<String>,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2PNG_PASSWORD")]
    password: Option<String>,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "PDF2PNG_PAGES", default_value = "all")]
    pages: String,

    /// Print the result as JSON instead of the summary.
    #[arg(long)]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "PDF2PNG_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2PNG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2PNG_QUIET")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
                ErrorKind::MissingRequiredArgument => {
                    let _ = e.print();
                    eprintln!("{EXAMPLE}");
                }
                _ => {
                    let _ = e.print();
                }
            }
            return ExitCode::from(1);
        }
    };

    // ── Logging setup ────────────────────────────────────────────────────
    // Library INFO events duplicate the `Created:` lines, so they only show
    // up with --verbose or an explicit RUST_LOG.
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            if cli.verbose {
                let hint = e.downcast_ref::<Pdf2PngError>().and_then(Pdf2PngError::hint);
                if let Some(hint) = hint {
                    eprintln!("\n{hint}");
                }
            }
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let show_progress =
        !cli.quiet && !cli.no_progress && !cli.json && io::stderr().is_terminal();
    let progress_cb = CliProgressCallback::new(show_progress, !cli.quiet && !cli.json);

    let config = build_config(cli, Arc::clone(&progress_cb))?;
    let output = match convert(&cli.pdf_file, &config) {
        Ok(output) => output,
        Err(e) => {
            // Bind and open errors fire before any callback; the spinner is
            // still ticking.
            progress_cb.clear();
            return Err(e.into());
        }
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet {
        print_summary(&output);
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Arc<CliProgressCallback>) -> Result<ConversionConfig> {
    let dpi = match cli.dpi {
        Some(ref raw) => parse_dpi(raw)?,
        None => DEFAULT_DPI,
    };
    let pages: PageSelection = cli.pages.parse()?;

    let mut builder = ConversionConfig::builder()
        .dpi(dpi)
        .pages(pages)
        .progress_callback(progress as ProgressCallback);

    if let Some(ref dir) = cli.output_folder {
        builder = builder.output_dir(dir);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }

    Ok(builder.build()?)
}

fn print_summary(output: &ConversionOutput) {
    println!();
    println!(
        "Successfully converted {} pages to PNG files",
        output.files.len()
    );
    println!("Files saved to: {}", output.output_dir.display());
}
