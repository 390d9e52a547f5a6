//! Conversion behaviour against an in-memory engine.
//!
//! `MockEngine` stands in for pdfium: each "page" is a size in points and
//! rendering produces a blank RGBA buffer of `size × scale` pixels. Opening
//! and dropping documents is counted so the tests can prove the document is
//! released on every exit path.

use image::{DynamicImage, RgbaImage};
use pdf2png::{
    convert_with_engine, ConversionConfig, ConversionProgressCallback, ErrorKind, PageSelection,
    Pdf2PngError, RasterDocument, RasterEngine,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ── Test helpers ─────────────────────────────────────────────────────────────

const LETTER: (f32, f32) = (612.0, 792.0);

struct MockEngine {
    pages: Vec<(f32, f32)>,
    /// 1-indexed page whose rendering fails.
    fail_on: Option<usize>,
    fail_open: bool,
    opened: AtomicUsize,
    closed: Arc<AtomicUsize>,
}

impl MockEngine {
    fn with_pages(pages: Vec<(f32, f32)>) -> Self {
        Self {
            pages,
            fail_on: None,
            fail_open: false,
            opened: AtomicUsize::new(0),
            closed: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn letter(n: usize) -> Self {
        Self::with_pages(vec![LETTER; n])
    }

    fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

impl RasterEngine for MockEngine {
    fn open<'a>(
        &'a self,
        path: &Path,
        _password: Option<&'a str>,
    ) -> Result<Box<dyn RasterDocument + 'a>, Pdf2PngError> {
        if self.fail_open {
            return Err(Pdf2PngError::CorruptPdf {
                path: path.to_path_buf(),
                detail: "bad xref".into(),
            });
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockDocument { engine: self }))
    }
}

struct MockDocument<'a> {
    engine: &'a MockEngine,
}

impl RasterDocument for MockDocument<'_> {
    fn page_count(&self) -> usize {
        self.engine.pages.len()
    }

    fn render_page(&self, index: usize, scale: f32) -> Result<DynamicImage, Pdf2PngError> {
        if self.engine.fail_on == Some(index + 1) {
            return Err(Pdf2PngError::RasterisationFailed {
                page: index + 1,
                detail: "injected failure".into(),
            });
        }
        let (w, h) = self.engine.pages[index];
        let width = (w * scale).round() as u32;
        let height = (h * scale).round() as u32;
        Ok(DynamicImage::ImageRgba8(RgbaImage::new(width, height)))
    }
}

impl Drop for MockDocument<'_> {
    fn drop(&mut self) {
        self.engine.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Create `<dir>/<name>` with placeholder bytes; the mock never reads it.
fn fake_pdf(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"%PDF-1.4\n%%EOF\n").unwrap();
    path
}

fn config_into(dir: &Path) -> ConversionConfig {
    ConversionConfig::builder().output_dir(dir).build().unwrap()
}

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

fn sorted_dir_listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ── Page count, ordering, naming ─────────────────────────────────────────────

#[test]
fn returns_one_existing_file_per_page_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = fake_pdf(dir.path(), "book.pdf");
    let engine = MockEngine::letter(5);

    let output = convert_with_engine(&engine, &pdf, &ConversionConfig::default()).unwrap();

    assert_eq!(output.files.len(), 5);
    for (i, file) in output.files.iter().enumerate() {
        assert!(file.exists(), "missing {}", file.display());
        assert!(file.ends_with(format!("book_PAGE_{}.png", i + 1)));
    }
    assert_eq!(output.stats.total_pages, 5);
    assert_eq!(output.stats.converted_pages, 5);
    assert_eq!(output.stats.dpi, 150);
}

#[test]
fn filename_contract_for_three_page_report() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = fake_pdf(dir.path(), "report.pdf");
    let engine = MockEngine::letter(3);

    let output = convert_with_engine(&engine, &pdf, &ConversionConfig::default()).unwrap();

    assert_eq!(
        file_names(&output.files),
        vec!["report_PAGE_1.png", "report_PAGE_2.png", "report_PAGE_3.png"]
    );
}

#[test]
fn uppercase_extension_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = fake_pdf(dir.path(), "SCAN.PDF");
    let engine = MockEngine::letter(1);

    let output = convert_with_engine(&engine, &pdf, &ConversionConfig::default()).unwrap();
    assert_eq!(file_names(&output.files), vec!["SCAN_PAGE_1.png"]);
}

#[test]
fn default_output_dir_is_next_to_source() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = fake_pdf(dir.path(), "doc.pdf");
    let engine = MockEngine::letter(2);

    let output = convert_with_engine(&engine, &pdf, &ConversionConfig::default()).unwrap();

    assert_eq!(output.output_dir, dir.path());
    assert_eq!(
        sorted_dir_listing(dir.path()),
        vec!["doc.pdf", "doc_PAGE_1.png", "doc_PAGE_2.png"]
    );
}

#[test]
fn nested_output_dir_is_created_and_source_dir_untouched() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let pdf = fake_pdf(src.path(), "doc.pdf");
    let nested = out.path().join("a/b/c");
    let engine = MockEngine::letter(2);

    let output = convert_with_engine(&engine, &pdf, &config_into(&nested)).unwrap();

    assert!(nested.is_dir());
    assert_eq!(output.output_dir, nested);
    assert_eq!(
        sorted_dir_listing(&nested),
        vec!["doc_PAGE_1.png", "doc_PAGE_2.png"]
    );
    assert_eq!(sorted_dir_listing(src.path()), vec!["doc.pdf"]);
}

#[test]
fn zero_page_document_yields_empty_result() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = fake_pdf(dir.path(), "empty.pdf");
    let engine = MockEngine::letter(0);

    let output = convert_with_engine(&engine, &pdf, &ConversionConfig::default()).unwrap();

    assert!(output.files.is_empty());
    assert_eq!(engine.closed(), 1);
}

// ── Resource release ─────────────────────────────────────────────────────────

#[test]
fn document_released_after_success() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = fake_pdf(dir.path(), "doc.pdf");
    let engine = MockEngine::letter(3);

    convert_with_engine(&engine, &pdf, &ConversionConfig::default()).unwrap();

    assert_eq!(engine.opened(), 1);
    assert_eq!(engine.closed(), 1);
}

#[test]
fn document_released_when_a_middle_page_fails() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = fake_pdf(dir.path(), "doc.pdf");
    let mut engine = MockEngine::letter(4);
    engine.fail_on = Some(2);

    let err = convert_with_engine(&engine, &pdf, &ConversionConfig::default()).unwrap_err();

    assert!(
        matches!(err, Pdf2PngError::RasterisationFailed { page: 2, .. }),
        "got: {err:?}"
    );
    assert_eq!(err.kind(), ErrorKind::Render);
    assert_eq!(engine.opened(), 1);
    assert_eq!(engine.closed(), 1, "document must be closed after a page failure");

    // Iteration stopped at the failing page.
    assert!(dir.path().join("doc_PAGE_1.png").exists());
    assert!(!dir.path().join("doc_PAGE_2.png").exists());
    assert!(!dir.path().join("doc_PAGE_3.png").exists());
}

#[test]
fn document_released_when_writing_fails() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = fake_pdf(dir.path(), "doc.pdf");
    // A directory squatting on page 2's file name makes the rename fail.
    std::fs::create_dir(dir.path().join("doc_PAGE_2.png")).unwrap();
    std::fs::write(dir.path().join("doc_PAGE_2.png/keep"), b"x").unwrap();
    let engine = MockEngine::letter(3);

    let err = convert_with_engine(&engine, &pdf, &ConversionConfig::default()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io, "got: {err:?}");
    assert_eq!(engine.closed(), 1);
    assert!(!dir.path().join("doc_PAGE_3.png").exists());
    assert!(!dir.path().join("doc_PAGE_2.png.tmp").exists());
}

#[test]
fn open_failure_is_propagated() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = fake_pdf(dir.path(), "broken.pdf");
    let mut engine = MockEngine::letter(3);
    engine.fail_open = true;

    let err = convert_with_engine(&engine, &pdf, &ConversionConfig::default()).unwrap_err();

    assert!(matches!(err, Pdf2PngError::CorruptPdf { .. }));
    assert_eq!(err.kind(), ErrorKind::Render);
    assert_eq!(sorted_dir_listing(dir.path()), vec!["broken.pdf"]);
}

// ── Idempotence and DPI ──────────────────────────────────────────────────────

#[test]
fn second_run_overwrites_with_identical_names() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = fake_pdf(dir.path(), "doc.pdf");
    let out = dir.path().join("out");
    let engine = MockEngine::letter(3);
    let config = config_into(&out);

    let first = convert_with_engine(&engine, &pdf, &config).unwrap();
    let second = convert_with_engine(&engine, &pdf, &config).unwrap();

    assert_eq!(first.files, second.files);
    assert_eq!(
        sorted_dir_listing(&out),
        vec!["doc_PAGE_1.png", "doc_PAGE_2.png", "doc_PAGE_3.png"]
    );
    assert_eq!(engine.closed(), 2);
}

#[test]
fn rerun_at_new_dpi_replaces_previous_pixels() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = fake_pdf(dir.path(), "doc.pdf");
    let engine = MockEngine::letter(1);

    let low = ConversionConfig::builder().dpi(72).build().unwrap();
    let high = ConversionConfig::builder().dpi(144).build().unwrap();

    let path = convert_with_engine(&engine, &pdf, &low).unwrap().files[0].clone();
    assert_eq!(image::image_dimensions(&path).unwrap(), (612, 792));

    convert_with_engine(&engine, &pdf, &high).unwrap();
    assert_eq!(image::image_dimensions(&path).unwrap(), (1224, 1584));
}

#[test]
fn pixel_dimensions_scale_with_dpi() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = fake_pdf(dir.path(), "mixed.pdf");
    let engine = MockEngine::with_pages(vec![LETTER, (595.0, 842.0), (200.0, 100.0)]);

    let render_at = |dpi: u32| -> Vec<(u32, u32)> {
        let out = dir.path().join(format!("dpi{dpi}"));
        let config = ConversionConfig::builder()
            .dpi(dpi)
            .output_dir(&out)
            .build()
            .unwrap();
        convert_with_engine(&engine, &pdf, &config)
            .unwrap()
            .files
            .iter()
            .map(|f| image::image_dimensions(f).unwrap())
            .collect()
    };

    let low = render_at(100);
    let high = render_at(250);
    let ratio = 250.0 / 100.0;

    for ((lw, lh), (hw, hh)) in low.iter().zip(&high) {
        assert!(hw > lw && hh > lh);
        assert!((*hw as f64 - *lw as f64 * ratio).abs() <= ratio + 1.0);
        assert!((*hh as f64 - *lh as f64 * ratio).abs() <= ratio + 1.0);
    }
    assert_eq!(high[0], (2125, 2750));
}

// ── Input errors ─────────────────────────────────────────────────────────────

#[test]
fn missing_source_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let engine = MockEngine::letter(1);

    let err = convert_with_engine(
        &engine,
        dir.path().join("missing.pdf"),
        &ConversionConfig::default(),
    )
    .unwrap_err();

    assert!(matches!(err, Pdf2PngError::FileNotFound { .. }));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(engine.opened(), 0);
}

#[test]
fn non_pdf_extension_is_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let txt = dir.path().join("notes.txt");
    std::fs::write(&txt, b"just text").unwrap();
    let engine = MockEngine::letter(1);

    let err = convert_with_engine(&engine, &txt, &ConversionConfig::default()).unwrap_err();

    assert!(matches!(err, Pdf2PngError::NotAPdf { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(engine.opened(), 0);
}

#[test]
fn zero_dpi_is_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = fake_pdf(dir.path(), "doc.pdf");
    let engine = MockEngine::letter(1);

    // Bypass the builder, which would reject this up front.
    let mut config = ConversionConfig::default();
    config.dpi = 0;

    let err = convert_with_engine(&engine, &pdf, &config).unwrap_err();

    assert!(matches!(err, Pdf2PngError::InvalidDpi { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(engine.opened(), 0);
    assert_eq!(sorted_dir_listing(dir.path()), vec!["doc.pdf"]);
}

// ── Page selection ───────────────────────────────────────────────────────────

#[test]
fn page_set_keeps_real_page_numbers() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = fake_pdf(dir.path(), "doc.pdf");
    let engine = MockEngine::letter(5);
    let config = ConversionConfig::builder()
        .pages(PageSelection::Set(vec![4, 2]))
        .build()
        .unwrap();

    let output = convert_with_engine(&engine, &pdf, &config).unwrap();

    assert_eq!(
        file_names(&output.files),
        vec!["doc_PAGE_2.png", "doc_PAGE_4.png"]
    );
    assert_eq!(output.stats.total_pages, 5);
    assert_eq!(output.stats.converted_pages, 2);
}

#[test]
fn out_of_range_selection_fails_and_releases_document() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = fake_pdf(dir.path(), "doc.pdf");
    let engine = MockEngine::letter(3);
    let config = ConversionConfig::builder()
        .pages(PageSelection::Single(9))
        .build()
        .unwrap();

    let err = convert_with_engine(&engine, &pdf, &config).unwrap_err();

    assert!(matches!(
        err,
        Pdf2PngError::PageOutOfRange { page: 9, total: 3 }
    ));
    assert_eq!(engine.closed(), 1);
}

// ── Progress notifications ───────────────────────────────────────────────────

#[derive(Default)]
struct EventLog {
    events: Mutex<Vec<String>>,
}

impl ConversionProgressCallback for EventLog {
    fn on_conversion_start(&self, total_pages: usize) {
        self.events.lock().unwrap().push(format!("start {total_pages}"));
    }

    fn on_page_written(&self, page_num: usize, total_pages: usize, path: &Path) {
        let name = path.file_name().unwrap().to_string_lossy();
        self.events
            .lock()
            .unwrap()
            .push(format!("written {page_num}/{total_pages} {name}"));
    }

    fn on_page_error(&self, page_num: usize, _total_pages: usize, _error: &str) {
        self.events.lock().unwrap().push(format!("error {page_num}"));
    }

    fn on_conversion_complete(&self, total_pages: usize, _output_dir: &Path) {
        self.events
            .lock()
            .unwrap()
            .push(format!("complete {total_pages}"));
    }
}

#[test]
fn progress_events_name_each_file_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = fake_pdf(dir.path(), "doc.pdf");
    let engine = MockEngine::letter(2);
    let log = Arc::new(EventLog::default());
    let config = ConversionConfig::builder()
        .progress_callback(log.clone())
        .build()
        .unwrap();

    convert_with_engine(&engine, &pdf, &config).unwrap();

    assert_eq!(
        *log.events.lock().unwrap(),
        vec![
            "start 2",
            "written 1/2 doc_PAGE_1.png",
            "written 2/2 doc_PAGE_2.png",
            "complete 2",
        ]
    );
}

#[test]
fn progress_reports_failing_page_and_no_completion() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = fake_pdf(dir.path(), "doc.pdf");
    let mut engine = MockEngine::letter(3);
    engine.fail_on = Some(3);
    let log = Arc::new(EventLog::default());
    let config = ConversionConfig::builder()
        .progress_callback(log.clone())
        .build()
        .unwrap();

    convert_with_engine(&engine, &pdf, &config).unwrap_err();

    let events = log.events.lock().unwrap();
    assert_eq!(events.last().map(String::as_str), Some("error 3"));
    assert!(!events.iter().any(|e| e.starts_with("complete")));
}
