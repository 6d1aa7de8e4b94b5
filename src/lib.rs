//! # pagemill
//!
//! Page geometry analysis and text-layout reconstruction for paginated
//! documents.
//!
//! pagemill turns each page of a PDF into three artifacts: a standalone
//! single-page document, a fixed-magnification raster (PNG plus a lossy
//! JPEG), and a word/paragraph reconstruction of the page's text layout.
//! Pages whose aspect ratio marks them as scanned two-page spreads can be
//! split at the midline into two independent logical pages, with geometry
//! and text remapped into each half's own coordinate frame.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pagemill::{analyze_file, process_page, Quiet};
//!
//! fn main() -> pagemill::Result<()> {
//!     // Find double-page spreads
//!     let structure = analyze_file("book.pdf", &mut Quiet)?;
//!     for page in &structure {
//!         println!("page {}: double = {}", page.index, page.is_double_page);
//!     }
//!
//!     // Materialize source page 0 as output page 1
//!     let result = process_page("book.pdf", "output", 0, 1)?;
//!     println!("{}x{} px, {} words", result.width, result.height,
//!         result.text_data.words.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Design
//!
//! - **Backend seam**: all document access (page bounds, token streams,
//!   single-page export, rasterization) goes through [`DocumentBackend`];
//!   the default implementation is MuPDF-based (feature `render`, on by
//!   default).
//! - **Deterministic layout**: reconstruction is a pure single pass over
//!   the backend's ordered token stream.
//! - **One invocation, one page**: no shared state, no retries, no cleanup
//!   of partial output on failure. Callers own output-page numbering.

pub mod analyze;
pub mod backend;
pub mod diag;
pub mod error;
pub mod layout;
pub mod model;
pub mod process;
pub mod split;

// Re-export commonly used types
pub use analyze::PageAnalyzer;
#[cfg(feature = "render")]
pub use backend::MupdfBackend;
pub use backend::{DocumentBackend, RawToken};
pub use diag::{DiagnosticSink, FnSink, LogSink, Quiet};
pub use error::{Error, Result};
pub use layout::{ClipTransform, LayoutReconstructor, LINE_THRESHOLD};
pub use model::{
    PageGeometry, Paragraph, Rect, RenderedPage, TextLayout, Word, DOUBLE_PAGE_RATIO,
};
pub use process::{PageProcessor, JPEG_QUALITY, RASTER_SCALE};
pub use split::SplitPlan;

#[cfg(feature = "render")]
use std::path::Path;

/// Measure every page of a document and flag double-page spreads.
///
/// One diagnostic note is emitted to `sink` per detected spread.
///
/// # Example
///
/// ```no_run
/// use pagemill::{analyze_file, LogSink};
///
/// let structure = analyze_file("book.pdf", &mut LogSink).unwrap();
/// println!("{} pages", structure.len());
/// ```
#[cfg(feature = "render")]
pub fn analyze_file<P: AsRef<Path>>(
    path: P,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<PageGeometry>> {
    let backend = MupdfBackend::open(path)?;
    PageAnalyzer::new(&backend).analyze(sink)
}

/// Produce all artifacts for one source page as output page `number`,
/// writing under `output_dir`.
#[cfg(feature = "render")]
pub fn process_page<P: AsRef<Path>, Q: AsRef<Path>>(
    path: P,
    output_dir: Q,
    index: usize,
    number: u32,
) -> Result<RenderedPage> {
    let backend = MupdfBackend::open(path)?;
    PageProcessor::new(&backend, output_dir.as_ref()).process_page(index, number)
}

/// Split a double-page spread into two output pages numbered `start_number`
/// and `start_number + 1`, left half first.
#[cfg(feature = "render")]
pub fn process_double_page<P: AsRef<Path>, Q: AsRef<Path>>(
    path: P,
    output_dir: Q,
    index: usize,
    start_number: u32,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<RenderedPage>> {
    let backend = MupdfBackend::open(path)?;
    PageProcessor::new(&backend, output_dir.as_ref()).process_double_page(
        index,
        start_number,
        sink,
    )
}
