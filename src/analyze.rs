//! Per-page geometry measurement and double-page detection.

use crate::backend::DocumentBackend;
use crate::diag::DiagnosticSink;
use crate::error::{Error, Result};
use crate::model::PageGeometry;

/// Measures every page of a document and flags double-page spreads.
pub struct PageAnalyzer<'a, B: DocumentBackend> {
    backend: &'a B,
}

impl<'a, B: DocumentBackend> PageAnalyzer<'a, B> {
    /// Create an analyzer over an open document.
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Measure all pages in document order.
    ///
    /// Emits one note to `sink` for every page flagged as a double-page
    /// spread; the notes are operator-facing only and not part of the
    /// returned data. Fails on the first page that cannot be measured.
    pub fn analyze(&self, sink: &mut dyn DiagnosticSink) -> Result<Vec<PageGeometry>> {
        let count = self.backend.page_count();
        let mut structure = Vec::with_capacity(count);

        for index in 0..count {
            let bounds = self.backend.page_bounds(index).map_err(|err| match err {
                Error::Geometry(_) => err,
                other => Error::Geometry(format!("page {index} is unreadable: {other}")),
            })?;
            let geometry = PageGeometry::measure(index, bounds.width(), bounds.height())?;

            if geometry.is_double_page {
                sink.note(&format!(
                    "page {}: {:.0}x{:.0} (ratio {:.2}) is a double-page spread",
                    index + 1,
                    geometry.width,
                    geometry.height,
                    geometry.aspect_ratio,
                ));
            }
            structure.push(geometry);
        }

        Ok(structure)
    }
}
