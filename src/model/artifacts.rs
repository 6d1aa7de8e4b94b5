//! Artifacts produced for one output page.

use serde::{Deserialize, Serialize};

use super::TextLayout;

/// Everything produced for a single output page: a standalone PDF, two
/// raster encodings, and the reconstructed text layout.
///
/// Paths are relative to the parent of the output root. Output page numbers
/// are assigned by the caller and are not checked for uniqueness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPage {
    /// Standalone single-page PDF
    pub pdf_path: String,

    /// Lossless raster
    pub png_path: String,

    /// Lossy raster (quality 90)
    pub jpg_path: String,

    /// Raster width in pixels
    pub width: u32,

    /// Raster height in pixels
    pub height: u32,

    /// Text layout in the same coordinate frame as the raster
    pub text_data: TextLayout,
}
