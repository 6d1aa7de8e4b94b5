//! Geometric primitives: rectangles and per-page measurements.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Aspect ratio above which a page is treated as a scanned two-page spread.
///
/// Fixed by contract; not derived from document metadata.
pub const DOUBLE_PAGE_RATIO: f32 = 1.5;

/// An axis-aligned rectangle with a top-left origin.
///
/// Used both for clip regions and for derived bounding boxes. Invariant:
/// `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    /// Create a new rectangle from its corner coordinates.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Check whether a point lies within the rectangle, edges inclusive.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    /// Translate both corners by the given offsets.
    pub fn shifted(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x0 + dx, self.y0 + dy, self.x1 + dx, self.y1 + dy)
    }
}

/// Measured geometry of one source page.
///
/// Produced once per analysis pass and read-only afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    /// Source page index (0-based, document order)
    pub index: usize,

    /// Page width in page units
    pub width: f32,

    /// Page height in page units
    pub height: f32,

    /// `width / height`
    pub aspect_ratio: f32,

    /// Whether the page looks like a scanned two-page spread
    pub is_double_page: bool,
}

impl PageGeometry {
    /// Measure a page, deriving its aspect ratio and double-page flag.
    ///
    /// The flag is strict: a ratio of exactly [`DOUBLE_PAGE_RATIO`] is a
    /// single page. Non-positive height is an error, never a sentinel
    /// geometry.
    pub fn measure(index: usize, width: f32, height: f32) -> Result<Self> {
        if height <= 0.0 {
            return Err(Error::Geometry(format!(
                "page {index} has non-positive height {height}"
            )));
        }
        let aspect_ratio = width / height;
        Ok(Self {
            index,
            width,
            height,
            aspect_ratio,
            is_double_page: aspect_ratio > DOUBLE_PAGE_RATIO,
        })
    }
}
