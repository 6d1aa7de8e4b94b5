//! Output-page orchestration: single-page export, rasterization, and text
//! layout reconstruction for one output page at a time.

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;

use crate::backend::DocumentBackend;
use crate::diag::DiagnosticSink;
use crate::error::Result;
use crate::layout::LayoutReconstructor;
use crate::model::{Rect, RenderedPage};
use crate::split::SplitPlan;

/// Linear magnification applied on both axes when rasterizing.
pub const RASTER_SCALE: f32 = 2.0;

/// Quality of the lossy JPEG re-encode.
pub const JPEG_QUALITY: u8 = 90;

/// Renders output pages from one source document into an output directory.
///
/// Artifacts land under `<output_dir>/pages/` as `page_<N>.pdf`, `.png` and
/// `.jpg`; reported paths are relative to the parent of `output_dir`. A
/// failing sub-step aborts the page; partially written files are left in
/// place.
pub struct PageProcessor<'a, B: DocumentBackend> {
    backend: &'a B,
    output_dir: PathBuf,
}

impl<'a, B: DocumentBackend> PageProcessor<'a, B> {
    /// Create a processor writing under `output_dir`.
    pub fn new(backend: &'a B, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            output_dir: output_dir.into(),
        }
    }

    /// Produce all artifacts for one source page as output page `number`.
    pub fn process_page(&self, index: usize, number: u32) -> Result<RenderedPage> {
        self.render(index, number, None)
    }

    /// Split a double-page spread into two output pages, left half first,
    /// numbered `start_number` and `start_number + 1`.
    pub fn process_double_page(
        &self,
        index: usize,
        start_number: u32,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Vec<RenderedPage>> {
        let bounds = self.backend.page_bounds(index)?;
        let plan = SplitPlan::for_page(bounds.width(), bounds.height(), start_number);

        let left = self.render(index, plan.left_number, Some(plan.left))?;
        sink.note(&format!("page {} (left half) written", plan.left_number));

        let right = self.render(index, plan.right_number, Some(plan.right))?;
        sink.note(&format!("page {} (right half) written", plan.right_number));

        Ok(vec![left, right])
    }

    fn render(&self, index: usize, number: u32, clip: Option<Rect>) -> Result<RenderedPage> {
        let pages_dir = self.output_dir.join("pages");
        fs::create_dir_all(&pages_dir)?;

        let prefix = format!("page_{number}");
        let pdf_path = pages_dir.join(format!("{prefix}.pdf"));
        let png_path = pages_dir.join(format!("{prefix}.png"));
        let jpg_path = pages_dir.join(format!("{prefix}.jpg"));

        self.backend.export_page(index, clip, &pdf_path)?;

        let raster = self.backend.rasterize(index, RASTER_SCALE, clip)?;
        raster.save(&png_path)?;
        write_jpeg(&raster, &jpg_path)?;

        log::debug!(
            "rendered page {index} as output {number}: {}x{} px",
            raster.width(),
            raster.height()
        );

        // Text shares the raster's coordinate frame: same clip, page units.
        let tokens = self.backend.extract_tokens(index)?;
        let text_data = LayoutReconstructor::new(clip).reconstruct(tokens);

        Ok(RenderedPage {
            pdf_path: relative_to_parent(&pdf_path, &self.output_dir),
            png_path: relative_to_parent(&png_path, &self.output_dir),
            jpg_path: relative_to_parent(&jpg_path, &self.output_dir),
            width: raster.width(),
            height: raster.height(),
            text_data,
        })
    }
}

fn write_jpeg(image: &image::RgbImage, path: &Path) -> Result<()> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    let mut encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
    encoder.encode_image(image)?;
    Ok(())
}

/// Express `path` relative to the parent of the output root, falling back
/// to the path itself when there is no parent to strip.
fn relative_to_parent(path: &Path, output_dir: &Path) -> String {
    match output_dir.parent() {
        Some(parent) => path
            .strip_prefix(parent)
            .unwrap_or(path)
            .display()
            .to_string(),
        None => path.display().to_string(),
    }
}
