//! Document access backend.
//!
//! Abstracts the document-rendering library behind a small trait so that
//! geometry analysis and layout reconstruction stay independent of any
//! concrete PDF implementation. The default implementation renders with
//! MuPDF and exports standalone single-page documents with `lopdf`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use lopdf::{dictionary, Dictionary, Object, ObjectId, Stream};

use crate::error::{Error, Result};
use crate::model::Rect;

/// A positioned text span as produced by the rendering backend.
///
/// Coordinates are in source-page space with a top-left origin. Font
/// information is optional; consumers fall back to defaults when absent.
#[derive(Debug, Clone, PartialEq)]
pub struct RawToken {
    /// The span text, possibly with surrounding whitespace
    pub text: String,

    /// Bounding box in source-page coordinates
    pub bounds: Rect,

    /// Font name, if the backend reports one
    pub font_name: Option<String>,

    /// Font size, if the backend reports one
    pub font_size: Option<f32>,
}

/// Abstract interface for the document-rendering collaborator.
///
/// One instance wraps one open document and lives for a single command
/// invocation. Implementations must report pages in document order and
/// tokens in reading order.
pub trait DocumentBackend {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Bounding rectangle of a page, origin at the top-left corner.
    fn page_bounds(&self, index: usize) -> Result<Rect>;

    /// Extract the ordered token stream of a page.
    fn extract_tokens(&self, index: usize) -> Result<Vec<RawToken>>;

    /// Write a page out as a standalone single-page document, optionally
    /// restricted to `crop` (top-left-origin page coordinates).
    fn export_page(&self, index: usize, crop: Option<Rect>, dest: &Path) -> Result<()>;

    /// Rasterize a page at `scale` on both axes, optionally restricted to
    /// `clip`, returning an RGB image.
    fn rasterize(&self, index: usize, scale: f32, clip: Option<Rect>) -> Result<image::RgbImage>;
}

// ---------------------------------------------------------------------------
// Single-page export via lopdf
// ---------------------------------------------------------------------------

/// Copy one page (1-indexed) of the document at `source` into a fresh
/// single-page document written to `dest`.
///
/// The page's object graph is deep-copied with a memo table, so resources
/// shared between objects stay shared and reference cycles terminate.
/// Attributes the page inherits from its page tree (`MediaBox`,
/// `Resources`, `Rotate`) are materialized onto the copied page. When
/// `crop` is given it becomes the page's `CropBox`, converted from
/// top-left-origin page space to PDF bottom-up coordinates.
pub fn write_single_page(
    source: &Path,
    page_number: u32,
    crop: Option<Rect>,
    dest: &Path,
) -> Result<()> {
    let doc = lopdf::Document::load(source)?;
    let pages = doc.get_pages();
    let page_id = *pages.get(&page_number).ok_or_else(|| {
        Error::PageOutOfRange((page_number as usize).saturating_sub(1), pages.len())
    })?;

    let mut target = lopdf::Document::with_version("1.5");
    let pages_id = target.new_object_id();

    let mut seen: HashMap<ObjectId, ObjectId> = HashMap::new();
    let cloned_page_id = clone_ref(&doc, &mut target, page_id, &mut seen)?;

    // Inheritable page attributes must travel with the page, since the
    // copy is detached from the source page tree.
    let missing: Vec<&[u8]> = {
        let page_dict = target
            .get_object(cloned_page_id)
            .ok()
            .and_then(|obj| obj.as_dict().ok());
        [b"MediaBox".as_slice(), b"Resources".as_slice(), b"Rotate".as_slice()]
            .into_iter()
            .filter(|key| !page_dict.map(|dict| dict.has(key)).unwrap_or(false))
            .collect()
    };
    let mut carried: Vec<(Vec<u8>, Object)> = Vec::new();
    for key in missing {
        if let Some(value) = resolve_inherited(&doc, page_id, key) {
            let value = value.clone();
            let cloned = clone_object(&doc, &mut target, &value, &mut seen)?;
            carried.push((key.to_vec(), cloned));
        }
    }

    let crop_box = match crop {
        Some(crop) => {
            let media = resolve_media_box(&doc, page_id).ok_or_else(|| {
                Error::Geometry(format!("page {page_number} has no MediaBox"))
            })?;
            Some(crop_box_array(&media, crop))
        }
        None => None,
    };

    if let Ok(Object::Dictionary(page_dict)) = target.get_object_mut(cloned_page_id) {
        page_dict.set("Parent", Object::Reference(pages_id));
        for (key, value) in carried {
            page_dict.set(key, value);
        }
        if let Some(crop_box) = crop_box {
            page_dict.set("CropBox", crop_box);
        }
    }

    target.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(cloned_page_id)],
            "Count" => 1i64,
        }),
    );

    let catalog_id = target.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    target.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    target.save_to(&mut buffer)?;
    fs::write(dest, buffer)?;
    Ok(())
}

/// Clone the object behind a reference, returning its ID in `target`.
///
/// The memo table breaks cycles: the new ID is reserved before the object
/// body is cloned, so self-referencing graphs resolve to the reserved ID
/// instead of recursing forever.
fn clone_ref(
    source: &lopdf::Document,
    target: &mut lopdf::Document,
    id: ObjectId,
    seen: &mut HashMap<ObjectId, ObjectId>,
) -> Result<ObjectId> {
    if let Some(&mapped) = seen.get(&id) {
        return Ok(mapped);
    }
    let new_id = target.new_object_id();
    seen.insert(id, new_id);
    target.objects.insert(new_id, Object::Null);

    let object = source.get_object(id)?.clone();
    let cloned = clone_object(source, target, &object, seen)?;
    target.objects.insert(new_id, cloned);
    Ok(new_id)
}

/// Deep-clone one object, rewriting references into `target` IDs.
///
/// `/Parent` entries are skipped; the caller re-parents the page itself.
fn clone_object(
    source: &lopdf::Document,
    target: &mut lopdf::Document,
    object: &Object,
    seen: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match object {
        Object::Reference(id) => Ok(Object::Reference(clone_ref(source, target, *id, seen)?)),
        Object::Dictionary(dict) => Ok(Object::Dictionary(clone_dictionary(
            source, target, dict, seen,
        )?)),
        Object::Array(items) => {
            let mut cloned = Vec::with_capacity(items.len());
            for item in items {
                cloned.push(clone_object(source, target, item, seen)?);
            }
            Ok(Object::Array(cloned))
        }
        Object::Stream(stream) => {
            let dict = clone_dictionary(source, target, &stream.dict, seen)?;
            Ok(Object::Stream(Stream::new(dict, stream.content.clone())))
        }
        other => Ok(other.clone()),
    }
}

fn clone_dictionary(
    source: &lopdf::Document,
    target: &mut lopdf::Document,
    dict: &Dictionary,
    seen: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let mut cloned = Dictionary::new();
    for (key, value) in dict.iter() {
        if key == b"Parent" {
            continue;
        }
        cloned.set(key.clone(), clone_object(source, target, value, seen)?);
    }
    Ok(cloned)
}

/// Look up a page attribute, walking `/Parent` links for inherited values.
fn resolve_inherited<'a>(
    doc: &'a lopdf::Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut dict = doc.get_object(page_id).ok()?.as_dict().ok()?;
    loop {
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        let parent_id = match dict.get(b"Parent").ok()? {
            Object::Reference(id) => *id,
            _ => return None,
        };
        dict = doc.get_object(parent_id).ok()?.as_dict().ok()?;
    }
}

/// Resolve a page's effective `MediaBox` as `[x0, y0, x1, y1]`.
fn resolve_media_box(doc: &lopdf::Document, page_id: ObjectId) -> Option<[f32; 4]> {
    let value = resolve_inherited(doc, page_id, b"MediaBox")?;
    let items = match value {
        Object::Array(items) => items,
        Object::Reference(id) => match doc.get_object(*id).ok()? {
            Object::Array(items) => items,
            _ => return None,
        },
        _ => return None,
    };
    if items.len() != 4 {
        return None;
    }
    let mut out = [0.0f32; 4];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = as_number(item)?;
    }
    Some(out)
}

fn as_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Convert a top-left-origin clip into a PDF bottom-up `/CropBox` array.
fn crop_box_array(media: &[f32; 4], crop: Rect) -> Object {
    let [mx0, _, _, my1] = *media;
    Object::Array(vec![
        Object::Real(mx0 + crop.x0),
        Object::Real(my1 - crop.y1),
        Object::Real(mx0 + crop.x1),
        Object::Real(my1 - crop.y0),
    ])
}

// ---------------------------------------------------------------------------
// MupdfBackend — concrete implementation backed by MuPDF
// ---------------------------------------------------------------------------

#[cfg(feature = "render")]
mod mupdf_backend {
    use std::path::{Path, PathBuf};

    use mupdf::{Colorspace, Document as MupdfDocument, Matrix, TextPageOptions};

    use super::{write_single_page, DocumentBackend, RawToken};
    use crate::error::{Error, Result};
    use crate::model::Rect;

    /// [`DocumentBackend`] backed by MuPDF.
    ///
    /// Rasterization and structured-text extraction go through MuPDF;
    /// single-page export goes through `lopdf`, which re-reads the source
    /// file. The wrapped document is confined to one invocation and is not
    /// shared across threads.
    pub struct MupdfBackend {
        doc: MupdfDocument,
        path: PathBuf,
        page_count: usize,
    }

    impl MupdfBackend {
        /// Open a document from a file path.
        pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
            let path = path.as_ref().to_path_buf();
            let doc = MupdfDocument::open(path.to_string_lossy().as_ref())
                .map_err(|e| Error::Render(format!("failed to open {}: {e}", path.display())))?;
            let page_count = doc.page_count()? as usize;
            Ok(Self {
                doc,
                path,
                page_count,
            })
        }

        fn load_page(&self, index: usize) -> Result<mupdf::Page> {
            if index >= self.page_count {
                return Err(Error::PageOutOfRange(index, self.page_count));
            }
            Ok(self.doc.load_page(index as i32)?)
        }
    }

    impl DocumentBackend for MupdfBackend {
        fn page_count(&self) -> usize {
            self.page_count
        }

        fn page_bounds(&self, index: usize) -> Result<Rect> {
            let page = self.load_page(index)?;
            let bounds = page.bounds()?;
            Ok(Rect::new(bounds.x0, bounds.y0, bounds.x1, bounds.y1))
        }

        fn extract_tokens(&self, index: usize) -> Result<Vec<RawToken>> {
            let page = self.load_page(index)?;
            let text_page = page
                .to_text_page(TextPageOptions::empty())
                .map_err(|e| Error::Extraction(e.to_string()))?;

            let mut tokens = Vec::new();
            for block in text_page.blocks() {
                for line in block.lines() {
                    let mut text = String::new();
                    let mut bounds: Option<Rect> = None;

                    for ch in line.chars() {
                        let c = match ch.char() {
                            Some(c) => c,
                            None => continue,
                        };
                        if c.is_whitespace() {
                            flush_word(&mut tokens, &mut text, &mut bounds);
                            continue;
                        }

                        let quad = ch.quad();
                        let x0 = quad.ul.x.min(quad.ll.x);
                        let y0 = quad.ul.y.min(quad.ur.y);
                        let x1 = quad.ur.x.max(quad.lr.x);
                        let y1 = quad.ll.y.max(quad.lr.y);

                        text.push(c);
                        bounds = Some(match bounds {
                            Some(b) => Rect::new(
                                b.x0.min(x0),
                                b.y0.min(y0),
                                b.x1.max(x1),
                                b.y1.max(y1),
                            ),
                            None => Rect::new(x0, y0, x1, y1),
                        });
                    }
                    flush_word(&mut tokens, &mut text, &mut bounds);
                }
            }
            Ok(tokens)
        }

        fn export_page(&self, index: usize, crop: Option<Rect>, dest: &Path) -> Result<()> {
            if index >= self.page_count {
                return Err(Error::PageOutOfRange(index, self.page_count));
            }
            write_single_page(&self.path, index as u32 + 1, crop, dest)
        }

        fn rasterize(
            &self,
            index: usize,
            scale: f32,
            clip: Option<Rect>,
        ) -> Result<image::RgbImage> {
            let page = self.load_page(index)?;
            let matrix = Matrix::new_scale(scale, scale);
            let pixmap = page.to_pixmap(&matrix, &Colorspace::device_rgb(), false, true)?;
            let full = pixmap_to_rgb(&pixmap)?;

            match clip {
                None => Ok(full),
                Some(clip) => {
                    let x = ((clip.x0 * scale).round().max(0.0) as u32).min(full.width());
                    let y = ((clip.y0 * scale).round().max(0.0) as u32).min(full.height());
                    let w = ((clip.width() * scale).round() as u32).min(full.width() - x);
                    let h = ((clip.height() * scale).round() as u32).min(full.height() - y);
                    Ok(image::imageops::crop_imm(&full, x, y, w, h).to_image())
                }
            }
        }
    }

    /// Append the accumulated word to `tokens` and reset the accumulators.
    fn flush_word(tokens: &mut Vec<RawToken>, text: &mut String, bounds: &mut Option<Rect>) {
        if let Some(rect) = bounds.take() {
            if !text.is_empty() {
                tokens.push(RawToken {
                    text: std::mem::take(text),
                    bounds: rect,
                    font_name: None,
                    font_size: None,
                });
            }
        }
        text.clear();
    }

    /// Convert a MuPDF pixmap into an RGB image buffer.
    fn pixmap_to_rgb(pixmap: &mupdf::Pixmap) -> Result<image::RgbImage> {
        let width = pixmap.width() as u32;
        let height = pixmap.height() as u32;
        let samples = pixmap.samples();
        let n = pixmap.n() as usize;

        let mut buffer = Vec::with_capacity((width * height * 3) as usize);
        for pixel in 0..(width as usize * height as usize) {
            let offset = pixel * n;
            buffer.push(samples.get(offset).copied().unwrap_or(0));
            buffer.push(samples.get(offset + 1).copied().unwrap_or(0));
            buffer.push(samples.get(offset + 2).copied().unwrap_or(0));
        }

        image::RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| Error::Encode("pixmap buffer size mismatch".to_string()))
    }
}

#[cfg(feature = "render")]
pub use mupdf_backend::MupdfBackend;
