//! Clip filtering and paragraph clustering over raw token streams.
//!
//! The reconstruction is a single left-to-right pass over the token stream
//! in the order the backend produced it: tokens are trimmed, filtered and
//! remapped against an optional clip region, appended to the word list, and
//! clustered into paragraphs by vertical distance. Feeding the same stream
//! twice yields identical output.

use crate::backend::RawToken;
use crate::model::{Paragraph, Rect, TextLayout, Word};

/// Maximum vertical distance, in page units, between two consecutive tokens
/// that still belong to the same paragraph.
pub const LINE_THRESHOLD: f32 = 5.0;

/// Font name reported when the backend does not provide one.
const UNKNOWN_FONT: &str = "Unknown";

/// Filters token boxes against an optional clip region and shifts survivors
/// into clip-local coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClipTransform {
    clip: Option<Rect>,
}

impl ClipTransform {
    /// Create a transform for the given clip region, or a pass-through when
    /// `clip` is `None`.
    pub fn new(clip: Option<Rect>) -> Self {
        Self { clip }
    }

    /// Apply the transform to one token bounding box.
    ///
    /// Inclusion is decided by the token's top-left corner alone: a token
    /// whose corner lies inside the clip (edges inclusive) is kept even when
    /// its box extends past the clip boundary, and a token whose corner lies
    /// outside is dropped regardless of how much of it overlaps. Consumers
    /// depend on this exact corner rule; widening it to full-rectangle
    /// overlap changes which tokens survive a split.
    ///
    /// Survivors are translated so the clip's top-left corner becomes the
    /// origin; width and height are unchanged.
    pub fn apply(&self, bounds: Rect) -> Option<Rect> {
        match self.clip {
            None => Some(bounds),
            Some(clip) => {
                if !clip.contains(bounds.x0, bounds.y0) {
                    return None;
                }
                Some(bounds.shifted(-clip.x0, -clip.y0))
            }
        }
    }
}

/// Rebuilds word and paragraph structure from a page's raw token stream.
pub struct LayoutReconstructor {
    clip: ClipTransform,
    line_threshold: f32,
}

impl LayoutReconstructor {
    /// Create a reconstructor, optionally restricted to a clip region.
    pub fn new(clip: Option<Rect>) -> Self {
        Self {
            clip: ClipTransform::new(clip),
            line_threshold: LINE_THRESHOLD,
        }
    }

    /// Run the reconstruction pass over a token stream.
    ///
    /// Paragraph order equals the order of each paragraph's first token;
    /// word order is the filtered stream order. The break test compares each
    /// token against the vertical position of the *previous token*, not the
    /// paragraph's first line, so a gradually drifting column stays in one
    /// paragraph as long as consecutive gaps stay under the threshold.
    pub fn reconstruct(&self, tokens: Vec<RawToken>) -> TextLayout {
        let mut words: Vec<Word> = Vec::new();
        let mut paragraphs: Vec<Paragraph> = Vec::new();
        let mut current: Option<Paragraph> = None;
        let mut last_y: Option<f32> = None;

        for token in tokens {
            let text = token.text.trim();
            if text.is_empty() {
                continue;
            }

            let bounds = match self.clip.apply(token.bounds) {
                Some(bounds) => bounds,
                None => continue,
            };

            let word = Word {
                text: text.to_string(),
                x: bounds.x0,
                y: bounds.y0,
                width: bounds.width(),
                height: bounds.height(),
                font_name: token
                    .font_name
                    .unwrap_or_else(|| UNKNOWN_FONT.to_string()),
                font_size: token.font_size.unwrap_or_else(|| bounds.height()),
            };

            let starts_new = match last_y {
                None => true,
                Some(y) => (word.y - y).abs() > self.line_threshold,
            };

            if starts_new {
                if let Some(done) = current.take() {
                    paragraphs.push(done);
                }
                current = Some(Paragraph::open(&word));
            } else if let Some(paragraph) = current.as_mut() {
                paragraph.push(&word);
            }

            last_y = Some(word.y);
            words.push(word);
        }

        if let Some(done) = current.take() {
            paragraphs.push(done);
        }

        TextLayout { paragraphs, words }
    }
}
