//! Word and paragraph types produced by layout reconstruction.

use serde::{Deserialize, Serialize};

/// One positioned word extracted from a page.
///
/// Coordinates are in the frame the word was reconstructed in: source-page
/// units normally, clip-local units when a clip region was applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// The word text, trimmed and non-empty
    pub text: String,

    /// Left edge
    pub x: f32,

    /// Top edge
    pub y: f32,

    /// Horizontal extent
    pub width: f32,

    /// Vertical extent
    pub height: f32,

    /// Font name, `"Unknown"` when the backend reports none
    pub font_name: String,

    /// Font size in page units, approximated from the word height when the
    /// backend reports none
    pub font_size: f32,
}

impl Word {
    /// Right edge of the word.
    pub fn x1(&self) -> f32 {
        self.x + self.width
    }
}

/// A run of vertically adjacent words grouped by line distance.
///
/// Not a semantic paragraph: membership is decided purely by the vertical
/// gap between consecutive words in stream order. Owned by the layout it
/// belongs to and never mutated after the run closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Member words joined with single spaces
    pub text: String,

    /// Left edge of the first word
    pub x: f32,

    /// Top edge of the first word
    pub y: f32,

    /// Horizontal extent, measured from `x`
    pub width: f32,

    /// Vertical extent of the tallest member word
    pub height: f32,

    /// Number of member words
    pub word_count: usize,
}

impl Paragraph {
    /// Open a paragraph seeded with its first word.
    pub fn open(word: &Word) -> Self {
        Self {
            text: word.text.clone(),
            x: word.x,
            y: word.y,
            width: word.width,
            height: word.height,
            word_count: 1,
        }
    }

    /// Fold another word into the paragraph.
    ///
    /// Width grows toward the word's right edge measured from the paragraph's
    /// left edge. Height tracks the tallest member word's own extent, not the
    /// distance from the paragraph top.
    pub fn push(&mut self, word: &Word) {
        self.text.push(' ');
        self.text.push_str(&word.text);
        self.width = self.width.max(word.x1() - self.x);
        self.height = self.height.max(word.height);
        self.word_count += 1;
    }
}

/// Reconstructed text layout for one page or clip region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextLayout {
    /// Paragraphs in order of their first constituent word
    pub paragraphs: Vec<Paragraph>,

    /// All surviving words in stream order
    pub words: Vec<Word>,
}

impl TextLayout {
    /// Check whether the layout holds no words at all.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Plain text of the layout, one line per paragraph.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
