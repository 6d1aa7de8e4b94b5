//! Error types for the pagemill library.

use std::io;
use thiserror::Error;

/// Result type alias for pagemill operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while analyzing or rendering pages.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A page has unusable dimensions or could not be measured.
    #[error("Geometry error: {0}")]
    Geometry(String),

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// Token extraction failed in the rendering backend.
    #[error("Text extraction error: {0}")]
    Extraction(String),

    /// The rendering backend failed to open a document or produce a page.
    #[error("Render error: {0}")]
    Render(String),

    /// Raster image encoding failure.
    #[error("Image encoding error: {0}")]
    Encode(String),

    /// Unknown command or malformed arguments.
    #[error("Command error: {0}")]
    Command(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::Render(err.to_string())
    }
}

#[cfg(feature = "render")]
impl From<mupdf::Error> for Error {
    fn from(err: mupdf::Error) -> Self {
        Error::Render(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Encode(err.to_string())
    }
}
