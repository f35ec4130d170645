use crate::image::ImageError;
use thiserror::Error;

/// All errors that the document layer can generate while building or writing a PDF
#[derive(Error, Debug)]
pub enum PDFError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error("font `{0}` has no unicode cmap table")]
    /// The font can't be embedded because its characters can't be mapped
    MissingCmap(String),

    #[error(transparent)]
    /// An image could not be decoded or encoded
    Image(#[from] ImageError),

    #[error("page {0} is referenced in the page order but is missing from the document")]
    /// The page order refers to a page that doesn't exist
    PageMissing(usize),
}
