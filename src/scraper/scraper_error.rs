use crate::errors::ServerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTML parse error: {0}")]
    HtmlParse(String),
    /// The page no longer has the shape the extractor reads positionally.
    #[error("Unexpected page structure: missing {element} in block {block}")]
    MissingElement { block: usize, element: String },
    #[error("page {page}: {source}")]
    Page {
        page: u32,
        #[source]
        source: Box<ScraperError>,
    },
    #[error("Store error: {0}")]
    Store(#[from] ServerError),
}
