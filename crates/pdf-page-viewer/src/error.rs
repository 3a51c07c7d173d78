use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewerError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),

    #[error("Renderer unavailable: {0}")]
    RendererUnavailable(String),

    #[error("Render failed: {0}")]
    RenderFailed(String),

    #[error("No document loaded")]
    NoDocument,

    #[error("Invalid page number: {0}")]
    InvalidPageNumber(i64),

    #[error("Page {page} out of range (1-{page_count})")]
    PageOutOfRange { page: u32, page_count: u32 },

    #[error("Host bridge error: {0}")]
    Bridge(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ViewerError {
    fn from(err: std::io::Error) -> Self {
        ViewerError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ViewerError {
    fn from(err: serde_json::Error) -> Self {
        ViewerError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
