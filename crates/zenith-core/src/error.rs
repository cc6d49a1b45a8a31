use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("Page {page} is out of range (document has {count} pages)")]
    PageOutOfRange { page: u32, count: u32 },

    #[error("PDF operation failed: {0}")]
    OperationError(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Invalid image payload: {0}")]
    ImageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("No document loaded")]
    NoDocument,
}
