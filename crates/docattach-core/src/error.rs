//! Error types for docattach-core

use thiserror::Error;

/// Result type alias using docattach-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in docattach-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Original path does not contain a main folder and a file name
    #[error("Invalid document path: {0}")]
    InvalidPath(String),

    /// The file tree endpoint answered with a non-success status
    #[error("Failed to fetch file tree: HTTP {0}")]
    TreeFetch(u16),

    /// Catalog fetch failed; recorded on the catalog instead of propagated
    #[error("Failed to load available files: {0}")]
    FetchFailure(String),

    /// A required argument was empty
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    /// Upload endpoint rejected the file
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Preview endpoint rejected the request
    #[error("Preview failed: {0}")]
    Preview(String),

    /// Download endpoint rejected the request
    #[error("Download failed: {0}")]
    Download(String),

    /// No catalog entry matches the requested name
    #[error("File not found: {0}")]
    NotFound(String),

    /// The viewing surface could not be opened
    #[error("Preview window was blocked")]
    PopupBlocked,

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input or configuration
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
