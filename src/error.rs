use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a save. Nothing after the failing step is attempted.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("storage permission was denied")]
    PermissionDenied,

    #[error("a save is already in progress")]
    Busy,

    #[error("failed to capture the canvas: {0}")]
    Capture(String),

    #[error("failed to resize the snapshot: {0}")]
    Resize(String),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start the save worker: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("save worker stopped before reporting a result")]
    WorkerLost,
}

/// The saved file could not be announced to gallery apps. Logged, never fatal.
#[derive(Debug, Error)]
#[error("media index refresh failed for {}: {reason}", path.display())]
pub struct MediaIndexError {
    pub path: PathBuf,
    pub reason: String,
}

/// Errors while choosing or loading a background image. Dismissing the picker
/// is not an error and shows up as `Ok(None)`.
#[derive(Debug, Error)]
pub enum PickError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{0} is not a supported image file")]
    Unsupported(String),
}

/// Result type for save operations
pub type ExportResult<T> = Result<T, ExportError>;
