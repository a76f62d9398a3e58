//! Error types for download

use std::path::PathBuf;
use thiserror::Error;

/// Failure raised at the extraction engine boundary
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("yt-dlp executable not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to start yt-dlp: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("{message}")]
    Failed { message: String, code: Option<i32> },

    #[error("Failed to decode yt-dlp output: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Engine ran and reported a failure (as opposed to never starting)
    pub fn is_engine_failure(&self) -> bool {
        matches!(self, EngineError::Failed { .. } | EngineError::Decode(_))
    }
}

/// Reasons a browser cookie source cannot be referenced
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CookieSourceError {
    #[error("no browser configured for cookies")]
    NoBrowser,

    #[error("unsupported browser for cookies: {0}")]
    UnsupportedBrowser(String),
}

/// Malformed `--range` value
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("invalid range format '{0}', use START-END (e.g. 1-10)")]
    Format(String),

    #[error("range start must be at least 1")]
    ZeroStart,

    #[error("range end {end} is before start {start}")]
    Reversed { start: usize, end: usize },
}

/// Failure of a single dispatched operation
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Could not create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),
}
