//! Extraction engine boundary
//!
//! The engine resolves URLs, downloads streams and transcodes them. This
//! crate only drives it: [`Engine`] is the contract, [`YtDlpEngine`] the
//! production implementation backed by the `yt-dlp` executable.

pub mod progress;
pub mod ytdlp;

pub use progress::*;
pub use ytdlp::*;

use crate::core::{EngineOptions, VideoInfo};
use crate::error::EngineError;
use async_trait::async_trait;

/// Receiver of progress events while a download runs
pub type ProgressSink<'a> = dyn Fn(ProgressEvent) + Send + Sync + 'a;

/// External media extraction engine
#[async_trait]
pub trait Engine: Send + Sync {
    /// Engine name for logs
    fn name(&self) -> &'static str;

    /// Fetch `url` to disk as described by `options`
    async fn download(
        &self,
        url: &str,
        options: &EngineOptions,
        progress: &ProgressSink<'_>,
    ) -> Result<(), EngineError>;

    /// Fetch metadata for `url` without writing anything to disk
    async fn extract_info(&self, url: &str) -> Result<VideoInfo, EngineError>;

    /// Whether the local transcoder needed by post-processors is present
    async fn transcoder_available(&self) -> bool {
        true
    }
}
