//! # download - yt-dlp front end
//!
//! Downloads a video, a whole playlist or just the audio track, or prints
//! a video's metadata. Extraction, network retries and transcoding are
//! left to `yt-dlp`; this crate turns command line flags into engine
//! options and picks which engine call to make.
//!
//! ## Example
//!
//! ```rust,no_run
//! use download::core::{BrowserProfile, Dispatcher, RunConfig};
//! use download::cli::{OutputFormatter, VerbosityLevel};
//! use download::engine::YtDlpEngine;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let engine = YtDlpEngine::default();
//!     let cookies = BrowserProfile::default();
//!     let reporter = OutputFormatter::new(VerbosityLevel::Normal);
//!
//!     let config = RunConfig::new("VIDEO_URL").with_audio_only(true);
//!     let outcome = Dispatcher::new(&engine, &cookies, &reporter).run(&config).await;
//!     println!("done: {}", outcome.is_done());
//! }
//! ```

pub mod cli;
pub mod core;
pub mod engine;
pub mod error;

// Re-export main types
pub use crate::core::{Dispatcher, EngineOptions, Operation, Outcome, RunConfig, VideoInfo};
pub use crate::engine::{Engine, YtDlpEngine};
pub use crate::error::{DownloadError, EngineError};
