//! Operation selection and engine dispatch

use crate::core::config::RunConfig;
use crate::core::cookies::CookieSource;
use crate::core::options::EngineOptions;
use crate::core::video_info::VideoInfo;
use crate::engine::{Engine, ProgressEvent};
use crate::error::DownloadError;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// The one thing a run does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Metadata query, nothing written
    Info,
    /// Whole playlist into a per-playlist folder
    PlaylistDownload,
    /// One item into the output directory
    SingleDownload,
}

impl Operation {
    /// Info wins over playlist, playlist over single download
    pub fn select(config: &RunConfig) -> Self {
        if config.info_only {
            Operation::Info
        } else if config.playlist_mode {
            Operation::PlaylistDownload
        } else {
            Operation::SingleDownload
        }
    }

    pub fn is_download(&self) -> bool {
        !matches!(self, Operation::Info)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Info => "info query",
            Operation::PlaylistDownload => "playlist download",
            Operation::SingleDownload => "download",
        })
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Carries the message shown to the user
    Failed(String),
}

impl Outcome {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done)
    }
}

/// Console side of a run. Implementations must not fail.
pub trait Reporter: Sync {
    fn operation_started(&self, operation: Operation, url: &str);
    fn operation_completed(&self, operation: Operation, elapsed: Duration);
    fn operation_failed(&self, operation: Operation, message: &str);
    fn video_info(&self, info: &VideoInfo);
    fn warning(&self, message: &str);

    fn begin_progress(&self) {}
    fn progress(&self, _event: &ProgressEvent) {}
    fn end_progress(&self) {}
}

/// Runs exactly one operation per [`RunConfig`]
pub struct Dispatcher<'a> {
    engine: &'a dyn Engine,
    cookies: &'a dyn CookieSource,
    reporter: &'a dyn Reporter,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        engine: &'a dyn Engine,
        cookies: &'a dyn CookieSource,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            engine,
            cookies,
            reporter,
        }
    }

    /// Run the operation `config` selects. Engine failures end up in the
    /// returned [`Outcome`], never as an error.
    pub async fn run(&self, config: &RunConfig) -> Outcome {
        let operation = Operation::select(config);
        info!("Running {} for {} via {}", operation, config.url, self.engine.name());

        self.reporter.operation_started(operation, &config.url);
        let started = Instant::now();

        let result = match operation {
            Operation::Info => self.show_info(&config.url).await,
            Operation::PlaylistDownload | Operation::SingleDownload => self.download(config).await,
        };

        match result {
            Ok(()) => {
                let elapsed = started.elapsed();
                info!("{} finished in {:?}", operation, elapsed);
                self.reporter.operation_completed(operation, elapsed);
                Outcome::Done
            }
            Err(e) => {
                info!("{} failed: {}", operation, e);
                let message = e.to_string();
                self.reporter.operation_failed(operation, &message);
                Outcome::Failed(message)
            }
        }
    }

    async fn download(&self, config: &RunConfig) -> Result<(), DownloadError> {
        tokio::fs::create_dir_all(&config.output_dir)
            .await
            .map_err(|source| DownloadError::OutputDir {
                path: config.output_dir.clone(),
                source,
            })?;

        let options = EngineOptions::build(config, self.cookies);
        debug!("Engine options: {:?}", options);

        if options.needs_transcoder() && !self.engine.transcoder_available().await {
            self.reporter
                .warning("ffmpeg not found, audio extraction will likely fail");
        }

        let reporter = self.reporter;
        reporter.begin_progress();
        let result = self
            .engine
            .download(&config.url, &options, &|event: ProgressEvent| {
                reporter.progress(&event)
            })
            .await;
        reporter.end_progress();

        result.map_err(DownloadError::from)
    }

    async fn show_info(&self, url: &str) -> Result<(), DownloadError> {
        let info = self.engine.extract_info(url).await?;
        debug!(
            "Engine reported {} formats for {}",
            info.formats.len(),
            url
        );
        self.reporter.video_info(&info);
        Ok(())
    }
}
