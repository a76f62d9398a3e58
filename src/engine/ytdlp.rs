//! yt-dlp backed engine
//!
//! Each call runs the `yt-dlp` executable once. Downloads stream its
//! stdout through [`parse_progress_line`]; metadata queries decode the
//! `--dump-single-json` document.

use super::{parse_progress_line, Engine, ProgressSink};
use crate::core::{EngineOptions, PostProcessorKind, VideoInfo};
use crate::error::EngineError;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tracing::{debug, info, trace};

/// Executable looked up on `PATH` when no path is configured
pub const DEFAULT_YTDLP: &str = "yt-dlp";

/// Transcoder yt-dlp shells out to for audio extraction
pub const FFMPEG: &str = "ffmpeg";

/// Engine driving the `yt-dlp` command line program
#[derive(Debug, Clone)]
pub struct YtDlpEngine {
    program: PathBuf,
}

impl YtDlpEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Command line for downloading `url` with `options`
    pub fn download_args(url: &str, options: &EngineOptions) -> Vec<String> {
        let mut args = vec![
            "--newline".to_string(),
            "-o".to_string(),
            options.output_template.clone(),
            "-f".to_string(),
            options.format_selector.clone(),
            "--extractor-retries".to_string(),
            options.extractor_retries.to_string(),
        ];

        if let Some(items) = &options.playlist_items {
            args.push("--playlist-items".to_string());
            args.push(items.clone());
        }

        for (name, value) in &options.http_headers {
            args.push("--add-header".to_string());
            args.push(format!("{}:{}", name, value));
        }

        if let Some(browser) = &options.cookie_source {
            args.push("--cookies-from-browser".to_string());
            args.push(browser.to_string());
        }

        for post_processor in &options.post_processors {
            match post_processor.kind {
                PostProcessorKind::ExtractAudio => {
                    args.push("-x".to_string());
                    args.push("--audio-format".to_string());
                    args.push(post_processor.target_codec.clone());
                    args.push("--audio-quality".to_string());
                    args.push(format!("{}K", post_processor.target_quality));
                }
            }
        }

        // "--" keeps URLs starting with '-' from being read as flags
        args.push("--".to_string());
        args.push(url.to_string());
        args
    }

    /// Command line for a metadata-only query
    pub fn info_args(url: &str) -> Vec<String> {
        vec![
            "--dump-single-json".to_string(),
            "--skip-download".to_string(),
            "--no-warnings".to_string(),
            "--".to_string(),
            url.to_string(),
        ]
    }

    fn command(&self, args: &[String]) -> Command {
        let mut command = Command::new(&self.program);
        command.args(args).stdin(Stdio::null()).kill_on_drop(true);
        command
    }

    fn spawn_error(&self, error: io::Error) -> EngineError {
        if error.kind() == io::ErrorKind::NotFound {
            EngineError::NotFound(self.program.clone())
        } else {
            EngineError::Spawn(error)
        }
    }

    fn spawn(&self, args: &[String]) -> Result<Child, EngineError> {
        self.command(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))
    }
}

impl Default for YtDlpEngine {
    fn default() -> Self {
        Self::new(DEFAULT_YTDLP)
    }
}

#[async_trait]
impl Engine for YtDlpEngine {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn download(
        &self,
        url: &str,
        options: &EngineOptions,
        progress: &ProgressSink<'_>,
    ) -> Result<(), EngineError> {
        let args = Self::download_args(url, options);
        debug!("Executing {} with args: {:?}", self.program.display(), args);

        let mut child = self.spawn(&args)?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("yt-dlp stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::other("yt-dlp stderr was not captured"))?;

        let read_stdout = for_each_line(stdout, |line| {
            trace!("yt-dlp stdout: {}", line);
            if let Some(event) = parse_progress_line(line) {
                progress(event);
            }
        });

        let read_stderr = async {
            let mut collected = Vec::new();
            for_each_line(stderr, |line| {
                if !line.trim().is_empty() {
                    debug!("yt-dlp stderr: {}", line);
                    collected.push(line.to_string());
                }
            })
            .await?;
            Ok::<_, io::Error>(collected)
        };

        let (stdout_result, stderr_result) = tokio::join!(read_stdout, read_stderr);
        stdout_result?;
        let stderr_lines = stderr_result?;

        let status = child.wait().await?;
        if status.success() {
            info!("yt-dlp finished downloading {}", url);
            Ok(())
        } else {
            debug!("yt-dlp exited with {}", status);
            Err(failure(&stderr_lines, status))
        }
    }

    async fn extract_info(&self, url: &str) -> Result<VideoInfo, EngineError> {
        let args = Self::info_args(url);
        debug!("Executing {} with args: {:?}", self.program.display(), args);

        let output = self
            .command(&args)
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let lines: Vec<String> = stderr
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect();
            debug!("yt-dlp metadata query exited with {}", output.status);
            return Err(failure(&lines, output.status));
        }

        Ok(VideoInfo::from_json(&output.stdout)?)
    }

    async fn transcoder_available(&self) -> bool {
        match Command::new(FFMPEG)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
        {
            Ok(status) => status.success(),
            Err(e) => {
                debug!("ffmpeg probe failed: {}", e);
                false
            }
        }
    }
}

/// Feed each line of `reader` to `handle` until EOF. Invalid UTF-8 is
/// replaced instead of ending the stream.
async fn for_each_line<R, F>(reader: R, mut handle: F) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    F: FnMut(&str),
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        handle(line.trim_end_matches(|c| c == '\n' || c == '\r'));
    }
}

fn failure(stderr_lines: &[String], status: ExitStatus) -> EngineError {
    EngineError::Failed {
        message: failure_message(stderr_lines, status.code()),
        code: status.code(),
    }
}

/// Pick the most useful message from the engine's stderr
pub fn failure_message(stderr_lines: &[String], code: Option<i32>) -> String {
    let last_error = stderr_lines
        .iter()
        .rev()
        .find_map(|line| line.trim().strip_prefix("ERROR:"))
        .map(|message| message.trim().to_string());

    if let Some(message) = last_error {
        return message;
    }

    if let Some(line) = stderr_lines.iter().rev().find(|l| !l.trim().is_empty()) {
        return line.trim().to_string();
    }

    match code {
        Some(code) => format!("yt-dlp exited with status {}", code),
        None => "yt-dlp was terminated by a signal".to_string(),
    }
}
