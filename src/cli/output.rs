//! Output formatting and progress display

use crate::cli::args::VerbosityLevel;
use crate::core::{Operation, Reporter, VideoInfo};
use crate::engine::ProgressEvent;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Display;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// Number of formats listed by the info query
pub const INFO_FORMAT_LIMIT: usize = 10;

const BANNER_WIDTH: usize = 50;
const NOT_AVAILABLE: &str = "N/A";

/// Console reporter
pub struct OutputFormatter {
    verbosity: VerbosityLevel,
    show_progress: bool,
    progress_bar: Mutex<Option<ProgressBar>>,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_progress: true,
            progress_bar: Mutex::new(None),
        }
    }

    /// Enable or disable the progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn progress_enabled(&self) -> bool {
        self.show_progress && self.verbosity != VerbosityLevel::Quiet
    }

    /// Print the startup banner
    pub fn print_banner(&self) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }

        let rule = "=".repeat(BANNER_WIDTH);
        let title = "🎥  VIDEO DOWNLOADER  📥".bold().to_string();
        write_lines(io::stdout().lock(), [String::new(), rule.clone(), title, rule]);
    }

    /// Print info message
    pub fn info(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            write_lines(io::stdout().lock(), [message]);
        }
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            write_lines(io::stdout().lock(), [message.green()]);
        }
    }

    /// Print warning message
    pub fn warn(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            let line = format!("{} {}", "Warning:".yellow().bold(), message);
            write_lines(io::stderr().lock(), [line]);
        }
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        write_lines(io::stderr().lock(), [message.red()]);
    }

    fn create_progress_bar(&self) -> ProgressBar {
        let style = ProgressStyle::default_bar()
            .template("{prefix}{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let progress_bar = ProgressBar::new(100);
        progress_bar.set_style(style);
        progress_bar
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.progress_bar.lock() {
            if let Some(progress_bar) = guard.as_ref() {
                f(progress_bar);
            }
        }
    }
}

impl Reporter for OutputFormatter {
    fn operation_started(&self, operation: Operation, url: &str) {
        self.info(&start_line(operation, url));
    }

    fn operation_completed(&self, operation: Operation, elapsed: Duration) {
        if let Some(line) = completion_line(operation) {
            let elapsed = Duration::from_secs(elapsed.as_secs());
            self.success(&format!(
                "{} ({})",
                line,
                humantime::format_duration(elapsed)
            ));
        }
    }

    fn operation_failed(&self, operation: Operation, message: &str) {
        self.error(&failure_line(operation, message));
    }

    fn video_info(&self, info: &VideoInfo) {
        write_lines(io::stdout().lock(), video_info_lines(info));
    }

    fn warning(&self, message: &str) {
        self.warn(message);
    }

    fn begin_progress(&self) {
        if !self.progress_enabled() {
            return;
        }
        if let Ok(mut guard) = self.progress_bar.lock() {
            *guard = Some(self.create_progress_bar());
        }
    }

    fn progress(&self, event: &ProgressEvent) {
        self.with_bar(|progress_bar| match event {
            ProgressEvent::Progress(p) => {
                progress_bar.set_position(p.percent.round() as u64);
                let mut message = String::new();
                if let Some(total) = &p.total {
                    message.push_str(&format!("of {}", total));
                }
                if let Some(speed) = &p.speed {
                    message.push_str(&format!(" at {}", speed));
                }
                if let Some(eta) = &p.eta {
                    message.push_str(&format!(" ETA {}", eta));
                }
                progress_bar.set_message(message.trim_start().to_string());
            }
            ProgressEvent::Item { index, count } => {
                progress_bar.set_prefix(format!("[{}/{}] ", index, count));
                progress_bar.set_position(0);
            }
            ProgressEvent::Destination { stage, path } => {
                progress_bar.println(format!("{}: {}", stage, path));
            }
        });
    }

    fn end_progress(&self) {
        if let Ok(mut guard) = self.progress_bar.lock() {
            if let Some(progress_bar) = guard.take() {
                progress_bar.finish_and_clear();
            }
        }
    }
}

/// Write `lines` to `out`. A failed write (e.g. a closed pipe) drops the
/// rest instead of panicking.
fn write_lines<W, I>(mut out: W, lines: I)
where
    W: Write,
    I: IntoIterator,
    I::Item: Display,
{
    for line in lines {
        if let Err(e) = writeln!(out, "{}", line) {
            debug!("Console write failed: {}", e);
            return;
        }
    }
}

/// Line printed before an operation starts
pub fn start_line(operation: Operation, url: &str) -> String {
    match operation {
        Operation::Info => format!("Fetching video info: {}", url),
        Operation::PlaylistDownload => format!("Downloading playlist: {}", url),
        Operation::SingleDownload => format!("Downloading: {}", url),
    }
}

/// Line printed after a successful operation; the info query prints its
/// report instead
pub fn completion_line(operation: Operation) -> Option<&'static str> {
    match operation {
        Operation::Info => None,
        Operation::PlaylistDownload => Some("Playlist download completed successfully!"),
        Operation::SingleDownload => Some("Download completed successfully!"),
    }
}

/// Line printed when an operation fails
pub fn failure_line(operation: Operation, message: &str) -> String {
    match operation {
        Operation::Info => format!("Error getting video info: {}", message),
        Operation::PlaylistDownload => format!("Error downloading playlist: {}", message),
        Operation::SingleDownload => format!("Error downloading video: {}", message),
    }
}

/// Metadata report: five fields, then the last formats the engine listed
pub fn video_info_lines(info: &VideoInfo) -> Vec<String> {
    let duration = match info.duration_whole_seconds() {
        Some(seconds) => format!(
            "{} seconds ({})",
            seconds,
            humantime::format_duration(Duration::from_secs(seconds))
        ),
        None => NOT_AVAILABLE.to_string(),
    };

    let view_count = info
        .view_count
        .map(|count| count.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let upload_date = match (info.upload_date_parsed(), &info.upload_date) {
        (Some(date), _) => date.format("%Y-%m-%d").to_string(),
        (None, Some(raw)) => raw.clone(),
        (None, None) => NOT_AVAILABLE.to_string(),
    };

    let mut lines = vec![
        format!("Title: {}", info.title.as_deref().unwrap_or(NOT_AVAILABLE)),
        format!("Uploader: {}", info.uploader.as_deref().unwrap_or(NOT_AVAILABLE)),
        format!("Duration: {}", duration),
        format!("View count: {}", view_count),
        format!("Upload date: {}", upload_date),
        String::new(),
        "Available formats:".to_string(),
    ];

    for format in info.last_formats(INFO_FORMAT_LIMIT) {
        lines.push(format!(
            "  {} - {}",
            format.id.as_deref().unwrap_or(NOT_AVAILABLE),
            format.description.as_deref().unwrap_or(NOT_AVAILABLE)
        ));
    }

    lines
}
