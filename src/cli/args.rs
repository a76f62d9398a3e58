//! Command line argument parsing

use crate::core::{
    BrowserProfile, PlaylistRange, RunConfig, DEFAULT_COOKIE_BROWSER, DEFAULT_OUTPUT_DIR,
    DEFAULT_QUALITY,
};
use crate::engine::DEFAULT_YTDLP;
use clap::Parser;
use std::path::PathBuf;

/// Download videos, playlists or audio, or show video information
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "download", author, version, about, long_about = None)]
pub struct Args {
    /// Video or playlist URL
    pub url: String,

    /// Output directory
    #[arg(
        short,
        long,
        value_name = "DIR",
        env = "YTDL_OUTPUT_DIR",
        default_value = DEFAULT_OUTPUT_DIR
    )]
    pub output: PathBuf,

    /// Video quality / format selector (e.g. 'best', 'worst', '137+140')
    #[arg(short, long, value_name = "SPEC", default_value = DEFAULT_QUALITY)]
    pub quality: String,

    /// Download audio only (MP3)
    #[arg(short, long)]
    pub audio_only: bool,

    /// Download as playlist
    #[arg(short, long)]
    pub playlist: bool,

    /// Show video information only (no download)
    #[arg(short, long)]
    pub info: bool,

    /// Download only these playlist entries (e.g. 1-10), with --playlist
    #[arg(long, value_name = "START-END")]
    pub range: Option<PlaylistRange>,

    /// Browser whose default profile supplies session cookies
    #[arg(
        long,
        value_name = "BROWSER",
        env = "DOWNLOAD_COOKIES_BROWSER",
        default_value = DEFAULT_COOKIE_BROWSER
    )]
    pub cookies_from_browser: String,

    /// Path to the yt-dlp executable
    #[arg(long = "yt-dlp", value_name = "PATH", env = "YTDLP_PATH", default_value = DEFAULT_YTDLP)]
    pub yt_dlp: PathBuf,

    /// Disable progress output
    #[arg(long)]
    pub no_progress: bool,

    /// Verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Quiet output (only errors)
    #[arg(long)]
    pub quiet: bool,
}

impl Args {
    /// The run configuration these arguments describe
    pub fn run_config(&self) -> RunConfig {
        RunConfig::new(self.url.clone())
            .with_output_dir(self.output.clone())
            .with_quality(self.quality.clone())
            .with_audio_only(self.audio_only)
            .with_playlist(self.playlist)
            .with_info_only(self.info)
            .with_playlist_range(self.range)
    }

    /// Cookie source for the engine
    pub fn cookie_source(&self) -> BrowserProfile {
        BrowserProfile::new(self.cookies_from_browser.clone())
    }

    /// Get output verbosity level
    pub fn verbosity_level(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    /// Quiet (only errors)
    Quiet,
    /// Normal
    Normal,
    /// Verbose (debug info)
    Verbose,
}

impl VerbosityLevel {
    /// Log filter used when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            VerbosityLevel::Quiet => "error",
            VerbosityLevel::Normal => "warn",
            VerbosityLevel::Verbose => "debug",
        }
    }
}
