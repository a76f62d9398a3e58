//! Run configuration

use crate::error::RangeError;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Output directory used when none is given
pub const DEFAULT_OUTPUT_DIR: &str = "./downloads";

/// Quality selector used when none is given
pub const DEFAULT_QUALITY: &str = "best";

/// Everything one invocation needs to know, fixed once arguments are parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Target URL, handed to the engine unvalidated
    pub url: String,
    /// Directory downloads are written into
    pub output_dir: PathBuf,
    /// Format selector forwarded verbatim unless audio-only
    pub quality: String,
    /// Extract audio only
    pub audio_only: bool,
    /// Treat the URL as a playlist
    pub playlist_mode: bool,
    /// Report metadata, download nothing
    pub info_only: bool,
    /// Playlist entries to fetch; only honored in playlist mode
    pub playlist_range: Option<PlaylistRange>,
}

impl RunConfig {
    /// Config for `url` with every other field at its default
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            quality: DEFAULT_QUALITY.to_string(),
            audio_only: false,
            playlist_mode: false,
            info_only: false,
            playlist_range: None,
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = quality.into();
        self
    }

    pub fn with_audio_only(mut self, audio_only: bool) -> Self {
        self.audio_only = audio_only;
        self
    }

    pub fn with_playlist(mut self, playlist_mode: bool) -> Self {
        self.playlist_mode = playlist_mode;
        self
    }

    pub fn with_info_only(mut self, info_only: bool) -> Self {
        self.info_only = info_only;
        self
    }

    pub fn with_playlist_range(mut self, range: Option<PlaylistRange>) -> Self {
        self.playlist_range = range;
        self
    }
}

/// Inclusive, 1-based span of playlist entries, written `START-END`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaylistRange {
    pub start: usize,
    pub end: usize,
}

impl FromStr for PlaylistRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| RangeError::Format(s.to_string()))?;
        let start: usize = start
            .trim()
            .parse()
            .map_err(|_| RangeError::Format(s.to_string()))?;
        let end: usize = end
            .trim()
            .parse()
            .map_err(|_| RangeError::Format(s.to_string()))?;

        if start == 0 {
            return Err(RangeError::ZeroStart);
        }
        if end < start {
            return Err(RangeError::Reversed { start, end });
        }
        Ok(Self { start, end })
    }
}

impl fmt::Display for PlaylistRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
