//! Engine option building

use crate::core::config::RunConfig;
use crate::core::cookies::{try_cookie_source, BrowserRef, CookieSource};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Desktop browser User-Agent sent with every engine request
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Extractor retries handed to the engine
pub const EXTRACTOR_RETRIES: u32 = 3;

/// Format selector forced in audio-only mode
pub const AUDIO_FORMAT_SELECTOR: &str = "bestaudio/best";

/// Codec audio is extracted to
pub const AUDIO_CODEC: &str = "mp3";

/// Target bitrate (kbps) of extracted audio
pub const AUDIO_QUALITY: &str = "192";

/// Kind of local post-processing step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcessorKind {
    /// Transcode the downloaded stream to an audio-only file
    ExtractAudio,
}

impl PostProcessorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostProcessorKind::ExtractAudio => "extract-audio",
        }
    }
}

/// Post-processing step applied after the raw download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostProcessorSpec {
    pub kind: PostProcessorKind,
    pub target_codec: String,
    pub target_quality: String,
}

impl PostProcessorSpec {
    pub fn extract_audio(codec: &str, quality: &str) -> Self {
        Self {
            kind: PostProcessorKind::ExtractAudio,
            target_codec: codec.to_string(),
            target_quality: quality.to_string(),
        }
    }
}

/// Options handed to the engine for one download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Output path template in the engine's `%(field)s` syntax
    pub output_template: String,
    /// Format selector expression
    pub format_selector: String,
    /// Extra HTTP request headers
    pub http_headers: BTreeMap<String, String>,
    /// Browser profile to take session cookies from
    pub cookie_source: Option<BrowserRef>,
    /// Extractor retry count
    pub extractor_retries: u32,
    /// Post-processing steps, in order
    pub post_processors: Vec<PostProcessorSpec>,
    /// Playlist entry selection in the engine's `START-END` syntax
    pub playlist_items: Option<String>,
}

impl EngineOptions {
    /// Build the options for `config`.
    ///
    /// Cookie attachment is best-effort: when `cookies` cannot produce a
    /// browser reference the options are built without one.
    pub fn build(config: &RunConfig, cookies: &dyn CookieSource) -> Self {
        let output_template = if config.playlist_mode {
            playlist_template(&config.output_dir)
        } else {
            single_template(&config.output_dir)
        };

        let format_selector = if config.audio_only {
            AUDIO_FORMAT_SELECTOR.to_string()
        } else {
            config.quality.clone()
        };

        let mut http_headers = BTreeMap::new();
        http_headers.insert("User-Agent".to_string(), USER_AGENT.to_string());

        let mut post_processors = Vec::new();
        if config.audio_only {
            post_processors.push(PostProcessorSpec::extract_audio(AUDIO_CODEC, AUDIO_QUALITY));
        }

        let playlist_items = match (config.playlist_mode, config.playlist_range) {
            (true, Some(range)) => Some(range.to_string()),
            (false, Some(range)) => {
                debug!("Ignoring range {} outside playlist mode", range);
                None
            }
            (_, None) => None,
        };

        Self {
            output_template,
            format_selector,
            http_headers,
            cookie_source: try_cookie_source(cookies),
            extractor_retries: EXTRACTOR_RETRIES,
            post_processors,
            playlist_items,
        }
    }

    /// Whether any step needs the local transcoder
    pub fn needs_transcoder(&self) -> bool {
        !self.post_processors.is_empty()
    }
}

/// `{dir}/%(title)s.%(ext)s`
pub fn single_template(output_dir: &Path) -> String {
    format!("{}/%(title)s.%(ext)s", output_dir.display())
}

/// `{dir}/%(playlist_title)s/%(playlist_index)s - %(title)s.%(ext)s`
pub fn playlist_template(output_dir: &Path) -> String {
    format!(
        "{}/%(playlist_title)s/%(playlist_index)s - %(title)s.%(ext)s",
        output_dir.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PlaylistRange;
    use crate::core::cookies::BrowserProfile;
    use crate::error::CookieSourceError;

    struct BrokenCookies;

    impl CookieSource for BrokenCookies {
        fn browser_ref(&self) -> Result<BrowserRef, CookieSourceError> {
            Err(CookieSourceError::NoBrowser)
        }
    }

    fn build(config: &RunConfig) -> EngineOptions {
        EngineOptions::build(config, &BrowserProfile::default())
    }

    #[test]
    fn test_audio_only_forces_audio_selector() {
        for quality in ["best", "worst", "height<=480", "137+140", "", "garbage"] {
            let config = RunConfig::new("URL").with_quality(quality).with_audio_only(true);
            assert_eq!(build(&config).format_selector, "bestaudio/best");
        }
    }

    #[test]
    fn test_quality_forwarded_verbatim() {
        for quality in ["best", "worst", "bestvideo[height<=720]+bestaudio", "not a selector"] {
            let config = RunConfig::new("URL").with_quality(quality);
            assert_eq!(build(&config).format_selector, quality);
        }
    }

    #[test]
    fn test_single_template() {
        let options = build(&RunConfig::new("URL"));
        assert_eq!(options.output_template, "./downloads/%(title)s.%(ext)s");
        assert!(!options.output_template.contains("playlist_index"));
        assert!(!options.output_template.contains("playlist_title"));
    }

    #[test]
    fn test_playlist_template() {
        let config = RunConfig::new("URL").with_playlist(true).with_output_dir("/tmp/x");
        let options = build(&config);
        assert_eq!(
            options.output_template,
            "/tmp/x/%(playlist_title)s/%(playlist_index)s - %(title)s.%(ext)s"
        );
        assert!(options.output_template.contains("playlist_index"));
        assert!(options.output_template.contains("playlist_title"));
    }

    #[test]
    fn test_fixed_headers_and_retries() {
        let options = build(&RunConfig::new("URL"));
        assert_eq!(options.extractor_retries, 3);
        assert_eq!(options.http_headers.len(), 1);
        assert_eq!(
            options.http_headers.get("User-Agent").map(String::as_str),
            Some(USER_AGENT)
        );
    }

    #[test]
    fn test_audio_only_post_processor() {
        let options = build(&RunConfig::new("URL").with_audio_only(true));
        assert_eq!(
            options.post_processors,
            vec![PostProcessorSpec {
                kind: PostProcessorKind::ExtractAudio,
                target_codec: "mp3".to_string(),
                target_quality: "192".to_string(),
            }]
        );
        assert!(options.needs_transcoder());
    }

    #[test]
    fn test_video_has_no_post_processors() {
        let options = build(&RunConfig::new("URL"));
        assert!(options.post_processors.is_empty());
        assert!(!options.needs_transcoder());
    }

    #[test]
    fn test_cookie_source_attached() {
        let options = build(&RunConfig::new("URL"));
        assert_eq!(
            options.cookie_source,
            Some(BrowserRef::default_profile("chrome").unwrap())
        );
    }

    #[test]
    fn test_cookie_failure_is_not_fatal() {
        let config = RunConfig::new("URL").with_audio_only(true).with_playlist(true);
        let options = EngineOptions::build(&config, &BrokenCookies);
        let expected = build(&config);

        assert_eq!(options.cookie_source, None);
        assert_eq!(options.output_template, expected.output_template);
        assert_eq!(options.format_selector, expected.format_selector);
        assert_eq!(options.http_headers, expected.http_headers);
        assert_eq!(options.extractor_retries, expected.extractor_retries);
        assert_eq!(options.post_processors, expected.post_processors);
    }

    #[test]
    fn test_post_processor_kind_name() {
        assert_eq!(PostProcessorKind::ExtractAudio.as_str(), "extract-audio");
    }

    #[test]
    fn test_range_only_in_playlist_mode() {
        let range = Some(PlaylistRange { start: 2, end: 5 });

        let playlist = RunConfig::new("URL").with_playlist(true).with_playlist_range(range);
        assert_eq!(build(&playlist).playlist_items.as_deref(), Some("2-5"));

        let single = RunConfig::new("URL").with_playlist_range(range);
        assert_eq!(build(&single).playlist_items, None);

        assert_eq!(build(&RunConfig::new("URL").with_playlist(true)).playlist_items, None);
    }
}
