//! Progress reporting from engine output
//!
//! yt-dlp run with `--newline` prints one status line per update:
//!
//! ```text
//! [download] Downloading item 3 of 12
//! [download] Destination: downloads/Title.webm
//! [download]  42.3% of ~  10.00MiB at    1.20MiB/s ETA 00:05
//! ```

use regex::Regex;
use std::sync::LazyLock;

static PERCENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\[download\]\s+(?P<percent>\d+(?:\.\d+)?)%(?:\s+of\s+~?\s*(?P<total>\S+))?(?:\s+at\s+(?P<speed>\S+/s))?(?:\s+ETA\s+(?P<eta>\S+))?",
    )
    .expect("valid progress regex")
});

static ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[download\] Downloading (?:item|video) (?P<index>\d+) of (?P<count>\d+)")
        .expect("valid playlist item regex")
});

static DESTINATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(?P<stage>\w+)\] Destination: (?P<path>.+)$")
        .expect("valid destination regex")
});

/// Transfer progress of the current file
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadProgress {
    /// Completion percentage (0.0 to 100.0)
    pub percent: f64,
    /// Total size as printed by the engine, e.g. `10.00MiB`
    pub total: Option<String>,
    /// Current speed, e.g. `1.20MiB/s`
    pub speed: Option<String>,
    /// Remaining time, e.g. `00:05`
    pub eta: Option<String>,
}

/// Something the engine reported while working
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// A playlist entry started (1-based index)
    Item { index: usize, count: usize },
    /// A file is being written by `stage` (download, ExtractAudio, ...)
    Destination { stage: String, path: String },
    /// Bytes moved
    Progress(DownloadProgress),
}

/// Parse one line of engine output into an event
pub fn parse_progress_line(line: &str) -> Option<ProgressEvent> {
    let line = line.trim_end();

    if let Some(caps) = PERCENT_RE.captures(line) {
        let percent = caps["percent"].parse::<f64>().ok()?;
        return Some(ProgressEvent::Progress(DownloadProgress {
            percent: percent.clamp(0.0, 100.0),
            total: caps.name("total").map(|m| m.as_str().to_string()),
            speed: caps.name("speed").map(|m| m.as_str().to_string()),
            eta: caps.name("eta").map(|m| m.as_str().to_string()),
        }));
    }

    if let Some(caps) = ITEM_RE.captures(line) {
        return Some(ProgressEvent::Item {
            index: caps["index"].parse().ok()?,
            count: caps["count"].parse().ok()?,
        });
    }

    DESTINATION_RE
        .captures(line)
        .map(|caps| ProgressEvent::Destination {
            stage: caps["stage"].to_string(),
            path: caps["path"].to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(line: &str) -> DownloadProgress {
        match parse_progress_line(line) {
            Some(ProgressEvent::Progress(p)) => p,
            other => panic!("expected progress, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_full_progress_line() {
        let p = progress("[download]  42.3% of   10.00MiB at    1.20MiB/s ETA 00:05");
        assert_eq!(p.percent, 42.3);
        assert_eq!(p.total.as_deref(), Some("10.00MiB"));
        assert_eq!(p.speed.as_deref(), Some("1.20MiB/s"));
        assert_eq!(p.eta.as_deref(), Some("00:05"));
    }

    #[test]
    fn test_parse_estimated_total() {
        let p = progress("[download]   3.0% of ~  55.12MiB at  800.00KiB/s ETA 01:07 (frag 2/60)");
        assert_eq!(p.percent, 3.0);
        assert_eq!(p.total.as_deref(), Some("55.12MiB"));
        assert_eq!(p.speed.as_deref(), Some("800.00KiB/s"));
        assert_eq!(p.eta.as_deref(), Some("01:07"));
    }

    #[test]
    fn test_parse_finished_line() {
        let p = progress("[download] 100% of   10.00MiB in 00:00:05 at 1.95MiB/s");
        assert_eq!(p.percent, 100.0);
        assert_eq!(p.total.as_deref(), Some("10.00MiB"));
        assert_eq!(p.speed, None);
        assert_eq!(p.eta, None);
    }

    #[test]
    fn test_parse_unknown_speed() {
        let p = progress("[download]   0.0% of   10.00MiB at  Unknown B/s ETA Unknown");
        assert_eq!(p.percent, 0.0);
        assert_eq!(p.speed, None);
    }

    #[test]
    fn test_parse_playlist_item() {
        assert_eq!(
            parse_progress_line("[download] Downloading item 3 of 12"),
            Some(ProgressEvent::Item { index: 3, count: 12 })
        );
        assert_eq!(
            parse_progress_line("[download] Downloading video 1 of 2"),
            Some(ProgressEvent::Item { index: 1, count: 2 })
        );
    }

    #[test]
    fn test_parse_destination() {
        assert_eq!(
            parse_progress_line("[ExtractAudio] Destination: downloads/Song.mp3"),
            Some(ProgressEvent::Destination {
                stage: "ExtractAudio".to_string(),
                path: "downloads/Song.mp3".to_string(),
            })
        );
    }

    #[test]
    fn test_ignores_other_lines() {
        assert_eq!(parse_progress_line("[youtube] dQw4w9WgXcQ: Downloading webpage"), None);
        assert_eq!(parse_progress_line("[download] Finished downloading playlist: Mix"), None);
        assert_eq!(parse_progress_line(""), None);
    }
}
