//! Video information structures

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Metadata reported by the engine for a URL.
///
/// Fields follow the engine's JSON dump; anything the site does not expose
/// is left as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Video title
    pub title: Option<String>,
    /// Channel or uploader name
    pub uploader: Option<String>,
    /// Duration in seconds
    #[serde(rename = "duration")]
    pub duration_seconds: Option<f64>,
    /// View count
    pub view_count: Option<u64>,
    /// Upload date as `YYYYMMDD`
    pub upload_date: Option<String>,
    /// Available formats, worst first
    #[serde(default, deserialize_with = "null_as_empty")]
    pub formats: Vec<FormatDescriptor>,
}

impl VideoInfo {
    /// Decode the engine's single-JSON dump
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// The last `count` formats (the engine lists best formats last)
    pub fn last_formats(&self, count: usize) -> &[FormatDescriptor] {
        let start = self.formats.len().saturating_sub(count);
        &self.formats[start..]
    }

    /// Upload date parsed from the engine's `YYYYMMDD` form
    pub fn upload_date_parsed(&self) -> Option<NaiveDate> {
        self.upload_date
            .as_deref()
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y%m%d").ok())
    }

    /// Whole seconds of duration, if known
    pub fn duration_whole_seconds(&self) -> Option<u64> {
        self.duration_seconds
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(|d| d.round() as u64)
    }
}

/// One downloadable format
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDescriptor {
    /// Engine format ID (usable as a quality selector)
    #[serde(rename = "format_id")]
    pub id: Option<String>,
    /// Human-readable description
    #[serde(rename = "format")]
    pub description: Option<String>,
}

impl FormatDescriptor {
    pub fn new(id: &str, description: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            description: Some(description.to_string()),
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = r#"{
        "id": "dQw4w9WgXcQ",
        "title": "Never Gonna Give You Up",
        "uploader": "Rick Astley",
        "duration": 212,
        "view_count": 1500000000,
        "upload_date": "20091025",
        "formats": [
            {"format_id": "sb0", "format": "sb0 - 160x90 (storyboard)", "ext": "mhtml"},
            {"format_id": "18", "format": "18 - 640x360 (360p)", "ext": "mp4"},
            {"format_id": "137", "format": "137 - 1920x1080 (1080p)", "ext": "mp4"}
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let info = VideoInfo::from_json(DUMP.as_bytes()).unwrap();
        assert_eq!(info.title.as_deref(), Some("Never Gonna Give You Up"));
        assert_eq!(info.uploader.as_deref(), Some("Rick Astley"));
        assert_eq!(info.duration_whole_seconds(), Some(212));
        assert_eq!(info.view_count, Some(1_500_000_000));
        assert_eq!(info.upload_date.as_deref(), Some("20091025"));
        assert_eq!(info.formats.len(), 3);
        assert_eq!(info.formats[1], FormatDescriptor::new("18", "18 - 640x360 (360p)"));
    }

    #[test]
    fn test_from_json_missing_fields() {
        let info = VideoInfo::from_json(br#"{"title": null, "formats": null}"#).unwrap();
        assert_eq!(info, VideoInfo::default());

        let info = VideoInfo::from_json(b"{}").unwrap();
        assert!(info.formats.is_empty());
    }

    #[test]
    fn test_from_json_fractional_duration() {
        let info = VideoInfo::from_json(br#"{"duration": 59.6}"#).unwrap();
        assert_eq!(info.duration_whole_seconds(), Some(60));
    }

    #[test]
    fn test_last_formats() {
        let formats: Vec<FormatDescriptor> = (0..15)
            .map(|i| FormatDescriptor::new(&i.to_string(), "fmt"))
            .collect();
        let info = VideoInfo {
            formats,
            ..Default::default()
        };

        let last = info.last_formats(10);
        assert_eq!(last.len(), 10);
        assert_eq!(last[0].id.as_deref(), Some("5"));
        assert_eq!(last[9].id.as_deref(), Some("14"));

        let info = VideoInfo {
            formats: vec![FormatDescriptor::new("18", "mp4")],
            ..Default::default()
        };
        assert_eq!(info.last_formats(10).len(), 1);
        assert!(VideoInfo::default().last_formats(10).is_empty());
    }

    #[test]
    fn test_upload_date_parsed() {
        let mut info = VideoInfo {
            upload_date: Some("20240131".to_string()),
            ..Default::default()
        };
        assert_eq!(
            info.upload_date_parsed(),
            NaiveDate::from_ymd_opt(2024, 1, 31)
        );

        info.upload_date = Some("yesterday".to_string());
        assert_eq!(info.upload_date_parsed(), None);
    }
}
