use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ApiConfig;
use crate::saved_reports::SavedReports;

// --- Typed IDs ---

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

typed_id!(ReportId);
typed_id!(VideoId);

// --- Rating ---

/// Consensus verdict for a video or a single claim.
///
/// There is no ordering between ratings; they only map to a color and a
/// badge. Ratings the client does not know decode as `Unverified`.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    #[default]
    Unverified,
    Doubtful,
    Mixed,
    Reliable,
    Solid,
}

impl Rating {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unverified => "unverified",
            Self::Doubtful => "doubtful",
            Self::Mixed => "mixed",
            Self::Reliable => "reliable",
            Self::Solid => "solid",
        }
    }

    /// Badge text, e.g. `SOLID`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unverified => "UNVERIFIED",
            Self::Doubtful => "DOUBTFUL",
            Self::Mixed => "MIXED",
            Self::Reliable => "RELIABLE",
            Self::Solid => "SOLID",
        }
    }

    /// Hex color of the rating dot in the saved list.
    #[must_use]
    pub const fn color_hex(self) -> &'static str {
        match self {
            Self::Solid | Self::Reliable => "#10b981",
            Self::Mixed => "#f59e0b",
            Self::Doubtful => "#f97316",
            Self::Unverified => "#9ca3af",
        }
    }

    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Solid | Self::Reliable => "🟢",
            Self::Mixed | Self::Doubtful => "🟠",
            Self::Unverified => "⚪",
        }
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.to_ascii_lowercase().as_str() {
            "doubtful" => Self::Doubtful,
            "mixed" => Self::Mixed,
            "reliable" => Self::Reliable,
            "solid" => Self::Solid,
            _ => Self::Unverified,
        })
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Report summaries (wire types) ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: VideoId,
    pub title: String,
    pub channel: String,
    pub thumbnail: String,
    #[serde(alias = "duration_sec")]
    pub duration_sec: u32,
}

impl Video {
    /// `m:ss`, or `h:mm:ss` for videos of an hour or more.
    #[must_use]
    pub fn duration_text(&self) -> String {
        let secs = self.duration_sec;
        let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
        if h > 0 {
            format!("{h}:{m:02}:{s:02}")
        } else {
            format!("{m}:{s:02}")
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Consensus {
    pub rating: Rating,
    pub summary: String,
}

/// A saved report as listed by the server. Immutable once received.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ReportSummary {
    pub id: ReportId,
    pub video: Video,
    pub consensus: Consensus,
    /// RFC 3339 timestamp exactly as the server sent it.
    #[serde(alias = "createdAt")]
    pub created_at: String,
}

/// One page of `GET /saved-reports`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct ReportsPage {
    pub reports: Vec<ReportSummary>,
    pub total: u64,
    pub has_more: bool,
}

// --- App model ---

#[derive(Debug, Default)]
pub struct Model {
    /// Set on mount; requests are never issued without it.
    pub api: Option<ApiConfig>,
    pub saved: SavedReports,
}

impl Model {
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.api.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_summary_wire_shape() {
        let json = serde_json::json!({
            "id": "r-1",
            "video": {
                "id": "dQw4w9WgXcQ",
                "title": "Never Gonna",
                "channel": "Rick",
                "thumbnail": "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg",
                "durationSec": 212
            },
            "consensus": { "rating": "mixed", "summary": "Some claims hold" },
            "created_at": "2024-05-01T12:34:56+00:00"
        });

        let report: ReportSummary = serde_json::from_value(json).unwrap();
        assert_eq!(report.id, ReportId::new("r-1"));
        assert_eq!(report.video.duration_sec, 212);
        assert_eq!(report.consensus.rating, Rating::Mixed);
        assert_eq!(report.created_at, "2024-05-01T12:34:56+00:00");

        let back = serde_json::to_value(&report).unwrap();
        assert_eq!(back["video"]["durationSec"], 212);
        assert_eq!(back["created_at"], "2024-05-01T12:34:56+00:00");
    }

    #[test]
    fn test_created_at_camel_case_alias() {
        let json = serde_json::json!({
            "id": "r-2",
            "video": { "id": "v", "title": "t", "channel": "c", "thumbnail": "", "durationSec": 1 },
            "consensus": { "rating": "solid", "summary": "" },
            "createdAt": "2024-01-01T00:00:00Z"
        });
        let report: ReportSummary = serde_json::from_value(json).unwrap();
        assert_eq!(report.created_at, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_unknown_rating_is_unverified() {
        let rating: Rating = serde_json::from_str("\"bogus\"").unwrap();
        assert_eq!(rating, Rating::Unverified);
        let rating: Rating = serde_json::from_str("\"reliable\"").unwrap();
        assert_eq!(rating, Rating::Reliable);
    }

    #[test]
    fn test_rating_mapping() {
        assert_eq!(Rating::Solid.color_hex(), Rating::Reliable.color_hex());
        assert_eq!(Rating::Mixed.color_hex(), "#f59e0b");
        assert_eq!(Rating::Doubtful.color_hex(), "#f97316");
        assert_eq!(Rating::Unverified.color_hex(), "#9ca3af");
        assert_eq!(Rating::Doubtful.label(), "DOUBTFUL");
        assert_eq!(Rating::Mixed.emoji(), "🟠");
    }

    #[test]
    fn test_duration_text() {
        let mut video = Video {
            id: VideoId::new("v"),
            title: String::new(),
            channel: String::new(),
            thumbnail: String::new(),
            duration_sec: 212,
        };
        assert_eq!(video.duration_text(), "3:32");
        video.duration_sec = 3_725;
        assert_eq!(video.duration_text(), "1:02:05");
        video.duration_sec = 0;
        assert_eq!(video.duration_text(), "0:00");
    }

    #[test]
    fn test_model_mount_state() {
        assert!(!Model::default().is_mounted());
        let api = ApiConfig::new("https://api.example.com").unwrap();
        let model = Model {
            api: Some(api),
            ..Model::default()
        };
        assert!(model.is_mounted());
    }
}
