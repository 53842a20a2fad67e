use serde::{Deserialize, Serialize};

use super::media::MediaKind;

/// One "continue watching" record.
///
/// Field names follow the persisted format (`type`, `tmdbId`, `position`,
/// `updatedAt`) so existing stored lists keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub tmdb_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
    #[serde(rename = "position")]
    pub position_seconds: u64,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "updatedAt")]
    pub updated_at_millis: i64,
}

/// Playback report passed to `ProgressStore::save`
#[derive(Debug, Clone, Default)]
pub struct ProgressUpdate {
    /// Seconds into the title; fractional and negative values are normalized
    pub position_seconds: f64,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub title: Option<String>,
}

/// Resume point returned by `ProgressStore::get`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPosition {
    pub position_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
}

impl From<&ProgressEntry> for SavedPosition {
    fn from(entry: &ProgressEntry) -> Self {
        Self {
            position_seconds: entry.position_seconds,
            season: entry.season,
            episode: entry.episode,
        }
    }
}
