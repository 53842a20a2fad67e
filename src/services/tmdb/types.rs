//! TMDB API Types
//!
//! Only the fields the catalog views read. Everything else in the payloads is
//! ignored.

use serde::{Deserialize, Serialize};

use crate::models::{MediaItem, MediaKind};

/// Envelope of every list endpoint
#[derive(Debug, Deserialize)]
pub struct TmdbListResponse {
    #[serde(default)]
    pub results: Vec<TmdbResult>,
}

/// Movie or series row from a list/search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbResult {
    pub id: u64,
    /// Movies
    #[serde(default)]
    pub title: Option<String>,
    /// Series
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl TmdbResult {
    pub fn into_media_item(self, kind: MediaKind) -> MediaItem {
        let title = display_title(kind, self.title, self.name);
        let date = match kind {
            MediaKind::Movie => self.release_date,
            MediaKind::Series => self.first_air_date,
        };
        MediaItem {
            id: self.id,
            kind,
            title,
            release_year: year_of(date.as_deref()),
            poster_path: self.poster_path.filter(|p| !p.is_empty()),
            overview: self.overview.filter(|o| !o.is_empty()),
            vote_average: self.vote_average,
        }
    }
}

fn display_title(kind: MediaKind, title: Option<String>, name: Option<String>) -> String {
    let (primary, fallback) = match kind {
        MediaKind::Movie => (title, name),
        MediaKind::Series => (name, title),
    };
    primary
        .filter(|t| !t.is_empty())
        .or(fallback)
        .unwrap_or_default()
}

/// First four characters of a `YYYY-MM-DD` date
fn year_of(date: Option<&str>) -> Option<String> {
    let date = date?.trim();
    let year: String = date.chars().take(4).collect();
    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        Some(year)
    } else {
        None
    }
}

/// Season summary from a series details payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmdbSeason {
    #[serde(default)]
    pub id: u64,
    pub season_number: i64,
    #[serde(default)]
    pub episode_count: u32,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub id: u64,
    pub name: String,
}

/// Raw details payload for either kind
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbDetails {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub seasons: Vec<TmdbSeason>,
}

/// Details view of a title
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDetails {
    pub id: u64,
    pub kind: MediaKind,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_year: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub genres: Vec<String>,
    /// Regular seasons only; specials (season 0) are dropped
    pub seasons: Vec<TmdbSeason>,
}

impl MediaDetails {
    pub fn from_raw(kind: MediaKind, raw: TmdbDetails) -> Self {
        let date = match kind {
            MediaKind::Movie => raw.release_date,
            MediaKind::Series => raw.first_air_date,
        };
        let seasons = if kind.is_series() {
            raw.seasons.into_iter().filter(|s| s.season_number >= 1).collect()
        } else {
            Vec::new()
        };
        Self {
            id: raw.id,
            kind,
            title: display_title(kind, raw.title, raw.name),
            overview: raw.overview.filter(|o| !o.is_empty()),
            poster_path: raw.poster_path,
            backdrop_path: raw.backdrop_path,
            release_year: year_of(date.as_deref()),
            runtime_minutes: raw.runtime,
            genres: raw.genres.into_iter().map(|g| g.name).collect(),
            seasons,
        }
    }

    /// Episode numbers of a season. Unknown seasons and seasons without a
    /// count offer a single episode.
    pub fn episodes(&self, season: u32) -> Vec<u32> {
        let count = self
            .seasons
            .iter()
            .find(|s| s.season_number == season as i64)
            .map(|s| s.episode_count)
            .filter(|c| *c > 0)
            .unwrap_or(1);
        (1..=count).collect()
    }
}

/// Season/episode selection state for a series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodePicker {
    pub season: u32,
    pub episode: u32,
}

impl EpisodePicker {
    pub fn new(season: u32, episode: u32) -> Self {
        Self {
            season: season.max(1),
            episode: episode.max(1),
        }
    }

    /// Switching season starts at its first episode
    pub fn select_season(&mut self, season: u32) {
        self.season = season.max(1);
        self.episode = 1;
    }

    pub fn select_episode(&mut self, episode: u32) {
        self.episode = episode.max(1);
    }
}

impl Default for EpisodePicker {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_movie_row_to_media_item() {
        let row: TmdbResult = serde_json::from_value(json!({
            "id": 603,
            "title": "The Matrix",
            "release_date": "1999-03-30",
            "poster_path": "/p.jpg",
            "vote_average": 8.2
        }))
        .unwrap();
        let item = row.into_media_item(MediaKind::Movie);
        assert_eq!(item.title, "The Matrix");
        assert_eq!(item.release_year.as_deref(), Some("1999"));
        assert_eq!(item.poster_path.as_deref(), Some("/p.jpg"));
    }

    #[test]
    fn test_series_row_uses_name_and_air_date() {
        let row: TmdbResult = serde_json::from_value(json!({
            "id": 1399,
            "name": "Game of Thrones",
            "first_air_date": "",
            "poster_path": null
        }))
        .unwrap();
        let item = row.into_media_item(MediaKind::Series);
        assert_eq!(item.title, "Game of Thrones");
        assert_eq!(item.release_year, None);
        assert_eq!(item.poster_path, None);
    }

    #[test]
    fn test_details_drop_specials_and_count_episodes() {
        let raw: TmdbDetails = serde_json::from_value(json!({
            "id": 1399,
            "name": "Game of Thrones",
            "seasons": [
                { "id": 1, "season_number": 0, "episode_count": 14 },
                { "id": 2, "season_number": 1, "episode_count": 10 },
                { "id": 3, "season_number": 2, "episode_count": 0 }
            ]
        }))
        .unwrap();
        let details = MediaDetails::from_raw(MediaKind::Series, raw);
        assert_eq!(details.seasons.len(), 2);
        assert_eq!(details.episodes(1).len(), 10);
        assert_eq!(details.episodes(2), vec![1]);
        assert_eq!(details.episodes(7), vec![1]);
    }

    #[test]
    fn test_picker_resets_episode_on_season_change() {
        let mut picker = EpisodePicker::new(1, 6);
        picker.select_season(3);
        assert_eq!(picker, EpisodePicker::new(3, 1));
        picker.select_episode(0);
        assert_eq!(picker.episode, 1);
    }
}
