use serde::{Deserialize, Serialize};

/// Catalog kind of a title
///
/// Serialized as `"movie"` / `"tv"`, the same tags the metadata API uses in
/// its paths and the progress store uses in its keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Series,
}

impl MediaKind {
    /// Path segment used by the metadata API and the embed providers
    pub fn as_path(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
        }
    }

    pub fn is_series(&self) -> bool {
        matches!(self, MediaKind::Series)
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_path())
    }
}

impl std::str::FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" | "movies" => Ok(MediaKind::Movie),
            "tv" | "series" | "show" => Ok(MediaKind::Series),
            other => Err(format!("unknown media kind: {}", other)),
        }
    }
}

/// A catalog entry as shown in lists and search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: u64,
    pub kind: MediaKind,
    pub title: String,
    pub release_year: Option<String>,
    pub poster_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
}

/// What to play: a movie, or one episode of a series.
///
/// Season and episode are always at least 1 and ignored for movies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchTarget {
    pub kind: MediaKind,
    pub tmdb_id: u64,
    pub season: u32,
    pub episode: u32,
}

impl WatchTarget {
    pub fn movie(tmdb_id: u64) -> Self {
        Self {
            kind: MediaKind::Movie,
            tmdb_id,
            season: 1,
            episode: 1,
        }
    }

    pub fn episode(tmdb_id: u64, season: u32, episode: u32) -> Self {
        Self {
            kind: MediaKind::Series,
            tmdb_id,
            season: season.max(1),
            episode: episode.max(1),
        }
    }

    /// Build from loosely-typed input such as CLI arguments or a deep link.
    /// Missing or non-positive season/episode fall back to 1.
    pub fn from_parts(kind: MediaKind, tmdb_id: u64, season: Option<i64>, episode: Option<i64>) -> Self {
        match kind {
            MediaKind::Movie => Self::movie(tmdb_id),
            MediaKind::Series => Self::episode(
                tmdb_id,
                clamp_positive(season),
                clamp_positive(episode),
            ),
        }
    }

    /// A zero id means there is nothing to play
    pub fn is_playable(&self) -> bool {
        self.tmdb_id > 0
    }
}

fn clamp_positive(value: Option<i64>) -> u32 {
    value
        .filter(|v| *v >= 1)
        .map(|v| v.min(u32::MAX as i64) as u32)
        .unwrap_or(1)
}

/// What an opened link asks for.
///
/// A link that carries a usable numeric id always plays directly; a search
/// query in the same link is ignored. Without an id the query opens search,
/// and with neither the catalog is browsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchIntent {
    Play(WatchTarget),
    Search(String),
    Browse,
}

impl WatchIntent {
    pub fn resolve(
        kind: MediaKind,
        id: Option<&str>,
        query: Option<&str>,
        season: Option<i64>,
        episode: Option<i64>,
    ) -> Self {
        let id = id
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|id| *id > 0);
        if let Some(id) = id {
            return WatchIntent::Play(WatchTarget::from_parts(kind, id, season, episode));
        }
        match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => WatchIntent::Search(q.to_string()),
            None => WatchIntent::Browse,
        }
    }
}
