//! Catalog commands: trending, search, curated lists, details

use serde::Serialize;

use super::{print_json, section_json, AppState};
use crate::cli::CatalogList;
use khattarhub::models::{MediaItem, MediaKind};
use khattarhub::services::embed::{tmdb_image_url, ImageSize};
use khattarhub::services::sections::{search_sections, trending_sections, CatalogSections};
use khattarhub::services::tmdb::{EpisodePicker, MediaDetails, MetadataError};

/// A list row with its poster resolved to an absolute URL
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRow {
    #[serde(flatten)]
    pub item: MediaItem,
    pub poster_url: Option<String>,
}

impl From<MediaItem> for ItemRow {
    fn from(item: MediaItem) -> Self {
        let poster_url = tmdb_image_url(item.poster_path.as_deref(), ImageSize::Poster);
        Self { item, poster_url }
    }
}

fn rows(items: Vec<MediaItem>) -> Vec<ItemRow> {
    items.into_iter().map(ItemRow::from).collect()
}

/// Degraded mode for single lists: no credential, nothing to ask for
fn ensure_configured(state: &AppState) -> bool {
    if state.tmdb.is_configured() {
        return true;
    }
    println!("[]");
    tracing::info!("Catalog is hidden until TMDB_API_KEY is set");
    false
}

fn print_list(result: Result<Vec<MediaItem>, MetadataError>) -> anyhow::Result<()> {
    match result {
        Ok(items) => print_json(&rows(items)),
        Err(e) => {
            tracing::error!("Catalog request failed: {}", e);
            print_json(&serde_json::json!({ "error": e.to_string() }))
        }
    }
}

fn sections_json(sections: CatalogSections) -> anyhow::Result<serde_json::Value> {
    let movies = sections.movies.map(rows);
    let series = sections.series.map(rows);
    Ok(serde_json::json!({
        "movies": section_json(&movies)?,
        "series": section_json(&series)?,
    }))
}

fn print_sections(sections: CatalogSections) -> anyhow::Result<()> {
    print_json(&sections_json(sections)?)
}

pub async fn trending(state: &AppState, kind: Option<MediaKind>) -> anyhow::Result<()> {
    match kind {
        Some(kind) => {
            if !ensure_configured(state) {
                return Ok(());
            }
            print_list(state.tmdb.trending(kind).await)
        }
        None => print_sections(trending_sections(&state.tmdb).await),
    }
}

pub async fn search(state: &AppState, query: &str, kind: Option<MediaKind>) -> anyhow::Result<()> {
    match kind {
        Some(kind) => {
            if !ensure_configured(state) {
                return Ok(());
            }
            print_list(state.tmdb.search(kind, query).await)
        }
        None => print_sections(search_sections(&state.tmdb, query).await),
    }
}

pub async fn list(state: &AppState, list: CatalogList, kind: MediaKind, page: u32) -> anyhow::Result<()> {
    if !ensure_configured(state) {
        return Ok(());
    }
    let result = match list {
        CatalogList::Popular => state.tmdb.popular(kind, page).await,
        CatalogList::TopRated => state.tmdb.top_rated(kind, page).await,
        CatalogList::NowPlaying => state.tmdb.now_playing(page).await,
        CatalogList::AiringToday => state.tmdb.airing_today(page).await,
    };
    print_list(result)
}

pub async fn discover(state: &AppState, kind: MediaKind, genre: u32, page: u32) -> anyhow::Result<()> {
    if !ensure_configured(state) {
        return Ok(());
    }
    print_list(state.tmdb.discover(kind, genre, page).await)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DetailsView {
    #[serde(flatten)]
    details: MediaDetails,
    poster_url: Option<String>,
    backdrop_url: Option<String>,
    /// Series only: the selected season and its episode numbers
    selected_season: Option<u32>,
    episodes: Vec<u32>,
}

pub async fn details(state: &AppState, kind: MediaKind, id: u64, season: u32) -> anyhow::Result<()> {
    if !ensure_configured(state) {
        return Ok(());
    }
    let details = match state.tmdb.details(kind, id).await {
        Ok(details) => details,
        Err(e) => {
            tracing::error!("Details for {} {} failed: {}", kind, id, e);
            return print_json(&serde_json::json!({ "error": e.to_string() }));
        }
    };

    let (selected_season, episodes) = if kind.is_series() {
        let mut picker = EpisodePicker::default();
        picker.select_season(season);
        (Some(picker.season), details.episodes(picker.season))
    } else {
        (None, Vec::new())
    };

    let view = DetailsView {
        poster_url: tmdb_image_url(details.poster_path.as_deref(), ImageSize::Poster),
        backdrop_url: tmdb_image_url(details.backdrop_path.as_deref(), ImageSize::Original),
        selected_season,
        episodes,
        details,
    };
    print_json(&view)
}
