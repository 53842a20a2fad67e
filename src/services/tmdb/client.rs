//! TMDB API Client
//!
//! Every call sends `api_key` and `language=en-US`. Any transport failure,
//! non-success status or undecodable body surfaces as the same
//! `MetadataError::RequestFailed`; callers render an empty state instead of
//! branching on the cause.

use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use super::types::{MediaDetails, TmdbDetails, TmdbListResponse};
use crate::models::{MediaItem, MediaKind};

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("TMDB request failed")]
    RequestFailed,
}

pub struct TmdbClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl TmdbClient {
    /// `api_key` is trimmed; empty means "not configured"
    pub fn new(http: Client, base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from),
        }
    }

    /// True when a credential was supplied. No network involved.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, MetadataError> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            debug!("TMDB call to {} skipped: no API key", path);
            MetadataError::RequestFailed
        })?;
        let mut url = Url::parse(&format!("{}{}", self.base_url, path)).map_err(|e| {
            error!("Invalid TMDB URL for {}: {}", path, e);
            MetadataError::RequestFailed
        })?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api_key", key);
            query.append_pair("language", "en-US");
            for (k, v) in params {
                query.append_pair(k, v);
            }
        }
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T, MetadataError> {
        let url = self.url(path, params)?;

        debug!("TMDB request: {}", path);

        let response = self.http.get(url).send().await.map_err(|e| {
            debug!("TMDB network error on {}: {}", path, e);
            MetadataError::RequestFailed
        })?;

        let status = response.status();
        if !status.is_success() {
            debug!("TMDB {} returned {}", path, status);
            return Err(MetadataError::RequestFailed);
        }

        response.json::<T>().await.map_err(|e| {
            error!("Failed to parse TMDB response for '{}': {}", path, e);
            MetadataError::RequestFailed
        })
    }

    async fn list(&self, kind: MediaKind, path: &str, params: &[(&str, String)]) -> Result<Vec<MediaItem>, MetadataError> {
        let response: TmdbListResponse = self.get(path, params).await?;
        Ok(response
            .results
            .into_iter()
            .map(|r| r.into_media_item(kind))
            .collect())
    }

    // ========================================================================
    // Lists
    // ========================================================================

    /// Today's trending titles
    pub async fn trending(&self, kind: MediaKind) -> Result<Vec<MediaItem>, MetadataError> {
        self.list(kind, &format!("/trending/{}/day", kind.as_path()), &[])
            .await
    }

    pub async fn popular(&self, kind: MediaKind, page: u32) -> Result<Vec<MediaItem>, MetadataError> {
        self.list(kind, &format!("/{}/popular", kind.as_path()), &[page_param(page)])
            .await
    }

    pub async fn top_rated(&self, kind: MediaKind, page: u32) -> Result<Vec<MediaItem>, MetadataError> {
        self.list(kind, &format!("/{}/top_rated", kind.as_path()), &[page_param(page)])
            .await
    }

    /// Movies in theatres
    pub async fn now_playing(&self, page: u32) -> Result<Vec<MediaItem>, MetadataError> {
        self.list(MediaKind::Movie, "/movie/now_playing", &[page_param(page)])
            .await
    }

    /// Series with an episode airing today
    pub async fn airing_today(&self, page: u32) -> Result<Vec<MediaItem>, MetadataError> {
        self.list(MediaKind::Series, "/tv/airing_today", &[page_param(page)])
            .await
    }

    /// Discover by genre id (e.g. 28 Action for movies, 10759 Action & Adventure for series)
    pub async fn discover(&self, kind: MediaKind, genre_id: u32, page: u32) -> Result<Vec<MediaItem>, MetadataError> {
        self.list(
            kind,
            &format!("/discover/{}", kind.as_path()),
            &[("with_genres", genre_id.to_string()), page_param(page)],
        )
        .await
    }

    // ========================================================================
    // Search & details
    // ========================================================================

    /// Title search. A blank query returns no results without a request.
    pub async fn search(&self, kind: MediaKind, query: &str) -> Result<Vec<MediaItem>, MetadataError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.list(
            kind,
            &format!("/search/{}", kind.as_path()),
            &[("query", query.to_string())],
        )
        .await
    }

    pub async fn details(&self, kind: MediaKind, id: u64) -> Result<MediaDetails, MetadataError> {
        let raw: TmdbDetails = self
            .get(&format!("/{}/{}", kind.as_path(), id), &[])
            .await?;
        Ok(MediaDetails::from_raw(kind, raw))
    }
}

fn page_param(page: u32) -> (&'static str, String) {
    ("page", page.max(1).to_string())
}
