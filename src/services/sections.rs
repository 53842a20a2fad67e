//! Concurrent page sections and stale-response suppression
//!
//! A page is made of independent sections (trending movies next to trending
//! series, live matches next to scheduled events). Each section is fetched
//! concurrently and settles on its own: one failing branch leaves its
//! siblings intact.
//!
//! Responses that arrive after the view that asked for them has been
//! superseded are dropped through `Liveness` tokens.

use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::models::{MediaItem, MediaKind};
use crate::services::feeds::{CdnLiveClient, Grouped, Match, MatchFeed, SportFilter, SportsEvent, StreamedClient};
use crate::services::tmdb::TmdbClient;

// ============================================================================
// Liveness
// ============================================================================

/// Generation counter shared by a view and the effects it starts.
///
/// `begin()` hands out a token for the newest effect; starting another
/// effect or calling `retire()` makes every earlier token stale.
#[derive(Debug, Clone, Default)]
pub struct Liveness {
    generation: Arc<AtomicU64>,
}

impl Liveness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> EffectToken {
        let issued = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        EffectToken {
            generation: Arc::clone(&self.generation),
            issued,
        }
    }

    /// Invalidate all outstanding tokens (view closed)
    pub fn retire(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Run `fut` under a fresh token; `None` if it went stale meanwhile
    pub async fn run<F, T>(&self, fut: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let token = self.begin();
        let value = fut.await;
        token.accept(value)
    }
}

#[derive(Debug, Clone)]
pub struct EffectToken {
    generation: Arc<AtomicU64>,
    issued: u64,
}

impl EffectToken {
    pub fn is_live(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.issued
    }

    /// Keep `value` only while the token is live
    pub fn accept<T>(&self, value: T) -> Option<T> {
        if self.is_live() {
            Some(value)
        } else {
            debug!(issued = self.issued, "discarding stale response");
            None
        }
    }
}

// ============================================================================
// Section state
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SectionState<T> {
    #[default]
    Loading,
    Ready(T),
    Failed,
}

impl<T> SectionState<T> {
    pub fn from_result<E: Display>(section: &str, result: Result<T, E>) -> Self {
        match result {
            Ok(value) => SectionState::Ready(value),
            Err(e) => {
                warn!("section '{}' failed: {}", section, e);
                SectionState::Failed
            }
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> SectionState<U> {
        match self {
            SectionState::Loading => SectionState::Loading,
            SectionState::Ready(value) => SectionState::Ready(f(value)),
            SectionState::Failed => SectionState::Failed,
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            SectionState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SectionState::Failed)
    }
}

/// Movies and series shown side by side
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogSections {
    pub movies: SectionState<Vec<MediaItem>>,
    pub series: SectionState<Vec<MediaItem>>,
}

impl CatalogSections {
    /// Both sections loaded with nothing in them
    pub fn empty() -> Self {
        Self {
            movies: SectionState::Ready(Vec::new()),
            series: SectionState::Ready(Vec::new()),
        }
    }
}

/// Streamed matches next to CDN-Live scheduled events
#[derive(Debug, Default)]
pub struct SportsSections {
    pub matches: SectionState<Vec<Match>>,
    pub events: SectionState<Vec<Grouped<SportsEvent>>>,
}

// ============================================================================
// Fan-out
// ============================================================================

/// Without a credential both sections are empty and nothing is requested
pub async fn trending_sections(tmdb: &TmdbClient) -> CatalogSections {
    if !tmdb.is_configured() {
        debug!("trending skipped: metadata client unconfigured");
        return CatalogSections::empty();
    }
    let (movies, series) = tokio::join!(
        tmdb.trending(MediaKind::Movie),
        tmdb.trending(MediaKind::Series)
    );
    CatalogSections {
        movies: SectionState::from_result("trending movies", movies),
        series: SectionState::from_result("trending series", series),
    }
}

/// Search both catalogs with the same query
pub async fn search_sections(tmdb: &TmdbClient, query: &str) -> CatalogSections {
    if !tmdb.is_configured() {
        debug!("search skipped: metadata client unconfigured");
        return CatalogSections::empty();
    }
    let (movies, series) = tokio::join!(
        tmdb.search(MediaKind::Movie, query),
        tmdb.search(MediaKind::Series, query)
    );
    CatalogSections {
        movies: SectionState::from_result("movie search", movies),
        series: SectionState::from_result("series search", series),
    }
}

pub async fn sports_sections(
    streamed: &StreamedClient,
    cdn_live: &CdnLiveClient,
    feed: &MatchFeed,
    filter: SportFilter,
) -> SportsSections {
    let (matches, events) = tokio::join!(
        streamed.matches(feed, false),
        cdn_live.sports_events(filter)
    );
    SportsSections {
        matches: SectionState::from_result("streamed matches", matches),
        events: SectionState::from_result("cdn-live events", events),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_new_effect_supersedes_old() {
        let liveness = Liveness::new();
        let first = liveness.begin();
        assert!(first.is_live());

        let second = liveness.begin();
        assert!(!first.is_live());
        assert!(second.is_live());
        assert_eq!(first.accept(1), None);
        assert_eq!(second.accept(2), Some(2));
    }

    #[test]
    fn test_retire_discards_everything() {
        let liveness = Liveness::new();
        let token = liveness.clone().begin();
        liveness.retire();
        assert!(token.accept("late").is_none());
    }

    #[tokio::test]
    async fn test_run_drops_result_superseded_midflight() {
        let liveness = Liveness::new();
        let inner = liveness.clone();
        let result = liveness
            .run(async move {
                inner.begin();
                "old"
            })
            .await;
        assert_eq!(result, None);

        assert_eq!(liveness.run(async { "fresh" }).await, Some("fresh"));
    }

    #[tokio::test]
    async fn test_one_failing_branch_keeps_sibling() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trending/movie/day"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{ "id": 603, "title": "The Matrix", "release_date": "1999-03-31" }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/trending/tv/day"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let tmdb = TmdbClient::new(Client::new(), &server.uri(), Some("key"));
        let sections = trending_sections(&tmdb).await;

        assert_eq!(sections.movies.ready().map(|m| m.len()), Some(1));
        assert!(sections.series.is_failed());
    }

    #[tokio::test]
    async fn test_blank_search_is_ready_and_empty() {
        let tmdb = TmdbClient::new(Client::new(), "http://127.0.0.1:9", Some("key"));
        let sections = search_sections(&tmdb, "  ").await;
        assert_eq!(sections.movies, SectionState::Ready(Vec::new()));
        assert_eq!(sections.series, SectionState::Ready(Vec::new()));
    }

    #[tokio::test]
    async fn test_unconfigured_sections_are_empty_without_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .expect(0)
            .mount(&server)
            .await;

        let tmdb = TmdbClient::new(Client::new(), &server.uri(), None);
        assert_eq!(trending_sections(&tmdb).await, CatalogSections::empty());
        assert_eq!(search_sections(&tmdb, "dune").await, CatalogSections::empty());
    }

    #[test]
    fn test_default_is_loading() {
        let sections = CatalogSections::default();
        assert_eq!(sections.movies, SectionState::Loading);
    }
}
