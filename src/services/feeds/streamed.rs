//! Streamed sports feed
//!
//! Matches reference their streams indirectly through `{source, id}` pairs;
//! `streams(source, id)` resolves one pair into concrete embeddable streams.

use futures::future::join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::grouping::group_by_label;
use super::{get_json, FeedError};
use crate::services::embed::{badge_url, poster_url, proxied_poster_url};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sport {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub badge: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Teams {
    #[serde(default)]
    pub home: Option<Team>,
    #[serde(default)]
    pub away: Option<Team>,
}

/// Reference to a stream list on one upstream source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub source: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    /// Kick-off, Unix millis
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub popular: bool,
    #[serde(default)]
    pub teams: Option<Teams>,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
}

impl Match {
    /// Best available artwork on `api_base`: the feed's poster, else one built from badges
    pub fn artwork_url(&self, api_base: &str) -> String {
        if let Some(poster) = self.poster.as_deref().filter(|p| !p.is_empty()) {
            return proxied_poster_url(api_base, poster);
        }
        let teams = self.teams.clone().unwrap_or_default();
        match (teams.home, teams.away) {
            (Some(home), Some(away)) => poster_url(api_base, &home.badge, &away.badge),
            (Some(team), None) | (None, Some(team)) => badge_url(api_base, &team.badge),
            (None, None) => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamEntry {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "streamNo")]
    pub stream_number: u32,
    #[serde(default)]
    pub language: String,
    #[serde(rename = "hd", default)]
    pub is_hd: bool,
    pub embed_url: String,
    #[serde(default)]
    pub source: String,
}

impl StreamEntry {
    /// Human label, e.g. "Stream 2 · English · HD"
    pub fn label(&self) -> String {
        let mut label = format!("Stream {}", self.stream_number);
        if !self.language.is_empty() {
            label.push_str(" · ");
            label.push_str(&self.language);
        }
        if self.is_hd {
            label.push_str(" · HD");
        }
        label
    }
}

/// Which match list to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchFeed {
    Live,
    AllToday,
    All,
    Sport(String),
}

impl MatchFeed {
    fn path(&self, popular_only: bool) -> String {
        let base = match self {
            MatchFeed::Live => "live".to_string(),
            MatchFeed::AllToday => "all-today".to_string(),
            MatchFeed::All => "all".to_string(),
            MatchFeed::Sport(id) => urlencoding::encode(id.trim_end_matches('/')).into_owned(),
        };
        if popular_only {
            format!("{}/popular", base)
        } else {
            base
        }
    }
}

impl std::str::FromStr for MatchFeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s {
            "" | "live" => MatchFeed::Live,
            "all-today" | "today" => MatchFeed::AllToday,
            "all" => MatchFeed::All,
            sport => MatchFeed::Sport(sport.to_string()),
        })
    }
}

pub struct StreamedClient {
    http: Client,
    base_url: String,
}

impl StreamedClient {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Match artwork served by the same host as this client
    pub fn artwork_url(&self, m: &Match) -> String {
        m.artwork_url(&self.base_url)
    }

    pub async fn sports(&self) -> Result<Vec<Sport>, FeedError> {
        get_json(&self.http, &format!("{}/sports", self.base_url)).await
    }

    pub async fn matches(&self, feed: &MatchFeed, popular_only: bool) -> Result<Vec<Match>, FeedError> {
        let url = format!("{}/matches/{}", self.base_url, feed.path(popular_only));
        get_json(&self.http, &url).await
    }

    /// Streams for one source reference. Empty source or id short-circuits.
    pub async fn streams(&self, source: &str, id: &str) -> Result<Vec<StreamEntry>, FeedError> {
        if source.is_empty() || id.is_empty() {
            return Ok(Vec::new());
        }
        let url = format!(
            "{}/stream/{}/{}",
            self.base_url,
            urlencoding::encode(source),
            urlencoding::encode(id)
        );
        get_json(&self.http, &url).await
    }

    /// Resolve every source of a match concurrently.
    ///
    /// Sources that fail are skipped so one broken upstream does not hide
    /// the streams of the others. Order follows `match.sources`.
    pub async fn resolve_streams(&self, m: &Match) -> Vec<StreamEntry> {
        let lookups = m
            .sources
            .iter()
            .map(|s| async move { (s, self.streams(&s.source, &s.id).await) });

        let mut out = Vec::new();
        for (source, result) in join_all(lookups).await {
            match result {
                Ok(streams) => out.extend(streams),
                Err(e) => warn!(source = %source.source, match_id = %m.id, "stream lookup failed: {}", e),
            }
        }
        out
    }
}

/// Group matches by sport category, categories ascending
pub fn group_matches(matches: Vec<Match>) -> Vec<(String, Vec<Match>)> {
    group_by_label(matches, |m| Some(m.category.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_match(id: &str, category: &str, sources: serde_json::Value) -> serde_json::Value {
        json!({
            "id": id,
            "title": format!("Match {}", id),
            "category": category,
            "date": 1700000000000i64,
            "popular": true,
            "sources": sources
        })
    }

    #[test]
    fn test_feed_paths() {
        assert_eq!(MatchFeed::Live.path(false), "live");
        assert_eq!(MatchFeed::AllToday.path(true), "all-today/popular");
        assert_eq!(MatchFeed::Sport("football/".into()).path(false), "football");
        assert_eq!("today".parse::<MatchFeed>().unwrap(), MatchFeed::AllToday);
    }

    #[test]
    fn test_stream_label() {
        let stream = StreamEntry {
            id: "x".into(),
            stream_number: 2,
            language: "English".into(),
            is_hd: true,
            embed_url: "https://embed.example/x".into(),
            source: "alpha".into(),
        };
        assert_eq!(stream.label(), "Stream 2 · English · HD");
    }

    #[test]
    fn test_group_matches_defaults_to_other() {
        let matches: Vec<Match> = serde_json::from_value(json!([
            sample_match("1", "tennis", json!([])),
            sample_match("2", "", json!([])),
            sample_match("3", "football", json!([]))
        ]))
        .unwrap();
        let groups = group_matches(matches);
        let labels: Vec<_> = groups.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Other", "football", "tennis"]);
    }

    #[test]
    fn test_artwork_prefers_poster() {
        let mut m: Match = serde_json::from_value(sample_match("1", "f", json!([]))).unwrap();
        m.teams = Some(Teams {
            home: Some(Team { name: "A".into(), badge: "a".into() }),
            away: Some(Team { name: "B".into(), badge: "b".into() }),
        });
        assert_eq!(
            m.artwork_url("https://streamed.pk/api"),
            "https://streamed.pk/api/images/poster/a/b.webp"
        );
        m.poster = Some("/api/images/proxy/p.webp".into());
        assert_eq!(
            m.artwork_url("https://streamed.pk/api"),
            "https://streamed.pk/api/images/proxy/p.webp"
        );
    }

    #[test]
    fn test_client_artwork_uses_its_base() {
        let mut m: Match = serde_json::from_value(sample_match("1", "f", json!([]))).unwrap();
        m.poster = Some("/api/images/proxy/p.webp".into());
        let client = StreamedClient::new(Client::new(), "http://127.0.0.1:9/api/");
        assert_eq!(client.artwork_url(&m), "http://127.0.0.1:9/api/images/proxy/p.webp");
    }

    #[tokio::test]
    async fn test_empty_source_skips_request() {
        let client = StreamedClient::new(Client::new(), "http://127.0.0.1:9");
        assert!(client.streams("", "abc").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_streams_isolates_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stream/alpha/m1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": "m1", "streamNo": 1, "language": "English", "hd": true, "embedUrl": "https://e/1", "source": "alpha" }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/stream/bravo/m1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = StreamedClient::new(Client::new(), &server.uri());
        let m: Match = serde_json::from_value(sample_match(
            "m1",
            "football",
            json!([{ "source": "alpha", "id": "m1" }, { "source": "bravo", "id": "m1" }]),
        ))
        .unwrap();

        let streams = client.resolve_streams(&m).await;
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].embed_url, "https://e/1");
        assert!(streams[0].is_hd);
    }

    #[tokio::test]
    async fn test_matches_request_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/matches/live/popular"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                sample_match("9", "basketball", json!([]))
            ])))
            .mount(&server)
            .await;

        let client = StreamedClient::new(Client::new(), &server.uri());
        let matches = client.matches(&MatchFeed::Live, true).await.unwrap();
        assert_eq!(matches[0].id, "9");
        assert!(matches[0].popular);
    }
}
