//! CDN-Live TV feed
//!
//! Channels: `{base}/channels/?user=cdnlivetv&plan=free`
//! Events:   `{base}/events/sports/{sport}/?user=cdnlivetv&plan=free`
//!
//! The events payload nests events under sport names, optionally wrapped in
//! a `"cdn-live-tv"` root key.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::grouping::{flatten_grouped, matches_query, normalize_query, Grouped};
use super::{get_json, FeedError};
use crate::services::embed::live::{CDN_LIVE_PLAN, CDN_LIVE_USER};
use crate::services::embed::{build_cdn_live_player_url, CdnLivePlayerRequest};
use crate::services::memo::MemoCache;

const ROOT_KEY: &str = "cdn-live-tv";

/// Channel as listed by the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdnChannel {
    pub name: String,
    /// Country code
    pub code: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub viewers: u64,
}

impl CdnChannel {
    pub fn player_url(&self) -> String {
        build_cdn_live_player_url(&CdnLivePlayerRequest {
            channel_name: self.name.clone(),
            country_code: self.code.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelList {
    #[serde(default)]
    pub total_channels: u64,
    #[serde(default)]
    pub channels: Vec<CdnChannel>,
}

/// Sport filter for the events endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SportFilter {
    #[default]
    All,
    Soccer,
    Nfl,
    Nba,
    Nhl,
}

impl SportFilter {
    fn path(&self) -> &'static str {
        match self {
            SportFilter::All => "sports/",
            SportFilter::Soccer => "sports/soccer/",
            SportFilter::Nfl => "sports/nfl/",
            SportFilter::Nba => "sports/nba/",
            SportFilter::Nhl => "sports/nhl/",
        }
    }
}

impl std::str::FromStr for SportFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(SportFilter::All),
            "soccer" => Ok(SportFilter::Soccer),
            "nfl" => Ok(SportFilter::Nfl),
            "nba" => Ok(SportFilter::Nba),
            "nhl" => Ok(SportFilter::Nhl),
            other => Err(format!("unknown sport: {}", other)),
        }
    }
}

/// Event record as sent by the feed
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    #[serde(rename = "gameID", default)]
    game_id: Value,
    #[serde(default)]
    home_team: String,
    #[serde(default)]
    away_team: String,
    #[serde(rename = "homeTeamIMG", default)]
    home_team_img: Option<String>,
    #[serde(rename = "awayTeamIMG", default)]
    away_team_img: Option<String>,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    tournament: String,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    channels: Vec<RawEventChannel>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawEventChannel {
    #[serde(default)]
    channel_name: String,
    #[serde(default)]
    channel_code: String,
}

/// Channel candidate for an event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventChannel {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SportsEvent {
    pub game_id: String,
    pub home_team: String,
    pub away_team: String,
    pub tournament: String,
    pub start_time_label: String,
    pub channels: Vec<EventChannel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_team_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_team_image: Option<String>,
}

impl SportsEvent {
    pub fn title(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }

    /// Player URL for the first listed channel; empty when there is none
    pub fn player_url(&self) -> String {
        match self.channels.first() {
            Some(ch) => build_cdn_live_player_url(&CdnLivePlayerRequest {
                channel_name: ch.name.clone(),
                country_code: ch.code.clone(),
            }),
            None => String::new(),
        }
    }
}

impl From<RawEvent> for SportsEvent {
    fn from(raw: RawEvent) -> Self {
        let game_id = match raw.game_id {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };
        Self {
            game_id,
            home_team: raw.home_team,
            away_team: raw.away_team,
            tournament: raw.tournament,
            start_time_label: raw.time.unwrap_or_default(),
            channels: raw
                .channels
                .into_iter()
                .map(|c| EventChannel {
                    name: c.channel_name,
                    code: c.channel_code,
                })
                .collect(),
            country: raw.country,
            status: raw.status,
            home_team_image: raw.home_team_img,
            away_team_image: raw.away_team_img,
        }
    }
}

/// Flatten an events payload into `(event, sport)` pairs sorted by sport
pub fn flatten_events(payload: &Value) -> Vec<Grouped<SportsEvent>> {
    let root = payload.get(ROOT_KEY).unwrap_or(payload);
    let Some(object) = root.as_object() else {
        return Vec::new();
    };
    flatten_grouped(object, |value| {
        serde_json::from_value::<RawEvent>(value.clone())
            .ok()
            .map(SportsEvent::from)
    })
}

/// Filter channels by name or country code. Empty query keeps everything.
pub fn filter_channels<'a>(channels: &'a [CdnChannel], query: &str) -> Vec<&'a CdnChannel> {
    match normalize_query(query) {
        None => channels.iter().collect(),
        Some(q) => channels
            .iter()
            .filter(|ch| matches_query(&q, &[Some(ch.name.as_str()), Some(ch.code.as_str())]))
            .collect(),
    }
}

pub struct CdnLiveClient {
    http: Client,
    base_url: String,
    channels: MemoCache<ChannelList>,
}

impl CdnLiveClient {
    pub fn new(http: Client, base_url: &str, cache_ttl: Option<Duration>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            channels: MemoCache::new("cdnlive.channels", cache_ttl),
        }
    }

    fn query() -> String {
        format!("user={}&plan={}", CDN_LIVE_USER, CDN_LIVE_PLAN)
    }

    /// All live channels. Memoized for the session.
    pub async fn channels(&self) -> Result<Arc<ChannelList>, FeedError> {
        let url = format!("{}/channels/?{}", self.base_url, Self::query());
        self.channels
            .get_or_try_fetch(|| get_json::<ChannelList>(&self.http, &url))
            .await
    }

    /// Raw events payload, fetched fresh on every call
    pub async fn sports_events_raw(&self, filter: SportFilter) -> Result<Value, FeedError> {
        let url = format!("{}/events/{}?{}", self.base_url, filter.path(), Self::query());
        get_json(&self.http, &url).await
    }

    /// Events flattened and sorted by sport
    pub async fn sports_events(&self, filter: SportFilter) -> Result<Vec<Grouped<SportsEvent>>, FeedError> {
        let payload = self.sports_events_raw(filter).await?;
        Ok(flatten_events(&payload))
    }

    pub async fn invalidate(&self) {
        self.channels.invalidate().await;
    }
}
