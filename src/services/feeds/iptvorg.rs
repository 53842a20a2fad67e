//! IPTV-org public data (channels.json and streams.json)
//!
//! Both lists are large and change rarely, so each is memoized for the
//! session. Streams are direct media URLs played in a native video element
//! rather than an embed frame.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::grouping::{matches_query, normalize_query};
use super::{get_json, FeedError};
use crate::services::memo::MemoCache;

/// Maximum rows returned by a stream search
pub const SEARCH_LIMIT: usize = 200;

#[derive(Debug, Clone, Deserialize)]
pub struct IptvChannel {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IptvStream {
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub url: String,
    #[serde(default)]
    pub quality: Option<String>,
}

/// Stream joined with its channel name
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelledStream {
    /// Index-based; the upstream list has no stable row id
    pub id: String,
    pub title: String,
    pub url: String,
    pub channel_name: Option<String>,
    pub quality: Option<String>,
    pub channel_id: Option<String>,
}

/// Join streams with channel names.
///
/// Title falls back to the channel name, then to "Stream".
pub fn label_streams(channels: &[IptvChannel], streams: &[IptvStream]) -> Vec<LabelledStream> {
    let names: HashMap<&str, &str> = channels
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    streams
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let channel_id = s.channel.clone().filter(|c| !c.is_empty());
            let channel_name = channel_id
                .as_deref()
                .and_then(|id| names.get(id))
                .map(|n| n.to_string());
            let title = s
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .or_else(|| channel_name.clone().filter(|n| !n.is_empty()))
                .unwrap_or_else(|| "Stream".to_string());
            LabelledStream {
                id: format!("iptv-{}", i),
                title,
                url: s.url.clone(),
                channel_name,
                quality: s.quality.clone().filter(|q| !q.is_empty()),
                channel_id,
            }
        })
        .collect()
}

/// Search by title or channel name, capped at `SEARCH_LIMIT`.
/// An empty query returns the first `SEARCH_LIMIT` rows.
pub fn search_streams<'a>(streams: &'a [LabelledStream], query: &str) -> Vec<&'a LabelledStream> {
    let q = normalize_query(query);
    streams
        .iter()
        .filter(|s| match &q {
            None => true,
            Some(q) => matches_query(q, &[Some(s.title.as_str()), s.channel_name.as_deref()]),
        })
        .take(SEARCH_LIMIT)
        .collect()
}

pub struct IptvOrgClient {
    http: Client,
    base_url: String,
    channels: MemoCache<Vec<IptvChannel>>,
    streams: MemoCache<Vec<IptvStream>>,
}

impl IptvOrgClient {
    pub fn new(http: Client, base_url: &str, cache_ttl: Option<Duration>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            channels: MemoCache::new("iptvorg.channels", cache_ttl),
            streams: MemoCache::new("iptvorg.streams", cache_ttl),
        }
    }

    pub async fn channels(&self) -> Result<Arc<Vec<IptvChannel>>, FeedError> {
        let url = format!("{}/channels.json", self.base_url);
        self.channels
            .get_or_try_fetch(|| get_json::<Vec<IptvChannel>>(&self.http, &url))
            .await
    }

    pub async fn streams(&self) -> Result<Arc<Vec<IptvStream>>, FeedError> {
        let url = format!("{}/streams.json", self.base_url);
        self.streams
            .get_or_try_fetch(|| get_json::<Vec<IptvStream>>(&self.http, &url))
            .await
    }

    /// Both lists are needed for a labelled row, so this join fails as a unit
    pub async fn labelled_streams(&self) -> Result<Vec<LabelledStream>, FeedError> {
        let (channels, streams) = tokio::try_join!(self.channels(), self.streams())?;
        Ok(label_streams(&channels, &streams))
    }

    pub async fn invalidate(&self) {
        self.channels.invalidate().await;
        self.streams.invalidate().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn channel(id: &str, name: &str) -> IptvChannel {
        IptvChannel {
            id: id.into(),
            name: name.into(),
        }
    }

    fn stream(channel: Option<&str>, title: Option<&str>) -> IptvStream {
        IptvStream {
            channel: channel.map(String::from),
            title: title.map(String::from),
            url: "https://media.example/x.m3u8".into(),
            quality: None,
        }
    }

    #[test]
    fn test_label_fallbacks() {
        let channels = vec![channel("bbc1.uk", "BBC One")];
        let streams = vec![
            stream(Some("bbc1.uk"), None),
            stream(Some("unknown.xx"), None),
            stream(None, Some("Custom Feed")),
        ];
        let labelled = label_streams(&channels, &streams);
        assert_eq!(labelled[0].title, "BBC One");
        assert_eq!(labelled[0].channel_name.as_deref(), Some("BBC One"));
        assert_eq!(labelled[1].title, "Stream");
        assert_eq!(labelled[1].channel_id.as_deref(), Some("unknown.xx"));
        assert_eq!(labelled[2].title, "Custom Feed");
        assert_eq!(labelled[2].id, "iptv-2");
    }

    #[test]
    fn test_search_is_capped() {
        let streams: Vec<IptvStream> = (0..250).map(|_| stream(None, Some("News"))).collect();
        let labelled = label_streams(&[], &streams);
        assert_eq!(search_streams(&labelled, "").len(), SEARCH_LIMIT);
        assert_eq!(search_streams(&labelled, "news").len(), SEARCH_LIMIT);
        assert!(search_streams(&labelled, "sport").is_empty());
    }

    #[tokio::test]
    async fn test_labelled_streams_joins_both_lists() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/channels.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": "cnn.us", "name": "CNN", "country": "US" }
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/streams.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "channel": "cnn.us", "url": "https://cnn.example/live.m3u8", "quality": "720p" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = IptvOrgClient::new(Client::new(), &server.uri(), None);
        let rows = client.labelled_streams().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "CNN");
        assert_eq!(rows[0].quality.as_deref(), Some("720p"));

        // served from the memo
        client.labelled_streams().await.unwrap();
    }

    #[tokio::test]
    async fn test_labelled_streams_fails_when_one_list_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/channels.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/streams.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = IptvOrgClient::new(Client::new(), &server.uri(), None);
        assert!(matches!(client.labelled_streams().await, Err(FeedError::Http(404))));
    }
}
