//! Live channel and sports feed clients
//!
//! Three independent third-party feeds, each reshaped into view-ready
//! records:
//!
//! - **CDN-Live**: flat channel list with viewer counts, and sport events
//!   nested under sport-name keys
//! - **Streamed**: sports matches carrying `{source, id}` references that are
//!   resolved into concrete streams by a second call
//! - **IPTV-org**: public channel and stream lists joined by channel id
//!
//! Every fetch is a single request with no retry. A failure is returned as a
//! `FeedError` and the caller shows an empty state for that section only.

pub mod cdnlive;
pub mod grouping;
pub mod iptvorg;
pub mod streamed;

pub use cdnlive::{CdnLiveClient, CdnChannel, ChannelList, SportFilter, SportsEvent};
pub use grouping::{flatten_grouped, group_by_label, matches_query, normalize_query, Grouped};
pub use iptvorg::{IptvOrgClient, LabelledStream};
pub use streamed::{Match, MatchFeed, StreamEntry, StreamedClient};

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

/// Connect timeout for feed requests. There is no overall request timeout.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Feed request errors
#[derive(Debug, Error)]
pub enum FeedError {
    /// Network/connection error
    #[error("Network error: {0}")]
    Network(String),
    /// HTTP error (non-2xx status)
    #[error("HTTP error: {0}")]
    Http(u16),
    /// JSON parsing error
    #[error("Parse error: {0}")]
    Parse(String),
    /// HTTP client could not be built (bad user agent, TLS backend)
    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

/// Build the shared HTTP client used by every feed
pub fn http_client(user_agent: &str) -> Result<Client, FeedError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .user_agent(user_agent)
        .build()
        .map_err(|e| FeedError::Client(e.to_string()))
}

/// GET a URL and decode its JSON body
pub(crate) async fn get_json<T: DeserializeOwned>(http: &Client, url: &str) -> Result<T, FeedError> {
    debug!("Feed request: {}", url);

    let response = http
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| FeedError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FeedError::Http(status.as_u16()));
    }

    let text = response
        .text()
        .await
        .map_err(|e| FeedError::Network(e.to_string()))?;

    serde_json::from_str(&text).map_err(|e| {
        error!("Failed to parse feed response from '{}': {}", url, e);
        debug!("Response text: {}", text.chars().take(500).collect::<String>());
        FeedError::Parse(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_accepts_default_agent() {
        assert!(http_client("KhattarHub/1.0").is_ok());
    }

    #[test]
    fn test_bad_user_agent_is_a_setup_error() {
        let err = http_client("bad\nagent").unwrap_err();
        assert!(matches!(err, FeedError::Client(_)));
        assert!(err.to_string().starts_with("HTTP client setup failed"));
    }
}
