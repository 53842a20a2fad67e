//! Live-channel players: Daddylives stream embeds and the CDN-Live channel player

use super::with_query;
use crate::models::ChannelSource;

pub const DADDYLIVES_EMBED_BASE: &str = "https://daddylives.nl/embed/stream.php";
pub const CDN_LIVE_PLAYER_BASE: &str = "https://cdn-live.tv/api/v1/channels/player";

/// Fixed account parameters the CDN-Live player expects
pub const CDN_LIVE_USER: &str = "cdnlivetv";
pub const CDN_LIVE_PLAN: &str = "free";

pub const MIN_PLAYER: i64 = 1;
pub const MAX_PLAYER: i64 = 13;

#[derive(Debug, Clone, Default)]
pub struct DaddylivesRequest {
    /// Channel id or event path, e.g. `664` or `admin/ppv-event/1`
    pub channel_id: String,
    /// Mirror number; anything outside 1..=13 is clamped
    pub player: i64,
    pub source: ChannelSource,
}

impl DaddylivesRequest {
    pub fn new(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            player: MIN_PLAYER,
            source: ChannelSource::Tv,
        }
    }
}

/// Clamp a player index into the supported mirror range
pub fn clamp_player(player: i64) -> i64 {
    player.clamp(MIN_PLAYER, MAX_PLAYER)
}

pub fn build_daddylives_url(req: &DaddylivesRequest) -> String {
    let id = req.channel_id.trim();
    if id.is_empty() {
        return String::new();
    }
    with_query(
        DADDYLIVES_EMBED_BASE,
        &[
            ("id", id.to_string()),
            ("player", clamp_player(req.player).to_string()),
            ("source", req.source.as_param().to_string()),
        ],
    )
}

#[derive(Debug, Clone, Default)]
pub struct CdnLivePlayerRequest {
    /// Channel display name, e.g. "ESPN"
    pub channel_name: String,
    /// Two-letter country code, e.g. "us"
    pub country_code: String,
}

pub fn build_cdn_live_player_url(req: &CdnLivePlayerRequest) -> String {
    if req.channel_name.is_empty() || req.country_code.is_empty() {
        return String::new();
    }
    with_query(
        &format!("{}/", CDN_LIVE_PLAYER_BASE),
        &[
            ("name", req.channel_name.clone()),
            ("code", req.country_code.clone()),
            ("user", CDN_LIVE_USER.to_string()),
            ("plan", CDN_LIVE_PLAN.to_string()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_index_clamped() {
        let mut req = DaddylivesRequest::new("664");
        req.player = 0;
        assert_eq!(
            build_daddylives_url(&req),
            "https://daddylives.nl/embed/stream.php?id=664&player=1&source=tv"
        );

        req.player = 999;
        req.source = ChannelSource::Tv2;
        assert_eq!(
            build_daddylives_url(&req),
            "https://daddylives.nl/embed/stream.php?id=664&player=13&source=tv2"
        );
    }

    #[test]
    fn test_event_path_is_encoded() {
        let url = build_daddylives_url(&DaddylivesRequest::new("admin/ppv-event/1"));
        assert_eq!(
            url,
            "https://daddylives.nl/embed/stream.php?id=admin%2Fppv-event%2F1&player=1&source=tv"
        );
    }

    #[test]
    fn test_missing_channel_id_yields_empty() {
        assert_eq!(build_daddylives_url(&DaddylivesRequest::new("")), "");
        assert_eq!(build_daddylives_url(&DaddylivesRequest::new("   ")), "");
    }

    #[test]
    fn test_cdn_live_player_url() {
        let req = CdnLivePlayerRequest {
            channel_name: "Sky Sports 1".to_string(),
            country_code: "gb".to_string(),
        };
        assert_eq!(
            build_cdn_live_player_url(&req),
            "https://cdn-live.tv/api/v1/channels/player/?name=Sky+Sports+1&code=gb&user=cdnlivetv&plan=free"
        );
    }

    #[test]
    fn test_cdn_live_requires_name_and_code() {
        let req = CdnLivePlayerRequest {
            channel_name: "ESPN".to_string(),
            country_code: String::new(),
        };
        assert_eq!(build_cdn_live_player_url(&req), "");
    }
}
