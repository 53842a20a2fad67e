//! Live TV commands: channel registry, CDN-Live channels, IPTV-org streams

use serde::Serialize;

use super::{print_json, AppState};
use khattarhub::models::{Channel, ChannelSource};
use khattarhub::services::channels::{channel_player_url, LetterFilter, UnlockGate};
use khattarhub::services::embed::{build_daddylives_url, DaddylivesRequest, PLAYER_FRAME_ALLOW};
use khattarhub::services::feeds::cdnlive::filter_channels;
use khattarhub::services::feeds::iptvorg::search_streams;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChannelRow<'a> {
    #[serde(flatten)]
    channel: &'a Channel,
    player_url: String,
}

fn channel_rows<'a>(channels: &[&'a Channel]) -> Vec<ChannelRow<'a>> {
    channels
        .iter()
        .map(|channel| ChannelRow {
            channel,
            player_url: channel_player_url(channel, 1),
        })
        .collect()
}

pub fn channels(state: &AppState, query: &str, letter: LetterFilter, taps: u8) -> anyhow::Result<()> {
    // Fresh every run, never persisted
    let mut gate = UnlockGate::new(state.config.adult_unlock_code.as_deref());
    for _ in 0..taps {
        gate.tap();
    }

    let listing = state.registry.browse(query, letter, &gate);
    tracing::debug!(
        shown = listing.channels.len(),
        unlocked = listing.restricted.is_some(),
        "channel list built"
    );

    print_json(&serde_json::json!({
        "channels": channel_rows(&listing.channels),
        "letterCounts": listing.letter_counts,
        "restricted": listing.restricted.as_deref().map(channel_rows),
    }))
}

pub fn live_watch(state: &AppState, id: &str, player: i64, source: ChannelSource) -> anyhow::Result<()> {
    let url = build_daddylives_url(&DaddylivesRequest {
        channel_id: id.to_string(),
        player,
        source,
    });
    if url.is_empty() {
        return print_json(&serde_json::json!({ "error": "a channel id is required" }));
    }
    print_json(&serde_json::json!({
        "title": state.registry.watch_title(id.trim(), source),
        "url": url,
        "allow": PLAYER_FRAME_ALLOW,
    }))
}

pub async fn cdn_channels(state: &AppState, query: &str) -> anyhow::Result<()> {
    let list = match state.cdn_live.channels().await {
        Ok(list) => list,
        Err(e) => {
            tracing::error!("CDN-Live channel list failed: {}", e);
            return print_json(&serde_json::json!({ "error": e.to_string() }));
        }
    };

    let rows: Vec<_> = filter_channels(&list.channels, query)
        .into_iter()
        .map(|c| {
            serde_json::json!({
                "name": c.name,
                "code": c.code,
                "status": c.status,
                "viewers": c.viewers,
                "image": c.image,
                "playerUrl": c.player_url(),
            })
        })
        .collect();

    print_json(&serde_json::json!({
        "totalChannels": list.total_channels,
        "channels": rows,
    }))
}

pub async fn iptv(state: &AppState, query: &str) -> anyhow::Result<()> {
    match state.iptv_org.labelled_streams().await {
        Ok(streams) => print_json(&search_streams(&streams, query)),
        Err(e) => {
            tracing::error!("IPTV-org lists failed: {}", e);
            print_json(&serde_json::json!({ "error": e.to_string() }))
        }
    }
}
