//! Sports commands: Streamed matches and streams, CDN-Live events

use super::{print_json, section_json, AppState};
use khattarhub::services::feeds::streamed::{group_matches, StreamedClient};
use khattarhub::services::feeds::{Grouped, Match, MatchFeed, SportFilter, SportsEvent, StreamEntry};
use khattarhub::services::sections::sports_sections;

fn match_json(streamed: &StreamedClient, m: &Match) -> serde_json::Value {
    serde_json::json!({
        "id": m.id,
        "title": m.title,
        "category": m.category,
        "date": m.date,
        "popular": m.popular,
        "artworkUrl": streamed.artwork_url(m),
        "sources": m.sources,
    })
}

fn grouped_matches_json(streamed: &StreamedClient, matches: Vec<Match>) -> serde_json::Value {
    let groups: Vec<_> = group_matches(matches)
        .into_iter()
        .map(|(label, matches)| {
            serde_json::json!({
                "category": label,
                "matches": matches.iter().map(|m| match_json(streamed, m)).collect::<Vec<_>>(),
            })
        })
        .collect();
    serde_json::Value::Array(groups)
}

fn event_json(grouped: &Grouped<SportsEvent>) -> serde_json::Value {
    let event = &grouped.item;
    serde_json::json!({
        "sport": grouped.group_label,
        "title": event.title(),
        "gameId": event.game_id,
        "tournament": event.tournament,
        "start": event.start_time_label,
        "status": event.status,
        "channels": event.channels,
        "playerUrl": event.player_url(),
    })
}

fn stream_json(stream: &StreamEntry) -> serde_json::Value {
    serde_json::json!({
        "label": stream.label(),
        "source": stream.source,
        "embedUrl": stream.embed_url,
    })
}

fn print_error(context: &str, e: impl std::fmt::Display) -> anyhow::Result<()> {
    tracing::error!("{} failed: {}", context, e);
    print_json(&serde_json::json!({ "error": e.to_string() }))
}

pub async fn sports(state: &AppState) -> anyhow::Result<()> {
    match state.streamed.sports().await {
        Ok(sports) => print_json(&sports),
        Err(e) => print_error("Streamed sports", e),
    }
}

pub async fn matches(state: &AppState, feed: &MatchFeed, popular: bool) -> anyhow::Result<()> {
    match state.streamed.matches(feed, popular).await {
        Ok(matches) => print_json(&grouped_matches_json(&state.streamed, matches)),
        Err(e) => print_error("Streamed matches", e),
    }
}

pub async fn streams(state: &AppState, source: &str, id: &str) -> anyhow::Result<()> {
    match state.streamed.streams(source, id).await {
        Ok(streams) => print_json(&streams.iter().map(stream_json).collect::<Vec<_>>()),
        Err(e) => print_error("Streamed streams", e),
    }
}

/// Find a match in a feed and list the streams of every source that answers
pub async fn match_streams(state: &AppState, match_id: &str, feed: &MatchFeed) -> anyhow::Result<()> {
    let matches = match state.streamed.matches(feed, false).await {
        Ok(matches) => matches,
        Err(e) => return print_error("Streamed matches", e),
    };
    let Some(found) = matches.iter().find(|m| m.id == match_id) else {
        return print_json(&serde_json::json!({ "error": "match not found" }));
    };

    let streams = state.streamed.resolve_streams(found).await;

    print_json(&serde_json::json!({
        "match": match_json(&state.streamed, found),
        "streams": streams.iter().map(stream_json).collect::<Vec<_>>(),
    }))
}

pub async fn cdn_events(state: &AppState, sport: SportFilter) -> anyhow::Result<()> {
    match state.cdn_live.sports_events(sport).await {
        Ok(events) => print_json(&events.iter().map(event_json).collect::<Vec<_>>()),
        Err(e) => print_error("CDN-Live events", e),
    }
}

/// Both sports feeds at once; either may fail on its own
pub async fn sports_home(state: &AppState, feed: &MatchFeed, sport: SportFilter) -> anyhow::Result<()> {
    let sections = sports_sections(&state.streamed, &state.cdn_live, feed, sport).await;
    let matches = sections
        .matches
        .map(|matches| grouped_matches_json(&state.streamed, matches));
    let events = sections
        .events
        .map(|events| events.iter().map(event_json).collect::<Vec<_>>());
    print_json(&serde_json::json!({
        "matches": section_json(&matches)?,
        "events": section_json(&events)?,
    }))
}
