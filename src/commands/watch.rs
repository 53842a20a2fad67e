//! Player URL commands for movies and series

use serde::Serialize;

use super::{catalog, print_json, AppState};
use crate::cli::Provider;
use khattarhub::models::{MediaKind, WatchIntent, WatchTarget};
use khattarhub::services::embed::{build_vidking_url, build_vidsrc_url, VidSrcRequest, VidkingRequest, PLAYER_FRAME_ALLOW};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayerView {
    url: String,
    allow: &'static str,
    resume_seconds: Option<u64>,
}

pub struct WatchOptions {
    pub provider: Provider,
    pub resume: bool,
    pub subtitle_lang: Option<String>,
}

pub fn watch(state: &AppState, target: WatchTarget, options: WatchOptions) -> anyhow::Result<()> {
    if !target.is_playable() {
        return print_json(&serde_json::json!({ "error": "a TMDB id is required to play" }));
    }

    let resume_seconds = if options.resume {
        let (season, episode) = match target.kind {
            MediaKind::Series => (Some(target.season), Some(target.episode)),
            MediaKind::Movie => (None, None),
        };
        state
            .progress_store()
            .get(target.kind, target.tmdb_id, season, episode)
            .map(|saved| saved.position_seconds)
            .filter(|seconds| *seconds > 0)
    } else {
        None
    };

    let url = match options.provider {
        Provider::Vidking => {
            let mut req = VidkingRequest::new(target).autoplay(true);
            if let Some(seconds) = resume_seconds {
                req = req.resume_at(seconds);
            }
            build_vidking_url(&req)
        }
        Provider::Vidsrc => {
            let mut req = VidSrcRequest::new(target);
            req.autonext = target.kind.is_series();
            req.subtitle_lang = options.subtitle_lang;
            build_vidsrc_url(&req)
        }
    };

    tracing::debug!(kind = %target.kind, id = target.tmdb_id, "player url built");

    print_json(&PlayerView {
        url,
        allow: PLAYER_FRAME_ALLOW,
        // VidSrc has no start-offset parameter
        resume_seconds: resume_seconds.filter(|_| matches!(options.provider, Provider::Vidking)),
    })
}

/// A direct id plays; otherwise the query is searched; otherwise browse trending
pub async fn open(
    state: &AppState,
    kind: MediaKind,
    id: Option<&str>,
    query: Option<&str>,
    season: Option<i64>,
    episode: Option<i64>,
) -> anyhow::Result<()> {
    match WatchIntent::resolve(kind, id, query, season, episode) {
        WatchIntent::Play(target) => watch(
            state,
            target,
            WatchOptions {
                provider: Provider::Vidking,
                resume: true,
                subtitle_lang: None,
            },
        ),
        WatchIntent::Search(q) => catalog::search(state, &q, Some(kind)).await,
        WatchIntent::Browse => catalog::trending(state, Some(kind)).await,
    }
}
