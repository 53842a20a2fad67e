//! VidSrc embed player
//!
//! This provider documents string booleans, so `autoplay` and `autonext`
//! are always sent as `1` / `0`.

use super::with_query;
use crate::models::WatchTarget;

pub const VIDSRC_EMBED_BASE: &str = "https://vidsrcme.ru";

#[derive(Debug, Clone)]
pub struct VidSrcRequest {
    pub target: WatchTarget,
    pub autoplay: bool,
    /// Series only
    pub autonext: bool,
    /// Default subtitle language (`ds_lang`)
    pub subtitle_lang: Option<String>,
}

impl VidSrcRequest {
    pub fn new(target: WatchTarget) -> Self {
        Self {
            target,
            autoplay: true,
            autonext: false,
            subtitle_lang: None,
        }
    }
}

fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}

pub fn build_vidsrc_url(req: &VidSrcRequest) -> String {
    let target = &req.target;
    if !target.is_playable() {
        return String::new();
    }

    let mut params: Vec<(&str, String)> = vec![("tmdb", target.tmdb_id.to_string())];
    if target.kind.is_series() {
        params.push(("season", target.season.max(1).to_string()));
        params.push(("episode", target.episode.max(1).to_string()));
        params.push(("autoplay", flag(req.autoplay)));
        params.push(("autonext", flag(req.autonext)));
    } else {
        params.push(("autoplay", flag(req.autoplay)));
    }
    if let Some(lang) = req.subtitle_lang.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        params.push(("ds_lang", lang.to_string()));
    }

    let path = if target.kind.is_series() {
        "/embed/tv"
    } else {
        "/embed/movie"
    };
    with_query(&format!("{}{}", VIDSRC_EMBED_BASE, path), &params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_url() {
        let url = build_vidsrc_url(&VidSrcRequest::new(WatchTarget::movie(603)));
        assert_eq!(url, "https://vidsrcme.ru/embed/movie?tmdb=603&autoplay=1");
    }

    #[test]
    fn test_series_url_with_language() {
        let mut req = VidSrcRequest::new(WatchTarget::episode(1399, 1, 3));
        req.autoplay = false;
        req.autonext = true;
        req.subtitle_lang = Some("de".to_string());
        assert_eq!(
            build_vidsrc_url(&req),
            "https://vidsrcme.ru/embed/tv?tmdb=1399&season=1&episode=3&autoplay=0&autonext=1&ds_lang=de"
        );
    }

    #[test]
    fn test_idempotent() {
        let req = VidSrcRequest::new(WatchTarget::episode(42, 3, 9));
        assert_eq!(build_vidsrc_url(&req), build_vidsrc_url(&req));
    }

    #[test]
    fn test_missing_id_yields_empty() {
        assert_eq!(build_vidsrc_url(&VidSrcRequest::new(WatchTarget::movie(0))), "");
    }
}
