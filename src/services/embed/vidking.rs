//! Vidking embed player
//!
//! Movies: `/embed/movie/{tmdbId}`
//! Series: `/embed/tv/{tmdbId}/{season}/{episode}`
//!
//! Flags are sent as `=true` when enabled and omitted otherwise.

use super::with_query;
use crate::models::WatchTarget;

pub const VIDKING_BASE: &str = "https://www.vidking.net/embed";

/// Accent color used when the caller does not pick one
pub const DEFAULT_ACCENT_COLOR: &str = "e50914";

#[derive(Debug, Clone)]
pub struct VidkingRequest {
    pub target: WatchTarget,
    /// Hex color, with or without a leading `#`
    pub accent_color: Option<String>,
    pub autoplay: bool,
    /// Series only
    pub next_episode: bool,
    /// Series only
    pub episode_selector: bool,
    /// Start offset in seconds; ignored unless positive
    pub resume_seconds: Option<f64>,
}

impl VidkingRequest {
    pub fn new(target: WatchTarget) -> Self {
        Self {
            target,
            accent_color: Some(DEFAULT_ACCENT_COLOR.to_string()),
            autoplay: false,
            next_episode: true,
            episode_selector: true,
            resume_seconds: None,
        }
    }

    pub fn autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    pub fn resume_at(mut self, seconds: u64) -> Self {
        self.resume_seconds = Some(seconds as f64);
        self
    }
}

pub fn build_vidking_url(req: &VidkingRequest) -> String {
    let target = &req.target;
    if !target.is_playable() {
        return String::new();
    }

    let mut params: Vec<(&str, String)> = Vec::new();
    if let Some(color) = req.accent_color.as_deref() {
        let color = color.trim().trim_start_matches('#');
        if !color.is_empty() {
            params.push(("color", color.to_string()));
        }
    }
    if req.autoplay {
        params.push(("autoPlay", "true".to_string()));
    }
    if target.kind.is_series() {
        if req.next_episode {
            params.push(("nextEpisode", "true".to_string()));
        }
        if req.episode_selector {
            params.push(("episodeSelector", "true".to_string()));
        }
    }
    if let Some(progress) = req.resume_seconds.filter(|p| p.is_finite() && *p > 0.0) {
        params.push(("progress", (progress.floor() as u64).to_string()));
    }

    let base = if target.kind.is_series() {
        format!(
            "{}/tv/{}/{}/{}",
            VIDKING_BASE,
            target.tmdb_id,
            target.season.max(1),
            target.episode.max(1)
        )
    } else {
        format!("{}/movie/{}", VIDKING_BASE, target.tmdb_id)
    };

    with_query(&base, &params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaKind;

    #[test]
    fn test_movie_url_defaults() {
        let url = build_vidking_url(&VidkingRequest::new(WatchTarget::movie(1078605)));
        assert_eq!(url, "https://www.vidking.net/embed/movie/1078605?color=e50914");
    }

    #[test]
    fn test_series_url_with_flags() {
        let req = VidkingRequest::new(WatchTarget::episode(1399, 2, 5))
            .autoplay(true)
            .resume_at(754);
        assert_eq!(
            build_vidking_url(&req),
            "https://www.vidking.net/embed/tv/1399/2/5?color=e50914&autoPlay=true&nextEpisode=true&episodeSelector=true&progress=754"
        );
    }

    #[test]
    fn test_movie_ignores_series_flags() {
        let mut req = VidkingRequest::new(WatchTarget::movie(10));
        req.accent_color = Some("#00ff00".to_string());
        req.resume_seconds = Some(12.9);
        assert_eq!(
            build_vidking_url(&req),
            "https://www.vidking.net/embed/movie/10?color=00ff00&progress=12"
        );
    }

    #[test]
    fn test_zero_season_is_clamped() {
        let target = WatchTarget {
            kind: MediaKind::Series,
            tmdb_id: 1,
            season: 0,
            episode: 0,
        };
        let mut req = VidkingRequest::new(target);
        req.accent_color = None;
        req.next_episode = false;
        req.episode_selector = false;
        assert_eq!(build_vidking_url(&req), "https://www.vidking.net/embed/tv/1/1/1");
    }

    #[test]
    fn test_missing_id_yields_empty() {
        assert_eq!(build_vidking_url(&VidkingRequest::new(WatchTarget::movie(0))), "");
    }

    #[test]
    fn test_non_positive_progress_omitted() {
        let mut req = VidkingRequest::new(WatchTarget::movie(5));
        req.resume_seconds = Some(0.0);
        assert!(!build_vidking_url(&req).contains("progress"));
    }
}
