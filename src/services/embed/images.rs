//! Artwork URLs for the metadata API and the Streamed sports feed

pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// List thumbnails (`w500`)
    Poster,
    Original,
}

impl ImageSize {
    fn as_segment(&self) -> &'static str {
        match self {
            ImageSize::Poster => "w500",
            ImageSize::Original => "original",
        }
    }
}

/// Full image URL for a TMDB `poster_path` / `backdrop_path`
pub fn tmdb_image_url(path: Option<&str>, size: ImageSize) -> Option<String> {
    let path = path?.trim();
    if path.is_empty() {
        return None;
    }
    let sep = if path.starts_with('/') { "" } else { "/" };
    Some(format!("{}/{}{}{}", TMDB_IMAGE_BASE, size.as_segment(), sep, path))
}

/// Site root for a Streamed API base: `https://host/api` serves pages from `https://host`
fn streamed_site_base(api_base: &str) -> &str {
    let api_base = api_base.trim_end_matches('/');
    api_base.strip_suffix("/api").unwrap_or(api_base)
}

/// Team badge (WebP). Badge ids may already carry the extension.
pub fn badge_url(api_base: &str, badge_id: &str) -> String {
    if badge_id.is_empty() {
        return String::new();
    }
    let suffix = if badge_id.ends_with(".webp") { "" } else { ".webp" };
    format!(
        "{}/images/badge/{}{}",
        api_base.trim_end_matches('/'),
        badge_id,
        suffix
    )
}

/// Match poster composed from two team badges
pub fn poster_url(api_base: &str, home_badge: &str, away_badge: &str) -> String {
    if home_badge.is_empty() || away_badge.is_empty() {
        return String::new();
    }
    format!(
        "{}/images/poster/{}/{}.webp",
        api_base.trim_end_matches('/'),
        home_badge,
        away_badge
    )
}

/// Match poster as returned in `match.poster`: an absolute URL, a site path
/// such as `/api/images/proxy/X.webp`, or a bare proxy id.
pub fn proxied_poster_url(api_base: &str, poster: &str) -> String {
    if poster.is_empty() {
        return String::new();
    }
    if poster.starts_with("http") {
        return poster.to_string();
    }
    if poster.starts_with('/') {
        return format!("{}{}", streamed_site_base(api_base), poster);
    }
    let id = strip_webp(poster);
    format!(
        "{}/images/proxy/{}.webp",
        api_base.trim_end_matches('/'),
        id
    )
}

fn strip_webp(value: &str) -> &str {
    let cut = value.len().saturating_sub(5);
    match value.get(cut..) {
        Some(ext) if ext.eq_ignore_ascii_case(".webp") => &value[..cut],
        _ => value,
    }
}
