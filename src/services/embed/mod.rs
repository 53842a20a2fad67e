//! Player and image URL builders
//!
//! Every builder is a pure function from a typed request to a URL string.
//! None of them fail: when the request lacks the identifier a player needs,
//! the builder returns an empty string and the caller shows guidance instead
//! of a player.
//!
//! Numeric ranges (season, episode, player index) are clamped, never
//! rejected. Optional parameters that are absent are left out of the query
//! string entirely.

pub mod images;
pub mod live;
pub mod vidking;
pub mod vidsrc;

pub use images::{badge_url, poster_url, proxied_poster_url, tmdb_image_url, ImageSize};
pub use live::{build_cdn_live_player_url, build_daddylives_url, CdnLivePlayerRequest, DaddylivesRequest};
pub use vidking::{build_vidking_url, VidkingRequest};
pub use vidsrc::{build_vidsrc_url, VidSrcRequest};

use url::form_urlencoded;

/// Capabilities granted to third-party player frames
pub const PLAYER_FRAME_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; fullscreen; gyroscope; picture-in-picture";

/// Join a base URL and ordered query pairs. No `?` when there are no pairs.
fn with_query(base: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return base.to_string();
    }
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    format!("{}?{}", base, serializer.finish())
}
