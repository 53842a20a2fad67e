use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TMDB_API_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_CDN_LIVE_API_BASE: &str = "https://api.cdn-live.tv/api/v1";
pub const DEFAULT_STREAMED_API_BASE: &str = "https://streamed.pk/api";
pub const DEFAULT_IPTV_ORG_API_BASE: &str = "https://iptv-org.github.io/api";

/// Application configuration loaded from environment variables
///
/// Read once at startup. Changing the metadata credential requires a restart.
#[derive(Debug, Clone)]
pub struct Config {
    // Metadata
    pub tmdb_api_key: Option<String>,
    pub tmdb_api_base: String,

    // Live feeds
    pub cdn_live_api_base: String,
    pub streamed_api_base: String,
    pub iptv_org_api_base: String,
    pub feed_cache_ttl: Option<Duration>,

    // Restricted channel section
    pub adult_unlock_code: Option<String>,
    pub channels_file: Option<PathBuf>,

    // Local state
    pub data_dir: PathBuf,

    // Misc
    pub user_agent: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            // Metadata
            tmdb_api_key: non_empty_var("TMDB_API_KEY"),
            tmdb_api_base: env::var("TMDB_API_BASE")
                .unwrap_or_else(|_| DEFAULT_TMDB_API_BASE.to_string()),

            // Live feeds
            cdn_live_api_base: env::var("CDN_LIVE_API_BASE")
                .unwrap_or_else(|_| DEFAULT_CDN_LIVE_API_BASE.to_string()),
            streamed_api_base: env::var("STREAMED_API_BASE")
                .unwrap_or_else(|_| DEFAULT_STREAMED_API_BASE.to_string()),
            iptv_org_api_base: env::var("IPTV_ORG_API_BASE")
                .unwrap_or_else(|_| DEFAULT_IPTV_ORG_API_BASE.to_string()),
            feed_cache_ttl: env::var("FEED_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs),

            // Restricted channel section
            adult_unlock_code: non_empty_var("ADULT_UNLOCK_CODE"),
            channels_file: non_empty_var("CHANNELS_FILE").map(PathBuf::from),

            // Local state
            data_dir: env::var("KHATTARHUB_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".khattarhub")),

            // Misc
            user_agent: env::var("USER_AGENT")
                .unwrap_or_else(|_| format!("KhattarHub/{}", env!("CARGO_PKG_VERSION"))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Unset and whitespace-only values are treated the same
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
