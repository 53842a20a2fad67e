//! Command handlers for the CLI front-end
//!
//! Each handler reads from `AppState`, calls into the library and prints a
//! JSON document on stdout. Logs go to stderr.

pub mod catalog;
pub mod live;
pub mod progress;
pub mod sports;
pub mod watch;

use anyhow::Context;
use serde::Serialize;

use khattarhub::config::Config;
use khattarhub::services::channels::ChannelRegistry;
use khattarhub::services::feeds::{http_client, CdnLiveClient, IptvOrgClient, StreamedClient};
use khattarhub::services::progress::ProgressStore;
use khattarhub::services::sections::SectionState;
use khattarhub::services::storage::FileStorage;
use khattarhub::services::tmdb::TmdbClient;

/// Clients and datasets shared by every command
pub struct AppState {
    pub config: Config,
    pub tmdb: TmdbClient,
    pub cdn_live: CdnLiveClient,
    pub streamed: StreamedClient,
    pub iptv_org: IptvOrgClient,
    pub registry: ChannelRegistry,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http = http_client(&config.user_agent).context("failed to build HTTP client")?;

        let tmdb = TmdbClient::new(
            http.clone(),
            &config.tmdb_api_base,
            config.tmdb_api_key.as_deref(),
        );
        if !tmdb.is_configured() {
            tracing::warn!("TMDB_API_KEY not set: catalog commands will return nothing");
        }

        let cdn_live = CdnLiveClient::new(http.clone(), &config.cdn_live_api_base, config.feed_cache_ttl);
        let streamed = StreamedClient::new(http.clone(), &config.streamed_api_base);
        let iptv_org = IptvOrgClient::new(http, &config.iptv_org_api_base, config.feed_cache_ttl);
        let registry = load_registry(&config)?;

        Ok(Self {
            config,
            tmdb,
            cdn_live,
            streamed,
            iptv_org,
            registry,
        })
    }

    pub fn progress_store(&self) -> ProgressStore<FileStorage> {
        ProgressStore::new(FileStorage::new(&self.config.data_dir))
    }
}

/// External channel file when configured and readable, bundled list otherwise
fn load_registry(config: &Config) -> anyhow::Result<ChannelRegistry> {
    if let Some(path) = &config.channels_file {
        match ChannelRegistry::load(path) {
            Ok(registry) => {
                tracing::info!("Channel registry loaded from {}", path.display());
                return Ok(registry);
            }
            Err(e) => {
                tracing::warn!("Ignoring channel file {}: {}", path.display(), e);
            }
        }
    }
    ChannelRegistry::bundled().context("bundled channel list is invalid")
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Ready sections print their value, failed ones an error marker
pub fn section_json<T: Serialize>(state: &SectionState<T>) -> anyhow::Result<serde_json::Value> {
    Ok(match state {
        SectionState::Ready(value) => serde_json::to_value(value)?,
        SectionState::Failed => serde_json::json!({ "error": "failed to load" }),
        SectionState::Loading => serde_json::Value::Null,
    })
}
