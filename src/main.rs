mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use crate::commands::{catalog, live, progress, sports, watch, AppState};
use khattarhub::config::Config;
use khattarhub::models::WatchTarget;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing/logging. Stdout carries command output, logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "khattarhub=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env();
    tracing::debug!("KhattarHub v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::new(config)?;

    match cli.command {
        Commands::Trending { kind } => catalog::trending(&state, kind).await,
        Commands::Search { query, kind } => catalog::search(&state, &query, kind).await,
        Commands::List { list, kind, page } => catalog::list(&state, list, kind, page).await,
        Commands::Discover { kind, genre, page } => catalog::discover(&state, kind, genre, page).await,
        Commands::Details { kind, id, season } => catalog::details(&state, kind, id, season).await,
        Commands::Watch {
            kind,
            id,
            season,
            episode,
            provider,
            no_resume,
            subtitle_lang,
        } => watch::watch(
            &state,
            WatchTarget::from_parts(kind, id, season, episode),
            watch::WatchOptions {
                provider,
                resume: !no_resume,
                subtitle_lang,
            },
        ),
        Commands::Open {
            kind,
            id,
            query,
            season,
            episode,
        } => watch::open(&state, kind, id.as_deref(), query.as_deref(), season, episode).await,
        Commands::Progress { command } => progress::run(&state, command),
        Commands::Channels { query, letter, taps } => live::channels(&state, &query, letter, taps),
        Commands::LiveWatch { id, player, source } => live::live_watch(&state, &id, player, source),
        Commands::CdnChannels { query } => live::cdn_channels(&state, &query).await,
        Commands::CdnEvents { sport } => sports::cdn_events(&state, sport).await,
        Commands::Sports => sports::sports(&state).await,
        Commands::Matches { feed, popular } => sports::matches(&state, &feed, popular).await,
        Commands::Streams { source, id } => sports::streams(&state, &source, &id).await,
        Commands::MatchStreams { match_id, feed } => sports::match_streams(&state, &match_id, &feed).await,
        Commands::SportsHome { feed, sport } => sports::sports_home(&state, &feed, sport).await,
        Commands::Iptv { query } => live::iptv(&state, &query).await,
    }
}
