use clap::{Parser, Subcommand, ValueEnum};

use khattarhub::models::{ChannelSource, MediaKind};
use khattarhub::services::channels::LetterFilter;
use khattarhub::services::feeds::{MatchFeed, SportFilter};

#[derive(Parser)]
#[command(name = "khattarhub")]
#[command(author, version, about = "Browse movies, series, live TV and sports through third-party players")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Provider {
    Vidking,
    Vidsrc,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CatalogList {
    Popular,
    TopRated,
    NowPlaying,
    AiringToday,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Trending titles of the day (movies and series when no kind is given)
    Trending {
        #[arg(short, long)]
        kind: Option<MediaKind>,
    },

    /// Search movies and series by title
    Search {
        query: String,

        /// Restrict to one catalog
        #[arg(short, long)]
        kind: Option<MediaKind>,
    },

    /// Curated catalog lists
    List {
        #[arg(value_enum)]
        list: CatalogList,

        #[arg(short, long, default_value = "movie")]
        kind: MediaKind,

        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Titles of one genre
    Discover {
        kind: MediaKind,

        /// TMDB genre id
        genre: u32,

        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Title details with the season and episode listing
    Details {
        kind: MediaKind,
        id: u64,

        /// Season whose episodes are listed
        #[arg(short, long, default_value = "1")]
        season: u32,
    },

    /// Print the player URL for a movie or episode
    Watch {
        kind: MediaKind,
        id: u64,

        #[arg(short, long)]
        season: Option<i64>,

        #[arg(short, long)]
        episode: Option<i64>,

        #[arg(long, value_enum, default_value = "vidking")]
        provider: Provider,

        /// Ignore the saved position
        #[arg(long)]
        no_resume: bool,

        /// Default subtitle language (vidsrc only)
        #[arg(long)]
        subtitle_lang: Option<String>,
    },

    /// Open a link carrying an id and/or a search query
    Open {
        kind: MediaKind,

        #[arg(long)]
        id: Option<String>,

        #[arg(long)]
        query: Option<String>,

        #[arg(short, long)]
        season: Option<i64>,

        #[arg(short, long)]
        episode: Option<i64>,
    },

    /// Continue-watching list
    Progress {
        #[command(subcommand)]
        command: ProgressCommand,
    },

    /// Browse the live TV channel list
    Channels {
        /// Name filter (the unlock passphrase is accepted here too)
        #[arg(default_value = "")]
        query: String,

        /// `all`, a letter, or `#`
        #[arg(short, long, default_value = "all")]
        letter: LetterFilter,

        /// Taps on the `#` letter
        #[arg(long, default_value = "0")]
        taps: u8,
    },

    /// Print the player URL for a live TV channel
    LiveWatch {
        id: String,

        #[arg(short, long, default_value = "1")]
        player: i64,

        #[arg(long, default_value = "tv")]
        source: ChannelSource,
    },

    /// CDN-Live channel list
    CdnChannels {
        #[arg(default_value = "")]
        query: String,
    },

    /// CDN-Live scheduled sport events
    CdnEvents {
        #[arg(default_value = "all")]
        sport: SportFilter,
    },

    /// Sports available on Streamed
    Sports,

    /// Streamed matches, grouped by sport
    Matches {
        /// `live`, `all-today`, `all`, or a sport id
        #[arg(default_value = "live")]
        feed: MatchFeed,

        #[arg(long)]
        popular: bool,
    },

    /// Streams behind one source reference
    Streams { source: String, id: String },

    /// Resolve every source of a match into streams
    MatchStreams {
        match_id: String,

        #[arg(long, default_value = "all-today")]
        feed: MatchFeed,
    },

    /// Streamed matches and CDN-Live events side by side
    SportsHome {
        #[arg(long, default_value = "live")]
        feed: MatchFeed,

        #[arg(long, default_value = "all")]
        sport: SportFilter,
    },

    /// Search IPTV-org streams
    Iptv {
        #[arg(default_value = "")]
        query: String,
    },
}

#[derive(Subcommand)]
pub enum ProgressCommand {
    /// Saved positions, newest first
    List,

    Get {
        kind: MediaKind,
        id: u64,
        #[arg(short, long)]
        season: Option<u32>,
        #[arg(short, long)]
        episode: Option<u32>,
    },

    Save {
        kind: MediaKind,
        id: u64,

        /// Position in seconds
        position: f64,

        #[arg(short, long)]
        season: Option<u32>,
        #[arg(short, long)]
        episode: Option<u32>,
        #[arg(short, long)]
        title: Option<String>,
    },

    Remove {
        kind: MediaKind,
        id: u64,
        #[arg(short, long)]
        season: Option<u32>,
        #[arg(short, long)]
        episode: Option<u32>,
    },
}
