//! TMDB metadata integration
//!
//! Thin wrapper over the trending, list, discover, search and details
//! endpoints. Without an API key the client reports itself unconfigured and
//! the catalog views are hidden; playback by id and live channels keep
//! working.

pub mod client;
pub mod types;

pub use client::{MetadataError, TmdbClient};
pub use types::{EpisodePicker, MediaDetails, TmdbSeason};
