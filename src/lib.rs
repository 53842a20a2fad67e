//! KhattarHub core
//!
//! Catalog lookups against TMDB, embed-player URL builders, live channel and
//! sports feed clients, the bundled live-TV channel registry and the local
//! "continue watching" store. Nothing here serves or transcodes media: the
//! crate only builds player URLs and reshapes third-party JSON.

pub mod config;
pub mod models;
pub mod services;

pub use config::Config;
