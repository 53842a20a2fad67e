//! Live-TV channel registry
//!
//! A fixed list of channel ids and names, compiled in from
//! `data/daddylives_channels.json` or read from an external file at startup.
//! Channels with ids 501..=520 form the restricted section and never appear
//! in the default list. The registry is read-only after construction and
//! knows nothing about whether the restricted section is currently revealed;
//! that is the caller's `UnlockGate`.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::models::{Channel, ChannelSource};
use crate::services::embed::{build_daddylives_url, DaddylivesRequest};
use crate::services::feeds::grouping::normalize_query;

const BUNDLED_CHANNELS: &str = include_str!("../../data/daddylives_channels.json");

/// Restricted channel ids
const RESTRICTED_FIRST: u32 = 501;
const RESTRICTED_LAST: u32 = 520;

/// Taps on the `#` letter needed to reveal the restricted section
pub const UNLOCK_TAPS: u8 = 7;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read channel file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid channel data: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ChannelFile {
    channels: Vec<RawChannel>,
}

#[derive(Debug, Deserialize)]
struct RawChannel {
    id: String,
    name: String,
}

fn is_restricted_id(id: &str) -> bool {
    (RESTRICTED_FIRST..=RESTRICTED_LAST).any(|n| n.to_string() == id)
}

/// Grouping letter: `A`..=`Z`, or `#` for digits, symbols, non-ASCII and empty names
pub fn letter_of(channel: &Channel) -> char {
    match channel.name.trim().chars().next() {
        Some(c) if c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
        _ => '#',
    }
}

/// Letter filter for the channel list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LetterFilter {
    #[default]
    All,
    Letter(char),
}

impl std::str::FromStr for LetterFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(LetterFilter::All);
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some('#'), None) => Ok(LetterFilter::Letter('#')),
            (Some(c), None) if c.is_ascii_alphabetic() => Ok(LetterFilter::Letter(c.to_ascii_uppercase())),
            _ => Err(format!("invalid letter filter: {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChannelRegistry {
    visible: Vec<Channel>,
    restricted: Vec<Channel>,
}

impl ChannelRegistry {
    /// Registry from the compiled-in dataset
    pub fn bundled() -> Result<Self, RegistryError> {
        Self::from_json(BUNDLED_CHANNELS)
    }

    /// Registry from an external JSON file with the same layout as the bundled one
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, RegistryError> {
        let file: ChannelFile = serde_json::from_str(content)?;
        Ok(Self::from_channels(file.channels.into_iter().map(|c| Channel {
            id: c.id,
            name: c.name,
            source: ChannelSource::Tv,
        })))
    }

    pub fn from_channels(channels: impl IntoIterator<Item = Channel>) -> Self {
        let (restricted, visible): (Vec<Channel>, Vec<Channel>) =
            channels.into_iter().partition(|c| is_restricted_id(&c.id));
        tracing::debug!(
            visible = visible.len(),
            restricted = restricted.len(),
            "channel registry loaded"
        );
        Self { visible, restricted }
    }

    pub fn visible(&self) -> &[Channel] {
        &self.visible
    }

    pub fn restricted(&self) -> &[Channel] {
        &self.restricted
    }

    /// Look up a channel in either section
    pub fn find(&self, id: &str) -> Option<&Channel> {
        self.visible
            .iter()
            .chain(self.restricted.iter())
            .find(|c| c.id == id)
    }

    /// Heading for a player page: the channel name, else a generic label
    pub fn watch_title(&self, id: &str, source: ChannelSource) -> String {
        match self.find(id) {
            Some(channel) => channel.name.clone(),
            None if source == ChannelSource::Tv2 => "Sports / PPV".to_string(),
            None => "Live TV".to_string(),
        }
    }

    /// Visible channels matching a name query and a letter.
    /// The passphrase itself is never applied as a name filter.
    pub fn filter(&self, query: &str, letter: LetterFilter, gate: &UnlockGate) -> Vec<&Channel> {
        let q = normalize_query(query).filter(|_| !gate.matches_passphrase(query));
        self.visible
            .iter()
            .filter(|c| match &q {
                Some(q) => c.name.to_lowercase().contains(q.as_str()),
                None => true,
            })
            .filter(|c| match letter {
                LetterFilter::All => true,
                LetterFilter::Letter(l) => letter_of(c) == l,
            })
            .collect()
    }

    /// Build the channel page for a query, letter and unlock state
    pub fn browse(&self, query: &str, letter: LetterFilter, gate: &UnlockGate) -> ChannelListing<'_> {
        let channels = self.filter(query, letter, gate);
        let letter_counts = letter_counts(channels.iter().copied());
        let restricted = if gate.is_unlocked(query) {
            Some(self.restricted.iter().collect())
        } else {
            None
        };
        ChannelListing {
            channels,
            letter_counts,
            restricted,
        }
    }
}

/// Number of channels per grouping letter
pub fn letter_counts<'a>(channels: impl IntoIterator<Item = &'a Channel>) -> BTreeMap<char, usize> {
    let mut counts = BTreeMap::new();
    for channel in channels {
        *counts.entry(letter_of(channel)).or_insert(0) += 1;
    }
    counts
}

/// Result of `ChannelRegistry::browse`
#[derive(Debug)]
pub struct ChannelListing<'a> {
    pub channels: Vec<&'a Channel>,
    pub letter_counts: BTreeMap<char, usize>,
    /// Present only while the restricted section is revealed
    pub restricted: Option<Vec<&'a Channel>>,
}

/// Player URL for a registry channel
pub fn channel_player_url(channel: &Channel, player: i64) -> String {
    build_daddylives_url(&DaddylivesRequest {
        channel_id: channel.id.clone(),
        player,
        source: channel.source,
    })
}

/// Ephemeral reveal state for the restricted section.
///
/// Revealed either by typing the configured passphrase (case-insensitive) in
/// the search box, or by tapping the `#` letter seven times. Never persisted:
/// a new gate starts locked.
#[derive(Debug, Clone, Default)]
pub struct UnlockGate {
    passphrase: Option<String>,
    taps: u8,
}

impl UnlockGate {
    /// An empty passphrase disables the passphrase path
    pub fn new(passphrase: Option<&str>) -> Self {
        Self {
            passphrase: passphrase
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty()),
            taps: 0,
        }
    }

    pub fn matches_passphrase(&self, query: &str) -> bool {
        match &self.passphrase {
            Some(p) => query.trim().to_lowercase() == *p,
            None => false,
        }
    }

    /// Register one tap; returns true once the section is revealed
    pub fn tap(&mut self) -> bool {
        self.taps = self.taps.saturating_add(1);
        self.tapped_open()
    }

    fn tapped_open(&self) -> bool {
        self.taps >= UNLOCK_TAPS
    }

    pub fn is_unlocked(&self, query: &str) -> bool {
        self.tapped_open() || self.matches_passphrase(query)
    }

    pub fn lock(&mut self) {
        self.taps = 0;
    }
}
