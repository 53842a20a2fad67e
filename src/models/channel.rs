use serde::{Deserialize, Serialize};

/// Which embed path a live channel plays through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelSource {
    /// Regular channels (`source=tv`)
    #[default]
    Tv,
    /// Sports and PPV events (`source=tv2`)
    Tv2,
}

impl ChannelSource {
    pub fn as_param(&self) -> &'static str {
        match self {
            ChannelSource::Tv => "tv",
            ChannelSource::Tv2 => "tv2",
        }
    }
}

impl std::str::FromStr for ChannelSource {
    type Err = String;

    /// Anything other than `tv2` is the primary source
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s.trim().eq_ignore_ascii_case("tv2") {
            ChannelSource::Tv2
        } else {
            ChannelSource::Tv
        })
    }
}

/// A live-TV channel from the bundled registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub source: ChannelSource,
}
