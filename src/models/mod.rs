pub mod channel;
pub mod media;
pub mod progress;

pub use channel::{Channel, ChannelSource};
pub use media::{MediaItem, MediaKind, WatchIntent, WatchTarget};
pub use progress::{ProgressEntry, ProgressUpdate, SavedPosition};
