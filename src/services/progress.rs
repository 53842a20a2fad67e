//! "Continue watching" progress store
//!
//! Keeps the last playback position per movie or series episode as a single
//! JSON array under one storage key, newest first, at most `MAX_ENTRIES`
//! long. Saving an existing key moves it to the front, so the list behaves
//! as an LRU keyed by last write.
//!
//! Storage failures never reach the caller: unreadable or corrupt data reads
//! as an empty list, a single malformed entry is skipped, and failed writes
//! are dropped.

use tracing::warn;

use crate::models::{MediaKind, ProgressEntry, ProgressUpdate, SavedPosition};
use crate::services::storage::Storage;

pub const STORAGE_KEY: &str = "khattarhub_progress";
pub const MAX_ENTRIES: usize = 50;

/// Deterministic key for a title. Series keys include season and episode,
/// both defaulting to 1.
pub fn progress_key(kind: MediaKind, tmdb_id: u64, season: Option<u32>, episode: Option<u32>) -> String {
    match kind {
        MediaKind::Series => format!(
            "tv_{}_{}_{}",
            tmdb_id,
            season.unwrap_or(1),
            episode.unwrap_or(1)
        ),
        MediaKind::Movie => format!("movie_{}", tmdb_id),
    }
}

fn whole_seconds(position: f64) -> u64 {
    if position.is_finite() && position > 0.0 {
        position.floor() as u64
    } else {
        0
    }
}

pub struct ProgressStore<S> {
    storage: S,
}

impl<S: Storage> ProgressStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn load_all(&self) -> Vec<ProgressEntry> {
        let raw = match self.storage.get_item(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("progress read failed: {}", e);
                return Vec::new();
            }
        };
        let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(e) => {
                warn!("stored progress is unreadable, treating as empty: {}", e);
                return Vec::new();
            }
        };
        // One malformed entry must not cost the rest of the list
        values
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<ProgressEntry>(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("skipping unreadable progress entry: {}", e);
                    None
                }
            })
            .collect()
    }

    fn save_all(&mut self, mut list: Vec<ProgressEntry>) {
        list.truncate(MAX_ENTRIES);
        let content = match serde_json::to_string(&list) {
            Ok(content) => content,
            Err(e) => {
                warn!("progress encode failed: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set_item(STORAGE_KEY, &content) {
            warn!("progress write skipped: {}", e);
        }
    }

    /// Record a position, moving the title to the front of the list
    pub fn save(&mut self, kind: MediaKind, tmdb_id: u64, update: ProgressUpdate) {
        let key = progress_key(kind, tmdb_id, update.season, update.episode);
        let mut list = self.load_all();
        list.retain(|entry| entry.key != key);

        let (season, episode) = if kind.is_series() {
            (Some(update.season.unwrap_or(1)), Some(update.episode.unwrap_or(1)))
        } else {
            (None, None)
        };
        list.insert(
            0,
            ProgressEntry {
                key,
                kind,
                tmdb_id,
                season,
                episode,
                position_seconds: whole_seconds(update.position_seconds),
                title: update.title.unwrap_or_default(),
                updated_at_millis: chrono::Utc::now().timestamp_millis(),
            },
        );
        self.save_all(list);
    }

    /// Entries newest first
    pub fn list(&self) -> Vec<ProgressEntry> {
        self.load_all()
    }

    pub fn get(&self, kind: MediaKind, tmdb_id: u64, season: Option<u32>, episode: Option<u32>) -> Option<SavedPosition> {
        let key = progress_key(kind, tmdb_id, season, episode);
        self.load_all()
            .iter()
            .find(|entry| entry.key == key)
            .map(SavedPosition::from)
    }

    pub fn remove(&mut self, kind: MediaKind, tmdb_id: u64, season: Option<u32>, episode: Option<u32>) {
        let key = progress_key(kind, tmdb_id, season, episode);
        let mut list = self.load_all();
        let before = list.len();
        list.retain(|entry| entry.key != key);
        if list.len() != before {
            self.save_all(list);
        }
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::{FileStorage, MemoryStorage, StorageError};

    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    fn movie_at(position: f64) -> ProgressUpdate {
        ProgressUpdate {
            position_seconds: position,
            ..Default::default()
        }
    }

    fn episode_at(season: u32, episode: u32, position: f64) -> ProgressUpdate {
        ProgressUpdate {
            position_seconds: position,
            season: Some(season),
            episode: Some(episode),
            title: Some("Show".to_string()),
        }
    }

    #[test]
    fn test_keys_are_deterministic() {
        assert_eq!(progress_key(MediaKind::Movie, 7, Some(3), Some(4)), "movie_7");
        assert_eq!(progress_key(MediaKind::Series, 1, None, None), "tv_1_1_1");
        assert_eq!(
            progress_key(MediaKind::Series, 5, Some(2), Some(9)),
            progress_key(MediaKind::Series, 5, Some(2), Some(9))
        );
        assert_ne!(
            progress_key(MediaKind::Series, 1, Some(1), Some(2)),
            progress_key(MediaKind::Series, 1, Some(2), Some(1))
        );
    }

    #[test]
    fn test_save_then_get() {
        let mut store = ProgressStore::new(MemoryStorage::new());
        store.save(MediaKind::Series, 1399, episode_at(2, 5, 754.9));

        let saved = store.get(MediaKind::Series, 1399, Some(2), Some(5)).unwrap();
        assert_eq!(saved.position_seconds, 754);
        assert_eq!(saved.season, Some(2));
        assert_eq!(saved.episode, Some(5));
        assert!(store.get(MediaKind::Series, 1399, Some(2), Some(6)).is_none());
    }

    #[test]
    fn test_movie_entries_have_no_episode() {
        let mut store = ProgressStore::new(MemoryStorage::new());
        store.save(
            MediaKind::Movie,
            603,
            ProgressUpdate {
                position_seconds: -4.0,
                season: Some(3),
                episode: Some(3),
                title: None,
            },
        );
        let saved = store.get(MediaKind::Movie, 603, None, None).unwrap();
        assert_eq!(
            saved,
            SavedPosition {
                position_seconds: 0,
                season: None,
                episode: None
            }
        );
    }

    #[test]
    fn test_resave_moves_to_front_without_duplicates() {
        let mut store = ProgressStore::new(MemoryStorage::new());
        store.save(MediaKind::Movie, 1, movie_at(10.0));
        store.save(MediaKind::Movie, 2, movie_at(20.0));
        store.save(MediaKind::Movie, 1, movie_at(30.0));

        let list = store.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].key, "movie_1");
        assert_eq!(list[0].position_seconds, 30);
        assert_eq!(list[1].key, "movie_2");
    }

    #[test]
    fn test_eviction_drops_first_saved() {
        let mut store = ProgressStore::new(MemoryStorage::new());
        for id in 1..=51u64 {
            store.save(MediaKind::Movie, id, movie_at(id as f64));
        }
        let list = store.list();
        assert_eq!(list.len(), MAX_ENTRIES);
        assert_eq!(list[0].key, "movie_51");
        assert!(store.get(MediaKind::Movie, 1, None, None).is_none());
        assert!(store.get(MediaKind::Movie, 2, None, None).is_some());
    }

    #[test]
    fn test_remove() {
        let mut store = ProgressStore::new(MemoryStorage::new());
        store.save(MediaKind::Series, 9, episode_at(1, 1, 5.0));
        store.remove(MediaKind::Series, 9, None, None);
        assert!(store.get(MediaKind::Series, 9, Some(1), Some(1)).is_none());

        // no-op when absent
        store.remove(MediaKind::Movie, 404, None, None);
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_corrupt_value_reads_as_empty() {
        let mut storage = MemoryStorage::new();
        storage.set_item(STORAGE_KEY, "{not json").unwrap();
        let mut store = ProgressStore::new(storage);
        assert!(store.list().is_empty());

        store.save(MediaKind::Movie, 3, movie_at(1.0));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_bad_entry_does_not_drop_the_others() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(
                STORAGE_KEY,
                r#"[{"key":"movie_1","type":"movie","tmdbId":1,"position":10,"updatedAt":1700000000000},{"key":"movie_2","type":"movie","tmdbId":2,"position":null,"updatedAt":1700000000000}]"#,
            )
            .unwrap();
        let mut store = ProgressStore::new(storage);
        assert_eq!(store.list().len(), 1);

        store.save(MediaKind::Movie, 3, movie_at(5.0));
        let keys: Vec<_> = store.list().into_iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["movie_3", "movie_1"]);
        assert_eq!(
            store.get(MediaKind::Movie, 1, None, None).map(|p| p.position_seconds),
            Some(10)
        );
    }

    #[test]
    fn test_broken_storage_is_swallowed() {
        let mut store = ProgressStore::new(BrokenStorage);
        store.save(MediaKind::Movie, 1, movie_at(1.0));
        store.remove(MediaKind::Movie, 1, None, None);
        assert!(store.list().is_empty());
        assert!(store.get(MediaKind::Movie, 1, None, None).is_none());
    }

    #[test]
    fn test_reads_browser_format() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(
                STORAGE_KEY,
                r#"[{"key":"tv_1399_1_2","type":"tv","tmdbId":1399,"season":1,"episode":2,"position":321,"title":"GoT","updatedAt":1700000000000}]"#,
            )
            .unwrap();
        let store = ProgressStore::new(storage);
        let list = store.list();
        assert_eq!(list[0].kind, MediaKind::Series);
        assert_eq!(list[0].position_seconds, 321);
        assert_eq!(
            store.get(MediaKind::Series, 1399, Some(1), Some(2)).map(|p| p.position_seconds),
            Some(321)
        );
    }

    #[test]
    fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = ProgressStore::new(FileStorage::new(dir.path()));
            store.save(MediaKind::Movie, 11, movie_at(42.0));
        }
        let store = ProgressStore::new(FileStorage::new(dir.path()));
        assert_eq!(store.get(MediaKind::Movie, 11, None, None).map(|p| p.position_seconds), Some(42));
    }
}
