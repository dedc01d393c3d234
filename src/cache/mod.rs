//! Local caches persisted between runs
//!
//! Three independent JSON documents on disk: two resolved-title caches with
//! a whole-file freshness window keyed on the file's modification time, and
//! the last-sent-message record, which has no freshness window. Loads and
//! saves fail soft: a cache that cannot be read is an empty cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Title caches older than this are discarded and rebuilt
pub const TITLE_CACHE_MAX_AGE_DAYS: i64 = 3;

/// On-disk file names under the cache directory
pub const PAGE_TITLES_FILE: &str = "page_titles.json";
pub const SUBJECT_TITLES_FILE: &str = "subject_titles.json";
pub const LAST_MESSAGE_FILE: &str = "last_message.json";

/// Age of a file in whole days, based on its modification time
pub fn file_age_days(path: &Path) -> Option<i64> {
    file_age_days_at(path, Utc::now())
}

fn file_age_days_at(path: &Path, now: DateTime<Utc>) -> Option<i64> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    let modified: DateTime<Utc> = modified.into();
    Some((now - modified).num_days())
}

/// Load a JSON document from disk, failing soft.
///
/// Returns the default value (empty mapping / `None`) when the file is
/// missing, unreadable, unparseable, or older than `max_age_days`.
/// Staleness is whole-file: entries are never expired individually.
pub fn load_json<T>(path: &Path, name: &str, max_age_days: Option<i64>) -> T
where
    T: DeserializeOwned + Default,
{
    load_json_at(path, name, max_age_days, Utc::now())
}

fn load_json_at<T>(path: &Path, name: &str, max_age_days: Option<i64>, now: DateTime<Utc>) -> T
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        return T::default();
    }

    if let (Some(max_age), Some(age)) = (max_age_days, file_age_days_at(path, now)) {
        if age > max_age {
            log::info!("Cache {name} is older than {max_age} days, rebuilding");
            return T::default();
        }
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            log::error!("Failed to read cache {name} from {}: {err}", path.display());
            return T::default();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(value) => value,
        Err(err) => {
            log::error!("Failed to parse cache {name} from {}: {err}", path.display());
            T::default()
        }
    }
}

/// Write a JSON document to disk, overwriting prior contents.
///
/// Failure is logged but never fatal to the run.
pub fn save_json<T: Serialize>(value: &T, path: &Path, name: &str) {
    if let Some(parent) = path.parent() {
        if let Err(err) = std::fs::create_dir_all(parent) {
            log::error!("Failed to create cache dir {}: {err}", parent.display());
            return;
        }
    }

    let contents = match serde_json::to_string(value) {
        Ok(contents) => contents,
        Err(err) => {
            log::error!("Failed to serialize cache {name}: {err}");
            return;
        }
    };

    if let Err(err) = std::fs::write(path, contents) {
        log::error!("Failed to save cache {name} to {}: {err}", path.display());
    }
}

/// Keyed cache of resolved display titles, shared by the projection tasks
/// within a batch.
///
/// The map is behind a mutex so concurrent lookups and inserts serialize;
/// two tasks may still fetch a freshly-seen ID twice before either inserts.
pub struct TitleCache {
    name: &'static str,
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl TitleCache {
    /// Load a title cache from the cache directory, honoring the freshness
    /// window.
    pub fn load(dir: &Path, file_name: &str, name: &'static str) -> Self {
        let path = dir.join(file_name);
        let entries: HashMap<String, String> =
            load_json(&path, name, Some(TITLE_CACHE_MAX_AGE_DAYS));
        log::info!("Cache {name} loaded with {} items", entries.len());

        Self {
            name,
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Look up a cached title
    pub async fn get(&self, id: &str) -> Option<String> {
        let entries = self.entries.lock().await;
        let title = entries.get(id).cloned();
        if title.is_some() {
            log::debug!("Cache hit in {} for {id}", self.name);
        }
        title
    }

    /// Record a resolved title
    pub async fn insert(&self, id: &str, title: &str) {
        let mut entries = self.entries.lock().await;
        entries.insert(id.to_string(), title.to_string());
    }

    /// Write the cache back to disk
    pub async fn save(&self) {
        let entries = self.entries.lock().await;
        save_json(&*entries, &self.path, self.name);
        log::info!("Cache {} saved with {} items", self.name, entries.len());
    }
}

/// The identifier and calendar date of the last digest sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMessage {
    pub message_id: i64,
    pub date: String,
}

/// Persistence for the last-sent-message record.
///
/// Unlike the title caches this record has no freshness window: it is
/// trusted until explicitly overwritten.
pub struct LastMessageStore {
    path: PathBuf,
}

impl LastMessageStore {
    pub fn open(dir: &Path) -> Self {
        Self {
            path: dir.join(LAST_MESSAGE_FILE),
        }
    }

    pub fn load(&self) -> Option<LastMessage> {
        load_json(&self.path, "last_message", None)
    }

    pub fn save(&self, record: &LastMessage) {
        save_json(record, &self.path, "last_message");
    }
}
