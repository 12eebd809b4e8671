//! Story and photo persistence.
//!
//! Storage is modelled as a flat key-value store of JSON documents. The
//! [`StoryLibrary`] and [`PhotoLibrary`] sit on top of any such store;
//! [`JsonDirStore`] keeps one file per key on disk and [`MemoryStore`]
//! keeps everything in memory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::fs;
use tokio::sync::RwLock;

use crate::photo::{Photo, SAMPLE_PHOTOS};
use crate::story::{LegacyStory, StoryId};

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Flat get/set store of JSON documents keyed by name.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a document, or `None` if the key was never written.
    async fn get(&self, key: &str) -> Result<Option<Value>, PersistError>;

    /// Write a document, replacing any previous value.
    async fn set(&self, key: &str, value: Value) -> Result<(), PersistError>;

    /// Delete a document. Missing keys are not an error.
    async fn remove(&self, key: &str) -> Result<(), PersistError>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<Value>, PersistError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), PersistError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), PersistError> {
        (**self).remove(key).await
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let sanitized = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect::<String>();
        self.dir.join(format!("{sanitized}.json"))
    }
}

#[async_trait]
impl KeyValueStore for JsonDirStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, PersistError> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir).await?;
        let content = serde_json::to_string_pretty(&value)?;
        fs::write(self.path_for(key), content).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistError> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store, mostly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, PersistError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), PersistError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

// ============================================================================
// Stories
// ============================================================================

/// Key the story collection is stored under.
pub const STORIES_KEY: &str = "legacy_stories";

/// Current story collection format version.
const STORIES_VERSION: u32 = 1;

/// On-disk envelope for the story collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedStories {
    version: u32,
    saved_at: DateTime<Utc>,
    stories: Vec<LegacyStory>,
}

/// Aggregate numbers across a library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LibraryStats {
    pub story_count: usize,
    pub total_words: usize,
    pub total_duration_secs: u64,
}

/// Saved stories, most recent first.
pub struct StoryLibrary<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> StoryLibrary<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn load(&self) -> Result<Vec<LegacyStory>, PersistError> {
        let Some(value) = self.store.get(STORIES_KEY).await? else {
            return Ok(Vec::new());
        };

        let saved: SavedStories = serde_json::from_value(value)?;
        if saved.version != STORIES_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: STORIES_VERSION,
                found: saved.version,
            });
        }
        Ok(saved.stories)
    }

    async fn write(&self, stories: Vec<LegacyStory>) -> Result<(), PersistError> {
        let saved = SavedStories {
            version: STORIES_VERSION,
            saved_at: Utc::now(),
            stories,
        };
        self.store
            .set(STORIES_KEY, serde_json::to_value(&saved)?)
            .await
    }

    /// Save a story. A story with a known id replaces the stored copy in
    /// place; a new story goes to the front.
    pub async fn save_story(&self, story: &LegacyStory) -> Result<(), PersistError> {
        let mut stories = self.load().await?;
        match stories.iter_mut().find(|s| s.id == story.id) {
            Some(existing) => *existing = story.clone(),
            None => stories.insert(0, story.clone()),
        }
        self.write(stories).await?;

        tracing::info!(story = %story.id, title = %story.title, "Story saved");
        Ok(())
    }

    pub async fn list_stories(&self) -> Result<Vec<LegacyStory>, PersistError> {
        self.load().await
    }

    pub async fn get_story(&self, id: StoryId) -> Result<Option<LegacyStory>, PersistError> {
        Ok(self.load().await?.into_iter().find(|s| s.id == id))
    }

    /// Delete a story. Returns whether it existed.
    pub async fn delete_story(&self, id: StoryId) -> Result<bool, PersistError> {
        let mut stories = self.load().await?;
        let before = stories.len();
        stories.retain(|s| s.id != id);
        if stories.len() == before {
            return Ok(false);
        }
        self.write(stories).await?;
        Ok(true)
    }

    pub async fn stats(&self) -> Result<LibraryStats, PersistError> {
        let stories = self.load().await?;
        Ok(LibraryStats {
            story_count: stories.len(),
            total_words: stories.iter().map(|s| s.metadata.word_count).sum(),
            total_duration_secs: stories
                .iter()
                .map(|s| u64::from(s.metadata.duration_secs))
                .sum(),
        })
    }
}

// ============================================================================
// Photos
// ============================================================================

/// Key user photos are stored under.
pub const USER_PHOTOS_KEY: &str = "user_photos";

/// User photos (cached after first load) plus the bundled samples.
pub struct PhotoLibrary<S: KeyValueStore> {
    store: S,
    user_photos: RwLock<Option<Vec<Photo>>>,
}

impl<S: KeyValueStore> PhotoLibrary<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            user_photos: RwLock::new(None),
        }
    }

    /// Load user photos on first use. A failed load starts from an empty set.
    async fn ensure_loaded(&self) {
        if self.user_photos.read().await.is_some() {
            return;
        }

        let mut cache = self.user_photos.write().await;
        if cache.is_some() {
            return;
        }

        let loaded = match self.store.get(USER_PHOTOS_KEY).await {
            Ok(Some(value)) => serde_json::from_value(value).map_err(PersistError::from),
            Ok(None) => Ok(Vec::new()),
            Err(e) => Err(e),
        };

        *cache = Some(loaded.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load user photos, starting empty");
            Vec::new()
        }));
    }

    async fn persist(&self, photos: &[Photo]) -> Result<(), PersistError> {
        self.store
            .set(USER_PHOTOS_KEY, serde_json::to_value(photos)?)
            .await
    }

    /// User photos first, then samples not shadowed by a user photo.
    pub async fn all_photos(&self) -> Vec<Photo> {
        let mut photos = self.user_photos().await;
        let shadowed: HashSet<String> = photos.iter().map(|p| p.id.clone()).collect();
        photos.extend(
            SAMPLE_PHOTOS
                .iter()
                .filter(|p| !shadowed.contains(&p.id))
                .cloned(),
        );
        photos
    }

    /// Find a photo by id. User photos shadow samples with the same id.
    pub async fn photo_by_id(&self, id: &str) -> Option<Photo> {
        self.ensure_loaded().await;
        let cache = self.user_photos.read().await;
        cache
            .iter()
            .flatten()
            .find(|p| p.id == id)
            .cloned()
            .or_else(|| SAMPLE_PHOTOS.iter().find(|p| p.id == id).cloned())
    }

    /// Add a photo, replacing any user photo with the same id.
    pub async fn add_user_photo(&self, photo: Photo) -> Result<(), PersistError> {
        self.ensure_loaded().await;
        let mut cache = self.user_photos.write().await;
        let mut photos = cache.clone().unwrap_or_default();

        match photos.iter_mut().find(|p| p.id == photo.id) {
            Some(existing) => *existing = photo,
            None => photos.insert(0, photo),
        }

        self.persist(&photos).await?;
        *cache = Some(photos);
        Ok(())
    }

    pub async fn remove_user_photo(&self, id: &str) -> Result<(), PersistError> {
        self.ensure_loaded().await;
        let mut cache = self.user_photos.write().await;
        let mut photos = cache.clone().unwrap_or_default();
        photos.retain(|p| p.id != id);

        self.persist(&photos).await?;
        *cache = Some(photos);
        Ok(())
    }

    pub async fn user_photos(&self) -> Vec<Photo> {
        self.ensure_loaded().await;
        self.user_photos.read().await.clone().unwrap_or_default()
    }

    pub fn sample_photos(&self) -> &'static [Photo] {
        &SAMPLE_PHOTOS
    }

    pub async fn clear_user_photos(&self) -> Result<(), PersistError> {
        let mut cache = self.user_photos.write().await;
        self.persist(&[]).await?;
        *cache = Some(Vec::new());
        Ok(())
    }
}
