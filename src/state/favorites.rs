//! Favorite coins, shared by every view and persisted locally.

use crate::error::Result;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

/// Where the favorites set is persisted.
#[cfg_attr(test, mockall::automock)]
pub trait FavoritesStorage: Send + Sync {
    /// Read the stored ids. A missing store is an empty set.
    fn load(&self) -> Result<BTreeSet<String>>;

    /// Replace the stored ids.
    fn save(&self, ids: &BTreeSet<String>) -> Result<()>;
}

/// JSON array of coin ids in a single file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at the default favorites path in the data directory.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(crate::config::favorites_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FavoritesStorage for FileStorage {
    fn load(&self) -> Result<BTreeSet<String>> {
        if !self.path.exists() {
            return Ok(BTreeSet::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let ids: Vec<String> = serde_json::from_str(&content)?;
        Ok(ids.into_iter().collect())
    }

    fn save(&self, ids: &BTreeSet<String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(&ids.iter().collect::<Vec<_>>())?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Process-local storage, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    ids: Mutex<BTreeSet<String>>,
}

impl FavoritesStorage for MemoryStorage {
    fn load(&self) -> Result<BTreeSet<String>> {
        Ok(self.ids.lock().map(|ids| ids.clone()).unwrap_or_default())
    }

    fn save(&self, ids: &BTreeSet<String>) -> Result<()> {
        if let Ok(mut stored) = self.ids.lock() {
            *stored = ids.clone();
        }
        Ok(())
    }
}

struct Shared {
    ids: Mutex<BTreeSet<String>>,
    storage: Box<dyn FavoritesStorage>,
    changes: watch::Sender<BTreeSet<String>>,
}

/// Handle to the favorites set.
///
/// Clones share one set, so a toggle in one view is seen by all others.
/// Storage failures are logged and otherwise ignored; the in-memory set
/// stays authoritative for the session.
#[derive(Clone)]
pub struct FavoritesStore {
    shared: Arc<Shared>,
}

impl FavoritesStore {
    /// Load the initial set from `storage`. Unreadable data starts empty.
    pub fn new(storage: impl FavoritesStorage + 'static) -> Self {
        let ids = match storage.load() {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load favorites, starting empty");
                BTreeSet::new()
            }
        };
        tracing::debug!(count = ids.len(), "Loaded favorites");

        let (changes, _) = watch::channel(ids.clone());
        Self {
            shared: Arc::new(Shared {
                ids: Mutex::new(ids),
                storage: Box::new(storage),
                changes,
            }),
        }
    }

    /// A store that persists nothing.
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::default())
    }

    pub fn is_favorite(&self, coin_id: &str) -> bool {
        self.lock().contains(coin_id)
    }

    /// Flip membership of `coin_id`. Returns whether it is now a favorite.
    pub fn toggle(&self, coin_id: &str) -> bool {
        let (now_favorite, snapshot) = {
            let mut ids = self.lock();
            let now_favorite = if ids.remove(coin_id) {
                false
            } else {
                ids.insert(coin_id.to_string());
                true
            };
            (now_favorite, ids.clone())
        };

        if let Err(e) = self.shared.storage.save(&snapshot) {
            tracing::warn!(coin_id, error = %e, "Failed to save favorites");
        }
        self.shared.changes.send_replace(snapshot);
        now_favorite
    }

    /// Current favorites in id order.
    pub fn ids(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Receive the full set after every change.
    pub fn subscribe(&self) -> watch::Receiver<BTreeSet<String>> {
        self.shared.changes.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeSet<String>> {
        self.shared
            .ids
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("ids", &*self.lock())
            .finish()
    }
}
