//! Persistence adapters for the editor store.
//!
//! Both adapters hold a single "current map" slot, the same contract the
//! editor expects from any key-value store: `load` once at startup, `save`
//! after every change, `clear` when a new map is created.

use seatmap_core::environment::Persistence;
use seatmap_core::{PersistenceError, SeatMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Default storage key, used as the file stem by [`JsonFilePersistence`]
pub const DEFAULT_STORAGE_KEY: &str = "seatmap-builder-data";

/// Volatile adapter keeping the map in memory
///
/// Clones share the same slot, so a test can keep one handle and hand the
/// other to a store.
#[derive(Clone, Debug, Default)]
pub struct InMemoryPersistence {
    slot: Arc<Mutex<Option<SeatMap>>>,
}

impl InMemoryPersistence {
    /// Creates an empty adapter
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an adapter that already holds `map`
    #[must_use]
    pub fn with_map(map: SeatMap) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(map))),
        }
    }

    /// The currently stored map
    #[must_use]
    pub fn stored(&self) -> Option<SeatMap> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Persistence for InMemoryPersistence {
    fn load(&self) -> Result<Option<SeatMap>, PersistenceError> {
        Ok(self.stored())
    }

    fn save(&self, map: &SeatMap) -> Result<(), PersistenceError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(map.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Adapter storing the map as pretty-printed JSON at `<dir>/<key>.json`
///
/// Writes go through a sibling temporary file and a rename, so a crash
/// mid-save leaves the previous map intact.
#[derive(Clone, Debug)]
pub struct JsonFilePersistence {
    dir: PathBuf,
    path: PathBuf,
}

impl JsonFilePersistence {
    /// Creates an adapter for `<dir>/<key>.json`
    ///
    /// The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>, key: &str) -> Self {
        let dir = dir.into();
        let path = dir.join(format!("{key}.json"));
        Self { dir, path }
    }

    /// Creates an adapter using [`DEFAULT_STORAGE_KEY`]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, DEFAULT_STORAGE_KEY)
    }

    /// The file the map is stored in
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persistence for JsonFilePersistence {
    fn load(&self) -> Result<Option<SeatMap>, PersistenceError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let map = serde_json::from_str(&contents)?;
        Ok(Some(map))
    }

    fn save(&self, map: &SeatMap) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_string_pretty(map)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;

        tracing::trace!(path = %self.path.display(), "Saved seat map");
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
