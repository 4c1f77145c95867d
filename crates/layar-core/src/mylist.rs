//! My-list: the user's saved shows, persisted as one JSON document.
//!
//! Entries are full [`Show`] snapshots taken at add time; later catalog
//! changes do not propagate into the list. The store is single-writer
//! per process — two processes writing the same file race and the last
//! write wins, which is an accepted limitation.

use std::path::PathBuf;

use crate::error::LayarError;
use crate::models::Show;

/// Durable storage for the serialized list. Injected so tests can run
/// against an in-memory double instead of the real file.
pub trait Persistence: Send {
    /// Previously saved payload, or `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<String>, LayarError>;

    fn save(&self, payload: &str) -> Result<(), LayarError>;
}

/// Single-file JSON persistence under the project data directory.
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Persistence for JsonFilePersistence {
    fn load(&self) -> Result<Option<String>, LayarError> {
        match std::fs::read_to_string(&self.path) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, payload: &str) -> Result<(), LayarError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, payload)?;
        Ok(())
    }
}

/// The saved-shows list. Mutations persist synchronously, so a read
/// after a successful `add`/`remove` always observes the write.
pub struct MyList {
    shows: Vec<Show>,
    persistence: Box<dyn Persistence>,
}

impl MyList {
    /// Rehydrate the list from storage. A corrupt or unreadable payload
    /// resets to an empty list instead of failing startup.
    pub fn load(persistence: Box<dyn Persistence>) -> Self {
        let shows = match persistence.load() {
            Ok(Some(payload)) => match serde_json::from_str(&payload) {
                Ok(shows) => shows,
                Err(err) => {
                    tracing::warn!(%err, "persisted my-list is corrupt, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(%err, "could not read persisted my-list, starting empty");
                Vec::new()
            }
        };
        Self { shows, persistence }
    }

    /// Append a snapshot of `show` unless its id is already present.
    /// Returns whether the list changed. A failed save rolls the
    /// in-memory list back, so memory never diverges from disk.
    pub fn add(&mut self, show: Show) -> Result<bool, LayarError> {
        if self.contains(&show.id) {
            return Ok(false);
        }
        self.shows.push(show);
        if let Err(err) = self.persist() {
            self.shows.pop();
            return Err(err);
        }
        Ok(true)
    }

    /// Remove the entry with `id`. No-op when absent. A failed save
    /// restores the entry at its original position.
    pub fn remove(&mut self, id: &str) -> Result<bool, LayarError> {
        let Some(pos) = self.shows.iter().position(|s| s.id == id) else {
            return Ok(false);
        };
        let removed = self.shows.remove(pos);
        if let Err(err) = self.persist() {
            self.shows.insert(pos, removed);
            return Err(err);
        }
        Ok(true)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.shows.iter().any(|s| s.id == id)
    }

    /// Saved shows in insertion order.
    pub fn shows(&self) -> &[Show] {
        &self.shows
    }

    pub fn len(&self) -> usize {
        self.shows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shows.is_empty()
    }

    fn persist(&self) -> Result<(), LayarError> {
        let payload = serde_json::to_string(&self.shows)
            .map_err(|e| LayarError::Persistence(e.to_string()))?;
        self.persistence.save(&payload)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::models::{ImageSet, ShowType};

    #[derive(Clone, Default)]
    struct MemoryPersistence {
        cell: Arc<Mutex<Option<String>>>,
    }

    impl MemoryPersistence {
        fn with_payload(payload: &str) -> Self {
            Self {
                cell: Arc::new(Mutex::new(Some(payload.to_string()))),
            }
        }
    }

    impl Persistence for MemoryPersistence {
        fn load(&self) -> Result<Option<String>, LayarError> {
            Ok(self.cell.lock().unwrap().clone())
        }

        fn save(&self, payload: &str) -> Result<(), LayarError> {
            *self.cell.lock().unwrap() = Some(payload.to_string());
            Ok(())
        }
    }

    /// Loads a fixed payload, refuses every save.
    #[derive(Default)]
    struct ReadOnlyPersistence {
        payload: Option<String>,
    }

    impl Persistence for ReadOnlyPersistence {
        fn load(&self) -> Result<Option<String>, LayarError> {
            Ok(self.payload.clone())
        }

        fn save(&self, _payload: &str) -> Result<(), LayarError> {
            Err(LayarError::Persistence("disk full".into()))
        }
    }

    fn show(id: &str, title: &str) -> Show {
        Show {
            id: id.into(),
            title: title.into(),
            original_title: title.into(),
            overview: String::new(),
            release_year: Some(2022),
            first_air_year: None,
            last_air_year: None,
            genres: Vec::new(),
            directors: Vec::new(),
            cast: Vec::new(),
            rating: None,
            image_set: ImageSet::default(),
            show_type: ShowType::Movie,
            season_count: None,
            episode_count: None,
            streaming_options: Default::default(),
        }
    }

    #[test]
    fn test_add_then_contains() {
        let mut list = MyList::load(Box::new(MemoryPersistence::default()));
        assert!(list.add(show("tt1877830", "The Batman")).unwrap());
        assert!(list.contains("tt1877830"));
    }

    #[test]
    fn test_remove_then_not_contains() {
        let mut list = MyList::load(Box::new(MemoryPersistence::default()));
        list.add(show("tt1877830", "The Batman")).unwrap();
        assert!(list.remove("tt1877830").unwrap());
        assert!(!list.contains("tt1877830"));
    }

    #[test]
    fn test_add_is_idempotent_by_id() {
        let mut list = MyList::load(Box::new(MemoryPersistence::default()));
        assert!(list.add(show("tt1877830", "The Batman")).unwrap());
        assert!(!list.add(show("tt1877830", "The Batman (again)")).unwrap());
        assert_eq!(list.len(), 1);
        assert_eq!(list.shows()[0].title, "The Batman");
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut list = MyList::load(Box::new(MemoryPersistence::default()));
        assert!(!list.remove("tt0000000").unwrap());
        assert!(list.is_empty());
    }

    #[test]
    fn test_persistence_roundtrip_keeps_id_order() {
        let persistence = MemoryPersistence::default();
        let mut list = MyList::load(Box::new(persistence.clone()));
        list.add(show("tt1375666", "Inception")).unwrap();
        list.add(show("tt0816692", "Interstellar")).unwrap();

        let reloaded = MyList::load(Box::new(persistence));
        let ids: Vec<&str> = reloaded.shows().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["tt1375666", "tt0816692"]);
    }

    #[test]
    fn test_failed_save_rolls_back_add() {
        let mut list = MyList::load(Box::new(ReadOnlyPersistence::default()));
        assert!(list.add(show("tt1877830", "The Batman")).is_err());
        assert!(!list.contains("tt1877830"));
        assert!(list.is_empty());
    }

    #[test]
    fn test_failed_save_restores_removed_entry_in_place() {
        let payload = serde_json::to_string(&vec![
            show("tt1375666", "Inception"),
            show("tt0816692", "Interstellar"),
        ])
        .unwrap();
        let mut list = MyList::load(Box::new(ReadOnlyPersistence {
            payload: Some(payload),
        }));

        assert!(list.remove("tt1375666").is_err());
        let ids: Vec<&str> = list.shows().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["tt1375666", "tt0816692"]);
    }

    #[test]
    fn test_corrupt_payload_resets_to_empty() {
        let list = MyList::load(Box::new(MemoryPersistence::with_payload("{not json")));
        assert!(list.is_empty());
    }

    #[test]
    fn test_file_persistence_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mylist.json");

        let mut list = MyList::load(Box::new(JsonFilePersistence::new(path.clone())));
        list.add(show("tt6751520", "Parasite")).unwrap();

        let reloaded = MyList::load(Box::new(JsonFilePersistence::new(path)));
        assert!(reloaded.contains("tt6751520"));
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never-written.json");
        let list = MyList::load(Box::new(JsonFilePersistence::new(path)));
        assert!(list.is_empty());
    }
}
