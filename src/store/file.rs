//! Play store backed by a directory of JSON documents.
//!
//! Layout: `<root>/users/<uid>/playbooks/<pid>/plays/<play id>.json`.

use super::{
    sort_newest_first, PlayStore, PlaybookScope, SavedPlay, StoredDocument, Subscribers,
};
use crate::error::StoreError;
use crate::types::Play;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

/// Stores each saved play as its own JSON file.
pub struct FilePlayStore {
    root: PathBuf,
    subscribers: Subscribers,
}

impl FilePlayStore {
    /// Creates a store rooted at `root`. The directory is created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            subscribers: Subscribers::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, scope: &PlaybookScope) -> Result<PathBuf, StoreError> {
        for component in [&scope.user_id, &scope.playbook_id] {
            if !is_safe_component(component) {
                return Err(StoreError::Read(format!(
                    "invalid path component {component:?}"
                )));
            }
        }
        Ok(self.root.join(scope.collection_path()))
    }

    fn read_all(&self, scope: &PlaybookScope) -> Result<Vec<SavedPlay>, StoreError> {
        let dir = self.collection_dir(scope)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|e| StoreError::Read(e.to_string()))?;
        let mut plays = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StoreError::Read(e.to_string()))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            match read_document(&path) {
                Ok(doc) => plays.push(SavedPlay::from_document(id.to_string(), doc)),
                Err(e) => log::warn!("skipping unreadable play {}: {e}", path.display()),
            }
        }
        sort_newest_first(&mut plays);
        Ok(plays)
    }
}

fn is_safe_component(component: &str) -> bool {
    !component.is_empty()
        && component != "."
        && component != ".."
        && !component.contains(['/', '\\'])
}

fn read_document(path: &Path) -> Result<StoredDocument, StoreError> {
    let content = fs::read_to_string(path).map_err(|e| StoreError::Read(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| StoreError::Read(e.to_string()))
}

impl PlayStore for FilePlayStore {
    fn save(
        &self,
        scope: &PlaybookScope,
        play: &Play,
        name: &str,
    ) -> Result<SavedPlay, StoreError> {
        let dir = self
            .collection_dir(scope)
            .map_err(|e| StoreError::Write(e.to_string()))?;
        let saved = SavedPlay::new(play, name)?;
        let json = serde_json::to_string_pretty(&saved.to_document())
            .map_err(|e| StoreError::Write(e.to_string()))?;

        fs::create_dir_all(&dir).map_err(|e| StoreError::Write(e.to_string()))?;
        let path = dir.join(format!("{}.json", saved.id));
        fs::write(&path, json).map_err(|e| StoreError::Write(e.to_string()))?;
        log::info!("saved play {:?} to {}", saved.name, path.display());

        match self.read_all(scope) {
            Ok(list) => self.subscribers.notify(scope, &list),
            Err(e) => log::warn!("failed to refresh playbook after save: {e}"),
        }
        Ok(saved)
    }

    fn list(&self, scope: &PlaybookScope) -> Result<Vec<SavedPlay>, StoreError> {
        self.read_all(scope)
    }

    fn get(&self, scope: &PlaybookScope, play_id: &str) -> Result<Option<SavedPlay>, StoreError> {
        if !is_safe_component(play_id) {
            return Ok(None);
        }
        let path = self.collection_dir(scope)?.join(format!("{play_id}.json"));
        if !path.exists() {
            return Ok(None);
        }
        let doc = read_document(&path)?;
        Ok(Some(SavedPlay::from_document(play_id.to_string(), doc)))
    }

    fn subscribe(&self, scope: &PlaybookScope) -> Receiver<Vec<SavedPlay>> {
        let initial = self.read_all(scope).unwrap_or_else(|e| {
            log::warn!("failed to read playbook for subscription: {e}");
            Vec::new()
        });
        self.subscribers.add(scope, initial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::load_play;
    use crate::types::FieldSize;
    use crate::store::tests::sample_play;
    use tempfile::TempDir;

    fn scope() -> PlaybookScope {
        PlaybookScope {
            user_id: "user-1".to_string(),
            playbook_id: "my-playbook".to_string(),
        }
    }

    #[test]
    fn save_writes_document_under_scope_path() {
        let dir = TempDir::new().unwrap();
        let store = FilePlayStore::new(dir.path());

        let saved = store.save(&scope(), &sample_play(), "Mesh").unwrap();

        let path = dir
            .path()
            .join("users/user-1/playbooks/my-playbook/plays")
            .join(format!("{}.json", saved.id));
        let content = fs::read_to_string(path).unwrap();
        let doc: StoredDocument = serde_json::from_str(&content).unwrap();
        assert_eq!(doc.name, "Mesh");
    }

    #[test]
    fn saved_play_survives_a_new_store_instance() {
        let dir = TempDir::new().unwrap();
        let play = sample_play();
        let saved = FilePlayStore::new(dir.path())
            .save(&scope(), &play, "Mesh")
            .unwrap();

        let reopened = FilePlayStore::new(dir.path());
        let fetched = reopened.get(&scope(), &saved.id).unwrap().unwrap();

        assert_eq!(fetched, saved);
        assert_eq!(load_play(&fetched, FieldSize::landscape()).unwrap(), play);
    }

    #[test]
    fn list_orders_by_last_modified_and_skips_junk() {
        let dir = TempDir::new().unwrap();
        let store = FilePlayStore::new(dir.path());
        store.save(&scope(), &Play::new(), "One").unwrap();
        store.save(&scope(), &Play::new(), "Two").unwrap();
        let plays_dir = dir.path().join(scope().collection_path());
        fs::write(plays_dir.join("junk.json"), "not json").unwrap();
        fs::write(plays_dir.join("notes.txt"), "ignored").unwrap();

        let list = store.list(&scope()).unwrap();

        assert_eq!(list.len(), 2);
        assert!(list[0].last_modified >= list[1].last_modified);
    }

    #[test]
    fn empty_playbook_lists_nothing() {
        let dir = TempDir::new().unwrap();
        let store = FilePlayStore::new(dir.path());
        assert!(store.list(&scope()).unwrap().is_empty());
        assert!(store.get(&scope(), "nope").unwrap().is_none());
    }

    #[test]
    fn path_traversal_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = FilePlayStore::new(dir.path());
        let bad = PlaybookScope {
            user_id: "..".to_string(),
            playbook_id: "my-playbook".to_string(),
        };
        assert!(matches!(
            store.save(&bad, &Play::new(), "x"),
            Err(StoreError::Write(_))
        ));
        assert!(store.get(&scope(), "../secret").unwrap().is_none());
    }

    #[test]
    fn subscribers_are_notified_on_save() {
        let dir = TempDir::new().unwrap();
        let store = FilePlayStore::new(dir.path());
        let rx = store.subscribe(&scope());
        assert!(rx.try_recv().unwrap().is_empty());

        store.save(&scope(), &sample_play(), "Stick").unwrap();

        let update = rx.try_recv().unwrap();
        assert_eq!(update[0].name, "Stick");
    }
}
