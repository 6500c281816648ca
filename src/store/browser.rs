//! Play store backed by the browser's `localStorage`.
//!
//! Each play is one entry keyed `<collection path>/<play id>` holding the stored
//! document as JSON.

use super::{
    sort_newest_first, PlayStore, PlaybookScope, SavedPlay, StoredDocument, Subscribers,
};
use crate::error::StoreError;
use crate::types::Play;
use std::sync::mpsc::Receiver;

/// Stores saved plays in `window.localStorage`.
#[derive(Default)]
pub struct BrowserPlayStore {
    subscribers: Subscribers,
}

impl BrowserPlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn storage() -> Result<web_sys::Storage, String> {
        web_sys::window()
            .ok_or("no window")?
            .local_storage()
            .map_err(|e| format!("{e:?}"))?
            .ok_or_else(|| "localStorage unavailable".to_string())
    }

    fn read_all(&self, scope: &PlaybookScope) -> Result<Vec<SavedPlay>, StoreError> {
        let storage = Self::storage().map_err(StoreError::Read)?;
        let prefix = format!("{}/", scope.collection_path());
        let len = storage
            .length()
            .map_err(|e| StoreError::Read(format!("{e:?}")))?;

        let mut plays = Vec::new();
        for i in 0..len {
            let Ok(Some(key)) = storage.key(i) else {
                continue;
            };
            let Some(id) = key.strip_prefix(&prefix) else {
                continue;
            };
            let Ok(Some(raw)) = storage.get_item(&key) else {
                continue;
            };
            match serde_json::from_str::<StoredDocument>(&raw) {
                Ok(doc) => plays.push(SavedPlay::from_document(id.to_string(), doc)),
                Err(e) => log::warn!("skipping unreadable play {key}: {e}"),
            }
        }
        sort_newest_first(&mut plays);
        Ok(plays)
    }
}

impl PlayStore for BrowserPlayStore {
    fn save(
        &self,
        scope: &PlaybookScope,
        play: &Play,
        name: &str,
    ) -> Result<SavedPlay, StoreError> {
        let storage = Self::storage().map_err(StoreError::Write)?;
        let saved = SavedPlay::new(play, name)?;
        let json = serde_json::to_string(&saved.to_document())
            .map_err(|e| StoreError::Write(e.to_string()))?;
        let key = format!("{}/{}", scope.collection_path(), saved.id);
        storage
            .set_item(&key, &json)
            .map_err(|e| StoreError::Write(format!("{e:?}")))?;
        log::info!("saved play {:?} to localStorage", saved.name);

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
        let storage = Self::storage().map_err(StoreError::Read)?;
        let key = format!("{}/{}", scope.collection_path(), play_id);
        let raw = storage
            .get_item(&key)
            .map_err(|e| StoreError::Read(format!("{e:?}")))?;
        raw.map(|raw| {
            serde_json::from_str::<StoredDocument>(&raw)
                .map(|doc| SavedPlay::from_document(play_id.to_string(), doc))
                .map_err(|e| StoreError::Read(e.to_string()))
        })
        .transpose()
    }

    fn subscribe(&self, scope: &PlaybookScope) -> Receiver<Vec<SavedPlay>> {
        let initial = self.read_all(scope).unwrap_or_else(|e| {
            log::warn!("failed to read playbook for subscription: {e}");
            Vec::new()
        });
        self.subscribers.add(scope, initial)
    }
}
