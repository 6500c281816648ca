//! In-process play store.

use super::{sort_newest_first, PlayStore, PlaybookScope, SavedPlay, Subscribers};
use crate::error::StoreError;
use crate::types::Play;
use std::collections::HashMap;
use std::sync::mpsc::Receiver;
use std::sync::Mutex;

/// Keeps saved plays in memory for the lifetime of the process.
#[derive(Default)]
pub struct MemoryPlayStore {
    plays: Mutex<HashMap<PlaybookScope, Vec<SavedPlay>>>,
    subscribers: Subscribers,
}

impl MemoryPlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self, scope: &PlaybookScope) -> Result<Vec<SavedPlay>, StoreError> {
        let plays = self
            .plays
            .lock()
            .map_err(|e| StoreError::Read(e.to_string()))?;
        let mut list: Vec<SavedPlay> = plays
            .get(scope)
            .map(|plays| plays.iter().rev().cloned().collect())
            .unwrap_or_default();
        sort_newest_first(&mut list);
        Ok(list)
    }
}

impl PlayStore for MemoryPlayStore {
    fn save(
        &self,
        scope: &PlaybookScope,
        play: &Play,
        name: &str,
    ) -> Result<SavedPlay, StoreError> {
        let saved = SavedPlay::new(play, name)?;
        {
            let mut plays = self
                .plays
                .lock()
                .map_err(|e| StoreError::Write(e.to_string()))?;
            plays.entry(scope.clone()).or_default().push(saved.clone());
        }
        let list = self.snapshot(scope)?;
        self.subscribers.notify(scope, &list);
        Ok(saved)
    }

    fn list(&self, scope: &PlaybookScope) -> Result<Vec<SavedPlay>, StoreError> {
        self.snapshot(scope)
    }

    fn get(&self, scope: &PlaybookScope, play_id: &str) -> Result<Option<SavedPlay>, StoreError> {
        Ok(self.snapshot(scope)?.into_iter().find(|p| p.id == play_id))
    }

    fn subscribe(&self, scope: &PlaybookScope) -> Receiver<Vec<SavedPlay>> {
        let initial = self.snapshot(scope).unwrap_or_default();
        self.subscribers.add(scope, initial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::load_play;
    use crate::types::FieldSize;
    use crate::store::tests::sample_play;

    fn scope(user: &str) -> PlaybookScope {
        PlaybookScope {
            user_id: user.to_string(),
            playbook_id: "my-playbook".to_string(),
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = MemoryPlayStore::new();
        let play = sample_play();

        let saved = store.save(&scope("u"), &play, "Slant").unwrap();
        let fetched = store.get(&scope("u"), &saved.id).unwrap().unwrap();

        assert_eq!(fetched.name, "Slant");
        assert_eq!(load_play(&fetched, FieldSize::landscape()).unwrap(), play);
    }

    #[test]
    fn list_is_newest_first_and_scoped() {
        let store = MemoryPlayStore::new();
        let first = store.save(&scope("u"), &Play::new(), "First").unwrap();
        let second = store.save(&scope("u"), &Play::new(), "Second").unwrap();
        store
            .save(&scope("someone-else"), &Play::new(), "Theirs")
            .unwrap();

        let list = store.list(&scope("u")).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, second.id);
        assert_eq!(list[1].id, first.id);
    }

    #[test]
    fn subscription_sees_initial_list_and_updates() {
        let store = MemoryPlayStore::new();
        store.save(&scope("u"), &Play::new(), "Existing").unwrap();

        let rx = store.subscribe(&scope("u"));
        assert_eq!(rx.try_recv().unwrap().len(), 1);

        store.save(&scope("u"), &sample_play(), "New").unwrap();
        let update = rx.try_recv().unwrap();
        assert_eq!(update.len(), 2);
        assert_eq!(update[0].name, "New");
    }

    #[test]
    fn unknown_play_is_none() {
        let store = MemoryPlayStore::new();
        let missing = store.get(&scope("u"), "missing").unwrap();
        assert!(missing.is_none());
    }
}
