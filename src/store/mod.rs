//! Saved-play persistence.
//!
//! Plays are stored per user under a single playbook, one document per save. Each
//! document keeps the play as a JSON diagram string next to its name and timestamps,
//! in the same shape the web client wrote:
//!
//! ```json
//! { "name": "...", "diagram": "{\"players\":[...],\"routes\":[...]}",
//!   "createdAt": "2024-01-01T00:00:00Z", "lastModified": "2024-01-01T00:00:00Z" }
//! ```
//!
//! Adapters:
//! - [`MemoryPlayStore`] keeps everything in process
//! - [`FilePlayStore`] writes one JSON file per play (native only)
//! - [`BrowserPlayStore`] writes to `localStorage` (web only)

mod memory;
pub use memory::MemoryPlayStore;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FilePlayStore;

#[cfg(target_arch = "wasm32")]
mod browser;
#[cfg(target_arch = "wasm32")]
pub use browser::BrowserPlayStore;

use crate::error::{DeserializationError, StoreError, ValidationError};
use crate::types::{new_entity_id, EntityId, FieldSize, Play};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;

/// The (user, playbook) pair that addresses saved plays.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaybookScope {
    pub user_id: String,
    pub playbook_id: String,
}

impl PlaybookScope {
    /// Slash-separated collection path, `users/<uid>/playbooks/<pid>/plays`.
    pub fn collection_path(&self) -> String {
        format!(
            "users/{}/playbooks/{}/plays",
            self.user_id, self.playbook_id
        )
    }
}

/// A named play as stored in a playbook.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedPlay {
    pub id: EntityId,
    pub name: String,
    /// The play serialized with [`Play::to_json`]
    pub diagram: String,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

/// On-disk/in-storage document shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    pub name: String,
    pub diagram: String,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl SavedPlay {
    /// Serializes `play` into a new saved play stamped with the current time.
    pub fn new(play: &Play, name: &str) -> Result<Self, StoreError> {
        let diagram = play
            .to_json()
            .map_err(|e| StoreError::Write(e.to_string()))?;
        let now = Utc::now();
        Ok(Self {
            id: new_entity_id(),
            name: name.trim().to_string(),
            diagram,
            created_at: now,
            last_modified: now,
        })
    }

    pub fn from_document(id: EntityId, doc: StoredDocument) -> Self {
        Self {
            id,
            name: doc.name,
            diagram: doc.diagram,
            created_at: doc.created_at,
            last_modified: doc.last_modified,
        }
    }

    pub fn to_document(&self) -> StoredDocument {
        StoredDocument {
            name: self.name.clone(),
            diagram: self.diagram.clone(),
            created_at: self.created_at,
            last_modified: self.last_modified,
        }
    }
}

/// A per-user document store for saved plays.
///
/// Implementations are called from background tasks, so they must be shareable across
/// threads. Failures never touch editor state; callers surface them as notifications.
pub trait PlayStore: Send + Sync {
    /// Stores `play` under `name` as a new document.
    fn save(&self, scope: &PlaybookScope, play: &Play, name: &str)
        -> Result<SavedPlay, StoreError>;

    /// All plays of the playbook, most recently modified first.
    fn list(&self, scope: &PlaybookScope) -> Result<Vec<SavedPlay>, StoreError>;

    /// A single play by id.
    fn get(&self, scope: &PlaybookScope, play_id: &str) -> Result<Option<SavedPlay>, StoreError>;

    /// Live query over the playbook.
    ///
    /// The current list is sent immediately and again after every change in `scope`.
    fn subscribe(&self, scope: &PlaybookScope) -> Receiver<Vec<SavedPlay>>;
}

/// Turns a saved play back into an editable play on `field`.
///
/// Players and route points outside the field are clamped onto it.
pub fn load_play(saved: &SavedPlay, field: FieldSize) -> Result<Play, DeserializationError> {
    Ok(Play::from_json(&saved.diagram)?.fitted_to(field))
}

/// Trims a play name, rejecting names that are empty or only whitespace.
pub fn validate_play_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyPlayName);
    }
    Ok(trimmed.to_string())
}

/// Orders plays most recently modified first. Ties keep their relative order.
pub(crate) fn sort_newest_first(plays: &mut [SavedPlay]) {
    plays.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
}

/// Live-query listeners of a store.
#[derive(Default)]
pub(crate) struct Subscribers {
    listeners: Mutex<Vec<(PlaybookScope, Sender<Vec<SavedPlay>>)>>,
}

impl Subscribers {
    /// Registers a listener and hands it `initial` straight away.
    pub fn add(&self, scope: &PlaybookScope, initial: Vec<SavedPlay>) -> Receiver<Vec<SavedPlay>> {
        let (sender, receiver) = channel();
        let _ = sender.send(initial);
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push((scope.clone(), sender));
        }
        receiver
    }

    /// Sends `plays` to every listener of `scope`, dropping listeners that went away.
    pub fn notify(&self, scope: &PlaybookScope, plays: &[SavedPlay]) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.retain(|(listener_scope, sender)| {
                listener_scope != scope || sender.send(plays.to_vec()).is_ok()
            });
        }
    }
}
