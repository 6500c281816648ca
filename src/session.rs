//! Anonymous user identity.

use crate::store::PlaybookScope;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who is using the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Session {
    #[default]
    SignedOut,
    SignedIn { user_id: String },
}

impl Session {
    /// Signs in anonymously, reusing `remembered` when a previous session left an id.
    pub fn sign_in_anonymously(remembered: Option<&str>) -> Self {
        let user_id = match remembered.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };
        log::info!("signed in anonymously as {user_id}");
        Session::SignedIn { user_id }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Session::SignedIn { user_id } => Some(user_id),
            Session::SignedOut => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.user_id().is_some()
    }

    /// The playbook this session reads and writes, or `None` while signed out.
    pub fn scope(&self, playbook_id: &str) -> Option<PlaybookScope> {
        self.user_id().map(|user_id| PlaybookScope {
            user_id: user_id.to_string(),
            playbook_id: playbook_id.to_string(),
        })
    }
}
