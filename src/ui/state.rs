//! Application state structures.
//!
//! This module contains the state the UI keeps around the editor: persisted
//! preferences, the laid-out field, the playbook subscription, dialog state, advisor
//! requests and the channel background tasks report through.

use super::notifications::Notifications;
use crate::advisor::{
    HttpAdvisor, PlayAdvisor, RequestTracker, SuggestPlayResponse, SummarizePlaybookResponse,
    UnconfiguredAdvisor,
};
use crate::config::AppConfig;
use crate::editor::EditorState;
use crate::error::{AiServiceError, ExportError, StoreError};
use crate::print::PrintView;
use crate::session::Session;
use crate::store::{PlayStore, PlaybookScope, SavedPlay};
use crate::types::{ColorToken, FieldPoint};
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Settings remembered between restarts through eframe storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
    /// Remembered width of the tools panel
    pub side_panel_width: f32,
    /// Anonymous user id of the last session
    pub user_id: Option<String>,
    /// Last used route colour
    pub drawing_color: ColorToken,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dark_mode: true,
            side_panel_width: crate::constants::SIDE_PANEL_WIDTH,
            user_id: None,
            drawing_color: ColorToken::accent(),
        }
    }
}

/// Where the field was laid out in the last frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanvasState {
    /// Screen rectangle of the field, `None` until the first layout
    pub field_rect: Option<egui::Rect>,
    /// Field position last sent to the editor during a gesture
    pub last_point: Option<FieldPoint>,
}

/// Live view of the saved plays.
#[derive(Default)]
pub struct PlaybookState {
    /// Latest list from the store; `None` while the first list is pending
    pub plays: Option<Vec<SavedPlay>>,
    pub subscription: Option<Receiver<Vec<SavedPlay>>>,
}

/// The "Save Play" dialog.
#[derive(Debug, Clone, Default)]
pub struct SaveDialogState {
    pub open: bool,
    pub name: String,
    /// Inline validation message
    pub error: Option<String>,
}

/// The print window of one saved play.
#[derive(Debug, Clone)]
pub struct PrintWindowState {
    pub play_id: String,
    pub view: PrintView,
}

/// Suggestion form input and request progress.
#[derive(Debug, Default)]
pub struct SuggestionState {
    pub formation: String,
    pub request: RequestTracker<SuggestPlayResponse>,
}

/// Messages sent from background tasks back to the app.
#[derive(Debug)]
pub enum BackgroundResult {
    /// A save finished; `revision` is the editor revision that was saved
    Saved {
        revision: u64,
        result: Result<SavedPlay, StoreError>,
    },
    Suggestion {
        generation: u64,
        outcome: Result<SuggestPlayResponse, AiServiceError>,
    },
    Summary {
        generation: u64,
        outcome: Result<SummarizePlaybookResponse, AiServiceError>,
    },
    /// An export finished; `Ok(None)` when the save dialog was cancelled
    Exported(Result<Option<String>, ExportError>),
}

/// The main application structure.
///
/// This struct implements the `eframe::App` trait and owns the editor together with
/// the adapters it talks to.
pub struct PlayDesignerApp {
    /// The play being edited, with its history and tool state
    pub editor: EditorState,
    pub config: AppConfig,
    pub preferences: Preferences,
    pub session: Session,
    pub store: Arc<dyn PlayStore>,
    pub advisor: Arc<dyn PlayAdvisor>,
    pub canvas: CanvasState,
    pub playbook: PlaybookState,
    pub save_dialog: SaveDialogState,
    pub print: Option<PrintWindowState>,
    pub suggestion: SuggestionState,
    pub summary: RequestTracker<SummarizePlaybookResponse>,
    pub notifications: Notifications,
    /// Editor revision last written to the store
    pub saved_revision: u64,
    /// Whether the browser's leave-page prompt is installed
    pub unload_prompt_armed: bool,
    pub background_sender: Sender<BackgroundResult>,
    pub background_receiver: Receiver<BackgroundResult>,
}

impl PlayDesignerApp {
    /// Creates a signed-out app over the given adapters.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn PlayStore>,
        advisor: Arc<dyn PlayAdvisor>,
    ) -> Self {
        let (background_sender, background_receiver) = channel();
        let editor = EditorState::new(config.field_size(), config.erase_policy);
        Self {
            editor,
            config,
            preferences: Preferences::default(),
            session: Session::SignedOut,
            store,
            advisor,
            canvas: CanvasState::default(),
            playbook: PlaybookState::default(),
            save_dialog: SaveDialogState::default(),
            print: None,
            suggestion: SuggestionState::default(),
            summary: RequestTracker::new(),
            notifications: Notifications::default(),
            saved_revision: 0,
            unload_prompt_armed: false,
            background_sender,
            background_receiver,
        }
    }

    /// Creates the app for eframe: restores preferences, picks the platform store and
    /// signs in with the remembered anonymous id.
    pub fn from_creation_context(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let store = default_store(&config);
        let advisor: Arc<dyn PlayAdvisor> = match &config.advisor {
            Some(advisor) => {
                log::info!("using advisor at {}", advisor.endpoint);
                Arc::new(HttpAdvisor::new(advisor))
            }
            None => {
                log::info!("no advisor endpoint configured");
                Arc::new(UnconfiguredAdvisor)
            }
        };

        let mut app = Self::new(config, store, advisor);
        if let Some(json) = cc.storage.and_then(|s| s.get_string("app_state")) {
            match Preferences::from_json(&json) {
                Ok(preferences) => app.preferences = preferences,
                Err(e) => log::warn!("ignoring unreadable preferences: {e}"),
            }
        }
        app.editor
            .select_color(app.preferences.drawing_color.clone());
        let remembered = app.preferences.user_id.clone();
        app.sign_in(remembered.as_deref());
        app
    }

    /// The playbook of the signed-in user.
    pub fn scope(&self) -> Option<PlaybookScope> {
        self.session.scope(&self.config.playbook_id)
    }

    /// Whether the displayed play differs from the last saved one.
    pub fn has_unsaved_changes(&self) -> bool {
        self.editor.revision() != self.saved_revision
    }

    /// Whether a dialog or window sits over the field.
    pub fn overlay_open(&self) -> bool {
        self.save_dialog.open || self.print.is_some()
    }
}

impl Preferences {
    /// Serializes the preferences to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes preferences from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn default_store(config: &AppConfig) -> Arc<dyn PlayStore> {
    log::info!("storing plays under {}", config.store_dir.display());
    Arc::new(crate::store::FilePlayStore::new(config.store_dir.clone()))
}

#[cfg(target_arch = "wasm32")]
fn default_store(_config: &AppConfig) -> Arc<dyn PlayStore> {
    Arc::new(crate::store::BrowserPlayStore::new())
}
