//! Background work: saving plays, the playbook subscription and advisor requests.
//!
//! Tasks run on the tokio runtime on native and on the browser event loop on the
//! web. Each task reports through the app's channel, which is drained once per frame
//! in [`PlayDesignerApp::handle_background_results`].

use super::state::{BackgroundResult, PlayDesignerApp, PrintWindowState};
use crate::advisor::{validate_suggest_request, validate_summarize_request};
use crate::error::StoreError;
use crate::print::{build_svg, export_file_name, PrintView};
use crate::session::Session;
use crate::store::{load_play, validate_play_name, SavedPlay};
use eframe::egui;
use std::future::Future;

/// Runs `task` in the background. Without a runtime (headless use) it runs inline.
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn spawn_background<F>(task: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(task);
        }
        Err(_) => futures::executor::block_on(task),
    }
}

/// Runs `task` on the browser event loop.
#[cfg(target_arch = "wasm32")]
pub(crate) fn spawn_background<F>(task: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(task);
}

impl PlayDesignerApp {
    /// Signs in anonymously and subscribes to the user's playbook.
    ///
    /// # Arguments
    ///
    /// * `remembered` - User id of a previous session to reuse, if any
    pub fn sign_in(&mut self, remembered: Option<&str>) {
        self.session = Session::sign_in_anonymously(remembered);
        self.preferences.user_id = self.session.user_id().map(str::to_string);
        self.subscribe_playbook();
    }

    /// Signs out and forgets the playbook view. The editor keeps its play.
    pub fn sign_out(&mut self) {
        log::info!("signed out");
        self.session = Session::SignedOut;
        self.preferences.user_id = None;
        self.playbook.plays = None;
        self.playbook.subscription = None;
        self.save_dialog.open = false;
    }

    fn subscribe_playbook(&mut self) {
        self.playbook.plays = None;
        self.playbook.subscription = self.scope().map(|scope| self.store.subscribe(&scope));
    }

    /// Opens the save dialog, or explains why saving is unavailable.
    pub fn open_save_dialog(&mut self, now: f64) {
        if !self.session.is_signed_in() {
            self.notifications
                .error(StoreError::NotSignedIn.to_string(), now);
            return;
        }
        self.save_dialog.open = true;
        self.save_dialog.error = None;
    }

    /// Validates the dialog's name and saves the displayed play in the background.
    ///
    /// An invalid name keeps the dialog open with an inline message and nothing is
    /// sent to the store.
    pub fn submit_save(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);
        let name = match validate_play_name(&self.save_dialog.name) {
            Ok(name) => name,
            Err(e) => {
                self.save_dialog.error = Some(e.to_string());
                return;
            }
        };
        let Some(scope) = self.scope() else {
            self.save_dialog.open = false;
            self.notifications
                .error(StoreError::NotSignedIn.to_string(), now);
            return;
        };

        self.save_dialog = Default::default();
        let play = self.editor.play().clone();
        let revision = self.editor.revision();
        let store = self.store.clone();
        let sender = self.background_sender.clone();
        let ctx = ctx.clone();

        spawn_background(async move {
            let result = store.save(&scope, &play, &name);
            let _ = sender.send(BackgroundResult::Saved { revision, result });
            ctx.request_repaint();
        });
    }

    /// Loads a saved play into the editor as an undoable step.
    pub fn load_saved_play(&mut self, saved: &SavedPlay, now: f64) {
        match load_play(saved, self.editor.field()) {
            Ok(play) => {
                self.editor.load_play(play);
                self.saved_revision = self.editor.revision();
                self.notifications
                    .info(format!("Loaded \"{}\"", saved.name), now);
            }
            Err(e) => {
                self.notifications
                    .error(format!("Could not load \"{}\": {e}", saved.name), now);
            }
        }
    }

    /// Opens the print window for a saved play, fetching it from the store.
    pub fn open_print_view(&mut self, play_id: &str) {
        let saved = match self.scope() {
            Some(scope) => self.store.get(&scope, play_id),
            None => Err(StoreError::NotSignedIn),
        };
        let view = match saved {
            Ok(Some(saved)) => PrintView::from_saved(&saved, self.editor.field()),
            Ok(None) => PrintView::Unavailable,
            Err(e) => {
                log::warn!("failed to fetch play {play_id}: {e}");
                PrintView::Unavailable
            }
        };
        self.print = Some(PrintWindowState {
            play_id: play_id.to_string(),
            view,
        });
    }

    /// Exports the play of the open print window as SVG, or as PNG when `png` is set.
    ///
    /// The outcome comes back through the background channel and is shown as a
    /// notification.
    pub fn export_print(&self, ctx: &egui::Context, png: bool) {
        let Some(PrintWindowState {
            view: PrintView::Ready { name, play },
            ..
        }) = &self.print
        else {
            return;
        };
        let (svg, width, height) = build_svg(play, self.editor.field(), Some(name));
        let sender = self.background_sender.clone();
        let ctx = ctx.clone();

        #[cfg(not(target_arch = "wasm32"))]
        if png {
            let file_name = export_file_name(name, "png");
            spawn_background(async move {
                let result = crate::print::export_png(svg, width, height, file_name).await;
                let _ = sender.send(BackgroundResult::Exported(result));
                ctx.request_repaint();
            });
            return;
        }
        #[cfg(target_arch = "wasm32")]
        let _ = (png, width, height);

        let file_name = export_file_name(name, "svg");
        spawn_background(async move {
            let result = crate::print::export_svg(svg, file_name).await;
            let _ = sender.send(BackgroundResult::Exported(result));
            ctx.request_repaint();
        });
    }

    /// Asks the advisor for a play against the entered formation.
    ///
    /// A blank formation fails locally and the advisor is not called.
    pub fn request_suggestion(&mut self, ctx: &egui::Context) {
        let request = match validate_suggest_request(&self.suggestion.formation) {
            Ok(request) => request,
            Err(e) => {
                self.suggestion.request.fail(e.to_string());
                return;
            }
        };

        let generation = self.suggestion.request.begin();
        let advisor = self.advisor.clone();
        let sender = self.background_sender.clone();
        let ctx = ctx.clone();
        spawn_background(async move {
            let outcome = advisor.suggest_play(request).await;
            let _ = sender.send(BackgroundResult::Suggestion {
                generation,
                outcome,
            });
            ctx.request_repaint();
        });
    }

    /// Asks the advisor to summarize the saved plays.
    pub fn request_summary(&mut self, ctx: &egui::Context) {
        let plays = self.playbook.plays.as_deref().unwrap_or_default();
        let request = match validate_summarize_request(plays) {
            Ok(request) => request,
            Err(e) => {
                self.summary.fail(e.to_string());
                return;
            }
        };

        let generation = self.summary.begin();
        let advisor = self.advisor.clone();
        let sender = self.background_sender.clone();
        let ctx = ctx.clone();
        spawn_background(async move {
            let outcome = advisor.summarize_playbook(request).await;
            let _ = sender.send(BackgroundResult::Summary {
                generation,
                outcome,
            });
            ctx.request_repaint();
        });
    }

    /// Applies finished background work and the latest playbook list.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The egui context, used for the notification clock
    pub fn handle_background_results(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);

        while let Ok(result) = self.background_receiver.try_recv() {
            match result {
                BackgroundResult::Saved { revision, result } => match result {
                    Ok(saved) => {
                        self.saved_revision = revision;
                        self.notifications
                            .info(format!("Saved \"{}\"", saved.name), now);
                    }
                    Err(e) => self.notifications.error(e.to_string(), now),
                },
                BackgroundResult::Suggestion {
                    generation,
                    outcome,
                } => {
                    self.suggestion.request.complete(generation, outcome);
                }
                BackgroundResult::Summary {
                    generation,
                    outcome,
                } => {
                    self.summary.complete(generation, outcome);
                }
                BackgroundResult::Exported(result) => match result {
                    Ok(Some(path)) => self.notifications.info(format!("Exported {path}"), now),
                    Ok(None) => {}
                    Err(e) => {
                        log::error!("{e}");
                        self.notifications.error(e.to_string(), now);
                    }
                },
            }
        }

        if let Some(subscription) = &self.playbook.subscription {
            while let Ok(plays) = subscription.try_recv() {
                self.playbook.plays = Some(plays);
            }
        }
    }
}
