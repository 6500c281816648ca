//! User interface of the play designer.
//!
//! This module contains the eframe application: the field canvas, the tools panel,
//! dialogs and the background plumbing that connects the editor to the play store and
//! the advisor.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main PlayDesignerApp
//! - `canvas` - Field layout and pointer/touch interaction
//! - `rendering` - Drawing the field, routes and players
//! - `panels` - Tools panel, save dialog and print window
//! - `persistence` - Session, saving, loading and advisor requests
//! - `notifications` - Transient status messages

mod canvas;
mod notifications;
mod panels;
mod persistence;
mod rendering;
mod state;

#[cfg(test)]
mod tests;

pub use state::PlayDesignerApp;

use eframe::egui;
#[cfg(target_arch = "wasm32")]
use eframe::wasm_bindgen::JsCast;

impl eframe::App for PlayDesignerApp {
    /// Persist preferences between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.preferences.to_json() {
            Ok(json) => {
                storage.set_string("app_state", json);
            }
            Err(err) => {
                log::error!("Failed to serialize preferences: {err}");
            }
        }
    }

    /// Main update function called by egui for each frame.
    ///
    /// Lays out the toolbar, the tools panel and the field, then the dialogs on top.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The egui context
    /// * `_frame` - The eframe frame
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }
}

impl PlayDesignerApp {
    /// Draws one frame. Separate from [`eframe::App::update`] so it can run headless.
    pub fn show(&mut self, ctx: &egui::Context) {
        let visuals = if self.preferences.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.handle_background_results(ctx);
        self.handle_undo_keys(ctx);

        #[cfg(target_arch = "wasm32")]
        {
            let unsaved = self.has_unsaved_changes();
            if unsaved != self.unload_prompt_armed {
                Self::update_beforeunload(unsaved);
                self.unload_prompt_armed = unsaved;
            }
        }

        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        let viewport_width = ctx.input(|i| i.content_rect().width());
        let max_width = (viewport_width * 0.5).max(200.0);
        egui::SidePanel::left("tools_panel")
            .resizable(true)
            .default_width(self.preferences.side_panel_width.clamp(200.0, max_width))
            .show(ctx, |ui| {
                self.preferences.side_panel_width = ui.available_width().clamp(200.0, max_width);
                self.draw_side_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_field(ui);
        });

        self.draw_save_dialog(ctx);
        self.draw_print_window(ctx);
        self.notifications.show(ctx);
    }

    /// Ctrl/Cmd+Z undoes the last step unless a text field has focus.
    fn handle_undo_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let undo = ctx.input(|i| {
            i.key_pressed(egui::Key::Z) && i.modifiers.command && !i.modifiers.shift
        });
        if undo {
            self.editor.undo();
        }
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.strong("Play Designer");
            ui.separator();
            ui.label(format!(
                "{} players, {} routes",
                self.editor.play().players.len(),
                self.editor.play().routes.len()
            ));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.checkbox(&mut self.preferences.dark_mode, "Dark Mode");
                ui.separator();
                if self.has_unsaved_changes() {
                    ui.label("Unsaved changes*");
                } else {
                    ui.weak("Saved");
                }
            });
        });
    }

    #[cfg(target_arch = "wasm32")]
    fn update_beforeunload(has_unsaved_changes: bool) {
        if let Some(window) = web_sys::window() {
            if has_unsaved_changes {
                let closure = eframe::wasm_bindgen::closure::Closure::wrap(Box::new(
                    move |event: web_sys::Event| {
                        event.prevent_default();
                        let _ = js_sys::Reflect::set(
                            event.as_ref(),
                            &eframe::wasm_bindgen::JsValue::from_str("returnValue"),
                            &eframe::wasm_bindgen::JsValue::from_str("unsaved"),
                        );
                    },
                )
                    as Box<dyn FnMut(_)>);
                window.set_onbeforeunload(Some(closure.as_ref().unchecked_ref()));
                closure.forget();
            } else {
                window.set_onbeforeunload(None);
            }
        }
    }
}
