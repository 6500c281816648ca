//! Side panel, dialogs and the print window.

use super::rendering::{paint_play, FieldPalette};
use super::state::PlayDesignerApp;
use crate::advisor::RequestState;
use crate::editor::Tool;
use crate::geometry::fit_field_rect;
use crate::print::PrintView;
use crate::types::{ColorToken, PlayerType};
use eframe::egui;

/// Size of a colour swatch button.
const SWATCH_SIZE: f32 = 22.0;

impl PlayDesignerApp {
    /// Renders the tools panel: session, tools, colours, players, actions, saved plays
    /// and the advisor.
    pub fn draw_side_panel(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                self.draw_session_section(ui);
                ui.separator();
                self.draw_tool_section(ui);
                ui.separator();
                self.draw_player_section(ui);
                ui.separator();
                self.draw_action_section(ui);
                ui.separator();
                self.draw_saved_plays_section(ui);
                ui.separator();
                self.draw_advisor_section(ui);
            });
    }

    fn draw_session_section(&mut self, ui: &mut egui::Ui) {
        let user_id = self.session.user_id().map(str::to_string);
        ui.horizontal(|ui| match user_id {
            Some(user_id) => {
                let short: String = user_id.chars().take(8).collect();
                ui.label(format!("Signed in as guest {short}"))
                    .on_hover_text(&user_id);
                if ui.button("Sign out").clicked() {
                    self.sign_out();
                }
            }
            None => {
                ui.label("Not signed in");
                if ui.button("Sign in").clicked() {
                    let remembered = self.preferences.user_id.clone();
                    self.sign_in(remembered.as_deref());
                }
            }
        });
    }

    fn draw_tool_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("Tools");
        ui.horizontal_wrapped(|ui| {
            for tool in Tool::ALL {
                let style = tool.style();
                let selected = self.editor.tool() == tool;
                let response = ui
                    .selectable_label(selected, format!("{} {}", style.icon, style.label))
                    .on_hover_text(style.hint);
                if response.clicked() {
                    self.editor.select_tool(tool);
                }
            }
        });

        ui.label("Route colour");
        ui.horizontal_wrapped(|ui| {
            for color in ColorToken::palette() {
                let selected = self.editor.drawing_color() == &color;
                let swatch = egui::Button::new("")
                    .fill(color.to_color32())
                    .selected(selected)
                    .min_size(egui::vec2(SWATCH_SIZE, SWATCH_SIZE));
                if ui.add(swatch).on_hover_text(color.as_str()).clicked() {
                    self.preferences.drawing_color = color.clone();
                    self.editor.select_color(color);
                }
            }
        });
    }

    fn draw_player_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("Players");
        ui.horizontal_wrapped(|ui| {
            for player_type in PlayerType::ALL {
                let style = player_type.style();
                if ui.button(format!("Add {}", style.name)).clicked() {
                    self.editor.add_player(player_type);
                }
            }
        });
    }

    fn draw_action_section(&mut self, ui: &mut egui::Ui) {
        let now = ui.input(|i| i.time);
        ui.horizontal_wrapped(|ui| {
            ui.add_enabled_ui(self.editor.history().can_undo(), |ui| {
                if ui.button("⟲ Undo").clicked() {
                    self.editor.undo();
                }
            });
            if ui.button("Clear Field").clicked() {
                self.editor.clear_field();
            }
            ui.add_enabled_ui(self.session.is_signed_in(), |ui| {
                if ui.button("Save Play…").clicked() {
                    self.open_save_dialog(now);
                }
            });
        });
    }

    fn draw_saved_plays_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("Saved Plays");
        if !self.session.is_signed_in() {
            ui.weak("Sign in to see your playbook.");
            return;
        }
        let Some(plays) = &self.playbook.plays else {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading plays...");
            });
            return;
        };
        if plays.is_empty() {
            ui.weak("No plays saved yet.");
            return;
        }

        let mut load = None;
        let mut print = None;
        egui::ScrollArea::vertical()
            .id_salt("saved_plays")
            .max_height(220.0)
            .show(ui, |ui| {
                for play in plays {
                    ui.horizontal(|ui| {
                        ui.label(&play.name).on_hover_text(format!(
                            "Last modified {}",
                            play.last_modified.format("%Y-%m-%d %H:%M")
                        ));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("Print").clicked() {
                                print = Some(play.id.clone());
                            }
                            if ui.small_button("Load").clicked() {
                                load = Some(play.clone());
                            }
                        });
                    });
                }
            });

        if let Some(saved) = load {
            let now = ui.input(|i| i.time);
            self.load_saved_play(&saved, now);
        }
        if let Some(play_id) = print {
            self.open_print_view(&play_id);
        }
    }

    fn draw_advisor_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("Play Advisor");
        ui.label("Opponent formation");
        ui.add(
            egui::TextEdit::singleline(&mut self.suggestion.formation)
                .hint_text("e.g. 4-3 Cover 2"),
        );
        ui.horizontal(|ui| {
            let loading = self.suggestion.request.is_loading();
            let suggest = ui.add_enabled(!loading, egui::Button::new("Suggest Play"));
            if suggest.clicked() {
                self.request_suggestion(ui.ctx());
            }
            if loading {
                ui.spinner();
            }
        });
        match self.suggestion.request.state() {
            RequestState::Idle | RequestState::Loading => {}
            RequestState::Ready(response) => {
                ui.strong(&response.suggested_play);
                ui.label(&response.rationale);
            }
            RequestState::Failed(message) => {
                ui.colored_label(ui.visuals().error_fg_color, message);
            }
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let loading = self.summary.is_loading();
            if ui
                .add_enabled(!loading, egui::Button::new("Summarize Playbook"))
                .clicked()
            {
                self.request_summary(ui.ctx());
            }
            if loading {
                ui.spinner();
            }
        });
        match self.summary.state() {
            RequestState::Idle | RequestState::Loading => {}
            RequestState::Ready(response) => {
                ui.label(&response.summary);
            }
            RequestState::Failed(message) => {
                ui.colored_label(ui.visuals().error_fg_color, message);
            }
        }
    }

    /// Renders the "Save Play" dialog while it is open.
    pub fn draw_save_dialog(&mut self, ctx: &egui::Context) {
        if !self.save_dialog.open {
            return;
        }
        let mut open = true;
        let mut submit = false;
        let mut cancel = false;

        egui::Window::new("Save Play")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label("Play name");
                let response = ui.text_edit_singleline(&mut self.save_dialog.name);
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }
                if let Some(error) = &self.save_dialog.error {
                    ui.colored_label(ui.visuals().error_fg_color, error);
                }
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        submit = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if submit {
            self.submit_save(ctx);
        }
        if cancel || !open {
            self.save_dialog.open = false;
            self.save_dialog.error = None;
        }
    }

    /// Renders the print window of a saved play while it is open.
    pub fn draw_print_window(&mut self, ctx: &egui::Context) {
        let Some(print) = &self.print else {
            return;
        };
        let field = self.editor.field();
        let mut open = true;
        let mut export_png = None;
        let title = match &print.view {
            PrintView::Ready { name, .. } => format!("Print: {name}"),
            PrintView::Unavailable => "Print".to_string(),
        };

        egui::Window::new(title)
            .id(egui::Id::new(("print_window", print.play_id.as_str())))
            .open(&mut open)
            .collapsible(false)
            .default_size(egui::vec2(640.0, 360.0))
            .show(ctx, |ui| match &print.view {
                PrintView::Ready { play, .. } => {
                    ui.horizontal(|ui| {
                        if ui.button("Export SVG").clicked() {
                            export_png = Some(false);
                        }
                        #[cfg(not(target_arch = "wasm32"))]
                        if ui.button("Export PNG").clicked() {
                            export_png = Some(true);
                        }
                    });
                    ui.separator();

                    let (response, painter) =
                        ui.allocate_painter(ui.available_size(), egui::Sense::hover());
                    let rect = fit_field_rect(response.rect, field);
                    paint_play(
                        &painter.with_clip_rect(rect),
                        rect,
                        field,
                        play,
                        FieldPalette::PRINT,
                        None,
                    );
                }
                PrintView::Unavailable => {
                    ui.label(PrintView::UNAVAILABLE_MESSAGE);
                }
            });

        if let Some(png) = export_png {
            self.export_print(ctx, png);
        }
        if !open {
            self.print = None;
        }
    }
}
