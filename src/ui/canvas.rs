//! Field interaction.
//!
//! Translates pointer and touch input over the field into editor gestures. Screen
//! positions are mapped into field coordinates before they reach the editor.

use super::state::PlayDesignerApp;
use crate::editor::Tool;
use crate::geometry::{fit_field_rect, to_field_coords, PointerInput};
use eframe::egui;

/// Pointer state sampled once per frame.
struct PointerFrame {
    pointer: PointerInput,
    pressed: bool,
    down: bool,
    released: bool,
}

impl PointerFrame {
    fn sample(ui: &egui::Ui) -> Self {
        ui.input(|i| {
            let touches: Vec<egui::Pos2> = i
                .events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Touch { pos, phase, .. }
                        if !matches!(phase, egui::TouchPhase::End | egui::TouchPhase::Cancel) =>
                    {
                        Some(*pos)
                    }
                    _ => None,
                })
                .collect();
            let pointer = if touches.is_empty() {
                match i.pointer.latest_pos() {
                    Some(pos) => PointerInput::Mouse(pos),
                    None => PointerInput::Touch(Vec::new()),
                }
            } else {
                PointerInput::Touch(touches)
            };
            Self {
                pointer,
                pressed: i.pointer.primary_pressed(),
                down: i.pointer.primary_down(),
                released: i.pointer.primary_released(),
            }
        })
    }
}

impl PlayDesignerApp {
    /// Lays out the field in the available space, renders it and feeds pointer input
    /// to the editor.
    ///
    /// # Arguments
    ///
    /// * `ui` - The egui UI of the central panel
    pub fn draw_field(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let field_rect = fit_field_rect(response.rect, self.editor.field());
        self.canvas.field_rect = Some(field_rect);

        self.handle_field_input(ui, field_rect);
        self.update_cursor_icon(ui, field_rect);

        self.render_field(&painter.with_clip_rect(field_rect), field_rect);
    }

    fn handle_field_input(&mut self, ui: &egui::Ui, field_rect: egui::Rect) {
        let frame = PointerFrame::sample(ui);
        let inside = frame
            .pointer
            .primary_pos()
            .is_some_and(|pos| field_rect.contains(pos));
        let point = to_field_coords(&frame.pointer, Some(field_rect), self.editor.field());

        if frame.pressed && inside && !self.overlay_open() {
            let target = self.editor.play().player_at(point).map(|p| p.id.clone());
            self.editor.pointer_down(point, target.as_deref());
            self.canvas.last_point = Some(point);
        }

        if !self.gesture_active() {
            self.canvas.last_point = None;
            return;
        }

        if frame.down && inside && self.canvas.last_point != Some(point) {
            self.editor.pointer_move(point);
            self.canvas.last_point = Some(point);
        }

        if frame.released || !frame.down {
            self.editor.pointer_up();
            self.canvas.last_point = None;
        } else if !inside {
            self.editor.pointer_leave();
            self.canvas.last_point = None;
        }
    }

    fn gesture_active(&self) -> bool {
        self.editor.is_drawing() || self.editor.dragged_player().is_some()
    }

    fn update_cursor_icon(&self, ui: &egui::Ui, field_rect: egui::Rect) {
        let Some(hover) = ui.input(|i| i.pointer.hover_pos()) else {
            return;
        };
        if !field_rect.contains(hover) || self.overlay_open() {
            return;
        }
        let point = to_field_coords(
            &PointerInput::Mouse(hover),
            Some(field_rect),
            self.editor.field(),
        );
        let over_player = self.editor.play().player_at(point).is_some();

        let icon = match self.editor.tool() {
            Tool::DrawSolid | Tool::DrawDashed => egui::CursorIcon::Crosshair,
            Tool::Cursor if self.editor.dragged_player().is_some() => egui::CursorIcon::Grabbing,
            Tool::Cursor if over_player => egui::CursorIcon::Grab,
            Tool::Eraser if over_player => egui::CursorIcon::PointingHand,
            Tool::Cursor | Tool::Eraser => egui::CursorIcon::Default,
        };
        ui.ctx().set_cursor_icon(icon);
    }
}
