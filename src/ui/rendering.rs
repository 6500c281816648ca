//! Field rendering: markings, routes and player icons.
//!
//! The same painter code draws the interactive field and the print preview; only the
//! [`FieldPalette`] differs.

use super::state::PlayDesignerApp;
use crate::constants::{PLAYER_ICON_RADIUS, ROUTE_DASH_LENGTH, ROUTE_STROKE_WIDTH};
use crate::geometry::{screen_scale, to_screen_pos, FieldMarkings, Segment};
use crate::style::{END_ZONE_COLOR, FIELD_COLOR, MARKING_COLOR};
use crate::types::*;
use eframe::egui;
use eframe::epaint::TextShape;

/// Colours used to paint a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldPalette {
    pub field: egui::Color32,
    pub end_zone: egui::Color32,
    pub marking: egui::Color32,
    /// Paints every route in this colour instead of its own
    pub route_override: Option<egui::Color32>,
    /// Paints players as plain outlined circles
    pub monochrome_players: bool,
}

impl FieldPalette {
    /// The green editor field.
    pub const EDITOR: FieldPalette = FieldPalette {
        field: FIELD_COLOR,
        end_zone: END_ZONE_COLOR,
        marking: MARKING_COLOR,
        route_override: None,
        monochrome_players: false,
    };

    /// White paper with black ink.
    pub const PRINT: FieldPalette = FieldPalette {
        field: egui::Color32::WHITE,
        end_zone: egui::Color32::from_rgb(224, 224, 224),
        marking: egui::Color32::BLACK,
        route_override: Some(egui::Color32::BLACK),
        monochrome_players: true,
    };
}

/// Paints `play` into `rect`, which must have the field's aspect ratio.
///
/// # Arguments
///
/// * `painter` - Painter clipped to the field area
/// * `rect` - Screen rectangle of the field
/// * `field` - Logical field size the play's coordinates refer to
/// * `play` - The play to draw
/// * `palette` - Colours to use
/// * `highlighted` - Player drawn with a selection ring, if any
pub fn paint_play(
    painter: &egui::Painter,
    rect: egui::Rect,
    field: FieldSize,
    play: &Play,
    palette: FieldPalette,
    highlighted: Option<&str>,
) {
    paint_field(painter, rect, field, palette);
    for route in &play.routes {
        let color = palette
            .route_override
            .unwrap_or_else(|| route.color.to_color32());
        paint_route(painter, rect, field, &route.path, route.style, color);
    }
    for player in &play.players {
        let highlight = highlighted == Some(player.id.as_str());
        paint_player(painter, rect, field, player, palette, highlight);
    }
}

fn paint_field(
    painter: &egui::Painter,
    rect: egui::Rect,
    field: FieldSize,
    palette: FieldPalette,
) {
    let scale = screen_scale(rect, field);
    let markings = FieldMarkings::for_field(field);
    let to_screen = |p: FieldPoint| to_screen_pos(p, rect, field);

    painter.rect_filled(rect, 0.0, palette.field);
    for (min, max) in markings.end_zones {
        let zone = egui::Rect::from_min_max(to_screen(min), to_screen(max));
        painter.rect_filled(zone, 0.0, palette.end_zone);
    }

    let line = |segment: &Segment, width: f32| {
        painter.line_segment(
            [to_screen(segment.from), to_screen(segment.to)],
            egui::Stroke::new((width * scale).max(0.5), palette.marking),
        );
    };
    for segment in &markings.yard_lines {
        line(segment, if segment.major { 2.0 } else { 1.0 });
    }
    for segment in &markings.hash_marks {
        line(segment, 1.0);
    }

    let font = egui::FontId::proportional((markings.number_size * scale).max(6.0));
    for number in &markings.numbers {
        let center = to_screen(number.at);
        let text = number.yards.to_string();
        if number.flipped {
            let galley = painter.layout_no_wrap(text, font.clone(), palette.marking);
            // Rotation pivots on the galley's top-left corner
            let pos = center + galley.size() / 2.0;
            let shape = TextShape::new(pos, galley, palette.marking);
            painter.add(shape.with_angle(std::f32::consts::PI));
        } else {
            painter.text(
                center,
                egui::Align2::CENTER_CENTER,
                text,
                font.clone(),
                palette.marking,
            );
        }
    }
}

fn paint_route(
    painter: &egui::Painter,
    rect: egui::Rect,
    field: FieldSize,
    path: &[FieldPoint],
    style: RouteStyle,
    color: egui::Color32,
) {
    let scale = screen_scale(rect, field);
    let points: Vec<egui::Pos2> = path
        .iter()
        .map(|p| to_screen_pos(*p, rect, field))
        .collect();
    let stroke = egui::Stroke::new(ROUTE_STROKE_WIDTH * scale, color);

    if points.len() == 1 {
        painter.circle_filled(points[0], stroke.width / 2.0, color);
        return;
    }
    match style {
        RouteStyle::Solid => {
            painter.add(egui::Shape::line(points, stroke));
        }
        RouteStyle::Dashed => {
            let dash = ROUTE_DASH_LENGTH * scale;
            painter.extend(egui::Shape::dashed_line(&points, stroke, dash, dash));
        }
    }
}

fn paint_player(
    painter: &egui::Painter,
    rect: egui::Rect,
    field: FieldSize,
    player: &Player,
    palette: FieldPalette,
    highlight: bool,
) {
    let scale = screen_scale(rect, field);
    let center = to_screen_pos(player.position(), rect, field);
    let radius = PLAYER_ICON_RADIUS * scale;
    let style = player.player_type.style();
    let (fill, stroke, text) = if palette.monochrome_players {
        (egui::Color32::WHITE, egui::Color32::BLACK, egui::Color32::BLACK)
    } else {
        (style.fill, style.stroke, style.text)
    };

    if highlight {
        painter.circle_stroke(
            center,
            radius + 3.0 * scale,
            egui::Stroke::new(2.0 * scale, egui::Color32::from_rgb(100, 150, 255)),
        );
    }
    painter.circle_filled(center, radius, fill);
    painter.circle_stroke(center, radius, egui::Stroke::new(2.0 * scale, stroke));

    match style.label {
        Some(label) => {
            painter.text(
                center,
                egui::Align2::CENTER_CENTER,
                label,
                egui::FontId::proportional(radius),
                text,
            );
        }
        None => {
            painter.circle_filled(center, radius * 0.3, text);
        }
    }
}

impl PlayDesignerApp {
    /// Renders the play being edited and any route in progress.
    ///
    /// # Arguments
    ///
    /// * `painter` - The egui painter for drawing operations
    /// * `field_rect` - Screen rectangle of the field
    pub fn render_field(&self, painter: &egui::Painter, field_rect: egui::Rect) {
        let field = self.editor.field();
        paint_play(
            painter,
            field_rect,
            field,
            self.editor.play(),
            FieldPalette::EDITOR,
            self.editor.dragged_player(),
        );

        if let Some((points, style, color)) = self.editor.preview_route() {
            let color = color.to_color32();
            paint_route(painter, field_rect, field, points, style, color);
        }
    }
}
