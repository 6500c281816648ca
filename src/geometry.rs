//! Conversions between screen space and logical field space.

use crate::types::{FieldPoint, FieldSize};
use eframe::egui;

/// Pointer position reported by an input source.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    /// Mouse or pen pointer at a screen position
    Mouse(egui::Pos2),
    /// Active touch points; only the first one is used
    Touch(Vec<egui::Pos2>),
}

impl PointerInput {
    /// The screen position that drives the editor, if any.
    pub fn primary_pos(&self) -> Option<egui::Pos2> {
        match self {
            PointerInput::Mouse(pos) => Some(*pos),
            PointerInput::Touch(points) => points.first().copied(),
        }
    }
}

/// Maps a pointer position into field coordinates by linear scaling against the
/// rendered field rectangle.
///
/// Returns the origin when the field has not been laid out yet, when its rectangle is
/// degenerate, or when a touch event carries no touch points.
pub fn to_field_coords(
    pointer: &PointerInput,
    field_rect: Option<egui::Rect>,
    field: FieldSize,
) -> FieldPoint {
    let (Some(rect), Some(pos)) = (field_rect, pointer.primary_pos()) else {
        return FieldPoint::default();
    };
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return FieldPoint::default();
    }
    FieldPoint::new(
        (pos.x - rect.left()) / rect.width() * field.width,
        (pos.y - rect.top()) / rect.height() * field.height,
    )
}

/// Inverse of [`to_field_coords`]: places a field point inside the rendered rectangle.
pub fn to_screen_pos(point: FieldPoint, field_rect: egui::Rect, field: FieldSize) -> egui::Pos2 {
    egui::pos2(
        field_rect.left() + point.x / field.width * field_rect.width(),
        field_rect.top() + point.y / field.height * field_rect.height(),
    )
}

/// Screen points per field unit for a rendered rectangle.
pub fn screen_scale(field_rect: egui::Rect, field: FieldSize) -> f32 {
    field_rect.width() / field.width
}

/// Largest rectangle with the field's aspect ratio that fits in `available`, centred.
pub fn fit_field_rect(available: egui::Rect, field: FieldSize) -> egui::Rect {
    let aspect = field.width / field.height;
    let mut size = available.size();
    if size.x / size.y.max(f32::EPSILON) > aspect {
        size.x = size.y * aspect;
    } else {
        size.y = size.x / aspect;
    }
    egui::Rect::from_center_size(available.center(), size)
}

/// A straight marking line in field units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: FieldPoint,
    pub to: FieldPoint,
    /// Every tenth yard is drawn heavier
    pub major: bool,
}

/// A yard number painted on the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YardNumber {
    pub at: FieldPoint,
    pub yards: u32,
    /// Numbers on the far sideline read upside down
    pub flipped: bool,
}

/// Field markings laid out for a field size.
///
/// The field is 120 yards long (two 10 yard end zones) along its longer side and the
/// markings follow that axis in either orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMarkings {
    /// End zones as (min, max) corners
    pub end_zones: [(FieldPoint, FieldPoint); 2],
    pub yard_lines: Vec<Segment>,
    pub numbers: Vec<YardNumber>,
    pub hash_marks: Vec<Segment>,
    /// Size of yard numbers in field units
    pub number_size: f32,
}

impl FieldMarkings {
    pub fn for_field(field: FieldSize) -> Self {
        let landscape = field.width >= field.height;
        let (long, short) = if landscape {
            (field.width, field.height)
        } else {
            (field.height, field.width)
        };
        let yard = long / 120.0;
        let at = |along: f32, across: f32| {
            if landscape {
                FieldPoint::new(along, across)
            } else {
                FieldPoint::new(across, along)
            }
        };

        let end_zones = [
            (at(0.0, 0.0), at(10.0 * yard, short)),
            (at(110.0 * yard, 0.0), at(long, short)),
        ];

        let yard_lines = (0..19)
            .map(|i| {
                let along = (15 + i * 5) as f32 * yard;
                Segment {
                    from: at(along, 0.0),
                    to: at(along, short),
                    major: (i + 1) % 2 == 0,
                }
            })
            .collect();

        let number_inset = short * 0.09;
        let numbers = [10, 20, 30, 40, 50, 40, 30, 20, 10]
            .iter()
            .enumerate()
            .flat_map(|(i, &yards)| {
                let along = (20 + i * 10) as f32 * yard;
                [
                    YardNumber {
                        at: at(along, number_inset),
                        yards,
                        flipped: false,
                    },
                    YardNumber {
                        at: at(along, short - number_inset),
                        yards,
                        flipped: true,
                    },
                ]
            })
            .collect();

        // Sideline ticks plus the two inbounds hash rows at one third of the width
        let hash_len = short * 0.018;
        let rows = [
            0.002 * short,
            short - 0.002 * short - hash_len,
            short / 3.0,
            short * 2.0 / 3.0 - hash_len,
        ];
        let hash_marks = (0..100)
            .flat_map(|i| {
                let along = (10 + i) as f32 * yard;
                rows.map(|across| Segment {
                    from: at(along, across),
                    to: at(along, across + hash_len),
                    major: false,
                })
            })
            .collect();

        Self {
            end_zones,
            yard_lines,
            numbers,
            hash_marks,
            number_size: short * 0.06,
        }
    }
}
