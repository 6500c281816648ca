//! Style lookup tables.
//!
//! Player icons, tool buttons and route colours are resolved through fixed tables keyed
//! by their enum or token, so rendering code never branches on the variant itself.

use crate::editor::Tool;
use crate::types::{ColorToken, PlayerType};
use eframe::egui::Color32;

/// How a player icon is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerStyle {
    /// Circle fill
    pub fill: Color32,
    /// Circle outline
    pub stroke: Color32,
    /// Label or glyph colour
    pub text: Color32,
    /// Text drawn inside the circle; `None` draws a filled dot instead
    pub label: Option<&'static str>,
    /// Name shown in the palette
    pub name: &'static str,
}

/// How a tool button is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolStyle {
    pub icon: &'static str,
    pub label: &'static str,
    pub hint: &'static str,
}

/// Player styles, indexed in [`PlayerType::ALL`] order.
const PLAYER_STYLES: [(PlayerType, PlayerStyle); 7] = [
    (
        PlayerType::Quarterback,
        PlayerStyle {
            fill: Color32::from_rgb(229, 231, 235),
            stroke: Color32::BLACK,
            text: Color32::BLACK,
            label: Some("QB"),
            name: "Quarterback",
        },
    ),
    (
        PlayerType::Red,
        PlayerStyle {
            fill: Color32::from_rgb(239, 68, 68),
            stroke: Color32::from_rgb(252, 165, 165),
            text: Color32::WHITE,
            label: None,
            name: "Red",
        },
    ),
    (
        PlayerType::Blue,
        PlayerStyle {
            fill: Color32::from_rgb(59, 130, 246),
            stroke: Color32::from_rgb(147, 197, 253),
            text: Color32::WHITE,
            label: None,
            name: "Blue",
        },
    ),
    (
        PlayerType::Yellow,
        PlayerStyle {
            fill: Color32::from_rgb(250, 204, 21),
            stroke: Color32::from_rgb(254, 240, 138),
            text: Color32::BLACK,
            label: None,
            name: "Yellow",
        },
    ),
    (
        PlayerType::Green,
        PlayerStyle {
            fill: Color32::from_rgb(34, 197, 94),
            stroke: Color32::from_rgb(134, 239, 172),
            text: Color32::WHITE,
            label: None,
            name: "Green",
        },
    ),
    (
        PlayerType::Offense,
        PlayerStyle {
            fill: Color32::WHITE,
            stroke: Color32::BLACK,
            text: Color32::BLACK,
            label: Some("O"),
            name: "Offense",
        },
    ),
    (
        PlayerType::Defense,
        PlayerStyle {
            fill: Color32::from_rgb(31, 41, 55),
            stroke: Color32::WHITE,
            text: Color32::WHITE,
            label: Some("X"),
            name: "Defense",
        },
    ),
];

/// Tool styles, indexed in [`Tool::ALL`] order.
const TOOL_STYLES: [(Tool, ToolStyle); 4] = [
    (
        Tool::Cursor,
        ToolStyle {
            icon: "🖱",
            label: "Select",
            hint: "Drag players around the field",
        },
    ),
    (
        Tool::DrawSolid,
        ToolStyle {
            icon: "✏",
            label: "Route",
            hint: "Draw a solid route",
        },
    ),
    (
        Tool::DrawDashed,
        ToolStyle {
            icon: "┅",
            label: "Motion",
            hint: "Draw a dashed route",
        },
    ),
    (
        Tool::Eraser,
        ToolStyle {
            icon: "⌫",
            label: "Erase",
            hint: "Click a player to remove it",
        },
    ),
];

/// Fallback for the theme accent token and for unknown tokens.
pub const ACCENT_COLOR: Color32 = Color32::from_rgb(245, 158, 11);

/// Turf colour of the editing field.
pub const FIELD_COLOR: Color32 = Color32::from_rgb(22, 101, 52);
/// End zone colour of the editing field.
pub const END_ZONE_COLOR: Color32 = Color32::from_rgb(20, 83, 45);
/// Colour of yard lines, numbers and hash marks.
pub const MARKING_COLOR: Color32 = Color32::from_rgb(240, 253, 244);

impl PlayerType {
    /// Style descriptor of this player type.
    pub fn style(self) -> &'static PlayerStyle {
        &PLAYER_STYLES[self as usize].1
    }
}

impl Tool {
    /// Style descriptor of this tool.
    pub fn style(self) -> &'static ToolStyle {
        &TOOL_STYLES[self as usize].1
    }
}

impl ColorToken {
    /// Screen colour of the token. Tokens other than `#rrggbb` render with the accent.
    pub fn to_color32(&self) -> Color32 {
        parse_hex(self.as_str()).unwrap_or(ACCENT_COLOR)
    }
}

fn parse_hex(token: &str) -> Option<Color32> {
    let hex = token.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    let (r, g, b) = (channel(0..2)?, channel(2..4)?, channel(4..6)?);
    Some(Color32::from_rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;

    #[test]
    fn tables_line_up_with_variant_order() {
        for (i, player_type) in PlayerType::ALL.iter().enumerate() {
            assert_eq!(PLAYER_STYLES[i].0, *player_type);
        }
        for (i, tool) in Tool::ALL.iter().enumerate() {
            assert_eq!(TOOL_STYLES[i].0, *tool);
        }
    }

    #[test]
    fn quarterback_is_labelled() {
        assert_eq!(PlayerType::Quarterback.style().label, Some("QB"));
        assert_eq!(PlayerType::Red.style().label, None);
    }

    #[test]
    fn palette_tokens_resolve() {
        assert_eq!(
            ColorToken(constants::COLOR_RED.into()).to_color32(),
            Color32::from_rgb(0xef, 0x44, 0x44)
        );
        assert_eq!(ColorToken::accent().to_color32(), ACCENT_COLOR);
        assert_eq!(ColorToken("chartreuse".into()).to_color32(), ACCENT_COLOR);
        assert_eq!(ColorToken("#12345".into()).to_color32(), ACCENT_COLOR);
    }
}
