//! Core data types of the play diagram.
//!
//! This module defines players, routes and the [`Play`] they form, together with the
//! pure operations the editor applies to a play. Every operation takes `&self` and
//! returns a new revision, which is what the undo history stores.

use crate::constants;
use crate::error::DeserializationError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Unique identifier of a player or route within a play.
pub type EntityId = String;

/// Generates a fresh entity id.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4().to_string()
}

/// A position in logical field space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldPoint {
    /// Distance from the left edge of the field
    pub x: f32,
    /// Distance from the top edge of the field
    pub y: f32,
}

impl FieldPoint {
    /// Creates a new point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: FieldPoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Orientation of the field rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldOrientation {
    /// 1200 x 533.33, end zones left and right
    #[default]
    Landscape,
    /// 533.33 x 800
    Portrait,
}

/// Logical dimensions of the field. All stored coordinates live in this space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSize {
    /// Logical width
    pub width: f32,
    /// Logical height
    pub height: f32,
}

impl Default for FieldSize {
    fn default() -> Self {
        Self::landscape()
    }
}

impl FieldSize {
    /// The landscape field used by default.
    pub const fn landscape() -> Self {
        Self {
            width: constants::LANDSCAPE_FIELD_WIDTH,
            height: constants::LANDSCAPE_FIELD_HEIGHT,
        }
    }

    /// The portrait field.
    pub const fn portrait() -> Self {
        Self {
            width: constants::PORTRAIT_FIELD_WIDTH,
            height: constants::PORTRAIT_FIELD_HEIGHT,
        }
    }

    /// Field size for an orientation.
    pub const fn for_orientation(orientation: FieldOrientation) -> Self {
        match orientation {
            FieldOrientation::Landscape => Self::landscape(),
            FieldOrientation::Portrait => Self::portrait(),
        }
    }

    /// Centre of the field, where new players are placed.
    pub fn center(&self) -> FieldPoint {
        FieldPoint::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamps a point into the field rectangle.
    pub fn clamp_point(&self, point: FieldPoint) -> FieldPoint {
        FieldPoint::new(
            point.x.clamp(0.0, self.width),
            point.y.clamp(0.0, self.height),
        )
    }

    /// Clamps a player centre so the whole icon stays on the field.
    pub fn clamp_player(&self, point: FieldPoint) -> FieldPoint {
        let r = constants::PLAYER_ICON_RADIUS;
        FieldPoint::new(
            point.x.clamp(r, self.width - r),
            point.y.clamp(r, self.height - r),
        )
    }
}

/// Role or colour tag of a player, which also selects its icon style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerType {
    /// Quarterback, drawn with a "QB" label
    #[serde(rename = "qb")]
    Quarterback,
    Red,
    Blue,
    Yellow,
    Green,
    Offense,
    Defense,
}

impl PlayerType {
    /// All player types in palette order.
    pub const ALL: [PlayerType; 7] = [
        PlayerType::Quarterback,
        PlayerType::Red,
        PlayerType::Blue,
        PlayerType::Yellow,
        PlayerType::Green,
        PlayerType::Offense,
        PlayerType::Defense,
    ];
}

/// A player icon on the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier within the play
    pub id: EntityId,
    /// Horizontal centre in field units
    pub x: f32,
    /// Vertical centre in field units
    pub y: f32,
    /// Role/colour tag
    #[serde(rename = "type")]
    pub player_type: PlayerType,
}

impl Player {
    /// Centre of the icon.
    pub fn position(&self) -> FieldPoint {
        FieldPoint::new(self.x, self.y)
    }

    /// Whether a point falls inside the icon circle.
    pub fn contains(&self, point: FieldPoint) -> bool {
        self.position().distance(point) <= constants::PLAYER_ICON_RADIUS
    }
}

/// Line style of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RouteStyle {
    #[default]
    Solid,
    Dashed,
}

/// Opaque colour token stored with a route.
///
/// Palette tokens are provided as constructors; any other string is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorToken(pub String);

impl Default for ColorToken {
    fn default() -> Self {
        Self::accent()
    }
}

impl ColorToken {
    /// Theme accent, the default drawing colour.
    pub fn accent() -> Self {
        Self(constants::COLOR_ACCENT.to_string())
    }

    /// The fixed drawing palette offered by the editor.
    pub fn palette() -> Vec<ColorToken> {
        [
            constants::COLOR_ACCENT,
            constants::COLOR_RED,
            constants::COLOR_BLUE,
            constants::COLOR_YELLOW,
            constants::COLOR_GREEN,
            constants::COLOR_BLACK,
            constants::COLOR_WHITE,
        ]
        .iter()
        .map(|token| ColorToken(token.to_string()))
        .collect()
    }

    /// The raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A drawn route. Immutable once committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Unique identifier within the play
    pub id: EntityId,
    /// Points of the path, never empty; serialized as `M x y L x y ...`
    #[serde(with = "path_codec")]
    pub path: Vec<FieldPoint>,
    /// Line style
    pub style: RouteStyle,
    /// Colour token
    pub color: ColorToken,
}

impl Route {
    /// First point of the path.
    pub fn start(&self) -> Option<FieldPoint> {
        self.path.first().copied()
    }
}

/// Policy deciding which routes disappear when a player is erased.
///
/// Routes carry no owner, so ownership is inferred from where they start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RouteErasePolicy {
    /// Routes are never removed with a player
    KeepRoutes,
    /// Routes whose first point lies within `radius` of the erased player are removed
    NearStart {
        /// Proximity threshold in field units
        radius: f32,
    },
}

impl Default for RouteErasePolicy {
    fn default() -> Self {
        RouteErasePolicy::NearStart {
            radius: constants::ROUTE_ERASE_PROXIMITY,
        }
    }
}

/// The working diagram: the unit that is undone and saved.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Play {
    /// Players in drawing order
    pub players: Vec<Player>,
    /// Routes in drawing order
    pub routes: Vec<Route>,
}

impl Play {
    /// Creates an empty play.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the play has no players and no routes.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.routes.is_empty()
    }

    /// Serializes the play to the diagram JSON stored with a saved play.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses a diagram blob.
    ///
    /// Blobs with non-finite coordinates or with two entities sharing an id are
    /// rejected. Positions are not clamped here; see [`Play::fitted_to`].
    pub fn from_json(json: &str) -> Result<Self, DeserializationError> {
        let play: Play = serde_json::from_str(json)?;
        play.check_entities()?;
        Ok(play)
    }

    fn check_entities(&self) -> Result<(), DeserializationError> {
        let mut ids = HashSet::new();
        for player in &self.players {
            if !player.x.is_finite() || !player.y.is_finite() {
                return Err(DeserializationError::NonFinite(player.id.clone()));
            }
            if !ids.insert(player.id.as_str()) {
                return Err(DeserializationError::DuplicateId(player.id.clone()));
            }
        }
        for route in &self.routes {
            if !route.path.iter().all(FieldPoint::is_finite) {
                return Err(DeserializationError::NonFinite(route.id.clone()));
            }
            if !ids.insert(route.id.as_str()) {
                return Err(DeserializationError::DuplicateId(route.id.clone()));
            }
        }
        Ok(())
    }

    /// Clamps every player and route point onto `field`.
    ///
    /// Plays saved on a field of the other orientation keep their coordinates, so they
    /// are fitted before they reach the editor.
    pub fn fitted_to(&self, field: FieldSize) -> Play {
        let mut next = self.clone();
        for player in &mut next.players {
            let clamped = field.clamp_player(player.position());
            player.x = clamped.x;
            player.y = clamped.y;
        }
        for route in &mut next.routes {
            for point in &mut route.path {
                *point = field.clamp_point(*point);
            }
        }
        next
    }

    /// Looks up a player by id.
    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Returns the topmost player whose icon contains `point`.
    pub fn player_at(&self, point: FieldPoint) -> Option<&Player> {
        self.players.iter().rev().find(|p| p.contains(point))
    }

    /// Appends a new player of the given type at `position`, clamped onto the field.
    pub fn add_player(
        &self,
        player_type: PlayerType,
        position: FieldPoint,
        field: FieldSize,
    ) -> Play {
        let position = field.clamp_player(position);
        let mut next = self.clone();
        next.players.push(Player {
            id: new_entity_id(),
            x: position.x,
            y: position.y,
            player_type,
        });
        next
    }

    /// Appends a new route. An empty point list leaves the play unchanged.
    pub fn add_route(
        &self,
        points: &[FieldPoint],
        style: RouteStyle,
        color: ColorToken,
        field: FieldSize,
    ) -> Play {
        let mut next = self.clone();
        if points.is_empty() {
            return next;
        }
        next.routes.push(Route {
            id: new_entity_id(),
            path: points
                .iter()
                .map(|p| field.clamp_point(*p))
                .collect(),
            style,
            color,
        });
        next
    }

    /// Moves one player, clamped onto the field. Unknown ids are a no-op.
    pub fn move_player(&self, id: &str, x: f32, y: f32, field: FieldSize) -> Play {
        let mut next = self.clone();
        if let Some(player) = next.players.iter_mut().find(|p| p.id == id) {
            let clamped = field.clamp_player(FieldPoint::new(x, y));
            player.x = clamped.x;
            player.y = clamped.y;
        }
        next
    }

    /// Removes a player and, depending on `policy`, the routes that start near it.
    pub fn remove_player(&self, id: &str, policy: RouteErasePolicy) -> Play {
        let mut next = self.clone();
        let Some(removed) = self.player(id) else {
            return next;
        };
        let origin = removed.position();
        next.players.retain(|p| p.id != id);
        if let RouteErasePolicy::NearStart { radius } = policy {
            next.routes.retain(|route| match route.start() {
                Some(start) => start.distance(origin) >= radius,
                None => true,
            });
        }
        next
    }

    /// An empty play.
    pub fn clear(&self) -> Play {
        Play::new()
    }
}

/// Serde adapter storing a point list as an SVG path string.
pub mod path_codec {
    use super::FieldPoint;
    use crate::error::DeserializationError;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Formats points as `M x0 y0 L x1 y1 ...`.
    pub fn to_path_string(points: &[FieldPoint]) -> String {
        let mut out = String::new();
        for (i, p) in points.iter().enumerate() {
            if i == 0 {
                out.push_str(&format!("M {} {}", p.x, p.y));
            } else {
                out.push_str(&format!(" L {} {}", p.x, p.y));
            }
        }
        out
    }

    /// Parses a move-then-line path string. Commas are accepted as separators.
    pub fn parse_path_string(path: &str) -> Result<Vec<FieldPoint>, DeserializationError> {
        let fail = |reason: &str| DeserializationError::Path {
            path: path.to_string(),
            reason: reason.to_string(),
        };
        let normalized = path.replace(',', " ");
        let mut tokens = normalized.split_whitespace().peekable();
        let mut points = Vec::new();

        while let Some(token) = tokens.next() {
            let mut chars = token.chars();
            let command = chars.next();
            let inline = chars.as_str();
            match (command, points.is_empty()) {
                (Some('M'), true) | (Some('L'), false) => {}
                (Some('M'), false) => return Err(fail("move command after the first point")),
                (Some('L'), true) => return Err(fail("path must start with a move command")),
                _ => return Err(fail("unsupported path command")),
            }
            let x_token = if inline.is_empty() {
                tokens.next().ok_or_else(|| fail("missing x coordinate"))?
            } else {
                inline
            };
            let y_token = tokens.next().ok_or_else(|| fail("missing y coordinate"))?;
            let x: f32 = x_token.parse().map_err(|_| fail("x is not a number"))?;
            let y: f32 = y_token.parse().map_err(|_| fail("y is not a number"))?;
            if !x.is_finite() || !y.is_finite() {
                return Err(fail("coordinates must be finite"));
            }
            points.push(FieldPoint::new(x, y));
        }

        if points.is_empty() {
            return Err(fail("path has no points"));
        }
        Ok(points)
    }

    pub fn serialize<S: Serializer>(
        points: &[FieldPoint],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_path_string(points))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<FieldPoint>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_path_string(&raw).map_err(serde::de::Error::custom)
    }
}
