//! Editing state machine.
//!
//! [`EditorState`] is the single explicit context of the editor: the undo history,
//! the active tool and the state of the gesture in progress. The UI feeds it pointer
//! gestures already converted to field coordinates; every method runs synchronously
//! and leaves the history in a consistent state.
//!
//! Gesture rules:
//! - `Cursor`: pressing a player starts a drag. Moves rewrite the displayed snapshot in
//!   place and releasing commits the result as a single history entry.
//! - `DrawSolid` / `DrawDashed`: pressing anywhere starts a path, moves extend it, and
//!   releasing commits one route.
//! - `Eraser`: pressing a player removes it immediately.
//! - Leaving the field ends a gesture exactly like releasing the pointer.

use crate::history::History;
use crate::types::*;
use serde::{Deserialize, Serialize};

/// The active interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Tool {
    /// Select and move players
    #[default]
    Cursor,
    /// Draw solid routes
    DrawSolid,
    /// Draw dashed routes
    DrawDashed,
    /// Remove players
    Eraser,
}

impl Tool {
    /// All tools in toolbar order.
    pub const ALL: [Tool; 4] = [
        Tool::Cursor,
        Tool::DrawSolid,
        Tool::DrawDashed,
        Tool::Eraser,
    ];

    /// Route style drawn by this tool, if it is a drawing tool.
    pub fn route_style(self) -> Option<RouteStyle> {
        match self {
            Tool::DrawSolid => Some(RouteStyle::Solid),
            Tool::DrawDashed => Some(RouteStyle::Dashed),
            Tool::Cursor | Tool::Eraser => None,
        }
    }
}

/// A drag in progress.
#[derive(Debug, Clone, PartialEq)]
struct DragState {
    player_id: EntityId,
    /// Snapshot displayed when the drag started, restored before committing
    origin: Play,
}

/// Reducer-style actions accepted by [`EditorState::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    SelectTool(Tool),
    SelectColor(ColorToken),
    AddPlayer(PlayerType),
    PointerDown {
        pos: FieldPoint,
        target: Option<EntityId>,
    },
    PointerMove(FieldPoint),
    PointerUp,
    PointerLeave,
    Undo,
    Clear,
    Load(Play),
}

/// The editor's complete working state.
#[derive(Debug, Clone)]
pub struct EditorState {
    history: History,
    tool: Tool,
    drawing_color: ColorToken,
    /// Points of the route being drawn; `Some` exactly while drawing
    drawing: Option<Vec<FieldPoint>>,
    drag: Option<DragState>,
    field: FieldSize,
    erase_policy: RouteErasePolicy,
    /// Bumped on every change to the displayed play
    revision: u64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(FieldSize::default(), RouteErasePolicy::default())
    }
}

impl EditorState {
    /// Creates an editor over an empty play.
    pub fn new(field: FieldSize, erase_policy: RouteErasePolicy) -> Self {
        Self {
            history: History::default(),
            tool: Tool::default(),
            drawing_color: ColorToken::default(),
            drawing: None,
            drag: None,
            field,
            erase_policy,
            revision: 0,
        }
    }

    /// The displayed play.
    pub fn play(&self) -> &Play {
        self.history.current()
    }

    /// The undo history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The active tool.
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Colour used for new routes.
    pub fn drawing_color(&self) -> &ColorToken {
        &self.drawing_color
    }

    /// Logical field size.
    pub fn field(&self) -> FieldSize {
        self.field
    }

    /// Policy applied when erasing players.
    pub fn erase_policy(&self) -> RouteErasePolicy {
        self.erase_policy
    }

    /// Changes the erase policy for subsequent erasures.
    pub fn set_erase_policy(&mut self, policy: RouteErasePolicy) {
        self.erase_policy = policy;
    }

    /// Counter that changes whenever the displayed play changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether a route is being drawn.
    pub fn is_drawing(&self) -> bool {
        self.drawing.is_some()
    }

    /// Player being dragged, if any.
    pub fn dragged_player(&self) -> Option<&str> {
        self.drag.as_ref().map(|d| d.player_id.as_str())
    }

    /// The in-progress route with the style and colour it will be committed with.
    pub fn preview_route(&self) -> Option<(&[FieldPoint], RouteStyle, &ColorToken)> {
        let points = self.drawing.as_deref()?;
        let style = self.tool.route_style().unwrap_or_default();
        Some((points, style, &self.drawing_color))
    }

    /// Dispatches an event to the matching method.
    pub fn apply(&mut self, event: EditorEvent) {
        match event {
            EditorEvent::SelectTool(tool) => self.select_tool(tool),
            EditorEvent::SelectColor(color) => self.select_color(color),
            EditorEvent::AddPlayer(player_type) => self.add_player(player_type),
            EditorEvent::PointerDown { pos, target } => self.pointer_down(pos, target.as_deref()),
            EditorEvent::PointerMove(pos) => self.pointer_move(pos),
            EditorEvent::PointerUp => self.pointer_up(),
            EditorEvent::PointerLeave => self.pointer_leave(),
            EditorEvent::Undo => self.undo(),
            EditorEvent::Clear => self.clear_field(),
            EditorEvent::Load(play) => self.load_play(play),
        }
    }

    /// Activates a tool. Any gesture in progress is finished first.
    pub fn select_tool(&mut self, tool: Tool) {
        if self.tool == tool {
            return;
        }
        self.finish_gesture();
        self.tool = tool;
    }

    /// Sets the colour for new routes.
    pub fn select_color(&mut self, color: ColorToken) {
        self.drawing_color = color;
    }

    /// Adds a player at the field centre as one history entry.
    pub fn add_player(&mut self, player_type: PlayerType) {
        self.finish_gesture();
        let next = self
            .play()
            .add_player(player_type, self.field.center(), self.field);
        self.commit(next);
    }

    /// Removes every player and route as one history entry.
    pub fn clear_field(&mut self) {
        self.finish_gesture();
        let next = self.play().clear();
        self.commit(next);
    }

    /// Displays a loaded play as a new history entry.
    pub fn load_play(&mut self, play: Play) {
        self.finish_gesture();
        self.commit(play);
    }

    /// Steps back one history entry.
    pub fn undo(&mut self) {
        self.finish_gesture();
        if self.history.undo() {
            self.revision += 1;
        }
    }

    /// Discards all history and starts from an empty play.
    pub fn reset(&mut self) {
        self.drawing = None;
        self.drag = None;
        self.history = History::default();
        self.revision += 1;
    }

    /// Pointer pressed at `pos`, optionally over the player `target`.
    pub fn pointer_down(&mut self, pos: FieldPoint, target: Option<&str>) {
        self.finish_gesture();
        let target = target.filter(|id| self.play().player(id).is_some());

        match (self.tool, target) {
            (Tool::DrawSolid | Tool::DrawDashed, _) => {
                self.drawing = Some(vec![self.field.clamp_point(pos)]);
            }
            (Tool::Cursor, Some(id)) => {
                self.drag = Some(DragState {
                    player_id: id.to_string(),
                    origin: self.play().clone(),
                });
            }
            (Tool::Eraser, Some(id)) => {
                let next = self.play().remove_player(id, self.erase_policy);
                log::debug!("erased player {id}");
                self.commit(next);
            }
            (Tool::Cursor | Tool::Eraser, None) => {}
        }
    }

    /// Pointer moved to `pos`.
    pub fn pointer_move(&mut self, pos: FieldPoint) {
        if let Some(points) = self.drawing.as_mut() {
            let pos = self.field.clamp_point(pos);
            if points.last() != Some(&pos) {
                points.push(pos);
            }
        } else if let Some(drag) = &self.drag {
            let next = self
                .history
                .current()
                .move_player(&drag.player_id, pos.x, pos.y, self.field);
            self.history.replace_current(next);
            self.revision += 1;
        }
    }

    /// Pointer released.
    pub fn pointer_up(&mut self) {
        self.finish_gesture();
    }

    /// Pointer left the field; handled exactly like a release.
    pub fn pointer_leave(&mut self) {
        self.finish_gesture();
    }

    /// Ends any drag or drawing gesture, committing its result.
    fn finish_gesture(&mut self) {
        if let Some(points) = self.drawing.take() {
            if !points.is_empty() {
                let style = self.tool.route_style().unwrap_or_default();
                let next = self.play().add_route(
                    &points,
                    style,
                    self.drawing_color.clone(),
                    self.field,
                );
                self.commit(next);
            }
        }

        if let Some(drag) = self.drag.take() {
            let dragged = self.history.current().clone();
            if dragged != drag.origin {
                self.history.replace_current(drag.origin);
                self.commit(dragged);
            }
        }
    }

    fn commit(&mut self, play: Play) {
        self.history.commit(play);
        self.revision += 1;
    }
}
