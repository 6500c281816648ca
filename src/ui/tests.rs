use super::notifications::NotificationKind;
use super::state::{BackgroundResult, PlayDesignerApp, Preferences};
use crate::advisor::tests::ScriptedAdvisor;
use crate::advisor::{RequestState, SuggestPlayResponse};
use crate::config::AppConfig;
use crate::editor::Tool;
use crate::error::{ExportError, StoreError};
use crate::geometry::to_screen_pos;
use crate::print::PrintView;
use crate::store::{MemoryPlayStore, PlayStore, PlaybookScope, SavedPlay};
use crate::types::{FieldPoint, Play, PlayerType, RouteStyle};
use eframe::egui;
use std::sync::atomic::Ordering;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

fn screen_rect() -> egui::Rect {
    egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(1200.0, 800.0))
}

fn test_app() -> PlayDesignerApp {
    PlayDesignerApp::new(
        AppConfig::default(),
        Arc::new(MemoryPlayStore::new()),
        Arc::new(ScriptedAdvisor::default()),
    )
}

/// Drives the field canvas across frames on one egui context so pointer state persists.
struct FieldHarness {
    ctx: egui::Context,
    app: PlayDesignerApp,
}

impl FieldHarness {
    fn new(app: PlayDesignerApp) -> Self {
        let mut harness = Self {
            ctx: egui::Context::default(),
            app,
        };
        // First frame lays out the field
        harness.frame(Vec::new());
        harness
    }

    fn frame(&mut self, events: Vec<egui::Event>) {
        let mut raw = egui::RawInput::default();
        raw.screen_rect = Some(screen_rect());
        raw.events = events;
        let app = &mut self.app;
        let _ = self.ctx.run(raw, |ctx| {
            ctx.set_visuals(egui::Visuals::dark());
            egui::CentralPanel::default().show(ctx, |ui| {
                app.draw_field(ui);
            });
        });
    }

    /// Screen position of a field point in the current layout.
    fn screen(&self, point: FieldPoint) -> egui::Pos2 {
        let rect = self.app.canvas.field_rect.expect("field laid out");
        to_screen_pos(point, rect, self.app.editor.field())
    }

    fn press(&mut self, point: FieldPoint) {
        let pos = self.screen(point);
        self.frame(vec![
            egui::Event::PointerMoved(pos),
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed: true,
                modifiers: egui::Modifiers::NONE,
            },
        ]);
    }

    fn move_to(&mut self, point: FieldPoint) {
        let pos = self.screen(point);
        self.frame(vec![egui::Event::PointerMoved(pos)]);
    }

    fn release(&mut self, point: FieldPoint) {
        let pos = self.screen(point);
        self.frame(vec![egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed: false,
            modifiers: egui::Modifiers::NONE,
        }]);
    }
}

#[test]
fn dragging_a_player_commits_one_history_entry() {
    let mut app = test_app();
    app.editor.add_player(PlayerType::Quarterback);
    let start = app.editor.play().players[0].position();
    let mut harness = FieldHarness::new(app);

    harness.press(start);
    assert!(harness.app.editor.dragged_player().is_some());
    harness.move_to(FieldPoint::new(500.0, 200.0));
    harness.move_to(FieldPoint::new(300.0, 200.0));
    harness.release(FieldPoint::new(300.0, 200.0));

    let editor = &harness.app.editor;
    assert!(editor.dragged_player().is_none());
    assert_eq!(editor.history().len(), 3);
    let moved = editor.play().players[0].position();
    assert!((moved.x - 300.0).abs() < 0.5, "x was {}", moved.x);
    assert!((moved.y - 200.0).abs() < 0.5, "y was {}", moved.y);
}

#[test]
fn drawing_a_dashed_route_with_the_pointer() {
    let mut app = test_app();
    app.editor.select_tool(Tool::DrawDashed);
    let mut harness = FieldHarness::new(app);

    harness.press(FieldPoint::new(100.0, 100.0));
    harness.move_to(FieldPoint::new(150.0, 120.0));
    harness.move_to(FieldPoint::new(200.0, 180.0));
    assert!(harness.app.editor.preview_route().is_some());
    harness.release(FieldPoint::new(200.0, 180.0));

    let play = harness.app.editor.play();
    assert_eq!(play.routes.len(), 1);
    assert_eq!(play.routes[0].style, RouteStyle::Dashed);
    assert_eq!(play.routes[0].path.len(), 3);
    let start = play.routes[0].path[0];
    assert!(start.distance(FieldPoint::new(100.0, 100.0)) < 0.5);
    assert!(harness.app.editor.preview_route().is_none());
}

#[test]
fn leaving_the_field_finishes_the_route() {
    let mut app = test_app();
    app.editor.select_tool(Tool::DrawSolid);
    let mut harness = FieldHarness::new(app);

    harness.press(FieldPoint::new(100.0, 100.0));
    harness.move_to(FieldPoint::new(160.0, 100.0));
    let field_rect = harness.app.canvas.field_rect.expect("field laid out");
    let outside = field_rect.center_bottom() + egui::vec2(0.0, 50.0);
    harness.frame(vec![egui::Event::PointerMoved(outside)]);

    assert!(!harness.app.editor.is_drawing());
    assert_eq!(harness.app.editor.play().routes.len(), 1);
}

#[test]
fn eraser_click_removes_the_player() {
    let mut app = test_app();
    app.editor.add_player(PlayerType::Red);
    app.editor.select_tool(Tool::Eraser);
    let at = app.editor.play().players[0].position();
    let mut harness = FieldHarness::new(app);

    harness.press(at);
    harness.release(at);

    assert!(harness.app.editor.play().players.is_empty());
    assert_eq!(harness.app.editor.history().len(), 3);
}

#[test]
fn clicks_are_ignored_while_a_dialog_is_open() {
    let mut app = test_app();
    app.editor.select_tool(Tool::DrawSolid);
    app.save_dialog.open = true;
    let mut harness = FieldHarness::new(app);

    harness.press(FieldPoint::new(100.0, 100.0));
    harness.release(FieldPoint::new(100.0, 100.0));

    assert!(harness.app.editor.play().routes.is_empty());
}

#[test]
fn saving_updates_the_playbook_list() {
    let ctx = egui::Context::default();
    let mut app = test_app();
    app.sign_in(Some("coach"));
    app.handle_background_results(&ctx);
    assert_eq!(app.playbook.plays.as_ref().map(Vec::len), Some(0));

    app.editor.add_player(PlayerType::Quarterback);
    assert!(app.has_unsaved_changes());
    app.open_save_dialog(0.0);
    app.save_dialog.name = "  Blitz ".to_string();
    app.submit_save(&ctx);
    app.handle_background_results(&ctx);

    let plays = app.playbook.plays.as_ref().expect("list received");
    assert_eq!(plays.len(), 1);
    assert_eq!(plays[0].name, "Blitz");
    assert!(!app.has_unsaved_changes());
    assert!(!app.save_dialog.open);
}

#[test]
fn empty_play_name_keeps_the_dialog_open() {
    let ctx = egui::Context::default();
    let mut app = test_app();
    app.sign_in(Some("coach"));
    app.open_save_dialog(0.0);
    app.save_dialog.name = "   ".to_string();

    app.submit_save(&ctx);
    app.handle_background_results(&ctx);

    assert!(app.save_dialog.open);
    assert_eq!(
        app.save_dialog.error.as_deref(),
        Some("Play name cannot be empty.")
    );
    let scope = app.scope().expect("signed in");
    assert!(app.store.list(&scope).unwrap().is_empty());
}

#[test]
fn saving_requires_a_session() {
    let mut app = test_app();

    app.open_save_dialog(0.0);

    assert!(!app.save_dialog.open);
    assert_eq!(app.notifications.items().len(), 1);
    assert_eq!(app.notifications.items()[0].kind, NotificationKind::Error);
}

#[test]
fn sign_out_keeps_the_play_and_drops_the_list() {
    let ctx = egui::Context::default();
    let mut app = test_app();
    app.sign_in(None);
    app.handle_background_results(&ctx);
    app.editor.add_player(PlayerType::Blue);

    app.sign_out();

    assert!(app.playbook.plays.is_none());
    assert!(app.preferences.user_id.is_none());
    assert_eq!(app.editor.play().players.len(), 1);
}

#[test]
fn empty_formation_fails_without_calling_the_advisor() {
    let ctx = egui::Context::default();
    let advisor = Arc::new(ScriptedAdvisor::default());
    let mut app = PlayDesignerApp::new(
        AppConfig::default(),
        Arc::new(MemoryPlayStore::new()),
        advisor.clone(),
    );
    app.suggestion.formation = "  ".to_string();

    app.request_suggestion(&ctx);
    app.handle_background_results(&ctx);

    assert!(matches!(
        app.suggestion.request.state(),
        RequestState::Failed(_)
    ));
    assert_eq!(advisor.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn suggestion_result_is_shown() {
    let ctx = egui::Context::default();
    let mut app = test_app();
    app.suggestion.formation = "Nickel".to_string();

    app.request_suggestion(&ctx);
    app.handle_background_results(&ctx);

    match app.suggestion.request.state() {
        RequestState::Ready(response) => {
            assert_eq!(response.suggested_play, "Four Verticals");
            assert_eq!(response.rationale, "Stretches Nickel deep");
        }
        other => panic!("unexpected state {other:?}"),
    }
}

#[test]
fn stale_suggestion_is_dropped() {
    let ctx = egui::Context::default();
    let mut app = test_app();
    let first = app.suggestion.request.begin();
    let second = app.suggestion.request.begin();
    let answer = |play: &str| SuggestPlayResponse {
        suggested_play: play.to_string(),
        rationale: "because".to_string(),
    };

    app.background_sender
        .send(BackgroundResult::Suggestion {
            generation: second,
            outcome: Ok(answer("Slant")),
        })
        .unwrap();
    app.background_sender
        .send(BackgroundResult::Suggestion {
            generation: first,
            outcome: Ok(answer("Draw")),
        })
        .unwrap();
    app.handle_background_results(&ctx);

    match app.suggestion.request.state() {
        RequestState::Ready(response) => assert_eq!(response.suggested_play, "Slant"),
        other => panic!("unexpected state {other:?}"),
    }
}

#[test]
fn summary_of_an_empty_playbook_is_rejected() {
    let ctx = egui::Context::default();
    let mut app = test_app();
    app.sign_in(Some("coach"));
    app.handle_background_results(&ctx);

    app.request_summary(&ctx);

    assert!(matches!(app.summary.state(), RequestState::Failed(_)));
}

fn malformed(name: &str) -> SavedPlay {
    let mut saved = SavedPlay::new(&Play::new(), name).unwrap();
    saved.diagram = "{\"players\": [".to_string();
    saved
}

#[test]
fn loading_a_malformed_play_leaves_the_editor_alone() {
    let mut app = test_app();
    app.editor.add_player(PlayerType::Green);
    let before = app.editor.play().clone();
    let history = app.editor.history().len();

    app.load_saved_play(&malformed("Broken"), 0.0);

    assert_eq!(app.editor.play(), &before);
    assert_eq!(app.editor.history().len(), history);
    assert_eq!(app.notifications.items()[0].kind, NotificationKind::Error);
}

#[test]
fn loading_a_saved_play_is_undoable() {
    let mut app = test_app();
    let play = Play::new().add_player(
        PlayerType::Defense,
        FieldPoint::new(400.0, 100.0),
        app.editor.field(),
    );
    let saved = SavedPlay::new(&play, "Zone").unwrap();

    app.load_saved_play(&saved, 0.0);
    assert_eq!(app.editor.play(), &play);
    assert!(!app.has_unsaved_changes());

    app.editor.undo();
    assert!(app.editor.play().is_empty());
}

#[test]
fn loading_a_play_with_shared_ids_leaves_the_editor_alone() {
    let mut app = test_app();
    app.editor.add_player(PlayerType::Green);
    let before = app.editor.play().clone();
    let mut saved = SavedPlay::new(&Play::new(), "Twins").unwrap();
    saved.diagram = r#"{"players":[
        {"id":"a","x":5000,"y":-40,"type":"red"},
        {"id":"a","x":100,"y":100,"type":"red"}],"routes":[]}"#
        .to_string();

    app.load_saved_play(&saved, 0.0);

    assert_eq!(app.editor.play(), &before);
    assert_eq!(app.notifications.items()[0].kind, NotificationKind::Error);
}

#[test]
fn loaded_off_field_player_is_clamped_and_erased_alone() {
    let mut app = test_app();
    let mut saved = SavedPlay::new(&Play::new(), "Wide").unwrap();
    saved.diagram = r#"{"players":[
        {"id":"a","x":5000,"y":-40,"type":"red"},
        {"id":"b","x":100,"y":100,"type":"blue"}],
        "routes":[{"id":"r","path":"M 400 100 L 9000 9000","style":"solid","color":"x"}]}"#
        .to_string();

    app.load_saved_play(&saved, 0.0);

    let field = app.editor.field();
    let r = crate::constants::PLAYER_ICON_RADIUS;
    let play = app.editor.play();
    let corner = FieldPoint::new(field.width - r, r);
    assert_eq!(play.players[0].position(), corner);
    assert_eq!(
        play.routes[0].path[1],
        FieldPoint::new(field.width, field.height)
    );

    app.editor.select_tool(Tool::Eraser);
    app.editor.pointer_down(corner, Some("a"));
    app.editor.pointer_up();

    assert_eq!(app.editor.play().players.len(), 1);
    assert_eq!(app.editor.play().players[0].id, "b");
}

/// Store returning one fixed play and refusing writes.
struct FixedStore(SavedPlay);

impl PlayStore for FixedStore {
    fn save(&self, _: &PlaybookScope, _: &Play, _: &str) -> Result<SavedPlay, StoreError> {
        Err(StoreError::Write("read only".to_string()))
    }

    fn list(&self, _: &PlaybookScope) -> Result<Vec<SavedPlay>, StoreError> {
        Ok(vec![self.0.clone()])
    }

    fn get(&self, _: &PlaybookScope, play_id: &str) -> Result<Option<SavedPlay>, StoreError> {
        Ok((self.0.id == play_id).then(|| self.0.clone()))
    }

    fn subscribe(&self, _: &PlaybookScope) -> Receiver<Vec<SavedPlay>> {
        let (sender, receiver) = channel();
        let _ = sender.send(vec![self.0.clone()]);
        receiver
    }
}

#[test]
fn failed_save_is_reported_and_keeps_the_play() {
    let ctx = egui::Context::default();
    let mut app = PlayDesignerApp::new(
        AppConfig::default(),
        Arc::new(FixedStore(malformed("Existing"))),
        Arc::new(ScriptedAdvisor::default()),
    );
    app.sign_in(Some("coach"));
    app.handle_background_results(&ctx);
    app.editor.add_player(PlayerType::Quarterback);
    let before = app.editor.play().clone();
    let history = app.editor.history().len();

    app.open_save_dialog(0.0);
    app.save_dialog.name = "Blitz".to_string();
    app.submit_save(&ctx);
    app.handle_background_results(&ctx);

    let errors: Vec<_> = app
        .notifications
        .items()
        .iter()
        .filter(|n| n.kind == NotificationKind::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("read only"));
    assert_eq!(app.editor.play(), &before);
    assert_eq!(app.editor.history().len(), history);
    assert!(app.has_unsaved_changes());
    assert_eq!(app.playbook.plays.as_ref().map(Vec::len), Some(1));
}

#[test]
fn failed_export_is_reported() {
    let ctx = egui::Context::default();
    let mut app = test_app();
    let failure = ExportError::Io("disk full".to_string());
    app.background_sender
        .send(BackgroundResult::Exported(Err(failure)))
        .unwrap();
    app.background_sender
        .send(BackgroundResult::Exported(Ok(None)))
        .unwrap();

    app.handle_background_results(&ctx);

    assert_eq!(app.notifications.items().len(), 1);
    assert_eq!(app.notifications.items()[0].kind, NotificationKind::Error);
    assert!(app.notifications.items()[0].message.contains("disk full"));
}

#[test]
fn print_view_of_a_malformed_play_is_unavailable() {
    let saved = malformed("Broken");
    let id = saved.id.clone();
    let mut app = PlayDesignerApp::new(
        AppConfig::default(),
        Arc::new(FixedStore(saved)),
        Arc::new(ScriptedAdvisor::default()),
    );
    app.sign_in(Some("coach"));

    app.open_print_view(&id);

    let print = app.print.as_ref().expect("print window open");
    assert_eq!(print.view, PrintView::Unavailable);
}

#[test]
fn print_view_of_an_unknown_play_is_unavailable() {
    let mut app = test_app();
    app.sign_in(Some("coach"));

    app.open_print_view("missing");

    assert_eq!(
        app.print.as_ref().map(|p| p.view.clone()),
        Some(PrintView::Unavailable)
    );
}

#[test]
fn full_frame_renders_with_open_windows() {
    let ctx = egui::Context::default();
    let saved = SavedPlay::new(
        &Play::new().add_player(
            PlayerType::Quarterback,
            FieldPoint::new(600.0, 260.0),
            crate::types::FieldSize::landscape(),
        ),
        "Sneak",
    )
    .unwrap();
    let id = saved.id.clone();
    let mut app = PlayDesignerApp::new(
        AppConfig::default(),
        Arc::new(FixedStore(saved)),
        Arc::new(ScriptedAdvisor::default()),
    );
    app.sign_in(Some("coach"));
    app.open_print_view(&id);
    app.save_dialog.open = true;

    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(screen_rect());
    let output = ctx.run(raw, |ctx| app.show(ctx));

    assert!(!output.shapes.is_empty());
    assert!(matches!(
        app.print.as_ref().map(|p| &p.view),
        Some(PrintView::Ready { .. })
    ));
    assert_eq!(app.playbook.plays.as_ref().map(Vec::len), Some(1));
}

#[test]
fn preferences_round_trip_through_json() {
    let preferences = Preferences {
        dark_mode: false,
        side_panel_width: 320.0,
        user_id: Some("coach".to_string()),
        drawing_color: crate::types::ColorToken("#ef4444".to_string()),
    };
    let json = preferences.to_json().unwrap();
    assert_eq!(Preferences::from_json(&json).unwrap(), preferences);
    // Older state blobs without newer keys still load
    let older = Preferences::from_json("{\"dark_mode\": false}").unwrap();
    assert_eq!(older.side_panel_width, crate::constants::SIDE_PANEL_WIDTH);
}
