//! # Play Designer
//!
//! An interactive editor for American-football plays. Coaches place player icons on a
//! field, draw solid or dashed routes, undo mistakes, save named plays to a personal
//! playbook and ask an AI advisor for play suggestions.
//!
//! ## Features
//! - Player placement and dragging with one undo step per gesture
//! - Freehand routes with a preview while drawing
//! - Eraser that removes players together with the routes they start
//! - Saved plays per anonymous user, listed live as they change
//! - Printable black-on-white diagrams, exportable as SVG and PNG
//! - Play suggestions and playbook summaries from a chat completions endpoint

#![deny(unsafe_code)]

pub mod advisor;
pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod history;
pub mod print;
pub mod session;
pub mod store;
pub mod style;
mod types;
mod ui;

// Re-export public types and functions
pub use config::AppConfig;
pub use editor::{EditorEvent, EditorState, Tool};
pub use types::*;
pub use ui::PlayDesignerApp;

/// Runs the play designer in a native window.
///
/// # Returns
///
/// Returns `Ok(())` when the window is closed, or an `eframe::Error` if
/// initialization fails.
///
/// # Example
///
/// ```no_run
/// use play_designer::{run_app, AppConfig};
///
/// fn main() -> Result<(), eframe::Error> {
///     run_app(AppConfig::load())
/// }
/// ```
#[cfg(not(target_arch = "wasm32"))]
pub fn run_app(config: AppConfig) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Play Designer")
            .with_inner_size([1280.0, 760.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Play Designer",
        options,
        Box::new(|cc| {
            let app = PlayDesignerApp::from_creation_context(cc, config);
            Ok(Box::new(app))
        }),
    )
}

/// Web entry point: mounts the app on the `the_canvas_id` canvas.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    use wasm_bindgen::JsCast;

    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    wasm_bindgen_futures::spawn_local(async {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document found");
            return;
        };
        let canvas = match document
            .get_element_by_id("the_canvas_id")
            .map(|element| element.dyn_into::<web_sys::HtmlCanvasElement>())
        {
            Some(Ok(canvas)) => canvas,
            _ => {
                log::error!("Canvas `the_canvas_id` not found");
                return;
            }
        };

        let result = eframe::WebRunner::new()
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(|cc| {
                    Ok(Box::new(PlayDesignerApp::from_creation_context(
                        cc,
                        AppConfig::default(),
                    )))
                }),
            )
            .await;
        if let Err(e) = result {
            log::error!("Failed to start app: {e:?}");
        }
    });
}
