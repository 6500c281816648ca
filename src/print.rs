//! Printable diagrams: render a play to SVG and PNG.
//!
//! Notes:
//! - The printable field is white with black markings and black routes.
//! - SVG export is supported on all targets (native + wasm).
//! - PNG export is supported on native targets only.

use crate::constants;
use crate::error::ExportError;
use crate::geometry::FieldMarkings;
use crate::store::{load_play, SavedPlay};
use crate::types::*;
use std::fmt::Write as _;

/// Content of the print window for one saved play.
#[derive(Debug, Clone, PartialEq)]
pub enum PrintView {
    /// A readable play and its name
    Ready { name: String, play: Play },
    /// The stored diagram could not be read
    Unavailable,
}

impl PrintView {
    /// Message shown instead of a diagram that cannot be loaded.
    pub const UNAVAILABLE_MESSAGE: &'static str = "Could not load play.";

    pub fn from_saved(saved: &SavedPlay, field: FieldSize) -> Self {
        match load_play(saved, field) {
            Ok(play) => PrintView::Ready {
                name: saved.name.clone(),
                play,
            },
            Err(e) => {
                log::warn!("cannot print play {}: {e}", saved.id);
                PrintView::Unavailable
            }
        }
    }
}

/// Builds the printable SVG for `play`. Returns (svg, width, height).
pub fn build_svg(play: &Play, field: FieldSize, title: Option<&str>) -> (String, u32, u32) {
    let scale = constants::PRINT_SCALE;
    let width = (field.width * scale).ceil().max(1.0) as u32;
    let height = (field.height * scale).ceil().max(1.0) as u32;
    let markings = FieldMarkings::for_field(field);

    let mut out = String::new();

    // SVG header
    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">",
        width, height, field.width, field.height
    );
    if let Some(title) = title {
        let _ = writeln!(out, "<title>{}</title>", escape_xml(title));
    }

    // Field and end zones
    let _ = writeln!(
        out,
        "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"white\" />",
        field.width, field.height
    );
    for (min, max) in markings.end_zones {
        let _ = writeln!(
            out,
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"#e0e0e0\" />",
            min.x,
            min.y,
            max.x - min.x,
            max.y - min.y
        );
    }

    // Yard lines
    let _ = writeln!(out, "<g stroke=\"black\">");
    for line in &markings.yard_lines {
        let (width, opacity) = if line.major { (2, 0.7) } else { (1, 0.5) };
        let _ = writeln!(
            out,
            "  <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke-width=\"{}\" stroke-opacity=\"{}\" />",
            line.from.x, line.from.y, line.to.x, line.to.y, width, opacity
        );
    }
    let _ = writeln!(out, "</g>");

    // Hash marks
    let _ = writeln!(
        out,
        "<g stroke=\"black\" stroke-width=\"2\" opacity=\"0.6\">"
    );
    for hash in &markings.hash_marks {
        let _ = writeln!(
            out,
            "  <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" />",
            hash.from.x, hash.from.y, hash.to.x, hash.to.y
        );
    }
    let _ = writeln!(out, "</g>");

    // Yard numbers
    let _ = writeln!(
        out,
        "<g fill=\"black\" font-size=\"{:.1}\" font-weight=\"bold\" font-family=\"sans-serif\" opacity=\"0.7\" text-anchor=\"middle\" dominant-baseline=\"central\">",
        markings.number_size
    );
    for number in &markings.numbers {
        let rotate = if number.flipped {
            format!(
                " transform=\"rotate(180, {:.2}, {:.2})\"",
                number.at.x, number.at.y
            )
        } else {
            String::new()
        };
        let _ = writeln!(
            out,
            "  <text x=\"{:.2}\" y=\"{:.2}\"{}>{}</text>",
            number.at.x, number.at.y, rotate, number.yards
        );
    }
    let _ = writeln!(out, "</g>");

    // Routes
    let _ = writeln!(
        out,
        "<g stroke=\"black\" stroke-width=\"{}\" fill=\"none\" stroke-linecap=\"round\" stroke-linejoin=\"round\">",
        constants::ROUTE_STROKE_WIDTH
    );
    for route in &play.routes {
        let dash = match route.style {
            RouteStyle::Dashed => format!(
                " stroke-dasharray=\"{0},{0}\"",
                constants::ROUTE_DASH_LENGTH
            ),
            RouteStyle::Solid => String::new(),
        };
        let _ = writeln!(
            out,
            "  <path d=\"{}\"{} />",
            path_codec::to_path_string(&route.path),
            dash
        );
    }
    let _ = writeln!(out, "</g>");

    // Players
    let radius = constants::PLAYER_ICON_RADIUS;
    for player in &play.players {
        let style = player.player_type.style();
        let _ = writeln!(
            out,
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{}\" fill=\"white\" stroke=\"black\" stroke-width=\"2\" />",
            player.x, player.y, radius
        );
        match style.label {
            Some(label) => {
                let _ = writeln!(
                    out,
                    "<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"12\" font-weight=\"bold\" font-family=\"sans-serif\" fill=\"black\" text-anchor=\"middle\" dominant-baseline=\"central\">{}</text>",
                    player.x, player.y, escape_xml(label)
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.1}\" fill=\"black\" />",
                    player.x,
                    player.y,
                    radius * 0.5
                );
            }
        }
    }

    // Close SVG
    let _ = writeln!(out, "</svg>");

    (out, width, height)
}

/// Rasterizes an SVG produced by [`build_svg`].
#[cfg(not(target_arch = "wasm32"))]
pub fn render_png(
    svg: &str,
    width: u32,
    height: u32,
    scale: f32,
) -> Result<Vec<u8>, ExportError> {
    use std::sync::Arc;
    use tiny_skia::Pixmap;

    let mut opt = usvg::Options::default();
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    opt.fontdb = Arc::new(db);

    let tree = usvg::Tree::from_data(svg.as_bytes(), &opt)
        .map_err(|e| ExportError::Svg(e.to_string()))?;

    let scale = scale.clamp(0.25, 8.0);
    let out_w = ((width as f32) * scale).round().max(1.0) as u32;
    let out_h = ((height as f32) * scale).round().max(1.0) as u32;
    let mut pixmap = Pixmap::new(out_w, out_h).ok_or_else(|| {
        ExportError::Raster(format!("cannot allocate {out_w}x{out_h} pixmap"))
    })?;
    pixmap.fill(tiny_skia::Color::WHITE);

    let transform = tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| ExportError::Raster(e.to_string()))
}

/// File name for an exported play, derived from its name.
pub fn export_file_name(name: &str, extension: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    let stem = if stem.is_empty() { "play".to_string() } else { stem };
    format!("{stem}.{extension}")
}

/// Saves an SVG: a save dialog on native, a browser download on wasm.
///
/// Returns where the file went, or `None` when the dialog was cancelled.
pub async fn export_svg(svg: String, file_name: String) -> Result<Option<String>, ExportError> {
    #[cfg(target_arch = "wasm32")]
    {
        trigger_download(&file_name, &svg, "image/svg+xml").map_err(ExportError::Io)?;
        Ok(Some(file_name))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let handle = rfd::AsyncFileDialog::new()
            .add_filter("SVG", &["svg"])
            .set_file_name(&file_name)
            .save_file()
            .await;
        match handle {
            Some(handle) => write_export(handle.path(), svg.as_bytes()).map(Some),
            None => Ok(None),
        }
    }
}

/// Rasterizes and saves a PNG through a save dialog.
#[cfg(not(target_arch = "wasm32"))]
pub async fn export_png(
    svg: String,
    width: u32,
    height: u32,
    file_name: String,
) -> Result<Option<String>, ExportError> {
    let png = render_png(&svg, width, height, 2.0)?;
    let handle = rfd::AsyncFileDialog::new()
        .add_filter("PNG", &["png"])
        .set_file_name(&file_name)
        .save_file()
        .await;
    match handle {
        Some(handle) => write_export(handle.path(), &png).map(Some),
        None => Ok(None),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_export(path: &std::path::Path, bytes: &[u8]) -> Result<String, ExportError> {
    std::fs::write(path, bytes).map_err(|e| ExportError::Io(e.to_string()))?;
    log::info!("exported {}", path.display());
    Ok(path.display().to_string())
}

/// Starts a browser download of `content`.
#[cfg(target_arch = "wasm32")]
pub fn trigger_download(filename: &str, content: &str, mime: &str) -> Result<(), String> {
    use wasm_bindgen::JsCast;

    let window = web_sys::window().ok_or("No window found")?;
    let document = window.document().ok_or("No document found")?;

    let blob_parts = js_sys::Array::new();
    blob_parts.push(&wasm_bindgen::JsValue::from_str(content));

    let blob_options = web_sys::BlobPropertyBag::new();
    blob_options.set_type(mime);

    let blob = web_sys::Blob::new_with_str_sequence_and_options(&blob_parts, &blob_options)
        .map_err(|_| "Failed to create blob")?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)
        .map_err(|_| "Failed to create object URL")?;

    let anchor = document
        .create_element("a")
        .map_err(|_| "Failed to create anchor element")?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| "Failed to cast to anchor element")?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.style().set_property("display", "none").ok();

    let body = document.body().ok_or("No body found")?;
    body.append_child(&anchor)
        .map_err(|_| "Failed to append anchor")?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(|_| "Failed to remove anchor")?;

    web_sys::Url::revoke_object_url(&url).map_err(|_| "Failed to revoke object URL")?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    let mut s = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            '"' => s.push_str("&quot;"),
            '\'' => s.push_str("&apos;"),
            _ => s.push(ch),
        }
    }
    s
}
