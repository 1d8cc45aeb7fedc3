use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use skillspan_core::interaction::{Effect, PointerEvent};
use skillspan_core::model::{BlockColor, BlockDraft, BlockId, Section, YearMonth};
use skillspan_core::{ClearMode, Session};
use skillspan_protocol::Point;
use wasm_bindgen::prelude::*;

static SESSION: Mutex<Option<Session>> = Mutex::new(None);

fn js_err(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

fn lock() -> Result<MutexGuard<'static, Option<Session>>, JsError> {
    SESSION.lock().map_err(|_| JsError::new("session lock poisoned"))
}

/// Run `f` against the live session, creating one for the current decade
/// on first use.
fn with_session<T>(f: impl FnOnce(&mut Session) -> Result<T, JsError>) -> Result<T, JsError> {
    let mut guard = lock()?;
    let session = guard.get_or_insert_with(Session::with_current_years);
    f(session)
}

/// Host-facing view of one interaction effect.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum EffectView {
    DragStarted { id: String },
    Resize { id: String },
    Move { id: String, row: i32 },
    Delete { id: String },
    DragEnded,
}

impl From<&Effect> for EffectView {
    fn from(effect: &Effect) -> Self {
        match effect {
            Effect::DragStarted { id } => Self::DragStarted { id: id.to_string() },
            Effect::Resize { id, .. } => Self::Resize { id: id.to_string() },
            Effect::Move { id, row, .. } => Self::Move {
                id: id.to_string(),
                row: *row,
            },
            Effect::Delete { id } => Self::Delete { id: id.to_string() },
            Effect::DragEnded => Self::DragEnded,
        }
    }
}

fn effects_json(effects: &[Effect]) -> Result<String, JsError> {
    let views: Vec<EffectView> = effects.iter().map(EffectView::from).collect();
    serde_json::to_string(&views).map_err(js_err)
}

/// Replace the session with an empty timeline over the given years.
#[wasm_bindgen]
pub fn new_session(start_year: i32, end_year: i32) -> Result<(), JsError> {
    let session = Session::new(start_year, end_year).map_err(js_err)?;
    *lock()? = Some(session);
    Ok(())
}

/// Import a timeline document. On error the current state is kept.
#[wasm_bindgen]
pub fn load_document(json: &str) -> Result<usize, JsError> {
    with_session(|s| {
        s.import_json(json.as_bytes()).map_err(js_err)?;
        Ok(s.blocks().len())
    })
}

#[wasm_bindgen]
pub fn export_document() -> Result<String, JsError> {
    with_session(|s| s.to_document().to_json_pretty().map_err(js_err))
}

#[wasm_bindgen]
pub fn set_surface(width: f64, height: f64) -> Result<(), JsError> {
    with_session(|s| {
        s.set_surface(width, height);
        Ok(())
    })
}

#[wasm_bindgen]
pub fn set_years(start_year: i32, end_year: i32) -> Result<(), JsError> {
    with_session(|s| s.set_years(start_year, end_year).map_err(js_err))
}

/// Add a block. Months are 1-12; `section` is "top" or "bottom". Returns the
/// new block id.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn add_block(
    name: &str,
    color: &str,
    start_year: i32,
    start_month: u32,
    end_year: i32,
    end_month: u32,
    section: &str,
) -> Result<String, JsError> {
    let color = BlockColor::from_name(color)
        .ok_or_else(|| JsError::new(&format!("unknown color: {color}")))?;
    let section = match section {
        "top" => Section::Top,
        "bottom" => Section::Bottom,
        _ => return Err(JsError::new(&format!("unknown section: {section}"))),
    };
    let draft = BlockDraft {
        name: name.to_string(),
        color,
        start: YearMonth::new(start_year, start_month),
        end: YearMonth::new(end_year, end_month),
        section,
    };
    with_session(|s| {
        let id = s.add_block(draft).map_err(js_err)?;
        Ok(id.to_string())
    })
}

/// Delete a block, or the whole selection when the block is part of it.
#[wasm_bindgen]
pub fn delete_block(id: &str) -> Result<usize, JsError> {
    with_session(|s| Ok(s.delete_block(&BlockId::from(id))))
}

/// Clear the selected blocks, or everything when nothing is selected.
/// Returns "selected" or "all" so the host can word its confirmation.
#[wasm_bindgen]
pub fn clear() -> Result<String, JsError> {
    with_session(|s| {
        let mode = s.clear_request();
        s.clear(mode);
        Ok(match mode {
            ClearMode::Selected => "selected",
            ClearMode::All => "all",
        }
        .to_string())
    })
}

/// Pointer press. Returns the resulting effects as JSON.
#[wasm_bindgen]
pub fn pointer_down(x: f64, y: f64, additive: bool) -> Result<String, JsError> {
    with_session(|s| {
        let effects = s.handle_pointer(PointerEvent::Down {
            position: Point::new(x, y),
            additive,
        });
        effects_json(&effects)
    })
}

#[wasm_bindgen]
pub fn pointer_move(x: f64, y: f64) -> Result<String, JsError> {
    with_session(|s| {
        let effects = s.handle_pointer(PointerEvent::Move {
            position: Point::new(x, y),
        });
        effects_json(&effects)
    })
}

#[wasm_bindgen]
pub fn pointer_up(x: f64, y: f64) -> Result<String, JsError> {
    with_session(|s| {
        let effects = s.handle_pointer(PointerEvent::Up {
            position: Point::new(x, y),
        });
        effects_json(&effects)
    })
}

/// Render the whole timeline, returning render commands as JSON.
#[wasm_bindgen]
pub fn render() -> Result<String, JsError> {
    with_session(|s| serde_json::to_string(&s.render()).map_err(js_err))
}

/// Render the timeline as a standalone SVG document.
#[wasm_bindgen]
pub fn render_svg(dark: bool) -> Result<String, JsError> {
    with_session(|s| {
        let (width, height) = s.surface_size();
        Ok(skillspan_core::svg::render_svg(&s.render(), width, height, dark))
    })
}

/// Ids of the selected blocks as a JSON array.
#[wasm_bindgen]
pub fn selection() -> Result<String, JsError> {
    with_session(|s| {
        let ids: Vec<&str> = s.selection().iter().map(BlockId::as_str).collect();
        serde_json::to_string(&ids).map_err(js_err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effects_serialize_with_kind_tag() {
        let effects = [
            Effect::DragStarted {
                id: BlockId::from("a"),
            },
            Effect::DragEnded,
        ];
        let views: Vec<EffectView> = effects.iter().map(EffectView::from).collect();
        let json = serde_json::to_string(&views).unwrap_or_default();
        assert_eq!(json, r#"[{"kind":"dragStarted","id":"a"},{"kind":"dragEnded"}]"#);
    }
}
