//! wasm-bindgen surface of the Goal Map. One map per module instance.

use std::cell::RefCell;

use chrono::NaiveDate;
use goalmap_engine::bridge::protocol::action_from_code;
use goalmap_engine::{BodyId, InputEvent, MenuTarget};
use wasm_bindgen::prelude::*;

pub mod runner;

pub use runner::MapRunner;

type SaveHook = Box<dyn FnMut()>;

thread_local! {
    static RUNNER: RefCell<Option<MapRunner>> = const { RefCell::new(None) };
    static SAVE_HOOK: RefCell<Option<SaveHook>> = const { RefCell::new(None) };
}

/// Run `f` against the open map. Calls made before `map_open` are ignored.
fn with_runner<R>(f: impl FnOnce(&mut MapRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => Some(f(runner)),
        None => {
            log::warn!("goal map not open, call ignored");
            None
        }
    })
}

fn set_save_hook(hook: impl FnMut() + 'static) {
    SAVE_HOOK.with(|slot| *slot.borrow_mut() = Some(Box::new(hook)));
}

/// Fire the save hook once per request made since the last flush. Runs
/// outside every borrow so the hook may call back into any export.
fn flush_saves() {
    let pending = with_runner(|r| r.take_pending_saves()).unwrap_or(0);
    if pending == 0 {
        return;
    }
    let Some(mut hook) = SAVE_HOOK.with(|slot| slot.borrow_mut().take()) else {
        return;
    };
    for _ in 0..pending {
        hook();
    }
    // Keep a hook the callback itself registered.
    SAVE_HOOK.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_none() {
            *slot = Some(hook);
        }
    });
}

fn not_open() -> JsValue {
    JsValue::from_str("goal map not open")
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Menu target codes: 0 = planet, 1 = moon, anything else = the map.
fn menu_target(kind: u32, id: u32) -> MenuTarget {
    match kind {
        0 => MenuTarget::Planet(BodyId(id)),
        1 => MenuTarget::Moon(BodyId(id)),
        _ => MenuTarget::Map,
    }
}

fn today() -> Option<NaiveDate> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
}

#[wasm_bindgen]
pub fn map_open(note_json: &str, accent_hex: &str, config_json: Option<String>, seed: u32) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let mut runner = MapRunner::open(note_json, accent_hex, config_json.as_deref(), seed as u64).map_err(js_error)?;
    if let Some(date) = today() {
        runner.map_mut().set_date(date);
    }
    RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
    Ok(())
}

/// Register the persistence hook. Called with no arguments after every
/// status change the user made.
#[wasm_bindgen]
pub fn map_set_save_callback(callback: js_sys::Function) {
    set_save_hook(move || {
        if let Err(e) = callback.call0(&JsValue::NULL) {
            web_sys::console::error_2(&JsValue::from_str("save callback failed:"), &e);
        }
    });
}

/// Returns true if a new frame was painted.
#[wasm_bindgen]
pub fn map_tick(dt: f32) -> bool {
    let painted = with_runner(|r| r.tick(dt)).unwrap_or(false);
    flush_saves();
    painted
}

#[wasm_bindgen]
pub fn map_update_snapshot(note_json: &str) -> Result<(), JsValue> {
    with_runner(|r| r.update_snapshot(note_json).map_err(js_error)).unwrap_or_else(|| Err(not_open()))
}

#[wasm_bindgen]
pub fn map_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn map_pointer_down(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn map_menu_action(target_kind: u32, target_id: u32, action: u32) {
    let Some(action) = action_from_code(action) else {
        log::warn!("unknown menu action {action}");
        return;
    };
    let target = menu_target(target_kind, target_id);
    with_runner(|r| r.push_input(InputEvent::Menu { target, action }));
}

/// Menu entries for a target as a JSON array of `{action, label}`.
#[wasm_bindgen]
pub fn map_menu_entries(target_kind: u32, target_id: u32) -> String {
    use goalmap_engine::bridge::protocol::MenuEntryWire;

    let target = menu_target(target_kind, target_id);
    with_runner(|r| {
        let entries: Vec<MenuEntryWire> = r.map().menu_entries(target).iter().map(MenuEntryWire::from).collect();
        serde_json::to_string(&entries).unwrap_or_else(|_| String::from("[]"))
    })
    .unwrap_or_else(|| String::from("[]"))
}

#[wasm_bindgen]
pub fn map_set_wallpaper(on: bool) {
    with_runner(|r| r.map_mut().set_wallpaper_mode(on));
}

#[wasm_bindgen]
pub fn map_resize(width: f32, height: f32) {
    with_runner(|r| r.push_input(InputEvent::Resize { width, height }));
}

#[wasm_bindgen]
pub fn map_set_running(running: bool) {
    with_runner(|r| r.map_mut().set_running(running));
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_header_ptr() -> *const f32 {
    with_runner(|r| r.header_ptr()).unwrap_or(std::ptr::null())
}

#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn get_vertex_ptr() -> *const f32 {
    with_runner(|r| r.vertex_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_vertex_count() -> u32 {
    with_runner(|r| r.vertex_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_labels_json() -> String {
    with_runner(|r| r.labels_json().to_string()).unwrap_or_else(|| String::from("[]"))
}

#[wasm_bindgen]
pub fn get_save_requests() -> f64 {
    with_runner(|r| r.map().save_requests() as f64).unwrap_or(0.0)
}

/// The note with every status change written through, for persistence.
#[wasm_bindgen]
pub fn get_snapshot_json() -> Result<String, JsValue> {
    with_runner(|r| r.snapshot_json().map_err(js_error)).unwrap_or_else(|| Err(not_open()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    const NOTE: &str = r#"{
        "title": "Trip",
        "tasks": [ { "text": "tickets" }, { "text": "bags", "children": [ { "text": "socks" } ] } ]
    }"#;

    fn install(runner: MapRunner) {
        RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
    }

    #[test]
    fn save_hook_may_call_back_into_the_map() {
        install(MapRunner::open(NOTE, "#22aa88", None, 3).unwrap());
        let planet = RUNNER.with(|cell| cell.borrow().as_ref().map(|r| r.map().scene().planets[0].id.0)).unwrap();

        let seen = Rc::new(Cell::new(0.0));
        let saved = Rc::new(RefCell::new(String::new()));
        let (s, j) = (seen.clone(), saved.clone());
        set_save_hook(move || {
            s.set(get_save_requests());
            *j.borrow_mut() = get_snapshot_json().unwrap_or_default();
        });

        map_menu_action(0, planet, 0);
        map_tick(0.02);

        assert_eq!(seen.get(), 1.0);
        assert!(saved.borrow().contains("\"checked\":true"));

        map_tick(0.02);
        assert_eq!(seen.get(), 1.0);
    }
}
