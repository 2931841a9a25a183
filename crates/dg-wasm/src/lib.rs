//! WASM bridge for the diagram editor: exposes `Editor` to the browser UI.
//!
//! Compiled via `wasm-pack build --target web`. Every method takes plain
//! numbers and strings; structured results come back as JSON strings of the
//! form `{"ok":true,...}` or `{"ok":false,"kind":"...","error":"..."}`.

mod render2d;
#[cfg(target_arch = "wasm32")]
mod storage;

use dg_core::{Element, Error, ErrorKind, NodeId};
use dg_editor::{Editor, EditorConfig, InputEvent, Modifiers, NodePatch, ToolKind};
use dg_render::render_svg;
use serde_json::{Value, json};
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// The main WASM-facing canvas controller.
///
/// Holds the editor and the canvas size. All interaction from the page goes
/// through this struct; the page drains events after each call to update
/// toolbar and properties panel state.
#[wasm_bindgen]
pub struct DiagramCanvas {
    editor: Editor,
    width: f64,
    height: f64,
}

#[wasm_bindgen]
impl DiagramCanvas {
    /// Create a controller. `namespace` overrides the save-key prefix.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, namespace: Option<String>) -> Self {
        console_error_panic_hook_setup();
        console_logger_setup();

        let mut config = EditorConfig::default();
        if let Some(namespace) = namespace {
            config.namespace = namespace;
        }
        Self {
            editor: open_editor(config),
            width,
            height,
        }
    }

    /// Paint the current scene.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        render2d::render_scene(ctx, &self.editor.scene(), self.width, self.height);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    // ─── Pointer / wheel / keyboard ──────────────────────────────────────

    /// Handle pointer down. Returns true if anything needs repainting.
    pub fn handle_pointer_down(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let modifiers = modifiers(shift, ctrl, alt, meta);
        self.editor
            .handle_input(&InputEvent::PointerDown { x, y, modifiers })
    }

    pub fn handle_pointer_move(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let modifiers = modifiers(shift, ctrl, alt, meta);
        self.editor
            .handle_input(&InputEvent::PointerMove { x, y, modifiers })
    }

    pub fn handle_pointer_up(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let modifiers = modifiers(shift, ctrl, alt, meta);
        self.editor
            .handle_input(&InputEvent::PointerUp { x, y, modifiers })
    }

    pub fn handle_click(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let modifiers = modifiers(shift, ctrl, alt, meta);
        self.editor
            .handle_input(&InputEvent::Click { x, y, modifiers })
    }

    /// Wheel zoom. Always returns true: the page should `preventDefault()`.
    pub fn handle_wheel(&mut self, delta_y: f64) -> bool {
        self.editor.handle_input(&InputEvent::Wheel { delta_y })
    }

    /// Handle a key press. Returns true if the page should `preventDefault()`.
    pub fn handle_key(
        &mut self,
        key: &str,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
        in_text_input: bool,
    ) -> bool {
        self.editor.handle_input(&InputEvent::Key {
            key: key.to_string(),
            modifiers: modifiers(shift, ctrl, alt, meta),
            in_text_input,
        })
    }

    // ─── Tools & commands ────────────────────────────────────────────────

    /// Switch tool by name (`select`, `add-node`, `connect`).
    pub fn set_tool(&mut self, name: &str) -> bool {
        match ToolKind::from_name(name) {
            Some(kind) => {
                self.editor.set_tool(kind);
                true
            }
            None => {
                log::warn!("unknown tool {name:?}");
                false
            }
        }
    }

    pub fn get_tool_name(&self) -> String {
        self.editor.tool().name().to_string()
    }

    /// Add a node at a model-space position. Returns its id.
    pub fn add_node_at(&mut self, x: f64, y: f64) -> String {
        self.editor
            .add_node_at(dg_core::Point::new(x, y))
            .as_str()
            .to_string()
    }

    pub fn delete_selected(&mut self) -> bool {
        self.editor.delete_selection()
    }

    pub fn clear_all(&mut self) {
        self.editor.clear_all();
    }

    pub fn select_node(&mut self, id: &str) -> bool {
        let id = NodeId::intern(id);
        self.editor.graph().contains_node(id) && self.editor.select(Element::Node(id))
    }

    // ─── View ────────────────────────────────────────────────────────────

    pub fn zoom_in(&mut self) -> f64 {
        self.editor.zoom_in();
        self.editor.view().zoom()
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.editor.zoom_out();
        self.editor.view().zoom()
    }

    pub fn reset_zoom(&mut self) -> f64 {
        self.editor.reset_zoom();
        self.editor.view().zoom()
    }

    pub fn get_zoom(&self) -> f64 {
        self.editor.view().zoom()
    }

    // ─── Properties panel ────────────────────────────────────────────────

    /// What the properties panel should show, as JSON.
    ///
    /// `{"mode":"none"}`, `{"mode":"single","id":...,"text":...}`, or
    /// `{"mode":"multi","count":n,...}` with the first node's style as the
    /// starting values.
    pub fn get_selected_node_props(&self) -> String {
        let selected = self.editor.selection().nodes();
        let graph = self.editor.graph();
        let Some(first) = selected.first().and_then(|id| graph.node(*id)) else {
            return json!({ "mode": "none" }).to_string();
        };
        let style = json!({
            "fill": first.fill,
            "textColor": first.text_color,
            "shape": first.shape(),
        });
        let mut props = if selected.len() == 1 {
            json!({ "mode": "single", "id": first.id(), "text": first.text() })
        } else {
            json!({ "mode": "multi", "count": selected.len() })
        };
        if let (Value::Object(props), Value::Object(style)) = (&mut props, style) {
            props.extend(style);
        }
        props.to_string()
    }

    /// Apply a JSON patch to one node.
    pub fn edit_node(&mut self, id: &str, patch_json: &str) -> String {
        let result = NodePatch::from_json(patch_json)
            .and_then(|patch| self.editor.edit_single(NodeId::intern(id), &patch));
        respond(result.map(|changed| json!({ "changed": changed })))
    }

    /// Apply a JSON patch to the selection: the whole patch for one node,
    /// only `fill`/`textColor`/`shape` for several.
    pub fn edit_selected(&mut self, patch_json: &str) -> String {
        let result = NodePatch::from_json(patch_json)
            .and_then(|patch| self.editor.edit_selection(&patch));
        respond(result.map(|count| json!({ "changed": count })))
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    pub fn save(&mut self, title: &str) -> String {
        respond(self.editor.save(title).map(|record| {
            json!({ "title": record.title, "savedAt": record.saved_at })
        }))
    }

    pub fn load(&mut self, title: &str) -> String {
        respond(self.editor.load(title).map(|()| {
            json!({ "title": self.editor.document().title })
        }))
    }

    pub fn list_saved(&self) -> String {
        respond(self.editor.saved_titles().map(|titles| json!({ "titles": titles })))
    }

    pub fn delete_saved(&mut self, title: &str) -> String {
        respond(self.editor.delete_saved(title).map(|removed| json!({ "removed": removed })))
    }

    pub fn get_title(&self) -> String {
        self.editor.document().title.clone()
    }

    // ─── Render adapter outputs ──────────────────────────────────────────

    /// Every event since the last drain, as a JSON array.
    pub fn drain_events(&mut self) -> String {
        let events = self.editor.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::error!("event serialization failed: {e}");
            "[]".to_string()
        })
    }

    /// The draw list, for hosts that paint themselves.
    pub fn scene_json(&self) -> String {
        serde_json::to_string(&self.editor.scene()).unwrap_or_else(|e| {
            log::error!("scene serialization failed: {e}");
            "{}".to_string()
        })
    }

    pub fn export_svg(&self) -> String {
        render_svg(&self.editor.scene(), self.width, self.height)
    }
}

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        shift,
        ctrl,
        alt,
        meta,
    }
}

fn open_editor(config: EditorConfig) -> Editor {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(store) = storage::LocalStore::open() {
            return Editor::with_store(config, Box::new(store));
        }
        log::warn!("localStorage unavailable; saves last only for this session");
    }
    Editor::new(config)
}

fn kind_name(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Reference => "reference",
        ErrorKind::Validation => "validation",
        ErrorKind::Storage => "storage",
    }
}

/// Wrap a command result in the `{"ok":...}` envelope.
fn respond(result: dg_core::Result<Value>) -> String {
    match result {
        Ok(Value::Object(mut body)) => {
            body.insert("ok".into(), Value::Bool(true));
            Value::Object(body).to_string()
        }
        Ok(other) => json!({ "ok": true, "value": other }).to_string(),
        Err(err) => error_json(&err),
    }
}

fn error_json(err: &Error) -> String {
    log::warn!("{err}");
    json!({
        "ok": false,
        "kind": kind_name(err.kind()),
        "error": err.to_string(),
    })
    .to_string()
}

// ─── Console logging & panic hook ────────────────────────────────────────

#[cfg(target_arch = "wasm32")]
struct ConsoleLogger;

#[cfg(target_arch = "wasm32")]
impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from(format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg),
            log::Level::Warn => web_sys::console::warn_1(&msg),
            log::Level::Info => web_sys::console::info_1(&msg),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

fn console_logger_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        static LOGGER: ConsoleLogger = ConsoleLogger;
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Info);
        }
    }
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("diagram editor panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
