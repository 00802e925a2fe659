//! DuopaneEditor - the editor wrapper for JavaScript.

use std::cell::RefCell;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use duopane_browser::BrowserEditor;
use duopane_core::{EditorError, EditorOptions, EventKind, ExportKind, Settings};

use crate::events::{JsListeners, bridge, event_from_js};

fn js_error(e: EditorError) -> JsError {
    JsError::new(&e.to_string())
}

fn call_back(callback: Option<js_sys::Function>, this: &JsValue) -> Result<(), JsError> {
    if let Some(callback) = callback {
        callback
            .call0(this)
            .map_err(|e| JsError::new(&format!("callback threw: {:?}", e)))?;
    }
    Ok(())
}

fn parse_kind(event: &str) -> Result<EventKind, JsError> {
    EventKind::parse(event).ok_or_else(|| JsError::new(&format!("Unknown event: {}", event)))
}

/// An editor instance bound to one container element.
#[wasm_bindgen]
pub struct DuopaneEditor {
    inner: BrowserEditor,
    listeners: RefCell<JsListeners>,
}

#[wasm_bindgen]
impl DuopaneEditor {
    /// Create an editor. `options` follows the documented option object;
    /// missing keys take their defaults and unknown keys are ignored.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<DuopaneEditor, JsError> {
        let options: EditorOptions = if options.is_undefined() || options.is_null() {
            EditorOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)
                .map_err(|e| JsError::new(&format!("Invalid options: {}", e)))?
        };
        let inner = BrowserEditor::new(Settings::resolve(options)).map_err(js_error)?;
        Ok(Self {
            inner,
            listeners: RefCell::new(JsListeners::default()),
        })
    }

    // === Lifecycle ===

    /// Build the surfaces and open the configured document. `callback`
    /// runs afterwards with `this` bound to the outer document.
    #[wasm_bindgen]
    pub fn load(&self, callback: Option<js_sys::Function>) -> Result<(), JsError> {
        self.inner.load().map_err(js_error)?;
        call_back(callback, &self.inner.document())
    }

    /// Tear the surfaces down. `callback` runs afterwards with `this` bound
    /// to the document the editor was unloaded from.
    #[wasm_bindgen]
    pub fn unload(&self, callback: Option<js_sys::Function>) -> Result<(), JsError> {
        let this = self.inner.document();
        self.inner.unload().map_err(js_error)?;
        call_back(callback, &this)
    }

    /// Query a state: `loaded`, `unloaded`, `edit`, `preview`, `fullscreen`.
    #[wasm_bindgen(js_name = isMode)]
    pub fn is_mode(&self, state: &str) -> bool {
        self.inner.with(|ed| Ok(ed.is(state))).unwrap_or(false)
    }

    /// Handle for a named surface (`document`, `body`, `editor`,
    /// `previewer`, `wrapper`); `undefined` for anything else.
    #[wasm_bindgen]
    pub fn get(&self, name: &str) -> JsValue {
        self.inner
            .with(|ed| Ok(ed.get(name)))
            .ok()
            .flatten()
            .unwrap_or(JsValue::UNDEFINED)
    }

    // === Modes ===

    #[wasm_bindgen]
    pub fn preview(&self, theme: Option<String>, live: Option<bool>) -> Result<(), JsError> {
        self.inner
            .with(|ed| ed.preview(theme.as_deref(), live.unwrap_or(false)))
            .map_err(js_error)
    }

    #[wasm_bindgen]
    pub fn edit(&self) -> Result<(), JsError> {
        self.inner.with(|ed| ed.edit()).map_err(js_error)
    }

    #[wasm_bindgen(js_name = enterFullscreen)]
    pub fn enter_fullscreen(&self) -> Result<(), JsError> {
        self.inner.with(|ed| ed.enter_fullscreen()).map_err(js_error)
    }

    #[wasm_bindgen(js_name = exitFullscreen)]
    pub fn exit_fullscreen(&self) -> Result<(), JsError> {
        self.inner.exit_fullscreen().map_err(js_error)
    }

    // === Documents ===

    /// Open a document, the active one when `name` is omitted.
    #[wasm_bindgen]
    pub fn open(&self, name: Option<String>) -> Result<(), JsError> {
        self.inner
            .with(|ed| ed.open(name.as_deref()))
            .map_err(js_error)
    }

    #[wasm_bindgen]
    pub fn save(&self, name: Option<String>, content: Option<String>) -> Result<(), JsError> {
        self.inner
            .with(|ed| ed.save(name.as_deref(), content.as_deref()))
            .map_err(js_error)
    }

    #[wasm_bindgen]
    pub fn remove(&self, name: Option<String>) -> Result<(), JsError> {
        self.inner
            .with(|ed| ed.remove(name.as_deref()))
            .map_err(js_error)
    }

    #[wasm_bindgen]
    pub fn rename(&self, old_name: &str, new_name: &str) -> Result<(), JsError> {
        self.inner
            .with(|ed| ed.rename(old_name, new_name))
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = importFile)]
    pub fn import_file(&self, name: &str, content: &str) -> Result<(), JsError> {
        self.inner
            .with(|ed| ed.import_file(name, content))
            .map_err(js_error)
    }

    /// The editable text rendered to HTML.
    #[wasm_bindgen(js_name = exportHTML)]
    pub fn export_html(&self) -> Result<String, JsError> {
        self.inner.with(|ed| Ok(ed.export_html())).map_err(js_error)
    }

    /// Export a stored document as `"text"` (default), `"html"` or `"json"`.
    /// `undefined` when the document does not exist.
    #[wasm_bindgen(js_name = exportFile)]
    pub fn export_file(
        &self,
        name: Option<String>,
        kind: Option<String>,
    ) -> Result<Option<String>, JsError> {
        let kind = match kind.as_deref() {
            None => ExportKind::default(),
            Some(k) => {
                ExportKind::parse(k).ok_or_else(|| JsError::new(&format!("Unknown export kind: {}", k)))?
            }
        };
        self.inner
            .with(|ed| ed.export_file(name.as_deref(), kind))
            .map_err(js_error)
    }

    /// Every stored document as `{ name: content }`, or one document's
    /// content when `name` is given.
    #[wasm_bindgen(js_name = getFiles)]
    pub fn get_files(&self, name: Option<String>) -> Result<JsValue, JsError> {
        if let Some(name) = name {
            let content = self.inner.with(|ed| ed.get_file(&name)).map_err(js_error)?;
            return Ok(content.map(JsValue::from).unwrap_or(JsValue::UNDEFINED));
        }
        let files = self.inner.with(|ed| ed.get_files()).map_err(js_error)?;
        files
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
    }

    // === Events ===

    /// Register `handler` for `event`. It is called with the event payload
    /// and `this` bound to the editor's outer document.
    #[wasm_bindgen]
    pub fn on(&self, event: &str, handler: js_sys::Function) -> Result<(), JsError> {
        let kind = parse_kind(event)?;
        let id = self.inner.on(kind, bridge(handler.clone()));
        self.listeners.borrow_mut().push(kind, id, handler);
        Ok(())
    }

    /// Call every handler registered for `event` with `data`
    /// (`{ name?, content? }`), as the editor itself would.
    #[wasm_bindgen]
    pub fn emit(&self, event: &str, data: JsValue) -> Result<(), JsError> {
        let event = event_from_js(parse_kind(event)?, data)?;
        self.inner.emit(&event);
        Ok(())
    }

    /// Remove `handler` from `event`, or every handler for `event` when
    /// `handler` is omitted. Returns how many were removed.
    #[wasm_bindgen(js_name = removeListener)]
    pub fn remove_listener(
        &self,
        event: &str,
        handler: Option<js_sys::Function>,
    ) -> Result<u32, JsError> {
        let kind = parse_kind(event)?;
        let ids = self.listeners.borrow_mut().take(kind, handler.as_ref());
        let removed: usize = ids
            .into_iter()
            .map(|id| self.inner.remove_listener(kind, Some(id)))
            .sum();
        Ok(u32::try_from(removed).unwrap_or(u32::MAX))
    }
}
