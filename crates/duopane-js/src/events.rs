//! JavaScript listener bookkeeping.
//!
//! The core emitter identifies listeners by [`ListenerId`]; JavaScript removes
//! them by passing the same function back. [`JsListeners`] keeps the mapping.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use duopane_core::{EditorEvent, EventKind, ListenerId};

struct JsListener {
    kind: EventKind,
    id: ListenerId,
    handler: js_sys::Function,
}

#[derive(Default)]
pub(crate) struct JsListeners {
    entries: Vec<JsListener>,
}

impl JsListeners {
    pub(crate) fn push(&mut self, kind: EventKind, id: ListenerId, handler: js_sys::Function) {
        self.entries.push(JsListener { kind, id, handler });
    }

    /// Forget the listeners for `kind` matching `handler` (all of them when
    /// `None`) and return their ids.
    pub(crate) fn take(
        &mut self,
        kind: EventKind,
        handler: Option<&js_sys::Function>,
    ) -> Vec<ListenerId> {
        let mut removed = Vec::new();
        self.entries.retain(|l| {
            let matches = l.kind == kind
                && handler.is_none_or(|h| js_sys::Object::is(h, &l.handler));
            if matches {
                removed.push(l.id);
            }
            !matches
        });
        removed
    }
}

/// Event payload as handed to JavaScript: `{ name, content? }` or `null`.
pub(crate) fn payload(event: &EditorEvent) -> JsValue {
    event
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

/// Loose `{ name?, content? }` object passed to `emit`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct EmittedPayload {
    pub name: Option<String>,
    pub content: Option<String>,
}

/// Read the data argument of `emit` into the event of `kind`.
pub(crate) fn event_from_js(kind: EventKind, data: JsValue) -> Result<EditorEvent, JsError> {
    let payload: EmittedPayload = if data.is_undefined() || data.is_null() {
        EmittedPayload::default()
    } else {
        serde_wasm_bindgen::from_value(data)
            .map_err(|e| JsError::new(&format!("Invalid event data: {}", e)))?
    };
    Ok(EditorEvent::from_parts(kind, payload.name, payload.content))
}

/// Wrap a JavaScript function as an editor listener. The function runs with
/// `this` bound to the editor's outer document.
pub(crate) fn bridge(handler: js_sys::Function) -> impl FnMut(&JsValue, &EditorEvent) + 'static {
    move |this, event| {
        if let Err(e) = handler.call1(this, &payload(event)) {
            tracing::warn!(event = %event.kind(), "listener threw: {:?}", e);
        }
    }
}
