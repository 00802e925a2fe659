//! WASM browser tests for duopane-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

#![cfg(all(target_arch = "wasm32", target_os = "unknown"))]

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use duopane_browser::{
    BrowserEditor, EditorEvent, EditorOptions, EventKind, RenderHost, Settings, StyleTarget,
    ViewModeFlags, storage,
};
use web_sys::HtmlElement;

fn make_container(id: &str) -> HtmlElement {
    let document = document();
    if let Some(old) = document.get_element_by_id(id) {
        old.remove();
    }
    let container = document
        .create_element("div")
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    container.set_id(id);
    container
        .style()
        .set_property("width", "600px")
        .unwrap();
    container
        .style()
        .set_property("height", "400px")
        .unwrap();
    document.body().unwrap().append_child(&container).unwrap();
    container
}

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn make_editor(id: &str) -> BrowserEditor {
    let editor = unloaded_editor(id);
    editor.load().unwrap();
    editor
}

fn unloaded_editor(id: &str) -> BrowserEditor {
    make_container(id);
    storage::clear(id);
    let options: EditorOptions = serde_json::from_value(json!({
        "container": id,
        "localStorageName": id,
        "useNativeFullscreen": false,
        "file": { "name": "a", "defaultContent": "hello", "autoSave": false }
    }))
    .unwrap();
    BrowserEditor::new(Settings::resolve(options)).unwrap()
}

// === Mounting ===

#[wasm_bindgen_test]
fn test_load_builds_frames() {
    let editor = make_editor("duopane-test-load");
    editor
        .with(|ed| {
            let frames = ed.host().frames().unwrap();
            assert_eq!(frames.editor_body.content_editable(), "true");
            assert_eq!(frames.editor_body.inner_text(), "hello");
            assert!(ed.get("editor").is_some());
            assert!(ed.get("wrapper").is_some());
            assert!(ed.get("nope").is_none());
            Ok(())
        })
        .unwrap();
}

#[wasm_bindgen_test]
fn test_unload_removes_frames() {
    let editor = make_editor("duopane-test-unload");
    editor.unload().unwrap();
    let container = document()
        .get_element_by_id("duopane-test-unload")
        .unwrap();
    assert_eq!(container.child_element_count(), 0);
    editor
        .with(|ed| {
            assert!(ed.is("unloaded"));
            assert!(ed.get("editor").is_none());
            Ok(())
        })
        .unwrap();
}

// === Storage ===

#[wasm_bindgen_test]
fn test_documents_persist_in_local_storage() {
    let editor = make_editor("duopane-test-store");
    editor
        .with(|ed| {
            ed.save(Some("b"), Some("# Title"))?;
            ed.open(Some("b"))?;
            assert_eq!(ed.host().editor_text(), "# Title");
            Ok(())
        })
        .unwrap();

    let raw = web_sys::window()
        .unwrap()
        .local_storage()
        .unwrap()
        .unwrap()
        .get_item("duopane-test-store")
        .unwrap()
        .unwrap();
    assert_eq!(raw, r##"{"files":{"a":"hello","b":"# Title"}}"##);
}

// === Modes ===

#[wasm_bindgen_test]
fn test_preview_toggles_pane_display() {
    let editor = make_editor("duopane-test-modes");
    editor
        .with(|ed| {
            ed.preview(None, false)?;
            assert_eq!(
                ed.flags(),
                ViewModeFlags { edit: false, preview: true, fullscreen: false }
            );
            assert_eq!(ed.host().style(StyleTarget::Editor, "display"), "none");
            assert_eq!(ed.host().style(StyleTarget::Previewer, "display"), "block");
            let frames = ed.host().frames().unwrap();
            assert!(frames.wrapper.class_list().contains("duopane-preview-mode"));

            ed.edit()?;
            assert_eq!(ed.host().style(StyleTarget::Editor, "display"), "block");
            assert!(frames.wrapper.class_list().contains("duopane-edit-mode"));
            Ok(())
        })
        .unwrap();
}

#[wasm_bindgen_test]
fn test_preview_theme_link_is_replaced() {
    let editor = make_editor("duopane-test-theme");
    editor
        .with(|ed| {
            ed.preview(Some("/themes/preview/dark.css"), false)?;
            let frames = ed.host().frames().unwrap();
            let links = frames
                .previewer_document
                .query_selector_all("#duopane-preview-theme")
                .unwrap();
            assert_eq!(links.length(), 1);
            let link = links
                .item(0)
                .unwrap()
                .dyn_into::<web_sys::HtmlLinkElement>()
                .unwrap();
            assert!(link.href().ends_with("/themes/preview/dark.css"));
            Ok(())
        })
        .unwrap();
}

#[wasm_bindgen_test]
fn test_fullscreen_restores_container() {
    let editor = make_editor("duopane-test-fullscreen");
    editor
        .with(|ed| {
            let width = ed.host().style(StyleTarget::Container, "width");
            ed.enter_fullscreen()?;
            assert_eq!(ed.host().style(StyleTarget::Container, "position"), "fixed");
            assert_eq!(ed.host().style(StyleTarget::Editor, "float"), "left");
            Ok(width)
        })
        .and_then(|width| {
            editor.exit_fullscreen()?;
            Ok(width)
        })
        .and_then(|width| {
            editor.with(|ed| {
                assert_eq!(ed.host().style(StyleTarget::Container, "position"), "static");
                assert_eq!(ed.host().style(StyleTarget::Container, "width"), width);
                assert!(!ed.flags().fullscreen);
                Ok(())
            })
        })
        .unwrap();
}

// === Events ===

#[wasm_bindgen_test]
fn test_save_listener_can_read_files() {
    let editor = Rc::new(make_editor("duopane-test-save-listener"));
    let seen = Rc::new(RefCell::new(None));
    let (weak, seen2) = (Rc::downgrade(&editor), seen.clone());
    editor.on(EventKind::Save, move |this, _ev| {
        let Some(editor) = weak.upgrade() else {
            return;
        };
        let files = editor.with(|ed| ed.get_files()).ok();
        *seen2.borrow_mut() = Some((files.map(|f| f.len()), this.is_undefined()));
    });

    editor.with(|ed| ed.save(Some("b"), Some("x"))).unwrap();
    assert_eq!(*seen.borrow(), Some((Some(2), false)));
}

#[wasm_bindgen_test]
fn test_load_listener_can_save() {
    let editor = Rc::new(unloaded_editor("duopane-test-load-listener"));
    let weak = Rc::downgrade(&editor);
    editor.on(EventKind::Load, move |_this, _ev| {
        if let Some(editor) = weak.upgrade() {
            editor
                .with(|ed| ed.save(Some("from-load"), Some("saved")))
                .unwrap();
        }
    });

    editor.load().unwrap();
    let stored = editor.with(|ed| ed.get_file("from-load")).unwrap();
    assert_eq!(stored.as_deref(), Some("saved"));
}

#[wasm_bindgen_test]
fn test_emit_and_remove_listener() {
    let editor = make_editor("duopane-test-emit");
    let log = Rc::new(RefCell::new(Vec::new()));
    let log2 = log.clone();
    let id = editor.on(EventKind::Remove, move |_this, ev| {
        log2.borrow_mut().push(ev.clone());
    });

    let removed = EditorEvent::Remove { name: "gone".into() };
    editor.emit(&removed);
    assert_eq!(*log.borrow(), vec![removed.clone()]);

    assert_eq!(editor.remove_listener(EventKind::Remove, Some(id)), 1);
    editor.emit(&removed);
    assert_eq!(log.borrow().len(), 1);
}
