//! `BrowserEditor`: an [`Editor`] over the DOM plus the listeners and timers
//! that drive it.
//!
//! The editor lives in a shared cell so DOM callbacks can reach it. Callbacks
//! hold only weak references and use `try_borrow_mut`, so a DOM event that
//! arrives while the editor is already running is logged and dropped instead
//! of panicking.
//!
//! Editor events queue up while the editor is borrowed and reach the
//! listeners registered with [`BrowserEditor::on`] once the borrow is
//! released, before the call that caused them returns. Listeners may call
//! back into the same editor.

use std::cell::{RefCell, RefMut};
use std::rc::{Rc, Weak};

use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{EventTarget, KeyboardEvent, MouseEvent};
use web_time::Instant;

use duopane_core::utility_bar::VISIBLE_FOR;
use duopane_core::{
    Editor, EditorError, EditorEvent, EventEmitter, EventKind, HostError, ListenerId,
    MemoryStorage, RenderHost, Settings, ShortcutAction, StorageBackend, SurfaceName,
};

use crate::host::BrowserHost;
use crate::storage::LocalStorageBackend;

pub type InnerEditor = Editor<BrowserHost, Box<dyn StorageBackend>>;

struct Shared {
    editor: RefCell<InnerEditor>,
    /// Editor event listeners, called with `this` bound to the outer document.
    events: RefCell<EventEmitter<JsValue>>,
    listeners: RefCell<Vec<EventListener>>,
    autosave: RefCell<Option<Interval>>,
    bar_timer: RefCell<Option<Timeout>>,
}

impl Shared {
    fn editor(&self) -> Result<RefMut<'_, InnerEditor>, EditorError> {
        self.editor
            .try_borrow_mut()
            .map_err(|_| EditorError::Host(HostError::from("editor is busy")))
    }

    /// Hand queued editor events to the listeners until none are left.
    fn deliver(&self) {
        loop {
            let (events, this) = match self.editor.try_borrow_mut() {
                Ok(mut editor) => (editor.take_events(), document_handle(&editor)),
                // The call holding the editor delivers once it is done.
                Err(_) => return,
            };
            if events.is_empty() {
                return;
            }
            for event in &events {
                EventEmitter::emit_shared(&self.events, &this, event);
            }
        }
    }
}

fn document_handle(editor: &InnerEditor) -> JsValue {
    editor
        .host()
        .surface(SurfaceName::Document)
        .unwrap_or(JsValue::UNDEFINED)
}

/// A loaded-or-not editor bound to a container element of the page.
pub struct BrowserEditor {
    shared: Rc<Shared>,
}

impl BrowserEditor {
    /// Bind to the element whose id is `settings.container`.
    pub fn new(settings: Settings) -> Result<Self, EditorError> {
        let host = BrowserHost::new(&settings.container)?;
        Ok(Self::with_host(settings, host))
    }

    pub fn with_host(settings: Settings, host: BrowserHost) -> Self {
        let backend: Box<dyn StorageBackend> = if settings.client_side_storage {
            Box::new(LocalStorageBackend::new())
        } else {
            Box::new(MemoryStorage::new())
        };
        let editor = Editor::new(settings, host, backend).queue_events();
        Self {
            shared: Rc::new(Shared {
                editor: RefCell::new(editor),
                events: RefCell::new(EventEmitter::new()),
                listeners: RefCell::new(Vec::new()),
                autosave: RefCell::new(None),
                bar_timer: RefCell::new(None),
            }),
        }
    }

    /// Run `f` against the editor, then deliver the events it emitted.
    pub fn with<R>(
        &self,
        f: impl FnOnce(&mut InnerEditor) -> Result<R, EditorError>,
    ) -> Result<R, EditorError> {
        let result = {
            let mut editor = self.shared.editor()?;
            f(&mut editor)
        };
        self.shared.deliver();
        result
    }

    /// Register `handler` for `kind`. It receives the outer document handle
    /// and the event payload.
    pub fn on(
        &self,
        kind: EventKind,
        handler: impl FnMut(&JsValue, &EditorEvent) + 'static,
    ) -> ListenerId {
        self.shared.events.borrow_mut().on(kind, handler)
    }

    pub fn remove_listener(&self, kind: EventKind, id: Option<ListenerId>) -> usize {
        self.shared.events.borrow_mut().remove_listener(kind, id)
    }

    /// Call the listeners for `event` directly, as if the editor emitted it.
    pub fn emit(&self, event: &EditorEvent) {
        EventEmitter::emit_shared(&self.shared.events, &self.document(), event);
    }

    /// Handle for the outer document, `undefined` while unloaded.
    pub fn document(&self) -> JsValue {
        self.shared
            .editor
            .try_borrow()
            .map(|editor| document_handle(&editor))
            .unwrap_or(JsValue::UNDEFINED)
    }

    pub fn load(&self) -> Result<(), EditorError> {
        self.with(|ed| ed.load())?;
        if self.shared.listeners.borrow().is_empty() {
            self.attach()?;
        }
        Ok(())
    }

    pub fn unload(&self) -> Result<(), EditorError> {
        self.detach();
        self.with(|ed| ed.unload())
    }

    /// Exit fullscreen and start the hide timer for the revealed utility bar.
    pub fn exit_fullscreen(&self) -> Result<(), EditorError> {
        self.with(|ed| ed.exit_fullscreen())?;
        restart_bar_timer(&self.shared);
        Ok(())
    }

    fn attach(&self) -> Result<(), EditorError> {
        let (frames, document) = {
            let editor = self.shared.editor()?;
            let host = editor.host();
            let frames = host
                .frames()
                .cloned()
                .ok_or_else(|| HostError::from("editor frames are not mounted"))?;
            (frames, host.document().clone())
        };
        let shared = &self.shared;
        let window = gloo_utils::window();
        let mut listeners = Vec::new();

        let weak = Rc::downgrade(shared);
        listeners.push(EventListener::new(&window, "resize", move |_| {
            run(&weak, "resize", |_, ed| {
                ed.resize();
                Ok(())
            });
        }));

        let weak = Rc::downgrade(shared);
        listeners.push(EventListener::new(&document, "fullscreenchange", move |_| {
            let active = gloo_utils::document().fullscreen_element().is_some();
            run(&weak, "fullscreenchange", |shared, ed| {
                let was_fullscreen = ed.flags().fullscreen;
                ed.native_fullscreen_changed(active)?;
                if was_fullscreen && !ed.flags().fullscreen {
                    restart_bar_timer(shared);
                }
                Ok(())
            });
        }));

        for target in [
            &*document,
            &*frames.wrapper_document,
            &*frames.editor_document,
            &*frames.previewer_document,
        ] {
            listeners.push(key_down_listener(shared, target));
            listeners.push(key_up_listener(shared, target));
        }

        for target in [
            &*frames.wrapper_document,
            &*frames.editor_document,
            &*frames.previewer_document,
        ] {
            listeners.push(pointer_listener(shared, target));
        }

        let weak = Rc::downgrade(shared);
        listeners.push(EventListener::new(
            &frames.editor_document,
            "keyup",
            move |_| {
                run(&weak, "live preview", |_, ed| ed.editor_keystroke());
            },
        ));

        let weak = Rc::downgrade(shared);
        listeners.push(EventListener::new(
            &frames.toggle_button,
            "click",
            move |_| {
                run(&weak, "toggle", |_, ed| {
                    if ed.flags().preview {
                        ed.edit()
                    } else {
                        ed.preview(None, false)
                    }
                });
            },
        ));

        let weak = Rc::downgrade(shared);
        listeners.push(EventListener::new(
            &frames.fullscreen_button,
            "click",
            move |_| {
                run(&weak, "fullscreen", |_, ed| ed.enter_fullscreen());
            },
        ));

        *shared.listeners.borrow_mut() = listeners;

        let interval = shared.editor()?.autosave_interval();
        if let Some(interval) = interval {
            let weak = Rc::downgrade(shared);
            let millis = u32::try_from(interval.as_millis()).unwrap_or(u32::MAX);
            *shared.autosave.borrow_mut() = Some(Interval::new(millis, move || {
                // Failures are logged by the editor, once per content change.
                run(&weak, "autosave", |_, ed| {
                    let _ = ed.autosave_tick();
                    Ok(())
                });
            }));
        }
        tracing::debug!("attached browser listeners");
        Ok(())
    }

    fn detach(&self) {
        self.shared.listeners.borrow_mut().clear();
        self.shared.autosave.borrow_mut().take();
        self.shared.bar_timer.borrow_mut().take();
    }
}

fn run(
    weak: &Weak<Shared>,
    what: &str,
    f: impl FnOnce(&Rc<Shared>, &mut InnerEditor) -> Result<(), EditorError>,
) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let result = shared.editor().and_then(|mut ed| f(&shared, &mut ed));
    shared.deliver();
    if let Err(e) = result {
        tracing::warn!("{} failed: {}", what, e);
    }
}

/// Replace the utility bar hide timer. Dropping the old handle cancels it.
fn restart_bar_timer(shared: &Rc<Shared>) {
    let weak = Rc::downgrade(shared);
    let millis = u32::try_from(VISIBLE_FOR.as_millis()).unwrap_or(u32::MAX);
    let timeout = Timeout::new(millis, move || {
        run(&weak, "utility bar", |_, ed| {
            ed.utility_bar_tick(Instant::now());
            Ok(())
        });
    });
    *shared.bar_timer.borrow_mut() = Some(timeout);
}

fn key_down_listener(shared: &Rc<Shared>, target: &EventTarget) -> EventListener {
    let weak = Rc::downgrade(shared);
    EventListener::new_with_options(
        target,
        "keydown",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let code = key.key_code();
            run(&weak, "keydown", |shared, ed| {
                let action = ed.key_down(code)?;
                if action.is_some() {
                    event.prevent_default();
                }
                if action == Some(ShortcutAction::ExitFullscreen) {
                    restart_bar_timer(shared);
                }
                Ok(())
            });
        },
    )
}

fn key_up_listener(shared: &Rc<Shared>, target: &EventTarget) -> EventListener {
    let weak = Rc::downgrade(shared);
    EventListener::new(target, "keyup", move |event| {
        let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let code = key.key_code();
        run(&weak, "keyup", |_, ed| {
            ed.key_up(code);
            Ok(())
        });
    })
}

fn pointer_listener(shared: &Rc<Shared>, target: &EventTarget) -> EventListener {
    let weak = Rc::downgrade(shared);
    EventListener::new(target, "mousemove", move |event| {
        let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let (x, y) = (f64::from(mouse.client_x()), f64::from(mouse.client_y()));
        run(&weak, "mousemove", |shared, ed| {
            if ed.pointer_moved(x, y) {
                restart_bar_timer(shared);
            }
            Ok(())
        });
    })
}
