//! Named editor events and a small per-instance emitter.
//!
//! Listeners receive a context value (the render host, whose document the
//! browser binds as `this`) and the event payload. Handlers for one kind run
//! synchronously in registration order.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;

/// The closed set of events an editor emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Load,
    Unload,
    Open,
    Save,
    Remove,
    Preview,
    Edit,
    FullscreenEnter,
    FullscreenExit,
    Autosave,
}

impl EventKind {
    pub const ALL: [EventKind; 10] = [
        EventKind::Load,
        EventKind::Unload,
        EventKind::Open,
        EventKind::Save,
        EventKind::Remove,
        EventKind::Preview,
        EventKind::Edit,
        EventKind::FullscreenEnter,
        EventKind::FullscreenExit,
        EventKind::Autosave,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Load => "load",
            EventKind::Unload => "unload",
            EventKind::Open => "open",
            EventKind::Save => "save",
            EventKind::Remove => "remove",
            EventKind::Preview => "preview",
            EventKind::Edit => "edit",
            EventKind::FullscreenEnter => "fullscreenenter",
            EventKind::FullscreenExit => "fullscreenexit",
            EventKind::Autosave => "autosave",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        EventKind::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An emitted event with its payload.
///
/// Serializes to the payload alone: `null` for events without data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EditorEvent {
    Load,
    Unload,
    Open { name: String },
    Save { name: String, content: String },
    Remove { name: String },
    Preview,
    Edit,
    FullscreenEnter,
    FullscreenExit,
    Autosave { name: String, content: String },
}

impl EditorEvent {
    /// Build the event of `kind` from loose payload fields. Fields the kind
    /// does not carry are ignored, missing ones are empty.
    pub fn from_parts(kind: EventKind, name: Option<String>, content: Option<String>) -> Self {
        let name = name.unwrap_or_default();
        let content = content.unwrap_or_default();
        match kind {
            EventKind::Load => EditorEvent::Load,
            EventKind::Unload => EditorEvent::Unload,
            EventKind::Open => EditorEvent::Open { name },
            EventKind::Save => EditorEvent::Save { name, content },
            EventKind::Remove => EditorEvent::Remove { name },
            EventKind::Preview => EditorEvent::Preview,
            EventKind::Edit => EditorEvent::Edit,
            EventKind::FullscreenEnter => EditorEvent::FullscreenEnter,
            EventKind::FullscreenExit => EditorEvent::FullscreenExit,
            EventKind::Autosave => EditorEvent::Autosave { name, content },
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            EditorEvent::Load => EventKind::Load,
            EditorEvent::Unload => EventKind::Unload,
            EditorEvent::Open { .. } => EventKind::Open,
            EditorEvent::Save { .. } => EventKind::Save,
            EditorEvent::Remove { .. } => EventKind::Remove,
            EditorEvent::Preview => EventKind::Preview,
            EditorEvent::Edit => EventKind::Edit,
            EditorEvent::FullscreenEnter => EventKind::FullscreenEnter,
            EditorEvent::FullscreenExit => EventKind::FullscreenExit,
            EditorEvent::Autosave { .. } => EventKind::Autosave,
        }
    }
}

/// Identifies one registered listener for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

type Handler<C> = Rc<RefCell<dyn FnMut(&C, &EditorEvent)>>;

struct Listener<C> {
    id: ListenerId,
    kind: EventKind,
    handler: Handler<C>,
}

/// Per-instance event emitter.
pub struct EventEmitter<C> {
    listeners: Vec<Listener<C>>,
    next_id: u64,
}

impl<C> Default for EventEmitter<C> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }
}

impl<C> fmt::Debug for EventEmitter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<C> EventEmitter<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind`. Several handlers per kind are allowed.
    pub fn on(&mut self, kind: EventKind, handler: impl FnMut(&C, &EditorEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            kind,
            handler: Rc::new(RefCell::new(handler)),
        });
        id
    }

    /// Invoke every handler registered for the event's kind.
    pub fn emit(&mut self, ctx: &C, event: &EditorEvent) {
        call_all(self.handlers(event.kind()), ctx, event);
    }

    /// Emit through a shared emitter without holding its borrow while
    /// handlers run, so a handler may register or remove listeners.
    ///
    /// Handlers registered during the emit are not called for this event. A
    /// handler already running further up the stack is skipped.
    pub fn emit_shared(emitter: &RefCell<Self>, ctx: &C, event: &EditorEvent) {
        let handlers = emitter.borrow().handlers(event.kind());
        call_all(handlers, ctx, event);
    }

    /// Remove one listener, or every listener for `kind` when `id` is `None`.
    ///
    /// Returns how many listeners were removed.
    pub fn remove_listener(&mut self, kind: EventKind, id: Option<ListenerId>) -> usize {
        let before = self.listeners.len();
        self.listeners
            .retain(|l| l.kind != kind || id.is_some_and(|id| l.id != id));
        before - self.listeners.len()
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.iter().filter(|l| l.kind == kind).count()
    }

    fn handlers(&self, kind: EventKind) -> Vec<Handler<C>> {
        self.listeners
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.handler.clone())
            .collect()
    }
}

fn call_all<C>(handlers: Vec<Handler<C>>, ctx: &C, event: &EditorEvent) {
    for handler in handlers {
        match handler.try_borrow_mut() {
            Ok(mut handler) => (&mut *handler)(ctx, event),
            Err(_) => tracing::warn!(event = %event.kind(), "skipped re-entrant listener"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&'static str) -> Box<dyn FnMut(&(), &EditorEvent)>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log2 = log.clone();
        let make = move |tag: &'static str| {
            let log = log2.clone();
            Box::new(move |_: &(), ev: &EditorEvent| {
                log.borrow_mut().push(format!("{tag}:{}", ev.kind()));
            }) as Box<dyn FnMut(&(), &EditorEvent)>
        };
        (log, make)
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let (log, make) = recorder();
        let mut events = EventEmitter::new();
        events.on(EventKind::Save, make("first"));
        events.on(EventKind::Open, make("other"));
        events.on(EventKind::Save, make("second"));

        events.emit(&(), &EditorEvent::Save { name: "a".into(), content: "x".into() });
        assert_eq!(*log.borrow(), vec!["first:save", "second:save"]);
    }

    #[test]
    fn test_emit_without_handlers_is_noop() {
        let mut events: EventEmitter<()> = EventEmitter::new();
        events.emit(&(), &EditorEvent::Load);
        assert_eq!(events.listener_count(EventKind::Load), 0);
    }

    #[test]
    fn test_remove_single_listener() {
        let (log, make) = recorder();
        let mut events = EventEmitter::new();
        let first = events.on(EventKind::Edit, make("first"));
        events.on(EventKind::Edit, make("second"));

        assert_eq!(events.remove_listener(EventKind::Edit, Some(first)), 1);
        events.emit(&(), &EditorEvent::Edit);
        assert_eq!(*log.borrow(), vec!["second:edit"]);
    }

    #[test]
    fn test_remove_all_listeners_of_kind() {
        let (log, make) = recorder();
        let mut events = EventEmitter::new();
        events.on(EventKind::Preview, make("a"));
        events.on(EventKind::Preview, make("b"));
        events.on(EventKind::Edit, make("c"));

        assert_eq!(events.remove_listener(EventKind::Preview, None), 2);
        events.emit(&(), &EditorEvent::Preview);
        events.emit(&(), &EditorEvent::Edit);
        assert_eq!(*log.borrow(), vec!["c:edit"]);
    }

    #[test]
    fn test_removing_id_of_other_kind_keeps_listener() {
        let (_log, make) = recorder();
        let mut events = EventEmitter::new();
        let save = events.on(EventKind::Save, make("s"));
        assert_eq!(events.remove_listener(EventKind::Open, Some(save)), 0);
        assert_eq!(events.listener_count(EventKind::Save), 1);
    }

    #[test]
    fn test_shared_emit_lets_handlers_register_listeners() {
        let (log, make) = recorder();
        let events = Rc::new(RefCell::new(EventEmitter::new()));
        let inner = events.clone();
        let late = RefCell::new(Some(make("late")));
        events.borrow_mut().on(EventKind::Save, make("first"));
        events.borrow_mut().on(EventKind::Save, move |_: &(), _: &EditorEvent| {
            if let Some(handler) = late.borrow_mut().take() {
                inner.borrow_mut().on(EventKind::Save, handler);
            }
        });

        let save = EditorEvent::Save { name: "a".into(), content: "x".into() };
        EventEmitter::emit_shared(&events, &(), &save);
        assert_eq!(*log.borrow(), vec!["first:save"]);

        EventEmitter::emit_shared(&events, &(), &save);
        assert_eq!(*log.borrow(), vec!["first:save", "first:save", "late:save"]);
    }

    #[test]
    fn test_shared_emit_skips_re_entrant_handler() {
        let calls = Rc::new(RefCell::new(0));
        let events: Rc<RefCell<EventEmitter<()>>> = Rc::new(RefCell::new(EventEmitter::new()));
        let (inner, counter) = (events.clone(), calls.clone());
        events.borrow_mut().on(EventKind::Edit, move |_: &(), ev: &EditorEvent| {
            *counter.borrow_mut() += 1;
            EventEmitter::emit_shared(&inner, &(), ev);
        });

        EventEmitter::emit_shared(&events, &(), &EditorEvent::Edit);
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_event_names_parse() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EventKind::parse("update"), None);
    }

    #[test]
    fn test_from_parts_matches_kind() {
        for kind in EventKind::ALL {
            assert_eq!(EditorEvent::from_parts(kind, None, None).kind(), kind);
        }
        assert_eq!(
            EditorEvent::from_parts(EventKind::Open, Some("a".into()), Some("ignored".into())),
            EditorEvent::Open { name: "a".into() }
        );
        assert_eq!(
            EditorEvent::from_parts(EventKind::Save, Some("a".into()), None),
            EditorEvent::Save { name: "a".into(), content: String::new() }
        );
    }

    #[test]
    fn test_payload_serialization() {
        let open = serde_json::to_string(&EditorEvent::Open { name: "a".into() }).unwrap();
        assert_eq!(open, r#"{"name":"a"}"#);
        assert_eq!(serde_json::to_string(&EditorEvent::Load).unwrap(), "null");
    }
}
