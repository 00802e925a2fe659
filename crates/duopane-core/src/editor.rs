//! The editor instance: ties settings, store, surfaces and view mode together.
//!
//! Every operation runs to completion on the caller's thread. State-changing
//! operations emit their event only after the store and the surfaces have
//! been updated, so listeners always observe the new state.

use std::collections::BTreeMap;

use serde::Serialize;
use web_time::{Duration, Instant};

use crate::config::Settings;
use crate::convert::{MarkdownConverter, WeaverMarkdown};
use crate::error::{EditorError, StorageError};
use crate::events::{EditorEvent, EventEmitter, EventKind, ListenerId};
use crate::mode::{SimpleMode, ViewMode, ViewModeFlags};
use crate::platform::RenderHost;
use crate::shortcuts::{KeyContext, ShortcutAction, ShortcutTracker};
use crate::store::{DocumentStore, StorageBackend};
use crate::style::{StylePatch, StyleSnapshot, StyleTarget};
use crate::surface::{LoadLayout, Pane, SurfaceName, fullscreen_layout};
use crate::utility_bar::UtilityBar;

/// Output format for [`Editor::export_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportKind {
    /// Raw markdown.
    #[default]
    Text,
    /// Rendered HTML.
    Html,
    /// `{"name": .., "content": ..}`.
    Json,
}

impl ExportKind {
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "text" | "raw" => Some(ExportKind::Text),
            "html" => Some(ExportKind::Html),
            "json" => Some(ExportKind::Json),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct ExportedFile<'a> {
    name: &'a str,
    content: &'a str,
}

/// State owned by one fullscreen session.
#[derive(Debug)]
struct FullscreenSession {
    snapshot: StyleSnapshot,
    /// Whether the browser's own fullscreen is in use for this session.
    native: bool,
}

/// An embeddable markdown editor over a render host and a storage backend.
pub struct Editor<H: RenderHost, S: StorageBackend> {
    settings: Settings,
    host: H,
    store: DocumentStore<S>,
    converter: Box<dyn MarkdownConverter>,
    events: EventEmitter<H>,
    shortcuts: ShortcutTracker,
    utility_bar: UtilityBar,
    mode: ViewMode,
    active: String,
    loaded: bool,
    /// Native fullscreen capability, resolved once at load.
    native_fullscreen: bool,
    load_snapshot: Option<StyleSnapshot>,
    fullscreen: Option<FullscreenSession>,
    last_autosave: Option<String>,
    /// Emitted events kept for [`Editor::take_events`], when enabled.
    queued: Option<Vec<EditorEvent>>,
}

impl<H: RenderHost, S: StorageBackend> Editor<H, S> {
    pub fn new(settings: Settings, host: H, backend: S) -> Self {
        let store = DocumentStore::new(
            backend,
            settings.local_storage_name.clone(),
            settings.file.name.clone(),
            settings.file.default_content.clone(),
        );
        Self {
            shortcuts: ShortcutTracker::new(settings.shortcut),
            active: settings.file.name.clone(),
            settings,
            host,
            store,
            converter: Box::new(WeaverMarkdown::new()),
            events: EventEmitter::new(),
            utility_bar: UtilityBar::new(),
            mode: ViewMode::Edit,
            loaded: false,
            native_fullscreen: false,
            load_snapshot: None,
            fullscreen: None,
            last_autosave: None,
            queued: None,
        }
    }

    /// Also keep every emitted event for [`Editor::take_events`], so an owner
    /// that shares the editor can deliver them after releasing it.
    pub fn queue_events(mut self) -> Self {
        self.queued = Some(Vec::new());
        self
    }

    /// Replace the markdown converter used for previews and exports.
    pub fn with_converter(mut self, converter: impl MarkdownConverter + 'static) -> Self {
        self.converter = Box::new(converter);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn store(&self) -> &DocumentStore<S> {
        &self.store
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn flags(&self) -> ViewModeFlags {
        self.mode.flags()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn uses_native_fullscreen(&self) -> bool {
        self.native_fullscreen
    }

    /// Name of the document currently in the editable surface.
    pub fn active_document(&self) -> &str {
        &self.active
    }

    /// Query a state by name: `loaded`, `unloaded`, `edit`, `preview`,
    /// `fullscreen`. Unknown names are false.
    pub fn is(&self, state: &str) -> bool {
        let flags = self.flags();
        match state {
            "loaded" => self.loaded,
            "unloaded" => !self.loaded,
            "edit" => self.loaded && flags.edit,
            "preview" => self.loaded && flags.preview,
            "fullscreen" => self.loaded && flags.fullscreen,
            _ => false,
        }
    }

    // === Events ===

    pub fn on(&mut self, kind: EventKind, handler: impl FnMut(&H, &EditorEvent) + 'static) -> ListenerId {
        self.events.on(kind, handler)
    }

    pub fn remove_listener(&mut self, kind: EventKind, id: Option<ListenerId>) -> usize {
        self.events.remove_listener(kind, id)
    }

    /// Emit an event to every listener registered for its kind.
    pub fn emit(&mut self, event: EditorEvent) {
        tracing::trace!(event = %event.kind(), "emit");
        self.events.emit(&self.host, &event);
        if let Some(queued) = &mut self.queued {
            queued.push(event);
        }
    }

    /// Events emitted since the last call, oldest first. Always empty unless
    /// the editor was built with [`Editor::queue_events`].
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        self.queued.as_mut().map(std::mem::take).unwrap_or_default()
    }

    // === Lifecycle ===

    /// Build the surfaces, size them to the container and open the
    /// configured document. Loading an already loaded editor does nothing.
    pub fn load(&mut self) -> Result<(), EditorError> {
        if self.loaded {
            return Ok(());
        }

        self.native_fullscreen =
            self.settings.use_native_fullscreen && self.host.supports_native_fullscreen();

        let container_outer = self.host.outer_size(StyleTarget::Container);
        let container_box = self.host.box_metrics(StyleTarget::Container);
        self.host.mount(&self.settings.theme_urls())?;

        let layout = LoadLayout::fit(
            container_outer,
            container_box,
            self.host.box_metrics(StyleTarget::Editor),
            self.host.box_metrics(StyleTarget::Previewer),
        );
        let patch = layout.to_patch();
        self.load_snapshot = Some(StyleSnapshot::capture(&self.host, &patch));
        patch.apply(&mut self.host);

        match self.store.initialize() {
            Ok(_) => {}
            Err(StorageError::Unavailable) => {
                tracing::warn!(
                    namespace = %self.store.namespace(),
                    "persistent storage unavailable; documents will not be saved"
                );
            }
            Err(e) => {
                self.abort_load();
                return Err(e.into());
            }
        }

        self.mode = ViewMode::Edit;
        self.apply_simple_mode(SimpleMode::Edit);
        self.host.set_utility_bar_visible(false);
        self.utility_bar.hide();
        self.active = self.settings.file.name.clone();
        self.loaded = true;

        if let Err(e) = self.open(None) {
            tracing::warn!(document = %self.active, "load failed opening the document: {}", e);
            self.abort_load();
            return Err(e);
        }

        if self.settings.focus_on_load {
            self.host.focus_editor();
        }

        tracing::debug!(container = %self.settings.container, "editor loaded");
        self.emit(EditorEvent::Load);
        Ok(())
    }

    /// Tear the surfaces down and give the container back its original size.
    pub fn unload(&mut self) -> Result<(), EditorError> {
        self.ensure_loaded()?;

        if self.mode.is_fullscreen() {
            self.exit_fullscreen()?;
        }
        if let Some(snapshot) = self.load_snapshot.take() {
            snapshot.restore(&mut self.host);
        }
        self.host.unmount();
        self.shortcuts.reset();
        self.utility_bar.hide();
        self.loaded = false;
        self.mode = ViewMode::Edit;
        self.last_autosave = None;

        tracing::debug!(container = %self.settings.container, "editor unloaded");
        self.emit(EditorEvent::Unload);
        Ok(())
    }

    // === Surfaces ===

    /// Handle for a named surface. Unknown names give `None`.
    pub fn get(&self, name: &str) -> Option<H::Handle> {
        SurfaceName::parse(name).and_then(|name| self.host.surface(name))
    }

    /// Render the editable text into the preview surface.
    pub fn render_preview(&mut self) {
        let html = self.converter.to_html(&self.host.editor_text());
        self.host.set_preview_html(&html);
    }

    /// The editable text rendered to HTML.
    pub fn export_html(&self) -> String {
        self.converter.to_html(&self.host.editor_text())
    }

    // === Documents ===

    /// Load a document into the editable surface.
    ///
    /// `None` reopens the active document. A name with no stored entry opens
    /// the default content without creating the entry. Does nothing when
    /// storage is unavailable.
    pub fn open(&mut self, name: Option<&str>) -> Result<(), EditorError> {
        self.ensure_loaded()?;
        let name = name.map_or_else(|| self.active.clone(), str::to_owned);

        let content = match self.store.get(&name) {
            Ok(Some(content)) => content,
            Ok(None) => self.settings.file.default_content.clone(),
            Err(StorageError::Unavailable) => {
                tracing::debug!(%name, "open skipped, storage unavailable");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        self.host.set_editor_text(&content);
        self.active = name.clone();
        self.last_autosave = Some(content);
        self.render_preview();

        self.emit(EditorEvent::Open { name });
        Ok(())
    }

    /// Persist a document. Defaults to the active document and the current
    /// editable text.
    pub fn save(&mut self, name: Option<&str>, content: Option<&str>) -> Result<(), EditorError> {
        self.ensure_loaded()?;
        let name = name.map_or_else(|| self.active.clone(), str::to_owned);
        let content = content.map_or_else(|| self.host.editor_text(), str::to_owned);

        self.store.save(&name, &content)?;
        tracing::debug!(%name, bytes = content.len(), "saved document");

        self.emit(EditorEvent::Save { name, content });
        Ok(())
    }

    /// Delete a document. Removing an absent document still emits `remove`.
    pub fn remove(&mut self, name: Option<&str>) -> Result<(), EditorError> {
        self.ensure_loaded()?;
        let name = name.map_or_else(|| self.active.clone(), str::to_owned);

        self.store.remove(&name)?;
        self.emit(EditorEvent::Remove { name });
        Ok(())
    }

    /// Move `old` to `new` and open `new`.
    ///
    /// Renaming a document that was never stored creates `new` empty.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), EditorError> {
        self.ensure_loaded()?;
        if old == new {
            return self.open(Some(new));
        }

        let existed = self.store.rename(old, new)?;
        if !existed {
            tracing::warn!(%old, %new, "renamed a document with no stored entry; created it empty");
        }
        let content = self.store.get(new)?.unwrap_or_default();

        self.emit(EditorEvent::Save {
            name: new.to_string(),
            content,
        });
        self.emit(EditorEvent::Remove {
            name: old.to_string(),
        });
        self.open(Some(new))
    }

    /// Replace a document's content and open it.
    pub fn import_file(&mut self, name: &str, content: &str) -> Result<(), EditorError> {
        self.open(Some(name))?;
        self.host.set_editor_text(content);
        self.save(None, None)?;
        self.open(None)
    }

    /// Every stored document.
    pub fn get_files(&self) -> Result<BTreeMap<String, String>, EditorError> {
        Ok(self.store.files()?.files)
    }

    /// One stored document, if present.
    pub fn get_file(&self, name: &str) -> Result<Option<String>, EditorError> {
        Ok(self.store.get(name)?)
    }

    /// Export a stored document. `None` when the document does not exist.
    pub fn export_file(&self, name: Option<&str>, kind: ExportKind) -> Result<Option<String>, EditorError> {
        let name = name.unwrap_or(&self.active);
        let Some(content) = self.store.get(name)? else {
            return Ok(None);
        };
        let exported = match kind {
            ExportKind::Text => content,
            ExportKind::Html => self.converter.to_html(&content),
            ExportKind::Json => serde_json::to_string(&ExportedFile {
                name,
                content: &content,
            })
            .map_err(StorageError::from)?,
        };
        Ok(Some(exported))
    }

    // === View modes ===

    /// Show the rendered preview.
    ///
    /// `theme` overrides the configured preview stylesheet. A `live` call
    /// only re-renders: surfaces and mode stay as they are.
    pub fn preview(&mut self, theme: Option<&str>, live: bool) -> Result<(), EditorError> {
        self.ensure_loaded()?;

        let href = self
            .settings
            .theme_url(theme.unwrap_or(&self.settings.theme.preview));
        self.host.set_mode_class(SimpleMode::Preview);
        self.host.set_preview_theme(&href);
        self.render_preview();

        if live {
            return Ok(());
        }

        if !self.mode.is_fullscreen() {
            self.host.set_pane_visible(Pane::Editor, false);
            self.host.set_pane_visible(Pane::Previewer, true);
        }
        self.mode = self.mode.switch_to(SimpleMode::Preview);
        tracing::debug!(mode = ?self.mode, "preview");

        self.emit(EditorEvent::Preview);
        Ok(())
    }

    /// Show the editable surface.
    pub fn edit(&mut self) -> Result<(), EditorError> {
        self.ensure_loaded()?;

        if !self.mode.is_fullscreen() {
            self.apply_simple_mode(SimpleMode::Edit);
        }
        self.mode = self.mode.switch_to(SimpleMode::Edit);
        self.host.focus_editor();
        tracing::debug!(mode = ?self.mode, "edit");

        self.emit(EditorEvent::Edit);
        Ok(())
    }

    /// Lay both surfaces out side by side over the whole viewport, updating
    /// the preview as the user types. Does nothing if already fullscreen.
    pub fn enter_fullscreen(&mut self) -> Result<(), EditorError> {
        self.ensure_loaded()?;
        let Some(next) = self.mode.enter_fullscreen() else {
            return Ok(());
        };

        let patch = self.fullscreen_patch();
        let snapshot = StyleSnapshot::capture(&self.host, &patch);

        let mut native = self.native_fullscreen;
        if native {
            if let Err(e) = self.host.request_native_fullscreen() {
                tracing::warn!("native fullscreen request failed, simulating: {}", e);
                native = false;
            }
        }
        if !native {
            self.host.set_body_scrolling(false);
        }

        patch.apply(&mut self.host);
        self.host.set_pane_visible(Pane::Editor, true);
        self.host.set_pane_visible(Pane::Previewer, true);
        self.host.set_utility_bar_visible(false);
        self.utility_bar.hide();

        self.fullscreen = Some(FullscreenSession { snapshot, native });
        self.mode = next;
        self.preview(None, true)?;
        self.host.focus_editor();
        tracing::debug!(native, mode = ?self.mode, "entered fullscreen");

        self.emit(EditorEvent::FullscreenEnter);
        Ok(())
    }

    /// Put every style back as it was before fullscreen and return to the
    /// mode fullscreen was entered from. Does nothing outside fullscreen.
    pub fn exit_fullscreen(&mut self) -> Result<(), EditorError> {
        self.ensure_loaded()?;
        let Some(next) = self.mode.exit_fullscreen() else {
            return Ok(());
        };

        if let Some(session) = self.fullscreen.take() {
            session.snapshot.restore(&mut self.host);
            if session.native {
                self.host.exit_native_fullscreen();
            } else {
                self.host.set_body_scrolling(true);
            }
        }

        self.mode = next;
        self.apply_simple_mode(next.simple());
        if next.simple() == SimpleMode::Preview {
            self.render_preview();
        }
        self.utility_bar.reveal(Instant::now());
        self.host.set_utility_bar_visible(true);
        tracing::debug!(mode = ?self.mode, "exited fullscreen");

        self.emit(EditorEvent::FullscreenExit);
        Ok(())
    }

    /// Re-fit the fullscreen layout to a resized viewport.
    pub fn resize(&mut self) {
        if !self.loaded || !self.mode.is_fullscreen() {
            return;
        }
        self.fullscreen_patch().apply(&mut self.host);
    }

    /// The browser entered or left its own fullscreen.
    pub fn native_fullscreen_changed(&mut self, active: bool) -> Result<(), EditorError> {
        let native_session = self.fullscreen.as_ref().is_some_and(|s| s.native);
        if !active && native_session {
            self.exit_fullscreen()?;
        }
        Ok(())
    }

    /// Called on every keystroke in the editable surface.
    pub fn editor_keystroke(&mut self) -> Result<(), EditorError> {
        if self.loaded && self.mode.is_fullscreen() {
            self.preview(None, true)?;
        }
        Ok(())
    }

    // === Input ===

    /// Handle a `keydown`. Returns the action taken; any action means the
    /// browser's default should be prevented.
    pub fn key_down(&mut self, key_code: u32) -> Result<Option<ShortcutAction>, EditorError> {
        let ctx = KeyContext {
            fullscreen: self.mode.is_fullscreen(),
            native_fullscreen: self.fullscreen.as_ref().is_some_and(|s| s.native),
        };
        let Some(action) = self.shortcuts.key_down(key_code, ctx) else {
            return Ok(None);
        };
        if !self.loaded {
            return Ok(None);
        }

        match action {
            ShortcutAction::Preview => self.preview(None, false)?,
            ShortcutAction::Edit => self.edit()?,
            ShortcutAction::EnterFullscreen => self.enter_fullscreen()?,
            ShortcutAction::ExitFullscreen => self.exit_fullscreen()?,
            ShortcutAction::SuppressSave => {}
        }
        Ok(Some(action))
    }

    pub fn key_up(&mut self, key_code: u32) {
        self.shortcuts.key_up(key_code);
    }

    /// Track pointer movement. Returns true if the utility bar was revealed,
    /// meaning the caller should restart its hide timer.
    pub fn pointer_moved(&mut self, x: f64, y: f64) -> bool {
        self.pointer_moved_at(x, y, Instant::now())
    }

    pub fn pointer_moved_at(&mut self, x: f64, y: f64, now: Instant) -> bool {
        if !self.loaded || self.mode.is_fullscreen() {
            self.utility_bar.track(x, y);
            return false;
        }
        let revealed = self.utility_bar.pointer_moved(x, y, now);
        if revealed {
            self.host.set_utility_bar_visible(true);
        }
        revealed
    }

    /// Hide the utility bar if its visibility window has passed.
    pub fn utility_bar_tick(&mut self, now: Instant) {
        if self.utility_bar.expire(now) {
            self.host.set_utility_bar_visible(false);
        }
    }

    pub fn utility_bar_visible(&self, now: Instant) -> bool {
        self.utility_bar.is_visible(now)
    }

    // === Autosave ===

    pub fn autosave_interval(&self) -> Option<Duration> {
        self.settings.file.auto_save.interval()
    }

    /// Persist the editable text if it changed since the last autosave.
    ///
    /// Returns whether anything was written.
    pub fn autosave_tick(&mut self) -> Result<bool, EditorError> {
        if !self.loaded {
            return Ok(false);
        }
        let content = self.host.editor_text();
        if self.last_autosave.as_deref() == Some(content.as_str()) {
            return Ok(false);
        }

        let result = self.save(None, Some(&content));
        // Recorded even on failure: the next attempt waits for new content.
        self.last_autosave = Some(content.clone());
        if let Err(e) = result {
            tracing::error!(document = %self.active, "autosave failed: {}", e);
            return Err(e);
        }
        self.emit(EditorEvent::Autosave {
            name: self.active.clone(),
            content,
        });
        Ok(true)
    }

    // === Internals ===

    fn ensure_loaded(&self) -> Result<(), EditorError> {
        if self.loaded {
            Ok(())
        } else {
            Err(EditorError::NotLoaded)
        }
    }

    /// Undo a partial load: the container gets its styles back and the
    /// surfaces go away.
    fn abort_load(&mut self) {
        self.loaded = false;
        if let Some(snapshot) = self.load_snapshot.take() {
            snapshot.restore(&mut self.host);
        }
        self.host.unmount();
    }

    fn apply_simple_mode(&mut self, mode: SimpleMode) {
        self.host.set_mode_class(mode);
        self.host
            .set_pane_visible(Pane::Editor, mode == SimpleMode::Edit);
        self.host
            .set_pane_visible(Pane::Previewer, mode == SimpleMode::Preview);
    }

    fn fullscreen_patch(&self) -> StylePatch {
        fullscreen_layout(
            self.host.viewport(),
            self.host.box_metrics(StyleTarget::Editor),
            self.host.box_metrics(StyleTarget::Previewer),
        )
    }
}
