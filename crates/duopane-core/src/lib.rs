//! duopane-core: framework-free logic for the duopane markdown editor.
//!
//! This crate provides:
//! - `Settings` - option merging over defaults
//! - `DocumentStore<S>` - named documents in one serialized blob over any `StorageBackend`
//! - `ViewMode` - the edit / preview / fullscreen state machine
//! - `StyleSnapshot` - capture and restore of layout styles around fullscreen
//! - `EventEmitter` - per-instance typed events
//! - `Editor<H, S>` - the instance tying these together, generic over a `RenderHost`

pub mod config;
pub mod convert;
pub mod editor;
pub mod error;
pub mod events;
pub mod mode;
pub mod platform;
pub mod shortcuts;
pub mod store;
pub mod style;
pub mod surface;
pub mod utility_bar;

#[cfg(test)]
pub(crate) mod test_host;

pub use config::{AutoSave, EditorOptions, Settings, ShortcutSettings, ThemeUrls};
pub use convert::{MarkdownConverter, WeaverMarkdown};
pub use editor::{Editor, ExportKind};
pub use error::{EditorError, HostError, StorageError};
pub use events::{EditorEvent, EventEmitter, EventKind, ListenerId};
pub use mode::{SimpleMode, ViewMode, ViewModeFlags};
pub use platform::RenderHost;
pub use shortcuts::{ShortcutAction, ShortcutTracker};
pub use store::{DocumentStore, MemoryStorage, StorageBackend, StoreBlob, UnavailableStorage};
pub use style::{StylePatch, StyleSnapshot, StyleTarget};
pub use surface::{BoxMetrics, LoadLayout, Pane, Size, SurfaceName};
pub use utility_bar::UtilityBar;
