//! Editor configuration.
//!
//! User-facing options ([`EditorOptions`]) are all optional and arrive from
//! JavaScript as a plain object. [`Settings::resolve`] merges them over the
//! defaults, key by key, into the immutable [`Settings`] an editor instance
//! is built with.

use serde::{Deserialize, Serialize};
use web_time::Duration;

/// Default autosave interval.
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_millis(100);

/// Autosave policy for the active document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AutoSave {
    Disabled,
    Every(Duration),
}

impl AutoSave {
    /// The interval between autosaves, if enabled.
    pub fn interval(&self) -> Option<Duration> {
        match self {
            AutoSave::Disabled => None,
            AutoSave::Every(d) => Some(*d),
        }
    }
}

/// `file.autoSave` accepts either a millisecond interval or a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AutoSaveOption {
    Millis(u64),
    Enabled(bool),
}

impl From<AutoSaveOption> for AutoSave {
    fn from(opt: AutoSaveOption) -> Self {
        match opt {
            AutoSaveOption::Millis(0) | AutoSaveOption::Enabled(false) => AutoSave::Disabled,
            AutoSaveOption::Millis(ms) => AutoSave::Every(Duration::from_millis(ms)),
            AutoSaveOption::Enabled(true) => AutoSave::Every(DEFAULT_AUTOSAVE_INTERVAL),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOptions {
    pub name: Option<String>,
    pub default_content: Option<String>,
    pub auto_save: Option<AutoSaveOption>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThemeOptions {
    pub base: Option<String>,
    pub preview: Option<String>,
    pub editor: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShortcutOptions {
    pub modifier: Option<u32>,
    pub fullscreen: Option<u32>,
    pub preview: Option<u32>,
    pub edit: Option<u32>,
}

/// Options supplied by the embedding page. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorOptions {
    pub container: Option<String>,
    pub base_path: Option<String>,
    pub local_storage_name: Option<String>,
    pub file: FileOptions,
    pub theme: ThemeOptions,
    pub focus_on_load: Option<bool>,
    pub client_side_storage: Option<bool>,
    pub use_native_fullscreen: Option<bool>,
    pub shortcut: ShortcutOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSettings {
    /// Name of the document opened at load.
    pub name: String,
    /// Content used for documents that have no stored entry.
    pub default_content: String,
    pub auto_save: AutoSave,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeSettings {
    pub base: String,
    pub preview: String,
    pub editor: String,
}

/// Keycode bindings for the editor shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShortcutSettings {
    pub modifier: u32,
    pub fullscreen: u32,
    pub preview: u32,
    pub edit: u32,
}

impl Default for ShortcutSettings {
    fn default() -> Self {
        Self {
            // alt
            modifier: 18,
            // f
            fullscreen: 70,
            // p
            preview: 80,
            // o
            edit: 79,
        }
    }
}

/// Fully resolved, immutable editor settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Id of the host element the editor mounts into.
    pub container: String,
    /// Root for theme and image assets.
    pub base_path: String,
    /// Storage namespace holding the store blob.
    pub local_storage_name: String,
    pub file: FileSettings,
    pub theme: ThemeSettings,
    pub focus_on_load: bool,
    /// When false, documents live in memory for the lifetime of the instance.
    pub client_side_storage: bool,
    pub use_native_fullscreen: bool,
    pub shortcut: ShortcutSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            container: "duopane".to_string(),
            base_path: "duopane".to_string(),
            local_storage_name: "duopane".to_string(),
            file: FileSettings {
                name: "duopane".to_string(),
                default_content: String::new(),
                auto_save: AutoSave::Every(DEFAULT_AUTOSAVE_INTERVAL),
            },
            theme: ThemeSettings {
                base: "/themes/base/duopane.css".to_string(),
                preview: "/themes/preview/github.css".to_string(),
                editor: "/themes/editor/epic-dark.css".to_string(),
            },
            focus_on_load: false,
            client_side_storage: true,
            use_native_fullscreen: true,
            shortcut: ShortcutSettings::default(),
        }
    }
}

/// Resolved stylesheet URLs for the three themes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeUrls {
    pub base: String,
    pub editor: String,
    pub preview: String,
}

impl Settings {
    /// Merge `options` over the defaults.
    pub fn resolve(options: EditorOptions) -> Self {
        let defaults = Settings::default();
        let shortcut = ShortcutSettings {
            modifier: options.shortcut.modifier.unwrap_or(defaults.shortcut.modifier),
            fullscreen: options
                .shortcut
                .fullscreen
                .unwrap_or(defaults.shortcut.fullscreen),
            preview: options.shortcut.preview.unwrap_or(defaults.shortcut.preview),
            edit: options.shortcut.edit.unwrap_or(defaults.shortcut.edit),
        };

        Self {
            container: options.container.unwrap_or(defaults.container),
            base_path: options.base_path.unwrap_or(defaults.base_path),
            local_storage_name: options
                .local_storage_name
                .unwrap_or(defaults.local_storage_name),
            file: FileSettings {
                name: options.file.name.unwrap_or(defaults.file.name),
                default_content: options
                    .file
                    .default_content
                    .unwrap_or(defaults.file.default_content),
                auto_save: options
                    .file
                    .auto_save
                    .map(AutoSave::from)
                    .unwrap_or(defaults.file.auto_save),
            },
            theme: ThemeSettings {
                base: options.theme.base.unwrap_or(defaults.theme.base),
                preview: options.theme.preview.unwrap_or(defaults.theme.preview),
                editor: options.theme.editor.unwrap_or(defaults.theme.editor),
            },
            focus_on_load: options.focus_on_load.unwrap_or(defaults.focus_on_load),
            client_side_storage: options
                .client_side_storage
                .unwrap_or(defaults.client_side_storage),
            use_native_fullscreen: options
                .use_native_fullscreen
                .unwrap_or(defaults.use_native_fullscreen),
            shortcut,
        }
    }

    /// Join a theme path onto `base_path`. Absolute URLs pass through.
    pub fn theme_url(&self, path: &str) -> String {
        if path.contains("://") || path.starts_with("//") {
            return path.to_string();
        }
        let base = self.base_path.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if base.is_empty() {
            format!("/{}", path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    pub fn theme_urls(&self) -> ThemeUrls {
        ThemeUrls {
            base: self.theme_url(&self.theme.base),
            editor: self.theme_url(&self.theme.editor),
            preview: self.theme_url(&self.theme.preview),
        }
    }
}

impl From<EditorOptions> for Settings {
    fn from(options: EditorOptions) -> Self {
        Settings::resolve(options)
    }
}
