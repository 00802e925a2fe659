//! Keyboard shortcut tracking.
//!
//! Shortcuts are a held modifier plus a letter key, matched on raw keycodes
//! from `keydown`/`keyup`. The tracker only decides which action a key maps
//! to; the editor performs it.

use crate::config::ShortcutSettings;

pub const KEY_ESCAPE: u32 = 27;
pub const KEY_CTRL: u32 = 17;
pub const KEY_META: u32 = 91;
pub const KEY_S: u32 = 83;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Preview,
    Edit,
    EnterFullscreen,
    ExitFullscreen,
    /// Ctrl/Cmd+S: swallow the browser's save dialog, do nothing else.
    SuppressSave,
}

/// Whether the editor is fullscreen, and how, at the time of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyContext {
    pub fullscreen: bool,
    pub native_fullscreen: bool,
}

#[derive(Debug, Clone)]
pub struct ShortcutTracker {
    bindings: ShortcutSettings,
    modifier_held: bool,
    ctrl_held: bool,
}

impl ShortcutTracker {
    pub fn new(bindings: ShortcutSettings) -> Self {
        Self {
            bindings,
            modifier_held: false,
            ctrl_held: false,
        }
    }

    pub fn modifier_held(&self) -> bool {
        self.modifier_held
    }

    /// Track a key press and map it to an action.
    ///
    /// A returned action always means the default browser behavior should be
    /// prevented.
    pub fn key_down(&mut self, key_code: u32, ctx: KeyContext) -> Option<ShortcutAction> {
        if key_code == self.bindings.modifier {
            self.modifier_held = true;
        }
        if key_code == KEY_CTRL || key_code == KEY_META {
            self.ctrl_held = true;
        }

        if self.ctrl_held && key_code == KEY_S {
            return Some(ShortcutAction::SuppressSave);
        }

        if key_code == KEY_ESCAPE && ctx.fullscreen && !ctx.native_fullscreen {
            return Some(ShortcutAction::ExitFullscreen);
        }

        if !self.modifier_held {
            return None;
        }

        let b = &self.bindings;
        if key_code == b.preview && !ctx.fullscreen {
            Some(ShortcutAction::Preview)
        } else if key_code == b.edit && !ctx.fullscreen {
            Some(ShortcutAction::Edit)
        } else if key_code == b.fullscreen {
            Some(ShortcutAction::EnterFullscreen)
        } else {
            None
        }
    }

    pub fn key_up(&mut self, key_code: u32) {
        if key_code == self.bindings.modifier {
            self.modifier_held = false;
        }
        if key_code == KEY_CTRL || key_code == KEY_META {
            self.ctrl_held = false;
        }
    }

    /// Forget held keys, e.g. after the window lost focus mid-chord.
    pub fn reset(&mut self) {
        self.modifier_held = false;
        self.ctrl_held = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALT: u32 = 18;
    const P: u32 = 80;
    const O: u32 = 79;
    const F: u32 = 70;

    fn tracker() -> ShortcutTracker {
        ShortcutTracker::new(ShortcutSettings::default())
    }

    const WINDOWED: KeyContext = KeyContext { fullscreen: false, native_fullscreen: false };
    const SIMULATED_FS: KeyContext = KeyContext { fullscreen: true, native_fullscreen: false };
    const NATIVE_FS: KeyContext = KeyContext { fullscreen: true, native_fullscreen: true };

    #[test]
    fn test_modifier_chords() {
        let mut t = tracker();
        assert_eq!(t.key_down(P, WINDOWED), None);

        assert_eq!(t.key_down(ALT, WINDOWED), None);
        assert_eq!(t.key_down(P, WINDOWED), Some(ShortcutAction::Preview));
        assert_eq!(t.key_down(O, WINDOWED), Some(ShortcutAction::Edit));
        assert_eq!(t.key_down(F, WINDOWED), Some(ShortcutAction::EnterFullscreen));

        t.key_up(ALT);
        assert!(!t.modifier_held());
        assert_eq!(t.key_down(F, WINDOWED), None);
    }

    #[test]
    fn test_mode_switches_blocked_in_fullscreen() {
        let mut t = tracker();
        t.key_down(ALT, SIMULATED_FS);
        assert_eq!(t.key_down(P, SIMULATED_FS), None);
        assert_eq!(t.key_down(O, SIMULATED_FS), None);
    }

    #[test]
    fn test_escape_exits_only_simulated_fullscreen() {
        let mut t = tracker();
        assert_eq!(t.key_down(KEY_ESCAPE, WINDOWED), None);
        assert_eq!(t.key_down(KEY_ESCAPE, SIMULATED_FS), Some(ShortcutAction::ExitFullscreen));
        assert_eq!(t.key_down(KEY_ESCAPE, NATIVE_FS), None);
    }

    #[test]
    fn test_ctrl_s_is_suppressed() {
        let mut t = tracker();
        assert_eq!(t.key_down(KEY_S, WINDOWED), None);
        t.key_down(KEY_CTRL, WINDOWED);
        assert_eq!(t.key_down(KEY_S, WINDOWED), Some(ShortcutAction::SuppressSave));
        t.key_up(KEY_CTRL);
        assert_eq!(t.key_down(KEY_S, WINDOWED), None);

        t.key_down(KEY_META, WINDOWED);
        assert_eq!(t.key_down(KEY_S, WINDOWED), Some(ShortcutAction::SuppressSave));
    }

    #[test]
    fn test_custom_bindings() {
        let mut t = ShortcutTracker::new(ShortcutSettings {
            modifier: 17,
            fullscreen: 71,
            preview: 81,
            edit: 69,
        });
        t.key_down(17, WINDOWED);
        assert_eq!(t.key_down(81, WINDOWED), Some(ShortcutAction::Preview));
        assert_eq!(t.key_down(P, WINDOWED), None);
    }
}
