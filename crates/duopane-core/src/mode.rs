//! View modes.
//!
//! The editor is always in exactly one [`ViewMode`]. Fullscreen carries the
//! simple mode it was entered from, so leaving fullscreen lands back where
//! the user was.

use serde::Serialize;

/// The two mutually exclusive modes outside fullscreen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SimpleMode {
    #[default]
    Edit,
    Preview,
}

impl SimpleMode {
    /// CSS class applied to the wrapper in this mode.
    pub fn class_name(&self) -> &'static str {
        match self {
            SimpleMode::Edit => "duopane-edit-mode",
            SimpleMode::Preview => "duopane-preview-mode",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Edit,
    Preview,
    /// Both surfaces side by side. `resume` is restored on exit.
    Fullscreen { resume: SimpleMode },
}

impl From<SimpleMode> for ViewMode {
    fn from(mode: SimpleMode) -> Self {
        match mode {
            SimpleMode::Edit => ViewMode::Edit,
            SimpleMode::Preview => ViewMode::Preview,
        }
    }
}

impl ViewMode {
    pub fn is_fullscreen(&self) -> bool {
        matches!(self, ViewMode::Fullscreen { .. })
    }

    /// The simple mode in effect, or the one fullscreen will return to.
    pub fn simple(&self) -> SimpleMode {
        match self {
            ViewMode::Edit => SimpleMode::Edit,
            ViewMode::Preview => SimpleMode::Preview,
            ViewMode::Fullscreen { resume } => *resume,
        }
    }

    /// Enter fullscreen from the current mode. `None` if already fullscreen.
    pub fn enter_fullscreen(self) -> Option<ViewMode> {
        match self {
            ViewMode::Fullscreen { .. } => None,
            other => Some(ViewMode::Fullscreen {
                resume: other.simple(),
            }),
        }
    }

    /// Leave fullscreen. `None` if not fullscreen.
    pub fn exit_fullscreen(self) -> Option<ViewMode> {
        match self {
            ViewMode::Fullscreen { resume } => Some(resume.into()),
            _ => None,
        }
    }

    /// Switch to `mode`. In fullscreen only the resume target changes.
    pub fn switch_to(self, mode: SimpleMode) -> ViewMode {
        match self {
            ViewMode::Fullscreen { .. } => ViewMode::Fullscreen { resume: mode },
            _ => mode.into(),
        }
    }

    pub fn flags(&self) -> ViewModeFlags {
        match self {
            ViewMode::Edit => ViewModeFlags {
                edit: true,
                preview: false,
                fullscreen: false,
            },
            ViewMode::Preview => ViewModeFlags {
                edit: false,
                preview: true,
                fullscreen: false,
            },
            ViewMode::Fullscreen { .. } => ViewModeFlags {
                edit: true,
                preview: true,
                fullscreen: true,
            },
        }
    }
}

/// Boolean view of a [`ViewMode`], as exposed to the embedding page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewModeFlags {
    pub edit: bool,
    pub preview: bool,
    pub fullscreen: bool,
}

impl ViewModeFlags {
    /// Exactly one of edit/preview outside fullscreen, both inside.
    pub fn is_consistent(&self) -> bool {
        if self.fullscreen {
            self.edit && self.preview
        } else {
            self.edit ^ self.preview
        }
    }
}
