//! Platform abstraction for the editor's rendering surfaces.
//!
//! [`RenderHost`] is the interface between the editor logic and whatever
//! actually owns the frames: the browser DOM in `duopane-browser`, a mock in
//! tests. The editor never touches the platform except through it.

use crate::config::ThemeUrls;
use crate::error::HostError;
use crate::mode::SimpleMode;
use crate::style::StyleTarget;
use crate::surface::{BoxMetrics, Pane, Size, SurfaceName};

/// Everything the editor needs from the environment hosting its surfaces.
pub trait RenderHost {
    /// Handle returned for a named surface.
    type Handle: Clone;

    /// Build the outer frame and both surfaces inside the container, linking
    /// the base, editor and preview stylesheets.
    fn mount(&mut self, themes: &ThemeUrls) -> Result<(), HostError>;

    /// Remove everything `mount` created.
    fn unmount(&mut self);

    /// Handle for a named surface, if it exists.
    fn surface(&self, name: SurfaceName) -> Option<Self::Handle>;

    /// Current text of the editable surface.
    fn editor_text(&self) -> String;

    /// Replace the text of the editable surface.
    fn set_editor_text(&mut self, text: &str);

    /// Replace the content of the preview surface with rendered HTML.
    fn set_preview_html(&mut self, html: &str);

    fn set_pane_visible(&mut self, pane: Pane, visible: bool);

    /// Switch the wrapper between the edit-mode and preview-mode classes.
    fn set_mode_class(&mut self, mode: SimpleMode);

    /// Point the single preview theme link at `href`, inserting it if absent.
    fn set_preview_theme(&mut self, href: &str);

    /// Computed value of a CSS property, empty when unset.
    fn style(&self, target: StyleTarget, property: &str) -> String;

    /// Set an inline style property.
    fn set_style(&mut self, target: StyleTarget, property: &str, value: &str);

    /// Border plus padding of a target.
    fn box_metrics(&self, target: StyleTarget) -> BoxMetrics;

    /// Border-inclusive size of a target.
    fn outer_size(&self, target: StyleTarget) -> Size;

    /// Size of the browser viewport.
    fn viewport(&self) -> Size;

    fn set_utility_bar_visible(&mut self, visible: bool);

    /// Allow or suspend scrolling of the page body.
    fn set_body_scrolling(&mut self, enabled: bool);

    /// Whether the environment offers a native fullscreen API.
    fn supports_native_fullscreen(&self) -> bool {
        false
    }

    fn request_native_fullscreen(&mut self) -> Result<(), HostError> {
        Err(HostError::from("native fullscreen is not supported"))
    }

    fn exit_native_fullscreen(&mut self) {}

    /// Move keyboard focus into the editable surface.
    fn focus_editor(&mut self);
}
