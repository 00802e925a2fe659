//! The two rendering surfaces and the geometry that keeps them sized.
//!
//! The editable surface and the preview surface each live in their own
//! frame. Outside fullscreen both exactly fill the host container's content
//! box; in fullscreen they split the viewport into two side-by-side halves.

use std::fmt;

use crate::style::{StylePatch, StyleTarget, px};

/// Named handles exposed through `Editor::get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceName {
    /// Document of the outer frame.
    Document,
    /// Body of the outer frame's document.
    Body,
    /// Document of the editable surface.
    Editor,
    /// Document of the preview surface.
    Previewer,
    /// Element wrapping both surfaces.
    Wrapper,
}

impl SurfaceName {
    /// Parse a surface name, `None` for anything unrecognized.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "document" => Some(SurfaceName::Document),
            "body" => Some(SurfaceName::Body),
            "editor" => Some(SurfaceName::Editor),
            "previewer" => Some(SurfaceName::Previewer),
            "wrapper" => Some(SurfaceName::Wrapper),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceName::Document => "document",
            SurfaceName::Body => "body",
            SurfaceName::Editor => "editor",
            SurfaceName::Previewer => "previewer",
            SurfaceName::Wrapper => "wrapper",
        }
    }
}

impl fmt::Display for SurfaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two panes that are shown and hidden by mode transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Editor,
    Previewer,
}

impl Pane {
    pub fn style_target(&self) -> StyleTarget {
        match self {
            Pane::Editor => StyleTarget::Editor,
            Pane::Previewer => StyleTarget::Previewer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Remove the border and padding of `metrics`, never going negative.
    pub fn shrink(self, metrics: BoxMetrics) -> Size {
        Size {
            width: (self.width - metrics.horizontal()).max(0.0),
            height: (self.height - metrics.vertical()).max(0.0),
        }
    }
}

/// Border plus padding on each side of an element, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxMetrics {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl BoxMetrics {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Sizes computed once at load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadLayout {
    /// Content box of the container, pinned so later reflows keep it.
    pub container: Size,
    pub wrapper: Size,
    pub editor: Size,
    pub previewer: Size,
}

impl LoadLayout {
    /// Fit both surfaces to the content box of a container whose
    /// border-inclusive size is `container_outer`.
    pub fn fit(
        container_outer: Size,
        container_box: BoxMetrics,
        editor_box: BoxMetrics,
        previewer_box: BoxMetrics,
    ) -> Self {
        let content = container_outer.shrink(container_box);
        Self {
            container: content,
            wrapper: content,
            editor: content.shrink(editor_box),
            previewer: content.shrink(previewer_box),
        }
    }

    pub fn to_patch(&self) -> StylePatch {
        [
            (StyleTarget::Container, self.container),
            (StyleTarget::Wrapper, self.wrapper),
            (StyleTarget::Editor, self.editor),
            (StyleTarget::Previewer, self.previewer),
        ]
        .into_iter()
        .fold(StylePatch::new(), |patch, (target, size)| {
            patch
                .set(target, "width", px(size.width))
                .set(target, "height", px(size.height))
        })
    }
}

/// Style patch that lays the surfaces out side by side over the viewport.
pub fn fullscreen_layout(
    viewport: Size,
    editor_box: BoxMetrics,
    previewer_box: BoxMetrics,
) -> StylePatch {
    let half = viewport.width / 2.0;
    let editor = Size::new(half, viewport.height).shrink(editor_box);
    let previewer = Size::new(half, viewport.height).shrink(previewer_box);

    StylePatch::new()
        .set(StyleTarget::Container, "position", "fixed")
        .set(StyleTarget::Container, "top", "0px")
        .set(StyleTarget::Container, "left", "0px")
        .set(StyleTarget::Container, "z-index", "9999")
        .set(StyleTarget::Container, "width", px(viewport.width))
        .set(StyleTarget::Container, "height", px(viewport.height))
        .set(StyleTarget::Wrapper, "width", px(viewport.width))
        .set(StyleTarget::Wrapper, "height", px(viewport.height))
        .set(StyleTarget::Editor, "width", px(editor.width))
        .set(StyleTarget::Editor, "height", px(editor.height))
        .set(StyleTarget::Editor, "float", "left")
        .set(StyleTarget::Editor, "display", "block")
        .set(StyleTarget::Previewer, "width", px(previewer.width))
        .set(StyleTarget::Previewer, "height", px(previewer.height))
        .set(StyleTarget::Previewer, "float", "right")
        .set(StyleTarget::Previewer, "display", "block")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_names_parse() {
        for name in ["document", "body", "editor", "previewer", "wrapper"] {
            let parsed = SurfaceName::parse(name).expect(name);
            assert_eq!(parsed.as_str(), name);
        }
        assert_eq!(SurfaceName::parse("iframe"), None);
        assert_eq!(SurfaceName::parse("Editor"), None);
        assert_eq!(SurfaceName::parse(""), None);
    }

    #[test]
    fn test_load_layout_fills_content_box() {
        let layout = LoadLayout::fit(
            Size::new(600.0, 400.0),
            BoxMetrics { top: 1.0, right: 1.0, bottom: 1.0, left: 1.0 },
            BoxMetrics::uniform(10.0),
            BoxMetrics::default(),
        );

        assert_eq!(layout.container, Size::new(598.0, 398.0));
        assert_eq!(layout.wrapper, layout.container);
        assert_eq!(layout.editor, Size::new(578.0, 378.0));
        assert_eq!(layout.previewer, Size::new(598.0, 398.0));

        let patch = layout.to_patch();
        assert_eq!(patch.get(StyleTarget::Editor, "width"), Some("578px"));
        assert_eq!(patch.get(StyleTarget::Container, "height"), Some("398px"));
    }

    #[test]
    fn test_shrink_never_negative() {
        let size = Size::new(5.0, 5.0).shrink(BoxMetrics::uniform(10.0));
        assert_eq!(size, Size::new(0.0, 0.0));
    }

    #[test]
    fn test_fullscreen_layout_splits_viewport() {
        let patch = fullscreen_layout(
            Size::new(1000.0, 800.0),
            BoxMetrics::uniform(2.0),
            BoxMetrics::default(),
        );

        assert_eq!(patch.get(StyleTarget::Container, "position"), Some("fixed"));
        assert_eq!(patch.get(StyleTarget::Container, "width"), Some("1000px"));
        assert_eq!(patch.get(StyleTarget::Editor, "width"), Some("496px"));
        assert_eq!(patch.get(StyleTarget::Editor, "float"), Some("left"));
        assert_eq!(patch.get(StyleTarget::Previewer, "width"), Some("500px"));
        assert_eq!(patch.get(StyleTarget::Previewer, "float"), Some("right"));
        assert_eq!(patch.get(StyleTarget::Previewer, "display"), Some("block"));
    }
}
