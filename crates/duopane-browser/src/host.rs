//! DOM implementation of the core `RenderHost`.
//!
//! Layout built by [`BrowserHost::mount`] inside the container element:
//!
//! ```text
//! container
//! └─ iframe.duopane-frame              (StyleTarget::Wrapper)
//!    ├─ link#duopane-base-theme
//!    └─ div#duopane-wrapper            (mode class)
//!       ├─ iframe#duopane-editor-frame     body is contenteditable
//!       ├─ iframe#duopane-previewer-frame  div#duopane-preview
//!       └─ div#duopane-utilbar             toggle + fullscreen buttons
//! ```
//!
//! Each iframe is created without a `src`, so its `about:blank` document is
//! available synchronously after insertion.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlIFrameElement};

use duopane_core::{
    BoxMetrics, HostError, Pane, RenderHost, SimpleMode, Size, StyleTarget, SurfaceName,
    ThemeUrls,
};

pub const PREVIEW_THEME_ID: &str = "duopane-preview-theme";
pub const EDITOR_THEME_ID: &str = "duopane-editor-theme";
pub const BASE_THEME_ID: &str = "duopane-base-theme";

fn js_err(context: &str) -> impl Fn(JsValue) -> HostError + '_ {
    move |e| HostError(format!("{}: {:?}", context, e))
}

/// Elements created by `mount`. Dropped on `unmount`.
#[derive(Debug, Clone)]
pub struct Frames {
    pub wrapper_frame: HtmlIFrameElement,
    pub wrapper_document: Document,
    pub wrapper: HtmlElement,
    pub editor_frame: HtmlIFrameElement,
    pub editor_document: Document,
    pub editor_body: HtmlElement,
    pub previewer_frame: HtmlIFrameElement,
    pub previewer_document: Document,
    pub preview: HtmlElement,
    pub utility_bar: HtmlElement,
    pub toggle_button: HtmlElement,
    pub fullscreen_button: HtmlElement,
}

/// Renders the editor into a container element of the host page.
#[derive(Debug)]
pub struct BrowserHost {
    document: Document,
    container: HtmlElement,
    frames: Option<Frames>,
}

impl BrowserHost {
    /// Look up the container by element id.
    pub fn new(container_id: &str) -> Result<Self, HostError> {
        let document = gloo_utils::document();
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| HostError(format!("no element with id '{}'", container_id)))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| HostError::from("container is not an HTML element"))?;
        Ok(Self::with_container(container))
    }

    pub fn with_container(container: HtmlElement) -> Self {
        Self {
            document: gloo_utils::document(),
            container,
            frames: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    /// The mounted elements, if any.
    pub fn frames(&self) -> Option<&Frames> {
        self.frames.as_ref()
    }

    fn element(&self, target: StyleTarget) -> Option<&HtmlElement> {
        match target {
            StyleTarget::Container => Some(&self.container),
            StyleTarget::Wrapper => self.frames.as_ref().map(|f| &*f.wrapper_frame),
            StyleTarget::Editor => self.frames.as_ref().map(|f| &*f.editor_frame),
            StyleTarget::Previewer => self.frames.as_ref().map(|f| &*f.previewer_frame),
        }
    }

    fn build(&self, themes: &ThemeUrls) -> Result<Frames, HostError> {
        let wrapper_frame = create_iframe(&self.document, None, "duopane-frame")?;
        self.container
            .append_child(&wrapper_frame)
            .map_err(js_err("append outer frame"))?;
        let wrapper_document = frame_document(&wrapper_frame)?;
        append_stylesheet(&wrapper_document, BASE_THEME_ID, &themes.base)?;
        let outer_body = body_of(&wrapper_document)?;
        outer_body
            .style()
            .set_property("margin", "0")
            .map_err(js_err("style outer body"))?;

        let wrapper = create_html(&wrapper_document, "div")?;
        wrapper.set_id("duopane-wrapper");
        outer_body
            .append_child(&wrapper)
            .map_err(js_err("append wrapper"))?;

        let editor_frame =
            create_iframe(&wrapper_document, Some("duopane-editor-frame"), "duopane-surface")?;
        wrapper
            .append_child(&editor_frame)
            .map_err(js_err("append editor frame"))?;
        let editor_document = frame_document(&editor_frame)?;
        append_stylesheet(&editor_document, EDITOR_THEME_ID, &themes.editor)?;
        let editor_body = body_of(&editor_document)?;
        editor_body.set_content_editable("true");

        let previewer_frame = create_iframe(
            &wrapper_document,
            Some("duopane-previewer-frame"),
            "duopane-surface",
        )?;
        wrapper
            .append_child(&previewer_frame)
            .map_err(js_err("append previewer frame"))?;
        let previewer_document = frame_document(&previewer_frame)?;
        append_stylesheet(&previewer_document, PREVIEW_THEME_ID, &themes.preview)?;
        let preview = create_html(&previewer_document, "div")?;
        preview.set_id("duopane-preview");
        body_of(&previewer_document)?
            .append_child(&preview)
            .map_err(js_err("append preview"))?;

        let utility_bar = create_html(&wrapper_document, "div")?;
        utility_bar.set_id("duopane-utilbar");
        let toggle_button = create_html(&wrapper_document, "button")?;
        toggle_button.set_class_name("duopane-toggle");
        toggle_button.set_title("Toggle edit / preview");
        toggle_button.set_inner_text("Preview");
        let fullscreen_button = create_html(&wrapper_document, "button")?;
        fullscreen_button.set_class_name("duopane-fullscreen");
        fullscreen_button.set_title("Enter fullscreen");
        fullscreen_button.set_inner_text("Fullscreen");
        utility_bar
            .append_child(&toggle_button)
            .and_then(|_| utility_bar.append_child(&fullscreen_button))
            .and_then(|_| wrapper.append_child(&utility_bar))
            .map_err(js_err("append utility bar"))?;

        Ok(Frames {
            wrapper_frame,
            wrapper_document,
            wrapper,
            editor_frame,
            editor_document,
            editor_body,
            previewer_frame,
            previewer_document,
            preview,
            utility_bar,
            toggle_button,
            fullscreen_button,
        })
    }
}

fn create_html(document: &Document, tag: &str) -> Result<HtmlElement, HostError> {
    document
        .create_element(tag)
        .map_err(js_err("create element"))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| HostError(format!("<{}> is not an HTML element", tag)))
}

fn create_iframe(
    document: &Document,
    id: Option<&str>,
    class: &str,
) -> Result<HtmlIFrameElement, HostError> {
    let frame = document
        .create_element("iframe")
        .map_err(js_err("create iframe"))?
        .dyn_into::<HtmlIFrameElement>()
        .map_err(|_| HostError::from("created element is not an iframe"))?;
    if let Some(id) = id {
        frame.set_id(id);
    }
    frame.set_class_name(class);
    frame.set_frame_border("0");
    Ok(frame)
}

fn frame_document(frame: &HtmlIFrameElement) -> Result<Document, HostError> {
    frame
        .content_document()
        .ok_or_else(|| HostError::from("iframe has no document"))
}

fn body_of(document: &Document) -> Result<HtmlElement, HostError> {
    document
        .body()
        .ok_or_else(|| HostError::from("frame document has no body"))
}

fn append_stylesheet(document: &Document, id: &str, href: &str) -> Result<(), HostError> {
    let link = document
        .create_element("link")
        .map_err(js_err("create link"))?
        .dyn_into::<web_sys::HtmlLinkElement>()
        .map_err(|_| HostError::from("created element is not a link"))?;
    link.set_id(id);
    link.set_rel("stylesheet");
    link.set_type("text/css");
    link.set_href(href);
    let head = document
        .head()
        .ok_or_else(|| HostError::from("frame document has no head"))?;
    head.append_child(&link).map_err(js_err("append stylesheet"))?;
    Ok(())
}

/// Parse a computed CSS length like `"12.5px"`. Anything else reads as 0.
pub fn parse_px(value: &str) -> f64 {
    value
        .trim()
        .strip_suffix("px")
        .and_then(|n| n.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn computed_value(element: &Element, property: &str) -> String {
    element
        .owner_document()
        .and_then(|doc| doc.default_view())
        .and_then(|window| window.get_computed_style(element).ok().flatten())
        .and_then(|style| style.get_property_value(property).ok())
        .unwrap_or_default()
}

impl RenderHost for BrowserHost {
    type Handle = JsValue;

    fn mount(&mut self, themes: &ThemeUrls) -> Result<(), HostError> {
        if self.frames.is_some() {
            return Ok(());
        }
        let frames = self.build(themes)?;
        tracing::debug!(container = %self.container.id(), "mounted editor frames");
        self.frames = Some(frames);
        Ok(())
    }

    fn unmount(&mut self) {
        if let Some(frames) = self.frames.take() {
            frames.wrapper_frame.remove();
        }
    }

    fn surface(&self, name: SurfaceName) -> Option<JsValue> {
        let frames = self.frames.as_ref()?;
        let handle: JsValue = match name {
            SurfaceName::Document => frames.wrapper_document.clone().into(),
            SurfaceName::Body => frames.wrapper_document.body()?.into(),
            SurfaceName::Wrapper => frames.wrapper.clone().into(),
            SurfaceName::Editor => frames.editor_body.clone().into(),
            SurfaceName::Previewer => frames.preview.clone().into(),
        };
        Some(handle)
    }

    fn editor_text(&self) -> String {
        self.frames
            .as_ref()
            .map(|f| f.editor_body.inner_text())
            .unwrap_or_default()
    }

    fn set_editor_text(&mut self, text: &str) {
        if let Some(frames) = &self.frames {
            frames.editor_body.set_inner_text(text);
        }
    }

    fn set_preview_html(&mut self, html: &str) {
        if let Some(frames) = &self.frames {
            frames.preview.set_inner_html(html);
        }
    }

    fn set_pane_visible(&mut self, pane: Pane, visible: bool) {
        let value = if visible { "block" } else { "none" };
        self.set_style(pane.style_target(), "display", value);
    }

    fn set_mode_class(&mut self, mode: SimpleMode) {
        let Some(frames) = &self.frames else {
            return;
        };
        let (add, remove) = match mode {
            SimpleMode::Edit => (SimpleMode::Edit, SimpleMode::Preview),
            SimpleMode::Preview => (SimpleMode::Preview, SimpleMode::Edit),
        };
        let class_list = frames.wrapper.class_list();
        let result = class_list
            .remove_1(remove.class_name())
            .and_then(|_| class_list.add_1(add.class_name()));
        if let Err(e) = result {
            tracing::warn!(?mode, "failed to set mode class: {:?}", e);
        }
        let label = match mode {
            SimpleMode::Edit => "Preview",
            SimpleMode::Preview => "Edit",
        };
        frames.toggle_button.set_inner_text(label);
    }

    fn set_preview_theme(&mut self, href: &str) {
        let Some(frames) = &self.frames else {
            return;
        };
        let existing = frames
            .previewer_document
            .get_element_by_id(PREVIEW_THEME_ID)
            .and_then(|el| el.dyn_into::<web_sys::HtmlLinkElement>().ok());
        match existing {
            Some(link) => {
                if link.href() != href {
                    link.set_href(href);
                }
            }
            None => {
                if let Err(e) = append_stylesheet(&frames.previewer_document, PREVIEW_THEME_ID, href)
                {
                    tracing::warn!("failed to insert preview theme: {}", e);
                }
            }
        }
    }

    fn style(&self, target: StyleTarget, property: &str) -> String {
        self.element(target)
            .map(|el| computed_value(el, property))
            .unwrap_or_default()
    }

    fn set_style(&mut self, target: StyleTarget, property: &str, value: &str) {
        let Some(element) = self.element(target) else {
            return;
        };
        let style = element.style();
        let result = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
        if let Err(e) = result {
            tracing::warn!(?target, property, "failed to set style: {:?}", e);
        }
    }

    fn box_metrics(&self, target: StyleTarget) -> BoxMetrics {
        let Some(element) = self.element(target) else {
            return BoxMetrics::default();
        };
        let side = |name: &str| {
            parse_px(&computed_value(element, &format!("padding-{}", name)))
                + parse_px(&computed_value(element, &format!("border-{}-width", name)))
        };
        BoxMetrics {
            top: side("top"),
            right: side("right"),
            bottom: side("bottom"),
            left: side("left"),
        }
    }

    fn outer_size(&self, target: StyleTarget) -> Size {
        self.element(target)
            .map(|el| Size::new(el.offset_width() as f64, el.offset_height() as f64))
            .unwrap_or_default()
    }

    fn viewport(&self) -> Size {
        let window = gloo_utils::window();
        let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Size::new(read(window.inner_width()), read(window.inner_height()))
    }

    fn set_utility_bar_visible(&mut self, visible: bool) {
        if let Some(frames) = &self.frames {
            let value = if visible { "block" } else { "none" };
            if let Err(e) = frames.utility_bar.style().set_property("display", value) {
                tracing::warn!(visible, "failed to toggle utility bar: {:?}", e);
            }
        }
    }

    fn set_body_scrolling(&mut self, enabled: bool) {
        let Some(body) = self.document.body() else {
            return;
        };
        let style = body.style();
        let result = if enabled {
            style.remove_property("overflow").map(|_| ())
        } else {
            style.set_property("overflow", "hidden")
        };
        if let Err(e) = result {
            tracing::warn!(enabled, "failed to set body scrolling: {:?}", e);
        }
    }

    fn supports_native_fullscreen(&self) -> bool {
        self.document.fullscreen_enabled()
    }

    fn request_native_fullscreen(&mut self) -> Result<(), HostError> {
        self.container
            .request_fullscreen()
            .map_err(js_err("requestFullscreen"))
    }

    fn exit_native_fullscreen(&mut self) {
        if self.document.fullscreen_element().is_some() {
            self.document.exit_fullscreen();
        }
    }

    fn focus_editor(&mut self) {
        if let Some(frames) = &self.frames {
            if let Err(e) = frames.editor_body.focus() {
                tracing::warn!("failed to focus editor: {:?}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_px() {
        assert_eq!(parse_px("12px"), 12.0);
        assert_eq!(parse_px(" 1.5px "), 1.5);
        assert_eq!(parse_px("0"), 0.0);
        assert_eq!(parse_px("auto"), 0.0);
        assert_eq!(parse_px(""), 0.0);
    }
}
