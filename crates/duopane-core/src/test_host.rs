//! In-memory render host for tests.

use std::collections::HashMap;

use crate::config::ThemeUrls;
use crate::error::HostError;
use crate::mode::SimpleMode;
use crate::platform::RenderHost;
use crate::style::StyleTarget;
use crate::surface::{BoxMetrics, Pane, Size, SurfaceName};

#[derive(Debug, Default)]
pub struct MockHost {
    pub mounted: bool,
    pub themes: Option<ThemeUrls>,
    pub editor_text: String,
    pub preview_html: String,
    pub preview_renders: usize,
    pub mode_class: Option<SimpleMode>,
    pub preview_theme_links: Vec<String>,
    pub styles: HashMap<(StyleTarget, String), String>,
    pub metrics: HashMap<StyleTarget, BoxMetrics>,
    pub outer: HashMap<StyleTarget, Size>,
    pub viewport: Size,
    pub utility_bar_visible: bool,
    pub body_scrolling: bool,
    pub native_supported: bool,
    pub native_active: bool,
    pub native_fails: bool,
    pub focus_count: usize,
}

impl MockHost {
    pub fn new() -> Self {
        let mut outer = HashMap::new();
        outer.insert(StyleTarget::Container, Size::new(600.0, 400.0));
        Self {
            outer,
            viewport: Size::new(1200.0, 800.0),
            body_scrolling: true,
            ..Default::default()
        }
    }

    pub fn with_native_fullscreen(mut self) -> Self {
        self.native_supported = true;
        self
    }

    pub fn pane_visible(&self, pane: Pane) -> bool {
        self.style(pane.style_target(), "display") != "none"
    }
}

impl RenderHost for MockHost {
    type Handle = SurfaceName;

    fn mount(&mut self, themes: &ThemeUrls) -> Result<(), HostError> {
        self.mounted = true;
        self.themes = Some(themes.clone());
        self.preview_theme_links = vec![themes.preview.clone()];
        Ok(())
    }

    fn unmount(&mut self) {
        self.mounted = false;
        self.preview_theme_links.clear();
    }

    fn surface(&self, name: SurfaceName) -> Option<SurfaceName> {
        self.mounted.then_some(name)
    }

    fn editor_text(&self) -> String {
        self.editor_text.clone()
    }

    fn set_editor_text(&mut self, text: &str) {
        self.editor_text = text.to_string();
    }

    fn set_preview_html(&mut self, html: &str) {
        self.preview_html = html.to_string();
        self.preview_renders += 1;
    }

    fn set_pane_visible(&mut self, pane: Pane, visible: bool) {
        let value = if visible { "block" } else { "none" };
        self.set_style(pane.style_target(), "display", value);
    }

    fn set_mode_class(&mut self, mode: SimpleMode) {
        self.mode_class = Some(mode);
    }

    fn set_preview_theme(&mut self, href: &str) {
        match self.preview_theme_links.first_mut() {
            Some(link) => *link = href.to_string(),
            None => self.preview_theme_links.push(href.to_string()),
        }
    }

    fn style(&self, target: StyleTarget, property: &str) -> String {
        self.styles
            .get(&(target, property.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    fn set_style(&mut self, target: StyleTarget, property: &str, value: &str) {
        self.styles
            .insert((target, property.to_string()), value.to_string());
    }

    fn box_metrics(&self, target: StyleTarget) -> BoxMetrics {
        self.metrics.get(&target).copied().unwrap_or_default()
    }

    fn outer_size(&self, target: StyleTarget) -> Size {
        self.outer.get(&target).copied().unwrap_or_default()
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn set_utility_bar_visible(&mut self, visible: bool) {
        self.utility_bar_visible = visible;
    }

    fn set_body_scrolling(&mut self, enabled: bool) {
        self.body_scrolling = enabled;
    }

    fn supports_native_fullscreen(&self) -> bool {
        self.native_supported
    }

    fn request_native_fullscreen(&mut self) -> Result<(), HostError> {
        if self.native_fails {
            return Err(HostError::from("request denied"));
        }
        self.native_active = true;
        Ok(())
    }

    fn exit_native_fullscreen(&mut self) {
        self.native_active = false;
    }

    fn focus_editor(&mut self) {
        self.focus_count += 1;
    }
}
