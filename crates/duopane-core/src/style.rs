//! Inline style patches and the snapshots used to undo them.

use crate::platform::RenderHost;

/// Elements whose inline style the editor changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleTarget {
    /// The host element the editor was mounted into.
    Container,
    /// The outer frame wrapping both surfaces.
    Wrapper,
    /// The editable surface frame.
    Editor,
    /// The preview surface frame.
    Previewer,
}

impl StyleTarget {
    pub const ALL: [StyleTarget; 4] = [
        StyleTarget::Container,
        StyleTarget::Wrapper,
        StyleTarget::Editor,
        StyleTarget::Previewer,
    ];
}

/// One CSS declaration aimed at a target element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDecl {
    pub target: StyleTarget,
    pub property: &'static str,
    pub value: String,
}

/// An ordered set of declarations to apply in one go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StylePatch {
    decls: Vec<StyleDecl>,
}

impl StylePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration, replacing an earlier one for the same property.
    pub fn set(mut self, target: StyleTarget, property: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self
            .decls
            .iter_mut()
            .find(|d| d.target == target && d.property == property)
        {
            Some(existing) => existing.value = value,
            None => self.decls.push(StyleDecl {
                target,
                property,
                value,
            }),
        }
        self
    }

    pub fn get(&self, target: StyleTarget, property: &str) -> Option<&str> {
        self.decls
            .iter()
            .find(|d| d.target == target && d.property == property)
            .map(|d| d.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleDecl> {
        self.decls.iter()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn apply<H: RenderHost + ?Sized>(&self, host: &mut H) {
        for decl in &self.decls {
            host.set_style(decl.target, decl.property, &decl.value);
        }
    }
}

/// Style values captured before a patch is applied.
///
/// Holds the computed value of every property the patch touches, so that
/// [`restore`](Self::restore) puts each element back exactly as it was.
/// Restoring consumes the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a snapshot that is never restored leaves the layout changed"]
pub struct StyleSnapshot {
    saved: Vec<StyleDecl>,
}

impl StyleSnapshot {
    /// Record the current value of every property in `patch`.
    pub fn capture<H: RenderHost + ?Sized>(host: &H, patch: &StylePatch) -> Self {
        let saved = patch
            .iter()
            .map(|decl| StyleDecl {
                target: decl.target,
                property: decl.property,
                value: host.style(decl.target, decl.property),
            })
            .collect();
        Self { saved }
    }

    pub fn get(&self, target: StyleTarget, property: &str) -> Option<&str> {
        self.saved
            .iter()
            .find(|d| d.target == target && d.property == property)
            .map(|d| d.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }

    /// Write every captured value back.
    pub fn restore<H: RenderHost + ?Sized>(self, host: &mut H) {
        for decl in self.saved {
            host.set_style(decl.target, decl.property, &decl.value);
        }
    }
}

/// Format a pixel length the way inline styles expect it.
pub fn px(value: f64) -> String {
    format!("{}px", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_host::MockHost;

    #[test]
    fn test_patch_set_replaces_same_property() {
        let patch = StylePatch::new()
            .set(StyleTarget::Editor, "width", "10px")
            .set(StyleTarget::Editor, "width", "20px")
            .set(StyleTarget::Previewer, "width", "30px");

        assert_eq!(patch.len(), 2);
        assert_eq!(patch.get(StyleTarget::Editor, "width"), Some("20px"));
    }

    #[test]
    fn test_snapshot_restores_values_before_patch() {
        let mut host = MockHost::new();
        host.set_style(StyleTarget::Container, "width", "500px");
        host.set_style(StyleTarget::Container, "position", "static");

        let patch = StylePatch::new()
            .set(StyleTarget::Container, "width", "1024px")
            .set(StyleTarget::Container, "position", "fixed")
            .set(StyleTarget::Container, "top", "0px");

        let snapshot = StyleSnapshot::capture(&host, &patch);
        patch.apply(&mut host);
        assert_eq!(host.style(StyleTarget::Container, "position"), "fixed");

        snapshot.restore(&mut host);
        assert_eq!(host.style(StyleTarget::Container, "width"), "500px");
        assert_eq!(host.style(StyleTarget::Container, "position"), "static");
        assert_eq!(host.style(StyleTarget::Container, "top"), "");
    }

    #[test]
    fn test_px_formatting() {
        assert_eq!(px(400.0), "400px");
        assert_eq!(px(512.5), "512.5px");
    }
}
