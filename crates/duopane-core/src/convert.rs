//! Markdown to HTML conversion for the preview surface.

use markdown_weaver::{Options, Parser, html};

/// Converts markdown source to HTML.
///
/// The editor treats this as a pure function of the editable text.
pub trait MarkdownConverter {
    fn to_html(&self, markdown: &str) -> String;
}

impl<F> MarkdownConverter for F
where
    F: Fn(&str) -> String,
{
    fn to_html(&self, markdown: &str) -> String {
        self(markdown)
    }
}

/// Default converter backed by markdown-weaver.
#[derive(Debug, Clone, Copy)]
pub struct WeaverMarkdown {
    options: Options,
}

impl WeaverMarkdown {
    pub fn new() -> Self {
        Self {
            options: default_md_options(),
        }
    }

    pub fn with_options(options: Options) -> Self {
        Self { options }
    }
}

impl Default for WeaverMarkdown {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownConverter for WeaverMarkdown {
    fn to_html(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut html_buf = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_buf, parser);
        html_buf
    }
}

/// GitHub-flavoured extensions used for previews.
pub fn default_md_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_GFM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_renders() {
        let html = WeaverMarkdown::new().to_html("# Title");
        assert!(html.starts_with("<h1"), "got {html}");
        assert!(html.trim_end().ends_with("Title</h1>"), "got {html}");
    }

    #[test]
    fn test_empty_input_renders_empty() {
        assert_eq!(WeaverMarkdown::new().to_html(""), "");
    }

    #[test]
    fn test_closure_converter() {
        let shout = |md: &str| md.to_uppercase();
        assert_eq!(shout.to_html("quiet"), "QUIET");
    }
}
