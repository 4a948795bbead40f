use crate::escape::{escape_attr, escape_text};

/// Head metadata produced while rendering one request.
///
/// This is the request-scoped replacement for a process-wide head
/// accumulator: renderers build it alongside the body and hand both
/// back as one value, so nothing leaks between requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadContent {
    /// Attributes for the root `<html>` element (e.g. `lang`).
    pub html_attrs: Vec<(String, String)>,
    /// Page title.
    pub title: Option<String>,
    /// Meta tags, `(name, content)` pairs.
    pub meta: Vec<(String, String)>,
    /// Link tags, `(rel, href)` pairs.
    pub links: Vec<(String, String)>,
}

impl HeadContent {
    /// Create head content with a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Add an attribute to the root `<html>` element.
    pub fn with_html_attr(mut self, name: &str, value: &str) -> Self {
        self.html_attrs.push((name.to_string(), value.to_string()));
        self
    }

    /// Add a meta tag.
    pub fn with_meta(mut self, name: &str, content: &str) -> Self {
        self.meta.push((name.to_string(), content.to_string()));
        self
    }

    /// Add a link tag.
    pub fn with_link(mut self, rel: &str, href: &str) -> Self {
        self.links.push((rel.to_string(), href.to_string()));
        self
    }

    /// Add a stylesheet link.
    pub fn with_stylesheet(mut self, href: &str) -> Self {
        self.with_link("stylesheet", href)
    }

    /// Attribute string for the `<html>` element, with a leading space
    /// when non-empty.
    pub fn html_attrs_string(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.html_attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        out
    }

    /// Render the title/meta/link tag block.
    pub fn render_tags(&self) -> String {
        let mut html = String::new();

        if let Some(title) = &self.title {
            html.push_str("<title>");
            html.push_str(&escape_text(title));
            html.push_str("</title>\n");
        }

        for (name, content) in &self.meta {
            html.push_str(&format!(
                "<meta name=\"{}\" content=\"{}\">\n",
                escape_attr(name),
                escape_attr(content)
            ));
        }

        for (rel, href) in &self.links {
            html.push_str(&format!(
                "<link rel=\"{}\" href=\"{}\">\n",
                escape_attr(rel),
                escape_attr(href)
            ));
        }

        html
    }
}
