use serde_json::Value;

use crate::error::Result;
use crate::escape::escape_text;
use crate::head::HeadContent;
use crate::state::PageState;

/// Rendered output for one request: body markup plus the head
/// metadata produced while rendering it.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub body: String,
    pub head: HeadContent,
}

/// The application's component tree, seen from the bridge.
///
/// Implementations map decoded state to markup. They must be pure:
/// same state, same output, no retained state between calls.
pub trait Renderer {
    fn render(&self, state: &PageState) -> Result<Rendered>;
}

/// Built-in renderer that presents the state itself as an HTML
/// outline. Used by the CLI and as a stand-in where no application
/// renderer is wired up yet.
///
/// Lifts the top-level `title` and `description` fields into head
/// metadata; everything else lands in the body as nested lists.
#[derive(Debug, Clone, Default)]
pub struct OutlineRenderer;

impl Renderer for OutlineRenderer {
    fn render(&self, state: &PageState) -> Result<Rendered> {
        let mut head = HeadContent::default().with_html_attr("lang", "en");
        if let Some(title) = state.title() {
            head.title = Some(title.to_string());
        }
        if let Some(description) = state.get("description").and_then(Value::as_str) {
            head = head.with_meta("description", description);
        }

        Ok(Rendered {
            body: value_to_html(state.as_value()),
            head,
        })
    }
}

fn value_to_html(value: &Value) -> String {
    match value {
        Value::Null => "<span class=\"null\">null</span>".to_string(),
        Value::Bool(b) => format!("<span class=\"bool\">{b}</span>"),
        Value::Number(n) => format!("<span class=\"number\">{n}</span>"),
        Value::String(s) => format!("<span class=\"string\">{}</span>", escape_text(s)),
        Value::Array(items) => {
            let mut html = String::from("<ol>");
            for item in items {
                html.push_str("<li>");
                html.push_str(&value_to_html(item));
                html.push_str("</li>");
            }
            html.push_str("</ol>");
            html
        }
        Value::Object(map) => {
            let mut html = String::from("<dl>");
            for (key, item) in map {
                html.push_str("<dt>");
                html.push_str(&escape_text(key));
                html.push_str("</dt><dd>");
                html.push_str(&value_to_html(item));
                html.push_str("</dd>");
            }
            html.push_str("</dl>");
            html
        }
    }
}
