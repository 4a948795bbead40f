use crate::error::{RenderError, Result};
use crate::escape::escape_text;
use crate::head::HeadContent;

/// Placeholder comment marking where the rendered body is spliced in.
pub const BODY_MARKER: &str = "<!--APP-->";

/// The built-in `index.html` used when no template file is supplied.
pub const DEFAULT_INDEX_HTML: &str = "<!DOCTYPE html>\n<html><head>\n<meta charset=\"utf-8\">\n</head>\n<body>\n<div id=\"app\"><!--APP--></div>\n</body>\n</html>\n";

/// The response composer.
///
/// Holds the fixed fragments of an `index.html` split at the
/// `<html …><head>` boundary and at [`BODY_MARKER`]. Everything the
/// original `<html>` tag carried is discarded; the composed document
/// gets its root attributes from the per-request [`HeadContent`].
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTemplate {
    /// Everything before the `<html` tag (doctype, leading comments).
    doctype: String,
    /// Everything between `<head>` and the body marker: the constant
    /// tail of the head plus the opening body markup.
    constant_head: String,
    /// Everything after the body marker.
    end_of_body: String,
}

impl DocumentTemplate {
    /// Split an `index.html` into its fixed fragments.
    ///
    /// The file must contain an `<html` tag followed by `<head>`, and
    /// a `<!--APP-->` marker where the rendered body belongs.
    pub fn from_index_html(html: &str) -> Result<Self> {
        let html_start = html
            .find("<html")
            .ok_or(RenderError::Template("missing <html> tag"))?;
        let head_open = html[html_start..]
            .find("<head>")
            .map(|i| html_start + i + "<head>".len())
            .ok_or(RenderError::Template("missing <head> tag"))?;
        let marker = html[head_open..]
            .find(BODY_MARKER)
            .map(|i| head_open + i)
            .ok_or(RenderError::Template("missing <!--APP--> body marker"))?;

        Ok(Self {
            doctype: html[..html_start].to_string(),
            constant_head: html[head_open..marker].to_string(),
            end_of_body: html[marker + BODY_MARKER.len()..].to_string(),
        })
    }

    /// Compose the full response document.
    ///
    /// Fragment order mirrors the reply the original bridge built:
    /// doctype, `<html` with computed attributes, `<head>` with the
    /// computed tag block, the constant head fragment, the rendered
    /// body, and the end-of-body fragment.
    pub fn compose(&self, head: &HeadContent, body: &str) -> String {
        let mut doc = String::with_capacity(
            self.doctype.len()
                + self.constant_head.len()
                + self.end_of_body.len()
                + body.len()
                + 256,
        );
        doc.push_str(&self.doctype);
        doc.push_str("<html");
        doc.push_str(&head.html_attrs_string());
        doc.push_str("><head>\n");
        doc.push_str(&head.render_tags());
        doc.push_str(&self.constant_head);
        doc.push_str(body);
        doc.push_str(&self.end_of_body);
        doc
    }

    /// Compose the error reply document for a failed request.
    pub fn error_document(&self, message: &str) -> String {
        let head = HeadContent::new("Render Error");
        let body = format!(
            "<div class=\"render-error\">Failed to render: {}</div>",
            escape_text(message)
        );
        self.compose(&head, &body)
    }

    /// The fixed leading fragment (doctype).
    pub fn doctype(&self) -> &str {
        &self.doctype
    }

    /// The fixed trailing fragment.
    pub fn end_of_body(&self) -> &str {
        &self.end_of_body
    }
}

impl Default for DocumentTemplate {
    fn default() -> Self {
        Self {
            doctype: "<!DOCTYPE html>\n".to_string(),
            constant_head: "\n<meta charset=\"utf-8\">\n</head>\n<body>\n<div id=\"app\">"
                .to_string(),
            end_of_body: "</div>\n</body>\n</html>\n".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_built_in_index_html() {
        assert_eq!(
            DocumentTemplate::default(),
            DocumentTemplate::from_index_html(DEFAULT_INDEX_HTML).unwrap()
        );
    }

    #[test]
    fn splits_index_html_at_markers() {
        let template = DocumentTemplate::from_index_html(
            "<!DOCTYPE html>\n<html lang=\"ignored\"><head>\n<meta charset=\"utf-8\">\n\
             <link rel=\"icon\" href=\"/favicon.ico\">\n</head>\n<body>\n<!--APP-->\n</body>\n</html>",
        )
        .unwrap();

        assert_eq!(template.doctype(), "<!DOCTYPE html>\n");
        assert!(template.end_of_body().starts_with("\n</body>"));

        let doc = template.compose(&HeadContent::new("T"), "<p>body</p>");
        // Attributes from the source <html> tag are discarded.
        assert!(!doc.contains("ignored"));
        assert!(doc.contains("<link rel=\"icon\" href=\"/favicon.ico\">"));
        assert!(doc.contains("<p>body</p>"));
    }

    #[test]
    fn missing_markers_are_errors() {
        assert!(matches!(
            DocumentTemplate::from_index_html("<body><!--APP--></body>"),
            Err(RenderError::Template("missing <html> tag"))
        ));
        assert!(matches!(
            DocumentTemplate::from_index_html("<html><body><!--APP--></body></html>"),
            Err(RenderError::Template("missing <head> tag"))
        ));
        assert!(matches!(
            DocumentTemplate::from_index_html("<html><head></head><body></body></html>"),
            Err(RenderError::Template("missing <!--APP--> body marker"))
        ));
    }

    #[test]
    fn marker_before_head_is_rejected() {
        let err = DocumentTemplate::from_index_html("<!--APP--><html><head></head>").unwrap_err();
        assert!(matches!(err, RenderError::Template(_)));
    }

    #[test]
    fn compose_orders_fragments() {
        let template = DocumentTemplate::default();
        let head = HeadContent::new("Home")
            .with_html_attr("lang", "en")
            .with_meta("description", "front page");

        let doc = template.compose(&head, "<main>hi</main>");

        let doctype_at = doc.find("<!DOCTYPE html>").unwrap();
        let html_at = doc.find("<html lang=\"en\">").unwrap();
        let title_at = doc.find("<title>Home</title>").unwrap();
        let charset_at = doc.find("<meta charset=\"utf-8\">").unwrap();
        let body_at = doc.find("<main>hi</main>").unwrap();
        let end_at = doc.find("</body>").unwrap();

        assert!(doctype_at < html_at);
        assert!(html_at < title_at);
        assert!(title_at < charset_at);
        assert!(charset_at < body_at);
        assert!(body_at < end_at);
    }

    #[test]
    fn compose_without_attrs_has_bare_html_tag() {
        let doc = DocumentTemplate::default().compose(&HeadContent::default(), "x");
        assert!(doc.contains("<html><head>"));
    }

    #[test]
    fn error_document_escapes_message() {
        let doc = DocumentTemplate::default().error_document("bad <input> & stuff");
        assert!(doc.contains("<title>Render Error</title>"));
        assert!(doc.contains("Failed to render: bad &lt;input&gt; &amp; stuff"));
        assert!(doc.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn identical_inputs_compose_identically() {
        let template = DocumentTemplate::default();
        let head = HeadContent::new("Same").with_meta("a", "b");
        let one = template.compose(&head, "<p>1</p>");
        let two = template.compose(&head, "<p>1</p>");
        assert_eq!(one, two);
    }
}
