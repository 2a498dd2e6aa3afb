use crate::repository::Document;
use thiserror::Error;
use url::Url;

/// Screens the gateway can render.
#[derive(Debug, Clone, Copy)]
pub enum View<'a> {
    /// Connector manifest served on `GET /`.
    Index {
        connector_url: &'a Url,
        upload_url: &'a Url,
    },
    /// Follow-up screen for an imported document.
    ImportScreen {
        base_url: &'a Url,
        repository: &'a str,
        document: &'a Document,
    },
}

impl View<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            View::Index { .. } => "index",
            View::ImportScreen { .. } => "import_screen",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to render view '{view}': {reason}")]
pub struct ViewError {
    pub view: &'static str,
    pub reason: String,
}

pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: View<'_>) -> Result<String, ViewError>;
}

/// Built-in renderer producing a minimal XML manifest and HTML import screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultViews;

impl ViewRenderer for DefaultViews {
    fn render(&self, view: View<'_>) -> Result<String, ViewError> {
        match view {
            View::Index {
                connector_url,
                upload_url,
            } => Ok(format!(
                concat!(
                    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
                    "<connector type=\"scenari\">\n",
                    "  <baseUrl>{}</baseUrl>\n",
                    "  <uploadUrl method=\"POST\">{}</uploadUrl>\n",
                    "</connector>\n",
                ),
                escape(connector_url.as_str()),
                escape(upload_url.as_str()),
            )),
            View::ImportScreen {
                base_url,
                repository,
                document,
            } => Ok(format!(
                concat!(
                    "<!DOCTYPE html>\n",
                    "<html>\n",
                    "<head><meta charset=\"utf-8\"><title>Import {title}</title></head>\n",
                    "<body>\n",
                    "  <h1>{title}</h1>\n",
                    "  <dl>\n",
                    "    <dt>Repository</dt><dd>{repository}</dd>\n",
                    "    <dt>Document</dt><dd id=\"document-ref\">{reference}</dd>\n",
                    "    <dt>Type</dt><dd>{doc_type}</dd>\n",
                    "  </dl>\n",
                    "  <p><a href=\"{base}\">Back to the repository</a></p>\n",
                    "</body>\n",
                    "</html>\n",
                ),
                title = escape(&document.title),
                repository = escape(repository),
                reference = escape(document.reference.as_str()),
                doc_type = escape(&document.doc_type),
                base = escape(base_url.as_str()),
            )),
        }
    }
}

/// Escapes the characters XML and HTML treat specially.
pub(crate) fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;
