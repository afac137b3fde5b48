//! Exposes the data context to client-side scripts.
//!
//! HTML comments are stripped from the content and a `<script>` block assigning a
//! JSON snapshot of the context is inserted before the first occurrence of the
//! anchor (matched case-insensitively). Content without the anchor gets no snapshot.

use regex::Regex;
use std::sync::LazyLock;

use super::context::DataContext;
use crate::config::ViewConfig;
use crate::core::ViewError;

static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern is a valid regex"));

/// Where and under which name the context snapshot is embedded.
#[derive(Debug, Clone)]
pub struct EmbedOptions {
    anchor: Regex,
    client_variable: String,
}

impl EmbedOptions {
    pub fn new(anchor: &str, client_variable: impl Into<String>) -> Result<Self, ViewError> {
        let anchor = Regex::new(&format!("(?i){}", regex::escape(anchor))).map_err(|e| {
            ViewError::Config {
                message: format!("invalid context anchor '{anchor}': {e}"),
            }
        })?;
        Ok(Self {
            anchor,
            client_variable: client_variable.into(),
        })
    }

    pub fn from_config(config: &ViewConfig) -> Result<Self, ViewError> {
        Self::new(&config.context_anchor, config.client_variable.clone())
    }

    fn script(&self, context: &DataContext) -> String {
        // "</" would end the script element early
        let json = context.to_json().replace("</", "<\\/");
        format!(
            "<script type=\"text/javascript\">window.{} = {};</script>\n",
            self.client_variable, json
        )
    }
}

/// Strip HTML comments and insert the context snapshot before the anchor.
pub fn embed_context(content: &str, context: &DataContext, options: &EmbedOptions) -> String {
    let mut text = HTML_COMMENT.replace_all(content, "").into_owned();
    if let Some(anchor) = options.anchor.find(&text) {
        let at = anchor.start();
        text.insert_str(at, &options.script(context));
    }
    text
}
