//! Per-file-type content processing
//!
//! Raw file bytes are transformed once, before they are cached and before any
//! directive is scanned:
//!
//! | extension                   | transform                                      |
//! |-----------------------------|------------------------------------------------|
//! | `js`                        | minified (when enabled), original kept on error |
//! | `css`, `tpl`                | line breaks and tabs removed                   |
//! | `png`, `gif`, `jpg`, `jpeg` | inlined as a base64 `data:` URI                |
//! | anything else               | passed through                                 |
//!
//! Text that is not valid UTF-8 is decoded lossily and logged, never rejected.

pub mod minify;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;

pub use minify::{MinifyError, minify_js};

/// How a file's content is transformed, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Script,
    /// Stylesheets and template fragments
    Flattened,
    Image { mime: &'static str },
    Plain,
}

impl ContentKind {
    /// Classify an extension (case-insensitive, without the dot).
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "js" => ContentKind::Script,
            "css" | "tpl" => ContentKind::Flattened,
            "png" => ContentKind::Image { mime: "image/png" },
            "gif" => ContentKind::Image { mime: "image/gif" },
            "jpg" | "jpeg" => ContentKind::Image { mime: "image/jpeg" },
            _ => ContentKind::Plain,
        }
    }
}

/// Applies the per-type transform to raw file content.
#[derive(Debug, Clone, Copy)]
pub struct ContentProcessor {
    minify: bool,
}

impl ContentProcessor {
    pub fn new(minify: bool) -> Self {
        Self { minify }
    }

    /// Transform the raw content of the file at `path`, chosen by its extension.
    ///
    /// Never fails. Text that is not valid UTF-8 is decoded lossily with a warning,
    /// and a script that cannot be minified is logged and returned unminified.
    pub fn process(&self, path: &Path, raw: Vec<u8>) -> String {
        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
        match ContentKind::from_extension(extension) {
            ContentKind::Image { mime } => format!("data:{mime};base64,{}", STANDARD.encode(&raw)),
            ContentKind::Script => {
                let text = decode_text(path, raw);
                if !self.minify {
                    return text;
                }
                match minify_js(&text) {
                    Ok(minified) => minified,
                    Err(e) => {
                        tracing::error!("Failed to minify {}: {}", path.display(), e);
                        text
                    }
                }
            }
            ContentKind::Flattened => decode_text(path, raw)
                .chars()
                .filter(|c| !matches!(c, '\r' | '\n' | '\t'))
                .collect(),
            ContentKind::Plain => decode_text(path, raw),
        }
    }
}

/// UTF-8 text of `raw`, with invalid sequences replaced by U+FFFD.
fn decode_text(path: &Path, raw: Vec<u8>) -> String {
    String::from_utf8(raw).unwrap_or_else(|err| {
        tracing::warn!("{} is not valid UTF-8 text, invalid bytes replaced", path.display());
        String::from_utf8_lossy(err.as_bytes()).into_owned()
    })
}
