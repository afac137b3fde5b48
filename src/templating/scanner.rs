//! Directive scanning and in-place variable substitution.
//!
//! Directives are `(:` + indicator + space + payload + `:)`:
//!
//! - `(:= user.name:)` substitutes a value from the [`DataContext`]
//! - `(:include partials/header.html:)` inlines another view
//!
//! Any other indicator is left in the text untouched.
//!
//! Scanning and substitution are interleaved: after a value is substituted the scan
//! continues at the start of the inserted text, so a value that itself contains
//! directive syntax is expanded as well. The number of substitutions per scan is
//! capped to stop self-referencing values from expanding forever.

use regex::Regex;
use std::sync::LazyLock;

use super::context::{DataContext, Resolution, stringify};

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(:([^:)]+)?:\)").expect("tag pattern is a valid regex"));

/// Indicator of a variable substitution directive.
pub const REPLACE_INDICATOR: &str = "=";
/// Indicator of an include directive.
pub const INCLUDE_INDICATOR: &str = "include";

/// A recognised directive. `tag` is the exact matched text, delimiters included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Replace { tag: String, key_path: String },
    Include { tag: String, path: String },
}

impl Directive {
    /// Classify a matched tag. Returns `None` for unknown indicators and empty payloads.
    pub fn parse(tag: &str) -> Option<Self> {
        let inner = tag.strip_prefix("(:")?.strip_suffix(":)")?;
        let indicator = inner.split_once(' ').map_or(inner, |(indicator, _)| indicator);
        let payload = inner[indicator.len()..].trim();
        if payload.is_empty() {
            return None;
        }

        match indicator {
            REPLACE_INDICATOR => Some(Directive::Replace {
                tag: tag.to_string(),
                key_path: payload.to_string(),
            }),
            INCLUDE_INDICATOR => Some(Directive::Include {
                tag: tag.to_string(),
                path: payload.to_string(),
            }),
            _ => None,
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Directive::Replace { tag, .. } | Directive::Include { tag, .. } => tag,
        }
    }
}

/// Result of scanning one file's content.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Content with every resolvable variable substituted
    pub text: String,
    /// Replace directives in order of appearance
    pub replacements: Vec<Directive>,
    /// Include directives in order of appearance
    pub includes: Vec<Directive>,
    /// Replace tags left in the text
    pub unresolved: Vec<String>,
    /// Tags with an unrecognised indicator, left in the text
    pub unknown: Vec<String>,
}

/// Scans text for directives, substituting variables from a [`DataContext`].
#[derive(Debug, Clone, Copy)]
pub struct TagScanner<'a> {
    context: &'a DataContext,
    max_substitutions: usize,
}

impl<'a> TagScanner<'a> {
    pub fn new(context: &'a DataContext, max_substitutions: usize) -> Self {
        Self {
            context,
            max_substitutions,
        }
    }

    pub fn scan(&self, text: impl Into<String>) -> ScanOutcome {
        let mut outcome = ScanOutcome {
            text: text.into(),
            ..ScanOutcome::default()
        };
        let mut cursor = 0;
        let mut substitutions = 0;
        let mut limit_reported = false;

        while cursor <= outcome.text.len() {
            let Some(found) = TAG_PATTERN.find_at(&outcome.text, cursor) else {
                break;
            };
            let range = found.range();
            let tag = found.as_str().to_string();

            match Directive::parse(&tag) {
                Some(Directive::Replace { tag, key_path }) => {
                    let value = if substitutions < self.max_substitutions {
                        self.value_for(&tag, &key_path)
                    } else {
                        if !limit_reported {
                            tracing::warn!(
                                "Substitution limit of {} reached, leaving remaining tags as-is",
                                self.max_substitutions
                            );
                            limit_reported = true;
                        }
                        None
                    };

                    match value {
                        Some(value) => {
                            outcome.text.replace_range(range.clone(), &value);
                            substitutions += 1;
                            cursor = range.start;
                        }
                        None => {
                            outcome.unresolved.push(tag.clone());
                            cursor = range.end;
                        }
                    }
                    outcome.replacements.push(Directive::Replace { tag, key_path });
                }
                Some(directive @ Directive::Include { .. }) => {
                    outcome.includes.push(directive);
                    cursor = range.end;
                }
                None => {
                    tracing::warn!("Unknown directive indicator found: {}", tag);
                    outcome.unknown.push(tag);
                    cursor = range.end;
                }
            }
        }

        outcome
    }

    fn value_for(&self, tag: &str, key_path: &str) -> Option<String> {
        match self.context.resolve(key_path) {
            Resolution::Found(value) => Some(stringify(value)),
            Resolution::Partial { value, missing } => {
                tracing::error!(
                    "Unable to resolve '{}' in {}: using the value reached before it",
                    missing,
                    tag
                );
                Some(stringify(value))
            }
            Resolution::Missing => {
                tracing::warn!("No value found for tag \"{}\"", tag);
                None
            }
        }
    }
}
