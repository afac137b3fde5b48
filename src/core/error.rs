//! Error handling for view loading
//!
//! Two layers, as in the rest of the crate:
//! 1. [`ViewError`] - strongly-typed failures returned by the loader and the view API
//! 2. [`ErrorContext`] - a user-facing wrapper with details and suggestions for the CLI
//!
//! Only I/O failures are errors. Missing variables, partially resolved key paths,
//! unknown directives and minification failures are logged and resolution carries on.
//!
//! # Examples
//!
//! ```rust,no_run
//! use tplview_cli::core::{ViewError, user_friendly_error};
//!
//! fn report(err: ViewError) {
//!     let ctx = user_friendly_error(anyhow::Error::from(err));
//!     ctx.display(); // Shows colored error with suggestions
//! }
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use super::file_error::FileOperationError;

/// Failures that abort a load, preload or configuration step.
#[derive(Error, Debug)]
pub enum ViewError {
    /// A file could not be read or inspected.
    #[error(transparent)]
    FileSystem(#[from] FileOperationError),

    /// The directory walker could not enumerate a path.
    #[error("Failed to walk '{}': {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Invalid configuration value.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ViewError {
    /// The path the failure is attached to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            ViewError::FileSystem(err) => Some(err.path()),
            ViewError::Walk { path, .. } => Some(path),
            ViewError::Config { .. } => None,
        }
    }

    /// Multi-line message with the offending path and hints.
    pub fn user_message(&self) -> String {
        match self {
            ViewError::FileSystem(err) => err.user_message(),
            ViewError::Walk { path, source } => {
                let mut message = format!("Failed walking '{}'", path.display());
                match source.io_error().map(std::io::Error::kind) {
                    Some(std::io::ErrorKind::NotFound) => {
                        message.push_str("\n\nThe view path does not exist under the view root.");
                    }
                    Some(std::io::ErrorKind::PermissionDenied) => {
                        message.push_str("\n\nPermission denied while listing the directory.");
                    }
                    _ => message.push_str(&format!("\n\nError details: {source}")),
                }
                message
            }
            other => other.to_string(),
        }
    }
}

/// User-facing error with optional details and a suggestion.
#[derive(Debug)]
pub struct ErrorContext {
    /// The main error message
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into a user-friendly [`ErrorContext`].
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(view_error) = error.downcast_ref::<ViewError>() {
        let ctx = ErrorContext::new(view_error.user_message());
        return match view_error {
            ViewError::FileSystem(_) | ViewError::Walk { .. } => ctx.with_suggestion(
                "Check that the path exists relative to the view root (see --root or `root` in the config file)",
            ),
            ViewError::Config { .. } => ctx,
        };
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(format!("Invalid configuration file: {toml_error}"))
            .with_suggestion("Check the TOML syntax of the [view] table");
    }

    if let Some(json_error) = error.downcast_ref::<serde_json::Error>() {
        return ErrorContext::new(format!("Invalid view data: {json_error}"))
            .with_suggestion("The --data file must contain a JSON object");
    }

    // Keep the full anyhow chain for everything else
    ErrorContext::new(format!("{error:#}"))
}
