//! Core types and error handling shared by every layer of the loader.
//!
//! - [`error`] - [`ViewError`] and the CLI-facing [`ErrorContext`]
//! - [`file_error`] - file operation errors that carry the offending path

pub mod error;
pub mod file_error;

pub use error::{ErrorContext, ViewError, user_friendly_error};
pub use file_error::{FileOperation, FileOperationError, FileResultExt};
