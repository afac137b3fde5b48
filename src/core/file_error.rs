//! Structured file system error handling for template loading
//!
//! File access failures are captured with their context at the operation site
//! (what was being done, to which path, and why) instead of being reconstructed
//! later from error messages.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Types of file operations performed while loading views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    /// Reading a file completely
    Read,
    /// Getting file metadata (modification time)
    Metadata,
    /// Enumerating a directory tree
    Walk,
    /// Canonicalizing a path
    Canonicalize,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Metadata => write!(f, "getting file metadata"),
            FileOperation::Walk => write!(f, "walking directory"),
            FileOperation::Canonicalize => write!(f, "resolving path"),
        }
    }
}

/// File operation error with the context it happened in
#[derive(Error, Debug)]
#[error("File operation failed: {operation} on {}", file_path.display())]
pub struct FileOperationError {
    /// The type of operation that failed
    pub operation: FileOperation,
    /// The file path that was being accessed
    pub file_path: PathBuf,
    /// Why the file was being accessed
    pub purpose: String,
    /// What component initiated the operation
    pub caller: String,
    /// The underlying IO error
    #[source]
    pub source: std::io::Error,
}

impl FileOperationError {
    /// Create a new file operation error.
    pub fn new(
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        caller: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Self {
            operation,
            file_path: file_path.into(),
            purpose: purpose.into(),
            caller: caller.into(),
            source,
        }
    }

    /// The path the failed operation was applied to.
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Get a user-friendly error message with context
    pub fn user_message(&self) -> String {
        let mut message = format!(
            "Failed {} '{}' for {} ({})",
            self.operation,
            self.file_path.display(),
            self.purpose,
            self.caller
        );

        match self.source.kind() {
            std::io::ErrorKind::NotFound => {
                message.push_str("\n\nThe file does not exist at the specified path.");
                if self.purpose.contains("include") {
                    message.push_str("\n\nFor included templates, ensure:");
                    message.push_str("\n- The include path is relative to the view root");
                    message.push_str("\n- The filename is spelled correctly (case-sensitive)");
                }
            }
            std::io::ErrorKind::PermissionDenied => {
                message.push_str(&format!(
                    "\n\nPermission denied. Check file/directory permissions for: {}",
                    self.file_path.display()
                ));
            }
            std::io::ErrorKind::InvalidData => {
                message.push_str("\n\nThe file contains invalid data or encoding.");
                message.push_str("\nEnsure the file contains valid UTF-8 text.");
            }
            _ => {
                message.push_str(&format!("\n\nError details: {}", self.source));
            }
        }

        message
    }
}

/// Extension trait to attach file operation context to IO results
pub trait FileResultExt<T> {
    /// Add file operation context to a Result
    fn with_file_context(
        self,
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        caller: impl Into<String>,
    ) -> Result<T, FileOperationError>;
}

impl<T> FileResultExt<T> for Result<T, std::io::Error> {
    fn with_file_context(
        self,
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        caller: impl Into<String>,
    ) -> Result<T, FileOperationError> {
        self.map_err(|io_error| {
            FileOperationError::new(operation, file_path, purpose, caller, io_error)
        })
    }
}
