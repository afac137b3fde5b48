//! File reading for the loader.

use std::future::Future;
use std::path::Path;

use crate::core::{FileOperation, FileOperationError, FileResultExt};

/// Reads a whole file.
///
/// Raw bytes are returned so binary assets can be inlined; text decoding happens in
/// the content processor.
pub trait FileReader: Send + Sync {
    fn read(&self, path: &Path) -> impl Future<Output = Result<Vec<u8>, FileOperationError>> + Send;
}

/// [`FileReader`] backed by `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl FileReader for FsReader {
    async fn read(&self, path: &Path) -> Result<Vec<u8>, FileOperationError> {
        tokio::fs::read(path).await.with_file_context(
            FileOperation::Read,
            path,
            "loading view file",
            "reader",
        )
    }
}
