//! Directory walking with modification times.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use walkdir::WalkDir;

use crate::core::{FileOperation, FileOperationError, FileResultExt, ViewError};

/// A file found under a view root, with its modification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Canonical absolute path of the file (symbolic links resolved)
    pub path: PathBuf,
    /// Modification time in milliseconds since the Unix epoch
    pub modified_millis: u64,
}

impl FileEntry {
    /// File extension without the dot, if any.
    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|ext| ext.to_str())
    }
}

/// Enumerates the files below a path.
///
/// A path naming a single file yields exactly that file. The returned order is the
/// order in which the files' resolved output is concatenated.
pub trait DirectoryWalker: Send + Sync {
    fn walk(&self, path: &Path) -> impl Future<Output = Result<Vec<FileEntry>, ViewError>> + Send;
}

/// [`DirectoryWalker`] over the real file system using `walkdir`.
///
/// Entries are sorted by file name at every level and symbolic links are followed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsWalker;

impl DirectoryWalker for FsWalker {
    async fn walk(&self, path: &Path) -> Result<Vec<FileEntry>, ViewError> {
        let root = path.to_path_buf();
        tokio::task::spawn_blocking(move || walk_files(&root))
            .await
            .map_err(|join_err| {
                ViewError::from(FileOperationError::new(
                    FileOperation::Walk,
                    path,
                    "walking view path",
                    "walker",
                    std::io::Error::other(join_err),
                ))
            })?
    }
}

/// Synchronous walk used by [`FsWalker`].
pub fn walk_files(root: &Path) -> Result<Vec<FileEntry>, ViewError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|source| ViewError::Walk {
            path: source.path().unwrap_or(root).to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let metadata = entry.metadata().map_err(|source| ViewError::Walk {
            path: entry.path().to_path_buf(),
            source,
        })?;
        let modified = metadata.modified().with_file_context(
            FileOperation::Metadata,
            entry.path(),
            "reading modification time",
            "walker",
        )?;
        let modified_millis = modified
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0);

        let path = std::fs::canonicalize(entry.path()).with_file_context(
            FileOperation::Canonicalize,
            entry.path(),
            "resolving the canonical view path",
            "walker",
        )?;
        files.push(FileEntry {
            path,
            modified_millis,
        });
    }

    tracing::debug!("Walked {} file(s) under {}", files.len(), root.display());
    Ok(files)
}
