//! File system collaborators used by the loader
//!
//! The loader never touches the file system directly. It goes through:
//!
//! - [`DirectoryWalker`] - enumerates the files under a view path with their modification times
//! - [`FileReader`] - reads a file's raw bytes
//! - [`RootResolver`] - maps view-relative paths to absolute paths under the configured root
//!
//! [`FsWalker`] and [`FsReader`] are the production implementations. Tests swap in
//! counting or failing implementations.

pub mod paths;
pub mod read;
pub mod walk;

pub use paths::{RootResolver, normalize_path};
pub use read::{FileReader, FsReader};
pub use walk::{DirectoryWalker, FileEntry, FsWalker, walk_files};
