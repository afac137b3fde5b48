//! Utilities shared by the loader
//!
//! - [`fs`] - directory walking, file reading and root-path resolution

pub mod fs;

pub use fs::{DirectoryWalker, FileEntry, FileReader, FsReader, FsWalker, RootResolver};
