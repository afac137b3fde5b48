//! Root-path resolution for view and include paths.
//!
//! Every path a template names is relative to the configured view root, never to
//! the file that contains the directive.

use std::path::{Component, Path, PathBuf};

use crate::core::{FileOperation, FileResultExt, ViewError};

/// Normalizes a path by resolving `.` and `..` components.
///
/// Purely lexical: symbolic links are not resolved and the path does not have to exist.
///
/// ```rust,no_run
/// use tplview_cli::utils::fs::normalize_path;
/// use std::path::{Path, PathBuf};
///
/// let normalized = normalize_path(Path::new("/views/./pages/../partials/nav.html"));
/// assert_eq!(normalized, PathBuf::from("/views/partials/nav.html"));
/// ```
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                } else if !matches!(components.last(), Some(Component::RootDir)) {
                    components.push(component);
                }
            }
            c => components.push(c),
        }
    }

    components.iter().collect()
}

/// Maps caller-relative view paths onto the configured root directory.
#[derive(Debug, Clone)]
pub struct RootResolver {
    root: PathBuf,
}

impl RootResolver {
    /// Create a resolver for `root`, made absolute against the working directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, ViewError> {
        let root = root.as_ref();
        let root = if root.as_os_str().is_empty() { Path::new(".") } else { root };
        let absolute = std::path::absolute(root).with_file_context(
            FileOperation::Canonicalize,
            root,
            "resolving the view root",
            "root_resolver",
        )?;
        Ok(Self {
            root: normalize_path(&absolute),
        })
    }

    /// The absolute root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of `relative` under the root.
    ///
    /// Leading separators are ignored so `/partials/nav.html` and `partials/nav.html`
    /// name the same file.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        let trimmed = relative.trim().trim_start_matches(['/', '\\']);
        normalize_path(&self.root.join(trimmed))
    }
}
