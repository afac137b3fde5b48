//! Test utilities for the view loader
//!
//! Helpers for unit and integration tests:
//! - [`init_test_logging`] - one-time tracing setup that writes through the test harness
//! - [`TemplateTree`] - a temporary view root with write and touch helpers
//! - [`CountingReader`] - a [`FileReader`] that records how often each path is read
//! - [`LogCapture`] - collects log output of the current thread for assertions
//!
//! # Example
//!
//! ```rust,no_run
//! use tplview_cli::test_utils::{CountingReader, TemplateTree};
//! use tplview_cli::utils::fs::FsWalker;
//! use tplview_cli::view::ViewEngine;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let tree = TemplateTree::new()?;
//! tree.write("index.html", "Hello (:= name:)")?;
//!
//! let engine = ViewEngine::with_collaborators(tree.config(), CountingReader::default(), FsWalker)?;
//! let mut view = engine.create_view();
//! view.assign("name", "Ada");
//! assert_eq!(view.load("index.html").await?, "Hello Ada");
//! assert_eq!(engine.reader().reads(&tree.path("index.html")), 1);
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use dashmap::DashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once, PoisonError};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::config::ViewConfig;
use crate::core::FileOperationError;
use crate::utils::fs::{FileReader, FsReader};

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG` when set, otherwise stays silent.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// A temporary view root.
pub struct TemplateTree {
    _dir: TempDir,
    root: PathBuf,
}

impl TemplateTree {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("Failed to create temporary view root")?;
        // Walked entries carry canonical paths
        let root = dir.path().canonicalize().context("Failed to resolve temporary view root")?;
        Ok(Self { _dir: dir, root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of `relative` inside the tree.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Write a file, creating parent directories.
    pub fn write(&self, relative: &str, content: impl AsRef<[u8]>) -> Result<PathBuf> {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Move a file's modification time `seconds` into the future.
    pub fn touch(&self, relative: &str, seconds: u64) -> Result<()> {
        let path = self.path(relative);
        let file = std::fs::File::options()
            .write(true)
            .open(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        file.set_modified(SystemTime::now() + Duration::from_secs(seconds))
            .with_context(|| format!("Failed to set mtime of {}", path.display()))?;
        Ok(())
    }

    /// Default configuration rooted at this tree.
    pub fn config(&self) -> ViewConfig {
        ViewConfig::with_root(self.root())
    }
}

/// [`FsReader`] that counts reads per path.
#[derive(Debug, Default)]
pub struct CountingReader {
    counts: DashMap<PathBuf, usize>,
}

impl CountingReader {
    /// Number of times `path` was read.
    pub fn reads(&self, path: &Path) -> usize {
        self.counts.get(path).map_or(0, |count| *count)
    }

    pub fn total_reads(&self) -> usize {
        self.counts.iter().map(|entry| *entry.value()).sum()
    }
}

impl FileReader for CountingReader {
    async fn read(&self, path: &Path) -> Result<Vec<u8>, FileOperationError> {
        *self.counts.entry(path.to_path_buf()).or_insert(0) += 1;
        FsReader.read(path).await
    }
}

/// Scoped subscriber that records formatted log lines of the current thread.
///
/// Logging returns to the previous subscriber when the capture is dropped.
///
/// ```rust,no_run
/// use tplview_cli::test_utils::LogCapture;
/// use tracing::Level;
///
/// let logs = LogCapture::start();
/// tracing::warn!("No value found for tag \"(:= x:)\"");
/// assert!(logs.contains(Level::WARN, "(:= x:)"));
/// ```
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
    _guard: tracing::subscriber::DefaultGuard,
}

impl LogCapture {
    pub fn start() -> Self {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buffer);
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || CaptureWriter(Arc::clone(&sink)))
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_target(false)
            .finish();

        Self {
            buffer,
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }

    /// Everything logged so far.
    pub fn contents(&self) -> String {
        let bytes = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Whether a line at `level` contains `text`.
    pub fn contains(&self, level: Level, text: &str) -> bool {
        self.contents()
            .lines()
            .any(|line| line.contains(level.as_str()) && line.contains(text))
    }
}

struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
