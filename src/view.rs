//! Public entry points: the engine that owns the cache, and per-request views.
//!
//! ```rust,no_run
//! use tplview_cli::config::ViewConfig;
//! use tplview_cli::view::ViewEngine;
//! use serde_json::json;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let engine = ViewEngine::new(ViewConfig::with_root("templates"))?;
//! engine.setup().await?;
//!
//! let mut view = engine.create_view();
//! view.assign("user", json!({ "name": "Ada" }));
//! let html = view.load("pages/index.html").await?;
//! # Ok(())
//! # }
//! ```

use serde_json::Value;
use std::sync::Arc;

use crate::config::ViewConfig;
use crate::core::ViewError;
use crate::templating::{DataContext, ResolutionCache, SeenSet, TemplateLoader};
use crate::utils::fs::{DirectoryWalker, FileReader, FsReader, FsWalker};

/// Owns the shared resolution cache and creates views.
///
/// Cloning is cheap and every clone shares the same cache, so one engine can serve
/// any number of concurrent loads.
pub struct ViewEngine<R = FsReader, W = FsWalker> {
    loader: Arc<TemplateLoader<R, W>>,
    config: Arc<ViewConfig>,
}

impl<R, W> Clone for ViewEngine<R, W> {
    fn clone(&self) -> Self {
        Self {
            loader: Arc::clone(&self.loader),
            config: Arc::clone(&self.config),
        }
    }
}

impl ViewEngine {
    /// Engine over the real file system with a fresh cache.
    pub fn new(config: ViewConfig) -> Result<Self, ViewError> {
        Self::with_collaborators(config, FsReader, FsWalker)
    }
}

impl<R: FileReader, W: DirectoryWalker> ViewEngine<R, W> {
    /// Engine with custom file access, e.g. a counting reader in tests.
    pub fn with_collaborators(config: ViewConfig, reader: R, walker: W) -> Result<Self, ViewError> {
        Self::with_cache(config, Arc::new(ResolutionCache::new()), reader, walker)
    }

    /// Engine sharing an existing cache.
    pub fn with_cache(
        config: ViewConfig,
        cache: Arc<ResolutionCache>,
        reader: R,
        walker: W,
    ) -> Result<Self, ViewError> {
        let loader = TemplateLoader::new(&config, cache, reader, walker)?;
        Ok(Self {
            loader: Arc::new(loader),
            config: Arc::new(config),
        })
    }

    /// Warm the cache with every configured preload root.
    ///
    /// Files are read and processed but not resolved. Returns the number of files
    /// cached; the first failure aborts.
    pub async fn setup(&self) -> Result<usize, ViewError> {
        if self.config.preloads.is_empty() {
            return Ok(0);
        }

        tracing::debug!("Preloading view files");
        let mut total = 0;
        for root in &self.config.preloads {
            total += self.loader.preload(root).await?;
        }
        tracing::info!("Preloaded {} view file(s)", total);
        Ok(total)
    }

    /// A new view with an empty data context.
    pub fn create_view(&self) -> View<R, W> {
        View {
            loader: Arc::clone(&self.loader),
            data: DataContext::new(),
        }
    }

    pub fn cache(&self) -> &Arc<ResolutionCache> {
        self.loader.cache()
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn reader(&self) -> &R {
        self.loader.reader()
    }
}

/// A data context plus the engine's loader.
pub struct View<R = FsReader, W = FsWalker> {
    loader: Arc<TemplateLoader<R, W>>,
    data: DataContext,
}

impl<R: FileReader, W: DirectoryWalker> View<R, W> {
    /// Set a variable, replacing any previous value.
    pub fn assign(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.data.assign(name, value);
    }

    /// A copy of a previously assigned value.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.data.get(name)
    }

    pub fn data(&self) -> &DataContext {
        &self.data
    }

    /// Resolve `view_path` with this view's data.
    pub async fn load(&self, view_path: &str) -> Result<String, ViewError> {
        let mut seen = SeenSet::new();
        self.loader.load(view_path, &mut seen, &self.data).await
    }
}
