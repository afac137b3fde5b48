//! tplview - recursive view-template loader
//!
//! Resolves a root view path (a file or a directory of files), recursively inlines
//! included sub-views, substitutes variables from a per-view data context, and caches
//! processed file content keyed by path and modification time.
//!
//! # Directive Syntax
//!
//! ```text
//! (:= dotted.key.path:)       variable interpolation
//! (:include relative/path:)   sub-view inclusion (file or directory)
//! ```
//!
//! Any other `(:token ...:)` form is left verbatim with a logged warning.
//!
//! # Architecture Overview
//!
//! - [`view`] - [`view::ViewEngine`] owns the shared cache; [`view::View`] holds one
//!   request's data context and runs loads
//! - [`templating`] - tag scanner, variable resolver, resolution cache and the
//!   recursive loader
//! - [`processing`] - per-file-type transforms applied before caching (script
//!   minification, stylesheet flattening, image inlining)
//! - [`utils`] - directory walker, file reader and root-path resolver
//! - [`config`] - the `[view]` TOML configuration
//! - [`core`] - error types
//! - [`cli`] - the `tplview` command line
//!
//! # Example
//!
//! ```rust,no_run
//! use tplview_cli::config::ViewConfig;
//! use tplview_cli::view::ViewEngine;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let engine = ViewEngine::new(ViewConfig::with_root("templates"))?;
//! let mut view = engine.create_view();
//! view.assign("title", "Home");
//! println!("{}", view.load("index.html").await?);
//! # Ok(())
//! # }
//! ```

// Core functionality modules
pub mod cli;
pub mod config;
pub mod core;

// Resolution engine
pub mod processing;
pub mod templating;
pub mod view;

// Supporting modules
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
