//! Command-line interface for the view loader
//!
//! # Commands
//!
//! - `render` - resolve a view with data from a JSON file and `--set` pairs
//! - `preload` - walk the configured preload roots and report what was cached
//!
//! # Global Options
//!
//! - `--verbose` / `--quiet` - log level (debug / errors only; default info)
//! - `--config <FILE>` - configuration file (else `TPLVIEW_CONFIG`, else `./tplview.toml`)
//! - `--root <DIR>` - view root, overriding the configuration
//!
//! ```bash
//! tplview render pages/index.html --data page.json --set user.name='"Ada"'
//! tplview --config site.toml preload
//! ```

pub mod preload;
pub mod render;


use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::ViewConfig;
use crate::view::ViewEngine;

/// Runtime settings derived from the global flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Default log filter when `RUST_LOG` is not set.
    pub log_level: String,
    /// Explicit configuration file.
    pub config_path: Option<PathBuf>,
    /// View root overriding the configuration file.
    pub root: Option<PathBuf>,
}

impl CliConfig {
    /// Load the view configuration and apply the `--root` override.
    pub async fn view_config(&self) -> Result<ViewConfig> {
        let mut config = ViewConfig::load_with_optional(self.config_path.clone()).await?;
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        Ok(config)
    }

    /// Build an engine and run the startup preload.
    pub async fn engine(&self) -> Result<ViewEngine> {
        let engine = ViewEngine::new(self.view_config().await?)?;
        engine.setup().await?;
        Ok(engine)
    }
}

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `default_level`.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Recursive view-template loader
#[derive(Parser)]
#[command(
    name = "tplview",
    about = "Resolve view templates with includes and variables",
    version,
    long_about = "tplview resolves (:include path:) and (:= key.path:) directives in view files, caching processed file content by path and modification time."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// View root directory (overrides `root` in the configuration)
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a view and print the result.
    ///
    /// See [`render::RenderCommand`] for options.
    Render(render::RenderCommand),

    /// Cache the configured preload roots.
    ///
    /// See [`preload::PreloadCommand`] for options.
    Preload(preload::PreloadCommand),
}

impl Cli {
    /// Initialize logging and run the selected command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        init_logging(&config.log_level);
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        CliConfig {
            log_level: log_level.to_string(),
            config_path: self.config.clone(),
            root: self.root.clone(),
        }
    }

    /// Run the command with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Render(cmd) => cmd.execute(&config).await,
            Commands::Preload(cmd) => cmd.execute(&config).await,
        }
    }
}
