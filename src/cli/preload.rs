//! Warm the cache for the configured preload roots.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::CliConfig;

/// Walk and cache every configured preload root.
#[derive(Args, Debug, Default)]
pub struct PreloadCommand {}

impl PreloadCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let view_config = config.view_config().await?;
        if view_config.preloads.is_empty() {
            println!("{}", "No preload roots configured".yellow());
            return Ok(());
        }

        let roots = view_config.preloads.len();
        let engine = crate::view::ViewEngine::new(view_config)?;
        let files = engine.setup().await?;

        println!(
            "{} {} file(s) from {} preload root(s)",
            "Cached".green().bold(),
            files,
            roots
        );
        Ok(())
    }
}
