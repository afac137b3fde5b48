//! Render a view to stdout or a file.

use anyhow::{Context, Result, bail};
use clap::Args;
use serde_json::Value;
use std::path::PathBuf;

use super::CliConfig;

/// Resolve a view with the given data.
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// View path relative to the root (a file or a directory)
    #[arg(value_name = "VIEW")]
    pub view: String,

    /// JSON object whose top-level keys are assigned as variables
    #[arg(long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Assign a variable; the value is parsed as JSON when possible, else taken as text
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub assignments: Vec<(String, Value)>,

    /// Write the result to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Parse `key=value`, reading the value as JSON when it is valid JSON.
pub fn parse_assignment(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing variable name in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

impl RenderCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let engine = config.engine().await?;
        let mut view = engine.create_view();

        if let Some(path) = &self.data {
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read view data from {}", path.display()))?;
            let data: Value = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse view data from {}", path.display()))?;
            let Value::Object(map) = data else {
                bail!("View data in {} must be a JSON object", path.display());
            };
            for (name, value) in map {
                view.assign(name, value);
            }
        }

        for (name, value) in self.assignments {
            view.assign(name, value);
        }

        let output = view.load(&self.view).await?;

        match &self.output {
            Some(path) => {
                tokio::fs::write(path, &output)
                    .await
                    .with_context(|| format!("Failed to write output to {}", path.display()))?;
                tracing::info!("Wrote {} bytes to {}", output.len(), path.display());
            }
            None => print!("{output}"),
        }
        Ok(())
    }
}
