//! The `[view]` configuration table.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::core::ViewError;

/// Environment variable that overrides the configuration file location.
pub const CONFIG_ENV_VAR: &str = "TPLVIEW_CONFIG";

/// Configuration file looked up in the working directory when nothing else is given.
pub const DEFAULT_CONFIG_FILE: &str = "tplview.toml";

const fn default_minify() -> bool {
    true
}

fn default_context_anchor() -> String {
    "</head>".to_string()
}

fn default_client_variable() -> String {
    "viewData".to_string()
}

const fn default_max_substitutions() -> usize {
    4096
}

/// Loader options, read once at startup.
///
/// ```toml
/// [view]
/// root = "templates"
/// preloads = ["pages/", "partials/"]
/// minify = true
/// context_anchor = "</head>"
/// client_variable = "viewData"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ViewConfig {
    /// Base directory every view and include path is resolved against.
    ///
    /// A relative root in a config file is taken relative to that file's directory.
    #[serde(default)]
    pub root: PathBuf,

    /// View roots walked and cached at startup.
    #[serde(default)]
    pub preloads: Vec<String>,

    /// Minify `.js` files before caching them.
    #[serde(default = "default_minify")]
    pub minify: bool,

    /// Token (matched case-insensitively) before which the data snapshot is inserted.
    #[serde(default = "default_context_anchor")]
    pub context_anchor: String,

    /// Client-side global the data snapshot is assigned to.
    #[serde(default = "default_client_variable")]
    pub client_variable: String,

    /// Upper bound on variable substitutions performed by a single scan.
    #[serde(default = "default_max_substitutions")]
    pub max_substitutions: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            preloads: Vec::new(),
            minify: default_minify(),
            context_anchor: default_context_anchor(),
            client_variable: default_client_variable(),
            max_substitutions: default_max_substitutions(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    view: ViewConfig,
}

impl ViewConfig {
    /// Configuration rooted at `root` with every other option defaulted.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Load from an explicit path, the `TPLVIEW_CONFIG` variable, or `./tplview.toml`.
    ///
    /// An explicitly requested file must exist. When the location comes from the
    /// default lookup and no file is there, defaults are returned.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from(&path).await;
        }
        if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR)
            && !env_path.is_empty()
        {
            return Self::load_from(Path::new(&env_path)).await;
        }

        let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::load_from(&default_path).await
        } else {
            tracing::debug!("No configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read view config from {}", path.display()))?;

        let mut config = Self::parse(&content)
            .with_context(|| format!("Failed to parse view config from {}", path.display()))?;

        if config.root.is_relative()
            && let Some(parent) = path.parent()
        {
            config.root = parent.join(&config.root);
        }

        tracing::debug!("Loaded view config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate the TOML text of a configuration file.
    pub fn parse(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        file.view.validate()?;
        Ok(file.view)
    }

    /// Reject values the loader cannot work with.
    pub fn validate(&self) -> Result<(), ViewError> {
        if self.context_anchor.is_empty() {
            return Err(ViewError::Config {
                message: "context_anchor must not be empty".to_string(),
            });
        }
        if self.client_variable.is_empty()
            || !self
                .client_variable
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.')
        {
            return Err(ViewError::Config {
                message: format!(
                    "client_variable '{}' is not a valid script identifier",
                    self.client_variable
                ),
            });
        }
        if self.max_substitutions == 0 {
            return Err(ViewError::Config {
                message: "max_substitutions must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
