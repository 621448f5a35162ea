//! Runtime settings.
//!
//! Settings come from built-in defaults, then an optional YAML file, then
//! command-line flags (or their environment variables), each layer
//! overriding the previous one. Outbound request headers and the timeout are
//! not settings; see [`crate::fetch::FetchConfig`].
//!
//! ```yaml
//! base_url: https://www.blogdumoderateur.com/
//! store_dir: ./data
//! collection: articles
//! ```

use crate::cli::Cli;
use crate::error::ScrapeError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

pub const DEFAULT_BASE_URL: &str = "https://www.blogdumoderateur.com/";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Site root used for category discovery and article URL validation.
    pub base_url: String,
    pub store_dir: PathBuf,
    /// File stem of the JSON-lines collection inside `store_dir`.
    pub collection: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            store_dir: PathBuf::from("./data"),
            collection: "articles".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from YAML; missing keys keep their defaults.
    pub fn from_yaml(path: &Path, yaml: &str) -> Result<Self, ScrapeError> {
        serde_yaml::from_str(yaml).map_err(|e| ScrapeError::Config {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }

    /// Read the YAML file at `path`.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self, ScrapeError> {
        let yaml = fs::read_to_string(path)
            .await
            .map_err(|e| ScrapeError::Config {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;
        let settings = Self::from_yaml(path, &yaml)?;
        info!("Loaded configuration file");
        Ok(settings)
    }

    /// Defaults, overlaid by the `--config` file, overlaid by CLI flags.
    pub async fn resolve(cli: &Cli) -> Result<Self, ScrapeError> {
        let settings = match &cli.config {
            Some(path) => Self::load(path).await?,
            None => Self::default(),
        };
        Ok(settings.with_overrides(cli))
    }

    fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(base_url) = &cli.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(store_dir) = &cli.store_dir {
            self.store_dir = store_dir.clone();
        }
        self
    }
}
