//! Notification configuration loaded from optional YAML files.
//!
//! Two independent documents feed one run: the filter/display config
//! (`config` input) and the Slack presentation info (`slack_info` input).
//! Both are optional; a missing or unparseable file falls back to the
//! default and the run continues.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{JobcastError, Result};

/// Filter/display configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub filter: FilterConfig,
    /// Populated from the `show_author` action input after load, never from
    /// the YAML document itself.
    #[serde(skip)]
    pub show_author: bool,
}

/// Allow-list of step names to report. Empty means report everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub steps: Vec<String>,
}

/// Slack presentation metadata, consumed only by payload composition.
/// Unknown fields in the YAML document are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlackInfo {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub footer: Option<String>,
}

/// Load a YAML document from `path`.
pub fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| JobcastError::Config(format!("Failed to read {}: {e}", path.display())))?;
    serde_yaml::from_str(&content)
        .map_err(|e| JobcastError::Config(format!("Failed to parse {}: {e}", path.display())))
}

/// Load a YAML document, falling back to `T::default()` when the path is
/// empty or missing, or when reading/parsing fails. Failures are logged,
/// never propagated.
pub fn load_yaml_or_default<T: DeserializeOwned + Default>(path: &str, what: &str) -> T {
    if path.is_empty() {
        return T::default();
    }
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!("No {what} file at {}, using defaults", path.display());
        return T::default();
    }
    tracing::info!("Reading {what} file {}...", path.display());
    match load_yaml(path) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("{e}; continuing with default {what}");
            T::default()
        }
    }
}
