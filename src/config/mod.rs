//! Config module - settings shared by every transcode call.

use crate::fieldpath::SkipPaths;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Server-managed paths of a Kubernetes object.
pub const DEFAULT_SKIP_PATHS: &[&str] = &[
    "status",
    "metadata.uid",
    "metadata.resource_version",
    "metadata.generation",
    "metadata.creation_timestamp",
    "metadata.deletion_timestamp",
    "metadata.deletion_grace_period_seconds",
    "metadata.self_link",
    "metadata.managed_fields",
    "metadata.annotations.kubectl.kubernetes.io/last-applied-configuration",
];

/// Error loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// TranscoderConfig holds the read-only settings of the transcoders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscoderConfig {
    /// Dotted local paths excluded in both directions.
    #[serde(default = "default_skip_paths")]
    pub skip_paths: Vec<String>,
}

fn default_skip_paths() -> Vec<String> {
    DEFAULT_SKIP_PATHS.iter().map(|p| p.to_string()).collect()
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        TranscoderConfig {
            skip_paths: default_skip_paths(),
        }
    }
}

impl TranscoderConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads a config file; `.json` files are read as JSON, anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// Builds the path filter handed to the transcoders.
    pub fn skip_paths(&self) -> SkipPaths {
        self.skip_paths.iter().collect()
    }
}
