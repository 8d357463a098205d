//! Chargement et validation de la configuration.

use crate::locale::Locale;
use crate::merger::MergeOptions;
use crate::pipeline::PipelineOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Groupe cible, ex. `"РС02-24"`.
    #[serde(default = "default_group")]
    pub group: String,

    #[serde(default)]
    pub locale: Locale,

    /// Répertoire du marqueur d'URL (`last_docx_url.txt`).
    #[serde(default = "default_marker_dir")]
    pub marker_dir: PathBuf,

    /// Planning de base extrait (JSON ou CSV).
    #[serde(default)]
    pub baseline: Option<PathBuf>,

    /// Document de remplacements extrait (JSON).
    #[serde(default)]
    pub replacements: Option<PathBuf>,

    #[serde(default)]
    pub dedupe_comments: bool,
}

fn default_group() -> String {
    "РС02-24".to_string()
}

fn default_marker_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            group: default_group(),
            locale: Locale::default(),
            marker_dir: default_marker_dir(),
            baseline: None,
            replacements: None,
            dedupe_comments: false,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.group.trim().is_empty() {
            return Err(ConfigError::Validation("group cannot be empty".into()));
        }
        Ok(())
    }

    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            dedupe_comments: self.dedupe_comments,
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            group: self.group.clone(),
            locale: self.locale,
            merge: self.merge_options(),
        }
    }
}
