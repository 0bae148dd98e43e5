//! Application configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use adaptiq_core::EngineConfig;

use crate::bank::DEFAULT_SEED_QUESTIONS;

/// Name of the config file looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = "adaptiq.toml";

/// Overrides `data_path` when set.
pub const DATA_PATH_ENV: &str = "ADAPTIQ_DATA_PATH";

/// Top-level adaptiq configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// JSON file holding the question bank and response log.
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    /// Questions generated by `adaptiq seed`.
    #[serde(default = "default_seed_questions")]
    pub seed_questions: usize,
    /// Scoring and selection parameters.
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./adaptiq-data.json")
}
fn default_seed_questions() -> usize {
    DEFAULT_SEED_QUESTIONS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            seed_questions: default_seed_questions(),
            engine: EngineConfig::default(),
        }
    }
}

impl AppConfig {
    /// Render as TOML, used to write a starter config file.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config")
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Unset variables expand to the empty string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without an explicit path:
/// 1. `adaptiq.toml` in the current directory
/// 2. `~/.config/adaptiq/config.toml`
///
/// `ADAPTIQ_DATA_PATH` overrides `data_path`.
pub fn load_config_from(path: Option<&Path>) -> Result<AppConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<AppConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => AppConfig::default(),
    };

    if let Ok(data_path) = std::env::var(DATA_PATH_ENV) {
        config.data_path = PathBuf::from(data_path);
    }
    config.data_path = PathBuf::from(resolve_env_vars(&config.data_path.to_string_lossy()));

    config.engine.validate().with_context(|| match &config_path {
        Some(path) => format!("invalid engine settings in {}", path.display()),
        None => "invalid default engine settings".to_string(),
    })?;

    let source = config_path
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".into());
    tracing::debug!(
        source = %source,
        data_path = %config.data_path.display(),
        "loaded config"
    );

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("adaptiq"))
}
