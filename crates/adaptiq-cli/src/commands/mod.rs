//! Subcommand implementations.

pub mod analytics;
pub mod init;
pub mod quiz;
pub mod seed;
pub mod submit;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use adaptiq_core::QuizEngine;
use adaptiq_store::{AppConfig, JsonFileStore};

/// Open the configured data file and build an engine over it.
pub(crate) fn open_engine(config: &AppConfig) -> Result<QuizEngine> {
    let store = open_store(&config.data_path)?;
    Ok(QuizEngine::new(Arc::new(store), config.engine.clone()))
}

pub(crate) fn open_store(path: &Path) -> Result<JsonFileStore> {
    if !path.exists() {
        anyhow::bail!(
            "data file not found: {} (run `adaptiq init` or `adaptiq seed`)",
            path.display()
        );
    }
    JsonFileStore::open(path).with_context(|| format!("failed to open {}", path.display()))
}
