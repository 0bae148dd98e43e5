//! The `adaptiq init` command.

use std::path::{Path, PathBuf};

use anyhow::Result;

use adaptiq_store::config::{load_config_from, LOCAL_CONFIG_FILE};
use adaptiq_store::AppConfig;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE));

    if config_path.exists() {
        println!("{} already exists, skipping.", config_path.display());
    } else {
        let body = AppConfig::default().to_toml_string()?;
        std::fs::write(&config_path, format!("{CONFIG_HEADER}{body}"))?;
        println!("Created {}", config_path.display());
    }

    let config = load_config_from(Some(&config_path))?;
    let data_path: &Path = &config.data_path;
    if data_path.exists() {
        println!("{} already exists, skipping.", data_path.display());
    } else {
        let count = super::seed::write_bank(&config, config.seed_questions, false)?;
        println!("Created {} with {count} questions", data_path.display());
    }

    println!("\nNext steps:");
    println!("  1. Run: adaptiq quiz --user alice");
    println!("  2. Answer it: adaptiq submit --user alice --answers answers.json");
    println!("  3. Run: adaptiq analytics --user alice");

    Ok(())
}

const CONFIG_HEADER: &str = "# adaptiq configuration\n\
# data_path may reference environment variables as ${VAR}; ADAPTIQ_DATA_PATH overrides it.\n\n";
