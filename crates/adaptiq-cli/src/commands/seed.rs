//! The `adaptiq seed` command.

use std::path::PathBuf;

use anyhow::Result;

use adaptiq_store::config::load_config_from;
use adaptiq_store::{generate_question_bank, AppConfig, JsonFileStore};

pub fn execute(count: Option<usize>, force: bool, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let count = count.unwrap_or(config.seed_questions);

    if config.data_path.exists() && !force {
        anyhow::bail!(
            "{} already exists; pass --force to replace it (stored responses are discarded)",
            config.data_path.display()
        );
    }

    let written = write_bank(&config, count, force)?;
    println!(
        "Seeded {} with {written} questions",
        config.data_path.display()
    );
    Ok(())
}

/// Generate `count` questions over the configured taxonomy into the data file.
pub(crate) fn write_bank(config: &AppConfig, count: usize, overwrite: bool) -> Result<usize> {
    anyhow::ensure!(count >= 1, "count must be at least 1");
    let mut rng = rand::thread_rng();
    let questions = generate_question_bank(&config.engine.taxonomy, count, &mut rng);
    let written = questions.len();
    JsonFileStore::create(&config.data_path, questions, overwrite)?;
    Ok(written)
}
