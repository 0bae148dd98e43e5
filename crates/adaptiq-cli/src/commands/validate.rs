//! The `adaptiq validate` command.

use std::path::PathBuf;

use anyhow::Result;

use adaptiq_store::audit_question_bank;
use adaptiq_store::config::load_config_from;

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    // Loading validates the engine settings.
    let config = load_config_from(config_path.as_deref())?;
    let pairs = config.engine.taxonomy.pairs().count();
    println!(
        "Config OK: {} concepts, {pairs} sub-concepts, quiz size {}",
        config.engine.taxonomy.concepts().count(),
        config.engine.quiz_size
    );

    let store = super::open_store(&config.data_path)?;
    let snapshot = store.snapshot().await;
    println!(
        "Data file: {} ({} questions, {} responses)",
        store.path().display(),
        snapshot.questions.len(),
        snapshot.responses.len()
    );

    let warnings = audit_question_bank(&snapshot.questions, &config.engine.taxonomy);
    for w in &warnings {
        println!("  [{}] WARNING: {}", w.question_id, w.message);
    }

    if warnings.is_empty() {
        println!("All checks passed.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
