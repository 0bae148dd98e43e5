//! The `adaptiq quiz` command.

use std::path::PathBuf;

use anyhow::Result;

use adaptiq_store::config::load_config_from;

pub async fn execute(
    user: Option<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let engine = super::open_engine(&config)?;

    let questions = engine.quiz(user.as_deref()).await?;

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&questions)?);
        }
        "text" => {
            if questions.is_empty() {
                println!("No questions available.");
            }
            for (i, q) in questions.iter().enumerate() {
                println!(
                    "{}. [{} / {} / {}] {}",
                    i + 1,
                    q.concept,
                    q.sub_concept,
                    q.difficulty,
                    q.title
                );
                for option in &q.options {
                    println!("     - {option}");
                }
                println!("     id: {}", q.question_id);
            }
        }
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}
