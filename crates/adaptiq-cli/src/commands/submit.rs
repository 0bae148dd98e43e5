//! The `adaptiq submit` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use adaptiq_core::{Submission, SubmissionItem};
use adaptiq_store::config::load_config_from;

pub async fn execute(
    user: String,
    answers: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(!user.is_empty(), "user id must not be empty");

    let content = std::fs::read_to_string(&answers)
        .with_context(|| format!("failed to read answers: {}", answers.display()))?;
    let responses: Vec<SubmissionItem> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse answers: {}", answers.display()))?;

    let config = load_config_from(config_path.as_deref())?;
    let engine = super::open_engine(&config)?;

    let summary = engine
        .submit(&Submission {
            user_id: user.clone(),
            responses,
        })
        .await?;

    println!(
        "Recorded {} response(s) for {user}: accuracy {:.1}%",
        summary.total_questions,
        summary.accuracy * 100.0
    );
    Ok(())
}
