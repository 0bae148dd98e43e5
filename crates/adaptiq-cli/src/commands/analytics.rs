//! The `adaptiq analytics` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use adaptiq_core::model::{ConceptStatus, SubconceptMastery};
use adaptiq_core::report::{AnalyticsOutcome, AnalyticsReport};
use adaptiq_store::config::load_config_from;

pub async fn execute(
    user: String,
    format: String,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let engine = super::open_engine(&config)?;

    let outcome = engine.analytics(&user).await?;

    match (format.as_str(), &outcome) {
        ("json", _) => println!("{}", serde_json::to_string_pretty(&outcome)?),
        ("text" | "markdown" | "md", AnalyticsOutcome::NoData { message }) => {
            println!("{message}")
        }
        ("markdown" | "md", AnalyticsOutcome::Report(report)) => {
            println!("{}", report.to_markdown())
        }
        ("text", AnalyticsOutcome::Report(report)) => print_report(report),
        (other, _) => anyhow::bail!("unknown format: {other} (expected text, json or markdown)"),
    }

    if let Some(path) = output {
        match outcome.report() {
            Some(report) => {
                report.save_json(&path)?;
                eprintln!("Saved report to {}", path.display());
            }
            None => eprintln!("No report to save for {user}"),
        }
    }

    Ok(())
}

fn print_report(report: &AnalyticsReport) {
    println!(
        "Mastery for {}: overall {:.1}",
        report.user_id, report.overall_mastery
    );

    let mut concepts = Table::new();
    concepts.set_header(vec!["Concept", "Mastery"]);
    for (concept, status) in &report.concept_mastery {
        let value = match *status {
            ConceptStatus::Evaluated { mastery_score } => format!("{mastery_score:.1}"),
            ConceptStatus::NotAttempted => "not attempted".to_string(),
        };
        concepts.add_row(vec![Cell::new(concept), Cell::new(value)]);
    }
    println!("\n{concepts}");

    let mut subs = Table::new();
    subs.set_header(vec![
        "Sub-concept",
        "Mastery",
        "Accuracy",
        "Difficulty",
        "Time",
        "Consistency",
        "Attempts",
    ]);
    for (name, result) in &report.subconcept_mastery {
        let row = match result {
            SubconceptMastery::Evaluated(b) => vec![
                Cell::new(name),
                Cell::new(format!("{:.1}", b.mastery_score)),
                Cell::new(format!("{:.0}%", b.accuracy * 100.0)),
                Cell::new(format!("{:.0}%", b.difficulty_weighted_accuracy * 100.0)),
                Cell::new(format!("{:.2}", b.time_score)),
                Cell::new(format!("{:.2}", b.consistency_score)),
                Cell::new(b.total_attempts),
            ],
            SubconceptMastery::InsufficientData { total_attempts } => vec![
                Cell::new(name),
                Cell::new("insufficient data"),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new(total_attempts),
            ],
        };
        subs.add_row(row);
    }
    println!("\n{subs}");

    if report.weak_areas.is_empty() {
        println!("\nNo weak areas.");
        return;
    }

    println!("\nWeak areas:");
    for w in &report.weak_areas {
        println!("  {} ({}): {:.1}", w.sub_concept, w.status, w.mastery_score);
    }

    if !report.recommendations.is_empty() {
        println!("\nRecommended practice:");
        for r in &report.recommendations {
            println!("  {} ({}):", r.sub_concept, r.classification);
            let p = &r.practice_questions;
            let tiers = [("easy", &p.easy), ("medium", &p.medium), ("hard", &p.hard)];
            for (label, questions) in tiers {
                for q in questions {
                    println!("    [{label}] {} ({})", q.title, q.question_id);
                }
            }
        }
    }
}
