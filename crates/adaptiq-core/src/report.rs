//! Per-user analytics report, with JSON persistence and a markdown rendering.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{
    ConceptMasteryMap, ConceptStatus, MasteryMap, SubconceptMastery, WeaknessEntry,
};
use crate::recommend::Recommendation;

/// Message returned for a user without any responses.
pub const NO_DATA_MESSAGE: &str = "No data available";

/// Everything computed about one user's mastery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub user_id: String,
    /// Attempt-weighted mastery across evaluated sub-topics.
    pub overall_mastery: f64,
    /// Taxonomy topics in declaration order.
    pub concept_mastery: ConceptMasteryMap,
    pub subconcept_mastery: MasteryMap,
    /// Weakest first.
    pub weak_areas: Vec<WeaknessEntry>,
    pub recommendations: Vec<Recommendation>,
}

/// Result of an analytics request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalyticsOutcome {
    Report(Box<AnalyticsReport>),
    NoData { message: String },
}

impl AnalyticsOutcome {
    pub fn no_data() -> Self {
        AnalyticsOutcome::NoData {
            message: NO_DATA_MESSAGE.to_string(),
        }
    }

    pub fn report(&self) -> Option<&AnalyticsReport> {
        match self {
            AnalyticsOutcome::Report(r) => Some(r),
            AnalyticsOutcome::NoData { .. } => None,
        }
    }
}

impl AnalyticsReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Render as a markdown document.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        md.push_str(&format!("# Mastery report for {}\n\n", self.user_id));
        md.push_str(&format!(
            "Overall mastery: **{:.1}**\n\n",
            self.overall_mastery
        ));

        md.push_str("## Concepts\n\n");
        md.push_str("| Concept | Mastery |\n|---------|---------|\n");
        for (concept, status) in &self.concept_mastery {
            let value = match *status {
                ConceptStatus::Evaluated { mastery_score } => format!("{mastery_score:.1}"),
                ConceptStatus::NotAttempted => "not attempted".to_string(),
            };
            md.push_str(&format!("| {concept} | {value} |\n"));
        }

        md.push_str("\n## Sub-concepts\n\n");
        md.push_str("| Sub-concept | Mastery | Attempts |\n|-------------|---------|----------|\n");
        for (name, result) in &self.subconcept_mastery {
            let value = match result {
                SubconceptMastery::Evaluated(b) => format!("{:.1}", b.mastery_score),
                SubconceptMastery::InsufficientData { .. } => "insufficient data".to_string(),
            };
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                name,
                value,
                result.total_attempts()
            ));
        }

        if !self.weak_areas.is_empty() {
            md.push_str("\n## Weak areas\n\n");
            for w in &self.weak_areas {
                md.push_str(&format!(
                    "- **{}** ({}): {:.1}\n",
                    w.sub_concept, w.status, w.mastery_score
                ));
            }
        }

        if !self.recommendations.is_empty() {
            md.push_str("\n## Recommended practice\n\n");
            for r in &self.recommendations {
                let p = &r.practice_questions;
                md.push_str(&format!(
                    "- {} ({}): {} easy, {} medium, {} hard\n",
                    r.sub_concept,
                    r.classification,
                    p.easy.len(),
                    p.medium.len(),
                    p.hard.len()
                ));
            }
        }

        md
    }
}
