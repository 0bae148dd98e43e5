//! Caller-facing operations: analytics, quiz selection, and submission.
//!
//! Each call fetches what it needs from the store once and then runs the
//! pure scoring pipeline; the engine itself holds no per-user state.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aggregate::{concept_mastery, overall_mastery, weak_areas};
use crate::config::EngineConfig;
use crate::mastery::compute_mastery_map;
use crate::model::{PublicQuestion, ResponseRecord};
use crate::recommend::generate_recommendations;
use crate::report::{AnalyticsOutcome, AnalyticsReport};
use crate::selector::select_questions;
use crate::traits::QuestionStore;

/// One answered question in a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionItem {
    pub question_id: String,
    pub selected_option: String,
    /// Seconds.
    pub time_taken: u32,
}

/// A batch of answers from one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub user_id: String,
    pub responses: Vec<SubmissionItem>,
}

/// Outcome of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubmissionSummary {
    pub total_questions: usize,
    /// Share of correct answers; 0.0 for an empty submission.
    pub accuracy: f64,
}

/// The adaptive quiz engine.
pub struct QuizEngine {
    store: Arc<dyn QuestionStore>,
    config: EngineConfig,
}

impl QuizEngine {
    pub fn new(store: Arc<dyn QuestionStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Mastery analytics and recommendations for a user.
    pub async fn analytics(&self, user_id: &str) -> Result<AnalyticsOutcome> {
        let responses = self.store.fetch_responses(user_id).await?;
        if responses.is_empty() {
            debug!(user_id, "no responses recorded");
            return Ok(AnalyticsOutcome::no_data());
        }

        let ids: HashSet<String> = responses.iter().map(|r| r.question_id.clone()).collect();
        let questions = self.store.fetch_questions(&ids).await?;

        let subconcept_mastery = compute_mastery_map(&responses, &questions, &self.config);
        let concepts = concept_mastery(&subconcept_mastery, &self.config.taxonomy);
        let overall = overall_mastery(&subconcept_mastery);
        let weak = weak_areas(
            &subconcept_mastery,
            &self.config.thresholds,
            self.config.weak_area_limit,
        );
        let recommendations =
            generate_recommendations(self.store.as_ref(), &weak, &self.config.recommendations)
                .await?;

        debug!(
            user_id,
            overall_mastery = overall,
            sub_concepts = subconcept_mastery.len(),
            weak_areas = weak.len(),
            "computed analytics"
        );

        Ok(AnalyticsOutcome::Report(Box::new(AnalyticsReport {
            user_id: user_id.to_string(),
            overall_mastery: overall,
            concept_mastery: concepts,
            subconcept_mastery,
            weak_areas: weak,
            recommendations,
        })))
    }

    /// A quiz of up to `quiz_size` questions, answers stripped. Adaptive when
    /// the user has usable history, random otherwise.
    pub async fn quiz(&self, user_id: Option<&str>) -> Result<Vec<PublicQuestion>> {
        select_questions(self.store.as_ref(), &self.config, user_id).await
    }

    /// Grade and record a submission. Unknown questions count as incorrect.
    pub async fn submit(&self, submission: &Submission) -> Result<SubmissionSummary> {
        let ids: HashSet<String> = submission
            .responses
            .iter()
            .map(|r| r.question_id.clone())
            .collect();
        let questions = self.store.fetch_questions(&ids).await?;
        let answers: HashMap<&str, &str> = questions
            .iter()
            .map(|q| (q.question_id.as_str(), q.correct_option.as_str()))
            .collect();

        let timestamp = Utc::now();
        let records: Vec<ResponseRecord> = submission
            .responses
            .iter()
            .map(|item| ResponseRecord {
                user_id: submission.user_id.clone(),
                question_id: item.question_id.clone(),
                is_correct: answers
                    .get(item.question_id.as_str())
                    .is_some_and(|correct| *correct == item.selected_option),
                time_taken: item.time_taken,
                attempts: 1,
                timestamp,
            })
            .collect();

        let total_questions = records.len();
        let correct = records.iter().filter(|r| r.is_correct).count();
        let accuracy = if total_questions == 0 {
            0.0
        } else {
            correct as f64 / total_questions as f64
        };

        if !records.is_empty() {
            self.store.insert_responses(records).await?;
        }

        info!(
            user_id = %submission.user_id,
            total_questions,
            correct,
            "recorded submission"
        );

        Ok(SubmissionSummary {
            total_questions,
            accuracy,
        })
    }
}
