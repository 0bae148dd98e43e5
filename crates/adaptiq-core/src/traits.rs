//! The storage seam the engine reads questions and responses through.
//!
//! Implemented by the `adaptiq-store` crate.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, PublicQuestion, Question, ResponseRecord};

/// Trait for question banks and response logs.
///
/// Inserts are atomic per record and responses are never revised, so
/// implementations need no cross-record transactions.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// All responses recorded for a user, in insertion order.
    async fn fetch_responses(&self, user_id: &str) -> anyhow::Result<Vec<ResponseRecord>>;

    /// Full questions (answers included) for the given ids. Unknown ids are
    /// skipped.
    async fn fetch_questions(&self, ids: &HashSet<String>) -> anyhow::Result<Vec<Question>>;

    /// Up to `n` random questions matching `filter` whose ids are not in
    /// `exclude`, with answers stripped.
    async fn sample_questions(
        &self,
        n: usize,
        filter: &QuestionFilter,
        exclude: &HashSet<String>,
    ) -> anyhow::Result<Vec<PublicQuestion>>;

    /// The first `limit` questions matching `filter`, in storage order, with
    /// answers stripped.
    async fn find_questions(
        &self,
        filter: &QuestionFilter,
        limit: usize,
    ) -> anyhow::Result<Vec<PublicQuestion>>;

    /// Append responses.
    async fn insert_responses(&self, responses: Vec<ResponseRecord>) -> anyhow::Result<()>;
}

/// Optional constraints on which questions qualify. The default matches
/// every question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionFilter {
    #[serde(default)]
    pub sub_concept: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

impl QuestionFilter {
    /// Match every question.
    pub fn any() -> Self {
        Self::default()
    }

    /// Match one sub-topic at any difficulty.
    pub fn sub_concept(sub_concept: &str) -> Self {
        Self {
            sub_concept: Some(sub_concept.to_string()),
            difficulty: None,
        }
    }

    /// Match one sub-topic at one difficulty.
    pub fn band(sub_concept: &str, difficulty: Difficulty) -> Self {
        Self {
            sub_concept: Some(sub_concept.to_string()),
            difficulty: Some(difficulty),
        }
    }

    pub fn matches(&self, question: &Question) -> bool {
        self.sub_concept
            .as_deref()
            .map_or(true, |s| question.sub_concept == s)
            && self.difficulty.map_or(true, |d| question.difficulty == d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(sub: &str, difficulty: Difficulty) -> Question {
        Question {
            question_id: "q".into(),
            title: "t".into(),
            options: vec![],
            correct_option: String::new(),
            concept: "Arrays".into(),
            sub_concept: sub.into(),
            difficulty,
            expected_time: 60,
        }
    }

    #[test]
    fn filter_matching() {
        let q = question("Kadane", Difficulty::Medium);
        assert!(QuestionFilter::any().matches(&q));
        assert!(QuestionFilter::sub_concept("Kadane").matches(&q));
        assert!(!QuestionFilter::sub_concept("BFS").matches(&q));
        assert!(QuestionFilter::band("Kadane", Difficulty::Medium).matches(&q));
        assert!(!QuestionFilter::band("Kadane", Difficulty::Hard).matches(&q));
    }
}
