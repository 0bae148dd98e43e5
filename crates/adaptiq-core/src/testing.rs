//! Deterministic in-process store for unit tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::model::{PublicQuestion, Question, ResponseRecord};
use crate::traits::{QuestionFilter, QuestionStore};

/// Serves questions in insertion order; "sampling" takes the first matches.
pub(crate) struct VecStore {
    questions: Vec<Question>,
    responses: Mutex<Vec<ResponseRecord>>,
}

impl VecStore {
    pub(crate) fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            responses: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn push_responses(&self, responses: Vec<ResponseRecord>) {
        self.responses.lock().unwrap().extend(responses);
    }

    pub(crate) fn responses(&self) -> Vec<ResponseRecord> {
        self.responses.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuestionStore for VecStore {
    async fn fetch_responses(&self, user_id: &str) -> anyhow::Result<Vec<ResponseRecord>> {
        Ok(self
            .responses
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn fetch_questions(&self, ids: &HashSet<String>) -> anyhow::Result<Vec<Question>> {
        Ok(self
            .questions
            .iter()
            .filter(|q| ids.contains(&q.question_id))
            .cloned()
            .collect())
    }

    async fn sample_questions(
        &self,
        n: usize,
        filter: &QuestionFilter,
        exclude: &HashSet<String>,
    ) -> anyhow::Result<Vec<PublicQuestion>> {
        Ok(self
            .questions
            .iter()
            .filter(|q| filter.matches(q) && !exclude.contains(&q.question_id))
            .take(n)
            .map(Question::to_public)
            .collect())
    }

    async fn find_questions(
        &self,
        filter: &QuestionFilter,
        limit: usize,
    ) -> anyhow::Result<Vec<PublicQuestion>> {
        Ok(self
            .questions
            .iter()
            .filter(|q| filter.matches(q))
            .take(limit)
            .map(Question::to_public)
            .collect())
    }

    async fn insert_responses(&self, responses: Vec<ResponseRecord>) -> anyhow::Result<()> {
        self.push_responses(responses);
        Ok(())
    }
}
