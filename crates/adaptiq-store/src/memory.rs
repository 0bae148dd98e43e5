//! In-process store.
//!
//! Questions and responses live in `RwLock`ed vectors; sampling draws from
//! an optionally seeded RNG so tests can be reproducible.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::{IteratorRandom, SliceRandom};
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use adaptiq_core::model::{PublicQuestion, Question, ResponseRecord};
use adaptiq_core::traits::{QuestionFilter, QuestionStore};

use crate::bank::validate_question_bank;
use crate::error::StoreError;

/// Serializable contents of a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub responses: Vec<ResponseRecord>,
}

/// A store held entirely in memory.
pub struct InMemoryStore {
    questions: RwLock<Vec<Question>>,
    responses: RwLock<Vec<ResponseRecord>>,
    rng: Mutex<StdRng>,
}

impl InMemoryStore {
    /// Create a store over a validated question bank.
    pub fn new(questions: Vec<Question>) -> Result<Self, StoreError> {
        Self::from_snapshot(Snapshot {
            questions,
            responses: Vec::new(),
        })
    }

    /// Restore a store from a snapshot, validating its questions.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, StoreError> {
        validate_question_bank(&snapshot.questions)?;
        Ok(Self {
            questions: RwLock::new(snapshot.questions),
            responses: RwLock::new(snapshot.responses),
            rng: Mutex::new(StdRng::from_entropy()),
        })
    }

    /// Use a fixed RNG seed for sampling.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// Copy of the current contents.
    pub async fn snapshot(&self) -> Snapshot {
        Snapshot {
            questions: self.questions.read().await.clone(),
            responses: self.responses.read().await.clone(),
        }
    }

    pub async fn response_count(&self) -> usize {
        self.responses.read().await.len()
    }

    fn sample(&self, candidates: Vec<&Question>, n: usize) -> Vec<PublicQuestion> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let mut picked = candidates.into_iter().choose_multiple(&mut *rng, n);
        // choose_multiple does not randomize order
        picked.shuffle(&mut *rng);
        picked.into_iter().map(Question::to_public).collect()
    }
}

#[async_trait]
impl QuestionStore for InMemoryStore {
    async fn fetch_responses(&self, user_id: &str) -> anyhow::Result<Vec<ResponseRecord>> {
        let responses = self.responses.read().await;
        Ok(responses
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn fetch_questions(&self, ids: &HashSet<String>) -> anyhow::Result<Vec<Question>> {
        let questions = self.questions.read().await;
        Ok(questions
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
        if n == 0 {
            return Ok(Vec::new());
        }
        let questions = self.questions.read().await;
        let candidates: Vec<&Question> = questions
            .iter()
            .filter(|q| filter.matches(q) && !exclude.contains(&q.question_id))
            .collect();
        let sampled = self.sample(candidates, n);
        tracing::debug!(?filter, requested = n, returned = sampled.len(), "sampled questions");
        Ok(sampled)
    }

    async fn find_questions(
        &self,
        filter: &QuestionFilter,
        limit: usize,
    ) -> anyhow::Result<Vec<PublicQuestion>> {
        let questions = self.questions.read().await;
        Ok(questions
            .iter()
            .filter(|q| filter.matches(q))
            .take(limit)
            .map(Question::to_public)
            .collect())
    }

    async fn insert_responses(&self, responses: Vec<ResponseRecord>) -> anyhow::Result<()> {
        self.responses.write().await.extend(responses);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adaptiq_core::model::Difficulty;
    use chrono::Utc;

    fn bank(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question {
                question_id: format!("q{i}"),
                title: format!("Question {i}"),
                options: vec!["A".into(), "B".into()],
                correct_option: "A".into(),
                concept: "Arrays".into(),
                sub_concept: if i % 2 == 0 { "Kadane" } else { "Prefix Sum" }.into(),
                difficulty: Difficulty::ALL[i % 3],
                expected_time: 60,
            })
            .collect()
    }

    fn response(user: &str, question_id: &str) -> ResponseRecord {
        ResponseRecord {
            user_id: user.into(),
            question_id: question_id.into(),
            is_correct: true,
            time_taken: 20,
            attempts: 1,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn sample_respects_filter_exclusion_and_size() {
        let store = InMemoryStore::new(bank(30)).unwrap().with_seed(1);
        let exclude: HashSet<String> = ["q0".to_string(), "q6".to_string()].into();
        let filter = QuestionFilter::band("Kadane", Difficulty::Easy);

        // Kadane easy: q0, q6, q12, q18, q24 → 3 after exclusion
        let sampled = store.sample_questions(10, &filter, &exclude).await.unwrap();
        assert_eq!(sampled.len(), 3);
        assert!(sampled.iter().all(|q| q.sub_concept == "Kadane"));
        assert!(sampled.iter().all(|q| q.difficulty == Difficulty::Easy));
        assert!(sampled.iter().all(|q| !exclude.contains(&q.question_id)));

        let some = store
            .sample_questions(4, &QuestionFilter::any(), &HashSet::new())
            .await
            .unwrap();
        assert_eq!(some.len(), 4);
        let ids: HashSet<_> = some.iter().map(|q| q.question_id.clone()).collect();
        assert_eq!(ids.len(), 4);
    }

    #[tokio::test]
    async fn seeded_sampling_is_reproducible() {
        let a = InMemoryStore::new(bank(30)).unwrap().with_seed(99);
        let b = InMemoryStore::new(bank(30)).unwrap().with_seed(99);
        let none = HashSet::new();
        let qa = a.sample_questions(5, &QuestionFilter::any(), &none).await.unwrap();
        let qb = b.sample_questions(5, &QuestionFilter::any(), &none).await.unwrap();
        assert_eq!(qa, qb);
    }

    #[tokio::test]
    async fn find_keeps_storage_order() {
        let store = InMemoryStore::new(bank(12)).unwrap();
        let found = store
            .find_questions(&QuestionFilter::sub_concept("Prefix Sum"), 3)
            .await
            .unwrap();
        let ids: Vec<&str> = found.iter().map(|q| q.question_id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q3", "q5"]);
    }

    #[tokio::test]
    async fn responses_are_per_user_and_append_only() {
        let store = InMemoryStore::new(bank(4)).unwrap();
        store
            .insert_responses(vec![response("u1", "q0"), response("u2", "q1")])
            .await
            .unwrap();
        store
            .insert_responses(vec![response("u1", "q2")])
            .await
            .unwrap();

        let u1 = store.fetch_responses("u1").await.unwrap();
        assert_eq!(u1.len(), 2);
        assert_eq!(u1[1].question_id, "q2");
        assert_eq!(store.response_count().await, 3);
    }

    #[tokio::test]
    async fn fetch_questions_skips_unknown_ids() {
        let store = InMemoryStore::new(bank(4)).unwrap();
        let ids: HashSet<String> = ["q1".to_string(), "missing".to_string()].into();
        let found = store.fetch_questions(&ids).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].correct_option, "A");
    }

    #[test]
    fn invalid_bank_is_rejected() {
        let mut questions = bank(2);
        questions[1].question_id = "q0".into();
        assert!(matches!(
            InMemoryStore::new(questions),
            Err(StoreError::DuplicateQuestion(_))
        ));
    }
}
