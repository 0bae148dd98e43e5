//! Practice recommendations for weak sub-topics.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::RecommendationLimits;
use crate::model::{Difficulty, MasteryBand, PublicQuestion, WeaknessEntry};
use crate::traits::{QuestionFilter, QuestionStore};

/// Practice items for one sub-topic, grouped by difficulty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeSet {
    pub easy: Vec<PublicQuestion>,
    pub medium: Vec<PublicQuestion>,
    pub hard: Vec<PublicQuestion>,
}

impl PracticeSet {
    pub fn len(&self) -> usize {
        self.easy.len() + self.medium.len() + self.hard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Remediation content for a weak sub-topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub sub_concept: String,
    pub classification: MasteryBand,
    pub practice_questions: PracticeSet,
}

/// Fetch practice items for every Critical, Weak, or Moderate entry with a
/// sub-topic name. Read-only.
pub async fn generate_recommendations(
    store: &dyn QuestionStore,
    weak_areas: &[WeaknessEntry],
    limits: &RecommendationLimits,
) -> Result<Vec<Recommendation>> {
    let mut recommendations = Vec::new();

    for area in weak_areas {
        if area.status == MasteryBand::Strong || area.sub_concept.is_empty() {
            continue;
        }

        let sub = area.sub_concept.as_str();
        let practice_questions = PracticeSet {
            easy: fetch_band(store, sub, Difficulty::Easy, limits.easy).await?,
            medium: fetch_band(store, sub, Difficulty::Medium, limits.medium).await?,
            hard: fetch_band(store, sub, Difficulty::Hard, limits.hard).await?,
        };

        recommendations.push(Recommendation {
            sub_concept: area.sub_concept.clone(),
            classification: area.status,
            practice_questions,
        });
    }

    Ok(recommendations)
}

async fn fetch_band(
    store: &dyn QuestionStore,
    sub_concept: &str,
    difficulty: Difficulty,
    limit: usize,
) -> Result<Vec<PublicQuestion>> {
    if limit == 0 {
        return Ok(Vec::new());
    }
    store
        .find_questions(&QuestionFilter::band(sub_concept, difficulty), limit)
        .await
}
