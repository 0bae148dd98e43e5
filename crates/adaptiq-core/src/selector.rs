//! Adaptive quiz composition.
//!
//! Slots are shared out across the user's weak sub-topics in proportion to
//! their weakness (100 − mastery), each sub-topic's slots are split into
//! easy/medium/hard by its mastery band, and the store is sampled band by
//! band. Shortfalls are topped up first within the sub-topic, then from the
//! whole pool. Without usable history the quiz is a uniform random sample.

use std::collections::HashSet;

use anyhow::Result;
use tracing::{debug, warn};

use crate::aggregate::weak_areas;
use crate::config::{EngineConfig, MasteryThresholds};
use crate::mastery::compute_mastery_map;
use crate::model::{Difficulty, PublicQuestion, WeaknessEntry};
use crate::traits::{QuestionFilter, QuestionStore};

/// Slots granted to one weak sub-topic.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotAllocation {
    pub sub_concept: String,
    pub mastery_score: f64,
    pub weakness_score: f64,
    pub slots: usize,
}

/// Share `total_slots` across weak sub-topics proportionally to weakness.
///
/// Every entry gets at least one slot. Rounding drift is repaired greedily,
/// taking from (or giving to) the weakest sub-topic first, for at most
/// `total_slots` steps. Returns an empty plan when there is nothing to
/// weight by.
pub fn allocate_slots(weak: &[WeaknessEntry], total_slots: usize) -> Vec<SlotAllocation> {
    let mut allocations: Vec<SlotAllocation> = weak
        .iter()
        .map(|w| SlotAllocation {
            sub_concept: w.sub_concept.clone(),
            mastery_score: w.mastery_score,
            weakness_score: 100.0 - w.mastery_score,
            slots: 0,
        })
        .collect();

    let total_weakness: f64 = allocations.iter().map(|a| a.weakness_score).sum();
    if allocations.is_empty() || total_weakness <= 0.0 {
        return Vec::new();
    }

    for a in &mut allocations {
        let share = (a.weakness_score / total_weakness) * total_slots as f64;
        a.slots = (share.round_ties_even().max(0.0) as usize).max(1);
    }

    // Weakest first; the stable sort keeps ranking order among equals.
    let mut by_weakness: Vec<usize> = (0..allocations.len()).collect();
    by_weakness.sort_by(|&a, &b| {
        allocations[b]
            .weakness_score
            .total_cmp(&allocations[a].weakness_score)
    });

    let mut allocated: usize = allocations.iter().map(|a| a.slots).sum();
    for _ in 0..total_slots {
        if allocated > total_slots {
            let Some(&i) = by_weakness.iter().find(|&&i| allocations[i].slots > 1) else {
                break;
            };
            allocations[i].slots -= 1;
            allocated -= 1;
        } else if allocated < total_slots {
            allocations[by_weakness[0]].slots += 1;
            allocated += 1;
        } else {
            break;
        }
    }

    if allocated != total_slots {
        warn!(allocated, total_slots, "slot allocation could not be balanced");
    }
    allocations
}

/// Easy/medium/hard question counts for one sub-topic.
///
/// `hard` is the remainder after rounding the other two, so it can come out
/// negative; [`DifficultyMix::count`] reads that as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyMix {
    pub easy: i64,
    pub medium: i64,
    pub hard: i64,
}

impl DifficultyMix {
    /// Split `slots` by the ratio table of the mastery band.
    pub fn for_mastery(slots: usize, mastery_score: f64, thresholds: &MasteryThresholds) -> Self {
        let (easy_ratio, medium_ratio) = if mastery_score < thresholds.critical {
            (0.6, 0.3)
        } else if mastery_score < thresholds.moderate {
            (0.4, 0.4)
        } else {
            (0.2, 0.5)
        };

        let n = slots as f64;
        let easy = (n * easy_ratio).round_ties_even() as i64;
        let medium = (n * medium_ratio).round_ties_even() as i64;
        Self {
            easy,
            medium,
            hard: slots as i64 - easy - medium,
        }
    }

    /// Questions to request for a band; non-positive counts request none.
    pub fn count(&self, difficulty: Difficulty) -> usize {
        let raw = match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        };
        usize::try_from(raw).unwrap_or(0)
    }
}

/// Questions collected so far, in order, without duplicates.
#[derive(Debug, Default)]
struct Selection {
    questions: Vec<PublicQuestion>,
    ids: HashSet<String>,
}

impl Selection {
    fn add_unique(&mut self, items: Vec<PublicQuestion>) -> usize {
        let mut added = 0;
        for item in items {
            if item.question_id.is_empty() || self.ids.contains(&item.question_id) {
                continue;
            }
            self.ids.insert(item.question_id.clone());
            self.questions.push(item);
            added += 1;
        }
        added
    }

    fn len(&self) -> usize {
        self.questions.len()
    }
}

/// Pick a quiz for `user_id`, or a random one when there is no user or no
/// weakness to target.
pub async fn select_questions(
    store: &dyn QuestionStore,
    config: &EngineConfig,
    user_id: Option<&str>,
) -> Result<Vec<PublicQuestion>> {
    let size = config.quiz_size;

    let Some(user_id) = user_id.filter(|u| !u.is_empty()) else {
        return random_quiz(store, size).await;
    };

    let responses = store.fetch_responses(user_id).await?;
    if responses.is_empty() {
        debug!(user_id, "no history, serving random quiz");
        return random_quiz(store, size).await;
    }

    let ids: HashSet<String> = responses
        .iter()
        .filter(|r| !r.question_id.is_empty())
        .map(|r| r.question_id.clone())
        .collect();
    if ids.is_empty() {
        return random_quiz(store, size).await;
    }

    let questions = store.fetch_questions(&ids).await?;
    let results = compute_mastery_map(&responses, &questions, config);
    let weak = weak_areas(&results, &config.thresholds, config.weak_area_limit);
    if weak.is_empty() {
        debug!(user_id, "no weak areas, serving random quiz");
        return random_quiz(store, size).await;
    }

    let allocations = allocate_slots(&weak, size);
    if allocations.is_empty() {
        return random_quiz(store, size).await;
    }

    compose_quiz(store, config, &allocations).await
}

/// Sample questions for an allocation plan, then top up from the whole pool.
pub async fn compose_quiz(
    store: &dyn QuestionStore,
    config: &EngineConfig,
    allocations: &[SlotAllocation],
) -> Result<Vec<PublicQuestion>> {
    let size = config.quiz_size;
    let mut selection = Selection::default();

    for allocation in allocations {
        let mix = DifficultyMix::for_mastery(
            allocation.slots,
            allocation.mastery_score,
            &config.thresholds,
        );
        debug!(
            sub_concept = %allocation.sub_concept,
            slots = allocation.slots,
            easy = mix.easy,
            medium = mix.medium,
            hard = mix.hard,
            "allocating sub-concept"
        );

        let mut added = 0;
        for difficulty in Difficulty::ALL {
            let count = mix.count(difficulty);
            if count == 0 {
                continue;
            }
            let filter = QuestionFilter::band(&allocation.sub_concept, difficulty);
            let sampled = store
                .sample_questions(count, &filter, &selection.ids)
                .await?;
            added += selection.add_unique(sampled);
        }

        let remaining = allocation.slots.saturating_sub(added);
        if remaining > 0 {
            let filter = QuestionFilter::sub_concept(&allocation.sub_concept);
            let sampled = store
                .sample_questions(remaining, &filter, &selection.ids)
                .await?;
            selection.add_unique(sampled);
        }
    }

    if selection.len() < size {
        let sampled = store
            .sample_questions(size - selection.len(), &QuestionFilter::any(), &selection.ids)
            .await?;
        selection.add_unique(sampled);
    }

    if selection.len() < size {
        warn!(
            selected = selection.len(),
            size, "question pool too small for a full quiz"
        );
    }

    let mut questions = selection.questions;
    questions.truncate(size);
    Ok(questions)
}

async fn random_quiz(store: &dyn QuestionStore, size: usize) -> Result<Vec<PublicQuestion>> {
    let mut selection = Selection::default();
    let sampled = store
        .sample_questions(size, &QuestionFilter::any(), &HashSet::new())
        .await?;
    selection.add_unique(sampled);
    let mut questions = selection.questions;
    questions.truncate(size);
    Ok(questions)
}
