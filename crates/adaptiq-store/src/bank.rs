//! Question bank seeding, validation, and auditing.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use adaptiq_core::config::Taxonomy;
use adaptiq_core::model::{Difficulty, Question};

use crate::error::StoreError;

/// Default number of questions generated by seeding.
pub const DEFAULT_SEED_QUESTIONS: usize = 120;

const SEED_OPTIONS: [&str; 4] = ["Option A", "Option B", "Option C", "Option D"];

/// (topic, sub-topic) pairs repeated so `total` questions spread evenly over
/// the taxonomy, the first `total % pairs` pairs getting one extra, shuffled.
fn subconcept_plan<R: Rng>(
    taxonomy: &Taxonomy,
    total: usize,
    rng: &mut R,
) -> Vec<(String, String)> {
    let pairs: Vec<(&str, &str)> = taxonomy.pairs().collect();
    if pairs.is_empty() {
        return Vec::new();
    }

    let base = total / pairs.len();
    let remainder = total % pairs.len();

    let mut plan = Vec::with_capacity(total);
    for (index, (concept, sub_concept)) in pairs.iter().enumerate() {
        let count = base + usize::from(index < remainder);
        for _ in 0..count {
            plan.push((concept.to_string(), sub_concept.to_string()));
        }
    }
    plan.shuffle(rng);
    plan
}

/// Generate `total` placeholder questions covering the taxonomy.
pub fn generate_question_bank<R: Rng>(
    taxonomy: &Taxonomy,
    total: usize,
    rng: &mut R,
) -> Vec<Question> {
    subconcept_plan(taxonomy, total, rng)
        .into_iter()
        .enumerate()
        .map(|(index, (concept, sub_concept))| {
            let options: Vec<String> = SEED_OPTIONS.iter().map(|o| o.to_string()).collect();
            let correct_option = options[rng.gen_range(0..options.len())].clone();
            let difficulty = Difficulty::ALL[rng.gen_range(0..Difficulty::ALL.len())];
            Question {
                question_id: Uuid::new_v4().to_string(),
                title: format!("Practice question {} for {}", index + 1, sub_concept),
                options,
                correct_option,
                concept,
                sub_concept,
                difficulty,
                expected_time: rng.gen_range(45..=120),
            }
        })
        .collect()
}

/// Reject banks the engine cannot grade: duplicate ids, questions without
/// options, or a correct option that is not offered.
pub fn validate_question_bank(questions: &[Question]) -> Result<(), StoreError> {
    let mut seen = HashSet::new();
    for q in questions {
        if q.question_id.is_empty() {
            return Err(StoreError::invalid("<empty>", "question id is empty"));
        }
        if !seen.insert(q.question_id.as_str()) {
            return Err(StoreError::DuplicateQuestion(q.question_id.clone()));
        }
        if q.options.is_empty() {
            return Err(StoreError::invalid(&q.question_id, "no options"));
        }
        if !q.options.contains(&q.correct_option) {
            return Err(StoreError::invalid(
                &q.question_id,
                format!("correct option '{}' is not among the options", q.correct_option),
            ));
        }
    }
    Ok(())
}

/// A non-fatal issue found in a question bank.
#[derive(Debug, Clone, PartialEq)]
pub struct BankWarning {
    pub question_id: String,
    pub message: String,
}

/// Questions that load fine but score or roll up poorly.
pub fn audit_question_bank(questions: &[Question], taxonomy: &Taxonomy) -> Vec<BankWarning> {
    let mut warnings = Vec::new();

    for q in questions {
        if !taxonomy.contains(&q.concept, &q.sub_concept) {
            warnings.push(BankWarning {
                question_id: q.question_id.clone(),
                message: format!(
                    "'{} / {}' is not in the taxonomy and will not count towards concept mastery",
                    q.concept, q.sub_concept
                ),
            });
        }
        if q.expected_time == 0 {
            warnings.push(BankWarning {
                question_id: q.question_id.clone(),
                message: "expected_time is 0; excluded from time scoring".into(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn seeding_spreads_evenly_over_taxonomy() {
        let taxonomy = Taxonomy::default();
        let mut rng = StdRng::seed_from_u64(7);
        let bank = generate_question_bank(&taxonomy, 120, &mut rng);
        assert_eq!(bank.len(), 120);

        let mut per_pair: HashMap<(String, String), usize> = HashMap::new();
        for q in &bank {
            *per_pair
                .entry((q.concept.clone(), q.sub_concept.clone()))
                .or_default() += 1;
        }
        // 13 pairs: 120 = 9 * 13 + 3
        assert_eq!(per_pair.len(), 13);
        assert_eq!(per_pair[&("Arrays".to_string(), "Prefix Sum".to_string())], 10);
        assert_eq!(per_pair[&("Arrays".to_string(), "Two Pointers".to_string())], 10);
        assert_eq!(per_pair[&("Arrays".to_string(), "Kadane".to_string())], 9);
        assert_eq!(per_pair[&("Graphs".to_string(), "BFS".to_string())], 9);
    }

    #[test]
    fn seeded_questions_are_valid() {
        let taxonomy = Taxonomy::default();
        let mut rng = StdRng::seed_from_u64(42);
        let bank = generate_question_bank(&taxonomy, 40, &mut rng);
        assert!(validate_question_bank(&bank).is_ok());
        assert!(audit_question_bank(&bank, &taxonomy).is_empty());
        assert!(bank
            .iter()
            .all(|q| (45..=120).contains(&q.expected_time) && q.options.len() == 4));
        assert!(bank[0].title.starts_with("Practice question 1 for "));
    }

    fn question(id: &str) -> Question {
        Question {
            question_id: id.into(),
            title: "t".into(),
            options: vec!["A".into(), "B".into()],
            correct_option: "A".into(),
            concept: "Arrays".into(),
            sub_concept: "Kadane".into(),
            difficulty: Difficulty::Easy,
            expected_time: 60,
        }
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err = validate_question_bank(&[question("q1"), question("q1")]).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateQuestion(id) if id == "q1"));
    }

    #[test]
    fn correct_option_must_be_offered() {
        let mut q = question("q1");
        q.correct_option = "Z".into();
        let err = validate_question_bank(&[q]).unwrap_err();
        assert!(err.to_string().contains("not among the options"));
    }

    #[test]
    fn audit_flags_unknown_sub_concepts_and_zero_time() {
        let mut stray = question("q2");
        stray.sub_concept = "Tries".into();
        let mut untimed = question("q3");
        untimed.expected_time = 0;

        let warnings =
            audit_question_bank(&[question("q1"), stray, untimed], &Taxonomy::default());
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].question_id, "q2");
        assert!(warnings[1].message.contains("expected_time"));
    }
}
