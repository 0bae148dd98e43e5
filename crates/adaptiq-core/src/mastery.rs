//! Sub-topic mastery scoring.
//!
//! A mastery score blends four normalized sub-scores:
//!
//! - accuracy: share of correct responses
//! - difficulty-weighted accuracy: correct difficulty levels over attempted ones
//! - time score: 1.0 within the expected time, falling linearly to 0.0 at twice it
//! - consistency: inverse of the mean attempts per response, capped at 1.0
//!
//! The weighted sum is scaled to [0, 100].

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::config::EngineConfig;
use crate::model::{
    EnrichedResponse, MasteryBreakdown, MasteryMap, Question, ResponseRecord, SubconceptMastery,
};

/// Score one sub-topic's responses.
pub fn compute_subconcept_mastery(
    responses: &[EnrichedResponse],
    config: &EngineConfig,
) -> SubconceptMastery {
    let total_attempts = responses.len();
    if total_attempts < config.min_attempts || total_attempts == 0 {
        return SubconceptMastery::InsufficientData { total_attempts };
    }

    let correct_count = responses.iter().filter(|r| r.is_correct).count();
    let accuracy = correct_count as f64 / total_attempts as f64;

    let difficulty_attempted: u32 = responses
        .iter()
        .map(|r| u32::from(r.difficulty.level()))
        .sum();
    let difficulty_correct: u32 = responses
        .iter()
        .filter(|r| r.is_correct)
        .map(|r| u32::from(r.difficulty.level()))
        .sum();
    let difficulty_weighted_accuracy = if difficulty_attempted == 0 {
        0.0
    } else {
        difficulty_correct as f64 / difficulty_attempted as f64
    };

    let time_score = average_time_score(responses);
    let consistency_score = consistency_score(responses);

    let w = &config.weights;
    let blended = w.accuracy * accuracy
        + w.difficulty * difficulty_weighted_accuracy
        + w.time * time_score
        + w.consistency * consistency_score;
    // Dividing by the float sum of the weights keeps perfect input at exactly 100.
    let weight_sum = w.sum();
    let normalized = if weight_sum > 0.0 {
        blended / weight_sum
    } else {
        0.0
    };
    let mastery_score = (normalized * 100.0).clamp(0.0, 100.0);

    SubconceptMastery::Evaluated(MasteryBreakdown {
        mastery_score,
        accuracy,
        difficulty_weighted_accuracy,
        time_score,
        consistency_score,
        total_attempts,
    })
}

/// Time score of a single response, or `None` when the question has no
/// usable expected time.
pub fn time_score(time_taken: u32, expected_time: u32) -> Option<f64> {
    if expected_time == 0 {
        return None;
    }
    let ratio = f64::from(time_taken) / f64::from(expected_time);
    let score = if ratio <= 1.0 {
        1.0
    } else if ratio <= 2.0 {
        1.0 - (ratio - 1.0)
    } else {
        0.0
    };
    Some(score)
}

fn average_time_score(responses: &[EnrichedResponse]) -> f64 {
    let scores: Vec<f64> = responses
        .iter()
        .filter_map(|r| time_score(r.time_taken, r.expected_time))
        .collect();
    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

fn consistency_score(responses: &[EnrichedResponse]) -> f64 {
    if responses.is_empty() {
        return 0.0;
    }
    let total: u64 = responses.iter().map(|r| u64::from(r.attempts)).sum();
    let avg_attempts = total as f64 / responses.len() as f64;
    if avg_attempts == 0.0 {
        0.0
    } else {
        (1.0 / avg_attempts).min(1.0)
    }
}

/// Join responses with their questions. Responses whose question is unknown
/// are dropped.
pub fn enrich_responses(
    responses: &[ResponseRecord],
    questions: &[Question],
) -> Vec<EnrichedResponse> {
    let by_id: HashMap<&str, &Question> = questions
        .iter()
        .map(|q| (q.question_id.as_str(), q))
        .collect();

    responses
        .iter()
        .filter_map(|r| {
            by_id
                .get(r.question_id.as_str())
                .map(|q| EnrichedResponse::new(r, q))
        })
        .collect()
}

/// Bucket enriched responses by sub-topic, skipping empty sub-topic names.
/// Buckets are ordered by first appearance and keep response order.
pub fn group_by_sub_concept(
    enriched: Vec<EnrichedResponse>,
) -> IndexMap<String, Vec<EnrichedResponse>> {
    let mut grouped: IndexMap<String, Vec<EnrichedResponse>> = IndexMap::new();
    for item in enriched {
        if item.sub_concept.is_empty() {
            continue;
        }
        grouped.entry(item.sub_concept.clone()).or_default().push(item);
    }
    grouped
}

/// Join, group, and score every sub-topic the user has answered.
pub fn compute_mastery_map(
    responses: &[ResponseRecord],
    questions: &[Question],
    config: &EngineConfig,
) -> MasteryMap {
    let enriched = enrich_responses(responses, questions);
    group_by_sub_concept(enriched)
        .into_iter()
        .map(|(sub_concept, items)| {
            let mastery = compute_subconcept_mastery(&items, config);
            (sub_concept, mastery)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;
    use chrono::Utc;

    fn enriched(
        is_correct: bool,
        difficulty: Difficulty,
        time_taken: u32,
        expected_time: u32,
        attempts: u32,
    ) -> EnrichedResponse {
        EnrichedResponse {
            question_id: "q".into(),
            sub_concept: "Kadane".into(),
            is_correct,
            time_taken,
            attempts,
            difficulty,
            expected_time,
        }
    }

    fn breakdown(m: SubconceptMastery) -> MasteryBreakdown {
        match m {
            SubconceptMastery::Evaluated(b) => b,
            other => panic!("expected Evaluated, got {other:?}"),
        }
    }

    #[test]
    fn fewer_than_three_is_insufficient() {
        let config = EngineConfig::default();
        for n in 0..3 {
            let responses: Vec<_> = (0..n)
                .map(|_| enriched(true, Difficulty::Easy, 10, 60, 1))
                .collect();
            let result = compute_subconcept_mastery(&responses, &config);
            assert_eq!(
                result,
                SubconceptMastery::InsufficientData { total_attempts: n }
            );
            assert!(result.mastery_score().is_none());
        }
    }

    #[test]
    fn perfect_responses_score_exactly_100() {
        let config = EngineConfig::default();
        let responses = vec![
            enriched(true, Difficulty::Easy, 30, 60, 1),
            enriched(true, Difficulty::Medium, 60, 60, 1),
            enriched(true, Difficulty::Hard, 45, 90, 1),
        ];
        let b = breakdown(compute_subconcept_mastery(&responses, &config));
        assert_eq!(b.accuracy, 1.0);
        assert_eq!(b.difficulty_weighted_accuracy, 1.0);
        assert_eq!(b.time_score, 1.0);
        assert_eq!(b.consistency_score, 1.0);
        assert_eq!(b.mastery_score, 100.0);
        assert_eq!(b.total_attempts, 3);
    }

    #[test]
    fn mixed_responses_blend_sub_scores() {
        let config = EngineConfig::default();
        // correct easy on time, wrong hard at 1.5x, correct medium at 3x with 2 attempts,
        // wrong easy on time with 1 attempt
        let responses = vec![
            enriched(true, Difficulty::Easy, 60, 60, 1),
            enriched(false, Difficulty::Hard, 90, 60, 1),
            enriched(true, Difficulty::Medium, 180, 60, 2),
            enriched(false, Difficulty::Easy, 30, 60, 1),
        ];
        let b = breakdown(compute_subconcept_mastery(&responses, &config));
        assert!((b.accuracy - 0.5).abs() < 1e-12);
        // (1 + 2) / (1 + 3 + 2 + 1)
        assert!((b.difficulty_weighted_accuracy - 3.0 / 7.0).abs() < 1e-12);
        // (1.0 + 0.5 + 0.0 + 1.0) / 4
        assert!((b.time_score - 0.625).abs() < 1e-12);
        // 1 / 1.25
        assert!((b.consistency_score - 0.8).abs() < 1e-12);
        let expected = 100.0 * (0.4 * 0.5 + 0.3 * (3.0 / 7.0) + 0.2 * 0.625 + 0.1 * 0.8);
        assert!((b.mastery_score - expected).abs() < 1e-9);
    }

    #[test]
    fn zero_expected_time_is_excluded_from_time_score() {
        let config = EngineConfig::default();
        let responses = vec![
            enriched(true, Difficulty::Easy, 500, 0, 1),
            enriched(true, Difficulty::Easy, 90, 60, 1),
            enriched(true, Difficulty::Easy, 500, 0, 1),
        ];
        let b = breakdown(compute_subconcept_mastery(&responses, &config));
        assert!((b.time_score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn no_usable_expected_time_gives_zero_time_score() {
        let config = EngineConfig::default();
        let responses: Vec<_> = (0..3)
            .map(|_| enriched(true, Difficulty::Medium, 10, 0, 1))
            .collect();
        let b = breakdown(compute_subconcept_mastery(&responses, &config));
        assert_eq!(b.time_score, 0.0);
        assert!((b.mastery_score - 80.0).abs() < 1e-9);
    }

    #[test]
    fn zero_attempts_gives_zero_consistency() {
        let config = EngineConfig::default();
        let responses: Vec<_> = (0..3)
            .map(|_| enriched(true, Difficulty::Easy, 10, 60, 0))
            .collect();
        let b = breakdown(compute_subconcept_mastery(&responses, &config));
        assert_eq!(b.consistency_score, 0.0);
    }

    #[test]
    fn time_score_curve() {
        assert_eq!(time_score(30, 60), Some(1.0));
        assert_eq!(time_score(60, 60), Some(1.0));
        assert_eq!(time_score(90, 60), Some(0.5));
        assert_eq!(time_score(120, 60), Some(0.0));
        assert_eq!(time_score(500, 60), Some(0.0));
        assert_eq!(time_score(10, 0), None);
    }

    #[test]
    fn mastery_score_stays_in_bounds() {
        let config = EngineConfig::default();
        let difficulties = Difficulty::ALL;
        for seed in 0u32..200 {
            let n = 3 + (seed % 7) as usize;
            let responses: Vec<_> = (0..n)
                .map(|i| {
                    let k = seed.wrapping_mul(31).wrapping_add(i as u32 * 17);
                    enriched(
                        k % 3 != 0,
                        difficulties[(k % 3) as usize],
                        k % 400,
                        k % 130,
                        1 + k % 4,
                    )
                })
                .collect();
            let score = compute_subconcept_mastery(&responses, &config)
                .mastery_score()
                .unwrap();
            assert!((0.0..=100.0).contains(&score), "out of bounds: {score}");
        }
    }

    fn question(id: &str, sub: &str, difficulty: Difficulty) -> Question {
        Question {
            question_id: id.into(),
            title: format!("Question {id}"),
            options: vec!["A".into(), "B".into()],
            correct_option: "A".into(),
            concept: "Arrays".into(),
            sub_concept: sub.into(),
            difficulty,
            expected_time: 60,
        }
    }

    fn response(question_id: &str, is_correct: bool) -> ResponseRecord {
        ResponseRecord {
            user_id: "u1".into(),
            question_id: question_id.into(),
            is_correct,
            time_taken: 30,
            attempts: 1,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn enrich_drops_unknown_questions() {
        let questions = vec![question("q1", "Kadane", Difficulty::Hard)];
        let responses = vec![response("q1", true), response("missing", false)];
        let enriched = enrich_responses(&responses, &questions);
        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].difficulty, Difficulty::Hard);
        assert_eq!(enriched[0].sub_concept, "Kadane");
    }

    #[test]
    fn grouping_skips_empty_sub_concepts() {
        let questions = vec![
            question("q1", "Kadane", Difficulty::Easy),
            question("q2", "", Difficulty::Easy),
            question("q3", "BFS", Difficulty::Easy),
        ];
        let responses = vec![
            response("q1", true),
            response("q2", true),
            response("q3", true),
            response("q1", false),
        ];
        let grouped = group_by_sub_concept(enrich_responses(&responses, &questions));
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["Kadane"].len(), 2);
        assert_eq!(grouped["BFS"].len(), 1);
    }

    #[test]
    fn mastery_map_follows_first_answered_order() {
        let config = EngineConfig::default();
        let subs = ["Two Pointers", "Sliding Window", "Prefix Sum", "Kadane"];
        let questions: Vec<Question> = subs
            .iter()
            .enumerate()
            .flat_map(|(s, sub)| {
                (0..3).map(move |i| question(&format!("q{s}-{i}"), sub, Difficulty::Easy))
            })
            .collect();
        let responses: Vec<ResponseRecord> = questions
            .iter()
            .map(|q| response(&q.question_id, false))
            .collect();

        let map = compute_mastery_map(&responses, &questions, &config);
        let order: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(order, subs.to_vec());

        // all four tie at 30; the first three answered are the weak areas
        let weak = crate::aggregate::weak_areas(&map, &config.thresholds, 3);
        let names: Vec<&str> = weak.iter().map(|w| w.sub_concept.as_str()).collect();
        assert_eq!(names, vec!["Two Pointers", "Sliding Window", "Prefix Sum"]);
        assert!(weak.iter().all(|w| (w.mastery_score - 30.0).abs() < 1e-9));
    }

    #[test]
    fn mastery_map_scores_each_sub_concept() {
        let config = EngineConfig::default();
        let questions = vec![
            question("q1", "Kadane", Difficulty::Easy),
            question("q2", "BFS", Difficulty::Easy),
        ];
        let mut responses: Vec<_> = (0..3).map(|_| response("q1", true)).collect();
        responses.push(response("q2", false));

        let map = compute_mastery_map(&responses, &questions, &config);
        assert_eq!(map.len(), 2);
        assert!(map["Kadane"].is_evaluated());
        assert_eq!(
            map["BFS"],
            SubconceptMastery::InsufficientData { total_attempts: 1 }
        );
    }
}
