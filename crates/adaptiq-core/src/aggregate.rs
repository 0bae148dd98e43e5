//! Roll sub-topic mastery up to topics and overall, and rank weak areas.

use crate::config::{MasteryThresholds, Taxonomy};
use crate::model::{
    ConceptMasteryMap, ConceptStatus, MasteryBand, MasteryMap, SubconceptMastery, WeaknessEntry,
};

/// Unweighted mean of each taxonomy topic's evaluated sub-topics, keyed by
/// topic in taxonomy order.
pub fn concept_mastery(results: &MasteryMap, taxonomy: &Taxonomy) -> ConceptMasteryMap {
    taxonomy
        .concepts()
        .map(|concept| {
            let scores: Vec<f64> = concept
                .sub_concepts
                .iter()
                .filter_map(|sub| results.get(sub))
                .filter_map(SubconceptMastery::mastery_score)
                .collect();

            let status = if scores.is_empty() {
                ConceptStatus::NotAttempted
            } else {
                ConceptStatus::Evaluated {
                    mastery_score: scores.iter().sum::<f64>() / scores.len() as f64,
                }
            };

            (concept.name.clone(), status)
        })
        .collect()
}

/// Attempt-weighted mean over evaluated sub-topics; 0.0 when none are
/// evaluated.
pub fn overall_mastery(results: &MasteryMap) -> f64 {
    let mut weighted_sum = 0.0;
    let mut total_attempts = 0usize;

    for result in results.values() {
        let SubconceptMastery::Evaluated(b) = result else {
            continue;
        };
        if b.total_attempts == 0 {
            continue;
        }
        weighted_sum += b.mastery_score * b.total_attempts as f64;
        total_attempts += b.total_attempts;
    }

    if total_attempts == 0 {
        return 0.0;
    }
    weighted_sum / total_attempts as f64
}

/// The `top_n` weakest non-Strong sub-topics, weakest first. Equal scores
/// keep map order, i.e. the order the sub-topics were first answered.
pub fn weak_areas(
    results: &MasteryMap,
    thresholds: &MasteryThresholds,
    top_n: usize,
) -> Vec<WeaknessEntry> {
    let mut entries: Vec<WeaknessEntry> = results
        .iter()
        .filter_map(|(sub_concept, result)| {
            let mastery_score = result.mastery_score()?;
            let status = thresholds.classify(mastery_score);
            if status == MasteryBand::Strong {
                return None;
            }
            Some(WeaknessEntry {
                sub_concept: sub_concept.clone(),
                mastery_score,
                status,
            })
        })
        .collect();

    entries.sort_by(|a, b| a.mastery_score.total_cmp(&b.mastery_score));
    entries.truncate(top_n);
    entries
}
