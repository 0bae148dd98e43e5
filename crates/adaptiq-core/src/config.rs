//! Engine configuration: taxonomy, scoring weights, band thresholds, and
//! quiz sizing.
//!
//! Every field defaults to the stock values, so an empty TOML document is a
//! valid configuration. Call [`EngineConfig::validate`] after loading.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::MasteryBand;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// One topic and its ordered sub-topics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptSpec {
    pub name: String,
    pub sub_concepts: Vec<String>,
}

impl ConceptSpec {
    fn new(name: &str, sub_concepts: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            sub_concepts: sub_concepts.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Ordered topic → sub-topic mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Taxonomy(pub Vec<ConceptSpec>);

impl Taxonomy {
    pub fn concepts(&self) -> impl Iterator<Item = &ConceptSpec> {
        self.0.iter()
    }

    /// Every (topic, sub-topic) pair in declaration order. A sub-topic shared
    /// by two topics appears once per topic.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().flat_map(|c| {
            c.sub_concepts
                .iter()
                .map(move |s| (c.name.as_str(), s.as_str()))
        })
    }

    pub fn contains(&self, concept: &str, sub_concept: &str) -> bool {
        self.pairs().any(|(c, s)| c == concept && s == sub_concept)
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self(vec![
            ConceptSpec::new(
                "Arrays",
                &["Prefix Sum", "Sliding Window", "Two Pointers", "Kadane"],
            ),
            ConceptSpec::new("Recursion", &["Base Case", "Tree Recursion"]),
            ConceptSpec::new("Trees", &["DFS", "BFS", "BST Logic"]),
            ConceptSpec::new("DP", &["Knapsack", "Memoization"]),
            ConceptSpec::new("Graphs", &["DFS", "BFS"]),
        ])
    }
}

/// Weights of the four mastery sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub accuracy: f64,
    pub difficulty: f64,
    pub time: f64,
    pub consistency: f64,
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.accuracy + self.difficulty + self.time + self.consistency
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            accuracy: 0.4,
            difficulty: 0.3,
            time: 0.2,
            consistency: 0.1,
        }
    }
}

/// Upper bounds (exclusive) of the Critical, Weak, and Moderate bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasteryThresholds {
    pub critical: f64,
    pub weak: f64,
    pub moderate: f64,
}

impl MasteryThresholds {
    /// Band of a mastery score.
    pub fn classify(&self, mastery_score: f64) -> MasteryBand {
        if mastery_score < self.critical {
            MasteryBand::Critical
        } else if mastery_score < self.weak {
            MasteryBand::Weak
        } else if mastery_score < self.moderate {
            MasteryBand::Moderate
        } else {
            MasteryBand::Strong
        }
    }
}

impl Default for MasteryThresholds {
    fn default() -> Self {
        Self {
            critical: 40.0,
            weak: 60.0,
            moderate: 80.0,
        }
    }
}

/// How many practice items a recommendation carries per difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationLimits {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

impl Default for RecommendationLimits {
    fn default() -> Self {
        Self {
            easy: 5,
            medium: 3,
            hard: 1,
        }
    }
}

/// Immutable configuration shared by every engine component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub taxonomy: Taxonomy,
    #[serde(default)]
    pub weights: ScoringWeights,
    #[serde(default)]
    pub thresholds: MasteryThresholds,
    /// Attempts needed before a sub-topic gets a score.
    #[serde(default = "default_min_attempts")]
    pub min_attempts: usize,
    /// Questions per quiz.
    #[serde(default = "default_quiz_size")]
    pub quiz_size: usize,
    /// How many weak areas are ranked and acted on.
    #[serde(default = "default_weak_area_limit")]
    pub weak_area_limit: usize,
    #[serde(default)]
    pub recommendations: RecommendationLimits,
}

fn default_min_attempts() -> usize {
    3
}
fn default_quiz_size() -> usize {
    10
}
fn default_weak_area_limit() -> usize {
    3
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            taxonomy: Taxonomy::default(),
            weights: ScoringWeights::default(),
            thresholds: MasteryThresholds::default(),
            min_attempts: default_min_attempts(),
            quiz_size: default_quiz_size(),
            weak_area_limit: default_weak_area_limit(),
            recommendations: RecommendationLimits::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document (useful for testing).
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse engine config TOML")
    }

    /// Check the invariants the scoring and selection code relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.weights;
        for (name, value) in [
            ("accuracy", w.accuracy),
            ("difficulty", w.difficulty),
            ("time", w.time),
            ("consistency", w.consistency),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeWeight { name, value });
            }
        }
        let sum = w.sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ConfigError::WeightsNotNormalized { sum });
        }

        let t = &self.thresholds;
        if !(0.0 < t.critical && t.critical < t.weak && t.weak < t.moderate && t.moderate <= 100.0)
        {
            return Err(ConfigError::InvalidThresholds {
                critical: t.critical,
                weak: t.weak,
                moderate: t.moderate,
            });
        }

        if self.min_attempts == 0 {
            return Err(ConfigError::ZeroCount("min_attempts"));
        }
        if self.quiz_size == 0 {
            return Err(ConfigError::ZeroCount("quiz_size"));
        }
        if self.weak_area_limit == 0 {
            return Err(ConfigError::ZeroCount("weak_area_limit"));
        }

        if self.taxonomy.0.is_empty() {
            return Err(ConfigError::EmptyTaxonomy);
        }
        if let Some(c) = self.taxonomy.0.iter().find(|c| c.sub_concepts.is_empty()) {
            return Err(ConfigError::EmptyConcept(c.name.clone()));
        }

        Ok(())
    }
}
