//! Core data model types for adaptiq.
//!
//! Questions, recorded responses, and the derived mastery values that the
//! scoring, selection, and recommendation components pass between them.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Question difficulty band. Serialized as its integer level (1-3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All bands, easiest first.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Numeric level, also used as the weight in difficulty-weighted accuracy.
    pub fn level(self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Difficulty::Easy),
            2 => Ok(Difficulty::Medium),
            3 => Ok(Difficulty::Hard),
            other => Err(format!("difficulty must be 1, 2 or 3, got {other}")),
        }
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> u8 {
        d.level()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" | "1" => Ok(Difficulty::Easy),
            "medium" | "2" => Ok(Difficulty::Medium),
            "hard" | "3" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A stored question, including its answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier.
    pub question_id: String,
    /// Question text.
    pub title: String,
    /// Answer choices shown to the user.
    pub options: Vec<String>,
    /// The option that counts as correct.
    pub correct_option: String,
    /// Topic (e.g. "Arrays").
    pub concept: String,
    /// Sub-topic (e.g. "Kadane").
    pub sub_concept: String,
    /// Difficulty band.
    pub difficulty: Difficulty,
    /// Time a competent user should need, in seconds.
    pub expected_time: u32,
}

impl Question {
    /// The question as served for attempting, without its answer.
    pub fn to_public(&self) -> PublicQuestion {
        PublicQuestion {
            question_id: self.question_id.clone(),
            title: self.title.clone(),
            options: self.options.clone(),
            concept: self.concept.clone(),
            sub_concept: self.sub_concept.clone(),
            difficulty: self.difficulty,
            expected_time: self.expected_time,
        }
    }
}

/// A question with `correct_option` stripped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub question_id: String,
    pub title: String,
    pub options: Vec<String>,
    pub concept: String,
    pub sub_concept: String,
    pub difficulty: Difficulty,
    pub expected_time: u32,
}

/// One recorded answer. Never mutated after insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub user_id: String,
    pub question_id: String,
    pub is_correct: bool,
    /// Seconds spent on the question.
    pub time_taken: u32,
    /// Tries needed, at least 1.
    pub attempts: u32,
    pub timestamp: DateTime<Utc>,
}

/// A response joined with the scoring-relevant fields of its question.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedResponse {
    pub question_id: String,
    pub sub_concept: String,
    pub is_correct: bool,
    pub time_taken: u32,
    pub attempts: u32,
    pub difficulty: Difficulty,
    pub expected_time: u32,
}

impl EnrichedResponse {
    /// Join a response with its question.
    pub fn new(response: &ResponseRecord, question: &Question) -> Self {
        Self {
            question_id: response.question_id.clone(),
            sub_concept: question.sub_concept.clone(),
            is_correct: response.is_correct,
            time_taken: response.time_taken,
            attempts: response.attempts,
            difficulty: question.difficulty,
            expected_time: question.expected_time,
        }
    }
}

/// Score breakdown for a sub-topic with enough attempts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MasteryBreakdown {
    /// Blended score in [0, 100].
    pub mastery_score: f64,
    pub accuracy: f64,
    pub difficulty_weighted_accuracy: f64,
    pub time_score: f64,
    pub consistency_score: f64,
    pub total_attempts: usize,
}

/// Mastery of a single sub-topic.
///
/// On the wire an unscored sub-topic still carries `"mastery_score": null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "SubconceptMasteryWire", from = "SubconceptMasteryWire")]
pub enum SubconceptMastery {
    /// Fewer attempts than the configured minimum; no score is produced.
    InsufficientData { total_attempts: usize },
    Evaluated(MasteryBreakdown),
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "status")]
enum SubconceptMasteryWire {
    #[serde(rename = "Insufficient Data")]
    InsufficientData {
        mastery_score: Option<f64>,
        total_attempts: usize,
    },
    Evaluated(MasteryBreakdown),
}

impl From<SubconceptMastery> for SubconceptMasteryWire {
    fn from(value: SubconceptMastery) -> Self {
        match value {
            SubconceptMastery::InsufficientData { total_attempts } => {
                SubconceptMasteryWire::InsufficientData {
                    mastery_score: None,
                    total_attempts,
                }
            }
            SubconceptMastery::Evaluated(b) => SubconceptMasteryWire::Evaluated(b),
        }
    }
}

impl From<SubconceptMasteryWire> for SubconceptMastery {
    fn from(value: SubconceptMasteryWire) -> Self {
        match value {
            SubconceptMasteryWire::InsufficientData { total_attempts, .. } => {
                SubconceptMastery::InsufficientData { total_attempts }
            }
            SubconceptMasteryWire::Evaluated(b) => SubconceptMastery::Evaluated(b),
        }
    }
}

impl SubconceptMastery {
    pub fn mastery_score(&self) -> Option<f64> {
        match self {
            SubconceptMastery::Evaluated(b) => Some(b.mastery_score),
            SubconceptMastery::InsufficientData { .. } => None,
        }
    }

    pub fn total_attempts(&self) -> usize {
        match self {
            SubconceptMastery::Evaluated(b) => b.total_attempts,
            SubconceptMastery::InsufficientData { total_attempts } => *total_attempts,
        }
    }

    pub fn is_evaluated(&self) -> bool {
        matches!(self, SubconceptMastery::Evaluated(_))
    }
}

/// Sub-topic name → mastery, in the order each sub-topic first appears in
/// the response history. Weak-area ties keep this order.
pub type MasteryMap = IndexMap<String, SubconceptMastery>;

/// Topic name → rolled-up mastery, in taxonomy order.
pub type ConceptMasteryMap = IndexMap<String, ConceptStatus>;

/// Rolled-up mastery of one taxonomy topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ConceptStatus {
    #[serde(rename = "Not Attempted")]
    NotAttempted,
    Evaluated { mastery_score: f64 },
}

/// Weakness tier of an evaluated sub-topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MasteryBand {
    Critical,
    Weak,
    Moderate,
    Strong,
}

impl fmt::Display for MasteryBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MasteryBand::Critical => "Critical",
            MasteryBand::Weak => "Weak",
            MasteryBand::Moderate => "Moderate",
            MasteryBand::Strong => "Strong",
        };
        f.write_str(s)
    }
}

/// A sub-topic that is not yet Strong.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaknessEntry {
    pub sub_concept: String,
    pub mastery_score: f64,
    pub status: MasteryBand,
}
