//! adaptiq-core: Mastery scoring, adaptive selection, and recommendations.
//!
//! This crate defines the data model, the storage trait, and the pure scoring
//! pipeline that the rest of adaptiq builds on.

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod mastery;
pub mod model;
pub mod recommend;
pub mod report;
pub mod selector;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use config::EngineConfig;
pub use engine::{QuizEngine, Submission, SubmissionItem, SubmissionSummary};
pub use error::ConfigError;
pub use traits::{QuestionFilter, QuestionStore};
