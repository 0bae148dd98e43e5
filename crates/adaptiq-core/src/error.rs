//! Engine configuration errors.
//!
//! Returned by [`EngineConfig::validate`](crate::config::EngineConfig::validate)
//! so callers can report exactly which setting is invalid.

use thiserror::Error;

/// A configuration value that would break a scoring or selection invariant.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The four scoring weights must add up to 1.0.
    #[error("scoring weights must sum to 1.0, got {sum}")]
    WeightsNotNormalized { sum: f64 },

    /// A scoring weight below zero.
    #[error("scoring weight '{name}' must not be negative, got {value}")]
    NegativeWeight { name: &'static str, value: f64 },

    /// Band thresholds must satisfy 0 < critical < weak < moderate <= 100.
    #[error("mastery thresholds must ascend within (0, 100], got {critical}/{weak}/{moderate}")]
    InvalidThresholds {
        critical: f64,
        weak: f64,
        moderate: f64,
    },

    /// A count setting that has to be at least one.
    #[error("'{0}' must be at least 1")]
    ZeroCount(&'static str),

    /// No topics configured.
    #[error("taxonomy must define at least one concept")]
    EmptyTaxonomy,

    /// A topic without sub-topics.
    #[error("concept '{0}' has no sub-concepts")]
    EmptyConcept(String),
}
