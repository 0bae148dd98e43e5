//! Store error types.

use thiserror::Error;

/// Errors raised while loading or validating a question bank.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Two questions share an id.
    #[error("duplicate question id: {0}")]
    DuplicateQuestion(String),

    /// A question that cannot be answered as stored.
    #[error("invalid question {question_id}: {reason}")]
    InvalidQuestion { question_id: String, reason: String },

    /// The data file already exists and overwriting was not requested.
    #[error("data file already exists: {0}")]
    AlreadyExists(String),

    /// The data file is not a valid snapshot.
    #[error("failed to parse data file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn invalid(question_id: &str, reason: impl Into<String>) -> Self {
        StoreError::InvalidQuestion {
            question_id: question_id.to_string(),
            reason: reason.into(),
        }
    }
}
