//! adaptiq-store: Question banks, response logs, and configuration loading.
//!
//! Provides the in-memory and JSON-file implementations of
//! [`adaptiq_core::QuestionStore`], question bank seeding, and the
//! application config loader.

pub mod bank;
pub mod config;
pub mod error;
pub mod json;
pub mod memory;

pub use bank::{audit_question_bank, generate_question_bank, validate_question_bank, BankWarning};
pub use config::{load_config_from, AppConfig};
pub use error::StoreError;
pub use json::JsonFileStore;
pub use memory::{InMemoryStore, Snapshot};
