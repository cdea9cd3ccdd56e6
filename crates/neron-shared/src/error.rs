//! Error types for Neron shared tables.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NeronError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown mood: {0}")]
    UnknownMood(String),

    #[error("Override '{0}' has no responses")]
    EmptyOverride(String),

    #[error("Override trigger must not be empty")]
    EmptyTrigger,
}
