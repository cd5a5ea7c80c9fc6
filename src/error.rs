//! Error types for the rating engine
//!
//! Domain conditions are modelled with thiserror and propagated through
//! anyhow, so callers can either bubble them up or downcast to branch on them.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RatingError {
    #[error("No competitors provided for rating calculation")]
    NoCompetitors,

    #[error("Competitor listed more than once: {competitor_id}")]
    DuplicateCompetitor { competitor_id: String },

    #[error("Result recorded for competitor not in the roster: {competitor_id}")]
    UnknownCompetitor { competitor_id: String },

    #[error("No finishing rank recorded for competitor: {competitor_id}")]
    MissingResult { competitor_id: String },

    #[error("Invalid rating for competitor {competitor_id}: {reason}")]
    InvalidRating {
        competitor_id: String,
        reason: String,
    },

    #[error("Competitor not found: {competitor_id}")]
    CompetitorNotFound { competitor_id: String },

    #[error("Competitor already registered: {competitor_id}")]
    CompetitorAlreadyRegistered { competitor_id: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },
}
