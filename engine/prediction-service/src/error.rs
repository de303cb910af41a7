//! Error types for the prediction service

use thiserror::Error;

/// Result type for prediction service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors that can occur in the prediction service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Fixture source failure that could not be absorbed by the cache
    #[error("Fixture source error: {0}")]
    Source(#[from] fixture_source::SourceError),

    /// Totals store failure; the stage/all-time pair was left consistent
    #[error("Store error: {0}")]
    Store(#[from] totals_store::StoreError),

    /// A submission contained no prediction that both has two scores and
    /// refers to a match still open per the eligibility rules
    #[error("no valid predictions to save")]
    NoEligiblePredictions,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}
