//! # AppError
//!
//! Centralized error handling for the Gossip-Board ecosystem.
//! Every variant maps to exactly one HTTP status at the API boundary; none
//! of them is fatal to the process — bad input never corrupts shared state.

use thiserror::Error;

/// The primary error type for all gb-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// User-correctable input failure (empty body, content over 50 chars)
    #[error("validation error: {0}")]
    Validation(String),

    /// Content rejected by the policy rule chain; carries the rule's reason
    #[error("{0}")]
    PolicyViolation(String),

    /// The device used up its 3 submissions for the day; resolves at midnight
    #[error("daily gossip limit reached")]
    QuotaExceeded,

    /// Banned device. No expiry — bans are permanent in this design.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A required request field was absent or blank
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Infrastructure failure (e.g., the scheduler task is gone)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    /// The HTTP status analog for this error (see the API error taxonomy).
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Validation(_) | AppError::PolicyViolation(_) | AppError::MissingField(_) => 400,
            AppError::Forbidden(_) => 403,
            AppError::QuotaExceeded => 429,
            AppError::Internal(_) => 500,
        }
    }
}

/// A specialized Result type for Gossip-Board logic.
pub type Result<T> = std::result::Result<T, AppError>;
