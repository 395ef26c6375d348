//! Error types for the VOUCH system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VouchError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("invalid OTP code")]
    InvalidOtp,

    #[error("no valid OTP challenge for this account")]
    OtpExpired,

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Invalid transition: {entity} is {status}, only Pending items can be reviewed")]
    InvalidTransition { entity: String, status: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Authorization denied: {reason}")]
    Forbidden { reason: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type VouchResult<T> = Result<T, VouchError>;
