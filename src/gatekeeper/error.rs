//! Gatekeeper error types.
//!
//! Verification failures are kept apart internally so they can be logged,
//! but every one of them maps to the same outward access-denied answer.

use thiserror::Error;

use crate::storage::StoreError;

#[derive(Error, Debug)]
pub enum SigningError {
    #[error("client id must not be empty")]
    EmptyClientId,

    #[error("failed to encode credential: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),
}

#[derive(Error, Debug)]
pub enum VerificationError {
    /// Malformed compact form, bad MAC or a disallowed algorithm
    #[error("credential rejected: {0}")]
    Rejected(#[source] jsonwebtoken::errors::Error),

    #[error("credential issuer mismatch")]
    IssuerMismatch,

    #[error("credential expired at {exp} (now {now})")]
    Expired { exp: i64, now: i64 },

    #[error("credential carries an invalid correlation id")]
    InvalidCorrelationId,

    #[error("credential was not issued by this system")]
    NotIssued,

    #[error("credential store lookup failed: {0}")]
    Store(#[source] StoreError),
}

impl VerificationError {
    /// Short stable tag for logs
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Rejected(_) => "REJECTED",
            Self::IssuerMismatch => "ISSUER_MISMATCH",
            Self::Expired { .. } => "EXPIRED",
            Self::InvalidCorrelationId => "INVALID_CORRELATION_ID",
            Self::NotIssued => "NOT_ISSUED",
            Self::Store(_) => "STORE_ERROR",
        }
    }
}
