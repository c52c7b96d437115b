//! Error types for input validation and service requests

use crate::constants::{MSG_EMPTY_REVIEW, MSG_NO_RATING};

/// Local validation failures. These never reach the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("review text is empty")]
    EmptyReview,
    #[error("no feedback rating selected")]
    NoRating,
}

impl ValidationError {
    /// Alert text shown to the user
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyReview => MSG_EMPTY_REVIEW,
            Self::NoRating => MSG_NO_RATING,
        }
    }
}

/// Failures talking to the sentiment service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid service URL: {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service returned HTTP {status}")]
    Status {
        status: reqwest::StatusCode,
        /// `error` field from the response body, when the service sent one
        message: Option<String>,
    },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ServiceError {
    /// Message supplied by the service itself, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
