//! Application constants and configuration

pub const APP_NAME: &str = "Aspect Sentiment";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Origin of the sentiment service when neither settings nor env provide one
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:5000";
/// Environment variable that overrides the configured service origin
pub const SERVICE_URL_ENV: &str = "SENTIMENT_SERVICE_URL";

pub const ANALYZE_PATH: &str = "/analyze";
pub const FEEDBACK_PATH: &str = "/feedback";

// User-facing alert messages
pub const MSG_EMPTY_REVIEW: &str = "Please enter a review.";
pub const MSG_ANALYZE_FAILED: &str = "An error occurred. Please try again later.";
pub const MSG_NO_RATING: &str = "Please select a rating before submitting feedback!";
pub const MSG_FEEDBACK_SENT: &str = "Feedback submitted successfully!";
pub const MSG_FEEDBACK_FAILED: &str = "Failed to submit feedback. Please try again.";

pub const MAX_RATING: u8 = 5;
