//! Common types and data structures

use crate::constants::MAX_RATING;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Review text that passed validation: trimmed and non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewInput(String);

impl ReviewInput {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyReview);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Star rating in 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FeedbackRating(u8);

impl FeedbackRating {
    pub fn new(stars: u8) -> Option<Self> {
        (1..=MAX_RATING).contains(&stars).then_some(Self(stars))
    }

    pub fn stars(self) -> u8 {
        self.0
    }
}

/// Which part of the window is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Idle,
    Loading,
    Results,
}

/// Response body of `POST /analyze`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisResult {
    /// Echo of the submitted text; not displayed
    #[serde(default)]
    pub review: Option<String>,
    pub overall_sentiment: String,
    pub sentiment_percentages: SentimentPercentages,
    pub analysis: Vec<Finding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SentimentPercentages {
    pub positive_percentage: f64,
    pub negative_percentage: f64,
}

/// One per-sentence record from the service
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Finding {
    pub sentence: String,
    pub aspects: Vec<String>,
    pub sentiment: String,
    #[serde(default)]
    pub sentiment_words: Vec<String>,
}

/// Colour class of a sentiment label, matched case-insensitively
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentTone {
    Positive,
    Negative,
    Other,
}

impl SentimentTone {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            _ => Self::Other,
        }
    }
}

// Request bodies

#[derive(Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub review: &'a str,
}

#[derive(Debug, Serialize)]
pub struct FeedbackRequest {
    pub feedback: FeedbackRating,
}

/// Error body the service may attach to a non-2xx response
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}
