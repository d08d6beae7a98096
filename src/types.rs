//! Core data types shared across the pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Score at or above which a comment is positive
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Score at or below which a comment is negative
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// A comment as retrieved from the source, after decoding and spam filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawComment {
    /// Plain text with HTML entities decoded and line breaks normalized
    pub text: String,
    /// Like count
    pub engagement: u64,
}

impl RawComment {
    pub fn new(text: impl Into<String>, engagement: u64) -> Self {
        Self {
            text: text.into(),
            engagement,
        }
    }
}

/// Three-way sentiment classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentClass {
    Positive,
    Negative,
    Neutral,
}

impl SentimentClass {
    pub const ALL: [SentimentClass; 3] = [
        SentimentClass::Positive,
        SentimentClass::Negative,
        SentimentClass::Neutral,
    ];

    /// Classify a compound score
    pub fn from_score(score: f64) -> Self {
        if score >= POSITIVE_THRESHOLD {
            SentimentClass::Positive
        } else if score <= NEGATIVE_THRESHOLD {
            SentimentClass::Negative
        } else {
            SentimentClass::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentClass::Positive => "Positive",
            SentimentClass::Negative => "Negative",
            SentimentClass::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for SentimentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for SentimentClass {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Positive" => Ok(SentimentClass::Positive),
            "Negative" => Ok(SentimentClass::Negative),
            "Neutral" => Ok(SentimentClass::Neutral),
            other => Err(format!("unknown sentiment label: {}", other)),
        }
    }
}

/// Display emphasis used by renderers to color strong scores.
///
/// Uses the ±0.5 band, which is unrelated to classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// Above 0.5
    StrongPositive,
    /// Below -0.5
    StrongNegative,
    Muted,
}

impl Emphasis {
    pub fn from_score(score: f64) -> Self {
        if score > 0.5 {
            Emphasis::StrongPositive
        } else if score < -0.5 {
            Emphasis::StrongNegative
        } else {
            Emphasis::Muted
        }
    }
}

/// A comment paired with its compound polarity score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredComment {
    pub comment: RawComment,
    /// Compound score (-1.0 to 1.0)
    pub score: f64,
}

impl ScoredComment {
    pub fn class(&self) -> SentimentClass {
        SentimentClass::from_score(self.score)
    }
}

/// Limits applied while paging comments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchBudget {
    /// Upper bound on non-spam comments collected from the source
    pub max_fetch: usize,
    /// Upper bound on comments returned after ranking
    pub max_return: usize,
}

impl FetchBudget {
    pub fn new(max_fetch: usize, max_return: usize) -> Self {
        Self {
            max_fetch,
            max_return,
        }
    }
}

impl Default for FetchBudget {
    fn default() -> Self {
        Self {
            max_fetch: 4000,
            max_return: 200,
        }
    }
}

/// A previously analyzed video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    pub link: String,
    pub analyzed_at: DateTime<Utc>,
}

/// Sentiment row stored against a persisted comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub comment_id: String,
    pub label: SentimentClass,
    pub score: f64,
}
