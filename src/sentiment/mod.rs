//! Comment Sentiment Module
//!
//! Scores comments and aggregates them into a three-way distribution.
//! Key features:
//! - Pluggable compound polarity scoring (`PolarityScorer`)
//! - Lexicon-based default scorer (`LexiconScorer`)
//! - Single-pass aggregation of class counts and the most extreme comment per class

pub mod lexicon;

pub use lexicon::{LexiconScorer, Polarity};

use crate::types::{RawComment, ScoredComment, SentimentClass};
use serde::Serialize;
use std::sync::Arc;

/// Anything that maps text to a compound score in [-1.0, 1.0]
#[cfg_attr(test, mockall::automock)]
pub trait PolarityScorer: Send + Sync {
    fn score(&self, text: &str) -> f64;
}

impl<T: PolarityScorer + ?Sized> PolarityScorer for Box<T> {
    fn score(&self, text: &str) -> f64 {
        (**self).score(text)
    }
}

impl<T: PolarityScorer + ?Sized> PolarityScorer for Arc<T> {
    fn score(&self, text: &str) -> f64 {
        (**self).score(text)
    }
}

/// Number of comments per class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentCounts {
    pub fn get(&self, class: SentimentClass) -> usize {
        match class {
            SentimentClass::Positive => self.positive,
            SentimentClass::Negative => self.negative,
            SentimentClass::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    fn increment(&mut self, class: SentimentClass) {
        match class {
            SentimentClass::Positive => self.positive += 1,
            SentimentClass::Negative => self.negative += 1,
            SentimentClass::Neutral => self.neutral += 1,
        }
    }

    /// Share of comments in `class`, 0.0 when nothing was counted
    pub fn share(&self, class: SentimentClass) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.get(class) as f64 / total as f64,
        }
    }
}

/// Most extreme comment seen per class, `None` when the class is empty
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopComments {
    pub positive: Option<ScoredComment>,
    pub negative: Option<ScoredComment>,
    pub neutral: Option<ScoredComment>,
}

impl TopComments {
    pub fn get(&self, class: SentimentClass) -> Option<&ScoredComment> {
        match class {
            SentimentClass::Positive => self.positive.as_ref(),
            SentimentClass::Negative => self.negative.as_ref(),
            SentimentClass::Neutral => self.neutral.as_ref(),
        }
    }
}

/// Counts and per-class extremes computed in one traversal
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregationResult {
    pub counts: SentimentCounts,
    pub top: TopComments,
}

impl AggregationResult {
    /// Fold one scored comment into the accumulator.
    ///
    /// Replacement is strict, so the earliest comment keeps a tied slot.
    pub fn push(&mut self, comment: &RawComment, score: f64) {
        let class = SentimentClass::from_score(score);
        self.counts.increment(class);

        let (slot, better) = match class {
            SentimentClass::Positive => {
                let slot = &mut self.top.positive;
                let better = slot.as_ref().map_or(true, |best| score > best.score);
                (slot, better)
            }
            SentimentClass::Negative => {
                let slot = &mut self.top.negative;
                let better = slot.as_ref().map_or(true, |best| score < best.score);
                (slot, better)
            }
            SentimentClass::Neutral => {
                let slot = &mut self.top.neutral;
                let better = slot
                    .as_ref()
                    .map_or(true, |best| score.abs() > best.score.abs());
                (slot, better)
            }
        };

        if better {
            *slot = Some(ScoredComment {
                comment: comment.clone(),
                score,
            });
        }
    }

    /// Aggregate already-scored comments
    pub fn from_scored<'a, I>(scored: I) -> Self
    where
        I: IntoIterator<Item = &'a ScoredComment>,
    {
        scored.into_iter().fold(Self::default(), |mut acc, s| {
            acc.push(&s.comment, s.score);
            acc
        })
    }
}

/// Scores comments and aggregates the results
pub struct SentimentAggregator<S = LexiconScorer> {
    scorer: S,
}

impl SentimentAggregator<LexiconScorer> {
    /// Create an aggregator with the default lexicon scorer
    pub fn new() -> Self {
        Self {
            scorer: LexiconScorer::new(),
        }
    }
}

impl Default for SentimentAggregator<LexiconScorer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PolarityScorer> SentimentAggregator<S> {
    pub fn with_scorer(scorer: S) -> Self {
        Self { scorer }
    }

    /// Compound score of `text`, always within [-1.0, 1.0]
    pub fn score(&self, text: &str) -> f64 {
        let raw = self.scorer.score(text);
        if raw.is_nan() {
            0.0
        } else {
            raw.clamp(-1.0, 1.0)
        }
    }

    pub fn classify(&self, text: &str) -> SentimentClass {
        SentimentClass::from_score(self.score(text))
    }

    /// Score every comment once, preserving order
    pub fn score_all(&self, comments: &[RawComment]) -> Vec<ScoredComment> {
        comments
            .iter()
            .map(|c| ScoredComment {
                comment: c.clone(),
                score: self.score(&c.text),
            })
            .collect()
    }

    /// Counts and per-class top comments, scoring each comment once
    pub fn aggregate(&self, comments: &[RawComment]) -> AggregationResult {
        comments
            .iter()
            .fold(AggregationResult::default(), |mut acc, c| {
                acc.push(c, self.score(&c.text));
                acc
            })
    }

    pub fn classify_counts(&self, comments: &[RawComment]) -> SentimentCounts {
        self.aggregate(comments).counts
    }

    pub fn top_comments(&self, comments: &[RawComment]) -> TopComments {
        self.aggregate(comments).top
    }
}
