//! End-to-end analysis run
//!
//! URL -> video id -> title -> filtered, ranked comments -> scores -> aggregation,
//! optionally persisted through an `AnalysisStore`.

use crate::error::Result;
use crate::fetcher::CommentFetcher;
use crate::filter::SpamClassifier;
use crate::sentiment::{AggregationResult, LexiconScorer, PolarityScorer, SentimentAggregator};
use crate::source::{extract_video_id, CommentSource, VideoMetadata};
use crate::storage::AnalysisStore;
use crate::types::{FetchBudget, ScoredComment};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Everything a renderer needs from one run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub video_id: String,
    pub title: String,
    pub link: String,
    /// Kept comments in engagement order, each scored once
    pub comments: Vec<ScoredComment>,
    pub result: AggregationResult,
}

impl AnalysisReport {
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

/// Runs the fetch-then-score pipeline for one video at a time
pub struct Analyzer {
    fetcher: CommentFetcher,
    metadata: Arc<dyn VideoMetadata>,
    filter: SpamClassifier,
    aggregator: SentimentAggregator<Box<dyn PolarityScorer>>,
    budget: FetchBudget,
}

impl Analyzer {
    pub fn new(source: Arc<dyn CommentSource>, metadata: Arc<dyn VideoMetadata>) -> Self {
        Self {
            fetcher: CommentFetcher::new(source),
            metadata,
            filter: SpamClassifier::new(),
            aggregator: SentimentAggregator::with_scorer(Box::new(LexiconScorer::new())),
            budget: FetchBudget::default(),
        }
    }

    pub fn with_budget(mut self, budget: FetchBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.fetcher = self.fetcher.with_page_delay(delay);
        self
    }

    pub fn with_scorer(mut self, scorer: Box<dyn PolarityScorer>) -> Self {
        self.aggregator = SentimentAggregator::with_scorer(scorer);
        self
    }

    pub fn aggregator(&self) -> &SentimentAggregator<Box<dyn PolarityScorer>> {
        &self.aggregator
    }

    /// Analyze the video behind `url`
    pub async fn analyze(&self, url: &str) -> Result<AnalysisReport> {
        self.analyze_until(url, || false).await
    }

    /// Analyze, aborting between pages once `is_cancelled` returns true
    pub async fn analyze_until<F>(&self, url: &str, is_cancelled: F) -> Result<AnalysisReport>
    where
        F: Fn() -> bool,
    {
        let video_id = extract_video_id(url)?;
        let title = self.metadata.video_title(&video_id).await?;

        tracing::info!(%video_id, %title, "Fetching comments");

        let comments = self
            .fetcher
            .fetch_until(&video_id, &self.filter, self.budget, is_cancelled)
            .await?;

        let scored = self.aggregator.score_all(&comments);
        let result = AggregationResult::from_scored(&scored);

        tracing::info!(
            %video_id,
            comments = scored.len(),
            positive = result.counts.positive,
            negative = result.counts.negative,
            neutral = result.counts.neutral,
            "Analysis complete"
        );

        Ok(AnalysisReport {
            video_id,
            title,
            link: url.trim().to_string(),
            comments: scored,
            result,
        })
    }

    /// Replace any stored analysis for this video with `report`.
    ///
    /// Returns the time spent writing.
    pub async fn persist(&self, store: &dyn AnalysisStore, report: &AnalysisReport) -> Result<Duration> {
        let started = Instant::now();

        let written = store
            .replace_analysis(&report.video_id, &report.title, &report.link, &report.comments)
            .await?;

        let elapsed = started.elapsed();
        tracing::info!(
            video_id = %report.video_id,
            records = written,
            elapsed_ms = elapsed.as_millis() as u64,
            "Stored analysis"
        );
        Ok(elapsed)
    }
}
