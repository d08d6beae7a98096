//! In-memory comment source
//!
//! Serves a fixed list of pages, chained by synthetic tokens. Used by tests
//! and by offline runs that replay a captured listing.

use super::{CommentOrder, CommentPage, CommentItem, CommentSource, VideoMetadata};
use crate::error::{AnalyzerError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Comment source backed by prepared pages
pub struct ScriptedSource {
    title: String,
    pages: Vec<Vec<CommentItem>>,
    /// Page index that fails instead of answering
    fail_at: Option<usize>,
    requests: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(pages: Vec<Vec<CommentItem>>) -> Self {
        Self {
            title: "Scripted video".to_string(),
            pages,
            fail_at: None,
            requests: AtomicUsize::new(0),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Make the request for page `index` fail with `SourceUnavailable`
    pub fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    /// Number of page requests served so far
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn token_for(index: usize) -> String {
        format!("page-{}", index)
    }

    fn index_of(token: Option<&str>) -> Result<usize> {
        match token {
            None => Ok(0),
            Some(t) => t
                .strip_prefix("page-")
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| AnalyzerError::SourceUnavailable(format!("bad page token {}", t))),
        }
    }
}

#[async_trait]
impl CommentSource for ScriptedSource {
    async fn comment_page(
        &self,
        _video_id: &str,
        page_token: Option<String>,
        max_results: u32,
        _order: CommentOrder,
    ) -> Result<CommentPage> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let index = Self::index_of(page_token.as_deref())?;

        if self.fail_at == Some(index) {
            return Err(AnalyzerError::SourceUnavailable(format!(
                "scripted failure on page {}",
                index
            )));
        }

        let items = self
            .pages
            .get(index)
            .map(|p| p.iter().take(max_results as usize).cloned().collect())
            .unwrap_or_default();
        let next_page_token = (index + 1 < self.pages.len()).then(|| Self::token_for(index + 1));

        Ok(CommentPage {
            items,
            next_page_token,
        })
    }
}

#[async_trait]
impl VideoMetadata for ScriptedSource {
    async fn video_title(&self, _video_id: &str) -> Result<String> {
        Ok(self.title.clone())
    }
}
