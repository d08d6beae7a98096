//! Paginated comment retrieval
//!
//! Pages through a `CommentSource` in relevance order, decodes each comment,
//! drops spam, and returns the most-liked survivors within a `FetchBudget`.

#[cfg(test)]
mod tests;

use crate::error::{AnalyzerError, Result};
use crate::filter::CommentFilter;
use crate::source::{CommentOrder, CommentPage, CommentSource, PAGE_SIZE};
use crate::types::{FetchBudget, RawComment};
use futures_util::stream::{self, Stream, TryStreamExt};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;

/// Default pause between page requests
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(100);

static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("line break pattern is valid"));

/// Decode HTML entities, then turn `<br>` markup into newlines
pub fn normalize_text(display: &str) -> String {
    let decoded = html_escape::decode_html_entities(display);
    LINE_BREAK.replace_all(&decoded, "\n").into_owned()
}

/// Stable sort by engagement, highest first, keeping at most `max_return`
pub fn rank_by_engagement(mut comments: Vec<RawComment>, max_return: usize) -> Vec<RawComment> {
    comments.sort_by(|a, b| b.engagement.cmp(&a.engagement));
    comments.truncate(max_return);
    comments
}

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Comment fetcher over any paginated source
pub struct CommentFetcher {
    source: Arc<dyn CommentSource>,
    page_delay: Duration,
}

impl CommentFetcher {
    pub fn new(source: Arc<dyn CommentSource>) -> Self {
        Self {
            source,
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }

    /// Override the pause between pages (clamped to at least 1ms)
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay.max(Duration::from_millis(1));
        self
    }

    pub fn page_delay(&self) -> Duration {
        self.page_delay
    }

    /// Lazily request pages until the source stops returning a token.
    ///
    /// Every page after the first is preceded by the page delay.
    pub fn pages<'a>(&'a self, video_id: &'a str) -> impl Stream<Item = Result<CommentPage>> + 'a {
        stream::try_unfold(Cursor::Start, move |cursor| self.next_page(video_id, cursor, || false))
    }

    async fn next_page<F>(
        &self,
        video_id: &str,
        cursor: Cursor,
        is_cancelled: F,
    ) -> Result<Option<(CommentPage, Cursor)>>
    where
        F: Fn() -> bool,
    {
        let token = match cursor {
            Cursor::Done => return Ok(None),
            Cursor::Start => None,
            Cursor::Next(token) => {
                tokio::time::sleep(self.page_delay).await;
                Some(token)
            }
        };

        // After the delay, right before the request
        if is_cancelled() {
            return Err(AnalyzerError::Cancelled);
        }

        let page = self
            .source
            .comment_page(video_id, token, PAGE_SIZE, CommentOrder::Relevance)
            .await?;

        let next = match &page.next_page_token {
            Some(token) => Cursor::Next(token.clone()),
            None => Cursor::Done,
        };
        Ok(Some((page, next)))
    }

    /// Fetch, filter and rank comments for a video
    pub async fn fetch(
        &self,
        video_id: &str,
        filter: &dyn CommentFilter,
        budget: FetchBudget,
    ) -> Result<Vec<RawComment>> {
        self.fetch_until(video_id, filter, budget, || false).await
    }

    /// Like `fetch`, but checks `is_cancelled` right before every page request,
    /// after any page delay.
    ///
    /// Cancellation and source errors both discard whatever was collected.
    pub async fn fetch_until<F>(
        &self,
        video_id: &str,
        filter: &dyn CommentFilter,
        budget: FetchBudget,
        is_cancelled: F,
    ) -> Result<Vec<RawComment>>
    where
        F: Fn() -> bool,
    {
        let mut collected = Vec::new();
        if budget.max_fetch == 0 {
            return Ok(collected);
        }

        let is_cancelled = &is_cancelled;
        let pages = stream::try_unfold(Cursor::Start, move |cursor| {
            self.next_page(video_id, cursor, is_cancelled)
        });
        futures_util::pin_mut!(pages);

        'paging: loop {
            let Some(page) = pages.try_next().await? else {
                break;
            };

            for item in page.items {
                let text = normalize_text(&item.text_display);
                if filter.is_spam(&text) {
                    continue;
                }

                collected.push(RawComment::new(text, item.like_count));
                if collected.len() >= budget.max_fetch {
                    break 'paging;
                }
            }
        }

        Ok(rank_by_engagement(collected, budget.max_return))
    }
}
