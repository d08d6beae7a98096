//! Comment source interfaces
//!
//! This module provides the boundary to the video platform:
//! - `CommentSource`: paginated comment listing
//! - `VideoMetadata`: title lookup
//! - `YouTubeClient`: YouTube Data API v3 implementation of both
//! - `ScriptedSource`: in-memory pages for tests and offline runs

mod scripted;
mod video_id;
mod youtube;

pub use scripted::ScriptedSource;
pub use video_id::extract_video_id;
pub use youtube::YouTubeClient;

use crate::error::Result;
use async_trait::async_trait;

/// Title returned when the platform has no record of a video
pub const UNKNOWN_TITLE: &str = "Unknown title";
/// Largest page the source is asked for
pub const PAGE_SIZE: u32 = 100;

/// Ordering hint for the comment listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentOrder {
    Relevance,
}

impl CommentOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentOrder::Relevance => "relevance",
        }
    }
}

/// One top-level comment as the source delivers it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentItem {
    /// Display text, may contain HTML entities and `<br>` markup
    pub text_display: String,
    pub like_count: u64,
}

impl CommentItem {
    pub fn new(text_display: impl Into<String>, like_count: u64) -> Self {
        Self {
            text_display: text_display.into(),
            like_count,
        }
    }
}

/// One page of the comment listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentPage {
    pub items: Vec<CommentItem>,
    /// Cursor for the next page, `None` once exhausted
    pub next_page_token: Option<String>,
}

/// Paginated comment listing
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentSource: Send + Sync {
    async fn comment_page(
        &self,
        video_id: &str,
        page_token: Option<String>,
        max_results: u32,
        order: CommentOrder,
    ) -> Result<CommentPage>;
}

/// Video title lookup
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoMetadata: Send + Sync {
    async fn video_title(&self, video_id: &str) -> Result<String>;
}
