//! YouTube Data API v3 client
//!
//! Fetches comment threads and video titles.

use super::{CommentItem, CommentOrder, CommentPage, CommentSource, VideoMetadata, UNKNOWN_TITLE};
use crate::config::YouTubeConfig;
use crate::error::{AnalyzerError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;

/// YouTube Data API client
pub struct YouTubeClient {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ThreadListResponse {
    #[serde(default)]
    items: Vec<CommentThread>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThread {
    snippet: ThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadSnippet {
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    #[serde(default)]
    text_display: String,
    #[serde(default)]
    like_count: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: VideoSnippet,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl From<ThreadListResponse> for CommentPage {
    fn from(resp: ThreadListResponse) -> Self {
        CommentPage {
            items: resp
                .items
                .into_iter()
                .map(|thread| {
                    let snippet = thread.snippet.top_level_comment.snippet;
                    CommentItem {
                        text_display: snippet.text_display,
                        like_count: snippet.like_count,
                    }
                })
                .collect(),
            // An empty token means the same as no token
            next_page_token: resp.next_page_token.filter(|t| !t.is_empty()),
        }
    }
}

impl VideoListResponse {
    pub(crate) fn title(self) -> String {
        self.items
            .into_iter()
            .next()
            .map(|v| v.snippet.title)
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
    }
}

impl YouTubeClient {
    /// Create a new client from configuration
    pub fn new(config: &YouTubeConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(AnalyzerError::Config(
                "YouTube API key is not set".to_string(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Turn a non-2xx response into `SourceUnavailable` with the API's message
    async fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);

        Err(AnalyzerError::SourceUnavailable(format!(
            "HTTP {}: {}",
            status.as_u16(),
            message
        )))
    }
}

#[async_trait]
impl CommentSource for YouTubeClient {
    async fn comment_page(
        &self,
        video_id: &str,
        page_token: Option<String>,
        max_results: u32,
        order: CommentOrder,
    ) -> Result<CommentPage> {
        let url = format!("{}/commentThreads", self.base_url);
        let max_results = max_results.to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("videoId", video_id),
            ("maxResults", max_results.as_str()),
            ("order", order.as_str()),
            ("textFormat", "html"),
            ("key", self.api_key.as_str()),
        ];
        if let Some(token) = page_token.as_deref() {
            query.push(("pageToken", token));
        }

        tracing::debug!(video_id, has_token = page_token.is_some(), "Requesting comment page");

        let resp = self.http.get(&url).query(&query).send().await?;
        let resp: ThreadListResponse = Self::check(resp).await?.json().await?;
        let page = CommentPage::from(resp);

        tracing::debug!(
            video_id,
            items = page.items.len(),
            more = page.next_page_token.is_some(),
            "Received comment page"
        );

        Ok(page)
    }
}

#[async_trait]
impl VideoMetadata for YouTubeClient {
    async fn video_title(&self, video_id: &str) -> Result<String> {
        let url = format!("{}/videos", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("id", video_id),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let resp: VideoListResponse = Self::check(resp).await?.json().await?;
        Ok(resp.title())
    }
}
