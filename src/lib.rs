//! Video Comment Sentiment Analyzer
//!
//! Fetches comments for a public video, filters spam, scores sentiment and
//! aggregates the results for display and persistence.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod pipeline;
pub mod sentiment;
pub mod source;
pub mod storage;
pub mod types;
