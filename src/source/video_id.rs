//! Video id extraction from watch/share URLs

use crate::error::{AnalyzerError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static VIDEO_ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"[?&]v=([A-Za-z0-9_-]{11})",
        r"youtu\.be/([A-Za-z0-9_-]{11})",
        r"/v/([A-Za-z0-9_-]{11})",
        r"/embed/([A-Za-z0-9_-]{11})",
        r"/shorts/([A-Za-z0-9_-]{11})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("video id pattern is valid"))
    .collect()
});

/// Extract the 11-character video id from a URL.
///
/// Accepts `watch?v=ID`, `youtu.be/ID`, `/v/ID`, `/embed/ID` and `/shorts/ID`.
pub fn extract_video_id(url: &str) -> Result<String> {
    let url = url.trim();
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| AnalyzerError::InvalidReference(url.to_string()))
}
