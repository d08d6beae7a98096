//! Spam filtering for user comments
//!
//! Heuristics, any of which marks a comment as spam:
//! - Wall-of-text length (200+ tokens)
//! - Comments made only of emoji/symbols
//! - Symbol-dense comments (60%+ of non-space characters)
//! - Promotional and phishing signatures

#[cfg(test)]
mod tests;

use once_cell::sync::Lazy;
use regex::RegexSet;

/// Token count at which a comment is treated as a wall of text
pub const MAX_TOKENS: usize = 200;
/// Share of decorative characters at which a comment is treated as spam
pub const DECORATION_DENSITY: f64 = 0.6;

/// Code point ranges counted as decorative symbols (inclusive)
const DECORATIVE_RANGES: &[(u32, u32)] = &[
    (0x1F600, 0x1F64F), // emoticons
    (0x1F300, 0x1F5FF), // symbols & pictographs
    (0x1F680, 0x1F6FF), // transport & map
    (0x1F1E0, 0x1F1FF), // flags
    (0x2700, 0x27BF),   // dingbats
    (0x1F900, 0x1F9FF), // supplemental symbols & pictographs
    (0x2600, 0x26FF),   // misc symbols
    (0x2B50, 0x2B50),
    (0x2B06, 0x2B06),
    (0x1F004, 0x1F004),
    (0x1F0CF, 0x1F0CF),
    (0x1F170, 0x1F251), // enclosed characters
];

static SPAM_PATTERNS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"(?i)check\s+(?:out\s+(?:my\s+)?|my\s+)(?:channel|profile)",
        r"(?i)subscribe\s+(?:to|my)",
        r"(?i)free\s+(?:gift|giveaway|robux|bitcoin|crypto)",
        r"(?i)https?://",
        r"\d{10,}",
    ])
    .expect("spam patterns are valid")
});

/// Returns true if `c` falls in one of the decorative symbol ranges
pub fn is_decorative(c: char) -> bool {
    let cp = c as u32;
    DECORATIVE_RANGES
        .iter()
        .any(|&(lo, hi)| cp >= lo && cp <= hi)
}

/// Anything that can veto a comment before it is kept
pub trait CommentFilter: Send + Sync {
    fn is_spam(&self, text: &str) -> bool;
}

/// Heuristic spam classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct SpamClassifier;

impl SpamClassifier {
    pub fn new() -> Self {
        Self
    }

    fn too_long(text: &str) -> bool {
        text.split_whitespace().count() >= MAX_TOKENS
    }

    fn all_decorative(text: &str) -> bool {
        let mut visible = text.chars().filter(|c| !c.is_whitespace()).peekable();
        if visible.peek().is_none() {
            return false;
        }
        visible.all(is_decorative)
    }

    fn too_decorated(text: &str) -> bool {
        let (total, decorative) = text
            .chars()
            .filter(|&c| c != ' ')
            .fold((0usize, 0usize), |(total, deco), c| {
                (total + 1, deco + usize::from(is_decorative(c)))
            });

        if total == 0 {
            return false;
        }
        decorative as f64 / total as f64 >= DECORATION_DENSITY
    }

    fn matches_signature(text: &str) -> bool {
        SPAM_PATTERNS.is_match(text)
    }
}

impl CommentFilter for SpamClassifier {
    fn is_spam(&self, text: &str) -> bool {
        Self::too_long(text)
            || Self::all_decorative(text)
            || Self::too_decorated(text)
            || Self::matches_signature(text)
    }
}

/// Filter that keeps everything
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl CommentFilter for AcceptAll {
    fn is_spam(&self, _text: &str) -> bool {
        false
    }
}
