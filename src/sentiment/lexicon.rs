//! Lexicon Sentiment Scorer
//!
//! VADER-style sentiment analysis tuned for video comments.
//! Handles emojis, shouting, boosters, negation and contrastive "but".

use super::PolarityScorer;
use std::collections::{HashMap, HashSet};

/// Normalization constant for the compound score
const ALPHA: f64 = 15.0;
/// Scale applied to a term preceded by a negation
const NEGATION_SCALAR: f64 = -0.74;
/// Added to the magnitude of an ALL CAPS term in mixed-case text
const CAPS_INCREMENT: f64 = 0.733;
/// Added per exclamation mark, up to four
const EXCLAMATION_INCREMENT: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
/// Largest magnitude a single term may reach
const MAX_VALENCE: f64 = 4.0;

/// Result of sentiment analysis
#[derive(Debug, Clone)]
pub struct Polarity {
    /// Positive share (0.0 to 1.0)
    pub positive: f64,
    /// Negative share (0.0 to 1.0)
    pub negative: f64,
    /// Neutral share (0.0 to 1.0)
    pub neutral: f64,
    /// Compound score (-1.0 to 1.0)
    pub compound: f64,
}

impl Polarity {
    fn neutral() -> Self {
        Self {
            positive: 0.0,
            negative: 0.0,
            neutral: 1.0,
            compound: 0.0,
        }
    }
}

/// Sentiment scorer using lexicon-based approach
pub struct LexiconScorer {
    /// Word valences on a -4.0 to 4.0 scale
    lexicon: HashMap<String, f64>,
    /// Emoji valences
    emoji_lexicon: HashMap<char, f64>,
    /// Intensity modifiers (very, barely, etc.)
    boosters: HashMap<String, f64>,
    /// Negation words
    negations: HashSet<String>,
}

impl LexiconScorer {
    /// Create a new scorer with default lexicons
    pub fn new() -> Self {
        let mut scorer = Self {
            lexicon: HashMap::new(),
            emoji_lexicon: HashMap::new(),
            boosters: HashMap::new(),
            negations: HashSet::new(),
        };
        scorer.init_lexicons();
        scorer
    }

    /// Initialize sentiment lexicons
    fn init_lexicons(&mut self) {
        let positive_words = [
            ("love", 3.2),
            ("loved", 2.9),
            ("loving", 2.9),
            ("lovely", 2.8),
            ("like", 1.5),
            ("liked", 1.8),
            ("great", 3.1),
            ("good", 1.9),
            ("nice", 1.8),
            ("awesome", 3.1),
            ("amazing", 2.8),
            ("excellent", 2.7),
            ("fantastic", 2.6),
            ("wonderful", 2.7),
            ("beautiful", 2.9),
            ("best", 3.2),
            ("better", 1.9),
            ("perfect", 2.7),
            ("brilliant", 2.8),
            ("incredible", 2.6),
            ("masterpiece", 3.1),
            ("helpful", 1.8),
            ("useful", 1.9),
            ("thanks", 1.9),
            ("thank", 1.5),
            ("happy", 2.7),
            ("glad", 2.0),
            ("fun", 2.3),
            ("funny", 1.9),
            ("hilarious", 1.7),
            ("lol", 1.8),
            ("haha", 2.0),
            ("cool", 1.3),
            ("interesting", 1.7),
            ("enjoy", 2.2),
            ("enjoyed", 2.3),
            ("inspiring", 2.2),
            ("epic", 2.1),
            ("cute", 2.0),
            ("wow", 2.8),
            ("clear", 1.6),
            ("recommend", 1.5),
            ("underrated", 1.0),
            ("legend", 2.0),
            ("win", 2.8),
            ("okay", 0.9),
            ("ok", 0.9),
            ("fine", 0.8),
        ];

        let negative_words = [
            ("hate", -2.7),
            ("hated", -3.2),
            ("terrible", -2.1),
            ("awful", -2.0),
            ("horrible", -2.5),
            ("bad", -2.5),
            ("worst", -3.1),
            ("worse", -2.1),
            ("boring", -1.3),
            ("stupid", -2.4),
            ("dumb", -2.3),
            ("trash", -1.8),
            ("garbage", -2.1),
            ("useless", -1.8),
            ("annoying", -1.7),
            ("disappointing", -2.2),
            ("disappointed", -1.9),
            ("sad", -2.1),
            ("angry", -2.3),
            ("wrong", -2.1),
            ("fake", -2.2),
            ("clickbait", -1.8),
            ("cringe", -1.8),
            ("waste", -1.8),
            ("wasted", -2.2),
            ("misleading", -1.9),
            ("scam", -2.4),
            ("lies", -1.8),
            ("sucks", -1.5),
            ("poor", -2.1),
            ("ugly", -2.3),
            ("fail", -2.5),
            ("failed", -2.3),
            ("dislike", -1.6),
            ("ridiculous", -1.5),
            ("nonsense", -1.7),
            ("problem", -1.7),
            ("hurt", -2.4),
        ];

        for (word, valence) in positive_words.iter().chain(negative_words.iter()) {
            self.lexicon.insert(word.to_string(), *valence);
        }

        let emojis = [
            ('😍', 2.7),
            ('❤', 2.7),
            ('🥰', 2.6),
            ('😊', 2.2),
            ('😃', 2.0),
            ('😀', 1.9),
            ('😂', 1.5),
            ('🤣', 1.5),
            ('👍', 1.8),
            ('👏', 1.9),
            ('💯', 1.8),
            ('🔥', 1.5),
            ('🙏', 1.1),
            ('😢', -1.9),
            ('😭', -1.5),
            ('😞', -2.0),
            ('😡', -2.6),
            ('😠', -2.3),
            ('👎', -1.9),
            ('🤮', -2.6),
            ('💩', -1.8),
            ('🙄', -1.2),
            ('😴', -1.0),
        ];

        for (emoji, valence) in emojis {
            self.emoji_lexicon.insert(emoji, valence);
        }

        let boosters = [
            ("very", 1.3),
            ("really", 1.3),
            ("extremely", 1.5),
            ("absolutely", 1.4),
            ("completely", 1.4),
            ("totally", 1.3),
            ("truly", 1.3),
            ("so", 1.2),
            ("super", 1.3),
            ("incredibly", 1.4),
            ("highly", 1.3),
            ("insanely", 1.5),
            ("most", 1.2),
            ("slightly", 0.7),
            ("somewhat", 0.8),
            ("kinda", 0.8),
            ("barely", 0.6),
        ];

        for (word, factor) in boosters {
            self.boosters.insert(word.to_string(), factor);
        }

        self.negations = [
            "not", "no", "never", "none", "neither", "nor", "nobody", "nothing", "nowhere",
            "without", "isn't", "isnt", "aren't", "wasn't", "weren't", "hasn't", "haven't",
            "hadn't", "doesn't", "doesnt", "don't", "dont", "didn't", "didnt", "won't", "wont",
            "wouldn't", "can't", "cant", "cannot", "couldn't", "shouldn't",
        ]
        .iter()
        .map(|w| w.to_string())
        .collect();
    }

    /// Analyze sentiment of text
    pub fn analyze(&self, text: &str) -> Polarity {
        let words: Vec<&str> = text.split_whitespace().collect();
        let cleaned: Vec<String> = words.iter().map(|w| self.clean_word(w)).collect();
        let mixed_case = has_mixed_case(text);
        let but_at = cleaned.iter().position(|w| w == "but");

        let mut scores: Vec<f64> = Vec::new();

        for c in text.chars() {
            if let Some(&valence) = self.emoji_lexicon.get(&c) {
                scores.push(valence);
            }
        }

        for (i, word) in cleaned.iter().enumerate() {
            let Some(&valence) = self.lexicon.get(word) else {
                continue;
            };

            let mut valence = valence;
            if mixed_case && is_shouted(words[i]) {
                valence += CAPS_INCREMENT * valence.signum();
            }
            valence = self.apply_modifiers(&cleaned, i, valence);

            // Clause after "but" dominates the one before it
            match but_at {
                Some(b) if i < b => valence *= 0.5,
                Some(b) if i > b => valence *= 1.5,
                _ => {}
            }

            scores.push(valence);
        }

        if scores.is_empty() {
            return Polarity::neutral();
        }

        let mut sum: f64 = scores.iter().sum();
        let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
        if sum != 0.0 {
            sum += exclamations as f64 * EXCLAMATION_INCREMENT * sum.signum();
        }

        let positive_sum: f64 = scores.iter().filter(|&&s| s > 0.0).sum();
        let negative_sum: f64 = scores.iter().filter(|&&s| s < 0.0).map(|s| s.abs()).sum();
        let total = positive_sum + negative_sum;

        let (positive, negative) = if total > 0.0 {
            (positive_sum / total, negative_sum / total)
        } else {
            (0.0, 0.0)
        };

        Polarity {
            positive,
            negative,
            neutral: (1.0 - positive - negative).max(0.0),
            compound: self.normalize(sum),
        }
    }

    /// Clean a word by removing punctuation
    fn clean_word(&self, word: &str) -> String {
        word.chars()
            .filter(|c| c.is_alphanumeric() || *c == '\'' || *c == '-')
            .collect::<String>()
            .to_lowercase()
    }

    /// Apply boosters and negations from up to three preceding words
    fn apply_modifiers(&self, words: &[String], index: usize, mut valence: f64) -> f64 {
        let start = index.saturating_sub(3);

        for prev in &words[start..index] {
            if let Some(&factor) = self.boosters.get(prev) {
                valence *= factor;
            }
            if self.negations.contains(prev) {
                valence *= NEGATION_SCALAR;
            }
        }

        valence.clamp(-MAX_VALENCE, MAX_VALENCE)
    }

    /// Normalize a valence sum to the -1 to 1 range
    fn normalize(&self, sum: f64) -> f64 {
        (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
    }
}

impl PolarityScorer for LexiconScorer {
    fn score(&self, text: &str) -> f64 {
        self.analyze(text).compound
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

fn has_mixed_case(text: &str) -> bool {
    text.chars().any(|c| c.is_lowercase()) && text.chars().any(|c| c.is_uppercase())
}

/// ALL CAPS word with at least two letters
fn is_shouted(word: &str) -> bool {
    let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_sentiment() {
        let scorer = LexiconScorer::new();
        let result = scorer.analyze("I love this!");
        assert!(result.compound >= 0.05);
        assert!(result.compound > 0.5);
    }

    #[test]
    fn test_negative_sentiment() {
        let scorer = LexiconScorer::new();
        let result = scorer.analyze("I hate this.");
        assert!(result.compound <= -0.05);
    }

    #[test]
    fn test_neutral_sentiment() {
        let scorer = LexiconScorer::new();
        let result = scorer.analyze("The video is 10 minutes long");
        assert_eq!(result.compound, 0.0);
        assert_eq!(result.neutral, 1.0);
    }

    #[test]
    fn test_emoji_sentiment() {
        let scorer = LexiconScorer::new();
        assert!(scorer.analyze("😍😍😍").compound > 0.5);
        assert!(scorer.analyze("👎👎").compound < -0.3);
    }

    #[test]
    fn test_booster_words() {
        let scorer = LexiconScorer::new();
        let normal = scorer.analyze("This is good");
        let boosted = scorer.analyze("This is extremely good");
        let dampened = scorer.analyze("This is barely good");

        assert!(boosted.compound > normal.compound);
        assert!(dampened.compound < normal.compound);
    }

    #[test]
    fn test_negation() {
        let scorer = LexiconScorer::new();
        let positive = scorer.analyze("This is good");
        let negated = scorer.analyze("This is not good");

        assert!(positive.compound > 0.0);
        assert!(negated.compound < 0.0);
    }

    #[test]
    fn test_shouting() {
        let scorer = LexiconScorer::new();
        let calm = scorer.analyze("great video");
        let shouted = scorer.analyze("GREAT video");
        assert!(shouted.compound > calm.compound);
    }

    #[test]
    fn test_but_clause() {
        let scorer = LexiconScorer::new();
        let result = scorer.analyze("The video is good but the audio is terrible");
        assert!(result.compound < 0.0);
    }

    #[test]
    fn test_exclamation_emphasis() {
        let scorer = LexiconScorer::new();
        let plain = scorer.analyze("nice");
        let excited = scorer.analyze("nice!!!");
        assert!(excited.compound > plain.compound);
    }

    #[test]
    fn test_compound_is_bounded() {
        let scorer = LexiconScorer::new();
        let gushing = "SO SO SO great love best amazing ".repeat(40) + "!!!!!!";
        let ranting = "worst hate terrible awful ".repeat(40);
        for text in [gushing.as_str(), ranting.as_str()] {
            let compound = scorer.analyze(text).compound;
            assert!((-1.0..=1.0).contains(&compound));
        }
    }

    #[test]
    fn test_clean_word() {
        let scorer = LexiconScorer::new();
        assert_eq!(scorer.clean_word("hello!"), "hello");
        assert_eq!(scorer.clean_word("GREAT!!!"), "great");
        assert_eq!(scorer.clean_word("don't"), "don't");
    }

    #[test]
    fn test_is_shouted() {
        assert!(is_shouted("WOW!"));
        assert!(!is_shouted("I"));
        assert!(!is_shouted("Wow"));
    }

    #[test]
    fn test_empty_text() {
        let scorer = LexiconScorer::new();
        let result = scorer.analyze("");
        assert_eq!(result.compound, 0.0);
        assert_eq!(result.neutral, 1.0);
    }

    #[test]
    fn test_default_impl() {
        let scorer = LexiconScorer::default();
        assert!(scorer.score("good") >= 0.05);
    }
}
