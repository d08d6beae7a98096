//! Unit tests for the spam filter

#[cfg(test)]
mod tests {
    use super::super::*;

    fn lorem(words: usize) -> String {
        let base = ["lorem", "ipsum", "dolor", "sit", "amet", "consectetur"];
        (0..words)
            .map(|i| base[i % base.len()])
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_channel_solicitation() {
        let filter = SpamClassifier::new();
        assert!(filter.is_spam("check out my channel!!"));
        assert!(filter.is_spam("Check my profile for more"));
        assert!(filter.is_spam("CHECK OUT CHANNEL"));
        assert!(!filter.is_spam("You should check profile settings first"));
        assert!(!filter.is_spam("check channel 5 for the replay"));
    }

    #[test]
    fn test_subscription_solicitation() {
        let filter = SpamClassifier::new();
        assert!(filter.is_spam("subscribe to my channel"));
        assert!(filter.is_spam("Subscribe my page pls"));
        assert!(!filter.is_spam("I just subscribed, great content"));
    }

    #[test]
    fn test_giveaway_bait() {
        let filter = SpamClassifier::new();
        assert!(filter.is_spam("FREE ROBUX here"));
        assert!(filter.is_spam("get your free gift now"));
        assert!(filter.is_spam("free bitcoin for everyone"));
    }

    #[test]
    fn test_urls() {
        let filter = SpamClassifier::new();
        assert!(filter.is_spam("http://example.com free crypto"));
        assert!(filter.is_spam("see HTTPS://example.com"));
    }

    #[test]
    fn test_long_digit_run() {
        let filter = SpamClassifier::new();
        assert!(filter.is_spam("Call me at 5551234567890"));
        assert!(!filter.is_spam("Call me at 555-123-4567"));
        assert!(!filter.is_spam("123456789 views already"));
    }

    #[test]
    fn test_wall_of_text() {
        let filter = SpamClassifier::new();
        assert!(filter.is_spam(&lorem(250)));
        assert!(filter.is_spam(&lorem(200)));
        assert!(!filter.is_spam(&lorem(199)));
    }

    #[test]
    fn test_all_decorative() {
        let filter = SpamClassifier::new();
        assert!(filter.is_spam("😀😀😀😀😀"));
        assert!(filter.is_spam("🔥 🔥\n🔥"));
        assert!(filter.is_spam("★"));
    }

    #[test]
    fn test_decoration_density() {
        let filter = SpamClassifier::new();
        // 3 of 4 non-space characters are decorative
        assert!(filter.is_spam("a 😀😀😀"));
        // 2 of 4 is below the threshold
        assert!(!filter.is_spam("ab 😀😀"));
    }

    #[test]
    fn test_legit_comments() {
        let filter = SpamClassifier::new();
        assert!(!filter.is_spam("Great video 👍"));
        assert!(!filter.is_spam("This explained it better than my professor."));
        assert!(!filter.is_spam("I watched this 3 times"));
    }

    #[test]
    fn test_empty_and_whitespace() {
        let filter = SpamClassifier::new();
        assert!(!filter.is_spam(""));
        assert!(!filter.is_spam("   "));
        assert!(!filter.is_spam("\n\n"));
    }

    #[test]
    fn test_verdict_is_stable() {
        let filter = SpamClassifier::new();
        for text in ["check out my channel!!", "Great video 👍", ""] {
            assert_eq!(filter.is_spam(text), filter.is_spam(text));
        }
    }

    #[test]
    fn test_is_decorative() {
        assert!(is_decorative('😀'));
        assert!(is_decorative('👍'));
        assert!(is_decorative('⭐'));
        assert!(is_decorative('⬆'));
        assert!(is_decorative('🀄'));
        assert!(!is_decorative('a'));
        assert!(!is_decorative('!'));
        assert!(!is_decorative('é'));
    }

    #[test]
    fn test_accept_all() {
        assert!(!AcceptAll.is_spam("check out my channel"));
    }
}
