//! Unit tests for the comment fetcher

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::filter::{AcceptAll, SpamClassifier};
    use crate::source::{CommentItem, MockCommentSource, ScriptedSource};
    use futures_util::StreamExt;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn fetcher_over(source: Arc<ScriptedSource>) -> CommentFetcher {
        CommentFetcher::new(source).with_page_delay(Duration::from_millis(1))
    }

    fn page(items: &[(&str, u64)]) -> Vec<CommentItem> {
        items
            .iter()
            .map(|(text, likes)| CommentItem::new(*text, *likes))
            .collect()
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(normalize_text("line one<br>line two"), "line one\nline two");
        assert_eq!(normalize_text("a<BR/>b<br />c"), "a\nb\nc");
        assert_eq!(normalize_text("it&#39;s &quot;fine&quot;"), "it's \"fine\"");
        // Decoding happens first, so escaped markup becomes a break too
        assert_eq!(normalize_text("a&lt;br&gt;b"), "a\nb");
    }

    #[test]
    fn test_rank_is_stable() {
        let ranked = rank_by_engagement(
            vec![
                RawComment::new("a", 1),
                RawComment::new("b", 5),
                RawComment::new("c", 1),
                RawComment::new("d", 5),
            ],
            10,
        );
        let texts: Vec<_> = ranked.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_rank_truncates() {
        let ranked = rank_by_engagement(
            (0..10).map(|i| RawComment::new(format!("c{}", i), i)).collect(),
            3,
        );
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].engagement, 9);
    }

    #[tokio::test]
    async fn test_fetch_filters_and_ranks() {
        let source = Arc::new(ScriptedSource::new(vec![
            page(&[("Loved it", 3), ("check out my channel!!", 100), ("So useful", 10)]),
            page(&[("😀😀😀😀😀", 50), ("Meh &amp; meh", 7)]),
        ]));
        let fetcher = fetcher_over(source.clone());

        let comments = fetcher
            .fetch("vid", &SpamClassifier::new(), FetchBudget::default())
            .await
            .unwrap();

        let texts: Vec<_> = comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["So useful", "Meh & meh", "Loved it"]);
        assert_eq!(source.requests(), 2);
    }

    #[tokio::test]
    async fn test_fetch_stops_at_max_fetch() {
        let source = Arc::new(ScriptedSource::new(vec![
            page(&[("a", 1), ("b", 2), ("c", 3)]),
            page(&[("d", 4), ("e", 5), ("f", 6)]),
            page(&[("g", 7)]),
        ]));
        let fetcher = fetcher_over(source.clone());

        let comments = fetcher
            .fetch("vid", &AcceptAll, FetchBudget::new(4, 200))
            .await
            .unwrap();

        // Stops mid-page on the fourth comment, the third page is never requested
        assert_eq!(comments.len(), 4);
        assert_eq!(comments[0].text, "d");
        assert_eq!(source.requests(), 2);
    }

    #[tokio::test]
    async fn test_fetch_respects_both_caps() {
        let pages: Vec<Vec<CommentItem>> = (0..5)
            .map(|p| {
                (0..10)
                    .map(|i| CommentItem::new(format!("comment {} {}", p, i), (p * 10 + i) % 7))
                    .collect()
            })
            .collect();

        for (max_fetch, max_return) in [(25, 10), (5, 10), (100, 100), (0, 10)] {
            let source = Arc::new(ScriptedSource::new(pages.clone()));
            let comments = fetcher_over(source)
                .fetch("vid", &AcceptAll, FetchBudget::new(max_fetch, max_return))
                .await
                .unwrap();

            assert!(comments.len() <= max_fetch.min(max_return));
            assert!(comments
                .windows(2)
                .all(|w| w[0].engagement >= w[1].engagement));
        }
    }

    #[tokio::test]
    async fn test_zero_budget_makes_no_requests() {
        let source = Arc::new(ScriptedSource::new(vec![page(&[("a", 1)])]));
        let comments = fetcher_over(source.clone())
            .fetch("vid", &AcceptAll, FetchBudget::new(0, 200))
            .await
            .unwrap();
        assert!(comments.is_empty());
        assert_eq!(source.requests(), 0);
    }

    #[tokio::test]
    async fn test_error_discards_partial_results() {
        let source = Arc::new(
            ScriptedSource::new(vec![page(&[("a", 1)]), page(&[("b", 2)]), page(&[("c", 3)])])
                .failing_at(1),
        );
        let result = fetcher_over(source.clone())
            .fetch("vid", &AcceptAll, FetchBudget::default())
            .await;

        assert!(matches!(result, Err(AnalyzerError::SourceUnavailable(_))));
        assert_eq!(source.requests(), 2);
    }

    #[tokio::test]
    async fn test_cancel_between_pages() {
        let source = Arc::new(ScriptedSource::new(vec![
            page(&[("a", 1)]),
            page(&[("b", 2)]),
            page(&[("c", 3)]),
        ]));
        let fetcher = fetcher_over(source.clone());
        let probe = source.clone();

        let result = fetcher
            .fetch_until("vid", &AcceptAll, FetchBudget::default(), || {
                probe.requests() >= 1
            })
            .await;

        assert!(matches!(result, Err(AnalyzerError::Cancelled)));
        assert_eq!(source.requests(), 1);
    }

    #[tokio::test]
    async fn test_cancel_during_page_delay() {
        let source = Arc::new(ScriptedSource::new(vec![
            page(&[("a", 1)]),
            page(&[("b", 2)]),
            page(&[("c", 3)]),
        ]));
        let fetcher = CommentFetcher::new(source.clone())
            .with_page_delay(Duration::from_millis(200));
        let cancelled = AtomicBool::new(false);

        let (result, _) = tokio::join!(
            fetcher.fetch_until("vid", &AcceptAll, FetchBudget::default(), || {
                cancelled.load(Ordering::SeqCst)
            }),
            async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                cancelled.store(true, Ordering::SeqCst);
            }
        );

        assert!(matches!(result, Err(AnalyzerError::Cancelled)));
        assert_eq!(source.requests(), 1);
    }

    #[tokio::test]
    async fn test_empty_source() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let comments = fetcher_over(source.clone())
            .fetch("vid", &SpamClassifier::new(), FetchBudget::default())
            .await
            .unwrap();
        assert!(comments.is_empty());
        assert_eq!(source.requests(), 1);
    }

    #[tokio::test]
    async fn test_pages_stream_ends_without_token() {
        let source = Arc::new(ScriptedSource::new(vec![
            page(&[("a", 1)]),
            page(&[("b", 2)]),
        ]));
        let fetcher = fetcher_over(source);

        let pages: Vec<_> = fetcher.pages("vid").collect().await;
        assert_eq!(pages.len(), 2);
        assert!(pages.iter().all(|p| p.is_ok()));
    }

    #[tokio::test]
    async fn test_requests_relevance_pages_of_100() {
        let mut source = MockCommentSource::new();
        source
            .expect_comment_page()
            .withf(|video_id, token, max_results, order| {
                video_id.to_string() == "dQw4w9WgXcQ"
                    && token.is_none()
                    && *max_results == 100
                    && *order == CommentOrder::Relevance
            })
            .times(1)
            .returning(|_, _, _, _| {
                Ok(CommentPage {
                    items: vec![CommentItem::new("Great video 👍", 4)],
                    next_page_token: None,
                })
            });

        let fetcher = CommentFetcher::new(Arc::new(source));
        let comments = fetcher
            .fetch("dQw4w9WgXcQ", &SpamClassifier::new(), FetchBudget::default())
            .await
            .unwrap();

        assert_eq!(comments, vec![RawComment::new("Great video 👍", 4)]);
    }

    #[test]
    fn test_page_delay_is_positive() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let fetcher = CommentFetcher::new(source).with_page_delay(Duration::ZERO);
        assert!(fetcher.page_delay() > Duration::ZERO);
    }
}
