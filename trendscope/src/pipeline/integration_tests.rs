//! End-to-end tests: document source through scheduler, cascade,
//! classification and aggregation.

#[cfg(test)]
mod tests {
    use crate::cancellation::CancellationToken;
    use crate::classify::CategoryLabel;
    use crate::config::TrendscopeConfig;
    use crate::pipeline::{run_passes, ExtractionPass, NormalizedTrend};
    use crate::scheduler::{ConcurrencySlotManager, SchedulerConfig};
    use crate::testing::{trending_page, trending_table, FixtureSource, RecordingEmitter, ScriptedRandom, TrendRow};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;
    use tokio_test::assert_ok;

    fn pass(max_concurrent: usize) -> ExtractionPass {
        let config = SchedulerConfig::default().with_max_concurrent_requests(max_concurrent);
        let scheduler =
            ConcurrencySlotManager::with_random(config, Box::new(ScriptedRandom::new([0.0]))).unwrap();
        ExtractionPass::new(scheduler)
    }

    fn find<'a>(trends: &'a [NormalizedTrend], title: &str) -> Option<&'a NormalizedTrend> {
        trends.iter().find(|t| t.title == title)
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_page_end_to_end() {
        let page = trending_page(
            &[
                TrendRow::new("cardi bcardi b", "50K+ searches · 3h ago"),
                TrendRow::new("rust", "20K+ searches · 1h ago"),
                TrendRow::new("Search termquery_statsExplore", "1K+ searches · 9h ago"),
            ],
            &["Robert Irwin"],
        );
        let source = FixtureSource::new("realtime", page);
        let cancel = CancellationToken::new();

        let trends = pass(2).run(&source, &cancel).await.unwrap();

        let cardi = find(&trends, "cardi bcardi b").unwrap();
        assert_eq!(cardi.volume, "50K+");
        assert_eq!(cardi.time_ago, "3h ago");
        assert_eq!(cardi.position, 1);
        assert_eq!(cardi.source_tag, "selector_1");

        let rust = find(&trends, "rust").unwrap();
        assert_eq!(rust.position, 2);
        assert!(rust.has_label(CategoryLabel::Niche));
        assert!(rust.relevance_score >= 10);

        let person = find(&trends, "Robert Irwin").unwrap();
        assert!(person.has_label(CategoryLabel::Person));
        assert!(!person.has_label(CategoryLabel::General));
        assert_eq!(person.volume, "N/A");

        for nav in ["Home", "Explore", "Sign in", "", "Search termquery_statsExplore"] {
            assert!(find(&trends, nav).is_none(), "{nav:?} leaked");
        }
        assert!(trends.iter().all(|t| !t.categories.is_empty()));

        let positions: Vec<usize> = trends.iter().map(|t| t.position).collect();
        let expected: Vec<usize> = (1..=trends.len()).collect();
        assert_eq!(positions, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_passes_are_merged_first_occurrence_wins() {
        let sources = vec![
            FixtureSource::new(
                "realtime",
                trending_table(&[
                    TrendRow::new("svelte 5", "10K+ searches · 2h ago"),
                    TrendRow::new("bun 1.2", "5K+ searches · 45m ago"),
                ]),
            ),
            FixtureSource::new(
                "daily",
                trending_table(&[
                    TrendRow::new("BUN 1.2", "99K+ searches · 1h ago"),
                    TrendRow::new("deno 2", "2K+ searches · 4h ago"),
                ]),
            ),
        ];
        let cancel = CancellationToken::new();

        let result = run_passes(&pass(2), &sources, &cancel, 10).await.unwrap();

        let bun: Vec<&NormalizedTrend> = result
            .data
            .iter()
            .filter(|t| t.title.eq_ignore_ascii_case("bun 1.2"))
            .collect();
        assert_eq!(bun.len(), 1);
        assert_eq!(bun[0].title, "bun 1.2");
        assert_eq!(bun[0].volume, "5K+");

        let titles: Vec<&str> = result.data.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(&titles[..3], &["svelte 5", "bun 1.2", "deno 2"]);
        assert!(result.metadata.unique_trends < result.metadata.total_trends);
        assert_eq!(result.metadata.returned_trends, result.data.len());

        let stats = result.metadata.scheduler.unwrap();
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.active_requests, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_source_contributes_nothing() {
        let emitter = Arc::new(RecordingEmitter::new());
        let pass = pass(2).with_emitter(emitter.clone());
        let sources = vec![
            FixtureSource::new("realtime", trending_table(&[TrendRow::new("kafka", "1K+ searches · 1h ago")])),
            FixtureSource::failing("daily", "navigation failed on every fallback URL"),
        ];
        let cancel = CancellationToken::new();

        let result = run_passes(&pass, &sources, &cancel, 25).await.unwrap();

        assert_eq!(result.data[0].title, "kafka");
        assert_eq!(pass.scheduler().active_requests(), 0);

        let events = emitter.events();
        assert!(events.contains(&"start:daily".to_string()));
        assert!(events.contains(&"end:realtime".to_string()));
        assert!(events.contains(&"error:daily:source".to_string()));

        let attributes = emitter.attributes();
        let realtime = attributes.iter().find(|a| a.pass_name == "realtime").unwrap();
        assert!(realtime.candidates.unwrap() >= 1);
        assert_eq!(realtime.trends, realtime.candidates);
        assert!(realtime.pass_id.is_some());

        // The failed pass got through pacing before its load failed.
        let daily = attributes.iter().find(|a| a.pass_name == "daily").unwrap();
        assert!(daily.delay_kind.is_some());
        assert_eq!(daily.candidates, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_aborts_the_call() {
        let pass = pass(1);
        let _held = pass.scheduler().try_acquire().unwrap();
        let sources = vec![FixtureSource::new("realtime", trending_table(&[TrendRow::new("vite", "")]))];

        let cancel = Arc::new(CancellationToken::new());
        let canceller = Arc::clone(&cancel);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            canceller.cancel("deadline");
        });

        let err = run_passes(&pass, &sources, &cancel, 25).await.unwrap_err();
        assert!(err.is_cancellation());
        assert_eq!(err.component(), "scheduler");
        assert_eq!(pass.scheduler().active_requests(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slot_bound_serializes_passes() {
        let pass = pass(1);
        let sources: Vec<FixtureSource> = (0..3)
            .map(|i| {
                FixtureSource::new(
                    &format!("pass-{i}"),
                    trending_table(&[TrendRow::new(&format!("topic {i}"), "1K+ searches · 1h ago")]),
                )
            })
            .collect();
        let cancel = CancellationToken::new();

        let start = Instant::now();
        let result = assert_ok!(run_passes(&pass, &sources, &cancel, 25).await);

        // Each pass holds the only slot through at least a 1500ms pause.
        assert!(start.elapsed() >= Duration::from_millis(3 * 1500));
        assert_eq!(pass.scheduler().stats().total_requests, 3);
        assert_eq!(pass.scheduler().active_requests(), 0);
        assert!(result.data.iter().any(|t| t.title == "topic 2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cap_holds_through_the_pass() {
        let rows: Vec<TrendRow> = (0..80)
            .map(|i| TrendRow::new(&format!("story {i}"), "1K+ searches · 1h ago"))
            .collect();
        let source = FixtureSource::new("realtime", trending_page(&rows, &["extra widget"]));
        let cancel = CancellationToken::new();

        let trends = pass(2).run(&source, &cancel).await.unwrap();
        assert_eq!(trends.len(), 25);
        assert!(find(&trends, "extra widget").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pass_from_config() {
        let config = TrendscopeConfig::from_json_str(
            r#"{
                "extraction": {"max_candidates": 2},
                "scheduler": {"max_concurrent_requests": 1},
                "taxonomy": {"niche_terms": ["zig"]}
            }"#,
        )
        .unwrap();
        let pass = ExtractionPass::from_config(&config).unwrap();
        let source = FixtureSource::new(
            "realtime",
            trending_table(&[
                TrendRow::new("zig 0.14", "1K+ searches · 1h ago"),
                TrendRow::new("rust 2", "1K+ searches · 1h ago"),
                TrendRow::new("odin", "1K+ searches · 1h ago"),
            ]),
        );

        let trends = pass.run(&source, &CancellationToken::new()).await.unwrap();
        assert_eq!(trends.len(), 2);
        assert!(trends[0].has_label(CategoryLabel::Niche));
        assert!(!trends[1].has_label(CategoryLabel::Niche));
    }

    #[cfg(feature = "html")]
    #[tokio::test(start_paused = true)]
    async fn test_html_snapshot_source() {
        use crate::pipeline::StaticMarkupSource;

        let markup = r#"
            <html><body>
              <div jscontroller="nav"><span>Home</span><span>Trends</span></div>
              <table role="grid"><tbody>
                <tr><td><span>langchain</span></td><td>3K+ searches · 6h ago</td></tr>
                <tr><td><span>+ nba finals</span></td><td>200K+ searches · 30m ago</td></tr>
              </tbody></table>
            </body></html>
        "#;
        let sources = vec![StaticMarkupSource::new("snapshot", markup)];
        let cancel = CancellationToken::new();

        let result = run_passes(&pass(2), &sources, &cancel, 25).await.unwrap();

        assert_eq!(result.data[0].title, "langchain");
        assert!(result.data[0].has_label(CategoryLabel::Niche));
        assert_eq!(result.data[1].title, "nba finals");
        assert_eq!(result.data[1].volume, "200K+");
        assert_eq!(result.data[1].time_ago, "30m ago");
        assert!(result.data[1].has_label(CategoryLabel::Sports));
        assert!(!result.data.iter().any(|t| t.title == "Home" || t.title == "Trends"));
    }
}
