use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use strike_monitor::history::ScanRecord;
use strike_monitor::ingest::providers::{GoogleNewsProvider, NewsDataProvider};
use strike_monitor::{
    DecisionPolicy, Monitor, MonitorConfig, MonitorError, NewsSource, RawEntry, SignalRules, Tier,
};

const GOOGLE_XML: &str = include_str!("fixtures/google_news_rss.xml");
const NEWSDATA_JSON: &str = include_str!("fixtures/newsdata_latest.json");

const QUIET_XML: &str = r#"<rss version="2.0"><channel>
  <item>
    <title>Markets close higher on Friday</title>
    <link>https://news.google.com/rss/articles/q1</link>
    <pubDate>Thu, 16 Oct 2025 11:00:00 GMT</pubDate>
    <source url="https://www.reuters.com">Reuters</source>
  </item>
</channel></rss>"#;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 16, 12, 0, 0).unwrap()
}

fn setup() -> (MonitorConfig, Arc<SignalRules>) {
    let cfg = MonitorConfig::builtin().unwrap();
    let rules = Arc::new(SignalRules::compile(&cfg).unwrap());
    (cfg, rules)
}

/// Wraps a source and counts calls; optionally fails the first one.
struct Counting {
    inner: Box<dyn NewsSource>,
    calls: Arc<AtomicUsize>,
    fail_first: bool,
}

impl Counting {
    fn new(inner: Box<dyn NewsSource>, calls: Arc<AtomicUsize>) -> Self {
        Self {
            inner,
            calls,
            fail_first: false,
        }
    }
}

#[async_trait]
impl NewsSource for Counting {
    async fn search(&self, query: &str) -> Result<Vec<RawEntry>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_first && n == 0 {
            return Err(anyhow!("connection reset"));
        }
        self.inner.search(query).await
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

#[tokio::test]
async fn primary_only_cycle_dedups_and_filters() {
    let (cfg, rules) = setup();
    let calls = Arc::new(AtomicUsize::new(0));
    let primary = Counting::new(Box::new(GoogleNewsProvider::from_fixture(GOOGLE_XML)), calls.clone());
    let monitor = Monitor::new(&cfg, rules, Box::new(primary));

    let report = monitor.check_once_at(now()).await.unwrap();

    // one call per configured query, same items every time
    let n = cfg.search.rss_queries.len();
    assert_eq!(calls.load(Ordering::SeqCst), n);
    assert_eq!(report.poll.queries, n);
    assert_eq!(report.poll.errors, 0);
    // polymarket + linkless per query; 4 repeated links from the 2nd query on
    assert_eq!(report.poll.ignored, 2 * n);
    assert_eq!(report.poll.duplicates, 4 * (n - 1));
    // polymarket item ignored, linkless item dropped
    assert_eq!(report.total_scanned, 4);
    // Monday's item is outside 24h; the undated one fails open
    assert_eq!(report.total_recent, 3);
    assert_eq!(report.articles.len(), 3);
    assert!(!report.secondary_used);

    assert_eq!(report.articles[0].article.link, "https://news.google.com/rss/articles/g1");
    assert_eq!(report.total_with_signal(), 1);
    assert_eq!(report.decision.tier, Tier::SingleCredible);
    assert_eq!(report.decision.reason, "Early signal from reuters");
}

#[tokio::test]
async fn secondary_confirms_and_is_deduplicated() {
    let (cfg, rules) = setup();
    let calls = Arc::new(AtomicUsize::new(0));
    let secondary =
        Counting::new(Box::new(NewsDataProvider::from_fixture(NEWSDATA_JSON)), calls.clone());
    let monitor = Monitor::new(&cfg, rules, Box::new(GoogleNewsProvider::from_fixture(GOOGLE_XML)))
        .with_secondary(Box::new(secondary));

    let report = monitor.check_once_at(now()).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(report.secondary_used);
    // primary counts are untouched by the secondary
    assert_eq!(report.total_scanned, 4);
    assert_eq!(report.total_recent, 3);
    // bbc article added; the repeated g1 link and the kalshi item are not
    assert_eq!(report.articles.len(), 4);
    let g1 = report
        .articles
        .iter()
        .filter(|a| a.article.link == "https://news.google.com/rss/articles/g1")
        .count();
    assert_eq!(g1, 1);

    assert!(report.decision.result);
    assert_eq!(report.decision.tier, Tier::MultipleCredible);
    assert_eq!(report.decision.reason, "2 credible sources reporting");
    // equal scores keep arrival order: primary first
    assert_eq!(report.decision.top_articles[0].source(), "reuters");
    assert_eq!(report.decision.top_articles[1].source(), "bbc");
}

#[tokio::test]
async fn secondary_skipped_without_positive_primary() {
    let (cfg, rules) = setup();
    let calls = Arc::new(AtomicUsize::new(0));
    let secondary =
        Counting::new(Box::new(NewsDataProvider::from_fixture(NEWSDATA_JSON)), calls.clone());
    let monitor = Monitor::new(&cfg, rules, Box::new(GoogleNewsProvider::from_fixture(QUIET_XML)))
        .with_secondary(Box::new(secondary));

    let report = monitor.check_once_at(now()).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!report.secondary_used);
    assert!(!report.decision.result);
    assert_eq!(report.decision.reason, "No relevant articles found");
}

#[tokio::test]
async fn failing_query_does_not_abort_cycle() {
    let (cfg, rules) = setup();
    let calls = Arc::new(AtomicUsize::new(0));
    let primary = Counting {
        inner: Box::new(GoogleNewsProvider::from_fixture(GOOGLE_XML)),
        calls: calls.clone(),
        fail_first: true,
    };
    let monitor = Monitor::new(&cfg, rules, Box::new(primary));

    let report = monitor.check_once_at(now()).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), cfg.search.rss_queries.len());
    assert_eq!(report.total_scanned, 4);
    assert_eq!(report.poll.errors, 1);
    assert!(report.decision.result);

    let record = ScanRecord::from_report(&report, now());
    assert_eq!(record.failed_queries, 1);
}

#[tokio::test]
async fn everything_stale_means_nothing_scored() {
    let (cfg, rules) = setup();
    let monitor = Monitor::new(&cfg, rules, Box::new(GoogleNewsProvider::from_fixture(GOOGLE_XML)));

    let later = Utc.with_ymd_and_hms(2025, 10, 20, 12, 0, 0).unwrap();
    let report = monitor.check_once_at(later).await.unwrap();

    // only the undated item survives the window
    assert_eq!(report.total_scanned, 4);
    assert_eq!(report.total_recent, 1);
    assert!(!report.decision.result);
}

struct Unfinished;

impl DecisionPolicy for Unfinished {
    fn name(&self) -> &'static str {
        "unfinished"
    }
}

#[tokio::test]
async fn unimplemented_policy_is_fatal() {
    let (cfg, rules) = setup();
    let monitor = Monitor::new(&cfg, rules, Box::new(GoogleNewsProvider::from_fixture(GOOGLE_XML)))
        .with_policy(Box::new(Unfinished));

    let err = monitor.check_once_at(now()).await.unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(err, MonitorError::PolicyNotImplemented("unfinished")));
}
