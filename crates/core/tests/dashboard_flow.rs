use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tickerlens_core::analysis::sentiment::LexiconScorer;
use tickerlens_core::dashboard::Dashboard;
use tickerlens_core::domain::dashboard::{DashboardOutcome, Momentum, Sentiment, Valuation};
use tickerlens_core::domain::stock::{SectorBenchmarks, StockRecord};
use tickerlens_core::ingest::provider::{FinancialsSource, InterestSource, NewsSource};
use tickerlens_core::reference::ReferenceStore;

#[derive(Default)]
struct Calls {
    news: AtomicUsize,
    interest: AtomicUsize,
    financials: AtomicUsize,
    order: Mutex<Vec<&'static str>>,
}

impl Calls {
    fn record(&self, counter: &AtomicUsize, source: &'static str) {
        counter.fetch_add(1, Ordering::SeqCst);
        self.order.lock().unwrap().push(source);
    }

    fn order(&self) -> Vec<&'static str> {
        self.order.lock().unwrap().clone()
    }

    fn total(&self) -> usize {
        self.news.load(Ordering::SeqCst)
            + self.interest.load(Ordering::SeqCst)
            + self.financials.load(Ordering::SeqCst)
    }
}

struct FakeNews {
    calls: Arc<Calls>,
    titles: Option<Vec<String>>,
}

#[async_trait::async_trait]
impl NewsSource for FakeNews {
    fn provider_name(&self) -> &'static str {
        "fake_news"
    }

    async fn fetch_headlines(&self, _stock_name: &str, limit: usize) -> anyhow::Result<Vec<String>> {
        self.calls.record(&self.calls.news, "news");
        match &self.titles {
            Some(t) => Ok(t.iter().take(limit).cloned().collect()),
            None => anyhow::bail!("connection reset"),
        }
    }
}

struct FakeInterest {
    calls: Arc<Calls>,
    samples: Option<Vec<Option<f64>>>,
}

#[async_trait::async_trait]
impl InterestSource for FakeInterest {
    fn provider_name(&self) -> &'static str {
        "fake_interest"
    }

    async fn fetch_interest(&self, _query: &str) -> anyhow::Result<Vec<Option<f64>>> {
        self.calls.record(&self.calls.interest, "interest");
        self.samples
            .clone()
            .ok_or_else(|| anyhow::anyhow!("429 Too Many Requests"))
    }
}

struct FakeFinancials {
    calls: Arc<Calls>,
    html: Option<String>,
}

#[async_trait::async_trait]
impl FinancialsSource for FakeFinancials {
    fn provider_name(&self) -> &'static str {
        "fake_financials"
    }

    async fn fetch_financials_page(&self, _ticker: &str) -> anyhow::Result<String> {
        self.calls.record(&self.calls.financials, "financials");
        self.html
            .clone()
            .ok_or_else(|| anyhow::anyhow!("operation timed out"))
    }
}

const INCOME_TABLE: &str = r#"<table>
  <tr><th></th><th>Mar 2024</th><th>Jun 2024</th></tr>
  <tr><td>Sales +</td><td>100</td><td>120</td></tr>
  <tr><td>Expenses +</td><td>60</td><td>70</td></tr>
  <tr><td>Profit before tax</td><td>40</td><td>50</td></tr>
  <tr><td>Tax %</td><td>25%</td><td>25%</td></tr>
</table>"#;

fn store() -> Arc<ReferenceStore> {
    Arc::new(ReferenceStore::new(
        vec![
            StockRecord::new("Reliance Industries", "RELIANCE.NS", "24.1", "Oil"),
            StockRecord::new("Asian Paints", "ASIANPAINT.NS", "N/A", "Paints"),
            StockRecord::new("Orphan Holdings", "", "10", "Others"),
        ],
        SectorBenchmarks::default(),
    ))
}

fn healthy(calls: &Arc<Calls>) -> Dashboard {
    Dashboard::new(
        store(),
        Arc::new(FakeNews {
            calls: calls.clone(),
            titles: Some(vec![
                "Reliance shares surge to record high".to_string(),
                "Reliance profit jumps on strong refining margins".to_string(),
            ]),
        }),
        Arc::new(FakeInterest {
            calls: calls.clone(),
            samples: Some(vec![Some(60.0), Some(62.0), Some(58.0), Some(80.0), Some(90.0), Some(95.0), Some(100.0)]),
        }),
        Arc::new(FakeFinancials {
            calls: calls.clone(),
            html: Some(INCOME_TABLE.to_string()),
        }),
        Arc::new(LexiconScorer),
    )
}

fn degraded(calls: &Arc<Calls>) -> Dashboard {
    Dashboard::new(
        store(),
        Arc::new(FakeNews {
            calls: calls.clone(),
            titles: None,
        }),
        Arc::new(FakeInterest {
            calls: calls.clone(),
            samples: None,
        }),
        Arc::new(FakeFinancials {
            calls: calls.clone(),
            html: None,
        }),
        Arc::new(LexiconScorer),
    )
}

#[tokio::test]
async fn unknown_stock_makes_no_network_calls() {
    let calls = Arc::new(Calls::default());
    let dashboard = healthy(&calls);

    let outcome = dashboard.build("Quantum Widgets Unlimited").await;
    assert_eq!(outcome, DashboardOutcome::NotFound);
    assert_eq!(outcome.error_message(), Some("Stock not found."));
    assert_eq!(calls.total(), 0);
    assert!(calls.order().is_empty());

    assert_eq!(dashboard.build("   ").await, DashboardOutcome::NotFound);
    assert_eq!(calls.total(), 0);
}

#[tokio::test]
async fn resolved_stock_aggregates_every_source_once() {
    let calls = Arc::new(Calls::default());
    let dashboard = healthy(&calls);

    let DashboardOutcome::Ready(result) = dashboard.build("reliance industries").await else {
        panic!("expected a dashboard");
    };

    assert_eq!(calls.news.load(Ordering::SeqCst), 1);
    assert_eq!(calls.interest.load(Ordering::SeqCst), 1);
    assert_eq!(calls.financials.load(Ordering::SeqCst), 1);
    assert_eq!(calls.order(), vec!["news", "interest", "financials"]);

    assert_eq!(result.name, "Reliance Industries");
    assert_eq!(result.pe_ratio, "24.1");
    assert_eq!(result.valuation, Valuation::Fair);
    assert_eq!(result.sentiment, Sentiment::Positive);
    assert_eq!(result.score, 8.5);
    assert_eq!(result.score_display(), "8.5/10");
    assert_eq!(result.momentum, Momentum::StrongUptrend.label());
    assert_eq!(result.revenue_growth, "+20.0% QoQ (Jun 2024)");
    assert_eq!(result.profit_growth, "+25.0% QoQ (Jun 2024)");
    assert_eq!(result.sector_name, "Oil");
    assert_eq!(result.sector_pe, "22.0");
    assert_eq!(result.headlines.len(), 2);
    assert!(!result.last_updated.is_empty());
}

#[tokio::test]
async fn failing_sources_degrade_to_sentinels() {
    let calls = Arc::new(Calls::default());
    let dashboard = degraded(&calls);

    let DashboardOutcome::Ready(result) = dashboard.build("Asian Paints").await else {
        panic!("expected a dashboard");
    };

    assert_eq!(calls.order(), vec!["news", "interest", "financials"]);
    assert_eq!(result.pe_ratio, "N/A");
    assert_eq!(result.valuation, Valuation::NotAvailable);
    assert_eq!(result.headlines, vec!["News unavailable.".to_string()]);
    assert_eq!(result.sentiment, Sentiment::Neutral);
    assert_eq!(result.score_display(), "6.0/10");
    assert_eq!(result.momentum, "Unavailable");
    assert_eq!(result.revenue_growth, "Unavailable");
    assert_eq!(result.profit_growth, "Unavailable");
    assert_eq!(result.sector_name, "Paints");
    assert_eq!(result.sector_pe, "52.3");
}

#[tokio::test]
async fn row_without_ticker_is_a_generic_failure() {
    let calls = Arc::new(Calls::default());
    let dashboard = healthy(&calls);

    let outcome = dashboard.build("Orphan Holdings").await;
    assert_eq!(outcome, DashboardOutcome::Failed);
    assert_eq!(outcome.error_message(), Some("Something went wrong."));
    assert_eq!(calls.total(), 0);
}
