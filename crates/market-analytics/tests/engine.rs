//! End-to-end engine tests against an in-memory provider

use async_trait::async_trait;
use chrono::NaiveDate;
use market_analytics::{
    AnalyticsConfig, AnalyticsEngine, AnalyticsError, LookbackPeriod, MarketDataProvider,
    PortfolioWeights, PricePoint, Result, Security, Selection, Universe,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Serves canned closes per symbol; unknown symbols fail like a network error
struct FixtureProvider {
    closes: HashMap<&'static str, Vec<f64>>,
}

impl FixtureProvider {
    fn new() -> Self {
        let mut closes = HashMap::new();
        closes.insert("AAPL", vec![100.0, 101.0, 103.0, 102.0, 104.0, 107.0, 106.0, 108.0]);
        closes.insert("MSFT", vec![200.0, 203.0, 205.0, 204.0, 209.0, 212.0, 210.0, 215.0]);
        closes.insert("JNJ", vec![150.0, 149.0, 151.0, 150.5, 150.0, 149.0, 151.5, 152.0]);
        closes.insert("SPY", vec![400.0, 402.0, 405.0, 403.0, 407.0, 410.0, 409.0, 412.0]);
        closes.insert("^TNX", vec![4.21, 4.18, 4.25]);
        Self { closes }
    }
}

fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|d| d.checked_add_days(chrono::Days::new(offset)))
        .expect("valid fixture date")
}

#[async_trait]
impl MarketDataProvider for FixtureProvider {
    async fn get_history(&self, symbol: &str, _period: LookbackPeriod) -> Result<Vec<PricePoint>> {
        let closes = self
            .closes
            .get(symbol)
            .ok_or_else(|| AnalyticsError::YahooFinanceError(format!("unknown symbol {symbol}")))?;

        // newest first, as some providers return them
        Ok(closes
            .iter()
            .enumerate()
            .rev()
            .map(|(i, &close)| PricePoint::new(day(i as u64), close))
            .collect())
    }
}

fn universe() -> Universe {
    Universe::new(vec![
        Security::new("Apple", "AAPL"),
        Security::new("Microsoft", "MSFT"),
        Security::new("Johnson & Johnson", "JNJ"),
        Security::new("Tesla", "TSLA"),
    ])
    .expect("unique names")
}

async fn loaded_engine() -> AnalyticsEngine {
    let mut engine = AnalyticsEngine::new(
        universe(),
        Arc::new(FixtureProvider::new()),
        AnalyticsConfig::builder()
            .beta_min_observations(5)
            .build()
            .expect("valid config"),
    );
    assert!(engine.fetch(LookbackPeriod::TwoYears).await);
    engine.refresh_risk_free_rate().await;
    engine
}

#[tokio::test]
async fn test_fetch_skips_unavailable_security() {
    let engine = loaded_engine().await;

    assert_eq!(engine.loaded_names(), vec!["Apple", "Microsoft", "Johnson & Johnson"]);
    assert_eq!(engine.failures().len(), 1);
    assert_eq!(engine.failures()[0].symbol, "TSLA");
    assert!((engine.risk_free_rate() - 0.0425).abs() < 1e-12);
}

#[tokio::test]
async fn test_stock_summary() {
    let engine = loaded_engine().await;
    let summary = engine.stock_summary(&Selection::all()).unwrap();

    assert_eq!(summary.len(), 3);
    let apple = &summary[0];
    assert_eq!(apple.symbol, "AAPL");
    assert_eq!(apple.current_price, 108.0);
    assert!((apple.total_return - 8.0).abs() < 1e-9);
    assert_eq!(apple.trading_days, 7);
    assert!(apple.max_drawdown < 0.0);
    assert!(apple.beta.is_some());
    assert!(summary.iter().all(|s| (0.0..=100.0).contains(&s.win_rate)));
}

#[tokio::test]
async fn test_correlation_and_portfolio() {
    let engine = loaded_engine().await;
    let selection = Selection::of(["Apple", "Microsoft"]);

    let corr = engine.correlation_matrix(&selection).unwrap();
    assert_eq!(corr.get("Apple", "Apple"), Some(1.0));
    assert_eq!(corr.get("Apple", "Microsoft"), corr.get("Microsoft", "Apple"));

    let summary = engine.portfolio_summary(&selection, None).unwrap();
    assert_eq!(summary.portfolio_size, 2);
    assert_eq!(summary.data_points, 7);
    assert_eq!(summary.total_observations, 14);
    assert_eq!(summary.avg_correlation, corr.get("Apple", "Microsoft").unwrap());
    assert!(summary.metrics.portfolio_max_drawdown <= 0.0);
    assert!(summary.metrics.diversification_ratio >= 1.0 - 1e-12);
}

#[tokio::test]
async fn test_custom_weights_change_portfolio() {
    let engine = loaded_engine().await;
    let selection = Selection::of(["Apple", "Johnson & Johnson"]);

    let equal = engine.portfolio_metrics(&selection, None).unwrap();
    let tilted = engine
        .portfolio_metrics(&selection, Some(&PortfolioWeights::new(vec![0.9, 0.1])))
        .unwrap();
    assert!(tilted.portfolio_return > equal.portfolio_return);
}

#[test]
fn test_snapshot_json() {
    let engine = tokio_test::block_on(loaded_engine());
    let snapshot = engine.snapshot(&Selection::all(), None).unwrap();
    let json = serde_json::to_string(&snapshot).unwrap();

    assert!(json.contains("\"period\":\"2y\""));
    assert!(json.contains("\"TSLA\""));
    assert_eq!(snapshot.normalized.len(), 3);
}
