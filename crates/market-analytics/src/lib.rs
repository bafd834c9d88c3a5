//! Stock market analytics engine
//!
//! This crate turns historical closing prices for a fixed universe of
//! equities into the figures a market dashboard shows:
//!
//! - Data fetching from Yahoo Finance behind the [`MarketDataProvider`] trait
//! - Simple return series and date-aligned return tables
//! - Pearson correlation matrices
//! - Per-security risk metrics (Sharpe ratio, VaR, max drawdown, beta, win rate)
//! - Portfolio aggregates (weighted returns, diversification ratio)
//!
//! # Architecture
//!
//! [`AnalyticsEngine`] owns the price data for one [`Universe`]. Data is only
//! replaced by an explicit [`AnalyticsEngine::fetch`] (or by inserting fixture
//! series); every query takes a [`Selection`] and is a pure computation over
//! the data currently held. The computations themselves are free functions in
//! [`series`], [`metrics`], [`correlation`] and [`portfolio`].
//!
//! # Example
//!
//! ```rust,ignore
//! use market_analytics::{
//!     AnalyticsConfig, AnalyticsEngine, Selection, Universe, YahooFinanceClient,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AnalyticsConfig::default().with_env_overrides()?;
//!     let provider = Arc::new(YahooFinanceClient::new(config.requests_per_minute));
//!     let mut engine = AnalyticsEngine::new(Universe::major_stocks(), provider, config);
//!
//!     engine.fetch("2y".parse()?).await;
//!     engine.refresh_risk_free_rate().await;
//!
//!     for summary in engine.stock_summary(&Selection::all())? {
//!         println!("{}: Sharpe {:.2}", summary.name, summary.sharpe_ratio);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod correlation;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod metrics;
pub mod period;
pub mod portfolio;
pub mod series;
pub mod stats;
pub mod universe;

// Re-export main types for convenience
pub use api::{MarketDataProvider, YahooFinanceClient};
pub use config::AnalyticsConfig;
pub use correlation::{CorrelationMatrix, compute_correlation_matrix};
pub use engine::{AnalyticsEngine, DashboardSnapshot, NormalizedSeries};
pub use error::{AnalyticsError, Result};
pub use fetch::{FetchFailure, PriceHistory, fetch_price_history, fetch_risk_free_rate};
pub use metrics::{RiskReturnPoint, SecuritySummary, SharpeRating};
pub use period::LookbackPeriod;
pub use portfolio::{
    PortfolioMetrics, PortfolioSummary, PortfolioWeights, compute_portfolio_metrics,
};
pub use series::{
    AlignedReturns, PricePoint, PriceSeries, ReturnSeries, ReturnsMatrix, align_returns,
    compute_returns, compute_returns_matrix,
};
pub use universe::{Security, Selection, Universe};
