//! Analytics engine: owns the fetched price data and answers queries over
//! any subset of it.

use crate::api::MarketDataProvider;
use crate::config::AnalyticsConfig;
use crate::correlation::{CorrelationMatrix, compute_correlation_matrix};
use crate::error::{AnalyticsError, Result};
use crate::fetch::{FetchFailure, fetch_price_history, fetch_risk_free_rate, fetch_series};
use crate::metrics::{RiskReturnPoint, SecuritySummary, summarize_security};
use crate::period::LookbackPeriod;
use crate::portfolio::{
    PortfolioMetrics, PortfolioSummary, PortfolioWeights, compute_portfolio_metrics,
};
use crate::series::{
    PricePoint, PriceSeries, ReturnSeries, ReturnsMatrix, align_returns, compute_returns,
    compute_returns_matrix, normalized_prices,
};
use crate::universe::{Security, Selection, Universe};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Base level for rebased price charts
pub const NORMALIZED_BASE: f64 = 100.0;

/// Closes of one security rebased to a common starting level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSeries {
    pub name: String,
    pub symbol: String,
    pub points: Vec<PricePoint>,
}

/// Everything a dashboard renders for one selection
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub period: Option<LookbackPeriod>,
    pub risk_free_rate: f64,
    pub securities: Vec<SecuritySummary>,
    pub risk_return: Vec<RiskReturnPoint>,
    pub normalized: Vec<NormalizedSeries>,
    /// Absent for fewer than two securities
    pub correlation: Option<CorrelationMatrix>,
    /// Absent for fewer than two securities
    pub portfolio: Option<PortfolioSummary>,
    pub failures: Vec<FetchFailure>,
}

/// Stateful holder of price data for a fixed universe.
///
/// Data only changes through [`fetch`](Self::fetch) or the explicit
/// setters; every query is a pure computation over the current data and
/// takes the subset it applies to as a parameter.
pub struct AnalyticsEngine {
    universe: Universe,
    provider: Arc<dyn MarketDataProvider>,
    config: AnalyticsConfig,
    prices: HashMap<String, PriceSeries>,
    benchmark: Option<PriceSeries>,
    risk_free_rate: f64,
    period: Option<LookbackPeriod>,
    failures: Vec<FetchFailure>,
}

impl AnalyticsEngine {
    /// Create an engine with no data loaded.
    ///
    /// The risk-free rate starts at the configured fallback until
    /// [`refresh_risk_free_rate`](Self::refresh_risk_free_rate) runs.
    pub fn new(
        universe: Universe,
        provider: Arc<dyn MarketDataProvider>,
        config: AnalyticsConfig,
    ) -> Self {
        let risk_free_rate = config.risk_free_fallback;
        Self {
            universe,
            provider,
            config,
            prices: HashMap::new(),
            benchmark: None,
            risk_free_rate,
            period: None,
            failures: Vec::new(),
        }
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    /// Period of the last fetch, if any
    pub fn period(&self) -> Option<LookbackPeriod> {
        self.period
    }

    /// Securities skipped by the last fetch
    pub fn failures(&self) -> &[FetchFailure] {
        &self.failures
    }

    /// Names with loaded data, in universe order
    pub fn loaded_names(&self) -> Vec<&str> {
        self.universe
            .names()
            .filter(|name| self.prices.contains_key(*name))
            .collect()
    }

    /// Replace all price data with a fresh fetch of the universe and benchmark.
    ///
    /// Returns true when at least one security was retrieved.
    pub async fn fetch(&mut self, period: LookbackPeriod) -> bool {
        let history = fetch_price_history(
            self.provider.as_ref(),
            &self.universe,
            period,
            self.config.fetch_concurrency,
        )
        .await;

        let benchmark =
            fetch_series(self.provider.as_ref(), &self.config.benchmark_symbol, period).await;
        self.benchmark = match benchmark {
            Ok(series) => Some(series),
            Err(e) => {
                warn!(
                    "Benchmark {} unavailable, beta disabled: {}",
                    self.config.benchmark_symbol, e
                );
                None
            }
        };

        let success = history.success();
        info!(
            "Loaded {} of {} securities for period {}",
            history.series.len(),
            self.universe.len(),
            period
        );

        self.prices = history.series;
        self.failures = history.failures;
        self.period = Some(period);
        success
    }

    /// Fetch the current risk-free rate, keeping it for later queries
    pub async fn refresh_risk_free_rate(&mut self) -> f64 {
        self.risk_free_rate = fetch_risk_free_rate(self.provider.as_ref(), &self.config).await;
        self.risk_free_rate
    }

    /// Load a series directly, replacing any existing data for `name`
    pub fn insert_series(&mut self, name: &str, series: PriceSeries) -> Result<()> {
        if !self.universe.contains(name) {
            return Err(AnalyticsError::UnknownSecurity(name.to_string()));
        }
        self.prices.insert(name.to_string(), series);
        Ok(())
    }

    /// Set or clear the benchmark used for beta
    pub fn set_benchmark(&mut self, series: Option<PriceSeries>) {
        self.benchmark = series;
    }

    pub fn set_risk_free_rate(&mut self, rate: f64) {
        self.risk_free_rate = rate;
    }

    /// Loaded series matching `selection`, in universe order.
    ///
    /// Unknown names are an error; known names without data are skipped.
    pub fn price_series(&self, selection: &Selection) -> Result<Vec<(&Security, &PriceSeries)>> {
        if let Selection::Only(names) = selection {
            if let Some(unknown) = names.iter().find(|n| !self.universe.contains(n)) {
                return Err(AnalyticsError::UnknownSecurity(unknown.clone()));
            }
        }

        Ok(self
            .universe
            .iter()
            .filter(|security| selection.includes(&security.name))
            .filter_map(|security| self.prices.get(&security.name).map(|series| (security, series)))
            .collect())
    }

    pub fn returns_matrix(&self, selection: &Selection) -> Result<ReturnsMatrix> {
        let series = self.price_series(selection)?;
        Ok(compute_returns_matrix(
            series.iter().map(|(security, prices)| (security.name.as_str(), *prices)),
        ))
    }

    pub fn correlation_matrix(&self, selection: &Selection) -> Result<CorrelationMatrix> {
        compute_correlation_matrix(&self.returns_matrix(selection)?)
    }

    /// Per-security risk/return summaries
    pub fn stock_summary(&self, selection: &Selection) -> Result<Vec<SecuritySummary>> {
        let market_returns: Option<ReturnSeries> = self.benchmark.as_ref().map(compute_returns);

        Ok(self
            .price_series(selection)?
            .into_iter()
            .map(|(security, prices)| {
                summarize_security(
                    security,
                    prices,
                    market_returns.as_ref(),
                    self.risk_free_rate,
                    &self.config,
                )
            })
            .collect())
    }

    pub fn portfolio_metrics(
        &self,
        selection: &Selection,
        weights: Option<&PortfolioWeights>,
    ) -> Result<PortfolioMetrics> {
        compute_portfolio_metrics(
            &self.returns_matrix(selection)?,
            weights,
            self.risk_free_rate,
            &self.config,
        )
    }

    /// Portfolio metrics plus size, correlation and coverage figures.
    ///
    /// Needs at least two securities with data.
    pub fn portfolio_summary(
        &self,
        selection: &Selection,
        weights: Option<&PortfolioWeights>,
    ) -> Result<PortfolioSummary> {
        let returns = self.returns_matrix(selection)?;
        let correlation = compute_correlation_matrix(&returns)?;
        let metrics =
            compute_portfolio_metrics(&returns, weights, self.risk_free_rate, &self.config)?;
        let data_points = align_returns(&returns).len();
        let portfolio_size = returns.len();

        debug!(portfolio_size, data_points, "Built portfolio summary");

        Ok(PortfolioSummary {
            metrics,
            individual: self.stock_summary(selection)?,
            portfolio_size,
            avg_correlation: correlation.average_off_diagonal(),
            data_points,
            total_observations: data_points * portfolio_size,
            analysis_years: data_points as f64 / self.config.analysis_year_days,
            risk_free_rate: self.risk_free_rate,
        })
    }

    /// Closes rebased to `base` for a price chart
    pub fn normalized_series(
        &self,
        selection: &Selection,
        base: f64,
    ) -> Result<Vec<NormalizedSeries>> {
        Ok(self
            .price_series(selection)?
            .into_iter()
            .map(|(security, prices)| NormalizedSeries {
                name: security.name.clone(),
                symbol: security.symbol.clone(),
                points: normalized_prices(prices, base),
            })
            .collect())
    }

    pub fn risk_return_points(&self, selection: &Selection) -> Result<Vec<RiskReturnPoint>> {
        Ok(self
            .stock_summary(selection)?
            .iter()
            .map(RiskReturnPoint::from)
            .collect())
    }

    /// Every view of `selection` in one record
    pub fn snapshot(
        &self,
        selection: &Selection,
        weights: Option<&PortfolioWeights>,
    ) -> Result<DashboardSnapshot> {
        let securities = self.stock_summary(selection)?;
        let multi = securities.len() >= 2;

        let (correlation, portfolio) = if multi {
            (
                Some(self.correlation_matrix(selection)?),
                Some(self.portfolio_summary(selection, weights)?),
            )
        } else {
            (None, None)
        };

        Ok(DashboardSnapshot {
            period: self.period,
            risk_free_rate: self.risk_free_rate,
            risk_return: securities.iter().map(RiskReturnPoint::from).collect(),
            normalized: self.normalized_series(selection, NORMALIZED_BASE)?,
            securities,
            correlation,
            portfolio,
            failures: self.failures.clone(),
        })
    }
}
