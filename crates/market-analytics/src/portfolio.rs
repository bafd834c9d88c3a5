//! Portfolio-level aggregates over aligned returns

use crate::config::AnalyticsConfig;
use crate::error::{AnalyticsError, Result};
use crate::metrics::{self, SecuritySummary};
use crate::series::{AlignedReturns, ReturnsMatrix, align_returns};
use crate::stats;
use serde::{Deserialize, Serialize};

/// Weight per selected security, in selection order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioWeights(Vec<f64>);

impl PortfolioWeights {
    /// Caller-supplied weights; summing to 1 is the caller's responsibility
    pub fn new(weights: Vec<f64>) -> Self {
        Self(weights)
    }

    /// `1 / n` for each of `n` securities
    pub fn equal(n: usize) -> Self {
        if n == 0 {
            return Self(Vec::new());
        }
        Self(vec![1.0 / n as f64; n])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Risk/return figures for a weighted portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    /// Mean daily return annualized linearly, percent
    pub portfolio_return: f64,
    pub portfolio_volatility: f64,
    pub portfolio_sharpe: f64,
    pub portfolio_var: f64,
    pub portfolio_max_drawdown: f64,
    /// Weighted average volatility over portfolio volatility
    pub diversification_ratio: f64,
}

/// Portfolio metrics together with the context a dashboard shows beside them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub metrics: PortfolioMetrics,
    pub individual: Vec<SecuritySummary>,
    pub portfolio_size: usize,
    pub avg_correlation: f64,
    /// Aligned trading days
    pub data_points: usize,
    /// `data_points * portfolio_size`
    pub total_observations: usize,
    /// Aligned days expressed in 252-day years
    pub analysis_years: f64,
    pub risk_free_rate: f64,
}

/// Weighted sum of returns for each aligned date
pub fn portfolio_returns(aligned: &AlignedReturns, weights: &PortfolioWeights) -> Vec<f64> {
    (0..aligned.len())
        .map(|t| {
            aligned
                .columns
                .iter()
                .zip(weights.as_slice())
                .map(|(column, w)| w * column[t])
                .sum()
        })
        .collect()
}

/// Weighted average of individual volatilities over the portfolio's own
/// volatility; 1.0 when the portfolio has no volatility.
pub fn diversification_ratio(
    aligned: &AlignedReturns,
    weights: &PortfolioWeights,
    days: f64,
) -> f64 {
    let weighted_vol: f64 = aligned
        .columns
        .iter()
        .zip(weights.as_slice())
        .map(|(column, w)| w * stats::sample_std(column) * days.sqrt())
        .sum();

    let portfolio_vol = stats::sample_std(&portfolio_returns(aligned, weights)) * days.sqrt();
    if portfolio_vol == 0.0 {
        return 1.0;
    }
    weighted_vol / portfolio_vol
}

fn check_weights(
    returns: &ReturnsMatrix,
    weights: Option<&PortfolioWeights>,
) -> Result<PortfolioWeights> {
    match weights {
        None => Ok(PortfolioWeights::equal(returns.len())),
        Some(w) if w.len() == returns.len() => Ok(w.clone()),
        Some(w) => Err(AnalyticsError::WeightsMismatch {
            expected: returns.len(),
            actual: w.len(),
        }),
    }
}

/// Compute portfolio metrics for `returns` under `weights` (equal by default).
pub fn compute_portfolio_metrics(
    returns: &ReturnsMatrix,
    weights: Option<&PortfolioWeights>,
    risk_free_rate: f64,
    config: &AnalyticsConfig,
) -> Result<PortfolioMetrics> {
    if returns.is_empty() {
        return Err(AnalyticsError::InsufficientData {
            operation: "portfolio metrics",
            required: 1,
            actual: 0,
        });
    }
    let weights = check_weights(returns, weights)?;
    let aligned = align_returns(returns);
    let series = portfolio_returns(&aligned, &weights);
    let days = config.return_annualization_days;

    // drawdown runs over the compounded path as if it were a price series
    let mut cumulative = Vec::with_capacity(series.len());
    let mut level = 1.0;
    for r in &series {
        level *= 1.0 + r;
        cumulative.push(level);
    }

    tracing::debug!(
        securities = returns.len(),
        days = aligned.len(),
        "Computed portfolio return series"
    );

    Ok(PortfolioMetrics {
        portfolio_return: stats::mean(&series) * days * 100.0,
        portfolio_volatility: metrics::annualized_volatility(&series, days),
        portfolio_sharpe: metrics::sharpe_ratio(
            &series,
            risk_free_rate,
            config.sharpe_annualization_days,
        ),
        portfolio_var: metrics::value_at_risk(&series, config.var_confidence),
        portfolio_max_drawdown: metrics::max_drawdown(&cumulative),
        diversification_ratio: diversification_ratio(&aligned, &weights, days),
    })
}
