//! Per-security risk and return metrics
//!
//! Returns are decimal fractions (0.01 = 1%). Metrics reported in percent
//! are scaled by 100 here; ratios are unitless.

use crate::config::AnalyticsConfig;
use crate::series::{PriceSeries, ReturnSeries, ReturnsMatrix, align_returns, compute_returns};
use crate::stats;
use crate::universe::Security;
use serde::{Deserialize, Serialize};

/// Risk/return summary for one security
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecuritySummary {
    pub name: String,
    pub symbol: String,
    pub current_price: f64,
    /// Percent change from first to last close
    pub total_return: f64,
    /// Compounded mean daily return, percent
    pub annualized_return: f64,
    /// Annualized standard deviation of returns, percent
    pub volatility: f64,
    pub sharpe_ratio: f64,
    /// Largest peak-to-trough decline, percent, never positive
    pub max_drawdown: f64,
    /// Historical VaR at the configured tail, percent
    pub var_95: f64,
    /// Sensitivity to the benchmark, absent without enough overlap
    pub beta: Option<f64>,
    /// Share of positive returns, percent
    pub win_rate: f64,
    /// Number of return observations
    pub trading_days: usize,
}

impl SecuritySummary {
    pub fn sharpe_rating(&self) -> SharpeRating {
        SharpeRating::classify(self.sharpe_ratio)
    }
}

/// Coarse Sharpe ratio bands used to color summary cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharpeRating {
    /// Above 1
    Strong,
    /// Above 0.5
    Moderate,
    Weak,
}

impl SharpeRating {
    pub fn classify(sharpe: f64) -> Self {
        if sharpe > 1.0 {
            Self::Strong
        } else if sharpe > 0.5 {
            Self::Moderate
        } else {
            Self::Weak
        }
    }
}

/// One point of a risk/return scatter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReturnPoint {
    pub name: String,
    pub volatility: f64,
    pub annualized_return: f64,
    pub sharpe_ratio: f64,
}

impl From<&SecuritySummary> for RiskReturnPoint {
    fn from(summary: &SecuritySummary) -> Self {
        Self {
            name: summary.name.clone(),
            volatility: summary.volatility,
            annualized_return: summary.annualized_return,
            sharpe_ratio: summary.sharpe_ratio,
        }
    }
}

/// `(last - first) / first * 100`, 0.0 for an empty series
pub fn total_return(prices: &PriceSeries) -> f64 {
    match (prices.first_close(), prices.last_close()) {
        (Some(first), Some(last)) => (last - first) / first * 100.0,
        _ => 0.0,
    }
}

/// `((1 + mean)^days - 1) * 100`
pub fn annualized_return(returns: &[f64], days: f64) -> f64 {
    ((1.0 + stats::mean(returns)).powf(days) - 1.0) * 100.0
}

/// `std * sqrt(days) * 100`
pub fn annualized_volatility(returns: &[f64], days: f64) -> f64 {
    stats::sample_std(returns) * days.sqrt() * 100.0
}

/// Annualized excess return over annualized volatility.
///
/// `risk_free_rate` is an annual decimal fraction. Exactly 0.0 when the
/// returns have no dispersion.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64, days: f64) -> f64 {
    let excess = stats::mean(returns) * days - risk_free_rate;
    let volatility = stats::sample_std(returns) * days.sqrt();
    if volatility == 0.0 {
        return 0.0;
    }
    excess / volatility
}

/// Maximum drawdown of a price path, in percent.
///
/// Works on the cumulative product of `1 + r` of the path's returns, so the
/// running peak starts at the first return rather than at the first price.
/// Always <= 0; fewer than two prices give 0.0.
pub fn max_drawdown(prices: &[f64]) -> f64 {
    let mut cumulative = 1.0;
    let mut peak = f64::NEG_INFINITY;
    let mut worst: f64 = 0.0;

    for w in prices.windows(2) {
        cumulative *= 1.0 + (w[1] - w[0]) / w[0];
        peak = peak.max(cumulative);
        worst = worst.min((cumulative - peak) / peak);
    }

    worst * 100.0
}

/// Historical Value-at-Risk: the `confidence` percentile of returns, in percent
pub fn value_at_risk(returns: &[f64], confidence: f64) -> f64 {
    stats::percentile(returns, confidence) * 100.0
}

/// Sample covariance with the market over the market's population variance.
///
/// The mixed denominators reproduce the dashboard's published betas. 0.0
/// when the market has no variance.
pub fn beta(stock_returns: &[f64], market_returns: &[f64]) -> f64 {
    let market_variance = stats::population_variance(market_returns);
    if market_variance == 0.0 {
        return 0.0;
    }
    stats::sample_covariance(stock_returns, market_returns) / market_variance
}

/// Beta over shared dates, `None` unless overlap exceeds `min_observations`
pub fn aligned_beta(
    stock: &ReturnSeries,
    market: &ReturnSeries,
    min_observations: usize,
) -> Option<f64> {
    if stock.is_empty() {
        return None;
    }

    let pair = ReturnsMatrix::new(vec![
        ("stock".to_string(), stock.clone()),
        ("market".to_string(), market.clone()),
    ]);
    let aligned = align_returns(&pair);
    if aligned.len() <= min_observations {
        return None;
    }

    Some(beta(&aligned.columns[0], &aligned.columns[1]))
}

/// Percentage of strictly positive returns
pub fn win_rate(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let wins = returns.iter().filter(|r| **r > 0.0).count();
    wins as f64 / returns.len() as f64 * 100.0
}

/// Build the full summary for one security
pub fn summarize_security(
    security: &Security,
    prices: &PriceSeries,
    market_returns: Option<&ReturnSeries>,
    risk_free_rate: f64,
    config: &AnalyticsConfig,
) -> SecuritySummary {
    let returns = compute_returns(prices);
    let values = returns.values();

    let beta = market_returns
        .and_then(|market| aligned_beta(&returns, market, config.beta_min_observations));

    SecuritySummary {
        name: security.name.clone(),
        symbol: security.symbol.clone(),
        current_price: prices.last_close().unwrap_or_default(),
        total_return: total_return(prices),
        annualized_return: annualized_return(&values, config.return_annualization_days),
        volatility: annualized_volatility(&values, config.return_annualization_days),
        sharpe_ratio: sharpe_ratio(&values, risk_free_rate, config.sharpe_annualization_days),
        max_drawdown: max_drawdown(&prices.closes()),
        var_95: value_at_risk(&values, config.var_confidence),
        beta,
        win_rate: win_rate(&values),
        trading_days: values.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::fixtures::{prices, prices_with_returns, returns};

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_total_return_and_drawdown_example() {
        let series = prices("X", &[100.0, 110.0, 99.0]);
        assert_close(total_return(&series), -1.0);
        assert_close(max_drawdown(&series.closes()), (0.99 - 1.10) / 1.10 * 100.0);
        assert_close(max_drawdown(&series.closes()), -10.0);
    }

    #[test]
    fn test_max_drawdown_non_decreasing_is_zero() {
        assert_eq!(max_drawdown(&[10.0, 10.0, 11.0, 12.5, 12.5, 20.0]), 0.0);
        assert_eq!(max_drawdown(&[10.0]), 0.0);
        assert_eq!(max_drawdown(&[]), 0.0);
    }

    #[test]
    fn test_max_drawdown_never_positive() {
        let paths: [&[f64]; 4] = [
            &[100.0, 90.0],
            &[5.0, 8.0, 3.0, 9.0, 1.0],
            &[1.0, 2.0, 4.0, 8.0, 7.0, 16.0],
            &[42.0, 41.0, 40.0, 39.0],
        ];
        for path in paths {
            assert!(max_drawdown(path) <= 0.0);
        }
        // peak 8 -> trough 1
        assert_close(max_drawdown(&[5.0, 8.0, 3.0, 9.0, 1.0]), (1.0 / 9.0 - 1.0) * 100.0);
    }

    #[test]
    fn test_sharpe_zero_for_constant_returns() {
        assert_eq!(sharpe_ratio(&[0.01; 30], 0.045, 252.0), 0.0);
        assert_eq!(sharpe_ratio(&[-0.2; 5], 0.0, 252.0), 0.0);
        assert_eq!(sharpe_ratio(&[], 0.045, 252.0), 0.0);
    }

    #[test]
    fn test_sharpe_ratio_formula() {
        let r = [0.01, -0.02, 0.03, 0.0, 0.01];
        let expected = (stats::mean(&r) * 252.0 - 0.04) / (stats::sample_std(&r) * 252f64.sqrt());
        assert_close(sharpe_ratio(&r, 0.04, 252.0), expected);
    }

    #[test]
    fn test_value_at_risk_example() {
        let r = [-0.05, -0.03, -0.01, 0.0, 0.01, 0.02, 0.04];
        assert_close(value_at_risk(&r, 0.05), -4.4);
    }

    #[test]
    fn test_annualized_figures() {
        let r = [0.001, 0.002, -0.001, 0.0];
        assert_close(annualized_return(&r, 250.0), (1.0005f64.powf(250.0) - 1.0) * 100.0);
        assert_close(
            annualized_volatility(&r, 250.0),
            stats::sample_std(&r) * 250f64.sqrt() * 100.0,
        );
    }

    #[test]
    fn test_beta() {
        let market = [0.01, -0.02, 0.015, 0.005, -0.01];
        let stock: Vec<f64> = market.iter().map(|m| 2.0 * m).collect();
        let n = market.len() as f64;
        // sample covariance over population variance
        assert_close(beta(&stock, &market), 2.0 * n / (n - 1.0));
        assert_eq!(beta(&stock, &[0.01; 5]), 0.0);
    }

    #[test]
    fn test_aligned_beta_requires_overlap() {
        let values: Vec<f64> = (0..30).map(|i| ((i * 7) % 11) as f64 / 100.0 - 0.05).collect();
        let market = returns(0, &values);

        // 20 shared dates: not enough
        let stock = returns(10, &values[10..]);
        assert!(aligned_beta(&stock, &market, 20).is_none());

        // 21 shared dates
        let stock = returns(9, &values[9..]);
        assert!(aligned_beta(&stock, &market, 20).is_some());

        assert!(aligned_beta(&returns(0, &[]), &market, 20).is_none());
    }

    #[test]
    fn test_win_rate() {
        assert_close(win_rate(&[0.01, -0.01, 0.0, 0.02]), 50.0);
        assert_eq!(win_rate(&[]), 0.0);
    }

    #[test]
    fn test_sharpe_rating() {
        assert_eq!(SharpeRating::classify(1.2), SharpeRating::Strong);
        assert_eq!(SharpeRating::classify(1.0), SharpeRating::Moderate);
        assert_eq!(SharpeRating::classify(0.5), SharpeRating::Weak);
        assert_eq!(SharpeRating::classify(-3.0), SharpeRating::Weak);
    }

    #[test]
    fn test_summarize_security() {
        let config = AnalyticsConfig::default();
        let security = Security::new("Apple", "AAPL");
        let r = [0.01, -0.02, 0.03, 0.0, 0.01];
        let series = prices_with_returns("AAPL", 0, &r);

        let summary = summarize_security(&security, &series, None, 0.045, &config);

        assert_eq!(summary.name, "Apple");
        assert_eq!(summary.symbol, "AAPL");
        assert_eq!(summary.trading_days, 5);
        assert_close(summary.current_price, series.last_close().unwrap());
        assert_close(summary.win_rate, 60.0);
        assert!(summary.beta.is_none());
        assert!(summary.max_drawdown <= 0.0);
        assert_close(summary.sharpe_ratio, sharpe_ratio(&r, 0.045, 252.0));
    }

    #[test]
    fn test_risk_return_point_from_summary() {
        let config = AnalyticsConfig::default();
        let security = Security::new("Tesla", "TSLA");
        let series = prices("TSLA", &[10.0, 12.0, 11.0]);
        let summary = summarize_security(&security, &series, None, 0.0, &config);

        let point = RiskReturnPoint::from(&summary);
        assert_eq!(point.name, "Tesla");
        assert_eq!(point.volatility, summary.volatility);
    }
}
