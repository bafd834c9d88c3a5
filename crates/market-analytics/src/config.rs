//! Configuration for analytics and data acquisition

use crate::error::{AnalyticsError, Result};
use crate::period::LookbackPeriod;
use serde::{Deserialize, Serialize};

/// Trading days per year used for return and volatility annualization.
pub const RETURN_ANNUALIZATION_DAYS: f64 = 250.0;

/// Trading days per year used inside the Sharpe ratio.
///
/// Differs from [`RETURN_ANNUALIZATION_DAYS`]; both are kept as found in the
/// published dashboard figures.
pub const SHARPE_ANNUALIZATION_DAYS: f64 = 252.0;

/// Trading days per year used to express an analysis window in years.
pub const ANALYSIS_YEAR_DAYS: f64 = 252.0;

/// Lower tail probability for historical Value-at-Risk.
pub const DEFAULT_VAR_CONFIDENCE: f64 = 0.05;

/// Beta is only reported when stock/benchmark overlap exceeds this many returns.
pub const DEFAULT_BETA_MIN_OBSERVATIONS: usize = 20;

/// Risk-free rate used when the treasury yield cannot be fetched.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.045;

/// 10-year treasury yield index, quoted in percent.
pub const DEFAULT_RISK_FREE_SYMBOL: &str = "^TNX";

/// Broad market benchmark for beta.
pub const DEFAULT_BENCHMARK_SYMBOL: &str = "SPY";

/// Configuration for the analytics engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Annualization factor for returns and volatility
    pub return_annualization_days: f64,

    /// Annualization factor for the Sharpe ratio
    pub sharpe_annualization_days: f64,

    /// Trading days counted as one year of analyzed history
    pub analysis_year_days: f64,

    /// VaR tail probability (0.05 = 95% confidence)
    pub var_confidence: f64,

    /// Minimum aligned observations before beta is reported (exclusive)
    pub beta_min_observations: usize,

    /// Fallback risk-free rate as a decimal fraction
    pub risk_free_fallback: f64,

    /// Instrument whose last close (in percent) gives the risk-free rate
    pub risk_free_symbol: String,

    /// Lookback used when fetching the risk-free instrument
    pub risk_free_period: LookbackPeriod,

    /// Benchmark instrument for beta
    pub benchmark_symbol: String,

    /// Lookback used when no period is supplied
    pub default_period: LookbackPeriod,

    /// Provider request budget
    pub requests_per_minute: u32,

    /// Number of securities fetched concurrently (1 = sequential)
    pub fetch_concurrency: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            return_annualization_days: RETURN_ANNUALIZATION_DAYS,
            sharpe_annualization_days: SHARPE_ANNUALIZATION_DAYS,
            analysis_year_days: ANALYSIS_YEAR_DAYS,
            var_confidence: DEFAULT_VAR_CONFIDENCE,
            beta_min_observations: DEFAULT_BETA_MIN_OBSERVATIONS,
            risk_free_fallback: DEFAULT_RISK_FREE_RATE,
            risk_free_symbol: DEFAULT_RISK_FREE_SYMBOL.to_string(),
            risk_free_period: LookbackPeriod::FiveDays,
            benchmark_symbol: DEFAULT_BENCHMARK_SYMBOL.to_string(),
            default_period: LookbackPeriod::TwoYears,
            requests_per_minute: 60,
            fetch_concurrency: 1,
        }
    }
}

impl AnalyticsConfig {
    /// Create a new configuration builder
    pub fn builder() -> AnalyticsConfigBuilder {
        AnalyticsConfigBuilder::default()
    }

    /// Apply overrides from `MARKET_*` environment variables
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(symbol) = std::env::var("MARKET_BENCHMARK_SYMBOL") {
            self.benchmark_symbol = symbol;
        }
        if let Ok(rate) = std::env::var("MARKET_RISK_FREE_FALLBACK") {
            self.risk_free_fallback = rate.parse().map_err(|_| {
                AnalyticsError::ConfigError(format!(
                    "MARKET_RISK_FREE_FALLBACK is not a number: {rate}"
                ))
            })?;
        }
        if let Ok(limit) = std::env::var("MARKET_REQUESTS_PER_MINUTE") {
            self.requests_per_minute = limit.parse().map_err(|_| {
                AnalyticsError::ConfigError(format!(
                    "MARKET_REQUESTS_PER_MINUTE is not an integer: {limit}"
                ))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.return_annualization_days <= 0.0
            || self.sharpe_annualization_days <= 0.0
            || self.analysis_year_days <= 0.0
        {
            return Err(AnalyticsError::ConfigError(
                "annualization days must be positive".to_string(),
            ));
        }

        if !(self.var_confidence > 0.0 && self.var_confidence < 1.0) {
            return Err(AnalyticsError::ConfigError(format!(
                "var_confidence must lie in (0, 1), got {}",
                self.var_confidence
            )));
        }

        if !self.risk_free_fallback.is_finite() {
            return Err(AnalyticsError::ConfigError(
                "risk_free_fallback must be finite".to_string(),
            ));
        }

        if self.requests_per_minute == 0 {
            return Err(AnalyticsError::ConfigError(
                "requests_per_minute must be greater than 0".to_string(),
            ));
        }

        if self.fetch_concurrency == 0 {
            return Err(AnalyticsError::ConfigError(
                "fetch_concurrency must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for AnalyticsConfig
#[derive(Debug, Default)]
pub struct AnalyticsConfigBuilder {
    return_annualization_days: Option<f64>,
    sharpe_annualization_days: Option<f64>,
    analysis_year_days: Option<f64>,
    var_confidence: Option<f64>,
    beta_min_observations: Option<usize>,
    risk_free_fallback: Option<f64>,
    risk_free_symbol: Option<String>,
    benchmark_symbol: Option<String>,
    default_period: Option<LookbackPeriod>,
    requests_per_minute: Option<u32>,
    fetch_concurrency: Option<usize>,
}

impl AnalyticsConfigBuilder {
    pub fn return_annualization_days(mut self, days: f64) -> Self {
        self.return_annualization_days = Some(days);
        self
    }

    pub fn sharpe_annualization_days(mut self, days: f64) -> Self {
        self.sharpe_annualization_days = Some(days);
        self
    }

    pub fn analysis_year_days(mut self, days: f64) -> Self {
        self.analysis_year_days = Some(days);
        self
    }

    /// Set VaR tail probability
    pub fn var_confidence(mut self, confidence: f64) -> Self {
        self.var_confidence = Some(confidence);
        self
    }

    /// Set minimum overlap for beta
    pub fn beta_min_observations(mut self, observations: usize) -> Self {
        self.beta_min_observations = Some(observations);
        self
    }

    /// Set fallback risk-free rate
    pub fn risk_free_fallback(mut self, rate: f64) -> Self {
        self.risk_free_fallback = Some(rate);
        self
    }

    pub fn risk_free_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.risk_free_symbol = Some(symbol.into());
        self
    }

    /// Set benchmark symbol for beta
    pub fn benchmark_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.benchmark_symbol = Some(symbol.into());
        self
    }

    pub fn default_period(mut self, period: LookbackPeriod) -> Self {
        self.default_period = Some(period);
        self
    }

    /// Set provider request budget
    pub fn requests_per_minute(mut self, limit: u32) -> Self {
        self.requests_per_minute = Some(limit);
        self
    }

    /// Set number of concurrent security fetches
    pub fn fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.fetch_concurrency = Some(concurrency);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AnalyticsConfig> {
        let defaults = AnalyticsConfig::default();

        let config = AnalyticsConfig {
            return_annualization_days: self
                .return_annualization_days
                .unwrap_or(defaults.return_annualization_days),
            sharpe_annualization_days: self
                .sharpe_annualization_days
                .unwrap_or(defaults.sharpe_annualization_days),
            analysis_year_days: self.analysis_year_days.unwrap_or(defaults.analysis_year_days),
            var_confidence: self.var_confidence.unwrap_or(defaults.var_confidence),
            beta_min_observations: self
                .beta_min_observations
                .unwrap_or(defaults.beta_min_observations),
            risk_free_fallback: self.risk_free_fallback.unwrap_or(defaults.risk_free_fallback),
            risk_free_symbol: self.risk_free_symbol.unwrap_or(defaults.risk_free_symbol),
            risk_free_period: defaults.risk_free_period,
            benchmark_symbol: self.benchmark_symbol.unwrap_or(defaults.benchmark_symbol),
            default_period: self.default_period.unwrap_or(defaults.default_period),
            requests_per_minute: self.requests_per_minute.unwrap_or(defaults.requests_per_minute),
            fetch_concurrency: self.fetch_concurrency.unwrap_or(defaults.fetch_concurrency),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.return_annualization_days, 250.0);
        assert_eq!(config.sharpe_annualization_days, 252.0);
        assert_eq!(config.analysis_year_days, 252.0);
        assert_eq!(config.var_confidence, 0.05);
        assert_eq!(config.beta_min_observations, 20);
        assert_eq!(config.risk_free_fallback, 0.045);
        assert_eq!(config.risk_free_symbol, "^TNX");
        assert_eq!(config.benchmark_symbol, "SPY");
        assert_eq!(config.default_period, LookbackPeriod::TwoYears);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = AnalyticsConfig::builder()
            .benchmark_symbol("QQQ")
            .beta_min_observations(60)
            .fetch_concurrency(4)
            .build()
            .unwrap();

        assert_eq!(config.benchmark_symbol, "QQQ");
        assert_eq!(config.beta_min_observations, 60);
        assert_eq!(config.fetch_concurrency, 4);
        assert_eq!(config.return_annualization_days, RETURN_ANNUALIZATION_DAYS);
    }

    #[test]
    fn test_validation_var_confidence() {
        let config = AnalyticsConfig {
            var_confidence: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        assert!(AnalyticsConfig::builder().var_confidence(0.0).build().is_err());
    }

    #[test]
    fn test_validation_zero_limits() {
        assert!(AnalyticsConfig::builder().requests_per_minute(0).build().is_err());
        assert!(AnalyticsConfig::builder().fetch_concurrency(0).build().is_err());
    }

    #[test]
    fn test_config_serde() {
        let config = AnalyticsConfig::default();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["default_period"], "2y");
        assert_eq!(json["risk_free_period"], "5d");
    }
}
