//! Best-effort acquisition of price histories and the risk-free rate

use crate::api::MarketDataProvider;
use crate::config::AnalyticsConfig;
use crate::error::{AnalyticsError, Result};
use crate::period::LookbackPeriod;
use crate::series::PriceSeries;
use crate::universe::{Security, Universe};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

/// A security that could not be retrieved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchFailure {
    pub name: String,
    pub symbol: String,
    pub reason: String,
}

/// Outcome of a bulk fetch
#[derive(Debug, Clone, Default)]
pub struct PriceHistory {
    /// Retrieved series by security name
    pub series: HashMap<String, PriceSeries>,
    /// Securities that were skipped, in universe order
    pub failures: Vec<FetchFailure>,
}

impl PriceHistory {
    /// True when at least one security was retrieved
    pub fn success(&self) -> bool {
        !self.series.is_empty()
    }
}

/// Fetch one symbol and normalize it into a series; empty results are errors
pub async fn fetch_series(
    provider: &dyn MarketDataProvider,
    symbol: &str,
    period: LookbackPeriod,
) -> Result<PriceSeries> {
    let points = provider.get_history(symbol, period).await?;
    let series = PriceSeries::normalized(symbol, points);

    if series.is_empty() {
        return Err(AnalyticsError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: format!("no price history for period {period}"),
        });
    }
    Ok(series)
}

/// Fetch every security in `universe`, skipping the ones that fail.
///
/// Up to `concurrency` requests are in flight at once; `1` fetches
/// sequentially. Failures are logged and reported, never propagated.
pub async fn fetch_price_history(
    provider: &dyn MarketDataProvider,
    universe: &Universe,
    period: LookbackPeriod,
    concurrency: usize,
) -> PriceHistory {
    info!("Fetching {} securities for period {}", universe.len(), period);

    let results: Vec<(&Security, Result<PriceSeries>)> = stream::iter(universe.iter())
        .map(|security| async move {
            (security, fetch_series(provider, &security.symbol, period).await)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut history = PriceHistory::default();
    for (security, result) in results {
        match result {
            Ok(series) => {
                info!("{} ({}): {} closes", security.name, security.symbol, series.len());
                history.series.insert(security.name.clone(), series);
            }
            Err(e) => {
                warn!("Skipping {} ({}): {}", security.name, security.symbol, e);
                history.failures.push(FetchFailure {
                    name: security.name.clone(),
                    symbol: security.symbol.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    history
}

/// Latest risk-free rate as a decimal fraction.
///
/// Reads the last close of the configured yield instrument (quoted in
/// percent) and falls back to `config.risk_free_fallback` on any failure.
pub async fn fetch_risk_free_rate(
    provider: &dyn MarketDataProvider,
    config: &AnalyticsConfig,
) -> f64 {
    let latest = fetch_series(provider, &config.risk_free_symbol, config.risk_free_period)
        .await
        .and_then(|series| {
            series.last_close().ok_or_else(|| {
                AnalyticsError::Other(format!("{} has no closes", config.risk_free_symbol))
            })
        });

    match latest {
        Ok(close) => {
            let rate = close / 100.0;
            info!("Using current 10Y Treasury rate: {:.2}%", rate * 100.0);
            rate
        }
        Err(e) => {
            warn!("Could not fetch Treasury rate: {}", e);
            info!("Using fallback risk-free rate: {:.2}%", config.risk_free_fallback * 100.0);
            config.risk_free_fallback
        }
    }
}
