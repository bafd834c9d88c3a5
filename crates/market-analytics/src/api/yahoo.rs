//! Yahoo Finance API client

use crate::api::provider::MarketDataProvider;
use crate::error::{AnalyticsError, Result};
use crate::period::LookbackPeriod;
use crate::series::PricePoint;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Yahoo Finance API client
#[derive(Clone)]
pub struct YahooFinanceClient {
    rate_limiter: SharedRateLimiter,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    ///
    /// # Arguments
    /// * `requests_per_minute` - Request budget shared by all clones
    pub fn new(requests_per_minute: u32) -> Self {
        let rate = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_minute(rate);
        Self {
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Get historical quotes between two instants.
    ///
    /// Uses the adjusted close so splits and dividends do not show up as returns.
    pub async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>> {
        self.rate_limiter.until_ready().await;

        let provider = yahoo::YahooConnector::new()?;

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp()).map_err(|e| {
            AnalyticsError::YahooFinanceError(format!("Invalid start timestamp: {e}"))
        })?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| AnalyticsError::YahooFinanceError(format!("Invalid end timestamp: {e}")))?;

        let response = provider.get_quote_history(symbol, start_odt, end_odt).await?;
        let quotes = response.quotes()?;

        Ok(quotes
            .iter()
            .filter_map(|q| {
                let timestamp = DateTime::from_timestamp(q.timestamp as i64, 0);
                if timestamp.is_none() {
                    tracing::debug!("Skipping {} quote with bad timestamp {}", symbol, q.timestamp);
                }
                timestamp.map(|ts| PricePoint::new(ts.date_naive(), q.adjclose))
            })
            .collect())
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new(60)
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    async fn get_history(&self, symbol: &str, period: LookbackPeriod) -> Result<Vec<PricePoint>> {
        let end = Utc::now();
        self.get_historical_quotes(symbol, period.start_from(end), end).await
    }
}
