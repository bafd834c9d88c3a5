//! Market data provider abstraction

use crate::error::Result;
use crate::period::LookbackPeriod;
use crate::series::PricePoint;
use async_trait::async_trait;

/// Source of daily closing prices.
///
/// Implementations may return points unordered or with repeated dates; the
/// acquisition layer normalizes them. An empty vector means no data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily closes for `symbol` covering `period`, ending now
    async fn get_history(&self, symbol: &str, period: LookbackPeriod) -> Result<Vec<PricePoint>>;
}
