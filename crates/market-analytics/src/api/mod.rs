//! Market data providers

pub mod provider;
pub mod yahoo;

#[cfg(test)]
pub use provider::MockMarketDataProvider;
pub use provider::MarketDataProvider;
pub use yahoo::YahooFinanceClient;
