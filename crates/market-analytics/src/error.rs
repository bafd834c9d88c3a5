//! Error types for market analytics operations

use thiserror::Error;

/// Market analytics specific errors
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable {
        symbol: String,
        reason: String,
    },

    /// Unrecognized lookback period string
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// Price series violates its ordering or value constraints
    #[error("Invalid price series: {0}")]
    InvalidSeries(String),

    /// Security name not present in the universe
    #[error("Unknown security: {0}")]
    UnknownSecurity(String),

    /// Not enough securities or observations for the requested computation
    #[error("Insufficient data: {operation} requires at least {required}, got {actual}")]
    InsufficientData {
        operation: &'static str,
        required: usize,
        actual: usize,
    },

    /// Weight vector does not match the selected securities
    #[error("Portfolio weights mismatch: expected {expected} weights, got {actual}")]
    WeightsMismatch {
        expected: usize,
        actual: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;

impl From<yahoo_finance_api::YahooError> for AnalyticsError {
    fn from(err: yahoo_finance_api::YahooError) -> Self {
        AnalyticsError::YahooFinanceError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalyticsError::UnknownSecurity("Acme".to_string());
        assert_eq!(err.to_string(), "Unknown security: Acme");

        let err = AnalyticsError::DataUnavailable {
            symbol: "AAPL".to_string(),
            reason: "No data found".to_string(),
        };
        assert_eq!(err.to_string(), "Data not available for AAPL: No data found");
    }

    #[test]
    fn test_insufficient_data_display() {
        let err = AnalyticsError::InsufficientData {
            operation: "correlation matrix",
            required: 2,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient data: correlation matrix requires at least 2, got 1"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: AnalyticsError = parse_err.into();
        assert!(matches!(err, AnalyticsError::JsonError(_)));
    }
}
