//! Securities and the fixed universe they belong to

use crate::error::{AnalyticsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A tradable security, keyed by its display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Security {
    /// Display name, unique within a universe
    pub name: String,
    /// Ticker symbol used with the data provider
    pub symbol: String,
}

impl Security {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }
}

/// Large-cap equities tracked by default
const MAJOR_STOCKS: [(&str, &str); 10] = [
    ("Apple", "AAPL"),
    ("Microsoft", "MSFT"),
    ("Google", "GOOGL"),
    ("Amazon", "AMZN"),
    ("Tesla", "TSLA"),
    ("Meta", "META"),
    ("Netflix", "NFLX"),
    ("NVIDIA", "NVDA"),
    ("JPMorgan", "JPM"),
    ("Johnson & Johnson", "JNJ"),
];

/// Ordered, immutable set of securities
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Universe {
    securities: Vec<Security>,
}

impl Universe {
    /// Build a universe, rejecting duplicate names
    pub fn new(securities: Vec<Security>) -> Result<Self> {
        let mut seen = HashSet::new();
        for security in &securities {
            if !seen.insert(security.name.as_str()) {
                return Err(AnalyticsError::ConfigError(format!(
                    "duplicate security name in universe: {}",
                    security.name
                )));
            }
        }
        Ok(Self { securities })
    }

    /// The ten large-cap stocks shown on the dashboard
    pub fn major_stocks() -> Self {
        Self {
            securities: MAJOR_STOCKS
                .iter()
                .map(|(name, symbol)| Security::new(*name, *symbol))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Security> {
        self.securities.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Security> {
        self.securities.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.securities.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.securities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.securities.is_empty()
    }
}

impl Default for Universe {
    fn default() -> Self {
        Self::major_stocks()
    }
}

impl<'a> IntoIterator for &'a Universe {
    type Item = &'a Security;
    type IntoIter = std::slice::Iter<'a, Security>;

    fn into_iter(self) -> Self::IntoIter {
        self.securities.iter()
    }
}

/// Subset of the universe a query applies to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    /// Every security with loaded data
    #[default]
    All,
    /// Only the named securities
    Only(Vec<String>),
}

impl Selection {
    pub fn all() -> Self {
        Self::All
    }

    pub fn of<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(names.into_iter().map(Into::into).collect())
    }

    pub fn includes(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => names.iter().any(|n| n == name),
        }
    }
}
