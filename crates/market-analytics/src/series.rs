//! Price and return series
//!
//! A [`PriceSeries`] is the only stored data; every return series, aligned
//! table and normalized view is derived from it on demand.

use crate::error::{AnalyticsError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A single daily close
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Closing prices for one symbol, dates strictly increasing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from points that are already ordered and valid.
    ///
    /// Fails when dates are not strictly increasing or a close is not a
    /// positive finite number.
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self> {
        let symbol = symbol.into();

        if let Some(bad) = points.iter().find(|p| !(p.close.is_finite() && p.close > 0.0)) {
            return Err(AnalyticsError::InvalidSeries(format!(
                "{symbol}: close {} on {} is not a positive price",
                bad.close, bad.date
            )));
        }

        if let Some(pair) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(AnalyticsError::InvalidSeries(format!(
                "{symbol}: date {} does not follow {}",
                pair[1].date, pair[0].date
            )));
        }

        Ok(Self { symbol, points })
    }

    /// Build a series from raw provider output.
    ///
    /// Sorts by date, keeps the last observation for a repeated date and
    /// drops closes that are not positive finite numbers.
    pub fn normalized(symbol: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.retain(|p| p.close.is_finite() && p.close > 0.0);
        // stable sort keeps provider order within a date, so the last one wins below
        points.sort_by_key(|p| p.date);

        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }

        Self {
            symbol: symbol.into(),
            points: deduped,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn first_close(&self) -> Option<f64> {
        self.points.first().map(|p| p.close)
    }

    /// Most recent close
    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A dated simple return
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Period-over-period simple returns, dated by the later observation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReturnSeries {
    points: Vec<ReturnPoint>,
}

impl ReturnSeries {
    /// Build from dated returns; callers keep dates strictly increasing
    pub fn from_points(points: Vec<ReturnPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[ReturnPoint] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn by_date(&self) -> HashMap<NaiveDate, f64> {
        self.points.iter().map(|p| (p.date, p.value)).collect()
    }
}

/// Simple percentage change between consecutive closes.
///
/// The first observation has no predecessor and is dropped, so a series of
/// `n >= 2` prices gives `n - 1` returns and shorter series give none.
pub fn compute_returns(prices: &PriceSeries) -> ReturnSeries {
    let points = prices
        .points()
        .windows(2)
        .map(|w| ReturnPoint {
            date: w[1].date,
            value: (w[1].close - w[0].close) / w[0].close,
        })
        .collect();

    ReturnSeries { points }
}

/// Return series for several securities, in selection order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReturnsMatrix {
    columns: Vec<(String, ReturnSeries)>,
}

impl ReturnsMatrix {
    pub fn new(columns: Vec<(String, ReturnSeries)>) -> Self {
        Self { columns }
    }

    pub fn get(&self, name: &str) -> Option<&ReturnSeries> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, series)| series)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReturnSeries)> {
        self.columns.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Compute returns for each named series independently
pub fn compute_returns_matrix<'a, I>(series: I) -> ReturnsMatrix
where
    I: IntoIterator<Item = (&'a str, &'a PriceSeries)>,
{
    ReturnsMatrix {
        columns: series
            .into_iter()
            .map(|(name, prices)| (name.to_string(), compute_returns(prices)))
            .collect(),
    }
}

/// Returns restricted to the dates every security has in common
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlignedReturns {
    pub dates: Vec<NaiveDate>,
    pub names: Vec<String>,
    /// One column per name, each `dates.len()` long
    pub columns: Vec<Vec<f64>>,
}

impl AlignedReturns {
    /// Number of aligned dates
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.columns[idx].as_slice())
    }
}

/// Inner-join every return series on date.
pub fn align_returns(returns: &ReturnsMatrix) -> AlignedReturns {
    let mut iter = returns.iter();
    let Some((_, first)) = iter.next() else {
        return AlignedReturns::default();
    };

    let mut shared: BTreeSet<NaiveDate> = first.points().iter().map(|p| p.date).collect();
    for (_, series) in iter {
        let dates: BTreeSet<NaiveDate> = series.points().iter().map(|p| p.date).collect();
        shared.retain(|d| dates.contains(d));
    }

    let dates: Vec<NaiveDate> = shared.into_iter().collect();
    let mut names = Vec::with_capacity(returns.len());
    let mut columns = Vec::with_capacity(returns.len());

    for (name, series) in returns.iter() {
        let lookup = series.by_date();
        names.push(name.to_string());
        columns.push(dates.iter().filter_map(|d| lookup.get(d).copied()).collect());
    }

    AlignedReturns {
        dates,
        names,
        columns,
    }
}

/// Closes rebased so the first one equals `base`
pub fn normalized_prices(prices: &PriceSeries, base: f64) -> Vec<PricePoint> {
    let Some(first) = prices.first_close() else {
        return Vec::new();
    };

    prices
        .points()
        .iter()
        .map(|p| PricePoint::new(p.date, p.close / first * base))
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Consecutive calendar days starting 2024-01-01
    pub fn day(offset: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .checked_add_days(chrono::Days::new(u64::from(offset)))
            .unwrap()
    }

    pub fn prices(symbol: &str, closes: &[f64]) -> PriceSeries {
        prices_from(symbol, 0, closes)
    }

    pub fn prices_from(symbol: &str, start: u32, closes: &[f64]) -> PriceSeries {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(day(start + i as u32), c))
            .collect();
        PriceSeries::new(symbol, points).unwrap()
    }

    /// Price path whose simple returns are exactly `returns`
    pub fn prices_with_returns(symbol: &str, start: u32, returns: &[f64]) -> PriceSeries {
        let mut closes = vec![100.0];
        for r in returns {
            let last = *closes.last().unwrap();
            closes.push(last * (1.0 + r));
        }
        prices_from(symbol, start, &closes)
    }

    pub fn returns(start: u32, values: &[f64]) -> ReturnSeries {
        ReturnSeries::from_points(
            values
                .iter()
                .enumerate()
                .map(|(i, &value)| ReturnPoint {
                    date: day(start + i as u32),
                    value,
                })
                .collect(),
        )
    }
}
