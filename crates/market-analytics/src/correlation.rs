//! Pairwise correlation of aligned return series

use crate::error::{AnalyticsError, Result};
use crate::series::{ReturnsMatrix, align_returns};
use crate::stats;
use serde::{Deserialize, Serialize};

/// Symmetric Pearson correlation matrix with unit diagonal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    names: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Row-major values, indexed like [`names`](Self::names)
    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Correlation between two securities by name
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == a)?;
        let j = self.names.iter().position(|n| n == b)?;
        Some(self.values[i][j])
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Mean of the strictly upper triangle, 0.0 for a 1x1 or empty matrix
    pub fn average_off_diagonal(&self) -> f64 {
        let upper: Vec<f64> = self
            .values
            .iter()
            .enumerate()
            .flat_map(|(i, row)| row.iter().skip(i + 1).copied())
            .collect();
        stats::mean(&upper)
    }
}

/// Correlate every pair of return series over their shared dates.
///
/// Series are inner-joined on date first, so leading or trailing dates any
/// one security lacks are dropped for all. A pair without variance over the
/// aligned window reports 0.0.
pub fn compute_correlation_matrix(returns: &ReturnsMatrix) -> Result<CorrelationMatrix> {
    if returns.len() < 2 {
        return Err(AnalyticsError::InsufficientData {
            operation: "correlation matrix",
            required: 2,
            actual: returns.len(),
        });
    }

    let aligned = align_returns(returns);
    let n = aligned.names.len();
    tracing::debug!(securities = n, days = aligned.len(), "Computing correlation matrix");

    let mut values = vec![vec![0.0; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let rho = stats::pearson(&aligned.columns[i], &aligned.columns[j]).unwrap_or(0.0);
            values[i][j] = rho;
            values[j][i] = rho;
        }
    }

    Ok(CorrelationMatrix {
        names: aligned.names,
        values,
    })
}
