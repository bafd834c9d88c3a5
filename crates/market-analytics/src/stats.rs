//! Descriptive statistics over return samples
//!
//! Every function produces a number for any input: empty or too-short
//! samples yield 0.0 rather than NaN. Moments come from `statrs`; the
//! percentile keeps the linear `q * (n - 1)` rank, which is not one of the
//! `statrs` quantile estimators.

use statrs::statistics::Statistics;

/// Arithmetic mean, 0.0 for an empty sample
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().mean()
}

/// True when every element equals the first one
pub fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Sample variance (n - 1 denominator), 0.0 below two observations
pub fn sample_variance(values: &[f64]) -> f64 {
    // an exactly constant sample can still leave rounding residue around its mean
    if values.len() < 2 || is_constant(values) {
        return 0.0;
    }
    values.iter().variance()
}

/// Sample standard deviation (n - 1 denominator)
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 || is_constant(values) {
        return 0.0;
    }
    values.iter().std_dev()
}

/// Population variance (n denominator), 0.0 for an empty sample
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() || is_constant(values) {
        return 0.0;
    }
    values.iter().population_variance()
}

/// Sample covariance over the common prefix of `x` and `y`
pub fn sample_covariance(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }
    let (x, y) = (&x[..n], &y[..n]);
    if is_constant(x) || is_constant(y) {
        return 0.0;
    }
    x.iter().covariance(y.iter())
}

/// Pearson correlation, `None` when either side has no variance
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let (x, y) = (&x[..n], &y[..n]);
    if is_constant(x) || is_constant(y) {
        return None;
    }

    let (mx, my) = (mean(x), mean(y));
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denom = (sxx * syy).sqrt();
    if denom == 0.0 {
        return None;
    }
    Some((sxy / denom).clamp(-1.0, 1.0))
}

/// Percentile with linear interpolation between closest ranks.
///
/// `q` is a fraction in [0, 1]; the rank is `q * (n - 1)` over the sorted
/// sample. Returns 0.0 for an empty sample.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}
