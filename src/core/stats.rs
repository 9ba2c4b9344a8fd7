//! Descriptive statistics over `f64` sequences.
//!
//! All reductions reject empty input instead of returning NaN.

use thiserror::Error;

/// Errors raised by the statistics helpers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("invalid input: {0} of an empty sequence is undefined")]
    InvalidInput(&'static str),
}

/// Result type for statistics operations.
pub type Result<T> = std::result::Result<T, StatsError>;

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(StatsError::InvalidInput("mean"));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median; for an even count the mean of the two middle values.
pub fn median(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(StatsError::InvalidInput("median"));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

/// Population standard deviation (divides by N).
pub fn standard_deviation(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(StatsError::InvalidInput("standard deviation"));
    }

    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    Ok(variance.sqrt())
}

/// Root mean square.
pub fn root_mean_square(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(StatsError::InvalidInput("root mean square"));
    }
    Ok((values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64).sqrt())
}

/// Absolute differences between consecutive values; length is `n - 1`.
pub fn abs_consecutive_deltas(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| (w[1] - w[0]).abs()).collect()
}
