//! Descriptive statistics and simple linear regression over `f64` series.
//!
//! Nothing here knows about money or dates. Empty input yields zeros rather
//! than panics so callers can degrade gracefully.

use serde::{Deserialize, Serialize};

const EPSILON: f64 = 1e-12;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values
        .iter()
        .map(|value| (value - avg).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

/// Standard deviation over mean, in percent. `None` when the mean is zero.
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let avg = mean(values);
    if avg.abs() < EPSILON {
        return None;
    }
    Some(std_dev(values) / avg.abs() * 100.0)
}

pub fn median(values: &[f64]) -> f64 {
    percentile(values, 50.0)
}

/// Linear-interpolated percentile (`p` in 0..=100) of an unsorted series.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Quartiles {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

impl Quartiles {
    pub fn interquartile_range(&self) -> f64 {
        self.q3 - self.q1
    }
}

pub fn quartiles(values: &[f64]) -> Quartiles {
    Quartiles {
        q1: percentile(values, 25.0),
        q2: percentile(values, 50.0),
        q3: percentile(values, 75.0),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// One-shot summary of a numeric series.
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    /// Percent; zero when the mean is zero (see `cv_defined`).
    pub coefficient_of_variation: f64,
    pub cv_defined: bool,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub quartiles: Quartiles,
}

impl DescriptiveStats {
    pub fn from_values(values: &[f64]) -> Self {
        let cv = coefficient_of_variation(values);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self {
            count: values.len(),
            mean: mean(values),
            std_dev: std_dev(values),
            coefficient_of_variation: cv.unwrap_or(0.0),
            cv_defined: cv.is_some(),
            min: if values.is_empty() { 0.0 } else { min },
            max: if values.is_empty() { 0.0 } else { max },
            median: median(values),
            quartiles: quartiles(values),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
/// Ordinary least-squares fit `y = intercept + slope * x`.
pub struct LinearRegression {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination; 1.0 for a perfect (or flat) fit.
    pub r_squared: f64,
}

impl LinearRegression {
    /// Fits the model to `(x, y)` points. Returns `None` for an empty series.
    ///
    /// Degenerate x-values (all equal) produce a flat line through the mean.
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        let x_mean = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let y_mean = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let mut sxy = 0.0;
        let mut sxx = 0.0;
        for (x, y) in points {
            sxy += (x - x_mean) * (y - y_mean);
            sxx += (x - x_mean).powi(2);
        }
        let slope = if sxx.abs() < EPSILON { 0.0 } else { sxy / sxx };
        let intercept = y_mean - slope * x_mean;

        let ss_tot: f64 = points.iter().map(|(_, y)| (y - y_mean).powi(2)).sum();
        let ss_res: f64 = points
            .iter()
            .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
            .sum();
        let r_squared = if ss_tot.abs() < EPSILON {
            1.0
        } else {
            1.0 - ss_res / ss_tot
        };

        Some(Self {
            slope,
            intercept,
            r_squared,
        })
    }

    /// Fits against a series indexed `1..=n`.
    pub fn fit_series(values: &[f64]) -> Option<Self> {
        let points: Vec<(f64, f64)> = values
            .iter()
            .enumerate()
            .map(|(idx, value)| ((idx + 1) as f64, *value))
            .collect();
        Self::fit(&points)
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}
