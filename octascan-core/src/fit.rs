//! Ordinary least-squares line fitting.

use ndarray::ArrayView1;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Coefficients of a degree-1 least-squares fit, `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LineFit {
    /// Evaluates the fitted line at `x`.
    #[must_use]
    pub fn y_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fits a line through paired samples, mean-centered for stability.
///
/// Returns `None` when fewer than two points are given, the lengths
/// differ, or all x-values coincide (vertical data has no slope).
#[must_use]
pub fn least_squares(xs: ArrayView1<'_, f64>, ys: ArrayView1<'_, f64>) -> Option<LineFit> {
    let n = xs.len();
    if n < 2 || ys.len() != n {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = n as f64;
    let x_mean = xs.sum() / count;
    let y_mean = ys.sum() / count;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        let dx = x - x_mean;
        sxx += dx * dx;
        sxy += dx * (y - y_mean);
    }
    if sxx == 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;
    Some(LineFit { slope, intercept })
}
