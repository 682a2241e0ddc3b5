//! Ordinary least-squares trend line
//!
//! Fits `y = intercept + slope * x` for one univariate series. `x` is
//! centred on its mean before accumulating, which keeps the fit exact for
//! calendar years (x around 2000) where the raw-sum formulas lose precision.

use serde::{Deserialize, Serialize};

use super::ForecastError;

/// Fitted linear trend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
    pub n_observations: usize,
    /// Coefficient of determination on the training data
    pub r_squared: f64,
}

impl LinearTrend {
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self, ForecastError> {
        if xs.len() != ys.len() {
            return Err(ForecastError::LengthMismatch {
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        if xs.len() < 2 {
            return Err(ForecastError::InsufficientData {
                required: 2,
                actual: xs.len(),
            });
        }
        if xs.iter().chain(ys).any(|v| !v.is_finite()) {
            return Err(ForecastError::NonFinite);
        }

        if xs.iter().all(|&x| x == xs[0]) {
            return Err(ForecastError::DegenerateInput);
        }

        let n = xs.len() as f64;
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;

        let (sxx, sxy) = xs
            .iter()
            .zip(ys)
            .fold((0.0, 0.0), |(sxx, sxy), (&x, &y)| {
                let dx = x - mean_x;
                (sxx + dx * dx, sxy + dx * (y - mean_y))
            });

        if sxx == 0.0 {
            return Err(ForecastError::DegenerateInput);
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;

        let ss_tot: f64 = ys.iter().map(|y| (y - mean_y).powi(2)).sum();
        let ss_res: f64 = xs
            .iter()
            .zip(ys)
            .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
            .sum();
        let r_squared = if ss_tot > 1e-12 {
            1.0 - ss_res / ss_tot
        } else {
            1.0
        };

        Ok(Self {
            slope,
            intercept,
            n_observations: xs.len(),
            r_squared,
        })
    }

    /// Evaluate the line. No bounds are applied, so extrapolation may go negative.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}
