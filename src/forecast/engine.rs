use std::collections::BTreeMap;
use tracing::debug;

use super::{ForecastError, LinearTrend};
use crate::domain::{ForecastPoint, HistoricalSeries, SeriesError, StateBundle, UsState};

/// Number of years projected past the historical window
pub const FORECAST_HORIZON_YEARS: usize = 5;

/// Both fitted lines for a state plus the projected points
#[derive(Debug, Clone, PartialEq)]
pub struct StateForecast {
    pub state: UsState,
    pub price_trend: LinearTrend,
    pub sales_trend: LinearTrend,
    pub points: Vec<ForecastPoint>,
}

/// Fits independent price and sales trends against year and extrapolates
/// them over [`FORECAST_HORIZON_YEARS`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendForecaster;

impl TrendForecaster {
    pub fn new() -> Self {
        Self
    }

    pub fn forecast(&self, series: &HistoricalSeries) -> Result<StateForecast, ForecastError> {
        let years = series.years();
        let price_trend = LinearTrend::fit(&years, &series.prices())?;
        let sales_trend = LinearTrend::fit(&years, &series.sales())?;

        let last = series.last_year();
        let horizon_end = last
            .checked_add(FORECAST_HORIZON_YEARS as i32)
            .ok_or(SeriesError::YearOverflow {
                state: series.state(),
                year: last,
            })?;
        let points = (last + 1..=horizon_end)
            .map(|year| ForecastPoint {
                year,
                predicted_price: price_trend.predict(year as f64),
                predicted_sales: sales_trend.predict(year as f64),
            })
            .collect();

        Ok(StateForecast {
            state: series.state(),
            price_trend,
            sales_trend,
            points,
        })
    }

    /// Forecast every state and pair it with its history, in state order
    pub fn forecast_all(
        &self,
        series: BTreeMap<UsState, HistoricalSeries>,
    ) -> Result<Vec<StateBundle>, ForecastError> {
        series
            .into_values()
            .map(|hist| {
                let state = hist.state();
                let fc = self.forecast(&hist).map_err(|e| ForecastError::ForState {
                    state,
                    source: Box::new(e),
                })?;
                debug!(
                    %state,
                    price_slope = fc.price_trend.slope,
                    price_r2 = fc.price_trend.r_squared,
                    sales_slope = fc.sales_trend.slope,
                    sales_r2 = fc.sales_trend.r_squared,
                    "fitted trends"
                );
                Ok(StateBundle::new(hist, fc.points)?)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StateRecord;

    fn series(
        state: UsState,
        start: i32,
        price: impl Fn(f64) -> f64,
        sales: impl Fn(f64) -> f64,
    ) -> HistoricalSeries {
        let records = (0..20)
            .map(|i| StateRecord {
                state,
                year: start + i,
                avg_price_cents_per_kwh: price(i as f64),
                total_sales_mwh: sales(i as f64),
            })
            .collect();
        HistoricalSeries::new(records).unwrap()
    }

    #[test]
    fn test_five_contiguous_points_after_window() {
        let hist = series(UsState::Oregon, 2005, |i| 8.0 + 0.3 * i, |i| 30_000.0 + 1_500.0 * i);
        let fc = TrendForecaster::new().forecast(&hist).unwrap();

        let years: Vec<i32> = fc.points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2025, 2026, 2027, 2028, 2029]);
        assert_eq!(fc.state, UsState::Oregon);
    }

    #[test]
    fn test_price_and_sales_fitted_independently() {
        let hist = series(UsState::Nevada, 0, |i| 10.0 + 0.5 * i, |i| 1_000.0 - 20.0 * i);
        let fc = TrendForecaster::new().forecast(&hist).unwrap();

        assert!((fc.points[0].predicted_price - 20.0).abs() < 1e-9);
        assert!((fc.points[0].predicted_sales - 600.0).abs() < 1e-9);
        assert!((fc.price_trend.slope - 0.5).abs() < 1e-9);
        assert!((fc.sales_trend.slope + 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_forecasts_are_kept() {
        let hist = series(UsState::Kansas, 2005, |i| 10.0 - 0.6 * i, |i| 5_000.0 - 300.0 * i);
        let fc = TrendForecaster::new().forecast(&hist).unwrap();

        let last = fc.points.last().unwrap();
        // 10 - 0.6 * 24 and 5000 - 300 * 24
        assert!((last.predicted_price + 4.4).abs() < 1e-9);
        assert!((last.predicted_sales + 2_200.0).abs() < 1e-6);
        assert!(fc.points.iter().any(|p| p.predicted_price < 0.0));
    }

    #[test]
    fn test_single_point_series_fails_loudly() {
        let hist = HistoricalSeries::new(vec![StateRecord {
            state: UsState::Maine,
            year: 2005,
            avg_price_cents_per_kwh: 10.0,
            total_sales_mwh: 1.0,
        }])
        .unwrap();

        let err = TrendForecaster::new().forecast(&hist).unwrap_err();
        assert_eq!(
            err,
            ForecastError::InsufficientData {
                required: 2,
                actual: 1
            }
        );

        let mut all = BTreeMap::new();
        all.insert(UsState::Maine, hist);
        let err = TrendForecaster::new().forecast_all(all).unwrap_err();
        assert!(err.to_string().contains("Maine"));
    }

    #[test]
    fn test_window_ending_near_year_limit_is_an_error() {
        let hist = series(UsState::Ohio, i32::MAX - 21, |i| i, |i| i);
        let err = TrendForecaster::new().forecast(&hist).unwrap_err();
        assert_eq!(
            err,
            ForecastError::Series(SeriesError::YearOverflow {
                state: UsState::Ohio,
                year: i32::MAX - 2,
            })
        );
    }

    #[test]
    fn test_forecast_all_orders_by_state() {
        let mut all = BTreeMap::new();
        for state in [UsState::Wyoming, UsState::Alabama, UsState::Georgia] {
            all.insert(state, series(state, 2005, |i| 7.0 + i, |i| 100.0 * i));
        }
        let bundles = TrendForecaster::new().forecast_all(all).unwrap();

        let states: Vec<UsState> = bundles.iter().map(|b| b.state).collect();
        assert_eq!(states, vec![UsState::Alabama, UsState::Georgia, UsState::Wyoming]);
        assert!(bundles.iter().all(|b| b.forecast.len() == FORECAST_HORIZON_YEARS));
    }
}
