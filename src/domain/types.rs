use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::UsState;

/// Series construction errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("Historical series is empty")]
    Empty,
    #[error("Record for {found} in series of {expected}")]
    MixedStates { expected: UsState, found: UsState },
    #[error("Years not contiguous for {state}: {previous} followed by {next}")]
    NonContiguous {
        state: UsState,
        previous: i32,
        next: i32,
    },
    #[error("Forecast for {state} starts at {first}, expected {expected}")]
    ForecastNotContiguous {
        state: UsState,
        expected: i32,
        first: i32,
    },
    #[error("Year {year} for {state} leaves no room for following years")]
    YearOverflow { state: UsState, year: i32 },
}

// ============================================================================
// Sector Breakdown
// ============================================================================

/// Customer class a synthetic row is generated for
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Sector {
    Residential,
    Commercial,
    Industrial,
}

impl Sector {
    /// Sales volume relative to the residential baseline
    pub fn sales_multiplier(&self) -> f64 {
        match self {
            Self::Residential => 1.0,
            Self::Commercial => 1.2,
            Self::Industrial => 1.5,
        }
    }
}

/// One synthetic (state, year, sector) row, before aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorRecord {
    pub state: UsState,
    pub year: i32,
    pub sector: Sector,
    pub price_cents_per_kwh: f64,
    pub sales_mwh: f64,
}

// ============================================================================
// Historical Records
// ============================================================================

/// Yearly state-level figures: mean price across sectors, total sales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    pub state: UsState,
    pub year: i32,
    pub avg_price_cents_per_kwh: f64,
    pub total_sales_mwh: f64,
}

/// Year-ordered, contiguous records for a single state.
///
/// Only constructible through [`HistoricalSeries::new`], which enforces the
/// ordering invariants; there is no way to mutate a series afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalSeries {
    state: UsState,
    records: Vec<StateRecord>,
}

impl HistoricalSeries {
    pub fn new(records: Vec<StateRecord>) -> Result<Self, SeriesError> {
        let state = records.first().ok_or(SeriesError::Empty)?.state;

        if let Some(r) = records.iter().find(|r| r.state != state) {
            return Err(SeriesError::MixedStates {
                expected: state,
                found: r.state,
            });
        }

        if let Some((a, b)) = records
            .iter()
            .tuple_windows()
            .find(|(a, b)| a.year.checked_add(1) != Some(b.year))
        {
            return Err(SeriesError::NonContiguous {
                state,
                previous: a.year,
                next: b.year,
            });
        }

        Ok(Self { state, records })
    }

    pub fn state(&self) -> UsState {
        self.state
    }

    pub fn records(&self) -> &[StateRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_year(&self) -> i32 {
        self.records[0].year
    }

    pub fn last_year(&self) -> i32 {
        self.records[self.records.len() - 1].year
    }

    pub fn years(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.year as f64).collect()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.avg_price_cents_per_kwh).collect()
    }

    pub fn sales(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.total_sales_mwh).collect()
    }
}

// ============================================================================
// Forecast Output
// ============================================================================

/// Projected figures for one year past the historical window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub year: i32,
    pub predicted_price: f64,
    pub predicted_sales: f64,
}

/// Historical series plus its forecast for one state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateBundle {
    pub state: UsState,
    pub historical: HistoricalSeries,
    pub forecast: Vec<ForecastPoint>,
}

impl StateBundle {
    /// Pair a series with its forecast, checking the forecast picks up
    /// right after the last historical year and stays contiguous.
    pub fn new(
        historical: HistoricalSeries,
        forecast: Vec<ForecastPoint>,
    ) -> Result<Self, SeriesError> {
        let state = historical.state();

        if let Some(first) = forecast.first() {
            let last = historical.last_year();
            let expected = last
                .checked_add(1)
                .ok_or(SeriesError::YearOverflow { state, year: last })?;
            if first.year != expected {
                return Err(SeriesError::ForecastNotContiguous {
                    state,
                    expected,
                    first: first.year,
                });
            }
        }

        if let Some((a, b)) = forecast
            .iter()
            .tuple_windows()
            .find(|(a, b)| a.year.checked_add(1) != Some(b.year))
        {
            return Err(SeriesError::NonContiguous {
                state,
                previous: a.year,
                next: b.year,
            });
        }

        Ok(Self {
            state,
            historical,
            forecast,
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
