pub mod engine;
pub mod trend;

pub use engine::*;
pub use trend::*;

use thiserror::Error;

use crate::domain::{SeriesError, UsState};

/// Trend fitting errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Length mismatch: {xs} x values, {ys} y values")]
    LengthMismatch { xs: usize, ys: usize },

    #[error("Degenerate input: all x values identical")]
    DegenerateInput,

    #[error("Non-finite value in input")]
    NonFinite,

    #[error("Forecast failed for {state}")]
    ForState {
        state: UsState,
        #[source]
        source: Box<ForecastError>,
    },

    #[error(transparent)]
    Series(#[from] SeriesError),
}
