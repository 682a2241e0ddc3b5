//! # Synthetic Market Simulation
//!
//! Generates yearly electricity price and sales figures per state and sector.
//!
//! Each state gets its own randomized profile: a price offset on top of the
//! configured base price, plus a yearly price drift and sales drift. Every
//! (year, sector) row then applies the drift linearly and adds gaussian noise.
//! Sector rows are rounded like published tables (price to the cent, sales to
//! whole MWh) and aggregated into one state-level record per year.
//!
//! The generator is always passed in by the caller, so a seeded
//! [`rand::rngs::StdRng`] gives reproducible output.

use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError, Uniform};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::trace;

use crate::config::{SynthesisConfig, MAX_START_YEAR, MIN_START_YEAR};
use crate::domain::{HistoricalSeries, Sector, SectorRecord, SeriesError, StateRecord, UsState};

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Invalid distribution parameters for {what}")]
    Distribution {
        what: &'static str,
        #[source]
        source: NormalError,
    },
    #[error("Standard deviation for {what} must be finite and non-negative, got {value}")]
    InvalidStd { what: &'static str, value: f64 },
    #[error("Invalid range for {what}: {min} > {max}")]
    InvertedRange { what: &'static str, min: f64, max: f64 },
    #[error("Range bounds for {what} must be finite: [{min}, {max}]")]
    NonFiniteRange { what: &'static str, min: f64, max: f64 },
    #[error("Start year {start} outside {min}..={max}")]
    StartYearOutOfRange { start: i32, min: i32, max: i32 },
    #[error("Historical window must cover at least one year")]
    EmptyWindow,
    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// Randomized per-state parameters, drawn once before the yearly loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateProfile {
    pub price_offset: f64,
    pub price_drift: f64,
    pub sales_drift: f64,
}

/// Synthesizes historical series for every state
pub struct MarketSimulator {
    config: SynthesisConfig,
    price_offset: Uniform<f64>,
    price_drift: Normal<f64>,
    sales_drift: Normal<f64>,
    price_noise: Normal<f64>,
    sales_noise: Normal<f64>,
}

impl MarketSimulator {
    /// Create a simulator, rejecting parameters no distribution can be built from
    pub fn new(config: SynthesisConfig) -> Result<Self, SynthesisError> {
        if config.window_years == 0 {
            return Err(SynthesisError::EmptyWindow);
        }
        if !(MIN_START_YEAR..=MAX_START_YEAR).contains(&config.start_year) {
            return Err(SynthesisError::StartYearOutOfRange {
                start: config.start_year,
                min: MIN_START_YEAR,
                max: MAX_START_YEAR,
            });
        }
        if !config.price_offset_min.is_finite() || !config.price_offset_max.is_finite() {
            return Err(SynthesisError::NonFiniteRange {
                what: "price offset",
                min: config.price_offset_min,
                max: config.price_offset_max,
            });
        }
        if config.price_offset_min > config.price_offset_max {
            return Err(SynthesisError::InvertedRange {
                what: "price offset",
                min: config.price_offset_min,
                max: config.price_offset_max,
            });
        }

        // rand_distr accepts a negative std_dev, so check it here
        let normal = |what: &'static str, mean: f64, std: f64| {
            if !(std.is_finite() && std >= 0.0) {
                return Err(SynthesisError::InvalidStd { what, value: std });
            }
            Normal::new(mean, std).map_err(|source| SynthesisError::Distribution { what, source })
        };

        Ok(Self {
            price_offset: Uniform::new_inclusive(config.price_offset_min, config.price_offset_max),
            price_drift: normal("price drift", config.price_drift_mean, config.price_drift_std)?,
            sales_drift: normal("sales drift", config.sales_drift_mean, config.sales_drift_std)?,
            price_noise: normal("price noise", 0.0, config.price_noise_std)?,
            sales_noise: normal("sales noise", 0.0, config.sales_noise_std)?,
            config,
        })
    }

    /// Historical years covered, in order
    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.config.start_year..=self.config.end_year()
    }

    /// Draw the randomized baseline and drifts for one state
    pub fn draw_profile<R: Rng + ?Sized>(&self, rng: &mut R) -> StateProfile {
        StateProfile {
            price_offset: self.price_offset.sample(rng),
            price_drift: self.price_drift.sample(rng),
            sales_drift: self.sales_drift.sample(rng),
        }
    }

    /// Per-sector rows for one state across the whole window
    pub fn synthesize_sectors<R: Rng + ?Sized>(
        &self,
        state: UsState,
        rng: &mut R,
    ) -> Vec<SectorRecord> {
        let profile = self.draw_profile(rng);
        trace!(%state, ?profile, "drew state profile");
        self.sectors_for_profile(state, &profile, rng)
    }

    /// Rows for a known profile; only the noise terms are drawn from `rng`
    pub fn sectors_for_profile<R: Rng + ?Sized>(
        &self,
        state: UsState,
        profile: &StateProfile,
        rng: &mut R,
    ) -> Vec<SectorRecord> {
        let cfg = &self.config;
        let mut rows = Vec::with_capacity(cfg.window_years as usize * 3);

        for (elapsed, year) in self.years().enumerate() {
            let elapsed = elapsed as f64;
            let price_base = cfg.base_price + profile.price_offset + profile.price_drift * elapsed;
            let sales_base = cfg.base_sales + profile.sales_drift * elapsed;

            for sector in Sector::iter() {
                let price = price_base + self.price_noise.sample(rng);
                let sales = sales_base * sector.sales_multiplier() + self.sales_noise.sample(rng);
                rows.push(SectorRecord {
                    state,
                    year,
                    sector,
                    price_cents_per_kwh: round_cents(price),
                    sales_mwh: sales.trunc(),
                });
            }
        }
        rows
    }

    /// One state's aggregated historical series
    pub fn synthesize_state<R: Rng + ?Sized>(
        &self,
        state: UsState,
        rng: &mut R,
    ) -> Result<HistoricalSeries, SynthesisError> {
        let sectors = self.synthesize_sectors(state, rng);
        Ok(HistoricalSeries::new(aggregate_sectors(&sectors))?)
    }

    /// Series for all 50 states, drawn in state-name order
    pub fn synthesize_all<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<BTreeMap<UsState, HistoricalSeries>, SynthesisError> {
        UsState::all()
            .map(|state| Ok((state, self.synthesize_state(state, &mut *rng)?)))
            .collect()
    }
}

/// Collapse sector rows into one record per (state, year):
/// mean price across sectors and total sales.
pub fn aggregate_sectors(rows: &[SectorRecord]) -> Vec<StateRecord> {
    let mut acc: BTreeMap<(UsState, i32), (f64, usize, f64)> = BTreeMap::new();
    for row in rows {
        let entry = acc.entry((row.state, row.year)).or_insert((0.0, 0, 0.0));
        entry.0 += row.price_cents_per_kwh;
        entry.1 += 1;
        entry.2 += row.sales_mwh;
    }

    acc.into_iter()
        .map(|((state, year), (price_sum, n, sales_sum))| StateRecord {
            state,
            year,
            avg_price_cents_per_kwh: price_sum / n as f64,
            total_sales_mwh: sales_sum,
        })
        .collect()
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
