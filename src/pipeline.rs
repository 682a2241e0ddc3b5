//! Synthesize → forecast → bundle, run once per invocation.

use anyhow::{Context, Result};
use chrono::Utc;
use rand::Rng;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use crate::config::{Config, DashboardConfig, SynthesisConfig};
use crate::dashboard::{render_dashboard, write_atomic, DashboardPayload};
use crate::domain::StateBundle;
use crate::forecast::TrendForecaster;
use crate::simulation::{seeded_rng, MarketSimulator};

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub seed: u64,
    pub states: usize,
    pub historical_records: usize,
    pub forecast_points: usize,
    pub output_path: PathBuf,
    pub bytes_written: usize,
}

/// Synthesize every state's history and forecast it
pub fn build_bundles<R: Rng + ?Sized>(
    cfg: &SynthesisConfig,
    rng: &mut R,
) -> Result<Vec<StateBundle>> {
    let simulator = MarketSimulator::new(cfg.clone()).context("invalid synthesis parameters")?;
    let series = simulator
        .synthesize_all(rng)
        .context("synthesizing historical series")?;
    info!(
        states = series.len(),
        first_year = cfg.start_year,
        last_year = cfg.end_year(),
        "synthesized historical data"
    );

    let bundles = TrendForecaster::new()
        .forecast_all(series)
        .context("fitting state trends")?;
    info!(states = bundles.len(), "forecasts complete");
    Ok(bundles)
}

/// Full dashboard document with the payload embedded
pub fn render(bundles: &[StateBundle], cfg: &DashboardConfig) -> Result<String> {
    let payload = DashboardPayload::from_bundles(bundles);
    let json = payload.to_json().context("serializing dashboard payload")?;
    let html = render_dashboard(&json, cfg, Utc::now()).context("rendering dashboard")?;
    Ok(html)
}

pub fn run(cfg: &Config) -> Result<RunSummary> {
    let started = Instant::now();
    let (mut rng, seed) = seeded_rng(cfg.synthesis.seed);
    info!(seed, "starting run");

    let bundles = build_bundles(&cfg.synthesis, &mut rng)?;
    let html = render(&bundles, &cfg.dashboard)?;

    let path = &cfg.output.path;
    write_atomic(path, html.as_bytes())
        .with_context(|| format!("writing dashboard to {}", path.display()))?;

    let summary = RunSummary {
        seed,
        states: bundles.len(),
        historical_records: bundles.iter().map(|b| b.historical.len()).sum(),
        forecast_points: bundles.iter().map(|b| b.forecast.len()).sum(),
        output_path: path.clone(),
        bytes_written: html.len(),
    };
    info!(
        path = %path.display(),
        bytes = summary.bytes_written,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "dashboard written"
    );
    Ok(summary)
}
