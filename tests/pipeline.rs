//! End-to-end runs of the synthesize → forecast → bundle pipeline.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

use state_electricity_outlook::config::{Config, SynthesisConfig};
use state_electricity_outlook::dashboard::extract_payload;
use state_electricity_outlook::forecast::FORECAST_HORIZON_YEARS;
use state_electricity_outlook::pipeline::{self, build_bundles};

fn config_for(path: &Path, seed: u64) -> Config {
    let mut cfg = Config::default();
    cfg.synthesis.seed = Some(seed);
    cfg.output.path = path.to_path_buf();
    cfg.validated().unwrap()
}

fn payload_of(path: &Path) -> String {
    let html = fs::read_to_string(path).unwrap();
    extract_payload(&html).unwrap().to_string()
}

#[test]
fn test_seed_42_end_to_end() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("prediction_dashboard.html");
    let cfg = config_for(&out, 42);

    let summary = pipeline::run(&cfg).unwrap();
    assert_eq!(summary.seed, 42);
    assert_eq!(summary.states, 50);
    assert_eq!(summary.historical_records, 50 * 20);
    assert_eq!(summary.forecast_points, 50 * FORECAST_HORIZON_YEARS);

    let html = fs::read_to_string(&out).unwrap();
    assert!(!html.is_empty());
    assert!(html.contains("\"California\""));
    assert!(html.contains("cdn.plot.ly"));

    let payload: Value = serde_json::from_str(extract_payload(&html).unwrap()).unwrap();
    let california = &payload["California"];
    assert_eq!(california["historical"][0]["year"], cfg.synthesis.start_year);
}

#[test]
fn test_payload_covers_every_state() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("dash.html");
    pipeline::run(&config_for(&out, 7)).unwrap();

    let payload: Value = serde_json::from_str(&payload_of(&out)).unwrap();
    let states = payload.as_object().unwrap();
    assert_eq!(states.len(), 50);
    assert!(states.contains_key("New Hampshire"));
    assert!(states.contains_key("Wyoming"));

    for (name, series) in states {
        let hist = series["historical"].as_array().unwrap();
        let fc = series["forecast"].as_array().unwrap();
        assert_eq!(hist.len(), 20, "{name}");
        assert_eq!(fc.len(), 5, "{name}");

        let years: Vec<i64> = hist
            .iter()
            .chain(fc)
            .map(|p| p["year"].as_i64().unwrap())
            .collect();
        let expected: Vec<i64> = (2005..2030).collect();
        assert_eq!(years, expected, "{name}");
    }
}

#[test]
fn test_fixed_seed_gives_identical_payload() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.html");
    let b = dir.path().join("b.html");
    let c = dir.path().join("c.html");

    pipeline::run(&config_for(&a, 42)).unwrap();
    pipeline::run(&config_for(&b, 42)).unwrap();
    pipeline::run(&config_for(&c, 43)).unwrap();

    assert_eq!(payload_of(&a), payload_of(&b));
    assert_ne!(payload_of(&a), payload_of(&c));
}

#[test]
fn test_rerun_overwrites_output() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("dash.html");
    fs::write(&out, "stale").unwrap();

    pipeline::run(&config_for(&out, 1)).unwrap();
    assert!(fs::read_to_string(&out).unwrap().starts_with("<!DOCTYPE html>"));
}

#[test]
fn test_strong_negative_drift_is_not_clamped() {
    let cfg = SynthesisConfig {
        base_price: 1.0,
        price_offset_min: 0.0,
        price_offset_max: 0.0,
        price_drift_mean: -2.0,
        price_drift_std: 0.0,
        price_noise_std: 0.0,
        base_sales: 1_000.0,
        sales_drift_mean: -500.0,
        sales_drift_std: 0.0,
        sales_noise_std: 0.0,
        ..Default::default()
    };
    let bundles = build_bundles(&cfg, &mut StdRng::seed_from_u64(42)).unwrap();

    for bundle in &bundles {
        assert!(bundle.forecast.iter().all(|p| p.predicted_price < 0.0));
        assert!(bundle.forecast.iter().all(|p| p.predicted_sales < 0.0));
        // 1 - 2 * 24 for the last forecast year
        let last = bundle.forecast.last().unwrap();
        assert!((last.predicted_price + 47.0).abs() < 1e-6);
    }
}

#[test]
fn test_failed_run_writes_nothing() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "x").unwrap();
    let out = blocker.join("dash.html");

    assert!(pipeline::run(&config_for(&out, 42)).is_err());
    assert!(!out.exists());
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}
