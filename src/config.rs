use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use validator::{Validate, ValidationError};

use crate::domain::UsState;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "OUTLOOK__";

/// Accepted first year of the historical window
pub const MIN_START_YEAR: i32 = 1900;
pub const MAX_START_YEAR: i32 = 3000;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub synthesis: SynthesisConfig,
    #[validate(nested)]
    pub dashboard: DashboardConfig,
    pub output: OutputConfig,
    pub telemetry: TelemetryConfig,
}

/// Parameters of the synthetic market generator.
///
/// Prices are in cents/kWh, sales in MWh, drifts per year.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_offset_range"))]
pub struct SynthesisConfig {
    /// Fixed seed for reproducible output; drawn from entropy when unset
    pub seed: Option<u64>,
    #[validate(range(min = 1900, max = 3000))]
    pub start_year: i32,
    #[validate(range(min = 2, max = 500))]
    pub window_years: u32,
    pub base_price: f64,
    pub price_offset_min: f64,
    pub price_offset_max: f64,
    pub price_drift_mean: f64,
    #[validate(range(min = 0.0))]
    pub price_drift_std: f64,
    #[validate(range(min = 0.0))]
    pub price_noise_std: f64,
    pub base_sales: f64,
    pub sales_drift_mean: f64,
    #[validate(range(min = 0.0))]
    pub sales_drift_std: f64,
    #[validate(range(min = 0.0))]
    pub sales_noise_std: f64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            seed: None,
            start_year: 2005,
            window_years: 20,
            base_price: 6.0,
            price_offset_min: 0.0,
            price_offset_max: 2.0,
            price_drift_mean: 0.4,
            price_drift_std: 0.1,
            price_noise_std: 0.5,
            base_sales: 10_000.0,
            sales_drift_mean: 500.0,
            sales_drift_std: 100.0,
            sales_noise_std: 1_000.0,
        }
    }
}

impl SynthesisConfig {
    /// Last year of the historical window (inclusive)
    pub fn end_year(&self) -> i32 {
        let window = i32::try_from(self.window_years).unwrap_or(i32::MAX);
        self.start_year.saturating_add(window).saturating_sub(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DashboardConfig {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(url)]
    pub chart_library_url: String,
    #[validate(custom(function = "validate_state_name"))]
    pub default_state: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Electricity Market Prediction Dashboard".to_string(),
            chart_library_url: "https://cdn.plot.ly/plotly-2.24.1.min.js".to_string(),
            default_state: UsState::California.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("prediction_dashboard.html"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_format: LogFormat,
    /// Fallback filter directive when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            filter: "info".to_string(),
        }
    }
}

/// Values supplied on the command line; they win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
    pub start_year: Option<i32>,
    pub window_years: Option<u32>,
}

impl Config {
    /// Defaults, then the TOML file, then `OUTLOOK__*` environment variables.
    ///
    /// The default config file is optional; an explicitly named one must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => {
                if !p.exists() {
                    anyhow::bail!("config file not found: {}", p.display());
                }
                p.to_path_buf()
            }
            None => PathBuf::from(DEFAULT_CONFIG_PATH),
        };

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(&file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        let cfg: Config = figment
            .extract()
            .with_context(|| format!("invalid configuration (file: {})", file.display()))?;
        Ok(cfg)
    }

    pub fn apply_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(seed) = overrides.seed {
            self.synthesis.seed = Some(seed);
        }
        if let Some(path) = overrides.output {
            self.output.path = path;
        }
        if let Some(year) = overrides.start_year {
            self.synthesis.start_year = year;
        }
        if let Some(window) = overrides.window_years {
            self.synthesis.window_years = window;
        }
        self
    }

    pub fn validated(self) -> Result<Self> {
        self.validate().context("configuration failed validation")?;
        Ok(self)
    }
}

fn validate_state_name(name: &str) -> Result<(), ValidationError> {
    UsState::from_str(name)
        .map(|_| ())
        .map_err(|_| ValidationError::new("unknown_state"))
}

fn validate_offset_range(cfg: &SynthesisConfig) -> Result<(), ValidationError> {
    if !cfg.price_offset_min.is_finite() || !cfg.price_offset_max.is_finite() {
        return Err(ValidationError::new("price_offset_not_finite"));
    }
    if cfg.price_offset_min > cfg.price_offset_max {
        return Err(ValidationError::new("price_offset_range_inverted"));
    }
    Ok(())
}
