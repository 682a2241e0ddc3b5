use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::ConfigOverrides;

/// Generate synthetic state electricity data, fit trends and write an
/// interactive forecast dashboard.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file (defaults to config/default.toml if present)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Where to write the dashboard
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Random seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// First year of the historical window
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Number of historical years to generate
    #[arg(long)]
    pub window_years: Option<u32>,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            seed: self.seed,
            output: self.output.clone(),
            start_year: self.start_year,
            window_years: self.window_years,
        }
    }
}
