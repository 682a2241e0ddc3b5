use anyhow::Result;
use clap::Parser;
use state_electricity_outlook::{cli::Cli, config::Config, pipeline, telemetry};
use tracing::info;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let cfg = Config::load(cli.config.as_deref())?
        .apply_overrides(cli.overrides())
        .validated()?;

    telemetry::init_tracing(&cfg.telemetry);

    let summary = pipeline::run(&cfg)?;
    info!(
        seed = summary.seed,
        states = summary.states,
        historical_records = summary.historical_records,
        forecast_points = summary.forecast_points,
        "run complete"
    );
    println!("{}", summary.output_path.display());
    Ok(())
}
