pub mod cli;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod forecast;
pub mod pipeline;
pub mod simulation;
pub mod telemetry;
