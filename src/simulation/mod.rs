//! # Market Simulation Module
//!
//! Produces the synthetic historical data every run starts from.
//!
//! ## Usage
//!
//! ```rust
//! use state_electricity_outlook::config::SynthesisConfig;
//! use state_electricity_outlook::simulation::{seeded_rng, MarketSimulator};
//!
//! let sim = MarketSimulator::new(SynthesisConfig::default()).unwrap();
//! let (mut rng, _seed) = seeded_rng(Some(42));
//! let series = sim.synthesize_all(&mut rng).unwrap();
//! assert_eq!(series.len(), 50);
//! ```

pub mod market;

pub use market::{aggregate_sectors, MarketSimulator, StateProfile, SynthesisError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Build the run's generator. Without a configured seed one is drawn from
/// the thread rng and returned so it can be logged and replayed.
pub fn seeded_rng(seed: Option<u64>) -> (StdRng, u64) {
    let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
    (StdRng::seed_from_u64(seed), seed)
}
