//! Evolutionary search engine.
//!
//! # Overview
//!
//! The engine consists of:
//!
//! - **Operators** (`operators`): random generation, mutation, crossover and
//!   fitness-biased selection over a seeded RNG
//! - **Fitness** (`fitness`): pluggable fitness handlers and creation hooks,
//!   and the scoring pass that keeps populations sorted
//! - **Search** (`search`): the [`Evolver`], which owns the population and
//!   schedules each generation
//!
//! # Generations
//!
//! Each call to [`Evolver::evolve`] after the first:
//!
//! 1. Drops the weakest `floor(kill_percent * population_size)` individuals.
//! 2. Splits the survivors across copy, mutate and crossover by weight,
//!   flooring each share.
//! 3. Tops the population back up with random individuals.
//! 4. Scores and sorts the new population, then swaps it in.
//!
//! # Example
//!
//! ```rust
//! use gromit::{Evolver, EvolverConfig, Parameters, Schema};
//!
//! let schema = Schema::new(["x", "y"]).unwrap();
//! let fitness = |p: &Parameters| -(p["x"] - p["y"]).abs();
//!
//! let config = EvolverConfig {
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//! let mut evolver = Evolver::new(schema, fitness, config).unwrap();
//!
//! for _ in 0..20 {
//!     evolver.evolve().unwrap();
//! }
//! let best = evolver.most_fit_individual().unwrap();
//! println!("x={:.3} y={:.3}", best["x"], best["y"]);
//! ```

mod fitness;
mod operators;
mod search;

use crate::schema::ConfigError;

pub use fitness::{CreationHook, Fallible, FitnessHandler, HandlerError, fitness_test_population};
pub use operators::{OperatorRng, index_for};
pub use search::{Evolver, GenerationStats, Quotas};

/// Error type for evolution steps.
#[derive(Debug, thiserror::Error)]
pub enum EvolveError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Handler failed: {0}")]
    Handler(#[from] HandlerError),

    #[error("Fitness handler returned NaN for individual {index}")]
    NanFitness { index: usize },
}
