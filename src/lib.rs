//! Gromit - Generational evolutionary search.
//!
//! Given a schema of named parameters in `[0, 1)` and a fitness function over
//! them, an [`Evolver`] keeps a population of candidate parameter sets and
//! improves it generation by generation through elitist copying, mutation,
//! crossover and random reinitialisation.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Parameter, individual and configuration types
//! - `compute`: The evolution engine (operators, fitness pass, scheduler)
//!
//! # Example
//!
//! ```rust,no_run
//! use gromit::{Evolver, EvolverConfig, Parameters, Schema};
//!
//! // Find x, y in [0, 32) with x^y close to 12345
//! let fitness = |p: &Parameters| {
//!     let x = p["x"] * 32.0;
//!     let y = p["y"] * 32.0;
//!     -(12345.0 - x.powf(y)).abs()
//! };
//!
//! let schema = Schema::new(["x", "y"]).unwrap();
//! let mut evolver = Evolver::new(schema, fitness, EvolverConfig::default()).unwrap();
//!
//! while evolver.evolve().unwrap() < -0.25 {}
//!
//! println!("Best: {:?}", evolver.most_fit_individual());
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{EvolveError, Evolver, Fallible, GenerationStats, HandlerError, Quotas};
pub use schema::{ConfigError, EvolverConfig, Individual, Parameters, Schema};
