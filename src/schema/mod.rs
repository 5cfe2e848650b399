//! Schema module - Parameter, individual and configuration types for the evolver.

mod config;
mod individual;

pub use config::*;
pub use individual::*;
