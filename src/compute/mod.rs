//! Compute module - The evolutionary search engine.

pub mod evolution;

pub use evolution::*;
