//! Individual-level genetic operators.
//!
//! Provides random generation, single-field mutation, uniform crossover and
//! fitness-biased selection, all driven by one engine-owned RNG.

use std::collections::BTreeMap;

use rand::prelude::*;

use crate::schema::{Individual, Parameters, Schema};

/// Index drawn from a descending-sorted population of `length` individuals.
///
/// Computes `floor(u³ · length)`, which skews selection towards low indices
/// (the fittest individuals). `u` must lie in `[0, 1)`.
#[inline]
pub fn index_for(u: f64, length: usize) -> usize {
    debug_assert!(length > 0, "cannot select from an empty population");
    debug_assert!((0.0..1.0).contains(&u));
    let index = (u * u * u * length as f64).floor() as usize;
    // Guards against float rounding for very large populations.
    index.min(length.saturating_sub(1))
}

/// Random number generator wrapper for the evolution operators.
pub struct OperatorRng {
    rng: StdRng,
}

impl OperatorRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded when `seed` is given, entropy-seeded otherwise.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(seed),
            None => Self::random(),
        }
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    /// Fresh parameters with every schema field uniform in `[0, 1)`.
    pub fn random_parameters(&mut self, schema: &Schema) -> Parameters {
        let values: BTreeMap<String, f64> = schema
            .names()
            .iter()
            .map(|name| (name.clone(), self.unit()))
            .collect();
        Parameters::from_values(values)
    }

    /// Copy `individual` and redraw exactly one schema field.
    pub fn mutate(&mut self, schema: &Schema, individual: &Individual) -> Individual {
        let mut child = individual.stripped();
        let field = schema.name(self.rng.gen_range(0..schema.len()));
        let value = self.unit();
        child.parameters.set(field, value);
        child
    }

    /// Copy `parent1`, taking each field from `parent2` with probability 0.5.
    pub fn crossover(
        &mut self,
        schema: &Schema,
        parent1: &Individual,
        parent2: &Individual,
    ) -> Individual {
        debug_assert!(schema.matches(&parent2.parameters));
        let mut child = parent1.stripped();
        for name in schema.names() {
            if self.rng.gen_bool(0.5)
                && let Some(value) = parent2.get(name)
            {
                child.parameters.set(name, value);
            }
        }
        child
    }

    /// Draw an individual from a descending-sorted population, favouring the front.
    pub fn select<'a>(&mut self, population: &'a [Individual]) -> &'a Individual {
        let u = self.unit();
        &population[index_for(u, population.len())]
    }
}
