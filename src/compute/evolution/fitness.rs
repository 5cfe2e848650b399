//! Fitness evaluation for evolutionary search.
//!
//! User code plugs in through two capabilities: a [`FitnessHandler`] scoring
//! an individual's parameters, and an optional [`CreationHook`] that may
//! adjust each freshly generated individual in place.

use crate::schema::{Individual, Parameters, Schema};

use super::EvolveError;

/// Failure reported by a user-supplied handler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Scores an individual; higher is better.
///
/// Implemented for any `Fn(&Parameters) -> f64`. Wrap a closure returning
/// `Result<f64, HandlerError>` in [`Fallible`] to report failures.
pub trait FitnessHandler {
    fn fitness(&self, parameters: &Parameters) -> Result<f64, HandlerError>;
}

impl<F> FitnessHandler for F
where
    F: Fn(&Parameters) -> f64,
{
    fn fitness(&self, parameters: &Parameters) -> Result<f64, HandlerError> {
        Ok(self(parameters))
    }
}

/// Called on every randomly generated individual before it joins a population.
///
/// Implemented for any `Fn(&mut Parameters)`.
pub trait CreationHook {
    fn on_create(&self, parameters: &mut Parameters) -> Result<(), HandlerError>;
}

impl<F> CreationHook for F
where
    F: Fn(&mut Parameters),
{
    fn on_create(&self, parameters: &mut Parameters) -> Result<(), HandlerError> {
        self(parameters);
        Ok(())
    }
}

/// Adapter for handlers and hooks that can fail.
pub struct Fallible<F>(pub F);

impl<F> FitnessHandler for Fallible<F>
where
    F: Fn(&Parameters) -> Result<f64, HandlerError>,
{
    fn fitness(&self, parameters: &Parameters) -> Result<f64, HandlerError> {
        (self.0)(parameters)
    }
}

impl<F> CreationHook for Fallible<F>
where
    F: Fn(&mut Parameters) -> Result<(), HandlerError>,
{
    fn on_create(&self, parameters: &mut Parameters) -> Result<(), HandlerError> {
        (self.0)(parameters)
    }
}

/// Score every individual and return the population sorted by descending fitness.
///
/// Stale fitness values are discarded before the handler runs. The sort is
/// stable, so equal scores keep their input order.
pub fn fitness_test_population(
    handler: &dyn FitnessHandler,
    schema: &Schema,
    mut population: Vec<Individual>,
) -> Result<Vec<Individual>, EvolveError> {
    for (index, individual) in population.iter_mut().enumerate() {
        debug_assert!(
            schema.matches(&individual.parameters),
            "individual {index} does not match the schema"
        );

        individual.fitness = None;
        let fitness = handler.fitness(&individual.parameters)?;
        if fitness.is_nan() {
            return Err(EvolveError::NanFitness { index });
        }
        individual.fitness = Some(fitness);
    }

    population.sort_by(|a, b| score(b).total_cmp(&score(a)));
    Ok(population)
}

/// Cached fitness, treating unevaluated individuals as worst.
#[inline]
pub(crate) fn score(individual: &Individual) -> f64 {
    individual.fitness.unwrap_or(f64::NEG_INFINITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::evolution::OperatorRng;

    fn population(schema: &Schema, size: usize, seed: u64) -> Vec<Individual> {
        let mut rng = OperatorRng::new(seed);
        (0..size)
            .map(|_| Individual::new(rng.random_parameters(schema)))
            .collect()
    }

    #[test]
    fn test_sorted_descending() {
        let schema = Schema::new(["x"]).unwrap();
        let handler = |p: &Parameters| p["x"];

        let sorted = fitness_test_population(&handler, &schema, population(&schema, 20, 1)).unwrap();
        assert_eq!(sorted.len(), 20);
        for pair in sorted.windows(2) {
            assert!(pair[0].fitness.unwrap() >= pair[1].fitness.unwrap());
        }
        for individual in &sorted {
            assert_eq!(individual.fitness, Some(individual["x"]));
        }
    }

    #[test]
    fn test_stale_fitness_replaced() {
        let schema = Schema::new(["x"]).unwrap();
        let mut pop = population(&schema, 3, 2);
        for individual in &mut pop {
            individual.fitness = Some(1e9);
        }

        let sorted = fitness_test_population(&|_: &Parameters| 0.5, &schema, pop).unwrap();
        assert!(sorted.iter().all(|i| i.fitness == Some(0.5)));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let schema = Schema::new(["x"]).unwrap();
        let pop = population(&schema, 8, 3);
        let expected = pop.clone();

        let sorted = fitness_test_population(&|_: &Parameters| 1.0, &schema, pop).unwrap();
        for (a, b) in sorted.iter().zip(&expected) {
            assert_eq!(a.parameters, b.parameters);
        }
    }

    #[test]
    fn test_handler_error_propagates() {
        let schema = Schema::new(["x"]).unwrap();
        let handler = Fallible(|_: &Parameters| -> Result<f64, HandlerError> {
            Err(HandlerError::new("boom"))
        });

        let err = fitness_test_population(&handler, &schema, population(&schema, 4, 4)).unwrap_err();
        assert!(matches!(err, EvolveError::Handler(ref e) if e.0 == "boom"));
    }

    #[test]
    fn test_nan_fitness_rejected() {
        let schema = Schema::new(["x"]).unwrap();
        let err = fitness_test_population(&|_: &Parameters| f64::NAN, &schema, population(&schema, 4, 5))
            .unwrap_err();
        assert!(matches!(err, EvolveError::NanFitness { index: 0 }));
    }

    #[test]
    fn test_infinite_fitness_sorts_first() {
        let schema = Schema::new(["x"]).unwrap();
        let handler = |p: &Parameters| {
            if p["x"] < 0.5 { f64::INFINITY } else { p["x"] }
        };

        let sorted = fitness_test_population(&handler, &schema, population(&schema, 16, 6)).unwrap();
        if sorted.iter().any(|i| i["x"] < 0.5) {
            assert_eq!(sorted[0].fitness, Some(f64::INFINITY));
        }
    }

    #[test]
    fn test_closure_hook() {
        let hook = |p: &mut Parameters| {
            p.set("x", 0.0);
        };
        let schema = Schema::new(["x", "y"]).unwrap();
        let mut params = OperatorRng::new(9).random_parameters(&schema);

        hook.on_create(&mut params).unwrap();
        assert_eq!(params["x"], 0.0);
        assert!(schema.matches(&params));
    }
}
