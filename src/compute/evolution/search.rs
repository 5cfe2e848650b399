//! Generational search: the population store and the scheduler that
//! builds each new generation from the survivors of the last.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::schema::{ConfigError, EvolverConfig, Individual, Schema};

use super::EvolveError;
use super::fitness::{CreationHook, FitnessHandler, HandlerError, fitness_test_population, score};
use super::operators::OperatorRng;

/// Per-generation allocation of individuals across operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quotas {
    /// Weakest individuals dropped from the previous generation.
    pub num_to_kill: usize,
    /// Size of the survivor pool the operators draw from.
    pub survivor_count: usize,
    /// Fittest survivors carried over unchanged.
    pub num_to_copy: usize,
    /// Mutated copies of selected survivors.
    pub num_to_mutate: usize,
    /// Crossovers of two selected survivors.
    pub num_to_crossover: usize,
}

impl Quotas {
    /// Compute the allocation for `config`.
    ///
    /// Each quota is floored independently. Whatever they leave short of
    /// `population_size` is filled with random individuals.
    pub fn compute(config: &EvolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let num_to_kill = config.num_to_kill();
        let survivor_count = config.population_size - num_to_kill;
        let weighted_total = config.weighted_total();
        let share = |weight: f64| (weight / weighted_total * survivor_count as f64).floor() as usize;

        Ok(Self {
            num_to_kill,
            survivor_count,
            num_to_copy: share(config.copy_weight),
            num_to_mutate: share(config.mutate_weight),
            num_to_crossover: share(config.crossover_weight),
        })
    }

    /// Individuals produced by the three operators.
    #[inline]
    pub fn operator_total(&self) -> usize {
        self.num_to_copy + self.num_to_mutate + self.num_to_crossover
    }

    /// Random individuals needed to restore `population_size`.
    #[inline]
    pub fn random_fill(&self, population_size: usize) -> usize {
        population_size.saturating_sub(self.operator_total())
    }
}

/// Fitness summary of the current generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Completed `evolve()` calls.
    pub generation: usize,
    /// Fitness of the first (fittest) individual.
    pub best_fitness: f64,
    /// Average fitness over the whole population.
    pub mean_fitness: f64,
    /// Fitness of the last (least fit) individual.
    pub worst_fitness: f64,
}

/// Borrowed view of the parts of an [`Evolver`] needed to produce individuals.
struct Breeder<'a> {
    rng: &'a mut OperatorRng,
    schema: &'a Schema,
    config: &'a EvolverConfig,
    creation_hook: Option<&'a dyn CreationHook>,
}

impl Breeder<'_> {
    fn new_individual(&mut self) -> Result<Individual, HandlerError> {
        let mut parameters = self.rng.random_parameters(self.schema);
        if let Some(hook) = self.creation_hook {
            hook.on_create(&mut parameters)?;
        }
        debug_assert!(self.schema.matches(&parameters));
        Ok(Individual::new(parameters))
    }

    fn random_population(&mut self) -> Result<Vec<Individual>, HandlerError> {
        (0..self.config.population_size)
            .map(|_| self.new_individual())
            .collect()
    }

    /// Build the unevaluated successor of a descending-sorted population.
    fn next_generation(&mut self, current: &[Individual]) -> Result<Vec<Individual>, EvolveError> {
        let quotas = Quotas::compute(self.config)?;
        let survivors = &current[..quotas.survivor_count.min(current.len())];
        debug_assert!(!survivors.is_empty());

        let mut next = Vec::with_capacity(self.config.population_size);

        // Elitism: fittest survivors unchanged
        next.extend_from_slice(&survivors[..quotas.num_to_copy.min(survivors.len())]);

        for _ in 0..quotas.num_to_mutate {
            let parent = self.rng.select(survivors);
            next.push(self.rng.mutate(self.schema, parent));
        }

        for _ in 0..quotas.num_to_crossover {
            let parent1 = self.rng.select(survivors);
            let parent2 = self.rng.select(survivors);
            next.push(self.rng.crossover(self.schema, parent1, parent2));
        }

        let operator_total = next.len();
        while next.len() < self.config.population_size {
            next.push(self.new_individual()?);
        }

        debug!(
            "killed {}, copied {}, mutated {}, crossed {}, random {}",
            quotas.num_to_kill,
            quotas.num_to_copy,
            quotas.num_to_mutate,
            quotas.num_to_crossover,
            next.len() - operator_total
        );

        Ok(next)
    }
}

/// Generational evolutionary search over a fixed parameter schema.
///
/// The population is absent until the first [`evolve`](Self::evolve) call and
/// is replaced wholesale on every call after that. It is always sorted by
/// descending fitness when observed.
pub struct Evolver {
    schema: Schema,
    config: EvolverConfig,
    fitness_handler: Box<dyn FitnessHandler>,
    creation_hook: Option<Box<dyn CreationHook>>,
    rng: OperatorRng,
    population: Option<Vec<Individual>>,
    generation: usize,
}

impl Evolver {
    /// Create a new evolver, validating `config`.
    pub fn new<H>(schema: Schema, fitness_handler: H, config: EvolverConfig) -> Result<Self, ConfigError>
    where
        H: FitnessHandler + 'static,
    {
        config.validate()?;
        let rng = OperatorRng::from_seed(config.random_seed);

        Ok(Self {
            schema,
            config,
            fitness_handler: Box::new(fitness_handler),
            creation_hook: None,
            rng,
            population: None,
            generation: 0,
        })
    }

    /// Set the creation hook.
    pub fn with_creation_hook<C>(mut self, hook: C) -> Self
    where
        C: CreationHook + 'static,
    {
        self.set_creation_hook(hook);
        self
    }

    /// Install a hook called on every randomly generated individual.
    pub fn set_creation_hook<C>(&mut self, hook: C)
    where
        C: CreationHook + 'static,
    {
        self.creation_hook = Some(Box::new(hook));
    }

    /// Remove the creation hook, if any.
    pub fn clear_creation_hook(&mut self) {
        self.creation_hook = None;
    }

    /// Parameter schema shared by every individual.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validated configuration this evolver was built with.
    pub fn config(&self) -> &EvolverConfig {
        &self.config
    }

    /// Number of completed `evolve()` calls.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Operator allocation used for every generation after the first.
    pub fn quotas(&self) -> Result<Quotas, ConfigError> {
        Quotas::compute(&self.config)
    }

    fn breeder(&mut self) -> Breeder<'_> {
        self.split().0
    }

    /// Breeder plus the stored population, borrowed disjointly.
    fn split(&mut self) -> (Breeder<'_>, Option<&[Individual]>) {
        let breeder = Breeder {
            rng: &mut self.rng,
            schema: &self.schema,
            config: &self.config,
            creation_hook: self.creation_hook.as_deref(),
        };
        (breeder, self.population.as_deref())
    }

    /// Advance one generation and return the best fitness.
    ///
    /// The first call creates and scores a random population. On error the
    /// previously stored population is left untouched.
    pub fn evolve(&mut self) -> Result<f64, EvolveError> {
        let (mut breeder, current) = self.split();
        let next = match current {
            None => {
                trace!(
                    "creating initial population of {}",
                    breeder.config.population_size
                );
                breeder.random_population()?
            }
            Some(current) => breeder.next_generation(current)?,
        };

        let evaluated = fitness_test_population(self.fitness_handler.as_ref(), &self.schema, next)?;
        let best = score(&evaluated[0]);

        self.population = Some(evaluated);
        self.generation += 1;
        debug!("generation {}: best fitness {}", self.generation, best);

        Ok(best)
    }

    /// Current population sorted by descending fitness, `None` before the first `evolve()`.
    pub fn current_population(&self) -> Option<&[Individual]> {
        self.population.as_deref()
    }

    /// Fittest individual of the current population.
    pub fn most_fit_individual(&self) -> Option<&Individual> {
        self.population.as_deref().and_then(|p| p.first())
    }

    /// Fitness summary of the current population.
    pub fn stats(&self) -> Option<GenerationStats> {
        let population = self.population.as_deref()?;
        let best_fitness = score(population.first()?);
        let worst_fitness = population.last().map(score)?;
        let mean_fitness = population.iter().map(score).sum::<f64>() / population.len() as f64;

        Some(GenerationStats {
            generation: self.generation,
            best_fitness,
            mean_fitness,
            worst_fitness,
        })
    }

    /// Generate one random individual, running the creation hook.
    pub fn new_individual(&mut self) -> Result<Individual, HandlerError> {
        self.breeder().new_individual()
    }

    /// Generate `population_size` random individuals, unevaluated.
    pub fn create_random_population(&mut self) -> Result<Vec<Individual>, HandlerError> {
        self.breeder().random_population()
    }

    /// Copy of `individual` with one field redrawn.
    pub fn mutate_individual(&mut self, individual: &Individual) -> Individual {
        self.rng.mutate(&self.schema, individual)
    }

    /// Uniform crossover of two individuals.
    pub fn crossover_individuals(&mut self, parent1: &Individual, parent2: &Individual) -> Individual {
        self.rng.crossover(&self.schema, parent1, parent2)
    }

    /// Fitness-biased draw from a descending-sorted population.
    pub fn select_individual<'a>(&mut self, population: &'a [Individual]) -> &'a Individual {
        self.rng.select(population)
    }

    /// Score and sort `population` with this evolver's fitness handler.
    pub fn fitness_test_population(
        &self,
        population: Vec<Individual>,
    ) -> Result<Vec<Individual>, EvolveError> {
        fitness_test_population(self.fitness_handler.as_ref(), &self.schema, population)
    }
}
