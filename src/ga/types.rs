//! Core trait definitions for the GA framework.
//!
//! [`Individual`] and [`GaProblem`] define the
//! contract between the generic GA engine and the rostering problem.

use rand::Rng;

/// Marker trait for fitness values.
///
/// Fitness must support comparison and be cheaply copyable.
/// Lower fitness is considered better (minimization).
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// Returns a value representing the worst possible fitness.
    ///
    /// Reported for individuals that have not been evaluated yet.
    fn worst() -> Self;

    /// Converts the fitness to `f64` for logging and statistics.
    fn to_f64(self) -> f64;
}

impl Fitness for f64 {
    fn worst() -> Self {
        f64::INFINITY
    }

    fn to_f64(self) -> f64 {
        self
    }
}

/// A candidate solution in the GA population.
///
/// Individuals cache their own fitness. The runner calls
/// [`GaProblem::evaluate`] only for individuals whose cache is empty
/// ([`is_evaluated`](Individual::is_evaluated) returns `false`), then stores
/// the score via [`set_fitness`](Individual::set_fitness).
pub trait Individual: Clone + Send + Sync {
    /// The fitness type. Must implement [`Fitness`].
    type Fitness: Fitness;

    /// Returns the cached fitness, or [`Fitness::worst`] when not evaluated.
    fn fitness(&self) -> Self::Fitness;

    /// Stores a freshly computed fitness.
    fn set_fitness(&mut self, fitness: Self::Fitness);

    /// Whether the cached fitness is valid.
    fn is_evaluated(&self) -> bool;
}

/// Defines a GA optimization problem.
///
/// Covers the four problem-specific steps of the loop:
///
/// 1. **Initialization**: how to create random individuals
/// 2. **Evaluation**: how to compute fitness
/// 3. **Crossover**: how to recombine two parents into one offspring
/// 4. **Mutation**: how to perturb an offspring, gene by gene
///
/// # Thread Safety
///
/// `GaProblem` must be `Send + Sync` because the runner evaluates
/// individuals in parallel using rayon.
pub trait GaProblem: Send + Sync {
    /// The individual (solution) type for this problem.
    type Individual: Individual;

    /// Creates a random individual.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Evaluates an individual and returns its fitness.
    ///
    /// Must be a pure function of the individual and the problem's static
    /// data; the runner may call it concurrently on distinct individuals.
    fn evaluate(&self, individual: &Self::Individual) -> <Self::Individual as Individual>::Fitness;

    /// Produces one offspring by recombining two parents.
    ///
    /// The default implementation clones `parent1`.
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        _parent2: &Self::Individual,
        _rng: &mut R,
    ) -> Self::Individual {
        parent1.clone()
    }

    /// Mutates an individual in place.
    ///
    /// `gene_rate` is the per-gene mutation probability from the config.
    /// The default implementation is a no-op.
    fn mutate<R: Rng>(&self, _individual: &mut Self::Individual, _gene_rate: f64, _rng: &mut R) {}

    /// Called at the end of each generation with the best fitness of the
    /// new population. The default implementation is a no-op.
    fn on_generation(
        &self,
        _generation: usize,
        _best_fitness: <Self::Individual as Individual>::Fitness,
    ) {
    }
}
