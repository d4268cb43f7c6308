//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! initialization → evaluation → elitism → selection → crossover → mutation → repeat.

use super::config::GaConfig;
use super::selection::{fitter, tournament};
use super::types::{Fitness, GaProblem, Individual};
use crate::error::{RosterError, RosterResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Fitness summary of one population.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// Generation number (0 = initial population).
    pub generation: usize,
    /// Lowest fitness in the population.
    pub best: f64,
    /// Arithmetic mean fitness.
    pub mean: f64,
    /// Highest fitness in the population.
    pub worst: f64,
}

impl GenerationStats {
    fn from_sorted<I: Individual>(generation: usize, population: &[I]) -> Self {
        let best = population.first().map_or(f64::INFINITY, |i| i.fitness().to_f64());
        let worst = population.last().map_or(f64::INFINITY, |i| i.fitness().to_f64());
        let mean = if population.is_empty() {
            f64::INFINITY
        } else {
            population.iter().map(|i| i.fitness().to_f64()).sum::<f64>() / population.len() as f64
        };
        Self {
            generation,
            best,
            mean,
            worst,
        }
    }
}

/// Result of a GA optimization run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// The best individual of the final population.
    pub best: I,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: I::Fitness,

    /// Number of generations executed after the initial population.
    pub generations: usize,

    /// Whether the run stopped because the target fitness was reached.
    pub reached_target: bool,

    /// Whether the run was cancelled externally or hit its time limit.
    pub cancelled: bool,

    /// Population statistics, one entry for the initial population and one
    /// per executed generation.
    pub history: Vec<GenerationStats>,
}

impl<I: Individual> GaResult<I> {
    /// Best fitness at the end of each generation.
    pub fn fitness_history(&self) -> Vec<f64> {
        self.history.iter().map(|s| s.best).collect()
    }
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```ignore
/// let problem = MyProblem::new();
/// let config = GaConfig::default().with_seed(42);
/// let result = GaRunner::run(&problem, &config)?;
/// println!("Best fitness: {:?}", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA optimization with an RNG seeded from `config.seed`.
    pub fn run<P: GaProblem>(problem: &P, config: &GaConfig) -> RosterResult<GaResult<P::Individual>> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the GA will stop
    /// at the next generation boundary and return the best solution found
    /// so far.
    pub fn run_with_cancel<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> RosterResult<GaResult<P::Individual>> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        Self::run_with_rng(problem, config, &mut rng, cancel)
    }

    /// Runs the GA drawing all randomness from the caller's `rng`.
    ///
    /// `config.seed` is ignored. Selection, crossover and mutation consume
    /// the RNG sequentially, so a seeded RNG gives a reproducible run
    /// regardless of `config.parallel`.
    pub fn run_with_rng<P: GaProblem, R: Rng>(
        problem: &P,
        config: &GaConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> RosterResult<GaResult<P::Individual>> {
        config.validate().map_err(RosterError::InvalidParameters)?;

        let started = Instant::now();
        let time_limit = config.time_limit_ms.map(Duration::from_millis);

        // 1. Initialize population
        let mut population: Vec<P::Individual> = (0..config.population_size)
            .map(|_| problem.create_individual(rng))
            .collect();

        // 2. Evaluate initial population
        evaluate_population(problem, &mut population, config.parallel);
        sort_by_fitness(&mut population);

        let mut history = Vec::with_capacity(config.max_generations + 1);
        history.push(GenerationStats::from_sorted(0, &population));
        debug!(
            population = config.population_size,
            best = history[0].best,
            "initial population evaluated"
        );

        let mut reached_target = hits_target(config, &population[0]);
        let mut cancelled = false;
        let mut generations = 0usize;

        // 3. Evolutionary loop
        if !reached_target {
            for gen in 1..=config.max_generations {
                let flagged = cancel
                    .as_ref()
                    .is_some_and(|flag| flag.load(Ordering::Relaxed));
                let timed_out = time_limit.is_some_and(|limit| started.elapsed() >= limit);
                if flagged || timed_out {
                    debug!(generation = gen, flagged, timed_out, "run interrupted");
                    cancelled = true;
                    break;
                }

                // Elite preservation (population is sorted, best first)
                let mut next_gen: Vec<P::Individual> =
                    population[..config.elite_count].to_vec();

                // Generate offspring
                while next_gen.len() < config.population_size {
                    let p1 = &population[tournament(&population, config.tournament_size, rng)];
                    let p2 = &population[tournament(&population, config.tournament_size, rng)];

                    let mut child = if rng.random_bool(config.crossover_rate) {
                        problem.crossover(p1, p2, rng)
                    } else {
                        fitter(p1, p2).clone()
                    };

                    problem.mutate(&mut child, config.mutation_rate, rng);
                    next_gen.push(child);
                }

                // Elites and untouched clones keep their cached fitness
                evaluate_population(problem, &mut next_gen, config.parallel);
                sort_by_fitness(&mut next_gen);

                population = next_gen;
                generations = gen;

                let stats = GenerationStats::from_sorted(gen, &population);
                history.push(stats);
                problem.on_generation(gen, population[0].fitness());

                if gen % 10 == 0 || gen == config.max_generations {
                    debug!(
                        generation = gen,
                        max = config.max_generations,
                        best = stats.best,
                        mean = stats.mean,
                        "generation completed"
                    );
                }

                if hits_target(config, &population[0]) {
                    info!(generation = gen, best = stats.best, "target fitness reached");
                    reached_target = true;
                    break;
                }
            }
        }

        let best = population[0].clone();
        Ok(GaResult {
            best_fitness: best.fitness(),
            best,
            generations,
            reached_target,
            cancelled,
            history,
        })
    }
}

/// Evaluate every individual whose fitness cache is empty.
fn evaluate_population<P: GaProblem>(
    problem: &P,
    population: &mut [P::Individual],
    parallel: bool,
) {
    if parallel {
        population
            .par_iter_mut()
            .filter(|ind| !ind.is_evaluated())
            .for_each(|ind| {
                let f = problem.evaluate(ind);
                ind.set_fitness(f);
            });
    } else {
        for ind in population.iter_mut().filter(|ind| !ind.is_evaluated()) {
            let f = problem.evaluate(ind);
            ind.set_fitness(f);
        }
    }
}

/// Sort ascending by fitness (best first). Stable, so equal-fitness elites
/// keep their position ahead of newer offspring.
fn sort_by_fitness<I: Individual>(population: &mut [I]) {
    population.sort_by(|a, b| {
        a.fitness()
            .partial_cmp(&b.fitness())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

fn hits_target<I: Individual>(config: &GaConfig, best: &I) -> bool {
    config
        .target_fitness
        .is_some_and(|target| best.fitness().to_f64() <= target)
}

// ============================================================================
// Tests
// ============================================================================
