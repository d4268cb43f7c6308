//! Evolutionary loop parameters.

/// Knobs of one GA run: population shape, operator rates, stopping rules.
///
/// Defaults follow the rostering service settings (population 50,
/// 100 generations, tournament of 5, crossover 0.8, per-gene mutation 0.1,
/// stop at fitness 0).
///
/// ```
/// use u_roster::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_tournament_size(3)
///     .with_mutation_rate(0.05)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    pub population_size: usize,

    /// Generations after the initial population.
    pub max_generations: usize,

    /// Number of individuals drawn (with replacement) per tournament.
    ///
    /// Higher values mean stronger selection pressure.
    pub tournament_size: usize,

    /// Number of best individuals copied unchanged into the next generation.
    pub elite_count: usize,

    /// Probability of recombining two parents (0.0–1.0).
    ///
    /// When crossover is skipped, the fitter parent is cloned.
    pub crossover_rate: f64,

    /// Per-gene mutation probability (0.0–1.0).
    pub mutation_rate: f64,

    /// Stop as soon as the best fitness reaches this value.
    ///
    /// `None` always runs to `max_generations`.
    pub target_fitness: Option<f64>,

    /// Evaluate fitness on the rayon pool.
    pub parallel: bool,

    /// `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Wall-clock budget in milliseconds, checked at the start of each
    /// generation. Exceeding it ends the run with the best schedule so far.
    pub time_limit_ms: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 100,
            tournament_size: 5,
            elite_count: 1,
            crossover_rate: 0.8,
            mutation_rate: 0.1,
            target_fitness: Some(0.0),
            parallel: true,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the number of elites carried over each generation.
    pub fn with_elite_count(mut self, n: usize) -> Self {
        self.elite_count = n;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the per-gene mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets (or clears) the early-stop fitness target.
    pub fn with_target_fitness(mut self, target: Option<f64>) -> Self {
        self.target_fitness = target;
        self
    }

    /// Sets whether fitness is evaluated in parallel.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the RNG seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Limits wall-clock time; checked between generations.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Checks every field, returning a message naming the first bad one.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.max_generations == 0 {
            return Err("max_generations must be at least 1".into());
        }
        if self.tournament_size == 0 {
            return Err("tournament_size must be at least 1".into());
        }
        if self.elite_count == 0 {
            return Err("elite_count must be at least 1".into());
        }
        if self.elite_count >= self.population_size {
            return Err("elite_count too high: elites fill entire population".into());
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err("crossover_rate must be within [0, 1]".into());
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err("mutation_rate must be within [0, 1]".into());
        }
        if let Some(target) = self.target_fitness {
            if !target.is_finite() {
                return Err("target_fitness must be finite".into());
            }
        }
        if self.time_limit_ms == Some(0) {
            return Err("time_limit_ms must be positive or None".into());
        }
        Ok(())
    }
}
