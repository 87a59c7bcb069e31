//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use super::error::GaError;
use super::selection::Selection;

/// Configuration for the TSP genetic algorithm.
///
/// Controls population size, elitism, operator rates, termination
/// conditions, tour shape, and parallelism.
///
/// # Defaults
///
/// ```
/// use tsp_ga::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 80);
/// assert_eq!(config.elite_size, 8);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use tsp_ga::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_elite_size(10)
///     .with_mutation_rate(0.05)
///     .with_anchor(0)
///     .with_seed(7);
/// assert!(config.validate(30).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of tours in every generation.
    pub population_size: usize,

    /// Number of shortest tours copied into the next generation's
    /// candidate pool without crossover.
    pub elite_size: usize,

    /// Maximum number of evolved generations.
    pub max_generations: usize,

    /// Consecutive generations without a strictly shorter best tour
    /// before stopping.
    pub stagnation_limit: usize,

    /// Per-position swap probability (0.0–1.0).
    pub mutation_rate: f64,

    /// Parent selection strategy.
    pub selection: Selection,

    /// Fixed start/end city. `None` lets the whole tour rotate freely.
    pub anchor: Option<usize>,

    /// Whether the elite copies are mutated along with the offspring.
    pub mutate_elite: bool,

    /// Whether to compute tour lengths in parallel (needs the `parallel`
    /// feature; ignored otherwise).
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 80,
            elite_size: 8,
            max_generations: 100_000,
            stagnation_limit: 20_000,
            mutation_rate: 0.02,
            selection: Selection::default(),
            anchor: None,
            mutate_elite: true,
            parallel: false,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of elites.
    pub fn with_elite_size(mut self, n: usize) -> Self {
        self.elite_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets how many non-improving generations end the run.
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Pins the tour's start and end to `city`.
    pub fn with_anchor(mut self, city: usize) -> Self {
        self.anchor = Some(city);
        self
    }

    /// Enables or disables mutation of the elite copies.
    pub fn with_mutate_elite(mut self, mutate: bool) -> Self {
        self.mutate_elite = mutate;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Preset for quick runs on small instances.
    ///
    /// - Population: 50, Elite: 5, Generations: 2 000, Stagnation: 500
    pub fn fast() -> Self {
        Self {
            population_size: 50,
            elite_size: 5,
            max_generations: 2_000,
            stagnation_limit: 500,
            ..Self::default()
        }
    }

    /// Preset matching the defaults of the interactive visualizer.
    ///
    /// - Population: 80, Elite: 8, Generations: 100 000, Stagnation: 20 000
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Preset for large instances.
    ///
    /// - Population: 200, Elite: 20, Generations: 200 000, Stagnation: 40 000
    /// - Mutation rate: 0.01
    pub fn quality() -> Self {
        Self {
            population_size: 200,
            elite_size: 20,
            max_generations: 200_000,
            stagnation_limit: 40_000,
            mutation_rate: 0.01,
            ..Self::default()
        }
    }

    /// Selects a preset from the number of cities.
    ///
    /// - `num_cities < 20` → [`fast()`](Self::fast)
    /// - `20 ≤ num_cities < 100` → [`balanced()`](Self::balanced)
    /// - `num_cities ≥ 100` → [`quality()`](Self::quality)
    pub fn auto_select(num_cities: usize) -> Self {
        if num_cities < 20 {
            Self::fast()
        } else if num_cities < 100 {
            Self::balanced()
        } else {
            Self::quality()
        }
    }

    /// Validates the configuration against a city table of `num_cities`.
    pub fn validate(&self, num_cities: usize) -> Result<(), GaError> {
        if self.population_size < 2 {
            return Err(GaError::PopulationTooSmall(self.population_size));
        }
        if self.elite_size >= self.population_size {
            return Err(GaError::EliteTooLarge {
                elite: self.elite_size,
                population: self.population_size,
            });
        }
        if self.selection == Selection::Tournament && self.population_size < 3 {
            return Err(GaError::TournamentPopulationTooSmall(self.population_size));
        }
        if self.max_generations == 0 {
            return Err(GaError::ZeroGenerations);
        }
        if self.stagnation_limit == 0 {
            return Err(GaError::ZeroStagnationLimit);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(GaError::InvalidMutationRate(self.mutation_rate));
        }
        if num_cities < 2 {
            return Err(GaError::TooFewCities(num_cities));
        }
        if let Some(anchor) = self.anchor {
            if anchor >= num_cities {
                return Err(GaError::AnchorOutOfRange { anchor, num_cities });
            }
        }
        Ok(())
    }
}
