//! Errors raised before the evolutionary loop starts.

/// Invalid run setup: configuration or city table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GaError {
    #[error("population_size must be at least 2, got {0}")]
    PopulationTooSmall(usize),
    #[error("elite_size ({elite}) must be smaller than population_size ({population})")]
    EliteTooLarge { elite: usize, population: usize },
    #[error("tournament selection needs population_size of at least 3, got {0}")]
    TournamentPopulationTooSmall(usize),
    #[error("max_generations must be at least 1")]
    ZeroGenerations,
    #[error("stagnation_limit must be at least 1")]
    ZeroStagnationLimit,
    #[error("mutation_rate must lie in [0, 1], got {0}")]
    InvalidMutationRate(f64),
    #[error("at least 2 cities are required, got {0}")]
    TooFewCities(usize),
    #[error("anchor city {anchor} is out of range for {num_cities} cities")]
    AnchorOutOfRange { anchor: usize, num_cities: usize },
    #[error("city {0} has a non-finite coordinate")]
    NonFiniteCity(usize),
}
