//! Genetic-algorithm solver for the Euclidean Traveling Salesman Problem.
//!
//! Evolves a population of closed tours over a fixed table of 2-D cities
//! toward shorter total length:
//!
//! - **Geometry**: Euclidean distance and closed-tour length.
//! - **GA**: Route representation, population, tournament and
//!   fitness-proportional selection, order crossover, swap mutation,
//!   elitism, and a generational controller with generation-count and
//!   stagnation termination.
//!
//! # Example
//!
//! ```
//! use tsp_ga::ga::{GaConfig, GaRunner};
//! use tsp_ga::geometry::City;
//!
//! let cities: Vec<City> = [(0.0, 0.0), (4.0, 0.0), (4.0, 3.0), (0.0, 3.0)]
//!     .into_iter()
//!     .map(City::from)
//!     .collect();
//! let config = GaConfig::default()
//!     .with_population_size(20)
//!     .with_elite_size(2)
//!     .with_max_generations(50)
//!     .with_seed(42);
//!
//! let result = GaRunner::run(&cities, &config).unwrap();
//! assert!(result.best.is_valid(4));
//! assert!((result.best_distance - 14.0).abs() < 1e-9);
//! ```
//!
//! # Architecture
//!
//! Everything a run needs is owned by one [`ga::Evolution`] value: the
//! city table, the population, the RNG and the best-ever record. Nothing
//! is global. Rendering, city generation and image export live outside
//! this crate and only consume [`ga::GenerationReport`]s.

pub mod ga;
pub mod geometry;
pub mod random;
