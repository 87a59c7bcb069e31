//! Genetic Algorithm for closed tours.
//!
//! A generational GA over permutations of city indices. Each generation
//! builds a cumulative fitness table, breeds offspring from pairs of
//! distinct parents, carries the shortest tours over as elites, mutates,
//! and re-evaluates. Lower tour length is better (minimization).
//!
//! # Key Types
//!
//! - [`Route`]: A closed tour, optionally pinned to an anchor city
//! - [`Population`]: One generation's tours with cached lengths
//! - [`GaConfig`]: Algorithm parameters (population size, elitism, presets)
//! - [`Evolution`]: The generation-by-generation controller
//! - [`GaRunner`]: One-call entry points
//! - [`GaResult`]: Final result with per-generation history
//!
//! # Submodules
//!
//! - [`operators`]: Order crossover (OX) and swap mutation on routes
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"

mod config;
mod error;
pub mod operators;
mod population;
mod route;
mod runner;
mod selection;
mod types;

pub use config::GaConfig;
pub use error::GaError;
pub use population::{CumulativeProportions, Population};
pub use route::Route;
pub use runner::{
    Evolution, EvolutionState, GaResult, GaRunner, GenerationObserver, GenerationReport,
    StopReason,
};
pub use selection::{biased_random, select_parent, tournament, Selection};
pub use types::{StandardOperators, TourOperators};
