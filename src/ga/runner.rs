//! GA evolutionary loop execution.
//!
//! [`Evolution`] is the controller: it owns the city table, the current
//! population, the RNG and the best-ever record, and advances one
//! generation per [`Evolution::step`]:
//! cumulative table → parent selection + crossover → elite copy →
//! mutation → evaluation → best-ever update → termination check.
//!
//! [`GaRunner`] wraps the controller for callers that just want a result.

use rand::rngs::StdRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::config::GaConfig;
use super::error::GaError;
use super::population::Population;
use super::route::Route;
use super::types::{StandardOperators, TourOperators};
use crate::geometry::City;
use crate::random::create_rng;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// Reached `max_generations`.
    MaxGenerations,
    /// `stagnation_limit` generations passed without a shorter tour.
    Stagnation,
    /// The cancellation flag was raised.
    Cancelled,
}

/// Lifecycle of an [`Evolution`]. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvolutionState {
    /// Population created, no generation evolved yet.
    Initialized,
    /// At least one generation evolved, termination not reached.
    Evolving,
    /// Terminal state.
    Terminated(StopReason),
}

/// Snapshot emitted after every generation.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Generation number, starting at 1 for the first evolved generation.
    pub generation: usize,

    /// Shortest tour seen so far.
    pub best_route: Route,

    /// Length of `best_route`.
    pub best_distance: f64,

    /// Shortest tour length within this generation alone.
    pub generation_best_distance: f64,

    /// Mean tour length within this generation.
    pub mean_distance: f64,
}

/// Receives a [`GenerationReport`] after every generation.
///
/// Implemented for any `FnMut(&GenerationReport)`, so a closure works:
///
/// ```ignore
/// let mut history = Vec::new();
/// evolution.run(|r: &GenerationReport| history.push(r.best_distance));
/// ```
pub trait GenerationObserver {
    fn on_generation(&mut self, report: &GenerationReport);
}

impl<F> GenerationObserver for F
where
    F: FnMut(&GenerationReport),
{
    fn on_generation(&mut self, report: &GenerationReport) {
        self(report)
    }
}

/// Result of a GA run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaResult {
    /// The shortest tour found during the entire run.
    pub best: Route,

    /// Length of `best`.
    pub best_distance: f64,

    /// Generation in which `best` was found (0 = initial population).
    pub best_generation: usize,

    /// Total number of generations evolved.
    pub generations: usize,

    /// Why the run stopped; `None` for a snapshot taken mid-run.
    pub stop_reason: Option<StopReason>,

    /// Shortest tour length of each evolved generation, in order.
    pub distance_history: Vec<f64>,
}

/// The evolution controller.
///
/// # Usage
///
/// ```ignore
/// let mut evolution = Evolution::new(cities, GaConfig::default().with_seed(42))?;
/// while let Some(report) = evolution.step() {
///     redraw(report.best_route);
/// }
/// let result = evolution.into_result();
/// ```
pub struct Evolution<O: TourOperators = StandardOperators> {
    cities: Vec<City>,
    config: GaConfig,
    operators: O,
    rng: StdRng,
    population: Population,
    state: EvolutionState,
    generation: usize,
    stagnation: usize,
    best: Route,
    best_distance: f64,
    best_generation: usize,
    distance_history: Vec<f64>,
}

impl Evolution<StandardOperators> {
    /// Creates a controller using the standard operators.
    pub fn new(cities: Vec<City>, config: GaConfig) -> Result<Self, GaError> {
        Self::with_operators(cities, config, StandardOperators)
    }
}

impl<O: TourOperators> Evolution<O> {
    /// Creates a controller with custom crossover/mutation operators.
    ///
    /// Validates the configuration and the city table, creates the
    /// initial population and seeds the best-ever record from its first
    /// member.
    pub fn with_operators(
        cities: Vec<City>,
        config: GaConfig,
        operators: O,
    ) -> Result<Self, GaError> {
        config.validate(cities.len())?;
        if let Some(i) = cities.iter().position(|c| !c.is_finite()) {
            return Err(GaError::NonFiniteCity(i));
        }

        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        let population = Population::random(
            config.population_size,
            &cities,
            config.anchor,
            config.parallel,
            &mut rng,
        );
        let best = population.route(0).clone();
        let best_distance = population.distance(0);

        log::debug!(
            "initialized {} tours over {} cities, seed distance {:.3}",
            population.len(),
            cities.len(),
            best_distance
        );

        Ok(Self {
            distance_history: Vec::with_capacity(config.max_generations.min(1 << 16)),
            cities,
            config,
            operators,
            rng,
            population,
            state: EvolutionState::Initialized,
            generation: 0,
            stagnation: 0,
            best,
            best_distance,
            best_generation: 0,
        })
    }

    pub fn state(&self) -> EvolutionState {
        self.state
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.state, EvolutionState::Terminated(_))
    }

    /// Number of generations evolved so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// The best-ever tour and its length.
    pub fn best(&self) -> (&Route, f64) {
        (&self.best, self.best_distance)
    }

    /// Generation in which the best-ever tour was found.
    pub fn best_generation(&self) -> usize {
        self.best_generation
    }

    /// Shortest tour length of each evolved generation.
    pub fn distance_history(&self) -> &[f64] {
        &self.distance_history
    }

    /// Consecutive generations without improvement.
    pub fn stagnation(&self) -> usize {
        self.stagnation
    }

    /// Evolves one generation.
    ///
    /// Returns `None` once the controller has terminated. The generation
    /// that reaches a termination condition still returns its report; the
    /// state is `Terminated` afterwards.
    pub fn step(&mut self) -> Option<GenerationReport> {
        if self.is_terminated() {
            return None;
        }
        if let Some(reason) = self.termination() {
            self.terminate(reason);
            return None;
        }

        self.state = EvolutionState::Evolving;
        self.evolve_generation();
        self.generation += 1;

        let (gen_best, gen_best_distance) = self.population.best();
        self.distance_history.push(gen_best_distance);

        if gen_best_distance < self.best_distance {
            log::debug!(
                "generation {}: best distance {:.3} -> {:.3}",
                self.generation,
                self.best_distance,
                gen_best_distance
            );
            self.best = gen_best.clone();
            self.best_distance = gen_best_distance;
            self.best_generation = self.generation;
            self.stagnation = 0;
        } else {
            self.stagnation += 1;
        }

        log::trace!(
            "generation {}: generation best {:.3}, stagnation {}",
            self.generation,
            gen_best_distance,
            self.stagnation
        );

        if let Some(reason) = self.termination() {
            self.terminate(reason);
        }

        Some(GenerationReport {
            generation: self.generation,
            best_route: self.best.clone(),
            best_distance: self.best_distance,
            generation_best_distance: gen_best_distance,
            mean_distance: self.population.mean_distance(),
        })
    }

    /// Runs until termination, reporting every generation.
    pub fn run<F: GenerationObserver>(&mut self, observer: F) -> GaResult {
        self.run_with_cancel(observer, None)
    }

    /// Runs until termination or until `cancel` is set.
    ///
    /// The flag is checked before each generation, so the generation in
    /// progress always completes.
    pub fn run_with_cancel<F: GenerationObserver>(
        &mut self,
        mut observer: F,
        cancel: Option<Arc<AtomicBool>>,
    ) -> GaResult {
        loop {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) && !self.is_terminated() {
                    self.terminate(StopReason::Cancelled);
                }
            }
            match self.step() {
                Some(report) => observer.on_generation(&report),
                None => break,
            }
        }
        self.result()
    }

    /// Why the run stopped, or `None` while it can still evolve.
    pub fn stop_reason(&self) -> Option<StopReason> {
        match self.state {
            EvolutionState::Terminated(reason) => Some(reason),
            _ => None,
        }
    }

    /// Snapshot of the current best-ever record as a result.
    pub fn result(&self) -> GaResult {
        GaResult {
            best: self.best.clone(),
            best_distance: self.best_distance,
            best_generation: self.best_generation,
            generations: self.generation,
            stop_reason: self.stop_reason(),
            distance_history: self.distance_history.clone(),
        }
    }

    /// Consumes the controller and returns the final result.
    pub fn into_result(self) -> GaResult {
        GaResult {
            stop_reason: self.stop_reason(),
            best: self.best,
            best_distance: self.best_distance,
            best_generation: self.best_generation,
            generations: self.generation,
            distance_history: self.distance_history,
        }
    }

    fn termination(&self) -> Option<StopReason> {
        if self.generation >= self.config.max_generations {
            Some(StopReason::MaxGenerations)
        } else if self.stagnation >= self.config.stagnation_limit {
            Some(StopReason::Stagnation)
        } else {
            None
        }
    }

    fn terminate(&mut self, reason: StopReason) {
        self.state = EvolutionState::Terminated(reason);
        log::info!(
            "stopped after {} generations ({:?}): best distance {:.3} from generation {}",
            self.generation,
            reason,
            self.best_distance,
            self.best_generation
        );
    }

    /// Replaces the population with the next generation.
    fn evolve_generation(&mut self) {
        let size = self.config.population_size;
        let elite_size = self.config.elite_size;
        let table = self.population.cumulative_proportions();

        let mut next: Vec<Route> = Vec::with_capacity(size);
        for _ in 0..size - elite_size {
            let (p1, p2) =
                self.config
                    .selection
                    .select_pair(&self.population, &table, &mut self.rng);
            let child = self.operators.crossover(
                self.population.route(p1),
                self.population.route(p2),
                &mut self.rng,
            );
            next.push(child);
        }

        let offspring = next.len();
        next.extend(self.population.elite(elite_size));

        let mutate_end = if self.config.mutate_elite {
            next.len()
        } else {
            offspring
        };
        for route in &mut next[..mutate_end] {
            self.operators
                .mutate(route, self.config.mutation_rate, &mut self.rng);
        }

        self.population = Population::evaluate(next, &self.cities, self.config.parallel);
    }
}

/// One-call entry points around [`Evolution`].
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA to completion.
    pub fn run(cities: &[City], config: &GaConfig) -> Result<GaResult, GaError> {
        Self::run_with_observer(cities, config, |_: &GenerationReport| {})
    }

    /// Runs the GA, reporting every generation to `observer`.
    pub fn run_with_observer<F: GenerationObserver>(
        cities: &[City],
        config: &GaConfig,
        observer: F,
    ) -> Result<GaResult, GaError> {
        Self::run_with_cancel(cities, config, observer, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the GA stops
    /// before the next generation and returns the best tour found so far.
    pub fn run_with_cancel<F: GenerationObserver>(
        cities: &[City],
        config: &GaConfig,
        observer: F,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult, GaError> {
        let mut evolution = Evolution::new(cities.to_vec(), config.clone())?;
        evolution.run_with_cancel(observer, cancel);
        Ok(evolution.into_result())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::Selection;
    use rand::Rng;
    use std::f64::consts::PI;

    /// Right triangle with integer side lengths: every tour is 12.
    fn triangle() -> Vec<City> {
        vec![
            City::new(0.0, 0.0),
            City::new(3.0, 0.0),
            City::new(3.0, 4.0),
        ]
    }

    fn circle(n: usize, radius: f64) -> Vec<City> {
        (0..n)
            .map(|i| {
                let a = 2.0 * PI * i as f64 / n as f64;
                City::new(radius + radius * a.cos(), radius + radius * a.sin())
            })
            .collect()
    }

    fn scattered(n: usize, seed: u64) -> Vec<City> {
        let mut rng = create_rng(seed);
        (0..n)
            .map(|_| {
                City::new(
                    rng.random_range(0..800) as f64,
                    rng.random_range(0..600) as f64,
                )
            })
            .collect()
    }

    /// Crossover that never recombines: the child is parent1.
    struct CloneFirstParent;

    impl TourOperators for CloneFirstParent {
        fn crossover<R: Rng>(&self, parent1: &Route, _parent2: &Route, _rng: &mut R) -> Route {
            parent1.clone()
        }
    }

    #[test]
    fn test_terminates_on_generation_count() {
        let config = GaConfig::default()
            .with_population_size(10)
            .with_elite_size(2)
            .with_max_generations(5)
            .with_stagnation_limit(10)
            .with_mutation_rate(0.0)
            .with_seed(42);
        let mut evolution =
            Evolution::with_operators(triangle(), config, CloneFirstParent).unwrap();

        let mut generations = Vec::new();
        let result = evolution.run(|r: &GenerationReport| generations.push(r.generation));

        assert_eq!(result.stop_reason, Some(StopReason::MaxGenerations));
        assert_eq!(result.generations, 5);
        assert_eq!(generations, vec![1, 2, 3, 4, 5]);
        assert_eq!(result.best_generation, 0);
        assert_eq!(evolution.stagnation(), 5);
        assert_eq!(
            evolution.state(),
            EvolutionState::Terminated(StopReason::MaxGenerations)
        );
    }

    #[test]
    fn test_terminates_on_stagnation() {
        let config = GaConfig::default()
            .with_population_size(10)
            .with_elite_size(2)
            .with_max_generations(100)
            .with_stagnation_limit(3)
            .with_mutation_rate(0.0)
            .with_seed(42);
        let mut evolution =
            Evolution::with_operators(triangle(), config, CloneFirstParent).unwrap();
        let result = evolution.run(|_: &GenerationReport| {});

        assert_eq!(result.stop_reason, Some(StopReason::Stagnation));
        assert_eq!(result.generations, 3);
        assert!((result.best_distance - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_state_machine() {
        let config = GaConfig::default()
            .with_population_size(6)
            .with_elite_size(1)
            .with_max_generations(2)
            .with_seed(1);
        let mut evolution = Evolution::new(circle(6, 10.0), config).unwrap();
        assert_eq!(evolution.state(), EvolutionState::Initialized);

        assert!(evolution.step().is_some());
        assert_eq!(evolution.state(), EvolutionState::Evolving);

        assert_eq!(evolution.result().stop_reason, None);

        assert!(evolution.step().is_some());
        assert!(evolution.is_terminated());
        assert_eq!(evolution.stop_reason(), Some(StopReason::MaxGenerations));
        assert!(evolution.step().is_none());
        assert_eq!(evolution.generation(), 2);
    }

    #[test]
    fn test_best_seeded_from_first_individual() {
        let config = GaConfig::default().with_seed(9);
        let evolution = Evolution::new(scattered(15, 3), config).unwrap();
        let (best, d) = evolution.best();
        assert_eq!(best, evolution.population().route(0));
        assert_eq!(d, evolution.population().distance(0));
        assert_eq!(evolution.best_generation(), 0);
    }

    #[test]
    fn test_population_stays_valid() {
        for anchor in [None, Some(4)] {
            let mut config = GaConfig::default()
                .with_population_size(30)
                .with_elite_size(3)
                .with_max_generations(40)
                .with_mutation_rate(0.2)
                .with_seed(5);
            config.anchor = anchor;
            let mut evolution = Evolution::new(scattered(12, 8), config).unwrap();

            while evolution.step().is_some() {
                assert_eq!(evolution.population().len(), 30);
                for route in evolution.population().routes() {
                    assert!(route.is_valid(12), "invalid route {route:?}");
                    assert_eq!(route.anchor(), anchor);
                }
            }
        }
    }

    #[test]
    fn test_best_distance_non_increasing() {
        let config = GaConfig::default()
            .with_population_size(40)
            .with_elite_size(4)
            .with_max_generations(200)
            .with_mutation_rate(0.1)
            .with_seed(42);
        let mut best = Vec::new();
        let result = GaRunner::run_with_observer(
            &scattered(20, 1),
            &config,
            |r: &GenerationReport| best.push(r.best_distance),
        )
        .unwrap();

        assert_eq!(best.len(), result.generations);
        for w in best.windows(2) {
            assert!(w[1] <= w[0], "best-ever distance increased: {} > {}", w[1], w[0]);
        }
        let min_seen = result
            .distance_history
            .iter()
            .cloned()
            .fold(f64::INFINITY, f64::min);
        assert!(result.best_distance <= min_seen);
    }

    #[test]
    fn test_unmutated_elite_keeps_generation_best() {
        let config = GaConfig::default()
            .with_population_size(30)
            .with_elite_size(2)
            .with_max_generations(100)
            .with_mutation_rate(0.3)
            .with_mutate_elite(false)
            .with_seed(7);
        let result = GaRunner::run(&scattered(15, 2), &config).unwrap();
        for w in result.distance_history.windows(2) {
            assert!(w[1] <= w[0], "generation best regressed: {} > {}", w[1], w[0]);
        }
    }

    #[test]
    fn test_converges_on_circle() {
        let n = 12;
        let radius = 100.0;
        let cities = circle(n, radius);
        let optimal = 2.0 * n as f64 * radius * (PI / n as f64).sin();

        let config = GaConfig::default()
            .with_max_generations(2_000)
            .with_stagnation_limit(500)
            .with_seed(42);
        let result = GaRunner::run(&cities, &config).unwrap();

        assert!(result.best.is_valid(n));
        assert!(
            result.best_distance < optimal * 1.5,
            "expected near-optimal tour ({optimal:.1}), got {:.1}",
            result.best_distance
        );
    }

    #[test]
    fn test_anchored_run_keeps_anchor() {
        let config = GaConfig::default()
            .with_population_size(20)
            .with_elite_size(2)
            .with_max_generations(50)
            .with_anchor(3)
            .with_seed(4);
        let result = GaRunner::run(&scattered(10, 6), &config).unwrap();
        assert_eq!(result.best.anchor(), Some(3));
        assert_eq!(result.best.cities()[0], 3);
        assert_eq!(result.best.cities()[10], 3);
        assert!(result.best.is_valid(10));
    }

    #[test]
    fn test_same_seed_same_result() {
        let cities = scattered(15, 11);
        let config = GaConfig::default()
            .with_population_size(20)
            .with_elite_size(2)
            .with_max_generations(60)
            .with_seed(123);
        let a = GaRunner::run(&cities, &config).unwrap();
        let b = GaRunner::run(&cities, &config).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.distance_history, b.distance_history);
        assert_eq!(a.best_generation, b.best_generation);
    }

    #[test]
    fn test_parallel_flag_same_result() {
        let cities = scattered(15, 11);
        let config = GaConfig::default()
            .with_population_size(20)
            .with_elite_size(2)
            .with_max_generations(30)
            .with_seed(99);
        let seq = GaRunner::run(&cities, &config).unwrap();
        let par = GaRunner::run(&cities, &config.clone().with_parallel(true)).unwrap();
        assert_eq!(seq.distance_history, par.distance_history);
    }

    #[test]
    fn test_cancel_before_start() {
        let config = GaConfig::default().with_seed(42);
        let cancel = Arc::new(AtomicBool::new(true));
        let result = GaRunner::run_with_cancel(
            &scattered(10, 1),
            &config,
            |_: &GenerationReport| {},
            Some(cancel),
        )
        .unwrap();
        assert_eq!(result.stop_reason, Some(StopReason::Cancelled));
        assert_eq!(result.generations, 0);
        assert!(result.distance_history.is_empty());
    }

    #[test]
    fn test_cancel_from_observer() {
        let config = GaConfig::default().with_seed(42);
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = cancel.clone();
        let result = GaRunner::run_with_cancel(
            &scattered(10, 1),
            &config,
            move |r: &GenerationReport| {
                if r.generation == 7 {
                    flag.store(true, Ordering::Relaxed);
                }
            },
            Some(cancel),
        )
        .unwrap();
        assert_eq!(result.stop_reason, Some(StopReason::Cancelled));
        assert_eq!(result.generations, 7);
    }

    #[test]
    fn test_rejects_bad_setup() {
        assert_eq!(
            Evolution::new(vec![City::new(0.0, 0.0)], GaConfig::default()).err(),
            Some(GaError::TooFewCities(1))
        );
        let cities = vec![City::new(0.0, 0.0), City::new(f64::INFINITY, 1.0)];
        assert_eq!(
            Evolution::new(cities, GaConfig::default()).err(),
            Some(GaError::NonFiniteCity(1))
        );
        let config = GaConfig::default().with_elite_size(80);
        assert!(matches!(
            GaRunner::run(&triangle(), &config),
            Err(GaError::EliteTooLarge { .. })
        ));
    }

    /// Counts crossovers through a shared, single-threaded cell.
    struct CountingOperators(std::rc::Rc<std::cell::Cell<usize>>);

    impl TourOperators for CountingOperators {
        fn crossover<R: Rng>(&self, parent1: &Route, parent2: &Route, rng: &mut R) -> Route {
            self.0.set(self.0.get() + 1);
            crate::ga::operators::order_crossover(parent1, parent2, rng)
        }
    }

    #[test]
    fn test_thread_local_operators() {
        let count = std::rc::Rc::new(std::cell::Cell::new(0));
        let config = GaConfig::default()
            .with_population_size(10)
            .with_elite_size(2)
            .with_max_generations(4)
            .with_seed(2);
        let mut evolution =
            Evolution::with_operators(scattered(8, 4), config, CountingOperators(count.clone()))
                .unwrap();
        let result = evolution.run(|_: &GenerationReport| {});
        assert_eq!(result.generations, 4);
        assert_eq!(count.get(), 4 * 8);
    }

    #[test]
    fn test_smallest_population_runs_to_completion() {
        let cities = scattered(4, 5);
        let config = GaConfig::default()
            .with_population_size(2)
            .with_elite_size(0)
            .with_max_generations(3)
            .with_selection(Selection::Tournament)
            .with_seed(1);
        assert_eq!(
            GaRunner::run(&cities, &config).err(),
            Some(GaError::TournamentPopulationTooSmall(2))
        );

        for selection in [Selection::Biased, Selection::Mixed] {
            let result =
                GaRunner::run(&cities, &config.clone().with_selection(selection)).unwrap();
            assert_eq!(result.generations, 3);
            assert_eq!(result.stop_reason, Some(StopReason::MaxGenerations));
        }
    }

    #[test]
    fn test_two_cities() {
        let cities = vec![City::new(0.0, 0.0), City::new(0.0, 5.0)];
        let config = GaConfig::default()
            .with_population_size(4)
            .with_elite_size(1)
            .with_max_generations(10)
            .with_seed(3);
        let result = GaRunner::run(&cities, &config).unwrap();
        assert!((result.best_distance - 10.0).abs() < 1e-12);

        let anchored = config.with_anchor(1);
        let result = GaRunner::run(&cities, &anchored).unwrap();
        assert_eq!(result.best.cities(), &[1, 0, 1]);
    }
}
