//! Population of candidate tours and its derived fitness tables.

use rand::Rng;

use super::route::Route;
use crate::geometry::{route_length, City};

/// One generation's tours together with their cached lengths.
///
/// Distances are computed once when the population is built and stay
/// aligned by index with the routes. A population is never modified in
/// place; the controller replaces it wholesale every generation.
#[derive(Debug, Clone)]
pub struct Population {
    routes: Vec<Route>,
    distances: Vec<f64>,
}

impl Population {
    /// Creates `size` independent random tours and evaluates them.
    pub fn random<R: Rng>(
        size: usize,
        cities: &[City],
        anchor: Option<usize>,
        parallel: bool,
        rng: &mut R,
    ) -> Self {
        let routes = (0..size)
            .map(|_| Route::random(cities.len(), anchor, rng))
            .collect();
        Self::evaluate(routes, cities, parallel)
    }

    /// Wraps already-built routes, computing each tour length.
    pub fn evaluate(routes: Vec<Route>, cities: &[City], parallel: bool) -> Self {
        let distances = evaluate_distances(&routes, cities, parallel);
        Self { routes, distances }
    }

    /// Population of single-city placeholder tours with the given lengths.
    #[cfg(test)]
    pub(crate) fn with_distances(distances: Vec<f64>) -> Self {
        let routes = vec![Route::closed(vec![0]); distances.len()];
        Self { routes, distances }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    pub fn route(&self, index: usize) -> &Route {
        &self.routes[index]
    }

    pub fn distance(&self, index: usize) -> f64 {
        self.distances[index]
    }

    /// Index of the shortest tour. Ties keep the earliest index.
    ///
    /// # Panics
    /// Panics if the population is empty.
    pub fn best_index(&self) -> usize {
        assert!(!self.is_empty(), "population must not be empty");
        let mut best = 0;
        for (i, &d) in self.distances.iter().enumerate().skip(1) {
            if d < self.distances[best] {
                best = i;
            }
        }
        best
    }

    /// The shortest tour and its length.
    pub fn best(&self) -> (&Route, f64) {
        let i = self.best_index();
        (&self.routes[i], self.distances[i])
    }

    /// Mean tour length, or `0.0` for an empty population.
    pub fn mean_distance(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.distances.iter().sum::<f64>() / self.len() as f64
    }

    /// Indices ordered from shortest to longest tour (stable).
    pub fn ranked_indices(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| {
            self.distances[a]
                .partial_cmp(&self.distances[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        order
    }

    /// Copies of the `count` shortest tours, best first.
    pub fn elite(&self, count: usize) -> Vec<Route> {
        self.ranked_indices()
            .into_iter()
            .take(count)
            .map(|i| self.routes[i].clone())
            .collect()
    }

    /// Builds the cumulative selection table for this generation.
    pub fn cumulative_proportions(&self) -> CumulativeProportions {
        CumulativeProportions::from_distances(&self.distances)
    }
}

#[cfg(feature = "parallel")]
fn evaluate_distances(routes: &[Route], cities: &[City], parallel: bool) -> Vec<f64> {
    use rayon::prelude::*;

    if parallel {
        routes.par_iter().map(|r| route_length(r, cities)).collect()
    } else {
        routes.iter().map(|r| route_length(r, cities)).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_distances(routes: &[Route], cities: &[City], _parallel: bool) -> Vec<f64> {
    routes.iter().map(|r| route_length(r, cities)).collect()
}

/// Cumulative selection probabilities, aligned by index with a population.
///
/// Built from inverse-distance scores `sum(distances) / distance_i`,
/// normalized to sum to 1 and accumulated. The table is only meaningful
/// for the population it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeProportions {
    cumulative: Vec<f64>,
}

impl CumulativeProportions {
    /// Builds the table from tour lengths.
    ///
    /// Zero-length tours would make the inverse score infinite; when any
    /// are present they share the whole probability mass equally.
    ///
    /// # Panics
    /// Panics if `distances` is empty.
    pub fn from_distances(distances: &[f64]) -> Self {
        assert!(!distances.is_empty(), "cannot build table for empty population");

        let total: f64 = distances.iter().sum();
        let mut scores: Vec<f64> = distances.iter().map(|&d| total / d).collect();
        if scores.iter().any(|s| !s.is_finite()) {
            log::warn!("zero-length tours present, selection table degenerates");
            for s in &mut scores {
                *s = if s.is_finite() { 0.0 } else { 1.0 };
            }
        }

        let score_sum: f64 = scores.iter().sum();
        let mut running = 0.0;
        let cumulative = scores
            .iter()
            .map(|&s| {
                running += s / score_sum;
                running
            })
            .collect();

        Self { cumulative }
    }

    /// Maps a uniform draw in `[0, 1)` to a population index.
    ///
    /// Returns the first index whose cumulative value exceeds `draw`.
    /// Rounding can leave the final entry slightly below 1; draws past it
    /// resolve to the last index.
    pub fn select(&self, draw: f64) -> usize {
        self.cumulative
            .iter()
            .position(|&c| c > draw)
            .unwrap_or(self.cumulative.len() - 1)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.cumulative
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }
}
