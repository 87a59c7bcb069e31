//! Parent selection.
//!
//! Selection works on population **slots**: a draw returns an index, and
//! two draws are distinct when their indices differ, even if the tours
//! stored there happen to be identical.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use rand::Rng;

use super::population::{CumulativeProportions, Population};

/// Redraws of the second parent before falling back to a random other slot.
pub const MAX_REDRAWS: usize = 1_000;

/// Selection strategy for choosing parents.
///
/// All strategies assume **minimization** (shorter tour = better).
///
/// # Examples
///
/// ```
/// use tsp_ga::ga::Selection;
///
/// // Default: coin flip between tournament and fitness-proportional.
/// assert_eq!(Selection::default(), Selection::Mixed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Binary tournament: the shorter of two distinct random tours.
    Tournament,

    /// Fitness-proportional selection over the cumulative table.
    Biased,

    /// Each draw picks one of the two strategies above with equal odds.
    #[default]
    Mixed,
}

impl Selection {
    /// Selects one parent index.
    ///
    /// `table` must have been built from `population`.
    ///
    /// # Panics
    /// Panics if the population has fewer than two members and the
    /// tournament strategy is drawn.
    pub fn select<R: Rng>(
        &self,
        population: &Population,
        table: &CumulativeProportions,
        rng: &mut R,
    ) -> usize {
        match self {
            Selection::Tournament => tournament(population, rng),
            Selection::Biased => biased_random(table, rng),
            Selection::Mixed => select_parent(population, table, rng),
        }
    }

    /// Selects two parents occupying different slots.
    ///
    /// The second draw is repeated until it differs from the first. A
    /// strategy that keeps returning the same slot (a tournament over two
    /// tours of different length always does) gives up after
    /// [`MAX_REDRAWS`] attempts and takes a uniformly drawn other slot.
    pub fn select_pair<R: Rng>(
        &self,
        population: &Population,
        table: &CumulativeProportions,
        rng: &mut R,
    ) -> (usize, usize) {
        assert!(
            population.len() >= 2,
            "need at least two individuals to pick distinct parents"
        );
        let first = self.select(population, table, rng);
        for _ in 0..MAX_REDRAWS {
            let second = self.select(population, table, rng);
            if second != first {
                return (first, second);
            }
        }
        let n = population.len();
        (first, (first + rng.random_range(1..n)) % n)
    }
}

/// Picks tournament or biased selection with equal probability.
pub fn select_parent<R: Rng>(
    population: &Population,
    table: &CumulativeProportions,
    rng: &mut R,
) -> usize {
    if rng.random::<f64>() > 0.5 {
        tournament(population, rng)
    } else {
        biased_random(table, rng)
    }
}

/// Binary tournament over two distinct slots.
///
/// Returns the first candidate only if it is strictly shorter; equal
/// lengths go to the second candidate.
pub fn tournament<R: Rng>(population: &Population, rng: &mut R) -> usize {
    let n = population.len();
    assert!(n >= 2, "tournament needs at least two individuals");

    let first = rng.random_range(0..n);
    let mut second = rng.random_range(0..n);
    while second == first {
        second = rng.random_range(0..n);
    }

    if population.distance(first) < population.distance(second) {
        first
    } else {
        second
    }
}

/// Fitness-proportional selection: one uniform draw scanned against the
/// cumulative table.
pub fn biased_random<R: Rng>(table: &CumulativeProportions, rng: &mut R) -> usize {
    table.select(rng.random::<f64>())
}
