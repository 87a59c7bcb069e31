//! Permutation-preserving genetic operators for tours.
//!
//! Both operators act only on a route's free segment, so the closing
//! element and any anchor are untouched and every child is again a valid
//! tour.
//!
//! # Crossover Operators
//!
//! - [`order_crossover`] (OX): Davis (1985) — copies a slice of parent 1,
//!   fills the rest in parent 2's order
//!
//! # Mutation Operators
//!
//! - [`swap_mutation`]: per-position swap with an independent probability
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Cicirello (2023), "Genetic Operators for Permutation Representation"

use rand::Rng;

use super::route::Route;

// ============================================================================
// Crossover
// ============================================================================

/// Order Crossover (OX) producing a single child.
///
/// # Algorithm
///
/// 1. Draw two cut points in `0..L` (`L` = free segment length) and order
///    them so `start <= end`
/// 2. Copy parent1's free segment `[start, end)` into the same positions
/// 3. Walk parent2's free segment from the beginning; every city not yet
///    in the child goes into the first empty slot
/// 4. Re-attach the anchor (if any) and the closing element
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if the parents differ in length or anchor.
pub fn order_crossover<R: Rng>(parent1: &Route, parent2: &Route, rng: &mut R) -> Route {
    check_parents(parent1, parent2);
    let (start, end) = random_segment(parent1.free_range().len(), rng);
    ox_build_child(parent1, parent2, start, end)
}

/// Order Crossover with explicit cut points.
///
/// `start..end` is a half-open range of free-segment positions copied from
/// `parent1`; `start == end` copies nothing and yields parent2's order.
///
/// # Panics
/// Panics if the parents differ in shape, or if `start > end` or `end`
/// exceeds the free segment length.
pub fn order_crossover_at(parent1: &Route, parent2: &Route, start: usize, end: usize) -> Route {
    check_parents(parent1, parent2);
    assert!(
        start <= end && end <= parent1.free_range().len(),
        "cut points out of range: {start}..{end}"
    );
    ox_build_child(parent1, parent2, start, end)
}

fn check_parents(parent1: &Route, parent2: &Route) {
    assert_eq!(
        parent1.cities().len(),
        parent2.cities().len(),
        "parents must have equal length"
    );
    assert_eq!(
        parent1.anchor(),
        parent2.anchor(),
        "parents must share the same anchor"
    );
}

/// Build one OX child: slice from `template`, remaining order from `donor`.
fn ox_build_child(template: &Route, donor: &Route, start: usize, end: usize) -> Route {
    let kept = template.free_segment();
    let mut slots: Vec<Option<usize>> = vec![None; kept.len()];
    let mut present = vec![false; template.num_cities()];

    for i in start..end {
        slots[i] = Some(kept[i]);
        present[kept[i]] = true;
    }

    let mut cursor = 0;
    for &city in donor.free_segment() {
        if present[city] {
            continue;
        }
        while slots[cursor].is_some() {
            cursor += 1;
        }
        slots[cursor] = Some(city);
        present[city] = true;
    }

    template.with_free_segment(slots.into_iter().flatten().collect())
}

// ============================================================================
// Mutation
// ============================================================================

/// Swap mutation over the whole free segment.
///
/// Each position is visited once; with probability `rate` its city is
/// swapped with a uniformly drawn position of the free segment (possibly
/// itself).
///
/// # Complexity
/// O(n)
pub fn swap_mutation<R: Rng>(route: &mut Route, rate: f64, rng: &mut R) {
    let len = route.free_range().len();
    for i in 0..len {
        if rng.random::<f64>() < rate {
            let j = rng.random_range(0..len);
            route.swap_free(i, j);
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Pick two cut points in `0..n` with `start <= end`.
fn random_segment<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

// ============================================================================
// Tests
// ============================================================================
