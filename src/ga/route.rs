//! Closed tour representation.
//!
//! A [`Route`] stores `num_cities + 1` city indices: every city once, then
//! the first city again to close the loop. In anchored mode the first and
//! last entries are a fixed anchor city and only the positions between
//! them may change.
//!
//! The positions that operators are allowed to rearrange are called the
//! **free segment**:
//!
//! | Mode     | Layout                         | Free segment        |
//! |----------|--------------------------------|---------------------|
//! | closed   | `[c0, c1, .., c(n-1), c0]`     | `0..n`              |
//! | anchored | `[a, c1, .., c(n-1), a]`       | `1..n`              |

use rand::Rng;
use std::ops::Range;

use crate::random::shuffle;

/// A closed tour over the city table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    cities: Vec<usize>,
    anchored: bool,
}

impl Route {
    /// Builds a closed tour from a visiting order, appending the first city.
    ///
    /// # Panics
    /// Panics if `order` is empty.
    pub fn closed(mut order: Vec<usize>) -> Self {
        assert!(!order.is_empty(), "route must not be empty");
        order.push(order[0]);
        Self {
            cities: order,
            anchored: false,
        }
    }

    /// Builds a tour that starts and ends at `anchor`, visiting `order`
    /// in between. `order` must not contain the anchor.
    pub fn anchored(anchor: usize, order: Vec<usize>) -> Self {
        let mut cities = Vec::with_capacity(order.len() + 2);
        cities.push(anchor);
        cities.extend(order);
        cities.push(anchor);
        Self {
            cities,
            anchored: true,
        }
    }

    /// Creates a uniformly random tour over `num_cities` cities.
    ///
    /// With an anchor, the anchor is pinned to both ends and the remaining
    /// cities are shuffled between them. Every permutation of the free
    /// segment is equally likely.
    pub fn random<R: Rng>(num_cities: usize, anchor: Option<usize>, rng: &mut R) -> Self {
        match anchor {
            Some(a) => {
                let mut order: Vec<usize> = (0..num_cities).filter(|&c| c != a).collect();
                shuffle(&mut order, rng);
                Self::anchored(a, order)
            }
            None => {
                let mut order: Vec<usize> = (0..num_cities).collect();
                shuffle(&mut order, rng);
                Self::closed(order)
            }
        }
    }

    /// The full index sequence, closing element included.
    pub fn cities(&self) -> &[usize] {
        &self.cities
    }

    /// Number of distinct cities in the tour.
    pub fn num_cities(&self) -> usize {
        self.cities.len() - 1
    }

    /// Whether the endpoints are pinned to an anchor city.
    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// The anchor city, if any.
    pub fn anchor(&self) -> Option<usize> {
        self.anchored.then(|| self.cities[0])
    }

    /// Positions that crossover and mutation may rearrange.
    pub fn free_range(&self) -> Range<usize> {
        let end = self.cities.len() - 1;
        if self.anchored {
            1..end
        } else {
            0..end
        }
    }

    /// The free segment as a slice.
    pub fn free_segment(&self) -> &[usize] {
        &self.cities[self.free_range()]
    }

    /// Builds a route of the same shape with the free segment replaced.
    ///
    /// # Panics
    /// Panics if `segment` has a different length than the free segment.
    pub fn with_free_segment(&self, segment: Vec<usize>) -> Self {
        assert_eq!(
            segment.len(),
            self.free_range().len(),
            "free segment length mismatch"
        );
        match self.anchor() {
            Some(a) => Self::anchored(a, segment),
            None => Self::closed(segment),
        }
    }

    /// Swaps two positions of the free segment (indices relative to the
    /// segment) and re-closes the tour.
    pub(crate) fn swap_free(&mut self, i: usize, j: usize) {
        let offset = self.free_range().start;
        self.cities.swap(offset + i, offset + j);
        self.close();
    }

    fn close(&mut self) {
        let last = self.cities.len() - 1;
        self.cities[last] = self.cities[0];
    }

    /// Checks the tour invariants against a table of `num_cities` cities.
    ///
    /// Every index in `0..num_cities` appears exactly once before the
    /// closing element, and the closing element equals the first.
    pub fn is_valid(&self, num_cities: usize) -> bool {
        if self.cities.len() != num_cities + 1 {
            return false;
        }
        if self.cities[0] != self.cities[num_cities] {
            return false;
        }
        let mut seen = vec![false; num_cities];
        for &c in &self.cities[..num_cities] {
            if c >= num_cities || seen[c] {
                return false;
            }
            seen[c] = true;
        }
        true
    }
}
