//! Planar geometry: cities and tour lengths.

use crate::ga::Route;

/// A city in the plane.
///
/// Cities are identified by their index in the city table passed to the
/// controller; the table never changes during a run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct City {
    pub x: f64,
    pub y: f64,
}

impl City {
    /// Creates a city at `(x, y)`.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns `true` if both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for City {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Euclidean distance between two cities.
pub fn distance(a: City, b: City) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Total length of a closed tour.
///
/// Sums the distance over every consecutive pair of the route. The route
/// already repeats its first city at the end, so the closing leg is
/// included.
///
/// # Panics
/// Panics if the route references a city outside `cities`.
pub fn route_length(route: &Route, cities: &[City]) -> f64 {
    route
        .cities()
        .windows(2)
        .map(|pair| distance(cities[pair[0]], cities[pair[1]]))
        .sum()
}
