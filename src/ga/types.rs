//! Pluggable operator seam for the evolution controller.
//!
//! The controller never calls crossover or mutation directly; it goes
//! through a [`TourOperators`] implementation. [`StandardOperators`] uses
//! the order crossover and swap mutation from [`super::operators`].

use rand::Rng;

use super::operators::{order_crossover, swap_mutation};
use super::route::Route;

/// Crossover and mutation applied by the controller each generation.
///
/// Both methods must keep the route a valid tour of the same shape as
/// their input. The defaults are the standard operators, so an
/// implementation only overrides what it wants to change.
///
/// # Implementing
///
/// ```ignore
/// struct KeepFirstParent;
///
/// impl TourOperators for KeepFirstParent {
///     fn crossover<R: Rng>(&self, p1: &Route, _p2: &Route, _rng: &mut R) -> Route {
///         p1.clone()
///     }
/// }
/// ```
pub trait TourOperators {
    /// Combines two parents into one child.
    fn crossover<R: Rng>(&self, parent1: &Route, parent2: &Route, rng: &mut R) -> Route {
        order_crossover(parent1, parent2, rng)
    }

    /// Perturbs a route in place.
    fn mutate<R: Rng>(&self, route: &mut Route, rate: f64, rng: &mut R) {
        swap_mutation(route, rate, rng);
    }
}

/// Order crossover plus per-position swap mutation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardOperators;

impl TourOperators for StandardOperators {}
