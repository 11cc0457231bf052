//! Basic 2D types and tolerances shared by the pentagon kernel and the chain evaluator.
//!
//! - `GeomCfg`: centralizes epsilons for edge validation, overlap area, and near-touch distance.
//! - `Segment`: closed segment between two points with small distance helpers.
//!
//! Code cross-refs: `pentagon::Pentagon`, `convex::{intersection_area, polygon_distance}`

use nalgebra::Vector2;

use super::convex::point_segment_distance;

/// Immutable 2D coordinate.
pub type Point = Vector2<f64>;

/// Geometry configuration (tolerances).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeomCfg {
    /// Allowed deviation of a defining edge from unit length.
    pub eps_edge: f64,
    /// Intersection areas at or below this count as touching, not overlapping.
    pub eps_area: f64,
    /// Separations below this count as a near-touch collision.
    pub eps_collision: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_edge: 1e-9,
            // Clipping two touching pentagons leaves slivers around 1e-15.
            eps_area: 1e-9,
            eps_collision: 1e-6,
        }
    }
}

/// Closed segment `a → b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    #[inline]
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }
    #[inline]
    pub fn length(&self) -> f64 {
        (self.b - self.a).norm()
    }
    #[inline]
    pub fn midpoint(&self) -> Point {
        (self.a + self.b) * 0.5
    }
    /// Endpoints as a pair, in orientation order.
    #[inline]
    pub fn points(&self) -> (Point, Point) {
        (self.a, self.b)
    }
    #[inline]
    pub fn reversed(&self) -> Self {
        Self {
            a: self.b,
            b: self.a,
        }
    }
    #[inline]
    pub fn distance_to_point(&self, p: Point) -> f64 {
        point_segment_distance(p, self.a, self.b)
    }
}
