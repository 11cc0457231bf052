//! Regular unit-side pentagon built from one oriented edge.
//!
//! Convention
//! - Walking `p1 → p2` and closing the polygon turns clockwise; vertices are
//!   stored in that order, so the signed shoelace area is negative.
//! - Sides are 1-indexed: side `n` runs from vertex `n-1` to vertex `n mod 5`.
//!   Side 1 is the defining edge.

use std::f64::consts::PI;
use std::fmt;

use nalgebra::Rotation2;

use super::types::{GeomCfg, Point, Segment};
use crate::error::GeomError;

/// Side length of every pentagon in a chain.
pub const SIDE_LENGTH: f64 = 1.0;

/// Half of the central angle subtended by one side (36°).
const HALF_CENTRAL: f64 = PI / 5.0;

/// Circumradius `R = 0.5 / sin(36°)`.
#[inline]
pub fn circumradius() -> f64 {
    (SIDE_LENGTH / 2.0) / HALF_CENTRAL.sin()
}

/// Inradius `r = 0.5 / tan(36°)`.
#[inline]
pub fn inradius() -> f64 {
    (SIDE_LENGTH / 2.0) / HALF_CENTRAL.tan()
}

/// One regular pentagon with unit side length.
#[derive(Clone, Debug, PartialEq)]
pub struct Pentagon {
    vertices: [Point; 5],
    center: Point,
    label: Option<usize>,
}

impl Pentagon {
    /// Build the pentagon whose side 1 is `p1 → p2`.
    ///
    /// Fails when `|p1 - p2|` differs from 1.0 by more than `GeomCfg::eps_edge`.
    pub fn from_edge(p1: Point, p2: Point) -> Result<Self, GeomError> {
        Self::from_edge_cfg(p1, p2, &GeomCfg::default())
    }

    /// Same as [`Pentagon::from_edge`] with an explicit tolerance set.
    pub fn from_edge_cfg(p1: Point, p2: Point, cfg: &GeomCfg) -> Result<Self, GeomError> {
        let length = (p2 - p1).norm();
        if !length.is_finite() || (length - SIDE_LENGTH).abs() > cfg.eps_edge {
            return Err(GeomError::InvalidEdgeLength { length });
        }
        Ok(Self::from_edge_unchecked(p1, p2))
    }

    /// Construction without the edge-length check, for edges taken from an existing pentagon.
    pub(crate) fn from_edge_unchecked(p1: Point, p2: Point) -> Self {
        let d = p2 - p1;
        let angle = d.y.atan2(d.x);
        let mid = (p1 + p2) * 0.5;
        let r = inradius();
        let center = Point::new(mid.x + angle.sin() * r, mid.y - angle.cos() * r);
        let spoke = p2 - center;
        let step = |k: f64| center + Rotation2::new(-k * 2.0 * HALF_CENTRAL) * spoke;
        Self {
            vertices: [p1, p2, step(1.0), step(2.0), step(3.0)],
            center,
            label: None,
        }
    }

    /// Attach a diagnostic label (chains use the 1-based insertion position).
    pub fn with_label(mut self, label: usize) -> Self {
        self.label = Some(label);
        self
    }

    #[inline]
    pub fn label(&self) -> Option<usize> {
        self.label
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    /// Vertex by 0-based position in clockwise order.
    #[inline]
    pub fn vertex(&self, i: usize) -> Point {
        self.vertices[i % 5]
    }

    #[inline]
    pub fn vertices(&self) -> &[Point; 5] {
        &self.vertices
    }

    /// Side `n` (1-indexed): vertex `n-1` to vertex `n mod 5`.
    pub fn side(&self, n: u8) -> Segment {
        let n = usize::from(n);
        Segment::new(self.vertex(n + 4), self.vertex(n))
    }

    /// Segment from the center to vertex `n-1` (1-indexed), used by renderers.
    pub fn radius_line(&self, n: u8) -> Segment {
        Segment::new(self.center, self.vertex(usize::from(n) + 4))
    }

    /// Signed shoelace area; negative because the winding is clockwise.
    pub fn area(&self) -> f64 {
        super::convex::signed_area(&self.vertices)
    }

    /// The mirror neighbour across side `n`, built walking that side backwards.
    ///
    /// The new pentagon's side 1 is the shared side, so `on_side(n).on_side(1)`
    /// is congruent to `self`.
    pub fn on_side(&self, n: u8) -> Pentagon {
        let side = self.side(n);
        debug_assert!(
            (side.length() - SIDE_LENGTH).abs() <= GeomCfg::default().eps_edge,
            "side {n} drifted from unit length: {}",
            side.length()
        );
        Self::from_edge_unchecked(side.b, side.a)
    }
}

impl fmt::Display for Pentagon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label {
            Some(n) => write!(f, "P{n}"),
            None => write!(f, "P?"),
        }
    }
}
