//! 2D geometry kernel for pentagon chains.
//!
//! Purpose
//! - Build regular unit-side pentagons from one oriented edge with closed-form
//!   trigonometry (circumradius, inradius, rotations by multiples of 72°).
//! - Provide the two convex predicates the chain evaluator needs: overlap
//!   area and separation distance.
//!
//! Numerics
//! - All tolerances live in `GeomCfg`; nothing here is exact, so every
//!   predicate that feeds a collision decision is compared against an eps.
//!
//! Code cross-refs: `Pentagon`, `GeomCfg`, `convex::{intersection_area, polygon_distance}`

pub mod convex;
mod pentagon;
mod types;

pub use convex::{intersection_area, polygon_distance};
pub use pentagon::{circumradius, inradius, Pentagon, SIDE_LENGTH};
pub use types::{GeomCfg, Point, Segment};
