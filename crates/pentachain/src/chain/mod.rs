//! Pentagon chains: edge-to-edge attachment with incremental collision scoring.
//!
//! Purpose
//! - Own an ordered list of pentagons grown one attachment at a time, together
//!   with the attachment `sequence`, the running minimum `distance`, and a sticky
//!   `has_collisions` flag.
//! - Support cheap backtracking (`retract`) so searches can reuse the prefix a
//!   chain shares with the next candidate instead of rebuilding it.
//!
//! Invariants
//! - `sequence.len() == pentagons.len() - 2`: two seed pentagons precede the
//!   first attachment.
//! - `distance` only decreases while the chain grows and is meaningless once
//!   `has_collisions` is set.
//!
//! Code cross-refs: `eval::{newest_overlaps, newest_separation}`, `geom2::Pentagon::on_side`

pub mod eval;

use crate::error::GeomError;
use crate::geom2::{GeomCfg, Pentagon, Point};

/// Number of pentagons placed before the first attachment.
pub const SEED_LEN: usize = 2;

/// Score state restored by `retract`.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Score {
    distance: f64,
    has_collisions: bool,
}

/// Chain of regular unit pentagons, each the mirror neighbour of the previous one.
#[derive(Clone, Debug)]
pub struct Chain {
    pentagons: Vec<Pentagon>,
    sequence: Vec<u8>,
    distance: f64,
    has_collisions: bool,
    cfg: GeomCfg,
    undo: Vec<Score>,
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl Chain {
    /// Standard seed: `P1` on the edge `(0,1) → (0,0)` and `P2` across its side 1.
    pub fn new() -> Self {
        Self::with_cfg(GeomCfg::default())
    }

    /// Standard seed with explicit tolerances.
    pub fn with_cfg(cfg: GeomCfg) -> Self {
        let first = Pentagon::from_edge_unchecked(Point::new(0.0, 1.0), Point::new(0.0, 0.0));
        Self::seeded(first, cfg)
    }

    /// Seed from an externally supplied edge; fails unless the edge is unit length.
    pub fn with_seed(p1: Point, p2: Point, cfg: GeomCfg) -> Result<Self, GeomError> {
        let first = Pentagon::from_edge_cfg(p1, p2, &cfg)?;
        Ok(Self::seeded(first, cfg))
    }

    fn seeded(first: Pentagon, cfg: GeomCfg) -> Self {
        let second = first.on_side(1).with_label(2);
        Self {
            pentagons: vec![first.with_label(1), second],
            sequence: Vec::new(),
            distance: f64::INFINITY,
            has_collisions: false,
            cfg,
            undo: Vec::new(),
        }
    }

    /// Build from the standard seed, stopping at the first collision.
    pub fn from_sequence(sequence: &[u8]) -> Self {
        let mut chain = Self::new();
        chain.extend_until_collision(sequence);
        chain
    }

    /// Build from the standard seed, attaching every element even after a collision.
    pub fn from_sequence_full(sequence: &[u8]) -> Self {
        let mut chain = Self::new();
        for &n in sequence {
            chain.attach(n);
        }
        chain
    }

    /// Attach elements until one collides. Returns the position (within `sequence`)
    /// of the colliding element, or `None` when every element was attached cleanly.
    pub fn extend_until_collision(&mut self, sequence: &[u8]) -> Option<usize> {
        for (k, &n) in sequence.iter().enumerate() {
            self.attach(n);
            if self.has_collisions {
                return Some(k);
            }
        }
        None
    }

    /// Attach the mirror neighbour across side `edge_index` (1..=5) of the newest pentagon
    /// and rescore the chain.
    pub fn attach(&mut self, edge_index: u8) {
        debug_assert!(
            (1..=5).contains(&edge_index),
            "edge index {edge_index} outside 1..=5"
        );
        let label = self.pentagons.len() + 1;
        let next = self.last().on_side(edge_index).with_label(label);
        self.undo.push(Score {
            distance: self.distance,
            has_collisions: self.has_collisions,
        });
        self.pentagons.push(next);
        self.sequence.push(edge_index);
        if self.has_collisions {
            return;
        }
        if eval::newest_overlaps(&self.pentagons, &self.cfg) {
            self.has_collisions = true;
            return;
        }
        self.distance = eval::newest_separation(&self.pentagons, self.distance);
        if self.distance < self.cfg.eps_collision {
            self.has_collisions = true;
        }
    }

    /// Remove the newest attachment and restore the score it replaced.
    ///
    /// Returns the removed edge index; the seed pentagons are never removed.
    pub fn retract(&mut self) -> Option<u8> {
        let edge_index = self.sequence.pop()?;
        self.pentagons.pop();
        if let Some(score) = self.undo.pop() {
            self.distance = score.distance;
            self.has_collisions = score.has_collisions;
        }
        Some(edge_index)
    }

    /// Retract until at most `len` attachments remain.
    pub fn truncate(&mut self, len: usize) {
        while self.sequence.len() > len {
            self.retract();
        }
    }

    #[inline]
    pub fn last(&self) -> &Pentagon {
        // The seed guarantees at least two pentagons.
        &self.pentagons[self.pentagons.len() - 1]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pentagons.len()
    }

    /// Always false: a chain holds its seed pentagons.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pentagons.is_empty()
    }

    #[inline]
    pub fn pentagons(&self) -> &[Pentagon] {
        &self.pentagons
    }

    #[inline]
    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    #[inline]
    pub fn has_collisions(&self) -> bool {
        self.has_collisions
    }

    #[inline]
    pub fn cfg(&self) -> &GeomCfg {
        &self.cfg
    }
}

impl std::ops::Index<usize> for Chain {
    type Output = Pentagon;
    fn index(&self, i: usize) -> &Pentagon {
        &self.pentagons[i]
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Pentagon;
    type IntoIter = std::slice::Iter<'a, Pentagon>;
    fn into_iter(self) -> Self::IntoIter {
        self.pentagons.iter()
    }
}

#[cfg(test)]
mod tests;
