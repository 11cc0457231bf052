//! Collision and distance checks for the newest pentagon of a chain.
//!
//! Both checks skip the chain's own local structure: the previous pentagon
//! always shares a side with the newest one, and the one before that may
//! share a vertex. Only the remaining pentagons carry signal.

use crate::geom2::{intersection_area, polygon_distance, GeomCfg, Pentagon};

/// Pentagons closer to the newest one than this are skipped by the overlap test.
pub const OVERLAP_SKIP: usize = 2;
/// Pentagons closer to the newest one than this are skipped by the distance test.
pub const DISTANCE_SKIP: usize = 3;

/// Whether the newest pentagon overlaps any pentagon other than its predecessor.
pub fn newest_overlaps(pentagons: &[Pentagon], cfg: &GeomCfg) -> bool {
    let Some((newest, _)) = pentagons.split_last() else {
        return false;
    };
    let end = pentagons.len().saturating_sub(OVERLAP_SKIP);
    pentagons[..end]
        .iter()
        .any(|p| intersection_area(p.vertices(), newest.vertices()) > cfg.eps_area)
}

/// Running minimum of `current` and the separation between the newest pentagon
/// and every pentagon outside its two-step neighbourhood.
///
/// Chains shorter than four pentagons have nothing to measure and return `current`.
pub fn newest_separation(pentagons: &[Pentagon], current: f64) -> f64 {
    let Some((newest, _)) = pentagons.split_last() else {
        return current;
    };
    let end = pentagons.len().saturating_sub(DISTANCE_SKIP);
    pentagons[..end]
        .iter()
        .map(|p| polygon_distance(p.vertices(), newest.vertices()))
        .fold(current, f64::min)
}
