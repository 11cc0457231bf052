use super::*;
use crate::geom2::{circumradius, inradius};
use nalgebra::vector;
use proptest::prelude::*;

const TOL: f64 = 1e-9;

fn deg(d: f64) -> f64 {
    d.to_radians()
}

fn congruent(a: &Pentagon, b: &Pentagon) -> bool {
    (a.center() - b.center()).norm() < TOL
        && a
            .vertices()
            .iter()
            .all(|v| b.vertices().iter().any(|w| (v - w).norm() < TOL))
}

#[test]
fn standard_seed_is_clean() {
    let c = Chain::new();
    assert_eq!(c.len(), SEED_LEN);
    assert!(c.sequence().is_empty());
    assert!(!c.has_collisions());
    assert!(c.distance().is_infinite() && c.distance() > 0.0);
    // The two seeds share the edge (0,0)-(0,1).
    assert_eq!(c[0].side(1), c[1].side(1).reversed());
    assert!((c[0].center() - vector![-inradius(), 0.5]).norm() < 1e-12);
    assert!((c[1].center() - vector![inradius(), 0.5]).norm() < 1e-12);
}

#[test]
fn custom_seed_validates_edge() {
    let ok = Chain::with_seed(vector![2.0, 2.0], vector![3.0, 2.0], GeomCfg::default()).unwrap();
    assert_eq!(ok.len(), 2);
    let err = Chain::with_seed(vector![0.0, 0.0], vector![0.5, 0.0], GeomCfg::default());
    assert!(matches!(err, Err(GeomError::InvalidEdgeLength { .. })));
}

#[test]
fn labels_follow_insertion_order() {
    let c = Chain::from_sequence(&[3, 4, 3]);
    let labels: Vec<String> = c.into_iter().map(|p| p.to_string()).collect();
    assert_eq!(labels, ["P1", "P2", "P3", "P4", "P5"]);
}

#[test]
fn forbidden_pattern_collides_on_fourth_step() {
    let mut c = Chain::new();
    for (k, n) in [2u8, 3, 3, 2].into_iter().enumerate() {
        c.attach(n);
        assert_eq!(c.has_collisions(), k == 3, "after {} attachments", k + 1);
    }
    assert_eq!(Chain::from_sequence(&[2, 3, 3, 2, 4, 4]).sequence(), &[2, 3, 3, 2]);
}

#[test]
fn side_one_folds_back_onto_the_grandparent() {
    // Attaching on the shared side rebuilds the pentagon two steps back: full overlap.
    for n in 2..=5u8 {
        let mut c = Chain::new();
        c.attach(n);
        assert!(!c.has_collisions());
        c.attach(1);
        assert!(c.has_collisions());
        let k = c.len();
        assert!(congruent(&c[k - 1], &c[k - 3]));
    }
    assert!(Chain::from_sequence(&[1]).has_collisions());
}

#[test]
fn four_pentagons_around_a_vertex_overlap() {
    // 4 x 108° > 360°.
    assert!(Chain::from_sequence(&[2, 2]).has_collisions());
    assert!(Chain::from_sequence(&[5, 5]).has_collisions());
}

#[test]
fn known_distances() {
    let c = Chain::from_sequence(&[3, 3]);
    assert!(!c.has_collisions());
    assert!((c.distance() - 2.0 * deg(72.0).sin()).abs() < TOL);

    let c = Chain::from_sequence(&[2, 5]);
    assert!((c.distance() - 1.0).abs() < TOL);

    let c = Chain::from_sequence(&[2, 3, 3, 3]);
    assert!(!c.has_collisions());
    assert!((c.distance() - deg(36.0).sin()).abs() < TOL);

    let c = Chain::from_sequence(&[2, 4]);
    assert!((c.distance() - (circumradius() + inradius())).abs() < TOL);
}

#[test]
fn distance_is_a_running_minimum() {
    let mut c = Chain::new();
    let mut seen = Vec::new();
    for n in [2u8, 4, 2, 4, 2, 4] {
        c.attach(n);
        assert!(!c.has_collisions());
        seen.push(c.distance());
    }
    assert!(seen[0].is_infinite());
    assert!((seen[1] - (circumradius() + inradius())).abs() < TOL);
    for w in seen.windows(2) {
        assert!(w[1] <= w[0]);
    }
    assert!((seen[5] - 1.0).abs() < TOL);
}

#[test]
fn near_touch_counts_as_collision() {
    // The eighth pentagon touches an earlier one without overlapping it.
    let c = Chain::from_sequence_full(&[3, 5, 3, 5, 3, 5, 3, 5]);
    assert!(c.has_collisions());
    assert!(c.distance() < 1e-6);
    let c = Chain::from_sequence(&[3, 5, 3, 5, 3, 5, 3]);
    assert!(!c.has_collisions());
    assert!((c.distance() - 1.0).abs() < TOL);
}

#[test]
fn collisions_are_sticky_and_freeze_the_score() {
    let mut c = Chain::new();
    c.extend_until_collision(&[5, 5]);
    assert!(c.has_collisions());
    let frozen = c.distance();
    c.attach(3);
    c.attach(4);
    assert!(c.has_collisions());
    assert_eq!(c.distance().to_bits(), frozen.to_bits());
    assert_eq!(c.sequence(), &[5, 5, 3, 4]);
    assert_eq!(c.len(), c.sequence().len() + SEED_LEN);
}

#[test]
fn extend_reports_colliding_position() {
    let mut c = Chain::new();
    assert_eq!(c.extend_until_collision(&[3, 4, 3]), None);
    let mut c = Chain::new();
    assert_eq!(c.extend_until_collision(&[4, 2, 3, 3, 2]), Some(4));
}

#[test]
fn retract_restores_previous_state() {
    let mut c = Chain::from_sequence(&[2, 4, 2]);
    let before = (c.distance().to_bits(), c.has_collisions(), c.len());
    c.attach(4);
    c.attach(1);
    assert!(c.has_collisions());
    assert_eq!(c.retract(), Some(1));
    assert_eq!(c.retract(), Some(4));
    assert_eq!((c.distance().to_bits(), c.has_collisions(), c.len()), before);
    c.truncate(0);
    assert_eq!(c.len(), SEED_LEN);
    assert!(c.distance().is_infinite());
    assert_eq!(c.retract(), None);
}

#[test]
fn reused_prefix_matches_fresh_build() {
    let mut c = Chain::from_sequence(&[3, 4, 3, 4]);
    c.truncate(2);
    c.attach(2);
    c.attach(5);
    let fresh = Chain::from_sequence(&[3, 4, 2, 5]);
    assert_eq!(c.distance().to_bits(), fresh.distance().to_bits());
    assert_eq!(c.has_collisions(), fresh.has_collisions());
    assert_eq!(c.pentagons(), fresh.pentagons());
}

proptest! {
    #[test]
    fn attach_is_deterministic(seq in proptest::collection::vec(2u8..=5, 0..10)) {
        let a = Chain::from_sequence_full(&seq);
        let b = Chain::from_sequence_full(&seq);
        prop_assert_eq!(a.pentagons(), b.pentagons());
        prop_assert_eq!(a.distance().to_bits(), b.distance().to_bits());
    }

    #[test]
    fn distance_never_increases(seq in proptest::collection::vec(1u8..=5, 1..14)) {
        let mut c = Chain::new();
        let mut prev = c.distance();
        for n in seq {
            c.attach(n);
            if c.has_collisions() {
                break;
            }
            prop_assert!(c.distance() <= prev);
            prev = c.distance();
        }
    }

    #[test]
    fn every_link_stays_a_unit_pentagon(seq in proptest::collection::vec(2u8..=5, 1..16)) {
        let c = Chain::from_sequence_full(&seq);
        prop_assert_eq!(c.len(), seq.len() + SEED_LEN);
        for p in &c {
            for i in 0..5 {
                prop_assert!(((p.vertex(i + 1) - p.vertex(i)).norm() - 1.0).abs() < TOL);
            }
        }
    }
}
