//! Convex polygon predicates: overlap area and separation distance.
//!
//! Polygons are vertex slices in either winding order. Both predicates assume
//! convexity; pentagons in a chain always satisfy it.
//!
//! - `intersection_area`: Sutherland–Hodgman clip of `subject` by `clip`, then shoelace.
//! - `polygon_distance`: 0 when boundaries cross or one contains the other,
//!   otherwise the smallest vertex-to-edge distance in both directions.

use super::types::Point;

#[inline]
fn cross(o: Point, a: Point, b: Point) -> f64 {
    let oa = a - o;
    let ob = b - o;
    oa.x * ob.y - oa.y * ob.x
}

/// Signed shoelace area (positive for counterclockwise winding).
pub fn signed_area(poly: &[Point]) -> f64 {
    if poly.len() < 3 {
        return 0.0;
    }
    let n = poly.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let p = poly[i];
            let q = poly[(i + 1) % n];
            p.x * q.y - q.x * p.y
        })
        .sum();
    twice * 0.5
}

/// Distance from `p` to the closed segment `a → b`.
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq < 1e-20 {
        return (p - a).norm();
    }
    // Project onto the carrier line and clamp to the segment.
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    (p - (a + d * t)).norm()
}

/// Whether closed segments `a1 → a2` and `b1 → b2` share at least one point.
pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let d1 = cross(b1, b2, a1);
    let d2 = cross(b1, b2, a2);
    let d3 = cross(a1, a2, b1);
    let d4 = cross(a1, a2, b2);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    // Collinear or endpoint-touching configurations.
    (d1 == 0.0 && on_segment(b1, b2, a1))
        || (d2 == 0.0 && on_segment(b1, b2, a2))
        || (d3 == 0.0 && on_segment(a1, a2, b1))
        || (d4 == 0.0 && on_segment(a1, a2, b2))
}

#[inline]
fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Distance between closed segments `a1 → a2` and `b1 → b2`.
pub fn segment_distance(a1: Point, a2: Point, b1: Point, b2: Point) -> f64 {
    if segments_intersect(a1, a2, b1, b2) {
        return 0.0;
    }
    point_segment_distance(a1, b1, b2)
        .min(point_segment_distance(a2, b1, b2))
        .min(point_segment_distance(b1, a1, a2))
        .min(point_segment_distance(b2, a1, a2))
}

/// Whether `p` lies in the closed convex polygon `poly`.
pub fn contains_point(poly: &[Point], p: Point) -> bool {
    let orient = signed_area(poly).signum();
    let n = poly.len();
    (0..n).all(|i| orient * cross(poly[i], poly[(i + 1) % n], p) >= 0.0)
}

/// Part of convex `subject` inside convex `clip` (may have fewer than 3 vertices).
pub fn clip_convex(subject: &[Point], clip: &[Point]) -> Vec<Point> {
    let orient = signed_area(clip).signum();
    let mut out: Vec<Point> = subject.to_vec();
    let n = clip.len();
    for i in 0..n {
        if out.is_empty() {
            break;
        }
        let a = clip[i];
        let b = clip[(i + 1) % n];
        let input = std::mem::take(&mut out);
        let m = input.len();
        for j in 0..m {
            let cur = input[j];
            let prev = input[(j + m - 1) % m];
            let dc = orient * cross(a, b, cur);
            let dp = orient * cross(a, b, prev);
            if dc >= 0.0 {
                if dp < 0.0 {
                    out.push(prev + (cur - prev) * (dp / (dp - dc)));
                }
                out.push(cur);
            } else if dp >= 0.0 {
                out.push(prev + (cur - prev) * (dp / (dp - dc)));
            }
        }
    }
    out
}

/// Area of the overlap of two convex polygons.
pub fn intersection_area(a: &[Point], b: &[Point]) -> f64 {
    signed_area(&clip_convex(a, b)).abs()
}

/// Minimum distance between two convex polygons (0 when they touch or overlap).
pub fn polygon_distance(a: &[Point], b: &[Point]) -> f64 {
    let na = a.len();
    let nb = b.len();
    let mut best = f64::INFINITY;
    for i in 0..na {
        let (a1, a2) = (a[i], a[(i + 1) % na]);
        for j in 0..nb {
            let (b1, b2) = (b[j], b[(j + 1) % nb]);
            if segments_intersect(a1, a2, b1, b2) {
                return 0.0;
            }
            best = best
                .min(point_segment_distance(a1, b1, b2))
                .min(point_segment_distance(b1, a1, a2));
        }
    }
    if a.first().is_some_and(|&p| contains_point(b, p))
        || b.first().is_some_and(|&p| contains_point(a, p))
    {
        return 0.0;
    }
    best
}
