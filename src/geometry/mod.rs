//! Diagram geometry shared by both renderer notations.
//!
//! Everything here is a pure function of positions; nothing is cached, so
//! callers recompute on every drag.

pub mod chen;
pub mod table;

/// A point in diagram coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Squared euclidean distance. Comparisons only need ordering, so the
/// square root is never taken.
pub fn dist_sq(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Pick the pair of anchors (one from each set) with the minimum squared
/// distance. Ties keep the first pair found, in iteration order of `from`
/// then `to`, so the result is deterministic.
pub fn closest_anchor_pair(from: &[Point], to: &[Point]) -> (Point, Point) {
    let mut best = (from[0], to[0]);
    let mut best_dist = f64::INFINITY;

    for &a in from {
        for &b in to {
            let d = dist_sq(a, b);
            if d < best_dist {
                best_dist = d;
                best = (a, b);
            }
        }
    }

    best
}
