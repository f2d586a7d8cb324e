//! Chen-notation geometry: rectangle entities, diamond relationships, and
//! attribute ellipses placed radially around their entity.
//!
//! Unlike table notation, an entity's `(x, y)` is its center here.

use std::f64::consts::PI;

use crate::geometry::{closest_anchor_pair, Point};

pub const ENTITY_HALF_WIDTH: f64 = 70.0;
pub const ENTITY_HALF_HEIGHT: f64 = 25.0;
pub const DIAMOND_HALF_WIDTH: f64 = 60.0;
pub const DIAMOND_HALF_HEIGHT: f64 = 35.0;

/// Radii of the ellipse on which attributes orbit their entity.
pub const RADIUS_X: f64 = 130.0;
pub const RADIUS_Y: f64 = 100.0;

/// Position of attribute `i` of `n` around `center`. The first attribute
/// sits straight up (angle −π/2); the rest follow clockwise at even
/// angular spacing.
pub fn attribute_position(center: Point, i: usize, n: usize) -> Point {
    let angle = (i as f64 / n as f64) * 2.0 * PI - PI / 2.0;
    Point::new(
        center.x + angle.cos() * RADIUS_X,
        center.y + angle.sin() * RADIUS_Y,
    )
}

/// A relationship diamond sits at the midpoint of its two entity centers.
pub fn relationship_center(from: Point, to: Point) -> Point {
    Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0)
}

/// Four edge-midpoint anchors of a center-positioned shape.
pub fn shape_anchors(center: Point, half_w: f64, half_h: f64) -> [Point; 4] {
    [
        Point::new(center.x, center.y - half_h),
        Point::new(center.x, center.y + half_h),
        Point::new(center.x - half_w, center.y),
        Point::new(center.x + half_w, center.y),
    ]
}

pub fn entity_anchors(center: Point) -> [Point; 4] {
    shape_anchors(center, ENTITY_HALF_WIDTH, ENTITY_HALF_HEIGHT)
}

pub fn diamond_anchors(center: Point) -> [Point; 4] {
    shape_anchors(center, DIAMOND_HALF_WIDTH, DIAMOND_HALF_HEIGHT)
}

/// Edge endpoints between an entity and its relationship diamond.
pub fn entity_diamond_connection(entity: Point, diamond: Point) -> (Point, Point) {
    closest_anchor_pair(&entity_anchors(entity), &diamond_anchors(diamond))
}

/// Edge endpoint on the entity for the spoke to an attribute ellipse. The
/// attribute end attaches at its center, so only the entity side snaps to
/// an anchor.
pub fn attribute_spoke_anchor(entity: Point, attribute: Point) -> Point {
    let (anchor, _) = closest_anchor_pair(&entity_anchors(entity), &[attribute]);
    anchor
}
