//! Table-notation geometry: fixed-width boxes with one row per attribute.

use crate::geometry::{closest_anchor_pair, Point};
use crate::model::Entity;

pub const ENTITY_WIDTH: f64 = 250.0;
pub const HEADER_HEIGHT: f64 = 28.0;
pub const ROW_HEIGHT: f64 = 22.0;

/// Rendered box size: fixed width, height grows with the attribute count.
pub fn entity_size(entity: &Entity) -> (f64, f64) {
    let height = HEADER_HEIGHT + entity.attributes.len() as f64 * ROW_HEIGHT;
    (ENTITY_WIDTH, height)
}

/// Connection anchors: midpoints of the top, bottom, left, and right edges.
pub fn anchors(entity: &Entity) -> [Point; 4] {
    let (w, h) = entity_size(entity);
    [
        Point::new(entity.x + w / 2.0, entity.y),
        Point::new(entity.x + w / 2.0, entity.y + h),
        Point::new(entity.x, entity.y + h / 2.0),
        Point::new(entity.x + w, entity.y + h / 2.0),
    ]
}

/// Endpoints of the edge between two entities: the closest anchor pair.
pub fn connection(from: &Entity, to: &Entity) -> (Point, Point) {
    closest_anchor_pair(&anchors(from), &anchors(to))
}
