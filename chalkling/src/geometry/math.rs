use super::tolerance::{POINT_PICK_RADIUS, POINT_SIZE};
use crate::model::{Rect, Vec2};

#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    let dx = a.x - b.x; let dy = a.y - b.y;
    (dx*dx + dy*dy).sqrt()
}

/// Single-coordinate point hit: strictly closer than the pick radius.
#[inline]
pub fn point_hit(p: Vec2, query: Vec2) -> bool {
    distance(p, query) < POINT_PICK_RADIUS
}

/// Rectangle point hit: the point's fixed-size box overlaps the query.
#[inline]
pub fn point_box_hit(p: Vec2, query: &Rect) -> bool {
    Rect::around(p, POINT_SIZE).intersects(query)
}

#[inline]
fn between(v: f32, a: f32, b: f32) -> bool {
    (a <= v && v <= b) || (a >= v && v >= b)
}

/// Distance from `p` to the infinite line through `a` and `b`, gated by a
/// bracket check on the segment's extent.
///
/// The query is rejected (infinite distance) only when it is bracketed by the
/// endpoints neither on x nor on y. This is an approximation of segment
/// distance: a diagonal segment can reject a click whose nearest point lies on
/// the segment, and a click bracketed on one axis may measure against the
/// line's extension. Vertical lines measure the horizontal offset.
pub fn line_distance(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    if !between(p.x, a.x, b.x) && !between(p.y, a.y, b.y) {
        return f32::INFINITY;
    }
    if b.x - a.x == 0.0 {
        return (p.x - a.x).abs();
    }
    let m = (b.y - a.y) / (b.x - a.x);
    let c = a.y - m * a.x;
    // -m*x + 1*y - c = 0
    let (ka, kb, kc) = (-m, 1.0f32, -c);
    ((ka*p.x + kb*p.y + kc) / (ka*ka + kb*kb).sqrt()).abs()
}
