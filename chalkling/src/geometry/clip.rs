//! Rectangle/segment clipping (Cohen–Sutherland).

use crate::model::{Rect, Vec2};

const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const TOP: u8 = 4;
const BOTTOM: u8 = 8;

fn outcode(p: Vec2, r: &Rect) -> u8 {
    let mut code = INSIDE;
    if p.x < r.x { code |= LEFT; } else if p.x > r.right() { code |= RIGHT; }
    if p.y < r.y { code |= TOP; } else if p.y > r.bottom() { code |= BOTTOM; }
    code
}

/// Part of segment `a`–`b` inside the closed rectangle, if any.
/// Empty rectangles clip nothing.
pub fn clip_segment(r: &Rect, mut a: Vec2, mut b: Vec2) -> Option<(Vec2, Vec2)> {
    if r.is_empty() {
        return None;
    }
    let mut ca = outcode(a, r);
    let mut cb = outcode(b, r);
    loop {
        if ca | cb == INSIDE {
            return Some((a, b));
        }
        if ca & cb != INSIDE {
            return None;
        }
        let out = if ca != INSIDE { ca } else { cb };
        let dx = b.x - a.x; let dy = b.y - a.y;
        let p = if out & BOTTOM != 0 {
            Vec2::new(a.x + dx * (r.bottom() - a.y) / dy, r.bottom())
        } else if out & TOP != 0 {
            Vec2::new(a.x + dx * (r.y - a.y) / dy, r.y)
        } else if out & RIGHT != 0 {
            Vec2::new(r.right(), a.y + dy * (r.right() - a.x) / dx)
        } else {
            Vec2::new(r.x, a.y + dy * (r.x - a.x) / dx)
        };
        if out == ca {
            a = p;
            ca = outcode(a, r);
        } else {
            b = p;
            cb = outcode(b, r);
        }
    }
}

#[inline]
pub fn segment_intersects_rect(r: &Rect, a: Vec2, b: Vec2) -> bool {
    clip_segment(r, a, b).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_segment_is_clipped() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let (a, b) = clip_segment(&r, Vec2::new(-5.0, 5.0), Vec2::new(15.0, 5.0)).unwrap();
        assert_eq!(a, Vec2::new(0.0, 5.0));
        assert_eq!(b, Vec2::new(10.0, 5.0));
    }

    #[test]
    fn segment_passing_beside_corner_is_rejected() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!segment_intersects_rect(&r, Vec2::new(8.0, -5.0), Vec2::new(20.0, 7.0)));
    }

    #[test]
    fn enclosed_and_disjoint_segments() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(segment_intersects_rect(&r, Vec2::new(2.0, 2.0), Vec2::new(3.0, 8.0)));
        assert!(!segment_intersects_rect(&r, Vec2::new(20.0, 20.0), Vec2::new(30.0, 25.0)));
        assert!(!segment_intersects_rect(&Rect::new(0.0, 0.0, 0.0, 10.0), Vec2::new(-1.0, 5.0), Vec2::new(1.0, 5.0)));
    }
}
