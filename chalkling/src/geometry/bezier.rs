//! Bezier curve sampling for stroked curves and joints.
//!
//! Curves are evaluated with Bernstein polynomials at a fixed number of
//! evenly spaced parameters and stroked as the resulting polyline.

use crate::model::Vec2;

pub const DEFAULT_STEPS: usize = 10;

fn binomial(n: usize, k: usize) -> f32 {
    let k = k.min(n - k);
    let mut c = 1.0f64;
    for i in 0..k {
        c = c * (n - i) as f64 / (i + 1) as f64;
    }
    c as f32
}

/// Bernstein basis polynomial `b_{i,n}(t)`.
pub fn bernstein(i: usize, n: usize, t: f32) -> f32 {
    binomial(n, i) * t.powi(i as i32) * (1.0 - t).powi((n - i) as i32)
}

/// Point on the curve defined by `points` at parameter `t` in `[0, 1]`.
pub fn eval(points: &[Vec2], t: f32) -> Vec2 {
    if points.is_empty() {
        return Vec2::ZERO;
    }
    let n = points.len() - 1;
    let mut out = Vec2::ZERO;
    for (i, p) in points.iter().enumerate() {
        let w = bernstein(i, n, t);
        out.x += w * p.x;
        out.y += w * p.y;
    }
    out
}

/// Samples `steps` points at `t = 0, 1/(steps-1), …, 1`.
pub fn bezier_curve(points: &[Vec2], steps: usize) -> Vec<Vec2> {
    match steps {
        0 => Vec::new(),
        1 => vec![eval(points, 0.0)],
        _ => (0..steps)
            .map(|i| eval(points, i as f32 / (steps - 1) as f32))
            .collect(),
    }
}

/// Control points of a cubic Bézier curve.
#[derive(Clone, Copy, Debug)]
pub struct CubicBezier {
    pub p0: Vec2, // Start point
    pub p1: Vec2, // First control point
    pub p2: Vec2, // Second control point
    pub p3: Vec2, // End point
}

impl CubicBezier {
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    pub fn sample(&self, steps: usize) -> Vec<Vec2> {
        bezier_curve(&[self.p0, self.p1, self.p2, self.p3], steps)
    }
}
