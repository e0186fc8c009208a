// Centralized ingestion limits to harden against untrusted documents

// Scene size caps
pub const MAX_POINTS: usize = 100_000;
pub const MAX_LINES: usize = 200_000;

// Numeric bounds
pub const COORD_MIN: f32 = -10_000_000.0;
pub const COORD_MAX: f32 =  10_000_000.0;
pub const WIDTH_MAX: f32 = 10_000.0;
pub const VARIANCE_MAX: f32 = 1_000_000.0;

// Canvas caps for rasterization
pub const MAX_CANVAS_SIDE: u32 = 8_192;

#[inline]
pub fn in_coord_bounds(x: f32) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

#[inline]
pub fn point_in_bounds(x: f32, y: f32) -> bool { in_coord_bounds(x) && in_coord_bounds(y) }

#[inline]
pub fn clamp_coord(x: f32) -> f32 { x.clamp(COORD_MIN, COORD_MAX) }

#[inline]
pub fn in_width_bounds(w: f32) -> bool { w.is_finite() && w >= 0.0 && w <= WIDTH_MAX }

#[inline]
pub fn in_variance_bounds(v: f32) -> bool { v.is_finite() && v.abs() <= VARIANCE_MAX }

// Highest id accepted from a document; ids index the arenas directly
pub const MAX_ID: u32 = 1_000_000;
