// Hit-test sizes and numeric guards

pub const EPS_NORM: f64 = 1e-12;          // zero-norm guard for similarity

// Half size of a point's hit box, also its drawn radius (px)
pub const POINT_SIZE: f32 = 5.0;
// Pick radius around a point for single-coordinate queries
pub const POINT_PICK_RADIUS: f32 = POINT_SIZE * 2.0;
// Max distance for a single-coordinate query to hit a line
pub const LINE_PICK_DISTANCE: f32 = POINT_SIZE;
