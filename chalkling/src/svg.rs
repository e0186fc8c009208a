use crate::geometry::bezier::CubicBezier;
use crate::render::{joints, line_path};
use crate::Form;

fn cubic_d(c: &CubicBezier) -> String {
    format!(
        "M {} {} C {} {}, {} {}, {} {}",
        c.p0.x, c.p0.y, c.p1.x, c.p1.y, c.p2.x, c.p2.y, c.p3.x, c.p3.y
    )
}

/// One path per stroke: straight lines as `M L`, curved lines and joints as `M C`.
/// Joints are emitted once per unordered pair of lines.
pub fn to_svg_paths_impl(f: &Form, steps: usize) -> Vec<String> {
    let mut paths = Vec::new();
    for (_, l) in f.lines() {
        // line_path is None for lines that end in a joint
        if line_path(f, l, steps).is_none() {
            continue;
        }
        let (Some(a), Some(b)) = (f.point_pos(l.a), f.point_pos(l.b)) else { continue };
        if l.setting.curve {
            paths.push(cubic_d(&CubicBezier::new(a, l.controls[0].pos, l.controls[1].pos, b)));
        } else {
            paths.push(format!("M {} {} L {} {}", a.x, a.y, b.x, b.y));
        }
    }
    for j in joints(f) {
        if j.first < j.second {
            paths.push(cubic_d(&j.curve));
        }
    }
    paths
}
