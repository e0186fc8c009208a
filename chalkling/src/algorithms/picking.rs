use crate::geometry::clip::segment_intersects_rect;
use crate::geometry::math::{distance, line_distance, point_box_hit, point_hit};
use crate::geometry::tolerance::LINE_PICK_DISTANCE;
use crate::model::{Element, Line, Rect, Vec2};
use crate::Form;

// Control points are only live while their owning line is selected and curved.
fn controls_active(l: &Line) -> bool {
    l.marks.selected && l.setting.curve
}

/// Nearest control point, nearest point and nearest line under `pos`, in that order.
pub fn selected_at(form: &Form, pos: Vec2) -> Vec<Element> {
    let mut out = Vec::new();
    // Controls
    let mut best_ctrl: Option<(u32, u8, f32)> = None;
    for (id, l) in form.lines() {
        if !controls_active(l) { continue; }
        for (end, c) in l.controls.iter().enumerate() {
            let d = distance(c.pos, pos);
            if point_hit(c.pos, pos) && best_ctrl.map_or(true, |(_, _, bd)| d < bd) { best_ctrl = Some((id, end as u8, d)); }
        }
    }
    if let Some((line, end, _)) = best_ctrl { out.push(Element::Control { line, end }); }
    // Points
    let mut best_point: Option<(u32, f32)> = None;
    for (id, p) in form.points() {
        let d = distance(p.pos, pos);
        if point_hit(p.pos, pos) && best_point.map_or(true, |(_, bd)| d < bd) { best_point = Some((id, d)); }
    }
    if let Some((id, _)) = best_point { out.push(Element::Point { id }); }
    // Lines
    let mut best_line: Option<(u32, f32)> = None;
    for (id, _) in form.lines() {
        let Some((a, b)) = form.line_endpoints(id) else { continue };
        let d = line_distance(a, b, pos);
        if d < LINE_PICK_DISTANCE && best_line.map_or(true, |(_, bd)| d < bd) { best_line = Some((id, d)); }
    }
    if let Some((id, _)) = best_line { out.push(Element::Line { id }); }
    out
}

/// Every control point, point and line whose hit area meets `rect`.
pub fn selected_in(form: &Form, rect: Rect) -> Vec<Element> {
    let mut out = Vec::new();
    for (id, l) in form.lines() {
        if !controls_active(l) { continue; }
        for (end, c) in l.controls.iter().enumerate() {
            if point_box_hit(c.pos, &rect) { out.push(Element::Control { line: id, end: end as u8 }); }
        }
    }
    for (id, p) in form.points() {
        if point_box_hit(p.pos, &rect) { out.push(Element::Point { id }); }
    }
    for (id, _) in form.lines() {
        if let Some((a, b)) = form.line_endpoints(id) {
            if segment_intersects_rect(&rect, a, b) { out.push(Element::Line { id }); }
        }
    }
    out
}

/// Endpoint of `line` under `pos`, preferring `a` when both match.
pub fn line_endpoint_at(form: &Form, line: u32, pos: Vec2) -> Option<u32> {
    let l = form.line(line)?;
    [l.a, l.b]
        .into_iter()
        .find(|&p| form.point_pos(p).map_or(false, |q| point_hit(q, pos)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LineSetting, PointSetting};

    fn two_point_form() -> Form {
        let mut f = Form::new();
        f.add_point(Vec2::new(0.0, 0.0), PointSetting::default(), LineSetting::default()).unwrap();
        f.add_point(Vec2::new(100.0, 0.0), PointSetting::default(), LineSetting::default()).unwrap();
        f
    }

    #[test]
    fn coordinate_pick_on_endpoint_returns_point_then_line() {
        let f = two_point_form();
        let hits = selected_at(&f, Vec2::new(2.0, 1.0));
        assert_eq!(hits, vec![Element::Point { id: 0 }, Element::Line { id: 0 }]);
    }

    #[test]
    fn coordinate_pick_mid_line() {
        let f = two_point_form();
        assert_eq!(selected_at(&f, Vec2::new(50.0, 4.0)), vec![Element::Line { id: 0 }]);
        assert!(selected_at(&f, Vec2::new(50.0, 6.0)).is_empty());
    }

    #[test]
    fn controls_need_selected_curved_line() {
        let mut f = two_point_form();
        let ctrl = Vec2::new(0.0, 50.0);
        assert!(selected_at(&f, ctrl).is_empty());
        f.select(&[Element::Line { id: 0 }]);
        assert!(selected_at(&f, ctrl).is_empty());
        f.toggle_curve_selected();
        assert_eq!(selected_at(&f, ctrl), vec![Element::Control { line: 0, end: 0 }]);
        let boxed = selected_in(&f, Rect::new(95.0, 45.0, 10.0, 10.0));
        assert_eq!(boxed, vec![Element::Control { line: 0, end: 1 }]);
    }

    #[test]
    fn endpoint_prefers_a() {
        let mut f = Form::new();
        f.add_point(Vec2::new(0.0, 0.0), PointSetting::default(), LineSetting::default()).unwrap();
        f.add_point(Vec2::new(4.0, 0.0), PointSetting::default(), LineSetting::default()).unwrap();
        assert_eq!(line_endpoint_at(&f, 0, Vec2::new(2.0, 0.0)), Some(0));
        assert_eq!(line_endpoint_at(&f, 0, Vec2::new(50.0, 0.0)), None);
    }
}
