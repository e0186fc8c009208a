use crate::model::{Element, Vec2};
use crate::Form;

/// State of one drag gesture, from pointer-down to pointer-up.
///
/// The session owns the dragged set; nothing else should move those points
/// until [`DragSession::stop`].
#[derive(Clone, Debug)]
pub struct DragSession {
    dragged: Vec<Element>,
    last: Vec2,
    moved: bool,
}

impl DragSession {
    pub fn start(dragged: Vec<Element>, pos: Vec2) -> Self {
        log::debug!("drag start with {} element(s)", dragged.len());
        DragSession { dragged, last: pos, moved: false }
    }

    pub fn dragged(&self) -> &[Element] {
        &self.dragged
    }

    pub fn has_moved(&self) -> bool {
        self.moved
    }

    /// Moves the dragged elements by the cursor delta since the last event.
    /// Returns true when anything moved.
    pub fn move_to(&mut self, form: &mut Form, pos: Vec2) -> bool {
        if !pos.is_finite() {
            return false;
        }
        let delta = pos - self.last;
        self.last = pos;
        if delta == Vec2::ZERO {
            return false;
        }
        let n = form.displace(&self.dragged, delta);
        if n > 0 {
            self.moved = true;
        }
        n > 0
    }

    /// Ends the session; reports whether the form was changed.
    pub fn stop(self) -> bool {
        log::debug!("drag stop, moved: {}", self.moved);
        self.moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LineSetting, PointSetting};

    #[test]
    fn drag_accumulates_deltas() {
        let mut f = Form::new();
        let a = f.add_point(Vec2::new(10.0, 10.0), PointSetting::default(), LineSetting::default()).unwrap();
        let mut s = DragSession::start(vec![Element::Point { id: a.point }], Vec2::new(10.0, 10.0));
        assert!(s.move_to(&mut f, Vec2::new(15.0, 10.0)));
        assert!(s.move_to(&mut f, Vec2::new(15.0, 20.0)));
        assert!(!s.move_to(&mut f, Vec2::new(15.0, 20.0)));
        assert!(s.stop());
        assert_eq!(f.point_pos(a.point), Some(Vec2::new(15.0, 20.0)));
    }

    #[test]
    fn click_without_motion_reports_no_move() {
        let mut f = Form::new();
        f.add_point(Vec2::new(0.0, 0.0), PointSetting::default(), LineSetting::default()).unwrap();
        let mut s = DragSession::start(vec![Element::Point { id: 0 }], Vec2::ZERO);
        assert!(!s.move_to(&mut f, Vec2::ZERO));
        assert!(!s.stop());
    }

    #[test]
    fn dragging_a_removed_point_is_a_no_op() {
        let mut f = Form::new();
        f.add_point(Vec2::new(0.0, 0.0), PointSetting::default(), LineSetting::default()).unwrap();
        let mut s = DragSession::start(vec![Element::Point { id: 0 }], Vec2::ZERO);
        f.remove_point(0);
        assert!(!s.move_to(&mut f, Vec2::new(3.0, 3.0)));
        assert!(!s.stop());
    }
}
