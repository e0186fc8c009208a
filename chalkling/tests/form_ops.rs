use chalkling::model::{Element, LineSetting, PointSetting, Vec2};
use chalkling::random::seeded_rng;
use chalkling::{Form, FormError};

fn add(f: &mut Form, x: f32, y: f32) -> chalkling::Added {
    f.add_point(Vec2::new(x, y), PointSetting::default(), LineSetting::default())
        .unwrap()
}

#[test]
fn two_points_then_remove_and_regenerate() {
    let mut f = Form::new();
    let first = add(&mut f, 0.0, 0.0);
    let second = add(&mut f, 100.0, 0.0);
    assert_eq!(f.line_count(), 1);
    let line = second.line.unwrap();
    assert_eq!(
        f.line_endpoints(line),
        Some((Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)))
    );
    assert_eq!(f.previous_point(), Some(second.point));

    let near = f
        .get_selected_at(Vec2::new(101.0, 1.0))
        .into_iter()
        .find_map(|e| match e {
            Element::Point { id } => Some(id),
            _ => None,
        })
        .unwrap();
    assert_eq!(near, second.point);
    assert!(f.remove_point(near));
    assert_eq!(f.line_count(), 0);
    assert_eq!(f.point_count(), 1);
    assert_eq!(f.point_pos(first.point), Some(Vec2::new(0.0, 0.0)));
    assert_eq!(f.previous_point(), None);
    f.assert_invariants();

    *f.point_setting_mut(first.point).unwrap() = {
        let mut s = PointSetting::with_variance(-10.0, 10.0, -10.0, 10.0);
        s.set_base(Vec2::new(0.0, 0.0));
        s
    };
    let mut rng = seeded_rng(11);
    f.regenerate(&mut rng);
    let p = f.point_pos(first.point).unwrap();
    assert!(p.x.abs() <= 10.0 && p.y.abs() <= 10.0, "{:?}", p);
}

#[test]
fn add_point_chains_instead_of_starring() {
    let mut f = Form::new();
    let a = add(&mut f, 0.0, 0.0);
    let b = add(&mut f, 10.0, 0.0);
    let c = add(&mut f, 20.0, 0.0);
    assert_eq!(a.line, None);
    let l1 = f.line(b.line.unwrap()).unwrap();
    let l2 = f.line(c.line.unwrap()).unwrap();
    assert_eq!((l1.a, l1.b), (a.point, b.point));
    assert_eq!((l2.a, l2.b), (b.point, c.point));
    assert_eq!(f.lines_at(b.point), &[b.line.unwrap(), c.line.unwrap()]);
    f.assert_invariants();
}

#[test]
fn removing_a_line_keeps_its_endpoints() {
    let mut f = Form::new();
    let a = add(&mut f, 0.0, 0.0);
    let b = add(&mut f, 10.0, 0.0);
    let line = b.line.unwrap();
    f.select(&[Element::Line { id: line }]);
    f.toggle_curve_selected();
    f.select(&[Element::Control { line, end: 0 }]);

    assert!(f.remove_line(line));
    assert_eq!(f.point_count(), 2);
    assert!(f.point(a.point).is_some() && f.point(b.point).is_some());
    assert!(f.lines_at(a.point).is_empty() && f.lines_at(b.point).is_empty());
    assert!(f.selection().is_empty());
    f.assert_invariants();
}

#[test]
fn removing_a_hub_point_drops_every_incident_line() {
    let mut f = Form::new();
    let hub = add(&mut f, 50.0, 50.0).point;
    for (x, y) in [(0.0, 0.0), (100.0, 0.0), (50.0, 100.0)] {
        if f.previous_point() != Some(hub) {
            f.set_previous_point(Some(hub));
        }
        add(&mut f, x, y);
    }
    assert_eq!(f.line_count(), 3);
    assert!(f.remove_point(hub));
    assert_eq!(f.line_count(), 0);
    assert_eq!(f.point_count(), 3);
    for (id, _) in f.points() {
        assert!(f.lines_at(id).is_empty());
    }
    f.assert_invariants();
}

#[test]
fn remove_selection_skips_control_points() {
    let mut f = Form::new();
    add(&mut f, 0.0, 0.0);
    let b = add(&mut f, 10.0, 0.0);
    let line = b.line.unwrap();
    f.select(&[Element::Line { id: line }]);
    f.toggle_curve_selected();
    f.unselect_all();
    f.select(&[Element::Control { line, end: 1 }]);
    assert_eq!(f.remove_selection(), 0);
    assert_eq!(f.line_count(), 1);
    assert_eq!(f.point_count(), 2);
}

#[test]
fn rejected_edits_leave_the_form_unchanged() {
    let mut f = Form::new();
    let a = add(&mut f, 0.0, 0.0);
    let before = f.to_json_value();
    assert_eq!(
        f.add_line(a.point, a.point, LineSetting::default()),
        Err(FormError::SelfLoop(a.point))
    );
    assert_eq!(
        f.add_point(Vec2::new(f32::NAN, 0.0), PointSetting::default(), LineSetting::default()),
        Err(FormError::NonFinite("pos"))
    );
    assert!(!f.move_point(a.point, Vec2::new(f32::INFINITY, 0.0)));
    assert_eq!(f.to_json_value(), before);
}

#[test]
fn explicit_move_reanchors_but_regenerate_does_not() {
    let mut f = Form::new();
    let a = f
        .add_point(
            Vec2::new(0.0, 0.0),
            PointSetting::with_variance(-1.0, 1.0, -1.0, 1.0),
            LineSetting::default(),
        )
        .unwrap()
        .point;
    assert!(f.move_point(a, Vec2::new(40.0, 40.0)));
    let mut rng = seeded_rng(3);
    for _ in 0..50 {
        f.regenerate(&mut rng);
        let p = f.point_pos(a).unwrap();
        assert!((p.x - 40.0).abs() <= 1.0 && (p.y - 40.0).abs() <= 1.0);
        assert_eq!(f.point(a).unwrap().setting.base, Vec2::new(40.0, 40.0));
    }
}

#[test]
fn line_width_regenerates_within_its_variance() {
    let mut f = Form::new();
    add(&mut f, 0.0, 0.0);
    let line = add(&mut f, 10.0, 0.0).line.unwrap();
    let mut rng = seeded_rng(5);
    for _ in 0..200 {
        f.regenerate(&mut rng);
        let w = f.line(line).unwrap().width;
        assert!((1.0..=5.0).contains(&w), "width {}", w);
    }
}

#[test]
fn scale_leaves_widths_alone() {
    let mut f = Form::new();
    add(&mut f, 10.0, 20.0);
    let line = add(&mut f, 30.0, 40.0).line.unwrap();
    f.scale(0.5);
    assert_eq!(f.to_position_vector(), vec![5.0, 10.0, 15.0, 20.0]);
    let l = f.line(line).unwrap();
    assert_eq!(l.width, chalkling::model::DEFAULT_LINE_WIDTH);
    assert_eq!(l.controls[0].pos, Vec2::new(5.0, 35.0));
}
