use chalkling::model::{Element, LineSetting, PointSetting, Rect, Vec2};
use chalkling::random::seeded_rng;
use chalkling::Form;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    AddPoint { x: i16, y: i16 },
    AddLine { a: u16, b: u16 },
    RemovePoint { idx: u16 },
    RemoveLine { idx: u16 },
    MovePoint { idx: u16, dx: i8, dy: i8 },
    SetPrevious { idx: u16 },
    ClearPrevious,
    SelectIn { x: i16, y: i16, w: u8, h: u8 },
    RemoveSelection,
    ToggleCurve,
    Displace { dx: i8, dy: i8 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (any::<i16>(), any::<i16>()).prop_map(|(x, y)| Op::AddPoint { x, y }),
        1 => (any::<u16>(), any::<u16>()).prop_map(|(a, b)| Op::AddLine { a, b }),
        1 => any::<u16>().prop_map(|idx| Op::RemovePoint { idx }),
        1 => any::<u16>().prop_map(|idx| Op::RemoveLine { idx }),
        1 => (any::<u16>(), any::<i8>(), any::<i8>()).prop_map(|(idx, dx, dy)| Op::MovePoint { idx, dx, dy }),
        1 => any::<u16>().prop_map(|idx| Op::SetPrevious { idx }),
        1 => Just(Op::ClearPrevious),
        1 => (any::<i16>(), any::<i16>(), any::<u8>(), any::<u8>())
            .prop_map(|(x, y, w, h)| Op::SelectIn { x, y, w, h }),
        1 => Just(Op::RemoveSelection),
        1 => Just(Op::ToggleCurve),
        1 => (any::<i8>(), any::<i8>()).prop_map(|(dx, dy)| Op::Displace { dx, dy }),
    ]
}

fn nth_point(f: &Form, idx: u16) -> Option<u32> {
    let ids: Vec<u32> = f.points().map(|(id, _)| id).collect();
    if ids.is_empty() {
        return None;
    }
    Some(ids[idx as usize % ids.len()])
}

fn nth_line(f: &Form, idx: u16) -> Option<u32> {
    let ids: Vec<u32> = f.lines().map(|(id, _)| id).collect();
    if ids.is_empty() {
        return None;
    }
    Some(ids[idx as usize % ids.len()])
}

fn apply(f: &mut Form, op: Op) {
    match op {
        Op::AddPoint { x, y } => {
            let pos = Vec2::new(x as f32 * 0.1, y as f32 * 0.1);
            let _ = f.add_point(pos, PointSetting::default(), LineSetting::default());
        }
        Op::AddLine { a, b } => {
            if let (Some(a), Some(b)) = (nth_point(f, a), nth_point(f, b)) {
                let _ = f.add_line(a, b, LineSetting::default());
            }
        }
        Op::RemovePoint { idx } => {
            if let Some(id) = nth_point(f, idx) {
                f.remove_point(id);
            }
        }
        Op::RemoveLine { idx } => {
            if let Some(id) = nth_line(f, idx) {
                f.remove_line(id);
            }
        }
        Op::MovePoint { idx, dx, dy } => {
            if let Some(id) = nth_point(f, idx) {
                let p = f.point_pos(id).unwrap();
                f.move_point(id, p + Vec2::new(dx as f32, dy as f32));
            }
        }
        Op::SetPrevious { idx } => {
            let id = nth_point(f, idx);
            f.set_previous_point(id);
        }
        Op::ClearPrevious => {
            f.set_previous_point(None);
        }
        Op::SelectIn { x, y, w, h } => {
            f.select_in(Rect::new(x as f32 * 0.1, y as f32 * 0.1, w as f32, h as f32));
        }
        Op::RemoveSelection => {
            f.remove_selection();
        }
        Op::ToggleCurve => {
            f.toggle_curve_selected();
        }
        Op::Displace { dx, dy } => {
            let sel: Vec<Element> = f.selection().to_vec();
            f.displace(&sel, Vec2::new(dx as f32, dy as f32));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn edit_sequences_keep_invariants(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let mut f = Form::new();
        for op in ops {
            apply(&mut f, op);
            f.assert_invariants();
        }
        let copy = f.variant();
        copy.assert_invariants();
        prop_assert_eq!(copy.to_position_vector(), f.to_position_vector());
    }

    #[test]
    fn scale_round_trip(
        pts in prop::collection::vec((-5000i32..5000, -5000i32..5000), 1..40),
        factor in prop_oneof![0.05f32..20.0, -20.0f32..-0.05],
    ) {
        let mut f = Form::new();
        for (x, y) in &pts {
            f.add_point(Vec2::new(*x as f32, *y as f32), PointSetting::default(), LineSetting::default()).unwrap();
        }
        let before = f.to_position_vector();
        f.scale(factor);
        f.scale(1.0 / factor);
        for (a, b) in before.iter().zip(f.to_position_vector()) {
            prop_assert!((a - b).abs() <= 1e-3 * a.abs().max(1.0), "{} vs {}", a, b);
        }
    }

    #[test]
    fn displace_then_undo_restores_positions(
        pts in prop::collection::vec((-500i32..500, -500i32..500), 2..20),
        dx in -100i32..100, dy in -100i32..100,
    ) {
        let mut f = Form::new();
        for (x, y) in &pts {
            f.add_point(Vec2::new(*x as f32, *y as f32), PointSetting::default(), LineSetting::default()).unwrap();
        }
        let all: Vec<Element> = f
            .points()
            .map(|(id, _)| Element::Point { id })
            .chain(f.lines().map(|(id, _)| Element::Line { id }))
            .collect();
        let before = f.to_position_vector();
        let d = Vec2::new(dx as f32, dy as f32);
        f.displace(&all, d);
        f.displace(&all, Vec2::new(-d.x, -d.y));
        prop_assert_eq!(before, f.to_position_vector());
    }
}

#[test]
fn bounded_regeneration_over_many_trials() {
    let mut f = Form::new();
    let a = f
        .add_point(Vec2::new(200.0, 150.0), PointSetting::default(), LineSetting::default())
        .unwrap()
        .point;
    let rect = Rect::new(180.0, 120.0, 40.0, 60.0);
    f.point_setting_mut(a).unwrap().set_bounds(rect);
    let mut rng = seeded_rng(2024);
    for _ in 0..1000 {
        f.regenerate(&mut rng);
        let p = f.point_pos(a).unwrap();
        assert!((p.x - 200.0).abs() <= 20.0 + 1e-4, "x {}", p.x);
        assert!((p.y - 150.0).abs() <= 30.0 + 1e-4, "y {}", p.y);
    }
}

#[test]
fn bounds_from_a_drawn_rect_keep_points_inside_it() {
    let mut f = Form::new();
    let a = f
        .add_point(Vec2::new(10.0, 10.0), PointSetting::default(), LineSetting::default())
        .unwrap()
        .point;
    let rect = Rect::new(100.0, 100.0, 30.0, 10.0);
    assert!(f.set_point_bounds(a, rect));
    assert_eq!(f.point_pos(a), Some(rect.center()));
    let mut rng = seeded_rng(9);
    for _ in 0..1000 {
        f.regenerate(&mut rng);
        let p = f.point_pos(a).unwrap();
        assert!(p.x >= rect.x - 1e-4 && p.x <= rect.right() + 1e-4);
        assert!(p.y >= rect.y - 1e-4 && p.y <= rect.bottom() + 1e-4);
    }
}
