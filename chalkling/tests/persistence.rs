use chalkling::model::{BodyFeature, BodyPart, Element, LineSetting, PointSetting, Vec2};
use chalkling::random::seeded_rng;
use chalkling::Form;
use serde_json::json;

fn authored() -> Form {
    let mut f = Form::new();
    let curve_point = PointSetting { curve: true, ..PointSetting::with_variance(-4.0, 4.0, -2.0, 6.0) };
    f.add_point(Vec2::new(10.0, 10.0), PointSetting::default(), LineSetting::default()).unwrap();
    f.add_point(Vec2::new(60.0, 20.0), curve_point, LineSetting::default()).unwrap();
    let mut tagged = LineSetting::default();
    tagged.toggle_body_part(BodyPart::Tail);
    tagged.toggle_body_feature(BodyFeature::Spikey);
    f.add_point(Vec2::new(90.0, 70.0), PointSetting::default(), tagged).unwrap();
    f.select(&[Element::Line { id: 1 }]);
    f.toggle_curve_selected();
    f.unselect_all();
    f.stats_mut().speed = 0.9;
    f
}

#[test]
fn bytes_round_trip_is_lossless() {
    let mut f = authored();
    f.regenerate(&mut seeded_rng(1));
    let back = Form::from_bytes(&f.to_bytes()).unwrap();
    back.assert_invariants();
    assert_eq!(back.to_json_value(), f.to_json_value());
    assert_eq!(back.to_position_vector(), f.to_position_vector());
    assert_eq!(back.previous_point(), f.previous_point());
    assert_eq!(back.lines_at(1), f.lines_at(1));
    let line = back.line(1).unwrap();
    assert!(line.setting.curve);
    assert!(line.setting.body_parts.contains(&BodyPart::Tail));
    assert!(line.setting.body_features.contains(&BodyFeature::Spikey));
    // the anchor survives even though the position was regenerated
    assert_eq!(back.point(1).unwrap().setting.base, Vec2::new(60.0, 20.0));
    assert_eq!(back.stats().speed, 0.9);
}

#[test]
fn ids_survive_holes() {
    let mut f = authored();
    f.remove_point(0);
    let back = Form::from_bytes(&f.to_bytes()).unwrap();
    assert!(back.point(0).is_none());
    assert!(back.point(2).is_some());
    assert_eq!(back.line_count(), 1);
    assert!(back.line(1).is_some());
}

#[test]
fn strict_load_rejects_dangling_lines_and_keeps_state() {
    let mut f = authored();
    let before = f.to_json_value();
    let doc = json!({
        "version": 1,
        "points": [{ "id": 0, "x": 1.0, "y": 1.0 }],
        "lines": [{ "id": 0, "a": 0, "b": 5 }],
        "previous": null
    });
    let err = f.from_json_value_strict(doc.clone()).unwrap_err();
    assert_eq!(err.code(), "invalid_document");
    assert_eq!(f.to_json_value(), before);

    assert!(f.from_json_value(doc));
    assert_eq!(f.point_count(), 1);
    assert_eq!(f.line_count(), 0);
    f.assert_invariants();
}

#[test]
fn self_loops_are_rejected_in_both_modes() {
    let doc = json!({
        "points": [{ "id": 0, "x": 1.0, "y": 1.0 }],
        "lines": [{ "id": 0, "a": 0, "b": 0 }]
    });
    let mut f = authored();
    assert!(!f.from_json_value(doc.clone()));
    assert_eq!(f.point_count(), 3);
    assert!(f.from_json_value_strict(doc).is_err());
}

#[test]
fn ingest_limits() {
    let mut f = Form::new();
    let far = json!({ "points": [{ "id": 0, "x": 1.0e38, "y": 0.0 }], "lines": [] });
    assert!(!f.from_json_value(far));

    let huge_id = json!({ "points": [{ "id": 4000000000u32, "x": 0.0, "y": 0.0 }], "lines": [] });
    assert_eq!(f.from_json_value_strict(huge_id).unwrap_err().code(), "limit_exceeded");

    let wide = json!({
        "points": [{ "id": 0, "x": 0.0, "y": 0.0 }, { "id": 1, "x": 5.0, "y": 0.0 }],
        "lines": [{ "id": 0, "a": 0, "b": 1, "width": -1.0 }]
    });
    assert!(!f.from_json_value(wide));

    let too_many: Vec<_> = (0..100_001u32).map(|i| json!({ "id": i, "x": 0.0, "y": 0.0 })).collect();
    let doc = json!({ "points": too_many, "lines": [] });
    assert_eq!(f.from_json_value_strict(doc).unwrap_err().code(), "limit_exceeded");
}

#[test]
fn version_and_parse_errors() {
    let mut f = Form::new();
    let err = f
        .from_json_value_strict(json!({ "version": 9, "points": [], "lines": [] }))
        .unwrap_err();
    assert_eq!(err.code(), "unsupported_version");
    assert_eq!(Form::from_bytes(b"{not json").unwrap_err().code(), "json_parse");
    assert_eq!(
        f.from_json_value_strict(json!({ "points": [] })).unwrap_err().code(),
        "json_parse"
    );
}

#[test]
fn duplicate_ids_are_invalid() {
    let mut f = Form::new();
    let doc = json!({
        "points": [{ "id": 0, "x": 0.0, "y": 0.0 }, { "id": 0, "x": 1.0, "y": 1.0 }],
        "lines": []
    });
    assert_eq!(f.from_json_value_strict(doc).unwrap_err().code(), "invalid_document");
}

#[test]
fn loaded_form_keeps_editing() {
    let f = authored();
    let mut back = Form::from_bytes(&f.to_bytes()).unwrap();
    let next = back
        .add_point(Vec2::new(0.0, 100.0), PointSetting::default(), LineSetting::default())
        .unwrap();
    assert_eq!(next.point, 3);
    assert_eq!(next.line, Some(2));
    back.assert_invariants();
}

#[test]
fn rejected_scale_keeps_the_form_saveable() {
    let mut f = authored();
    let before = f.to_json_value();
    for factor in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, 0.0, 1e9] {
        assert!(!f.scale(factor), "factor {} accepted", factor);
    }
    assert_eq!(f.to_json_value(), before);
    assert!(f.scale(2.0));
    let back = Form::from_bytes(&f.to_bytes()).unwrap();
    assert_eq!(back.to_position_vector(), f.to_position_vector());
}

#[test]
fn edits_past_the_coordinate_limits_are_refused() {
    let mut f = authored();
    let before = f.to_json_value();
    assert!(!f.move_point(0, Vec2::new(5e7, 0.0)));
    assert!(!f.set_point_bounds(0, chalkling::model::Rect::new(-3e7, 0.0, 10.0, 10.0)));
    assert!(!f.set_point_bounds(0, chalkling::model::Rect::new(0.0, 0.0, 1e7, 10.0)));
    assert_eq!(f.displace(&[Element::Point { id: 0 }], Vec2::new(2e7, 0.0)), 0);
    // one element past the limit cancels the whole move
    f.move_point(2, Vec2::new(9_999_990.0, 0.0));
    let moved = f.to_json_value();
    assert_eq!(f.displace(&[Element::Point { id: 0 }, Element::Point { id: 2 }], Vec2::new(20.0, 0.0)), 0);
    assert_eq!(f.to_json_value(), moved);
    assert_ne!(moved, before);

    let err = f.add_point(Vec2::new(0.0, -2e7), PointSetting::default(), LineSetting::default()).unwrap_err();
    assert_eq!(err.code(), "out_of_range");
    let wide = PointSetting::with_variance(-2e6, 2e6, 0.0, 0.0);
    let err = f.add_point(Vec2::new(1.0, 1.0), wide, LineSetting::default()).unwrap_err();
    assert_eq!(err.code(), "out_of_range");

    let setting = f.point_setting_mut(0).unwrap();
    assert!(!setting.set_from_text("x_max", "5e6"));
    assert!(setting.set_from_text("x_max", "12"));
    let ls = f.line_setting_mut(0).unwrap();
    assert!(!ls.set_from_text("width_variance_max", "-1"));
    assert!(!ls.set_from_text("width_variance_max", "1e9"));

    let back = Form::from_bytes(&f.to_bytes()).unwrap();
    assert_eq!(back.to_json_value(), f.to_json_value());
}

#[test]
fn points_at_the_edge_round_trip_with_their_controls() {
    let mut f = Form::new();
    f.add_point(Vec2::new(0.0, 9_999_990.0), PointSetting::default(), LineSetting::default()).unwrap();
    f.add_point(Vec2::new(10.0, 9_999_990.0), PointSetting::with_variance(-5e5, 5e5, -5e5, 5e5), LineSetting::default())
        .unwrap();
    f.regenerate(&mut seeded_rng(5));
    let back = Form::from_bytes(&f.to_bytes()).unwrap();
    back.assert_invariants();
    assert_eq!(back.to_json_value(), f.to_json_value());
}
