use crate::error::LoadError;
use crate::geometry::limits;
use crate::model::{Line, LineSetting, Marks, Point, PointSetting, Stats, Vec2};
use crate::Form;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

const VERSION: u32 = 1;

pub fn to_json_impl(f: &Form) -> Value {
    #[derive(Serialize)]
    struct PointSer<'a> {
        id: u32,
        x: f32,
        y: f32,
        setting: &'a PointSetting,
    }
    #[derive(Serialize)]
    struct LineSer<'a> {
        id: u32,
        a: u32,
        b: u32,
        width: f32,
        setting: &'a LineSetting,
        controls: [Vec2; 2],
    }
    #[derive(Serialize)]
    struct Doc<'a> {
        version: u32,
        control_offset: f32,
        points: Vec<PointSer<'a>>,
        lines: Vec<LineSer<'a>>,
        previous: Option<u32>,
        stats: Stats,
    }
    let points = f
        .points()
        .map(|(id, p)| PointSer { id, x: p.pos.x, y: p.pos.y, setting: &p.setting })
        .collect();
    let lines = f
        .lines()
        .map(|(id, l)| LineSer {
            id,
            a: l.a,
            b: l.b,
            width: l.width,
            setting: &l.setting,
            controls: [l.controls[0].pos, l.controls[1].pos],
        })
        .collect();
    let doc = Doc {
        version: VERSION,
        control_offset: f.control_offset,
        points,
        lines,
        previous: f.previous,
        stats: f.stats,
    };
    serde_json::to_value(doc).unwrap_or(Value::Null)
}

#[derive(Deserialize)]
struct PointDe {
    id: u32,
    x: f32,
    y: f32,
    #[serde(default)]
    setting: Option<PointSetting>,
}

#[derive(Deserialize)]
struct LineDe {
    id: u32,
    a: u32,
    b: u32,
    width: Option<f32>,
    #[serde(default)]
    setting: Option<LineSetting>,
    controls: Option<[Vec2; 2]>,
}

#[derive(Deserialize)]
struct DocDe {
    version: Option<u32>,
    control_offset: Option<f32>,
    points: Vec<PointDe>,
    lines: Vec<LineDe>,
    previous: Option<u32>,
    stats: Option<Stats>,
}

fn coord_ok(p: Vec2) -> bool {
    limits::in_coord_bounds(p.x) && limits::in_coord_bounds(p.y)
}

fn point_setting_ok(s: &PointSetting) -> bool {
    coord_ok(s.base)
        && [s.x_min, s.x_max, s.y_min, s.y_max, s.angle_min, s.angle_max]
            .iter()
            .all(|v| limits::in_variance_bounds(*v))
}

fn line_setting_ok(s: &LineSetting) -> bool {
    limits::in_width_bounds(s.width_variance_min) && limits::in_width_bounds(s.width_variance_max)
}

fn invalid(msg: impl Into<String>) -> LoadError {
    LoadError::Invalid(msg.into())
}

/// Builds a fresh form from a document. In lenient mode lines with missing
/// endpoints and a dangling previous pointer are dropped; strict mode rejects them.
pub fn from_json_impl(v: Value, strict: bool) -> Result<Form, LoadError> {
    let doc: DocDe = serde_json::from_value(v)?;
    match doc.version {
        None | Some(VERSION) => {}
        Some(other) => return Err(LoadError::UnsupportedVersion(other)),
    }
    // Caps
    if doc.points.len() > limits::MAX_POINTS {
        return Err(LoadError::Limit("points"));
    }
    if doc.lines.len() > limits::MAX_LINES {
        return Err(LoadError::Limit("lines"));
    }
    if doc.points.iter().any(|p| p.id > limits::MAX_ID) || doc.lines.iter().any(|l| l.id > limits::MAX_ID) {
        return Err(LoadError::Limit("id"));
    }
    let control_offset = doc.control_offset.unwrap_or(crate::CONTROL_OFFSET);
    if !limits::in_coord_bounds(control_offset) {
        return Err(invalid("control_offset out of bounds"));
    }

    let mut form = Form::with_control_offset(control_offset);
    let max_point = doc.points.iter().map(|p| p.id as usize + 1).max().unwrap_or(0);
    let max_line = doc.lines.iter().map(|l| l.id as usize + 1).max().unwrap_or(0);
    form.points = vec![None; max_point];
    form.lines = vec![None; max_line];

    for p in doc.points {
        let pos = Vec2::new(p.x, p.y);
        if !coord_ok(pos) {
            return Err(invalid(format!("point {} coordinate out of bounds", p.id)));
        }
        let slot = &mut form.points[p.id as usize];
        if slot.is_some() {
            return Err(invalid(format!("duplicate point id {}", p.id)));
        }
        let (setting, stored_base) = match p.setting {
            Some(s) if point_setting_ok(&s) => (s, true),
            Some(_) => return Err(invalid(format!("point {} setting out of bounds", p.id))),
            None => (PointSetting::default(), false),
        };
        // A stored anchor wins over the position, which may be a regenerated draw.
        let base = setting.base;
        let mut point = Point::new(pos, setting);
        if stored_base {
            point.setting.base = base;
        }
        *slot = Some(point);
    }

    for l in doc.lines {
        if l.a == l.b {
            return Err(invalid(format!("line {} joins point {} to itself", l.id, l.a)));
        }
        let ends = (form.point_pos(l.a), form.point_pos(l.b));
        let (pa, pb) = match ends {
            (Some(pa), Some(pb)) => (pa, pb),
            _ if strict => return Err(invalid(format!("line {} references a missing point", l.id))),
            _ => {
                log::warn!("dropping line {} with a missing endpoint", l.id);
                continue;
            }
        };
        let setting = l.setting.unwrap_or_default();
        if !line_setting_ok(&setting) {
            return Err(invalid(format!("line {} setting out of bounds", l.id)));
        }
        let mut line = Line::new(l.a, l.b, pa, pb, setting, control_offset);
        if let Some(w) = l.width {
            if !limits::in_width_bounds(w) {
                return Err(invalid(format!("line {} width out of bounds", l.id)));
            }
            line.width = w;
        }
        if let Some(cs) = l.controls {
            if !cs.iter().all(|c| coord_ok(*c)) {
                return Err(invalid(format!("line {} control out of bounds", l.id)));
            }
            for (c, pos) in line.controls.iter_mut().zip(cs) {
                c.set_pos(pos);
            }
        }
        let slot = &mut form.lines[l.id as usize];
        if slot.is_some() {
            return Err(invalid(format!("duplicate line id {}", l.id)));
        }
        *slot = Some(line);
    }

    form.adjacency = rebuild_adjacency(&form);
    match doc.previous {
        Some(p) if form.point(p).is_some() => {
            form.previous = Some(p);
            if let Some(pt) = form.point_mut(p) {
                pt.marks = Marks { selected: false, previous: true };
            }
        }
        Some(p) if strict => return Err(invalid(format!("previous point {} is missing", p))),
        _ => {}
    }
    if let Some(stats) = doc.stats {
        if !Stats::FIELDS.iter().all(|f| stats.get(f).map_or(false, f32::is_finite)) {
            return Err(invalid("stats must be finite"));
        }
        form.stats = stats;
    }
    log::info!("loaded form with {} point(s), {} line(s)", form.point_count(), form.line_count());
    Ok(form)
}

fn rebuild_adjacency(form: &Form) -> HashMap<u32, Vec<u32>> {
    let mut adj: HashMap<u32, Vec<u32>> = HashMap::new();
    for (id, l) in form.lines() {
        adj.entry(l.a).or_default().push(id);
        adj.entry(l.b).or_default().push(id);
    }
    adj
}

pub fn to_bytes_impl(f: &Form) -> Vec<u8> {
    serde_json::to_vec(&to_json_impl(f)).unwrap_or_default()
}

pub fn from_bytes_impl(bytes: &[u8]) -> Result<Form, LoadError> {
    let v: Value = serde_json::from_slice(bytes)?;
    from_json_impl(v, true)
}
