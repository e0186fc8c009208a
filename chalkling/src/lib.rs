pub mod config;
pub mod editor;
pub mod error;
pub mod events;
pub mod model;
pub mod random;
pub mod render;
pub mod geometry {
    pub mod bezier;
    pub mod clip;
    pub mod limits;
    pub mod math;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod drag;
    pub mod export;
    pub mod picking;
    pub mod similarity;
}
mod json;
mod svg;

pub use error::{ExportError, FormError, LoadError, ScoreError};
use geometry::limits;
use model::{BodyPart, Element, Line, LineSetting, Point, PointSetting, Rect, Stats, Vec2};
use rand::Rng;
use std::collections::{HashMap, HashSet};

fn setting_in_bounds(s: &PointSetting) -> bool {
    [s.x_min, s.x_max, s.y_min, s.y_max, s.angle_min, s.angle_max]
        .iter()
        .all(|v| limits::in_variance_bounds(*v))
}

fn line_setting_in_bounds(s: &LineSetting) -> bool {
    limits::in_width_bounds(s.width_variance_min) && limits::in_width_bounds(s.width_variance_max)
}

/// Default vertical offset of a new line's bezier control points.
pub const CONTROL_OFFSET: f32 = 50.0;

/// Result of [`Form::add_point`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Added {
    pub point: u32,
    /// Line chained from the previous point, if there was one.
    pub line: Option<u32>,
}

/// An editable shape: points, lines joining them, stats and selection.
///
/// Points and lines live in slot arenas; an id is the slot index and is never
/// reused, so iteration order is insertion order and survives `clone()`.
#[derive(Clone, Debug)]
pub struct Form {
    pub(crate) points: Vec<Option<Point>>,        // id is index
    pub(crate) lines: Vec<Option<Line>>,          // id is index
    pub(crate) adjacency: HashMap<u32, Vec<u32>>, // point id -> incident line ids, ascending
    pub(crate) previous: Option<u32>,
    pub(crate) selection: Vec<Element>,
    pub(crate) stats: Stats,
    pub(crate) control_offset: f32,
    pub(crate) geom_ver: u64,
}

impl Default for Form {
    fn default() -> Self {
        Form::new()
    }
}

impl Form {
    pub fn new() -> Self {
        Form::with_control_offset(CONTROL_OFFSET)
    }

    pub fn with_control_offset(control_offset: f32) -> Self {
        Form {
            points: Vec::new(),
            lines: Vec::new(),
            adjacency: HashMap::new(),
            previous: None,
            selection: Vec::new(),
            stats: Stats::default(),
            control_offset,
            geom_ver: 1,
        }
    }

    /// Monotonic version; increments on every geometry or topology edit.
    pub fn geom_version(&self) -> u64 {
        self.geom_ver
    }

    fn bump(&mut self) {
        self.geom_ver = self.geom_ver.wrapping_add(1);
    }

    /// Deep copy for preview or export: same ids and order, no selection.
    pub fn variant(&self) -> Form {
        let mut copy = self.clone();
        copy.unselect_all();
        copy
    }

    // Points
    pub fn add_point(
        &mut self,
        pos: Vec2,
        setting: PointSetting,
        line_setting: LineSetting,
    ) -> Result<Added, FormError> {
        if !pos.is_finite() {
            return Err(FormError::NonFinite("pos"));
        }
        if !limits::point_in_bounds(pos.x, pos.y) {
            return Err(FormError::OutOfRange("pos"));
        }
        if !setting_in_bounds(&setting) {
            return Err(FormError::OutOfRange("setting"));
        }
        if self.previous.is_some() && !line_setting_in_bounds(&line_setting) {
            return Err(FormError::OutOfRange("line_setting"));
        }
        let id = self.points.len() as u32;
        self.points.push(Some(Point::new(pos, setting)));
        let line = match self.previous {
            Some(prev) => Some(self.add_line(prev, id, line_setting)?),
            None => None,
        };
        self.mark_previous(Some(id));
        self.bump();
        log::debug!("add point {} at ({}, {}), chained line {:?}", id, pos.x, pos.y, line);
        Ok(Added { point: id, line })
    }

    pub fn point(&self, id: u32) -> Option<&Point> {
        self.points.get(id as usize).and_then(|p| p.as_ref())
    }

    pub(crate) fn point_mut(&mut self, id: u32) -> Option<&mut Point> {
        self.points.get_mut(id as usize).and_then(|p| p.as_mut())
    }

    pub fn point_pos(&self, id: u32) -> Option<Vec2> {
        self.point(id).map(|p| p.pos)
    }

    /// Live points in insertion order.
    pub fn points(&self) -> impl Iterator<Item = (u32, &Point)> + '_ {
        self.points
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.as_ref().map(|p| (i as u32, p)))
    }

    pub fn point_count(&self) -> u32 {
        self.points.iter().filter(|p| p.is_some()).count() as u32
    }

    /// Fails on unknown ids and on positions outside the coordinate limits.
    pub fn move_point(&mut self, id: u32, pos: Vec2) -> bool {
        if !limits::point_in_bounds(pos.x, pos.y) {
            return false;
        }
        match self.point_mut(id) {
            Some(p) => p.set_pos(pos),
            None => return false,
        }
        self.bump();
        true
    }

    /// Applies a user-drawn rectangle as the point's variance bounds and
    /// recenters the point on the rectangle.
    pub fn set_point_bounds(&mut self, id: u32, rect: Rect) -> bool {
        let c = rect.center();
        if !limits::point_in_bounds(c.x, c.y)
            || !limits::in_variance_bounds(rect.w / 2.0)
            || !limits::in_variance_bounds(rect.h / 2.0)
        {
            return false;
        }
        match self.point_mut(id) {
            Some(p) => {
                p.setting.set_bounds(rect);
                p.set_pos(rect.center());
            }
            None => return false,
        }
        self.bump();
        true
    }

    pub fn point_setting_mut(&mut self, id: u32) -> Option<&mut PointSetting> {
        self.point_mut(id).map(|p| &mut p.setting)
    }

    pub fn remove_point(&mut self, id: u32) -> bool {
        if self.point(id).is_none() {
            return false;
        }
        let incident = self.adjacency.get(&id).cloned().unwrap_or_default();
        for lid in incident {
            self.remove_line(lid);
        }
        self.adjacency.remove(&id);
        self.points[id as usize] = None;
        if self.previous == Some(id) {
            self.previous = None;
        }
        self.selection.retain(|e| *e != Element::Point { id });
        self.bump();
        log::debug!("remove point {}", id);
        true
    }

    // Previous point
    pub fn previous_point(&self) -> Option<u32> {
        self.previous
    }

    /// Sets the chaining anchor. Passing the current anchor again releases it.
    pub fn set_previous_point(&mut self, point: Option<u32>) -> Option<u32> {
        let next = match point {
            Some(p) if self.previous == Some(p) => None,
            Some(p) if self.point(p).is_some() => Some(p),
            Some(_) => self.previous,
            None => None,
        };
        self.mark_previous(next);
        self.previous
    }

    fn mark_previous(&mut self, next: Option<u32>) {
        if let Some(old) = self.previous {
            if let Some(p) = self.point_mut(old) {
                p.marks.previous = false;
            }
        }
        self.previous = next;
        if let Some(new) = next {
            if let Some(p) = self.point_mut(new) {
                p.marks.previous = true;
            }
        }
    }

    // Lines
    pub fn add_line(&mut self, a: u32, b: u32, setting: LineSetting) -> Result<u32, FormError> {
        if a == b {
            return Err(FormError::SelfLoop(a));
        }
        if !line_setting_in_bounds(&setting) {
            return Err(FormError::OutOfRange("line_setting"));
        }
        let pa = self.point_pos(a).ok_or(FormError::MissingPoint(a))?;
        let pb = self.point_pos(b).ok_or(FormError::MissingPoint(b))?;
        let id = self.lines.len() as u32;
        self.lines
            .push(Some(Line::new(a, b, pa, pb, setting, self.control_offset)));
        self.adjacency.entry(a).or_default().push(id);
        self.adjacency.entry(b).or_default().push(id);
        self.bump();
        Ok(id)
    }

    /// Joins `point` to the previous point.
    pub fn join_previous(&mut self, point: u32, setting: LineSetting) -> Result<u32, FormError> {
        let prev = self.previous.ok_or(FormError::NoPreviousPoint)?;
        let id = self.add_line(point, prev, setting)?;
        log::debug!("join point {} to previous {} as line {}", point, prev, id);
        Ok(id)
    }

    pub fn line(&self, id: u32) -> Option<&Line> {
        self.lines.get(id as usize).and_then(|l| l.as_ref())
    }

    pub(crate) fn line_mut(&mut self, id: u32) -> Option<&mut Line> {
        self.lines.get_mut(id as usize).and_then(|l| l.as_mut())
    }

    pub fn line_setting_mut(&mut self, id: u32) -> Option<&mut LineSetting> {
        self.line_mut(id).map(|l| &mut l.setting)
    }

    /// Live lines in insertion order.
    pub fn lines(&self) -> impl Iterator<Item = (u32, &Line)> + '_ {
        self.lines
            .iter()
            .enumerate()
            .filter_map(|(i, l)| l.as_ref().map(|l| (i as u32, l)))
    }

    pub fn line_count(&self) -> u32 {
        self.lines.iter().filter(|l| l.is_some()).count() as u32
    }

    /// Lines incident to a point, in creation order.
    pub fn lines_at(&self, point: u32) -> &[u32] {
        self.adjacency.get(&point).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn line_endpoints(&self, id: u32) -> Option<(Vec2, Vec2)> {
        let l = self.line(id)?;
        Some((self.point_pos(l.a)?, self.point_pos(l.b)?))
    }

    /// Removes a line with its control points; endpoints stay.
    pub fn remove_line(&mut self, id: u32) -> bool {
        let line = match self.lines.get_mut(id as usize).and_then(|l| l.take()) {
            Some(l) => l,
            None => return false,
        };
        for end in [line.a, line.b] {
            if let Some(list) = self.adjacency.get_mut(&end) {
                list.retain(|l| *l != id);
                if list.is_empty() {
                    self.adjacency.remove(&end);
                }
            }
        }
        self.selection.retain(|e| match e {
            Element::Line { id: l } | Element::Control { line: l, .. } => *l != id,
            Element::Point { .. } => true,
        });
        self.bump();
        true
    }

    /// Removes elements, cascading from points to their lines. Control points
    /// are skipped; they go away only with their line.
    pub fn remove(&mut self, elements: &[Element]) -> usize {
        let mut removed = 0;
        for e in elements {
            let ok = match *e {
                Element::Line { id } => self.remove_line(id),
                Element::Point { id } => self.remove_point(id),
                Element::Control { .. } => false,
            };
            if ok {
                removed += 1;
            }
        }
        removed
    }

    pub fn remove_selection(&mut self) -> usize {
        let sel = self.selection.clone();
        self.remove(&sel)
    }

    // Selection
    pub fn selection(&self) -> &[Element] {
        &self.selection
    }

    pub fn contains(&self, e: Element) -> bool {
        match e {
            Element::Point { id } => self.point(id).is_some(),
            Element::Line { id } => self.line(id).is_some(),
            Element::Control { line, end } => end < 2 && self.line(line).is_some(),
        }
    }

    fn set_selected_mark(&mut self, e: Element, on: bool) {
        match e {
            Element::Point { id } => {
                if let Some(p) = self.point_mut(id) {
                    p.marks.selected = on;
                }
            }
            Element::Line { id } => {
                if let Some(l) = self.line_mut(id) {
                    l.marks.selected = on;
                }
            }
            Element::Control { line, end } => {
                if let Some(c) = self.line_mut(line).and_then(|l| l.controls.get_mut(end as usize)) {
                    c.marks.selected = on;
                }
            }
        }
    }

    /// Adds elements to the selection. Unknown or already selected ones are skipped.
    pub fn select(&mut self, elements: &[Element]) {
        for &e in elements {
            if !self.contains(e) || self.selection.contains(&e) {
                continue;
            }
            self.set_selected_mark(e, true);
            self.selection.push(e);
        }
    }

    pub fn unselect_all(&mut self) {
        let sel = std::mem::take(&mut self.selection);
        for e in sel {
            self.set_selected_mark(e, false);
        }
    }

    /// Replaces the selection with what a single coordinate hits.
    pub fn select_at(&mut self, pos: Vec2) -> Vec<Element> {
        let hits = self.get_selected_at(pos);
        self.unselect_all();
        self.select(&hits);
        log::debug!("select at ({}, {}): {} element(s)", pos.x, pos.y, hits.len());
        hits
    }

    /// Replaces the selection with everything a rectangle hits.
    pub fn select_in(&mut self, rect: Rect) -> Vec<Element> {
        let hits = self.get_selected_in(rect);
        self.unselect_all();
        self.select(&hits);
        log::debug!("select in rect: {} element(s)", hits.len());
        hits
    }

    /// Nearest control point, point and line under a coordinate, in that order.
    pub fn get_selected_at(&self, pos: Vec2) -> Vec<Element> {
        algorithms::picking::selected_at(self, pos)
    }

    /// Every element whose hit area meets the rectangle.
    pub fn get_selected_in(&self, rect: Rect) -> Vec<Element> {
        algorithms::picking::selected_in(self, rect)
    }

    pub fn selected_points(&self) -> Vec<u32> {
        self.selection
            .iter()
            .filter_map(|e| match e {
                Element::Point { id } => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn selected_lines(&self) -> Vec<u32> {
        self.selection
            .iter()
            .filter_map(|e| match e {
                Element::Line { id } => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Flips the curve flag of every selected line.
    pub fn toggle_curve_selected(&mut self) -> usize {
        let ids = self.selected_lines();
        for &id in &ids {
            if let Some(l) = self.line_mut(id) {
                l.setting.curve = !l.setting.curve;
            }
        }
        ids.len()
    }

    pub fn toggle_body_part_selected(&mut self, part: BodyPart) -> usize {
        let ids = self.selected_lines();
        for &id in &ids {
            if let Some(l) = self.line_mut(id) {
                l.setting.toggle_body_part(part);
            }
        }
        ids.len()
    }

    // Movement
    /// Moves every geometric point reachable from `elements` by `delta`,
    /// each at most once. Lines move their endpoints and control points.
    pub fn displace(&mut self, elements: &[Element], delta: Vec2) -> usize {
        if !delta.is_finite() {
            return 0;
        }
        // (line, end) for controls; (id, u8::MAX) for form points
        let mut moved: HashSet<(u32, u8)> = HashSet::new();
        let mut order: Vec<(u32, u8)> = Vec::new();
        let mut push = |key: (u32, u8)| {
            if moved.insert(key) {
                order.push(key);
            }
        };
        for e in elements {
            match *e {
                Element::Point { id } => push((id, u8::MAX)),
                Element::Control { line, end } => push((line, end)),
                Element::Line { id } => {
                    if let Some(l) = self.line(id) {
                        push((l.a, u8::MAX));
                        push((l.b, u8::MAX));
                        push((id, 0));
                        push((id, 1));
                    }
                }
            }
        }
        let target = |f: &Form, (id, end): (u32, u8)| -> Option<Vec2> {
            let p = if end == u8::MAX {
                f.point(id)
            } else {
                f.line(id).and_then(|l| l.controls.get(end as usize))
            }?;
            Some(p.pos + delta)
        };
        // all or nothing: one element leaving the limits cancels the move
        if order.iter().filter_map(|k| target(self, *k)).any(|p| !limits::point_in_bounds(p.x, p.y)) {
            return 0;
        }
        let mut count = 0;
        for (id, end) in order {
            let p = if end == u8::MAX {
                self.point_mut(id)
            } else {
                self.line_mut(id).and_then(|l| l.controls.get_mut(end as usize))
            };
            if let Some(p) = p {
                let pos = p.pos + delta;
                p.set_pos(pos);
                count += 1;
            }
        }
        if count > 0 {
            self.bump();
        }
        count
    }

    // Variation
    /// Draws new positions for every point and control point and a new width
    /// for every line. Anchors are kept, so repeated calls stay within bounds.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for p in self.points.iter_mut().flatten() {
            p.regenerate(rng);
        }
        for l in self.lines.iter_mut().flatten() {
            l.regenerate_width(rng);
            for c in l.controls.iter_mut() {
                c.regenerate(rng);
            }
        }
        self.bump();
    }

    /// Multiplies every position and anchor by `factor`. A non-finite or
    /// zero factor, or one that would push a position past the coordinate
    /// limits, leaves the form untouched and returns `false`.
    pub fn scale(&mut self, factor: f32) -> bool {
        if !factor.is_finite() || factor == 0.0 {
            return false;
        }
        let fits = |p: &Point| {
            let (a, b) = (p.pos * factor, p.setting.base * factor);
            limits::point_in_bounds(a.x, a.y) && limits::point_in_bounds(b.x, b.y)
        };
        let controls = self.lines.iter().flatten().flat_map(|l| l.controls.iter());
        if !self.points.iter().flatten().chain(controls).all(fits) {
            return false;
        }
        for p in self.points.iter_mut().flatten() {
            p.scale(factor);
        }
        for l in self.lines.iter_mut().flatten() {
            for c in l.controls.iter_mut() {
                c.scale(factor);
            }
        }
        self.bump();
        true
    }

    /// Flattened `[x0, y0, x1, y1, …]` of all points in id order.
    pub fn to_position_vector(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.points.len() * 2);
        for (_, p) in self.points() {
            out.push(p.pos.x);
            out.push(p.pos.y);
        }
        out
    }

    // Stats
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut Stats {
        &mut self.stats
    }

    // Persistence
    pub fn to_json_value(&self) -> serde_json::Value {
        json::to_json_impl(self)
    }

    /// Lenient load: dangling lines are dropped. State is replaced only on success.
    pub fn from_json_value(&mut self, v: serde_json::Value) -> bool {
        match json::from_json_impl(v, false) {
            Ok(form) => {
                *self = form;
                true
            }
            Err(e) => {
                log::warn!("form load rejected: {}", e);
                false
            }
        }
    }

    /// Strict load: any invalid reference rejects the whole document.
    pub fn from_json_value_strict(&mut self, v: serde_json::Value) -> Result<(), LoadError> {
        *self = json::from_json_impl(v, true)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        json::to_bytes_impl(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Form, LoadError> {
        json::from_bytes_impl(bytes)
    }

    pub fn to_svg_paths(&self, steps: usize) -> Vec<String> {
        svg::to_svg_paths_impl(self, steps)
    }

    /// Panics when the arenas, the adjacency index or the marks disagree.
    pub fn assert_invariants(&self) {
        for (id, l) in self.lines() {
            assert_ne!(l.a, l.b, "line {} joins point {} to itself", id, l.a);
            for end in [l.a, l.b] {
                assert!(self.point(end).is_some(), "line {} references missing point {}", id, end);
                assert!(
                    self.lines_at(end).contains(&id),
                    "line {} missing from adjacency of point {}",
                    id,
                    end
                );
            }
        }
        for (pid, list) in &self.adjacency {
            assert!(self.point(*pid).is_some(), "adjacency keyed by missing point {}", pid);
            assert!(!list.is_empty(), "empty adjacency entry for point {}", pid);
            assert!(list.windows(2).all(|w| w[0] < w[1]), "adjacency of point {} not ascending", pid);
            for lid in list {
                let touches = self.line(*lid).map_or(false, |l| l.touches(*pid));
                assert!(touches, "adjacency of point {} lists foreign line {}", pid, lid);
            }
        }
        if let Some(prev) = self.previous {
            assert!(self.point(prev).is_some(), "previous point {} is missing", prev);
        }
        for e in &self.selection {
            assert!(self.contains(*e), "selection holds missing element {:?}", e);
        }
        for (id, p) in self.points() {
            assert_eq!(
                p.marks.selected,
                self.selection.contains(&Element::Point { id }),
                "selected mark of point {} out of sync",
                id
            );
            assert_eq!(p.marks.previous, self.previous == Some(id), "previous mark of point {}", id);
        }
    }
}
