use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::{Add, Mul, Sub};

use crate::geometry::limits;
use crate::random::uniform;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x + o.x, self.y + o.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x - o.x, self.y - o.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f32) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }
}

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    /// Normalized rectangle spanned by two corners in any order.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let x0 = a.x.min(b.x);
        let y0 = a.y.min(b.y);
        Rect::new(x0, y0, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    /// Square of side `2 * half` centered on `c`.
    pub fn around(c: Vec2, half: f32) -> Self {
        Rect::new(c.x - half, c.y - half, half * 2.0, half * 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }
    pub fn is_empty(&self) -> bool {
        !(self.w > 0.0 && self.h > 0.0)
    }
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }
    /// Overlap test with a non-empty intersection area; touching edges do not count.
    pub fn intersects(&self, o: &Rect) -> bool {
        if self.is_empty() || o.is_empty() {
            return false;
        }
        self.x < o.right() && o.x < self.right() && self.y < o.bottom() && o.y < self.bottom()
    }
}

/// Selection state of an entity. Both flags are independent; setting one twice is a no-op.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Marks {
    pub selected: bool,
    pub previous: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyPart {
    Leg,
    Arm,
    Hand,
    Body,
    Tail,
    Wing,
    Head,
}

impl BodyPart {
    pub const ALL: [BodyPart; 7] = [
        BodyPart::Leg,
        BodyPart::Arm,
        BodyPart::Hand,
        BodyPart::Body,
        BodyPart::Tail,
        BodyPart::Wing,
        BodyPart::Head,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyFeature {
    Armored,
    Weaponized,
    Spikey,
    Healthy,
}

/// Anchor plus variance bounds used to draw a randomized position.
///
/// `min <= max` on each axis is the caller's responsibility; a reversed pair
/// still draws from the span between the two values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointSetting {
    pub base: Vec2,
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
    #[serde(default)]
    pub angle_min: f32,
    #[serde(default)]
    pub angle_max: f32,
    #[serde(default)]
    pub curve: bool,
}

impl Default for PointSetting {
    fn default() -> Self {
        PointSetting::with_variance(0.0, 0.0, 0.0, 0.0)
    }
}

impl PointSetting {
    pub fn with_variance(x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Self {
        PointSetting {
            base: Vec2::ZERO,
            x_min,
            x_max,
            y_min,
            y_max,
            angle_min: 0.0,
            angle_max: 0.0,
            curve: false,
        }
    }

    pub fn set_base(&mut self, pos: Vec2) {
        self.base = pos;
    }

    /// One independent uniform draw per axis around the anchor.
    pub fn new_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            self.base.x + uniform(rng, self.x_min, self.x_max),
            self.base.y + uniform(rng, self.y_min, self.y_max),
        )
    }

    /// Symmetric bounds from a rectangle's size; its position is ignored.
    pub fn set_bounds(&mut self, rect: Rect) {
        self.x_min = -rect.w / 2.0;
        self.x_max = rect.w / 2.0;
        self.y_min = -rect.h / 2.0;
        self.y_max = rect.h / 2.0;
    }

    /// Applies a numeric text edit. Invalid or out-of-range text keeps the
    /// previous value.
    pub fn set_from_text(&mut self, field: &str, text: &str) -> bool {
        let Some(v) = parse_finite(text).filter(|v| limits::in_variance_bounds(*v)) else {
            return false;
        };
        let slot = match field {
            "x_min" => &mut self.x_min,
            "x_max" => &mut self.x_max,
            "y_min" => &mut self.y_min,
            "y_max" => &mut self.y_max,
            "angle_min" => &mut self.angle_min,
            "angle_max" => &mut self.angle_max,
            _ => return false,
        };
        *slot = v;
        true
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineSetting {
    pub width_variance_min: f32,
    pub width_variance_max: f32,
    #[serde(default)]
    pub body_parts: BTreeSet<BodyPart>,
    #[serde(default)]
    pub body_features: BTreeSet<BodyFeature>,
    #[serde(default)]
    pub curve: bool,
}

impl Default for LineSetting {
    fn default() -> Self {
        LineSetting {
            width_variance_min: 1.0,
            width_variance_max: 5.0,
            body_parts: BTreeSet::new(),
            body_features: BTreeSet::new(),
            curve: false,
        }
    }
}

impl LineSetting {
    pub fn toggle_body_part(&mut self, part: BodyPart) {
        if !self.body_parts.remove(&part) {
            self.body_parts.insert(part);
        }
    }

    pub fn toggle_body_feature(&mut self, feature: BodyFeature) {
        if !self.body_features.remove(&feature) {
            self.body_features.insert(feature);
        }
    }

    pub fn set_from_text(&mut self, field: &str, text: &str) -> bool {
        let Some(v) = parse_finite(text).filter(|v| limits::in_width_bounds(*v)) else {
            return false;
        };
        match field {
            "width_variance_min" => self.width_variance_min = v,
            "width_variance_max" => self.width_variance_max = v,
            _ => return false,
        }
        true
    }
}

/// Gameplay traits attached to a form. Nominally in `[0, 1]`, not clamped.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub attack: f32,
    pub defense: f32,
    pub speed: f32,
    pub life: f32,
    pub aesthetic: f32,
}

impl Default for Stats {
    fn default() -> Self {
        Stats {
            attack: 0.5,
            defense: 0.5,
            speed: 0.5,
            life: 0.5,
            aesthetic: 0.5,
        }
    }
}

impl Stats {
    pub const FIELDS: [&'static str; 5] = ["attack", "defense", "speed", "life", "aesthetic"];

    pub fn scale(&mut self, factor: f32) {
        self.attack *= factor;
        self.defense *= factor;
        self.speed *= factor;
        self.life *= factor;
        self.aesthetic *= factor;
    }

    pub fn get(&self, field: &str) -> Option<f32> {
        match field {
            "attack" => Some(self.attack),
            "defense" => Some(self.defense),
            "speed" => Some(self.speed),
            "life" => Some(self.life),
            "aesthetic" => Some(self.aesthetic),
            _ => None,
        }
    }

    pub fn set_from_text(&mut self, field: &str, text: &str) -> bool {
        let Some(v) = parse_finite(text) else {
            return false;
        };
        match field {
            "attack" => self.attack = v,
            "defense" => self.defense = v,
            "speed" => self.speed = v,
            "life" => self.life = v,
            "aesthetic" => self.aesthetic = v,
            _ => return false,
        }
        true
    }

    /// Image metadata pairs, one per trait.
    pub fn metadata(&self) -> Vec<(String, String)> {
        Self::FIELDS
            .iter()
            .filter_map(|f| self.get(f).map(|v| (format!("Xmp.dc.{}", f), v.to_string())))
            .collect()
    }
}

fn parse_finite(text: &str) -> Option<f32> {
    text.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub pos: Vec2,
    pub setting: PointSetting,
    pub marks: Marks,
}

impl Point {
    pub fn new(pos: Vec2, mut setting: PointSetting) -> Self {
        setting.set_base(pos);
        Point {
            pos,
            setting,
            marks: Marks::default(),
        }
    }

    /// Moves the point and re-anchors future regeneration on it.
    pub fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
        self.setting.set_base(pos);
    }

    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let p = self.setting.new_position(rng);
        self.pos = Vec2::new(limits::clamp_coord(p.x), limits::clamp_coord(p.y));
    }

    pub fn scale(&mut self, factor: f32) {
        self.pos = self.pos * factor;
        self.setting.base = self.setting.base * factor;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub a: u32,
    pub b: u32,
    pub width: f32,
    pub setting: LineSetting,
    /// Bezier control points next to `a` and `b`.
    pub controls: [Point; 2],
    pub marks: Marks,
}

impl Line {
    pub fn new(a: u32, b: u32, pa: Vec2, pb: Vec2, setting: LineSetting, control_offset: f32) -> Self {
        // controls stay inside the coordinate limits even for points at the edge
        let below = |p: Vec2| Vec2::new(p.x, limits::clamp_coord(p.y + control_offset));
        Line {
            a,
            b,
            width: DEFAULT_LINE_WIDTH,
            setting,
            controls: [
                Point::new(below(pa), PointSetting::default()),
                Point::new(below(pb), PointSetting::default()),
            ],
            marks: Marks::default(),
        }
    }

    pub fn touches(&self, point: u32) -> bool {
        self.a == point || self.b == point
    }

    /// The endpoint opposite to `point`.
    pub fn other(&self, point: u32) -> Option<u32> {
        if self.a == point {
            Some(self.b)
        } else if self.b == point {
            Some(self.a)
        } else {
            None
        }
    }

    /// Control point index belonging to the given endpoint.
    pub fn control_index(&self, point: u32) -> Option<usize> {
        if self.a == point {
            Some(0)
        } else if self.b == point {
            Some(1)
        } else {
            None
        }
    }

    pub fn regenerate_width<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.width = uniform(
            rng,
            self.setting.width_variance_min,
            self.setting.width_variance_max,
        );
    }
}

pub const DEFAULT_LINE_WIDTH: f32 = 2.0;

/// Handle to a selectable entity of a form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Element {
    Point { id: u32 },
    Line { id: u32 },
    Control { line: u32, end: u8 },
}
