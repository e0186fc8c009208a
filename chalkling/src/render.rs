//! Drawing a form onto a raster surface.
//!
//! `draw` is the authoring view with selection colors and point handles;
//! `render` is the plain white stroke image used for previews and export.
//! Neither changes the form.

use crate::geometry::bezier::{CubicBezier, DEFAULT_STEPS};
use crate::geometry::limits::MAX_CANVAS_SIDE;
use crate::geometry::tolerance::POINT_SIZE;
use crate::model::{Color, Line, Vec2};
use crate::Form;
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

pub trait Surface {
    fn fill(&mut self, color: Color);
    fn line(&mut self, a: Vec2, b: Vec2, width: f32, color: Color);
    fn circle(&mut self, center: Vec2, radius: f32, color: Color);

    fn polyline(&mut self, pts: &[Vec2], width: f32, color: Color) {
        for w in pts.windows(2) {
            self.line(w[0], w[1], width, color);
        }
    }
}

/// RGBA8 raster, top-left origin.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    img: RgbaImage,
}

fn rgba(c: Color) -> Rgba<u8> {
    Rgba([c.r, c.g, c.b, c.a])
}

impl Canvas {
    /// Transparent canvas; each side is clamped to `1..=MAX_CANVAS_SIDE`.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.clamp(1, MAX_CANVAS_SIDE);
        let height = height.clamp(1, MAX_CANVAS_SIDE);
        Canvas { img: RgbaImage::new(width, height) }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }
    pub fn height(&self) -> u32 {
        self.img.height()
    }
    pub fn data(&self) -> &[u8] {
        self.img.as_raw()
    }
    pub fn image(&self) -> &RgbaImage {
        &self.img
    }
    pub fn into_raw(self) -> Vec<u8> {
        self.img.into_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.img.get_pixel_checked(x, y).map(|&Rgba([r, g, b, a])| Color { r, g, b, a })
    }

    /// PNG file bytes of the current raster.
    pub fn encode_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut out = Cursor::new(Vec::new());
        self.img.write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }

    fn put(&mut self, x: i64, y: i64, c: Color) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        self.img.put_pixel(x as u32, y as u32, rgba(c));
    }

    fn disc(&mut self, c: Vec2, r: f32, color: Color) {
        if !c.is_finite() || !r.is_finite() {
            return;
        }
        let r2 = r * r;
        let x0 = (c.x - r).floor().max(-1.0) as i64;
        let x1 = (c.x + r).ceil().min(self.width() as f32) as i64;
        let y0 = (c.y - r).floor().max(-1.0) as i64;
        let y1 = (c.y + r).ceil().min(self.height() as f32) as i64;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - c.x;
                let dy = y as f32 + 0.5 - c.y;
                if dx * dx + dy * dy <= r2 {
                    self.put(x, y, color);
                }
            }
        }
    }
}

impl Surface for Canvas {
    fn fill(&mut self, c: Color) {
        let px = rgba(c);
        for p in self.img.pixels_mut() {
            *p = px;
        }
    }

    // Stamped discs along the segment; good enough for strokes a few px wide.
    fn line(&mut self, a: Vec2, b: Vec2, width: f32, color: Color) {
        if !a.is_finite() || !b.is_finite() {
            return;
        }
        let r = (width * 0.5).max(0.75);
        let d = b - a;
        let len = (d.x * d.x + d.y * d.y).sqrt();
        let n = (len / 0.5).ceil().clamp(1.0, 4.0 * MAX_CANVAS_SIDE as f32) as u32;
        for i in 0..=n {
            self.disc(a + d * (i as f32 / n as f32), r, color);
        }
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.disc(center, radius, color);
    }
}

/// A pairwise curve through a shared curve point: from the far end of
/// `first` to the far end of `second`, pulled by both lines' control
/// points at the shared end.
#[derive(Clone, Copy, Debug)]
pub struct Joint {
    pub point: u32,
    pub first: u32,
    pub second: u32,
    pub curve: CubicBezier,
}

fn is_joint_point(form: &Form, id: u32) -> bool {
    form.point(id).map_or(false, |p| p.setting.curve) && form.lines_at(id).len() >= 2
}

/// Every ordered pair of distinct lines meeting at a curve point with at
/// least two lines.
pub fn joints(form: &Form) -> Vec<Joint> {
    let mut out = Vec::new();
    for (pid, _) in form.points() {
        if !is_joint_point(form, pid) {
            continue;
        }
        let incident = form.lines_at(pid);
        for &l1 in incident {
            for &l2 in incident {
                if l1 == l2 {
                    continue;
                }
                if let Some(curve) = joint_curve(form, pid, l1, l2) {
                    out.push(Joint { point: pid, first: l1, second: l2, curve });
                }
            }
        }
    }
    out
}

fn joint_curve(form: &Form, pid: u32, l1: u32, l2: u32) -> Option<CubicBezier> {
    let (a, b) = (form.line(l1)?, form.line(l2)?);
    let far1 = form.point_pos(a.other(pid)?)?;
    let far2 = form.point_pos(b.other(pid)?)?;
    let c1 = a.controls[a.control_index(pid)?].pos;
    let c2 = b.controls[b.control_index(pid)?].pos;
    Some(CubicBezier::new(far1, c1, c2, far2))
}

/// Straight or curved stroke of a line that is not covered by joints.
pub(crate) fn line_path(form: &Form, l: &Line, steps: usize) -> Option<Vec<Vec2>> {
    if is_joint_point(form, l.a) || is_joint_point(form, l.b) {
        return None;
    }
    let a = form.point_pos(l.a)?;
    let b = form.point_pos(l.b)?;
    if l.setting.curve {
        Some(CubicBezier::new(a, l.controls[0].pos, l.controls[1].pos, b).sample(steps))
    } else {
        Some(vec![a, b])
    }
}

/// Stroking options shared by `draw` and `render`.
#[derive(Clone, Copy, Debug)]
pub struct Painter {
    pub steps: usize,
    pub background: Option<Color>,
}

impl Default for Painter {
    fn default() -> Self {
        Painter { steps: DEFAULT_STEPS, background: None }
    }
}

impl Painter {
    fn strokes(&self, form: &Form, s: &mut dyn Surface, decorate: bool) {
        if let Some(bg) = self.background {
            s.fill(bg);
        }
        for (_, l) in form.lines() {
            let color = if decorate && l.marks.selected { Color::YELLOW } else { Color::WHITE };
            if let Some(path) = line_path(form, l, self.steps) {
                s.polyline(&path, l.width, color);
            }
        }
        for j in joints(form) {
            let (Some(a), Some(b)) = (form.line(j.first), form.line(j.second)) else { continue };
            let selected = a.marks.selected || b.marks.selected;
            let color = if decorate && selected { Color::YELLOW } else { Color::WHITE };
            s.polyline(&j.curve.sample(self.steps), a.width.min(b.width), color);
        }
    }

    pub fn draw(&self, form: &Form, s: &mut dyn Surface) {
        self.strokes(form, s, true);
        for (_, p) in form.points() {
            let color = if p.marks.previous {
                Color::GREEN
            } else if p.marks.selected {
                Color::YELLOW
            } else {
                Color::WHITE
            };
            s.circle(p.pos, POINT_SIZE, color);
        }
        for (_, l) in form.lines() {
            if l.marks.selected && l.setting.curve {
                for c in &l.controls {
                    let color = if c.marks.selected { Color::YELLOW } else { Color::WHITE };
                    s.circle(c.pos, POINT_SIZE, color);
                }
            }
        }
    }

    pub fn render(&self, form: &Form, s: &mut dyn Surface) {
        self.strokes(form, s, false);
    }
}

/// Authoring view with selection decoration.
pub fn draw(form: &Form, s: &mut dyn Surface) {
    Painter::default().draw(form, s)
}

/// Plain strokes only.
pub fn render(form: &Form, s: &mut dyn Surface) {
    Painter::default().render(form, s)
}
