use crate::error;
use crate::interop::{arr_f32, arr_u32, arr_u8, image_obj, new_obj, set_kv, to_js};
use crate::Editor;
use chalkling::algorithms::export::{free_form_name, next_export_index, MemorySink};
use chalkling::algorithms::similarity::derive_stats;
use chalkling::config::EditorConfig;
use chalkling::editor::{Button, InputEvent, Key};
use chalkling::events::Notification;
use chalkling::geometry::limits;
use chalkling::model::{Rect, Vec2};
use chalkling::render::Canvas;
use chalkling::Form;
use js_sys::Array;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// First free numeric export index given the file names already in a folder.
#[wasm_bindgen]
pub fn export_index_after(names: JsValue) -> u32 {
    let names: Vec<String> = serde_wasm_bindgen::from_value(names).unwrap_or_default();
    next_export_index(names)
}

#[wasm_bindgen]
pub fn free_name(names: JsValue) -> String {
    let names: Vec<String> = serde_wasm_bindgen::from_value(names).unwrap_or_default();
    free_form_name(&names, "unnamed", ".json")
}

fn button(code: u8) -> Option<Button> {
    match code {
        0 => Some(Button::Left),
        1 => Some(Button::Middle),
        2 => Some(Button::Right),
        _ => None,
    }
}

fn notification_name(n: Notification) -> &'static str {
    match n {
        Notification::SelectionChanged => "selection_changed",
        Notification::FormEdited => "form_edited",
        Notification::RegenerateRequested => "regenerate_requested",
        Notification::FormLoaded => "form_loaded",
    }
}

fn finite_rect(x: f32, y: f32, w: f32, h: f32) -> Result<Rect, JsValue> {
    for (name, v) in [("x", x), ("y", y), ("w", w), ("h", h)] {
        if !v.is_finite() {
            return Err(error::non_finite(name));
        }
    }
    Ok(Rect::new(x, y, w, h))
}

#[wasm_bindgen]
impl Editor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Editor {
        Editor::rs_new(EditorConfig::default())
    }

    /// Editor from a partial JSON config; missing keys keep their defaults.
    pub fn with_config(json: &str) -> Result<Editor, JsValue> {
        match EditorConfig::from_json_str(json) {
            Ok(cfg) => Ok(Editor::rs_new(cfg)),
            Err(e) => Err(error::load(&e)),
        }
    }

    /// Switches to a seeded random source for reproducible previews and exports.
    pub fn seed(&mut self, seed: u64) {
        self.rng = chalkling::random::seeded_rng(seed);
    }

    pub fn geom_version(&self) -> u64 {
        self.rs_geom_version()
    }

    // Input
    pub fn pointer_down(&mut self, x: f32, y: f32, button_code: u8) -> bool {
        let Some(b) = button(button_code) else { return false };
        self.inner.handle(&InputEvent::PointerDown { pos: Vec2::new(x, y), button: b })
    }
    pub fn pointer_up(&mut self, x: f32, y: f32, button_code: u8) -> bool {
        let Some(b) = button(button_code) else { return false };
        self.inner.handle(&InputEvent::PointerUp { pos: Vec2::new(x, y), button: b })
    }
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.inner.handle(&InputEvent::PointerMove { pos: Vec2::new(x, y) })
    }
    pub fn key_up(&mut self, name: &str) -> bool {
        match Key::from_name(name) {
            Some(key) => self.inner.handle(&InputEvent::KeyUp { key }),
            None => false,
        }
    }
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled { self.inner.enable() } else { self.inner.disable() }
    }
    pub fn mode(&self) -> String {
        format!("{:?}", self.inner.mode())
    }

    /// Notifications since the last call, oldest first.
    pub fn take_notifications(&mut self) -> Array {
        let drained: Vec<Notification> = self.pending.borrow_mut().drain(..).collect();
        drained.into_iter().map(|n| JsValue::from_str(notification_name(n))).collect()
    }

    // Points
    pub fn add_point(&mut self, x: f32, y: f32) -> Option<u32> {
        let (ps, ls) = (self.inner.config().point_setting.clone(), self.inner.config().line_setting.clone());
        self.inner.form_mut().add_point(Vec2::new(x, y), ps, ls).ok().map(|a| a.point)
    }
    pub fn add_point_res(&mut self, x: f32, y: f32) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        let (ps, ls) = (self.inner.config().point_setting.clone(), self.inner.config().line_setting.clone());
        match self.inner.form_mut().add_point(Vec2::new(x, y), ps, ls) {
            Ok(added) => {
                let o = new_obj();
                set_kv(&o, "point", &JsValue::from_f64(added.point as f64));
                let line = added.line.map_or(JsValue::NULL, |l| JsValue::from_f64(l as f64));
                set_kv(&o, "line", &line);
                error::ok(o.into())
            }
            Err(e) => error::form(&e),
        }
    }
    pub fn get_point(&self, id: u32) -> JsValue {
        match self.inner.form().point_pos(id) {
            Some(p) => to_js(&[p.x, p.y]),
            None => JsValue::NULL,
        }
    }
    pub fn move_point(&mut self, id: u32, x: f32, y: f32) -> bool {
        self.inner.form_mut().move_point(id, Vec2::new(x, y))
    }
    pub fn move_point_res(&mut self, id: u32, x: f32, y: f32) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        if self.inner.form().point(id).is_none() {
            return error::invalid_id("point", id);
        }
        error::ok(JsValue::from_bool(self.inner.form_mut().move_point(id, Vec2::new(x, y))))
    }
    pub fn set_point_bounds(&mut self, id: u32, x: f32, y: f32, w: f32, h: f32) -> bool {
        self.inner.form_mut().set_point_bounds(id, Rect::new(x, y, w, h))
    }
    pub fn set_point_bounds_res(&mut self, id: u32, x: f32, y: f32, w: f32, h: f32) -> JsValue {
        let rect = match finite_rect(x, y, w, h) {
            Ok(r) => r,
            Err(e) => return e,
        };
        if self.inner.form().point(id).is_none() {
            return error::invalid_id("point", id);
        }
        error::ok(JsValue::from_bool(self.inner.form_mut().set_point_bounds(id, rect)))
    }
    pub fn set_point_field(&mut self, id: u32, field: &str, text: &str) -> bool {
        match self.inner.form_mut().point_setting_mut(id) {
            Some(s) if field == "curve" => {
                s.curve = text == "true";
                true
            }
            Some(s) => s.set_from_text(field, text),
            None => false,
        }
    }
    pub fn remove_point(&mut self, id: u32) -> bool {
        self.inner.form_mut().remove_point(id)
    }
    pub fn remove_point_res(&mut self, id: u32) -> JsValue {
        if self.inner.form().point(id).is_none() {
            return error::invalid_id("point", id);
        }
        error::ok(JsValue::from_bool(self.inner.form_mut().remove_point(id)))
    }
    pub fn point_count(&self) -> u32 {
        self.inner.form().point_count()
    }
    pub fn previous_point(&self) -> Option<u32> {
        self.inner.form().previous_point()
    }
    pub fn set_previous_point(&mut self, id: Option<u32>) -> Option<u32> {
        self.inner.form_mut().set_previous_point(id)
    }

    // Lines
    pub fn add_line(&mut self, a: u32, b: u32) -> Option<u32> {
        let ls = self.inner.config().line_setting.clone();
        self.inner.form_mut().add_line(a, b, ls).ok()
    }
    pub fn add_line_res(&mut self, a: u32, b: u32) -> JsValue {
        let ls = self.inner.config().line_setting.clone();
        match self.inner.form_mut().add_line(a, b, ls) {
            Ok(id) => error::ok(JsValue::from_f64(id as f64)),
            Err(e) => error::form(&e),
        }
    }
    pub fn set_line_field(&mut self, id: u32, field: &str, text: &str) -> bool {
        match self.inner.form_mut().line_setting_mut(id) {
            Some(s) if field == "curve" => {
                s.curve = text == "true";
                true
            }
            Some(s) => s.set_from_text(field, text),
            None => false,
        }
    }
    pub fn remove_line(&mut self, id: u32) -> bool {
        self.inner.form_mut().remove_line(id)
    }
    pub fn remove_line_res(&mut self, id: u32) -> JsValue {
        if self.inner.form().line(id).is_none() {
            return error::form(&chalkling::FormError::MissingLine(id));
        }
        error::ok(JsValue::from_bool(self.inner.form_mut().remove_line(id)))
    }
    pub fn line_count(&self) -> u32 {
        self.inner.form().line_count()
    }

    // Typed arrays getters
    pub fn get_point_data(&self) -> JsValue {
        let form = self.inner.form();
        let ids: Vec<u32> = form.points().map(|(id, _)| id).collect();
        let obj = new_obj();
        set_kv(&obj, "ids", &arr_u32(&ids).into());
        set_kv(&obj, "positions", &arr_f32(&form.to_position_vector()).into());
        obj.into()
    }
    pub fn get_line_data(&self) -> JsValue {
        let form = self.inner.form();
        let mut ids = Vec::new();
        let mut endpoints = Vec::new();
        let mut widths = Vec::new();
        let mut curves = Vec::new();
        for (id, l) in form.lines() {
            ids.push(id);
            endpoints.extend_from_slice(&[l.a, l.b]);
            widths.push(l.width);
            curves.push(l.setting.curve as u8);
        }
        let obj = new_obj();
        set_kv(&obj, "ids", &arr_u32(&ids).into());
        set_kv(&obj, "endpoints", &arr_u32(&endpoints).into());
        set_kv(&obj, "widths", &arr_f32(&widths).into());
        set_kv(&obj, "curves", &arr_u8(&curves).into());
        obj.into()
    }

    // Selection
    pub fn select_at(&mut self, x: f32, y: f32) -> JsValue {
        to_js(&self.inner.form_mut().select_at(Vec2::new(x, y)))
    }
    pub fn select_in(&mut self, x: f32, y: f32, w: f32, h: f32) -> JsValue {
        to_js(&self.inner.form_mut().select_in(Rect::new(x, y, w, h)))
    }
    pub fn selection(&self) -> JsValue {
        to_js(self.inner.form().selection())
    }
    pub fn unselect_all(&mut self) {
        self.inner.form_mut().unselect_all();
    }
    pub fn remove_selection(&mut self) -> u32 {
        self.inner.form_mut().remove_selection() as u32
    }

    // Variation
    pub fn regenerate(&mut self) {
        let Editor { inner, rng, .. } = self;
        inner.form_mut().regenerate(rng);
    }
    pub fn scale(&mut self, factor: f32) -> bool {
        self.inner.form_mut().scale(factor)
    }
    pub fn scale_res(&mut self, factor: f32) -> JsValue {
        if !factor.is_finite() {
            return error::non_finite("factor");
        }
        // zero, or a factor that would carry a position past the coordinate limits
        if !self.inner.form_mut().scale(factor) {
            return error::out_of_range("factor", -limits::COORD_MAX, limits::COORD_MAX, factor);
        }
        error::ok(JsValue::TRUE)
    }

    // Stats
    pub fn get_stats(&self) -> JsValue {
        to_js(self.inner.form().stats())
    }
    pub fn set_stat(&mut self, field: &str, text: &str) -> bool {
        self.inner.form_mut().stats_mut().set_from_text(field, text)
    }

    /// Stats a variant document would get when exported against this form.
    pub fn score_variant_res(&self, variant_json: &str) -> JsValue {
        let variant = match serde_json::from_str::<serde_json::Value>(variant_json) {
            Ok(v) => {
                let mut f = Form::new();
                match f.from_json_value_strict(v) {
                    Ok(()) => f,
                    Err(e) => return error::load(&e),
                }
            }
            Err(e) => return error::load(&chalkling::LoadError::Json(e)),
        };
        match derive_stats(self.inner.form(), &variant) {
            Ok(stats) => error::ok(to_js(&stats)),
            Err(e) => error::score(&e),
        }
    }

    // Persistence
    pub fn to_json(&self) -> String {
        self.inner.form().to_json_value().to_string()
    }
    pub fn load_json(&mut self, json: &str) -> bool {
        let Ok(v) = serde_json::from_str::<serde_json::Value>(json) else { return false };
        // the document carries its own control offset
        let mut form = Form::new();
        if !form.from_json_value(v) {
            return false;
        }
        self.inner.load(form);
        true
    }
    pub fn load_json_res(&mut self, json: &str) -> JsValue {
        match Form::from_bytes(json.as_bytes()) {
            Ok(form) => {
                self.inner.load(form);
                error::ok(JsValue::TRUE)
            }
            Err(e) => error::load(&e),
        }
    }
    pub fn to_svg_paths(&self) -> JsValue {
        to_js(&self.inner.form().to_svg_paths(self.inner.config().bezier_steps))
    }

    // Raster output
    pub fn draw(&self) -> JsValue {
        let cfg = self.inner.config();
        let mut canvas = Canvas::new(cfg.canvas_width, cfg.canvas_height);
        self.inner.draw(&mut canvas);
        image_obj(&canvas).into()
    }
    pub fn render_preview(&mut self) -> JsValue {
        let Editor { inner, rng, .. } = self;
        image_obj(&inner.render_preview(rng)).into()
    }

    /// Renders `copies` variants. Returns `{ images: [{ index, width, height,
    /// pixels, metadata }], failed: [{ index, code, message }] }`.
    pub fn export(&mut self, copies: u32, start_index: u32) -> JsValue {
        let Editor { inner, rng, .. } = self;
        let mut sink = MemorySink::default();
        let report = inner.export(copies, start_index, rng, &mut sink);
        let images: Array = sink
            .variants
            .iter()
            .map(|v| {
                let o = image_obj(&v.image);
                set_kv(&o, "index", &JsValue::from_f64(v.index as f64));
                set_kv(&o, "metadata", &to_js(&v.metadata));
                JsValue::from(o)
            })
            .collect();
        let failed: Array = report
            .failed
            .iter()
            .map(|(index, e)| {
                let o = new_obj();
                set_kv(&o, "index", &JsValue::from_f64(*index as f64));
                set_kv(&o, "code", &JsValue::from_str(e.code()));
                set_kv(&o, "message", &JsValue::from_str(&e.to_string()));
                JsValue::from(o)
            })
            .collect();
        let out = new_obj();
        set_kv(&out, "images", &images.into());
        set_kv(&out, "failed", &failed.into());
        out.into()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Editor::new()
    }
}
