//! Input controller for the authoring canvas.
//!
//! Turns discrete pointer and key events into form operations. `handle`
//! returns whether the event was consumed; semantic changes are announced
//! through the notification chain.

use crate::algorithms::drag::DragSession;
use crate::algorithms::export::{export_variants, ExportReport, ExportSink};
use crate::config::EditorConfig;
use crate::events::{Dispatcher, Notification};
use crate::geometry::tolerance::POINT_SIZE;
use crate::model::{BodyPart, Color, Element, Rect, Vec2};
use crate::render::{Canvas, Painter, Surface};
use crate::Form;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Disabled,
    FormEdit,
    BoundEdit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Left,
    Middle,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    N,
    P,
    Delete,
    A,
    J,
    C,
    R,
    Digit(u8),
}

impl Key {
    /// Maps a host key name (`"n"`, `"Delete"`, `"3"`, …) to a key.
    pub fn from_name(name: &str) -> Option<Key> {
        match name {
            "n" | "N" => Some(Key::N),
            "p" | "P" => Some(Key::P),
            "Delete" => Some(Key::Delete),
            "a" | "A" => Some(Key::A),
            "j" | "J" => Some(Key::J),
            "c" | "C" => Some(Key::C),
            "r" | "R" => Some(Key::R),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c.to_digit(10).map(|d| Key::Digit(d as u8)),
                    _ => None,
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown { pos: Vec2, button: Button },
    PointerUp { pos: Vec2, button: Button },
    PointerMove { pos: Vec2 },
    KeyUp { key: Key },
}

/// Rubber-band rectangle between the press position and the cursor.
#[derive(Clone, Copy, Debug, Default)]
pub struct AreaSelector {
    start: Option<Vec2>,
    rect: Rect,
}

impl AreaSelector {
    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    fn start(&mut self, pos: Vec2) {
        self.start = Some(pos);
        self.rect = Rect::new(pos.x, pos.y, 0.0, 0.0);
    }

    fn update(&mut self, pos: Vec2) {
        if let Some(s) = self.start {
            self.rect = Rect::from_corners(s, pos);
        }
    }

    fn stop(&mut self) -> Rect {
        self.start = None;
        std::mem::take(&mut self.rect)
    }
}

pub struct Editor {
    form: Form,
    mode: Mode,
    config: EditorConfig,
    area: AreaSelector,
    drag: Option<DragSession>,
    cursor: Vec2,
    events: Dispatcher<Notification>,
}

impl Default for Editor {
    fn default() -> Self {
        Editor::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Editor {
            form: Form::with_control_offset(config.control_offset),
            mode: Mode::FormEdit,
            config,
            area: AreaSelector::default(),
            drag: None,
            cursor: Vec2::ZERO,
            events: Dispatcher::new(),
        }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn area(&self) -> &AreaSelector {
        &self.area
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&Notification) -> bool + 'static,
    {
        self.events.subscribe(listener);
    }

    fn notify(&mut self, n: Notification) {
        self.events.dispatch(&n);
    }

    fn canvas_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.config.canvas_width as f32, self.config.canvas_height as f32)
    }

    pub fn disable(&mut self) {
        self.mode = Mode::Disabled;
        self.area.stop();
        self.drag = None;
    }

    pub fn enable(&mut self) {
        self.mode = Mode::FormEdit;
    }

    /// Replaces the edited form wholesale.
    pub fn load(&mut self, form: Form) {
        self.form = form;
        self.drag = None;
        self.area.stop();
        if self.mode == Mode::BoundEdit {
            self.mode = Mode::FormEdit;
        }
        log::info!("editor loaded form with {} point(s)", self.form.point_count());
        self.notify(Notification::FormLoaded);
    }

    pub fn new_form(&mut self) {
        self.form = Form::with_control_offset(self.config.control_offset);
        self.drag = None;
        self.area.stop();
        self.notify(Notification::FormEdited);
    }

    pub fn handle(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::PointerDown { pos, button } => self.pointer_down(pos, button),
            InputEvent::PointerUp { button, .. } => self.pointer_up(button),
            InputEvent::PointerMove { pos } => self.pointer_move(pos),
            InputEvent::KeyUp { key } => self.key_up(key),
        }
    }

    fn pointer_down(&mut self, pos: Vec2, button: Button) -> bool {
        if self.mode == Mode::Disabled || !self.canvas_rect().contains(pos) {
            return false;
        }
        self.cursor = pos;
        match (button, self.mode) {
            (Button::Right, _) => {
                self.form.unselect_all();
                self.notify(Notification::SelectionChanged);
                true
            }
            (Button::Left, Mode::FormEdit) => {
                self.click_form_edit(pos);
                true
            }
            (Button::Left, Mode::BoundEdit) => {
                self.area.start(pos);
                true
            }
            _ => false,
        }
    }

    fn click_form_edit(&mut self, pos: Vec2) {
        // Hit-test before clearing: control points are only live while their line is selected.
        let touched = self.form.get_selected_in(Rect::around(pos, POINT_SIZE));
        self.form.unselect_all();
        if touched.is_empty() {
            self.area.start(pos);
        } else {
            self.form.select(&touched);
            self.drag = Some(DragSession::start(self.form.selection().to_vec(), pos));
        }
        let first_point = touched.iter().find_map(|e| match e {
            Element::Point { id } => Some(*id),
            _ => None,
        });
        if let Some(id) = first_point {
            self.form.set_previous_point(Some(id));
        }
        self.notify(Notification::SelectionChanged);
    }

    fn pointer_move(&mut self, pos: Vec2) -> bool {
        self.cursor = pos;
        if let Some(drag) = self.drag.as_mut() {
            drag.move_to(&mut self.form, pos);
            return true;
        }
        if self.area.is_active() && self.canvas_rect().contains(pos) {
            self.area.update(pos);
        }
        false
    }

    fn pointer_up(&mut self, button: Button) -> bool {
        if button == Button::Right {
            return false;
        }
        if let Some(drag) = self.drag.take() {
            if drag.stop() {
                self.notify(Notification::FormEdited);
                return true;
            }
        }
        let rect = self.area.stop();
        if rect.w <= 0.0 {
            return false;
        }
        match self.mode {
            Mode::BoundEdit => {
                if let Some(&id) = self.form.selected_points().first() {
                    self.form.set_point_bounds(id, rect);
                    log::debug!("set bounds of point {} to {}x{}", id, rect.w, rect.h);
                    self.notify(Notification::FormEdited);
                }
                self.mode = Mode::FormEdit;
                true
            }
            Mode::FormEdit => {
                self.form.select_in(rect);
                self.notify(Notification::SelectionChanged);
                true
            }
            Mode::Disabled => false,
        }
    }

    fn key_up(&mut self, key: Key) -> bool {
        if self.mode == Mode::Disabled {
            return false;
        }
        match key {
            Key::N => {
                self.new_form();
                true
            }
            Key::P => {
                if self.form.selected_points().len() == 1 {
                    self.mode = Mode::BoundEdit;
                }
                true
            }
            Key::Delete => {
                if self.canvas_rect().contains(self.cursor) && self.form.remove_selection() > 0 {
                    self.notify(Notification::FormEdited);
                }
                true
            }
            Key::A => {
                let added = self.form.add_point(
                    self.cursor,
                    self.config.point_setting.clone(),
                    self.config.line_setting.clone(),
                );
                match added {
                    Ok(_) => self.notify(Notification::FormEdited),
                    Err(e) => log::warn!("add point rejected: {}", e),
                }
                true
            }
            Key::J => {
                self.join_at_cursor();
                true
            }
            Key::C => {
                if self.form.toggle_curve_selected() > 0 {
                    self.notify(Notification::FormEdited);
                }
                true
            }
            Key::R => {
                self.notify(Notification::RegenerateRequested);
                true
            }
            Key::Digit(d @ 1..=7) => {
                let part = BodyPart::ALL[(d - 1) as usize];
                if self.form.toggle_body_part_selected(part) > 0 {
                    self.notify(Notification::FormEdited);
                }
                true
            }
            Key::Digit(_) => false,
        }
    }

    fn join_at_cursor(&mut self) {
        let touched = self.form.get_selected_in(Rect::around(self.cursor, POINT_SIZE));
        let Some(point) = touched.iter().find_map(|e| match e {
            Element::Point { id } => Some(*id),
            _ => None,
        }) else {
            return;
        };
        match self.form.join_previous(point, self.config.line_setting.clone()) {
            Ok(_) => self.notify(Notification::FormEdited),
            Err(e) => log::debug!("join skipped: {}", e),
        }
    }

    /// Authoring view: form with selection decoration plus the rubber band.
    pub fn draw(&self, surface: &mut dyn Surface) {
        let painter = Painter { steps: self.config.bezier_steps, background: Some(self.config.canvas_background) };
        painter.draw(&self.form, surface);
        if self.area.is_active() {
            let r = self.area.rect();
            let corners = [
                Vec2::new(r.x, r.y),
                Vec2::new(r.right(), r.y),
                Vec2::new(r.right(), r.bottom()),
                Vec2::new(r.x, r.bottom()),
                Vec2::new(r.x, r.y),
            ];
            surface.polyline(&corners, 1.0, Color::YELLOW);
        }
    }

    /// A regenerated copy scaled to the preview size; the edited form is untouched.
    pub fn preview<R: Rng + ?Sized>(&self, rng: &mut R) -> Form {
        let mut variant = self.form.variant();
        variant.regenerate(rng);
        if !variant.scale(self.config.preview_scale()) {
            log::warn!("preview kept at authoring scale");
        }
        variant
    }

    pub fn render_preview<R: Rng + ?Sized>(&self, rng: &mut R) -> Canvas {
        let variant = self.preview(rng);
        let mut canvas = Canvas::new(self.config.preview_width, self.config.preview_height);
        let painter = Painter { steps: self.config.bezier_steps, background: Some(self.config.render_background) };
        painter.render(&variant, &mut canvas);
        canvas
    }

    pub fn export<R: Rng + ?Sized>(
        &self,
        copies: u32,
        start_index: u32,
        rng: &mut R,
        sink: &mut dyn ExportSink,
    ) -> ExportReport {
        export_variants(&self.form, &self.config, copies, start_index, rng, sink)
    }
}
