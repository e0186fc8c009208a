//! Editor configuration.
//!
//! Every field has a default, so a partial JSON document only overrides what
//! it names.

use crate::error::LoadError;
use crate::geometry::limits::{in_variance_bounds, in_width_bounds, MAX_CANVAS_SIDE};
use crate::model::{Color, LineSetting, PointSetting};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub preview_width: u32,
    pub preview_height: u32,
    pub export_width: u32,
    pub export_height: u32,
    pub bezier_steps: usize,
    pub control_offset: f32,
    pub export_copies: u32,
    pub point_setting: PointSetting,
    pub line_setting: LineSetting,
    pub canvas_background: Color,
    pub render_background: Color,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            canvas_width: 512,
            canvas_height: 512,
            preview_width: 256,
            preview_height: 256,
            export_width: 128,
            export_height: 128,
            bezier_steps: crate::geometry::bezier::DEFAULT_STEPS,
            control_offset: crate::CONTROL_OFFSET,
            export_copies: 10,
            point_setting: PointSetting::with_variance(-10.0, 10.0, -10.0, 10.0),
            line_setting: LineSetting::default(),
            canvas_background: Color::rgb(30, 30, 30),
            render_background: Color::rgb(5, 5, 5),
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(s: &str) -> Result<Self, LoadError> {
        let cfg: EditorConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), LoadError> {
        let sides = [
            self.canvas_width,
            self.canvas_height,
            self.preview_width,
            self.preview_height,
            self.export_width,
            self.export_height,
        ];
        if sides.iter().any(|&s| s == 0 || s > MAX_CANVAS_SIDE) {
            return Err(LoadError::Invalid(format!("canvas sides must be in 1..={}", MAX_CANVAS_SIDE)));
        }
        if self.bezier_steps < 2 {
            return Err(LoadError::Invalid("bezier_steps must be at least 2".into()));
        }
        if !self.control_offset.is_finite() {
            return Err(LoadError::Invalid("control_offset must be finite".into()));
        }
        let p = &self.point_setting;
        if ![p.x_min, p.x_max, p.y_min, p.y_max].iter().all(|v| in_variance_bounds(*v)) {
            return Err(LoadError::Invalid("point_setting variance out of bounds".into()));
        }
        let l = &self.line_setting;
        if !in_width_bounds(l.width_variance_min) || !in_width_bounds(l.width_variance_max) {
            return Err(LoadError::Invalid("line_setting width out of bounds".into()));
        }
        Ok(())
    }

    /// Factor mapping the authoring canvas onto the preview.
    pub fn preview_scale(&self) -> f32 {
        self.preview_width as f32 / self.canvas_width as f32
    }

    /// Factor mapping the authoring canvas onto an exported image.
    pub fn export_scale(&self) -> f32 {
        self.export_width as f32 / self.canvas_width as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_keeps_defaults() {
        let cfg = EditorConfig::from_json_str(r#"{ "export_copies": 3, "export_width": 64 }"#).unwrap();
        assert_eq!(cfg.export_copies, 3);
        assert_eq!(cfg.canvas_width, 512);
        assert_eq!(cfg.export_scale(), 0.125);
        assert_eq!(cfg.point_setting.x_max, 10.0);
    }

    #[test]
    fn bad_values_are_rejected() {
        let e = EditorConfig::from_json_str(r#"{ "canvas_width": 0 }"#).unwrap_err();
        assert_eq!(e.code(), "invalid_document");
        let e = EditorConfig::from_json_str(r#"{ "bezier_steps": 1 }"#).unwrap_err();
        assert_eq!(e.code(), "invalid_document");
        let e = EditorConfig::from_json_str("{ nope").unwrap_err();
        assert_eq!(e.code(), "json_parse");
    }

    #[test]
    fn default_export_scale_is_a_quarter() {
        assert_eq!(EditorConfig::default().export_scale(), 0.25);
    }
}
