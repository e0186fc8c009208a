//! `_res` envelopes: `{ ok: true, value }` or
//! `{ ok: false, error: { code, message, data? } }`.

use crate::interop::{obj, set_kv};
use chalkling::{FormError, LoadError, ScoreError};
use wasm_bindgen::prelude::*;

pub fn ok(value: JsValue) -> JsValue {
    obj(&[("ok", JsValue::TRUE), ("value", value)]).into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let detail = obj(&[("code", JsValue::from_str(code)), ("message", JsValue::from_str(&message.into()))]);
    if let Some(d) = data {
        set_kv(&detail, "data", &d);
    }
    obj(&[("ok", JsValue::FALSE), ("error", detail.into())]).into()
}

pub fn non_finite(param: &str) -> JsValue {
    let data = obj(&[("param", JsValue::from_str(param))]);
    err("non_finite", format!("parameter '{}' must be finite", param), Some(data.into()))
}

pub fn out_of_range(param: &str, min: f32, max: f32, got: f32) -> JsValue {
    let data = obj(&[
        ("param", JsValue::from_str(param)),
        ("min", JsValue::from(min)),
        ("max", JsValue::from(max)),
        ("got", JsValue::from(got)),
    ]);
    err("out_of_range", format!("parameter '{}' out of range", param), Some(data.into()))
}

pub fn invalid_id(kind: &str, id: u32) -> JsValue {
    let data = obj(&[("kind", JsValue::from_str(kind)), ("id", JsValue::from(id))]);
    err("invalid_id", format!("unknown {} id {}", kind, id), Some(data.into()))
}

pub fn form(e: &FormError) -> JsValue {
    match *e {
        FormError::MissingPoint(id) => invalid_id("point", id),
        FormError::MissingLine(id) => invalid_id("line", id),
        FormError::NonFinite(param) => non_finite(param),
        FormError::OutOfRange(param) => {
            let data = obj(&[("param", JsValue::from_str(param))]);
            err(e.code(), e.to_string(), Some(data.into()))
        }
        FormError::SelfLoop(_) | FormError::NoPreviousPoint => err(e.code(), e.to_string(), None),
    }
}

pub fn load(e: &LoadError) -> JsValue {
    err(e.code(), e.to_string(), None)
}

pub fn score(e: &ScoreError) -> JsValue {
    let data = match *e {
        ScoreError::ShapeMismatch { original, variant } => Some(
            obj(&[("original", JsValue::from(original as u32)), ("variant", JsValue::from(variant as u32))]).into(),
        ),
        _ => None,
    };
    err(e.code(), e.to_string(), data)
}
