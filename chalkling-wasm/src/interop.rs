use chalkling::render::Canvas;
use js_sys::{Float32Array, Object, Reflect, Uint32Array, Uint8Array};
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object {
    Object::new()
}

pub fn set_kv(obj: &Object, key: &str, v: &JsValue) {
    // Reflect::set only fails on frozen objects; ours never are.
    let _ = Reflect::set(obj, &JsValue::from_str(key), v);
}

/// Plain object from key/value pairs, in order.
pub fn obj(pairs: &[(&str, JsValue)]) -> Object {
    let o = new_obj();
    for (k, v) in pairs {
        set_kv(&o, k, v);
    }
    o
}

// Typed-array copies of Rust slices; JS owns the result.
pub fn arr_u32(slice: &[u32]) -> Uint32Array {
    Uint32Array::from(slice)
}
pub fn arr_f32(slice: &[f32]) -> Float32Array {
    Float32Array::from(slice)
}
pub fn arr_u8(slice: &[u8]) -> Uint8Array {
    Uint8Array::from(slice)
}

/// `{ width, height, pixels }` with RGBA8 pixels, ready for `ImageData`.
pub fn image_obj(canvas: &Canvas) -> Object {
    obj(&[
        ("width", JsValue::from(canvas.width())),
        ("height", JsValue::from(canvas.height())),
        ("pixels", arr_u8(canvas.data()).into()),
    ])
}

pub fn to_js<T: serde::Serialize + ?Sized>(v: &T) -> JsValue {
    serde_wasm_bindgen::to_value(v).unwrap_or(JsValue::NULL)
}
