//! Conversions at the JS boundary

use autoeval_core::EvalError;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Best-effort text for a thrown JS value
pub fn describe(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{:?}", value)
}

pub fn dom_error(value: JsValue) -> EvalError {
    EvalError::Dom(describe(&value))
}

pub fn storage_error(value: JsValue) -> EvalError {
    EvalError::Storage(describe(&value))
}

pub fn to_js(err: EvalError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Serialize maps as plain objects rather than `Map`
pub fn to_plain_object<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
}
