//! Console logging with the extension prefix

use wasm_bindgen::JsValue;

const PREFIX: &str = "Auto-Evaluator:";

fn prefixed(message: &str) -> JsValue {
    JsValue::from_str(&format!("{} {}", PREFIX, message))
}

pub fn info(message: &str) {
    web_sys::console::log_1(&prefixed(message));
}

pub fn warn(message: &str) {
    web_sys::console::warn_1(&prefixed(message));
}

pub fn error(message: &str) {
    web_sys::console::error_1(&prefixed(message));
}
