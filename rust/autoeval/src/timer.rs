//! Promise-based timers

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use autoeval_core::EvalError;

use crate::interop::dom_error;

/// `setTimeout` delay argument; values past `i32::MAX` clamp instead of wrapping
pub fn timeout_arg(ms: u32) -> i32 {
    i32::try_from(ms).unwrap_or(i32::MAX)
}

/// Resolve after `ms` milliseconds (immediately when there is no window)
pub async fn sleep(ms: u32) -> Result<(), EvalError> {
    let promise = Promise::new(&mut |resolve, _reject| {
        let scheduled = web_sys::window().and_then(|window| {
            window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout_arg(ms))
                .ok()
        });
        if scheduled.is_none() {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    JsFuture::from(promise).await.map(|_| ()).map_err(dom_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_arg_clamps() {
        assert_eq!(timeout_arg(100), 100);
        assert_eq!(timeout_arg(i32::MAX as u32), i32::MAX);
        assert_eq!(timeout_arg(3_000_000_000), i32::MAX);
    }
}
