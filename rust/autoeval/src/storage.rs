//! Preferred strategy in `chrome.storage.sync`
//!
//! Shared by the content panel and the settings popup; `onChanged` fires in
//! every surface whichever one wrote the value.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use autoeval_core::{
    decode_preference, encode_preference, preference_from_change, EvalError, Strategy,
};

use crate::interop::{storage_error, to_plain_object};

const SYNC_AREA: &str = "sync";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = get)]
    fn sync_get(keys: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = set)]
    fn sync_set(items: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "onChanged"], js_name = addListener)]
    fn on_changed_add_listener(callback: &js_sys::Function) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "onChanged"], js_name = removeListener)]
    fn on_changed_remove_listener(callback: &js_sys::Function) -> Result<(), JsValue>;
}

/// Listener registration; dropping it unregisters the callback
pub struct Subscription {
    callback: Closure<dyn FnMut(JsValue, String)>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let _ = on_changed_remove_listener(self.callback.as_ref().unchecked_ref());
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncPreferenceStore;

impl SyncPreferenceStore {
    pub fn new() -> Self {
        Self
    }

    /// Stored strategy, or the fallback when absent or invalid
    pub async fn load(&self) -> Result<Strategy, EvalError> {
        let keys = to_plain_object(&encode_preference(Strategy::FALLBACK))
            .map_err(|e| EvalError::Storage(e.to_string()))?;
        let items = JsFuture::from(sync_get(&keys).map_err(storage_error)?)
            .await
            .map_err(storage_error)?;
        let items: serde_json::Value = serde_wasm_bindgen::from_value(items)
            .map_err(|e| EvalError::Storage(e.to_string()))?;
        Ok(decode_preference(&items))
    }

    pub async fn save(&self, strategy: Strategy) -> Result<(), EvalError> {
        let items = to_plain_object(&encode_preference(strategy))
            .map_err(|e| EvalError::Storage(e.to_string()))?;
        JsFuture::from(sync_set(&items).map_err(storage_error)?)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    /// Call `on_change` with every new value written by any surface
    pub fn subscribe<F>(&self, mut on_change: F) -> Result<Subscription, EvalError>
    where
        F: FnMut(Strategy) + 'static,
    {
        let callback = Closure::<dyn FnMut(JsValue, String)>::new(move |changes: JsValue, area: String| {
            let changes: serde_json::Value = match serde_wasm_bindgen::from_value(changes) {
                Ok(v) => v,
                Err(_) => return,
            };
            if let Some(strategy) = preference_from_change(&changes, &area, SYNC_AREA) {
                on_change(strategy);
            }
        });
        on_changed_add_listener(callback.as_ref().unchecked_ref()).map_err(storage_error)?;
        Ok(Subscription { callback })
    }
}
