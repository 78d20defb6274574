//! Auto-Evaluator: evaluation-form auto-filler
//!
//! Rust/WASM front-end of the browser extension. The content script injects a
//! panel next to the questionnaire header, fills every `<select>` with the
//! chosen strategy and reports percentage scores per section. The popup edits
//! the preferred strategy, shared through `chrome.storage.sync`.
//!
//! # Architecture
//! - `page.rs` - DomPage: selector-driven access to the questionnaire
//! - `widget.rs` - SelectWidget: `<select>` as a `QuestionWidget`
//! - `settle.rs` - SettleWatch: waits for the page to react to change events
//! - `storage.rs` - SyncPreferenceStore over `chrome.storage.sync`
//! - `ui.rs` - PanelView: panel markup and rendering
//! - `controller.rs` - Controller: event wiring and the run sequence
//! - `popup.rs` - Settings popup
//! - `styles.rs` - Panel stylesheet injection
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { runContentScript } from './autoeval.js';
//!
//! await init();
//! await runContentScript();                       // default configuration
//! await runContentScript({ scoring: { kind: 'value_table', table: { '5': 4 } } });
//! ```

pub mod controller;
pub mod interop;
pub mod log;
pub mod page;
pub mod popup;
pub mod settle;
pub mod storage;
pub mod styles;
pub mod timer;
pub mod ui;
pub mod widget;

use wasm_bindgen::prelude::*;

use autoeval_core::{EvalError, EvaluatorConfig};

use crate::controller::Controller;
use crate::interop::to_js;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn document() -> Result<web_sys::Document, EvalError> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| EvalError::Dom("no document available".to_string()))
}

/// Parse an optional configuration object; `undefined`/`null` give defaults
pub fn parse_config(value: JsValue) -> Result<EvaluatorConfig, EvalError> {
    if value.is_undefined() || value.is_null() {
        return Ok(EvaluatorConfig::default());
    }
    let config: EvaluatorConfig =
        serde_wasm_bindgen::from_value(value).map_err(|e| EvalError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Content script entry: inject the panel and follow the stored preference
#[wasm_bindgen(js_name = runContentScript)]
pub async fn run_content_script(config: JsValue) -> Result<(), JsValue> {
    log::info("Initializing...");
    let config = parse_config(config).map_err(to_js)?;
    let document = document().map_err(to_js)?;
    page::when_ready(&document).await.map_err(to_js)?;

    let controller = match Controller::mount(document, config) {
        Ok(Some(controller)) => controller,
        Ok(None) => return Ok(()),
        Err(err) => {
            log::error(&format!("Failed to initialize UI: {}", err));
            return Err(to_js(err));
        }
    };
    controller.sync_preference().await;

    // handlers only hold weak references; the page keeps the controller
    std::mem::forget(controller);
    Ok(())
}

/// Settings popup entry
#[wasm_bindgen(js_name = runPopup)]
pub async fn run_popup() -> Result<(), JsValue> {
    let document = document().map_err(to_js)?;
    page::when_ready(&document).await.map_err(to_js)?;
    popup::run(document).await.map_err(to_js)
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("autoeval v{}", env!("CARGO_PKG_VERSION"))
}
