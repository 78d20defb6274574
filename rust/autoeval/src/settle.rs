//! Waiting for the host page to react to change events
//!
//! A watch is armed *before* the change events are dispatched. It resolves on
//! the first mutation batch observed under the form root, or when the fallback
//! delay expires, whichever comes first.

use js_sys::{Array, Function, Promise};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{MutationObserver, MutationObserverInit, Node};

use autoeval_core::{EvalError, SettleConfig};

use crate::interop::dom_error;
use crate::timer::timeout_arg;

const MUTATION: &str = "mutation";
const TIMEOUT: &str = "timeout";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    /// The page changed the DOM in response
    Mutation,
    /// Nothing observed before the fallback delay
    Timeout,
}

pub struct SettleWatch {
    promise: Promise,
    observer: Option<MutationObserver>,
    timeout_handle: Option<i32>,
    // kept alive until the watch completes
    _on_mutation: Option<Closure<dyn FnMut(Array, MutationObserver)>>,
}

impl SettleWatch {
    /// Start watching `root`. With no root or with observation disabled only
    /// the fallback delay applies.
    pub fn arm(root: Option<&Node>, config: &SettleConfig) -> Result<Self, EvalError> {
        let resolver: Rc<RefCell<Option<Function>>> = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&resolver);
        let promise = Promise::new(&mut |resolve, _reject| {
            *slot.borrow_mut() = Some(resolve);
        });
        let resolve = resolver
            .borrow_mut()
            .take()
            .ok_or_else(|| EvalError::Dom("promise executor did not run".to_string()))?;

        let timeout_handle = match web_sys::window() {
            Some(window) => Some(
                window
                    .set_timeout_with_callback_and_timeout_and_arguments_1(
                        &resolve,
                        timeout_arg(config.fallback_delay_ms),
                        &JsValue::from_str(TIMEOUT),
                    )
                    .map_err(dom_error)?,
            ),
            None => {
                resolve
                    .call1(&JsValue::NULL, &JsValue::from_str(TIMEOUT))
                    .map_err(dom_error)?;
                None
            }
        };

        let (observer, on_mutation) = match root {
            Some(root) if config.observe_mutations => {
                let on_mutation_resolve = resolve.clone();
                let on_mutation = Closure::<dyn FnMut(Array, MutationObserver)>::new(
                    move |_records: Array, _observer: MutationObserver| {
                        let _ = on_mutation_resolve.call1(&JsValue::NULL, &JsValue::from_str(MUTATION));
                    },
                );
                let observer =
                    MutationObserver::new(on_mutation.as_ref().unchecked_ref()).map_err(dom_error)?;
                let options = MutationObserverInit::new();
                options.set_subtree(true);
                options.set_child_list(true);
                options.set_attributes(true);
                options.set_character_data(true);
                observer
                    .observe_with_options(root, &options)
                    .map_err(dom_error)?;
                (Some(observer), Some(on_mutation))
            }
            _ => (None, None),
        };

        Ok(Self {
            promise,
            observer,
            timeout_handle,
            _on_mutation: on_mutation,
        })
    }

    /// Wait for the first signal, then tear the watch down
    pub async fn wait(self) -> Result<SettleOutcome, EvalError> {
        let result = JsFuture::from(self.promise.clone()).await;

        if let Some(observer) = &self.observer {
            observer.disconnect();
        }
        if let (Some(window), Some(handle)) = (web_sys::window(), self.timeout_handle) {
            window.clear_timeout_with_handle(handle);
        }

        let value = result.map_err(dom_error)?;
        Ok(if value.as_string().as_deref() == Some(MUTATION) {
            SettleOutcome::Mutation
        } else {
            SettleOutcome::Timeout
        })
    }
}
