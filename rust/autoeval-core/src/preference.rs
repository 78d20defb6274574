//! Preferred-strategy persistence
//!
//! The preference is one key-value pair shared by every extension surface.
//! This module owns its encoding plus an in-memory store; the browser-backed
//! store lives in the wasm crate and reuses the codec.

use serde_json::{Map, Value};
use std::collections::VecDeque;

use crate::strategy::Strategy;

/// Storage key of the preferred strategy
pub const PREFERRED_STRATEGY_KEY: &str = "preferredStrategy";

// =============================================================================
// Codec
// =============================================================================

/// Read the strategy out of a storage `get` result; absent or invalid
/// values give [`Strategy::FALLBACK`].
pub fn decode_preference(items: &Value) -> Strategy {
    items
        .get(PREFERRED_STRATEGY_KEY)
        .and_then(Value::as_str)
        .map(Strategy::from_id)
        .unwrap_or(Strategy::FALLBACK)
}

/// Object to pass to a storage `set` call
pub fn encode_preference(strategy: Strategy) -> Value {
    let mut items = Map::new();
    items.insert(
        PREFERRED_STRATEGY_KEY.to_string(),
        Value::String(strategy.id().to_string()),
    );
    Value::Object(items)
}

/// Extract the new strategy from a storage change notification.
///
/// `changes` maps keys to `{ oldValue, newValue }`. Returns `None` when the
/// change is for another area or another key. A removed key resets to the
/// fallback.
pub fn preference_from_change(changes: &Value, area: &str, watched_area: &str) -> Option<Strategy> {
    if area != watched_area {
        return None;
    }
    let change = changes.get(PREFERRED_STRATEGY_KEY)?;
    Some(
        change
            .get("newValue")
            .and_then(Value::as_str)
            .map(Strategy::from_id)
            .unwrap_or(Strategy::FALLBACK),
    )
}

// =============================================================================
// In-memory store
// =============================================================================

type Listener = Box<dyn FnMut(Strategy)>;

/// Store with the same contract as the synced browser store.
///
/// Change notifications are queued by `save` and delivered by
/// `dispatch_pending`, mirroring the event-loop hop of the real store.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    value: Option<String>,
    listeners: Vec<Listener>,
    pending: VecDeque<Strategy>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a raw (possibly invalid) id
    pub fn with_raw(id: impl Into<String>) -> Self {
        Self {
            value: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn load(&self) -> Strategy {
        self.value
            .as_deref()
            .map(Strategy::from_id)
            .unwrap_or(Strategy::FALLBACK)
    }

    pub fn save(&mut self, strategy: Strategy) {
        let changed = self.value.as_deref() != Some(strategy.id());
        self.value = Some(strategy.id().to_string());
        if changed {
            self.pending.push_back(strategy);
        }
    }

    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(Strategy) + 'static,
    {
        self.listeners.push(Box::new(callback));
    }

    /// Deliver queued changes to every listener; returns how many were sent
    pub fn dispatch_pending(&mut self) -> usize {
        let mut delivered = 0;
        while let Some(strategy) = self.pending.pop_front() {
            for listener in self.listeners.iter_mut() {
                listener(strategy);
            }
            delivered += 1;
        }
        delivered
    }
}
