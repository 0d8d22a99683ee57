//! Agent-local key/value state

use std::sync::{Mutex, MutexGuard};

use serde_json::{Map, Value};

/// Mutable state bag owned by an agent.
///
/// Interior mutability lets agents update bookkeeping from `&self`, so one
/// instance can serve concurrent dispatches.
#[derive(Debug, Default)]
pub struct StateBag {
    entries: Mutex<Map<String, Value>>,
}

impl StateBag {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic in another dispatch must not wedge the agent's state.
    fn lock(&self) -> MutexGuard<'_, Map<String, Value>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Set `key` to `value`, replacing any previous value
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.lock().insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    /// Apply `f` to the current value of `key` under a single lock
    pub fn update<F>(&self, key: &str, f: F) -> Value
    where
        F: FnOnce(Option<&Value>) -> Value,
    {
        let mut entries = self.lock();
        let next = f(entries.get(key));
        entries.insert(key.to_string(), next.clone());
        next
    }

    /// Copy of the whole bag
    pub fn snapshot(&self) -> Map<String, Value> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_and_snapshot() {
        let state = StateBag::new();
        assert!(state.is_empty());

        state.set("key1", "value1");
        state.set("key1", "value2");
        state.set("count", 3);

        assert_eq!(state.len(), 2);
        assert_eq!(state.get("key1"), Some(json!("value2")));
        assert_eq!(state.snapshot()["count"], json!(3));
    }

    #[test]
    fn test_update_counter() {
        let state = StateBag::new();
        for _ in 0..3 {
            state.update("hits", |v| json!(v.and_then(Value::as_u64).unwrap_or(0) + 1));
        }
        assert_eq!(state.get("hits"), Some(json!(3)));
    }
}
