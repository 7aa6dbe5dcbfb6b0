//! Conversation state shared across flow nodes.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

/// A string-keyed bag of values collected during a conversation.
///
/// Handlers write what they learn (the user's name, the practice
/// language) and later nodes read it back. Values are JSON so handlers
/// never need bespoke state types.
#[derive(Debug, Clone, Default)]
pub struct FlowState {
    values: HashMap<String, Value>,
}

impl FlowState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value under `key`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Reads a value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Reads a value deserialized to a concrete type.
    pub fn get_as<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values.get(key).and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Shared handle to a conversation state, passed into handlers.
pub type SharedState = Arc<Mutex<FlowState>>;

/// Wraps a fresh state for sharing.
pub fn shared_state() -> SharedState {
    Arc::new(Mutex::new(FlowState::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut state = FlowState::new();
        assert!(state.is_empty());

        state.set("name", "Ana");
        state.set("target_language", "es");

        assert_eq!(state.get("name"), Some(&Value::String("Ana".into())));
        assert_eq!(state.get_as::<String>("target_language").as_deref(), Some("es"));
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_set_replaces() {
        let mut state = FlowState::new();
        state.set("name", "Ana");
        state.set("name", "Luis");
        assert_eq!(state.get_as::<String>("name").as_deref(), Some("Luis"));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_get_as_wrong_type() {
        let mut state = FlowState::new();
        state.set("count", 3);
        assert_eq!(state.get_as::<u32>("count"), Some(3));
        assert!(state.get_as::<Vec<String>>("count").is_none());
    }
}
