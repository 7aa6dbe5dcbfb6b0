//! Static flow configuration loaded from JSON.
//!
//! A flow editor exports the whole conversation graph as one JSON
//! document: named nodes plus the name of the node to start on.
//! Handlers appear as `__function__:name` references, resolved against
//! the manager's handler registry at call time.

use std::collections::HashMap;

use lingo_core::{LingoError, Result};
use serde::{Deserialize, Serialize};

use crate::node::NodeConfig;

/// The bundled learner-profile flow: greet, collect name and practice
/// language through `collect_profile`, then thank and end.
const HELLO_WORLD_JSON: &str = include_str!("../flows/hello_world.json");

/// A complete conversation flow as exported by a flow editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Name of the node the conversation starts on.
    pub initial_node: String,
    /// All nodes, keyed by name.
    pub nodes: HashMap<String, NodeConfig>,
}

impl FlowConfig {
    /// Parses and validates a flow document.
    ///
    /// Node names come from the map keys; an explicit `name` field
    /// inside a node is overwritten so the two can never disagree.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: FlowConfig = serde_json::from_str(json)?;

        for (name, node) in config.nodes.iter_mut() {
            node.name = name.clone();
        }
        config.validate()?;
        Ok(config)
    }

    /// The bundled learner-profile flow.
    pub fn hello_world() -> Self {
        Self::from_json(HELLO_WORLD_JSON)
            .unwrap_or_else(|e| panic!("bundled flow config is invalid: {e}"))
    }

    /// Looks up a node by name.
    pub fn node(&self, name: &str) -> Result<&NodeConfig> {
        self.nodes
            .get(name)
            .ok_or_else(|| LingoError::flow(format!("flow has no node named '{name}'")))
    }

    fn validate(&self) -> Result<()> {
        self.node(&self.initial_node)?;
        for node in self.nodes.values() {
            for function in &node.functions {
                if let Some(target) = &function.transition_to {
                    if !self.nodes.contains_key(target) {
                        return Err(LingoError::flow(format!(
                            "function '{}' in node '{}' transitions to unknown node '{target}'",
                            function.name, node.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_flow_is_valid() {
        let config = FlowConfig::hello_world();
        assert_eq!(config.initial_node, "initial");

        let initial = config.node("initial").unwrap();
        assert_eq!(initial.functions.len(), 1);
        assert_eq!(initial.functions[0].name, "collect_profile");
        assert_eq!(initial.functions[0].handler_name(), "set_profile");
        assert_eq!(initial.functions[0].transition_to.as_deref(), Some("end"));

        let end = config.node("end").unwrap();
        assert!(!end.post_actions.is_empty());
    }

    #[test]
    fn test_node_names_come_from_keys() {
        let config = FlowConfig::from_json(
            r#"{"initial_node": "start", "nodes": {"start": {"name": "wrong"}}}"#,
        )
        .unwrap();
        assert_eq!(config.node("start").unwrap().name, "start");
    }

    #[test]
    fn test_missing_initial_node_rejected() {
        let err = FlowConfig::from_json(r#"{"initial_node": "start", "nodes": {}}"#).unwrap_err();
        assert!(err.to_string().contains("start"));
    }

    #[test]
    fn test_dangling_transition_rejected() {
        let json = r#"{
            "initial_node": "start",
            "nodes": {
                "start": {
                    "functions": [{"name": "go", "transition_to": "nowhere"}]
                }
            }
        }"#;
        let err = FlowConfig::from_json(json).unwrap_err();
        assert!(err.to_string().contains("nowhere"));
    }
}
