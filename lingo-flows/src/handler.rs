//! Function-call handlers and the registry that resolves them.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use lingo_core::{LingoError, Result};
use serde_json::Value;

use crate::node::NodeConfig;
use crate::state::SharedState;

/// Where the flow goes after a handler runs.
#[derive(Debug, Clone)]
pub enum Transition {
    /// Move to a node built by the handler.
    Node(NodeConfig),
    /// Move to a node named in the flow configuration.
    Named(String),
    /// Stay on the current node (the schema's `transition_to`, if any,
    /// still applies).
    Stay,
}

/// A function-call handler.
///
/// Receives the model's arguments and the shared conversation state,
/// and returns a result value (echoed into the log) plus the transition
/// to apply.
pub type FlowHandler =
    Arc<dyn Fn(Value, SharedState) -> BoxFuture<'static, Result<(Value, Transition)>> + Send + Sync>;

/// Wraps an async function as a [`FlowHandler`].
///
/// ```rust
/// use lingo_flows::{handler, Transition};
/// use serde_json::Value;
///
/// let collect = handler(|args: Value, state| async move {
///     let name = args["name"].as_str().unwrap_or("Friend").to_string();
///     state.lock().await.set("name", name.clone());
///     Ok((Value::String(name), Transition::Named("end".into())))
/// });
/// ```
pub fn handler<F, Fut>(f: F) -> FlowHandler
where
    F: Fn(Value, SharedState) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(Value, Transition)>> + Send + 'static,
{
    Arc::new(move |args, state| Box::pin(f(args, state)))
}

/// Named handlers available to a flow.
///
/// JSON-defined flows reference handlers as `__function__:name`; the
/// registry is where those names get resolved.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, FlowHandler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, handler: FlowHandler) {
        self.handlers.insert(name.into(), handler);
    }

    /// Looks up a handler, or a flow error naming what is missing.
    pub fn resolve(&self, name: &str) -> Result<&FlowHandler> {
        self.handlers
            .get(name)
            .ok_or_else(|| LingoError::flow(format!("no handler registered for '{name}'")))
    }

    /// Whether a handler is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("HandlerRegistry").field("handlers", &names).finish()
    }
}
