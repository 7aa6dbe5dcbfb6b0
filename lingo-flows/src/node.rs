//! Flow node configuration.

use lingo_core::Message;
use lingo_services::ToolDefinition;
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_true() -> bool {
    true
}

/// What happens after a node's response completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PostAction {
    /// End the conversation and stop the pipeline.
    EndConversation,
}

/// A function the language model may call while a node is active.
///
/// The same shape appears inline in Rust-built nodes and in exported
/// flow JSON, where `handler` carries a `__function__:name` reference
/// resolved against the manager's handler registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSchema {
    /// Function name the model calls.
    pub name: String,
    /// Description shown to the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the argument object's properties.
    #[serde(default)]
    pub properties: Value,
    /// Argument names the model must supply.
    #[serde(default)]
    pub required: Vec<String>,
    /// Handler reference (`__function__:name`) for JSON-defined flows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    /// Node to move to after the handler runs, unless the handler
    /// picks its own transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_to: Option<String>,
}

impl FunctionSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            properties: Value::Null,
            required: Vec::new(),
            handler: None,
            transition_to: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Sets the JSON Schema properties for the arguments.
    pub fn with_properties(mut self, properties: Value) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_required(mut self, required: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.required = required.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_transition_to(mut self, node: impl Into<String>) -> Self {
        self.transition_to = Some(node.into());
        self
    }

    /// The handler name this schema resolves to: the `__function__:`
    /// reference when present, otherwise the function's own name.
    pub fn handler_name(&self) -> &str {
        match self.handler.as_deref() {
            Some(reference) => reference.strip_prefix("__function__:").unwrap_or(reference),
            None => &self.name,
        }
    }

    /// The tool definition advertised to the language model.
    pub fn to_tool(&self) -> ToolDefinition {
        let mut tool = ToolDefinition::new(&self.name);
        if let Some(desc) = &self.description {
            tool = tool.with_description(desc);
        }
        if !self.properties.is_null() {
            tool = tool.with_parameters(serde_json::json!({
                "type": "object",
                "properties": self.properties,
                "required": self.required,
            }));
        }
        tool
    }
}

/// One node of a conversation flow.
///
/// A node contributes messages to the conversation context, declares the
/// functions the model may call while it is active, and says what
/// happens once its response is done.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Node name, used by named transitions and log output.
    #[serde(default)]
    pub name: String,
    /// Persona messages, applied only when this is the first node.
    #[serde(default)]
    pub role_messages: Vec<Message>,
    /// Task messages appended to the context when the node activates.
    #[serde(default)]
    pub task_messages: Vec<Message>,
    /// Functions available to the model while this node is active.
    #[serde(default)]
    pub functions: Vec<FunctionSchema>,
    /// Whether activating the node immediately triggers a completion.
    #[serde(default = "default_true")]
    pub respond_immediately: bool,
    /// Actions run after the node's response completes.
    #[serde(default)]
    pub post_actions: Vec<PostAction>,
}

impl NodeConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role_messages: Vec::new(),
            task_messages: Vec::new(),
            functions: Vec::new(),
            respond_immediately: true,
            post_actions: Vec::new(),
        }
    }

    pub fn with_role_messages(mut self, messages: Vec<Message>) -> Self {
        self.role_messages = messages;
        self
    }

    pub fn with_task_messages(mut self, messages: Vec<Message>) -> Self {
        self.task_messages = messages;
        self
    }

    pub fn with_function(mut self, function: FunctionSchema) -> Self {
        self.functions.push(function);
        self
    }

    pub fn with_respond_immediately(mut self, respond: bool) -> Self {
        self.respond_immediately = respond;
        self
    }

    pub fn with_post_action(mut self, action: PostAction) -> Self {
        self.post_actions.push(action);
        self
    }
}
