//! The built-in learner-profile flow, expressed in Rust.
//!
//! Two nodes: greet and collect the learner's name plus practice
//! language through one function call, then thank them and end. The
//! JSON-defined equivalent ships as the bundled
//! [`FlowConfig::hello_world`](crate::FlowConfig::hello_world) flow;
//! this module is the same conversation for callers that prefer to
//! build nodes in code with prompts loaded per language.

use lingo_core::Message;
use serde_json::Value;

use crate::handler::{FlowHandler, Transition, handler};
use crate::node::{FunctionSchema, NodeConfig, PostAction};

/// Name of the profile-collection function advertised to the model.
pub const COLLECT_PROFILE: &str = "collect_profile";

/// The schema for the profile-collection function.
pub fn collect_profile_schema() -> FunctionSchema {
    FunctionSchema::new(COLLECT_PROFILE)
        .with_description("Record user's name and target language.")
        .with_properties(serde_json::json!({
            "name": { "type": "string" },
            "target_language": { "type": "string" }
        }))
        .with_required(["name", "target_language"])
}

/// Handler that stores the learner's profile and moves to the end node.
///
/// Missing or blank arguments fall back to a friendly default rather
/// than failing the call; the model occasionally omits one.
pub fn collect_profile_handler() -> FlowHandler {
    handler(|args: Value, state| async move {
        let name = non_blank(&args, "name").unwrap_or_else(|| "Friend".to_string());
        let language = non_blank(&args, "target_language").unwrap_or_else(|| "en".to_string());
        tracing::info!(%name, %language, "Captured learner profile");

        {
            let mut state = state.lock().await;
            state.set("name", name.clone());
            state.set("target_language", language.clone());
        }

        Ok((Value::String(format!("{name}:{language}")), Transition::Node(end_node())))
    })
}

fn non_blank(args: &Value, key: &str) -> Option<String> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// The greeting node, with explicit prompt messages.
pub fn initial_node(role_messages: Vec<Message>, task_messages: Vec<Message>) -> NodeConfig {
    NodeConfig::new("initial")
        .with_role_messages(role_messages)
        .with_task_messages(task_messages)
        .with_function(collect_profile_schema().with_transition_to("end"))
}

/// The closing node: thank the learner, confirm the profile, end.
pub fn end_node() -> NodeConfig {
    NodeConfig::new("end")
        .with_task_messages(vec![Message::system(
            "Thank the user for the info. Confirm their name and target language, then end.",
        )])
        .with_post_action(PostAction::EndConversation)
}
