//! # lingo-flows
//!
//! Conversation flows for the ConvoLingo voice agent.
//!
//! ## Overview
//!
//! A flow is a graph of [`NodeConfig`]s. Each node contributes messages
//! to the conversation context, declares the functions the model may
//! call, and names what happens when its response completes. The
//! [`FlowManager`] walks the graph over a running pipeline: it swaps
//! tools, queues completions, and routes function calls to registered
//! handlers.
//!
//! Flows come from two places:
//!
//! - built in code, like the bundled [`profile`] flow;
//! - exported JSON ([`FlowConfig`]), where handlers are referenced as
//!   `__function__:name` and resolved against the registry.
//!
//! ## Example
//!
//! ```rust,ignore
//! use lingo_flows::{FlowConfig, FlowManager, profile};
//!
//! let mut flow = FlowManager::new(task, aggregator.context(), tools)
//!     .with_config(FlowConfig::hello_world())
//!     .with_handler("set_profile", profile::collect_profile_handler());
//!
//! flow.initialize().await?;
//! // later, when the pipeline surfaces a function call:
//! flow.handle_function_call("collect_profile", arguments).await?;
//! ```
//!
//! [`PromptLoader`] reads versioned per-language prompt files, so the
//! greeting a node sends can follow the learner's practice language.

pub mod config;
pub mod handler;
pub mod manager;
pub mod node;
pub mod profile;
pub mod prompts;
pub mod state;

pub use config::FlowConfig;
pub use handler::{FlowHandler, HandlerRegistry, Transition, handler};
pub use manager::FlowManager;
pub use node::{FunctionSchema, NodeConfig, PostAction};
pub use prompts::PromptLoader;
pub use state::{FlowState, SharedState, shared_state};
