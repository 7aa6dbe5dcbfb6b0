//! The flow manager that drives a conversation through its nodes.

use lingo_core::{LingoError, Result};
use lingo_pipeline::{Frame, PipelineTask, SharedContext};
use lingo_pipeline::stages::SharedTools;
use serde_json::Value;

use crate::config::FlowConfig;
use crate::handler::{FlowHandler, HandlerRegistry, Transition};
use crate::node::{NodeConfig, PostAction};
use crate::state::{SharedState, shared_state};

/// Moves a conversation through the nodes of a flow.
///
/// The manager owns the glue between a flow definition and a running
/// pipeline: activating a node appends its messages to the shared LLM
/// context, swaps the advertised tools, and (by default) queues a
/// completion so the bot speaks. Function calls surfaced by the
/// pipeline come back through [`handle_function_call`], which runs the
/// registered handler and applies whatever transition it returns.
///
/// [`handle_function_call`]: FlowManager::handle_function_call
pub struct FlowManager {
    task: PipelineTask,
    context: SharedContext,
    tools: SharedTools,
    registry: HandlerRegistry,
    config: Option<FlowConfig>,
    state: SharedState,
    current: Option<NodeConfig>,
    started: bool,
}

impl FlowManager {
    /// Creates a manager bound to a running pipeline.
    ///
    /// `context` must be the same context the pipeline's aggregators
    /// use, and `tools` the same list its LLM stage reads, otherwise
    /// node changes never reach the model.
    pub fn new(task: PipelineTask, context: SharedContext, tools: SharedTools) -> Self {
        Self {
            task,
            context,
            tools,
            registry: HandlerRegistry::new(),
            config: None,
            state: shared_state(),
            current: None,
            started: false,
        }
    }

    /// Attaches a static flow configuration for named transitions and
    /// [`initialize`](FlowManager::initialize).
    pub fn with_config(mut self, config: FlowConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Registers a handler under `name`.
    pub fn with_handler(mut self, name: impl Into<String>, handler: FlowHandler) -> Self {
        self.registry.register(name, handler);
        self
    }

    /// The conversation state handlers read and write.
    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    /// The node the conversation is currently on.
    pub fn current_node(&self) -> Option<&NodeConfig> {
        self.current.as_ref()
    }

    /// Starts the flow on the configured initial node.
    pub async fn initialize(&mut self) -> Result<()> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| LingoError::flow("initialize requires a flow configuration"))?;
        let initial = config.node(&config.initial_node)?.clone();
        self.set_node(initial).await
    }

    /// Starts the flow on an explicitly built node.
    pub async fn initialize_with(&mut self, node: NodeConfig) -> Result<()> {
        self.set_node(node).await
    }

    /// Activates a node: context messages, tools, and (when the node
    /// responds immediately) a queued completion.
    pub async fn set_node(&mut self, node: NodeConfig) -> Result<()> {
        tracing::info!(node = %node.name, "Activating flow node");

        let messages = {
            let mut context = self.context.lock().await;
            if !self.started {
                context.extend(node.role_messages.clone());
            }
            context.extend(node.task_messages.clone());
            context.messages()
        };
        self.started = true;

        *self.tools.write().await = node.functions.iter().map(|f| f.to_tool()).collect();

        if node.respond_immediately {
            self.task.queue_frame(Frame::LlmMessages(messages)).await?;
        }

        for action in &node.post_actions {
            match action {
                PostAction::EndConversation => {
                    tracing::info!("Flow reached end of conversation");
                    self.task.queue_frame(Frame::End).await?;
                }
            }
        }

        self.current = Some(node);
        Ok(())
    }

    /// Runs the handler for a function call surfaced by the pipeline
    /// and applies the resulting transition.
    pub async fn handle_function_call(&mut self, name: &str, args: Value) -> Result<()> {
        let schema = self
            .current
            .as_ref()
            .and_then(|node| node.functions.iter().find(|f| f.name == name))
            .cloned()
            .ok_or_else(|| {
                LingoError::flow(format!("current node declares no function '{name}'"))
            })?;

        let handler = self.registry.resolve(schema.handler_name())?.clone();
        let (result, transition) = handler(args, self.state.clone()).await?;
        tracing::debug!(function = name, %result, "Flow handler completed");

        match transition {
            Transition::Node(node) => self.set_node(node).await,
            Transition::Named(target) => self.set_named_node(&target).await,
            Transition::Stay => match schema.transition_to {
                Some(target) => self.set_named_node(&target).await,
                None => Ok(()),
            },
        }
    }

    async fn set_named_node(&mut self, name: &str) -> Result<()> {
        let node = self
            .config
            .as_ref()
            .ok_or_else(|| {
                LingoError::flow(format!(
                    "transition to '{name}' requires a flow configuration"
                ))
            })?
            .node(name)?
            .clone();
        self.set_node(node).await
    }
}

impl std::fmt::Debug for FlowManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowManager")
            .field("current", &self.current.as_ref().map(|n| n.name.as_str()))
            .field("registry", &self.registry)
            .finish()
    }
}
