//! End-to-end flow test: greet, collect the profile, end.

use std::sync::Arc;

use lingo_core::Message;
use lingo_flows::{FlowConfig, FlowManager, profile};
use lingo_pipeline::stages::SharedTools;
use lingo_pipeline::{
    ContextAggregator, Frame, LlmContext, LlmStage, Pipeline, PipelineParams, PipelineTask,
};
use lingo_services::{LlmChunk, MockLlm};
use tokio::sync::RwLock;

/// Runs the bundled flow over a real pipeline with a scripted model:
/// the first completion greets and calls `collect_profile`, the second
/// (triggered by the transition to the end node) says goodbye.
#[tokio::test]
async fn test_hello_world_flow_runs_to_completion() {
    let llm = Arc::new(
        MockLlm::new()
            .with_response(vec![
                LlmChunk::Text("Hi! What's your name and which language do you want?".into()),
                LlmChunk::FunctionCall {
                    name: "collect_profile".into(),
                    arguments: serde_json::json!({"name": "Ana", "target_language": "es"}),
                },
            ])
            .with_text_response("Thanks Ana, enjoy practicing Spanish!"),
    );

    let aggregator = ContextAggregator::new(LlmContext::new());
    let tools: SharedTools = Arc::new(RwLock::new(Vec::new()));
    let pipeline = Pipeline::new(vec![
        Box::new(aggregator.user()),
        Box::new(LlmStage::new(llm.clone()).with_tools(tools.clone())),
        Box::new(aggregator.assistant()),
    ]);
    let task = PipelineTask::new(pipeline, PipelineParams::default());
    let mut sink = task.take_sink().await.unwrap();

    let mut flow = FlowManager::new(task.clone(), aggregator.context(), tools.clone())
        .with_config(FlowConfig::hello_world())
        .with_handler("set_profile", profile::collect_profile_handler());

    flow.initialize().await.unwrap();
    assert_eq!(flow.current_node().unwrap().name, "initial");
    assert_eq!(tools.read().await.len(), 1);

    // Drain pipeline output until the model requests the function call.
    let arguments = loop {
        match sink.recv().await.expect("pipeline closed before function call") {
            Frame::FunctionCall { name, arguments } => {
                assert_eq!(name, "collect_profile");
                break arguments;
            }
            _ => continue,
        }
    };

    flow.handle_function_call("collect_profile", arguments).await.unwrap();
    assert_eq!(flow.current_node().unwrap().name, "end");

    // The transition queued the goodbye completion and then ended the
    // conversation, so the pipeline drains on its own.
    let mut goodbye = None;
    while let Some(frame) = sink.recv().await {
        if let Frame::LlmText(text) = frame {
            goodbye = Some(text);
        }
    }
    task.wait().await.unwrap();

    assert_eq!(goodbye.as_deref(), Some("Thanks Ana, enjoy practicing Spanish!"));

    let state = flow.state();
    let state = state.lock().await;
    assert_eq!(state.get_as::<String>("name").as_deref(), Some("Ana"));
    assert_eq!(state.get_as::<String>("target_language").as_deref(), Some("es"));

    // Both completions saw the conversation so far.
    assert_eq!(llm.requests().await.len(), 2);
}

#[tokio::test]
async fn test_flow_without_config_falls_back_to_built_nodes() {
    let llm = Arc::new(MockLlm::new().with_text_response("Hola!"));
    let aggregator = ContextAggregator::new(LlmContext::new());
    let tools: SharedTools = Arc::new(RwLock::new(Vec::new()));
    let pipeline =
        Pipeline::new(vec![Box::new(LlmStage::new(llm).with_tools(tools.clone()))]);
    let task = PipelineTask::new(pipeline, PipelineParams::default());

    let mut flow = FlowManager::new(task.clone(), aggregator.context(), tools);

    // No config attached: initialize() is an error, initialize_with works.
    assert!(flow.initialize().await.is_err());

    let node = profile::initial_node(
        vec![Message::system("You are ConvoLingo.")],
        vec![Message::system("Greet the user.")],
    );
    flow.initialize_with(node).await.unwrap();
    assert_eq!(flow.current_node().unwrap().name, "initial");

    task.cancel().await.unwrap();
    task.wait().await.unwrap();
}
