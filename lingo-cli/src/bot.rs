//! Assembles and runs the voice bot: transport, speech services,
//! pipeline, and conversation flow.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use lingo_core::{AppConfig, Language, Message};
use lingo_flows::{FlowConfig, FlowManager, PromptLoader, profile};
use lingo_pipeline::stages::SharedTools;
use lingo_pipeline::{
    ContextAggregator, Frame, LlmContext, LlmStage, Pipeline, PipelineParams, PipelineRunner,
    PipelineTask, SharedContext, SttStage, TransportOutput, TtsStage,
};
use lingo_services::{
    BoxedLlm, BoxedStt, BoxedTts, CartesiaStt, CartesiaTts, GoogleLlm, MarkdownTextFilter,
};
use lingo_transport::{
    ConnectParams, RoomEvent, RoomSession, RoomTransport, TransportType, WebSocketTransport,
};
use tokio::sync::RwLock;
use tokio::sync::mpsc;

const SYSTEM_PROMPT: &str = "You are ConvoLingo, a patient language teacher. \
    Use simple language, speak clearly, and avoid special characters.";

const FALLBACK_GREETING: &str = "Greet the user as ConvoLingo and ask for their name \
    and which language they want to practice.";

pub async fn run_bot(
    config: AppConfig,
    transport_type: TransportType,
    flow_path: Option<PathBuf>,
) -> Result<()> {
    let (url, token) = config.require_room()?;
    tracing::info!(%url, transport = %transport_type, "Joining room");

    let transport = WebSocketTransport::new(transport_type);
    let session: Arc<dyn RoomSession> =
        Arc::from(transport.connect(ConnectParams::new(url, token)).await?);

    let cartesia_key = config.require_cartesia_api_key()?;
    let stt: BoxedStt = Arc::new(CartesiaStt::new(cartesia_key, config.language));
    let tts: BoxedTts = Arc::new(
        CartesiaTts::new(cartesia_key, &config.voice_id, config.language)
            .with_filter(MarkdownTextFilter::new()),
    );
    let llm: BoxedLlm = Arc::new(GoogleLlm::new(config.require_google_api_key()?));

    let aggregator =
        ContextAggregator::new(LlmContext::with_messages(vec![Message::system(SYSTEM_PROMPT)]));
    let tools: SharedTools = Arc::new(RwLock::new(Vec::new()));

    let pipeline = Pipeline::new(vec![
        Box::new(SttStage::new(stt)),
        Box::new(aggregator.user()),
        Box::new(LlmStage::new(llm).with_tools(tools.clone())),
        Box::new(TtsStage::new(tts)),
        Box::new(TransportOutput::new(session.clone())),
        Box::new(aggregator.assistant()),
    ]);

    let params = PipelineParams::new()
        .with_interruptions(true)
        .with_metrics()
        .with_usage_metrics()
        .with_initial_ttfb_only();
    let task = PipelineTask::new(pipeline, params);

    let flow = load_flow(flow_path, config.language).map(|flow_config| {
        FlowManager::new(task.clone(), aggregator.context(), tools.clone())
            .with_config(flow_config)
            // Code-built nodes call the handler by the function name;
            // exported JSON references it as __function__:set_profile.
            .with_handler(profile::COLLECT_PROFILE, profile::collect_profile_handler())
            .with_handler("set_profile", profile::collect_profile_handler())
    });
    if flow.is_some() {
        tracing::info!("ConvoLingo flow manager initialized");
    }

    let sink = task
        .take_sink()
        .await
        .context("pipeline sink already taken")?;
    let bridge = tokio::spawn(bridge_events(
        session.clone(),
        task.clone(),
        aggregator.context(),
        flow,
        sink,
    ));

    let runner = PipelineRunner::new();
    let result = runner.run(&task).await;

    bridge.abort();
    session.close().await.ok();
    tracing::info!("ConvoLingo bot finished");
    result.map_err(Into::into)
}

/// Loads the flow configuration.
///
/// An explicit `--flow` file wins; a broken file degrades to flowless
/// operation (the bot still greets) instead of refusing to start.
/// Otherwise the flow is built in code with prompts for the practice
/// language from the `prompts/` directory, falling back to the bundled
/// English flow when those files are missing.
fn load_flow(flow_path: Option<PathBuf>, language: Language) -> Option<FlowConfig> {
    match flow_path {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => match FlowConfig::from_json(&json) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::error!("Failed to parse flow config {}: {e}", path.display());
                    None
                }
            },
            Err(e) => {
                tracing::error!("Failed to read flow config {}: {e}", path.display());
                None
            }
        },
        None => {
            let loader = PromptLoader::new("prompts");
            let prompts = loader
                .load(language, "v1", "role")
                .and_then(|role| Ok((role, loader.load(language, "v1", "initial")?)));
            match prompts {
                Ok((role, task)) => {
                    let mut nodes = std::collections::HashMap::new();
                    nodes.insert("initial".to_string(), profile::initial_node(role, task));
                    nodes.insert("end".to_string(), profile::end_node());
                    Some(FlowConfig { initial_node: "initial".to_string(), nodes })
                }
                Err(e) => {
                    tracing::warn!("Prompt files unavailable ({e}), using bundled flow");
                    Some(FlowConfig::hello_world())
                }
            }
        }
    }
}

/// Feeds room events into the pipeline and routes pipeline output back:
/// function calls go to the flow manager, the first participant starts
/// the conversation, the last one ends it.
async fn bridge_events(
    session: Arc<dyn RoomSession>,
    task: PipelineTask,
    context: SharedContext,
    mut flow: Option<FlowManager>,
    mut sink: mpsc::UnboundedReceiver<Frame>,
) {
    let mut greeted = false;

    loop {
        tokio::select! {
            event = session.next_event() => match event {
                Some(Ok(event)) => {
                    if handle_room_event(event, &task, &context, &mut flow, &mut greeted)
                        .await
                        .is_break()
                    {
                        break;
                    }
                }
                Some(Err(e)) => tracing::error!("Room event error: {e}"),
                None => {
                    tracing::info!("Room connection closed");
                    let _ = task.queue_frame(Frame::End).await;
                    break;
                }
            },
            frame = sink.recv() => match frame {
                Some(Frame::FunctionCall { name, arguments }) => {
                    if let Some(flow) = flow.as_mut() {
                        if let Err(e) = flow.handle_function_call(&name, arguments).await {
                            tracing::error!("Flow handler failed for '{name}': {e}");
                        }
                    } else {
                        tracing::warn!("Function call '{name}' with no flow manager");
                    }
                }
                Some(_) => {}
                None => break,
            },
        }
    }
}

async fn handle_room_event(
    event: RoomEvent,
    task: &PipelineTask,
    context: &SharedContext,
    flow: &mut Option<FlowManager>,
    greeted: &mut bool,
) -> std::ops::ControlFlow<()> {
    use std::ops::ControlFlow;

    match event {
        RoomEvent::Joined { room_id, .. } => {
            tracing::info!(%room_id, "Bot joined room");
        }
        RoomEvent::ParticipantJoined { participant_id, .. } if !*greeted => {
            *greeted = true;
            tracing::info!(%participant_id, "First participant joined");
            match flow.as_mut() {
                Some(flow) => {
                    if let Err(e) = flow.initialize().await {
                        tracing::error!("Failed to start flow: {e}");
                    }
                }
                None => {
                    let messages = {
                        let mut context = context.lock().await;
                        context.push(Message::system(FALLBACK_GREETING));
                        context.messages()
                    };
                    let _ = task.queue_frame(Frame::LlmMessages(messages)).await;
                }
            }
        }
        RoomEvent::ParticipantJoined { .. } => {}
        RoomEvent::ParticipantLeft { participant_id } => {
            tracing::info!(%participant_id, "Participant left, stopping");
            let _ = task.cancel().await;
            return ControlFlow::Break(());
        }
        RoomEvent::Audio { audio, sample_rate, .. } => {
            let _ = task.queue_frame(Frame::AudioIn { audio, sample_rate }).await;
        }
        RoomEvent::SpeechStarted { .. } => {
            let _ = task.queue_frame(Frame::UserStartedSpeaking).await;
        }
        RoomEvent::SpeechStopped { .. } => {
            let _ = task.queue_frame(Frame::UserStoppedSpeaking).await;
        }
        RoomEvent::Transcription { text, is_final, .. } => {
            let _ = task.queue_frame(Frame::Transcription { text, is_final }).await;
        }
        RoomEvent::Error { message, code } => {
            tracing::error!(?code, "Room error: {message}");
        }
        RoomEvent::Left { reason } => {
            tracing::info!(?reason, "Room session ended");
            let _ = task.queue_frame(Frame::End).await;
            return ControlFlow::Break(());
        }
        RoomEvent::Unknown => {}
    }
    ControlFlow::Continue(())
}
