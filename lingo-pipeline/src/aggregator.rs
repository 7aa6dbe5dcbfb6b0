//! Conversation context and the aggregator stages that maintain it.
//!
//! The user aggregator turns final transcripts into user messages and
//! kicks off a completion; the assistant aggregator collects the
//! response text back into the context once the response is done. Both
//! share one [`LlmContext`] behind a lock, so other components (such as
//! a flow manager) can append messages between turns.

use std::sync::Arc;

use async_trait::async_trait;
use lingo_core::{Message, Result};
use tokio::sync::Mutex;

use crate::frames::{Frame, PipelineParams};
use crate::processor::{FrameProcessor, FrameSink};

/// The running message history for a conversation.
#[derive(Debug, Clone, Default)]
pub struct LlmContext {
    messages: Vec<Message>,
}

impl LlmContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context seeded with messages.
    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Appends a message.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Appends several messages in order.
    pub fn extend(&mut self, messages: Vec<Message>) {
        self.messages.extend(messages);
    }

    /// A snapshot of the history.
    pub fn messages(&self) -> Vec<Message> {
        self.messages.clone()
    }

    /// Number of messages in the history.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Shared handle to a conversation context.
pub type SharedContext = Arc<Mutex<LlmContext>>;

/// Factory for the paired user and assistant aggregator stages.
///
/// Both stages returned by [`user`](ContextAggregator::user) and
/// [`assistant`](ContextAggregator::assistant) operate on the same
/// shared context.
#[derive(Debug, Clone)]
pub struct ContextAggregator {
    context: SharedContext,
}

impl ContextAggregator {
    /// Wraps a context for sharing across stages.
    pub fn new(context: LlmContext) -> Self {
        Self { context: Arc::new(Mutex::new(context)) }
    }

    /// The shared context handle.
    pub fn context(&self) -> SharedContext {
        self.context.clone()
    }

    /// The stage that aggregates user speech into the context.
    pub fn user(&self) -> UserContextAggregator {
        UserContextAggregator { context: self.context.clone() }
    }

    /// The stage that aggregates assistant responses into the context.
    pub fn assistant(&self) -> AssistantContextAggregator {
        AssistantContextAggregator {
            context: self.context.clone(),
            params: PipelineParams::default(),
            buffer: None,
        }
    }
}

/// Appends final transcripts to the context as user messages and emits
/// [`Frame::LlmMessages`] to trigger a completion.
#[derive(Debug)]
pub struct UserContextAggregator {
    context: SharedContext,
}

#[async_trait]
impl FrameProcessor for UserContextAggregator {
    fn name(&self) -> &str {
        "context.user"
    }

    async fn process_frame(&mut self, frame: Frame, sink: &FrameSink) -> Result<()> {
        match frame {
            Frame::Transcription { text, is_final: true } => {
                let messages = {
                    let mut context = self.context.lock().await;
                    context.push(Message::user(&text));
                    context.messages()
                };
                tracing::debug!("User said: {}", text);
                sink.push(Frame::LlmMessages(messages)).await
            }
            other => sink.push(other).await,
        }
    }
}

/// Collects response text between [`Frame::LlmResponseStart`] and
/// [`Frame::LlmResponseEnd`] into one assistant message.
///
/// A response interrupted by user speech is discarded rather than
/// recorded, since the user never heard the rest of it.
#[derive(Debug)]
pub struct AssistantContextAggregator {
    context: SharedContext,
    params: PipelineParams,
    buffer: Option<String>,
}

#[async_trait]
impl FrameProcessor for AssistantContextAggregator {
    fn name(&self) -> &str {
        "context.assistant"
    }

    async fn process_frame(&mut self, frame: Frame, sink: &FrameSink) -> Result<()> {
        match &frame {
            Frame::Start(params) => {
                self.params = params.clone();
            }
            Frame::LlmResponseStart => {
                self.buffer = Some(String::new());
            }
            Frame::LlmText(text) => {
                if let Some(buffer) = self.buffer.as_mut() {
                    buffer.push_str(text);
                }
            }
            Frame::LlmResponseEnd => {
                if let Some(text) = self.buffer.take() {
                    if !text.is_empty() {
                        self.context.lock().await.push(Message::assistant(&text));
                    }
                }
            }
            Frame::UserStartedSpeaking => {
                if self.params.allow_interruptions && self.buffer.take().is_some() {
                    tracing::debug!("Discarding interrupted response");
                }
            }
            _ => {}
        }
        sink.push(frame).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn sink() -> (FrameSink, mpsc::Receiver<Frame>) {
        let (tx, rx) = mpsc::channel(16);
        (FrameSink::new(tx), rx)
    }

    #[tokio::test]
    async fn test_user_aggregator_builds_context() {
        let aggregator =
            ContextAggregator::new(LlmContext::with_messages(vec![Message::system("teach")]));
        let mut user = aggregator.user();
        let (sink, mut rx) = sink();

        user.process_frame(
            Frame::Transcription { text: "hola".into(), is_final: true },
            &sink,
        )
        .await
        .unwrap();

        match rx.recv().await {
            Some(Frame::LlmMessages(messages)) => {
                assert_eq!(messages.len(), 2);
                assert_eq!(messages[1].role, "user");
                assert_eq!(messages[1].content, "hola");
            }
            other => panic!("Expected LlmMessages, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_interim_transcripts_pass_through() {
        let aggregator = ContextAggregator::new(LlmContext::new());
        let mut user = aggregator.user();
        let (sink, mut rx) = sink();

        user.process_frame(
            Frame::Transcription { text: "ho".into(), is_final: false },
            &sink,
        )
        .await
        .unwrap();

        assert!(matches!(rx.recv().await, Some(Frame::Transcription { is_final: false, .. })));
        assert!(aggregator.context().lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_assistant_aggregator_records_response() {
        let aggregator = ContextAggregator::new(LlmContext::new());
        let mut assistant = aggregator.assistant();
        let (sink, _rx) = sink();

        assistant.process_frame(Frame::LlmResponseStart, &sink).await.unwrap();
        assistant.process_frame(Frame::LlmText("Buenos ".into()), &sink).await.unwrap();
        assistant.process_frame(Frame::LlmText("días".into()), &sink).await.unwrap();
        assistant.process_frame(Frame::LlmResponseEnd, &sink).await.unwrap();

        let context = aggregator.context();
        let messages = context.lock().await.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "assistant");
        assert_eq!(messages[0].content, "Buenos días");
    }

    #[tokio::test]
    async fn test_interrupted_response_is_discarded() {
        let aggregator = ContextAggregator::new(LlmContext::new());
        let mut assistant = aggregator.assistant();
        let (sink, _rx) = sink();

        assistant.process_frame(Frame::LlmResponseStart, &sink).await.unwrap();
        assistant.process_frame(Frame::LlmText("Como te".into()), &sink).await.unwrap();
        assistant.process_frame(Frame::UserStartedSpeaking, &sink).await.unwrap();
        assistant.process_frame(Frame::LlmResponseEnd, &sink).await.unwrap();

        assert!(aggregator.context().lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_interruptions_disabled_keeps_response() {
        let aggregator = ContextAggregator::new(LlmContext::new());
        let mut assistant = aggregator.assistant();
        let (sink, _rx) = sink();

        let params = PipelineParams::new().with_interruptions(false);
        assistant.process_frame(Frame::Start(params), &sink).await.unwrap();
        assistant.process_frame(Frame::LlmResponseStart, &sink).await.unwrap();
        assistant.process_frame(Frame::LlmText("Sigo hablando".into()), &sink).await.unwrap();
        assistant.process_frame(Frame::UserStartedSpeaking, &sink).await.unwrap();
        assistant.process_frame(Frame::LlmResponseEnd, &sink).await.unwrap();

        let context = aggregator.context();
        let messages = context.lock().await.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "Sigo hablando");
    }

    #[tokio::test]
    async fn test_empty_response_not_recorded() {
        let aggregator = ContextAggregator::new(LlmContext::new());
        let mut assistant = aggregator.assistant();
        let (sink, _rx) = sink();

        assistant.process_frame(Frame::LlmResponseStart, &sink).await.unwrap();
        assistant.process_frame(Frame::LlmResponseEnd, &sink).await.unwrap();

        assert!(aggregator.context().lock().await.is_empty());
    }
}
