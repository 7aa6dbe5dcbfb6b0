//! Scripted in-memory services for tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use lingo_core::{Message, Result};

use crate::service::{LlmChunk, LlmService, LlmStream, SttService, ToolDefinition, TtsService};

/// STT that replays scripted transcripts and records received audio.
pub struct MockStt {
    transcripts: Mutex<VecDeque<String>>,
    received: Mutex<Vec<Vec<u8>>>,
}

impl MockStt {
    pub fn new() -> Self {
        Self { transcripts: Mutex::new(VecDeque::new()), received: Mutex::new(Vec::new()) }
    }

    /// Queue a transcript to return from the next `finalize` call.
    pub fn with_transcript(mut self, text: impl Into<String>) -> Self {
        self.transcripts.get_mut().push_back(text.into());
        self
    }

    /// Audio chunks pushed so far.
    pub async fn received(&self) -> Vec<Vec<u8>> {
        self.received.lock().await.clone()
    }
}

impl Default for MockStt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SttService for MockStt {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send_audio(&self, audio: &[u8]) -> Result<()> {
        self.received.lock().await.push(audio.to_vec());
        Ok(())
    }

    async fn finalize(&self) -> Result<Option<String>> {
        Ok(self.transcripts.lock().await.pop_front())
    }
}

/// TTS that returns the text bytes as fake audio.
pub struct MockTts {
    requests: Mutex<Vec<String>>,
    sample_rate: u32,
}

impl MockTts {
    pub fn new() -> Self {
        Self { requests: Mutex::new(Vec::new()), sample_rate: 24_000 }
    }

    /// Texts synthesized so far.
    pub async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}

impl Default for MockTts {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TtsService for MockTts {
    fn name(&self) -> &str {
        "mock"
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        self.requests.lock().await.push(text.to_string());
        Ok(text.as_bytes().to_vec())
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// LLM that replays scripted chunk sequences, one per `generate` call.
pub struct MockLlm {
    responses: Mutex<VecDeque<Vec<LlmChunk>>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl MockLlm {
    pub fn new() -> Self {
        Self { responses: Mutex::new(VecDeque::new()), requests: Mutex::new(Vec::new()) }
    }

    /// Queue a full response for the next `generate` call.
    pub fn with_response(mut self, chunks: Vec<LlmChunk>) -> Self {
        self.responses.get_mut().push_back(chunks);
        self
    }

    /// Queue a plain text response.
    pub fn with_text_response(self, text: impl Into<String>) -> Self {
        self.with_response(vec![LlmChunk::Text(text.into())])
    }

    /// Conversations passed to `generate` so far.
    pub async fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().await.clone()
    }
}

impl Default for MockLlm {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmService for MockLlm {
    fn name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        "mock-model"
    }

    async fn generate(&self, messages: &[Message], _tools: &[ToolDefinition]) -> Result<LlmStream> {
        self.requests.lock().await.push(messages.to_vec());

        let chunks = self.responses.lock().await.pop_front().unwrap_or_default();
        let stream = async_stream::stream! {
            for chunk in chunks {
                yield Ok(chunk);
            }
        };
        Ok(Box::pin(stream))
    }
}
