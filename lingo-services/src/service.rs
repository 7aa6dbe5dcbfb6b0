//! Core service trait definitions.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use lingo_core::{Message, Result};

/// Speech-to-text over a single utterance.
///
/// Audio is pushed chunk by chunk as it arrives from the transport;
/// [`finalize`](SttService::finalize) marks the end of the utterance and
/// returns whatever the recognizer heard.
#[async_trait]
pub trait SttService: Send + Sync {
    /// Get the provider name (e.g., "cartesia").
    fn name(&self) -> &str;

    /// Feed a chunk of utterance audio (PCM16, at the service's configured rate).
    async fn send_audio(&self, audio: &[u8]) -> Result<()>;

    /// End the utterance and return the final transcript.
    ///
    /// Returns `None` when no speech was recognized.
    async fn finalize(&self) -> Result<Option<String>>;
}

/// Text-to-speech synthesis.
#[async_trait]
pub trait TtsService: Send + Sync {
    /// Get the provider name (e.g., "cartesia").
    fn name(&self) -> &str;

    /// Synthesize speech for `text` as PCM16 at [`sample_rate`](TtsService::sample_rate).
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;

    /// Sample rate (Hz) of synthesized audio.
    fn sample_rate(&self) -> u32;
}

/// A chunk of language model output.
#[derive(Debug, Clone, PartialEq)]
pub enum LlmChunk {
    /// A piece of response text.
    Text(String),
    /// The model wants a function called.
    FunctionCall {
        /// Function name, matching a registered [`ToolDefinition`].
        name: String,
        /// Arguments as a JSON object.
        arguments: Value,
    },
}

/// A stream of language model output chunks.
pub type LlmStream = Pin<Box<dyn Stream<Item = Result<LlmChunk>> + Send>>;

/// A function the language model may call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: String,
    /// Tool description shown to the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

impl ToolDefinition {
    /// Create a new tool definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), description: None, parameters: None }
    }

    /// Set the tool description.
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Set the parameters schema.
    pub fn with_parameters(mut self, schema: Value) -> Self {
        self.parameters = Some(schema);
        self
    }
}

/// Chat completion against a language model.
#[async_trait]
pub trait LlmService: Send + Sync {
    /// Get the provider name (e.g., "google").
    fn name(&self) -> &str;

    /// Get the model identifier.
    fn model_id(&self) -> &str;

    /// Stream a completion for the conversation so far.
    ///
    /// `tools` lists the functions the model may call this turn; pass an
    /// empty slice for plain text completion.
    async fn generate(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<LlmStream>;
}

/// A shared STT service for thread-safe access.
pub type BoxedStt = std::sync::Arc<dyn SttService>;

/// A shared TTS service for thread-safe access.
pub type BoxedTts = std::sync::Arc<dyn TtsService>;

/// A shared LLM service for thread-safe access.
pub type BoxedLlm = std::sync::Arc<dyn LlmService>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_definition_builder() {
        let tool = ToolDefinition::new("record_favorite_color")
            .with_description("Store the user's favorite color")
            .with_parameters(serde_json::json!({
                "type": "object",
                "properties": { "color": { "type": "string" } },
                "required": ["color"]
            }));

        assert_eq!(tool.name, "record_favorite_color");
        assert!(tool.description.is_some());
        assert!(tool.parameters.unwrap().get("required").is_some());
    }

    #[test]
    fn test_tool_definition_omits_empty_fields() {
        let tool = ToolDefinition::new("noop");
        let json = serde_json::to_string(&tool).unwrap();
        assert_eq!(json, r#"{"name":"noop"}"#);
    }
}
