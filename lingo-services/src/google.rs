//! Google language model service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use lingo_core::{LingoError, Message, Result};

use crate::service::{LlmChunk, LlmService, LlmStream, ToolDefinition};

const GOOGLE_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default conversation model.
pub const DEFAULT_LLM_MODEL: &str = "gemini-2.0-flash";

// ── Wire types ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<WireTools>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<WirePart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<WireFunctionCall>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireTools {
    function_declarations: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

#[derive(Debug, Deserialize)]
struct WireCandidate {
    content: Option<WireContent>,
}

// ── Service ─────────────────────────────────────────────────────────────

/// Chat completion backed by Google's generative language API.
pub struct GoogleLlm {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GoogleLlm {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_LLM_MODEL.to_string(),
        }
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Build the wire request from a conversation.
    ///
    /// System messages become the request-level system instruction; the
    /// assistant role maps to the wire's "model" role.
    fn build_request(messages: &[Message], tools: &[ToolDefinition]) -> GenerateContentRequest {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();

        for message in messages {
            match message.role.as_str() {
                "system" => {
                    system_parts.push(WirePart {
                        text: Some(message.content.clone()),
                        function_call: None,
                    });
                }
                role => {
                    let wire_role = if role == "assistant" { "model" } else { "user" };
                    contents.push(WireContent {
                        role: Some(wire_role.to_string()),
                        parts: vec![WirePart {
                            text: Some(message.content.clone()),
                            function_call: None,
                        }],
                    });
                }
            }
        }

        let system_instruction = if system_parts.is_empty() {
            None
        } else {
            Some(WireContent { role: None, parts: system_parts })
        };

        let tools = if tools.is_empty() {
            None
        } else {
            let declarations = tools
                .iter()
                .map(|t| {
                    json!({
                        "name": t.name,
                        "description": t.description.clone().unwrap_or_default(),
                        "parameters": t.parameters.clone().unwrap_or_else(
                            || json!({ "type": "object", "properties": {} }),
                        ),
                    })
                })
                .collect();
            Some(vec![WireTools { function_declarations: declarations }])
        };

        GenerateContentRequest { contents, system_instruction, tools }
    }
}

#[async_trait]
impl LlmService for GoogleLlm {
    fn name(&self) -> &str {
        "google"
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<LlmStream> {
        let request = Self::build_request(messages, tools);
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            GOOGLE_API_BASE, self.model, self.api_key
        );

        tracing::debug!(model = %self.model, turns = messages.len(), "LLM request");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LingoError::service(format!("LLM request error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(LingoError::service(format!("LLM API error {}: {}", status, detail)));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LingoError::service(format!("LLM response error: {}", e)))?;

        let parts = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default();

        let stream = async_stream::stream! {
            for part in parts {
                if let Some(text) = part.text {
                    yield Ok(LlmChunk::Text(text));
                }
                if let Some(call) = part.function_call {
                    yield Ok(LlmChunk::FunctionCall { name: call.name, arguments: call.args });
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_maps_roles() {
        let messages = vec![
            Message::system("You are a language tutor."),
            Message::user("hola"),
            Message::assistant("¡Hola! ¿Cómo estás?"),
        ];

        let request = GoogleLlm::build_request(&messages, &[]);

        let system = request.system_instruction.unwrap();
        assert_eq!(system.parts[0].text.as_deref(), Some("You are a language tutor."));

        assert_eq!(request.contents.len(), 2);
        assert_eq!(request.contents[0].role.as_deref(), Some("user"));
        assert_eq!(request.contents[1].role.as_deref(), Some("model"));
        assert!(request.tools.is_none());
    }

    #[test]
    fn test_build_request_includes_tool_declarations() {
        let tools = vec![
            ToolDefinition::new("record_favorite_color")
                .with_description("Store the user's favorite color"),
        ];
        let request = GoogleLlm::build_request(&[Message::user("azul")], &tools);

        let wire_tools = request.tools.unwrap();
        let decl = &wire_tools[0].function_declarations[0];
        assert_eq!(decl.get("name").unwrap(), "record_favorite_color");
        // A missing schema still produces a valid empty object schema.
        assert!(decl.get("parameters").unwrap().get("properties").is_some());
    }

    #[test]
    fn test_request_serialization_is_camel_case() {
        let request = GoogleLlm::build_request(
            &[Message::system("sys"), Message::user("hi")],
            &[ToolDefinition::new("t")],
        );
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("systemInstruction"));
        assert!(json.contains("functionDeclarations"));
    }

    #[test]
    fn test_response_parsing_with_function_call() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "Let me note that." },
                        { "functionCall": { "name": "record_favorite_color", "args": { "color": "azul" } } }
                    ]
                }
            }]
        }"#;

        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let parts = parsed.candidates[0].content.as_ref().unwrap();
        assert_eq!(parts.parts.len(), 2);
        assert_eq!(parts.parts[1].function_call.as_ref().unwrap().name, "record_favorite_color");
    }
}
