//! Cartesia speech services (STT and TTS).

use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use lingo_core::{Language, LingoError, Result};

use crate::filter::TextFilter;
use crate::service::{SttService, TtsService};

const CARTESIA_API_BASE: &str = "https://api.cartesia.ai";
const CARTESIA_STT_WS: &str = "wss://api.cartesia.ai/stt/websocket";
const CARTESIA_VERSION: &str = "2024-11-13";

/// Default transcription model.
pub const DEFAULT_STT_MODEL: &str = "ink-whisper";

/// Default synthesis model.
pub const DEFAULT_TTS_MODEL: &str = "sonic-2";

/// How long `finalize` waits for the recognizer to flush before giving up.
const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

// ── STT ─────────────────────────────────────────────────────────────────

/// Messages received on the transcription socket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum SttMessage {
    #[serde(rename = "transcript")]
    Transcript { text: String, is_final: bool },
    #[serde(rename = "flush_done")]
    FlushDone,
    #[serde(rename = "done")]
    Done,
    #[serde(rename = "error")]
    Error { message: String },
    #[serde(other)]
    Unknown,
}

/// Streaming speech-to-text over Cartesia's WebSocket API.
///
/// The socket is opened lazily on the first audio chunk and kept across
/// utterances; `finalize` flushes the recognizer without closing it.
pub struct CartesiaStt {
    api_key: String,
    model: String,
    language: Language,
    sample_rate: u32,
    endpoint: String,
    flush_timeout: Duration,
    socket: Mutex<Option<WsStream>>,
}

impl CartesiaStt {
    pub fn new(api_key: impl Into<String>, language: Language) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_STT_MODEL.to_string(),
            language,
            sample_rate: 16_000,
            endpoint: CARTESIA_STT_WS.to_string(),
            flush_timeout: DEFAULT_FLUSH_TIMEOUT,
            socket: Mutex::new(None),
        }
    }

    /// Set the transcription model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the input sample rate.
    pub fn with_sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = rate;
        self
    }

    /// Point the client at a different transcription endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set how long `finalize` waits for the recognizer to flush.
    pub fn with_flush_timeout(mut self, timeout: Duration) -> Self {
        self.flush_timeout = timeout;
        self
    }

    fn endpoint(&self) -> Result<url::Url> {
        let mut url = url::Url::parse(&self.endpoint)
            .map_err(|e| LingoError::service(format!("Invalid STT endpoint: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("model", &self.model)
            .append_pair("language", self.language.code())
            .append_pair("encoding", "pcm_s16le")
            .append_pair("sample_rate", &self.sample_rate.to_string())
            .append_pair("api_key", &self.api_key)
            .append_pair("cartesia_version", CARTESIA_VERSION);
        Ok(url)
    }

    async fn ensure_connected(&self, socket: &mut Option<WsStream>) -> Result<()> {
        if socket.is_some() {
            return Ok(());
        }

        let url = self.endpoint()?;
        tracing::debug!(model = %self.model, language = %self.language, "opening STT socket");

        let (stream, _response) = connect_async(url.as_str())
            .await
            .map_err(|e| LingoError::service(format!("STT connect error: {}", e)))?;
        *socket = Some(stream);
        Ok(())
    }
}

#[async_trait]
impl SttService for CartesiaStt {
    fn name(&self) -> &str {
        "cartesia"
    }

    async fn send_audio(&self, audio: &[u8]) -> Result<()> {
        let mut guard = self.socket.lock().await;
        self.ensure_connected(&mut guard).await?;

        if let Some(stream) = guard.as_mut() {
            stream
                .send(Message::Binary(audio.to_vec()))
                .await
                .map_err(|e| LingoError::service(format!("STT send error: {}", e)))?;
        }
        Ok(())
    }

    async fn finalize(&self) -> Result<Option<String>> {
        let mut guard = self.socket.lock().await;
        let Some(stream) = guard.as_mut() else {
            return Ok(None);
        };

        stream
            .send(Message::Text("finalize".into()))
            .await
            .map_err(|e| LingoError::service(format!("STT finalize error: {}", e)))?;

        let deadline = tokio::time::Instant::now() + self.flush_timeout;
        let mut parts: Vec<String> = Vec::new();
        loop {
            // A quiet socket must not stall the pipeline stage forever.
            let message = match tokio::time::timeout_at(deadline, stream.next()).await {
                Ok(message) => message,
                Err(_) => {
                    *guard = None;
                    return Err(LingoError::service(format!(
                        "STT flush timed out after {:?}",
                        self.flush_timeout
                    )));
                }
            };
            match message {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<SttMessage>(&text) {
                        Ok(SttMessage::Transcript { text, is_final }) => {
                            if is_final && !text.is_empty() {
                                parts.push(text);
                            }
                        }
                        Ok(SttMessage::FlushDone) | Ok(SttMessage::Done) => break,
                        Ok(SttMessage::Error { message }) => {
                            return Err(LingoError::service(format!("STT error: {}", message)));
                        }
                        Ok(SttMessage::Unknown) => {}
                        Err(e) => {
                            return Err(LingoError::service(format!("STT parse error: {}", e)));
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    *guard = None;
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    *guard = None;
                    return Err(LingoError::service(format!("STT receive error: {}", e)));
                }
            }
        }

        let transcript = parts.join(" ");
        Ok(if transcript.is_empty() { None } else { Some(transcript) })
    }
}

// ── TTS ─────────────────────────────────────────────────────────────────

/// Text-to-speech over Cartesia's bytes API.
///
/// Text passes through the configured [`TextFilter`]s before synthesis, so
/// model output with markdown in it does not get read aloud as asterisks.
pub struct CartesiaTts {
    client: reqwest::Client,
    api_key: String,
    model: String,
    voice_id: String,
    language: Language,
    sample_rate: u32,
    filters: Vec<Box<dyn TextFilter>>,
}

impl CartesiaTts {
    pub fn new(api_key: impl Into<String>, voice_id: impl Into<String>, language: Language) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_TTS_MODEL.to_string(),
            voice_id: voice_id.into(),
            language,
            sample_rate: 24_000,
            filters: Vec::new(),
        }
    }

    /// Set the synthesis model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the output sample rate.
    pub fn with_sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = rate;
        self
    }

    /// Add a text filter applied before synthesis.
    pub fn with_filter(mut self, filter: impl TextFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    fn apply_filters(&self, text: &str) -> String {
        let mut out = text.to_string();
        for filter in &self.filters {
            out = filter.filter(&out);
        }
        out
    }
}

#[async_trait]
impl TtsService for CartesiaTts {
    fn name(&self) -> &str {
        "cartesia"
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let transcript = self.apply_filters(text);
        if transcript.trim().is_empty() {
            return Ok(Vec::new());
        }

        let body = json!({
            "model_id": self.model,
            "transcript": transcript,
            "voice": { "mode": "id", "id": self.voice_id },
            "language": self.language.code(),
            "output_format": {
                "container": "raw",
                "encoding": "pcm_s16le",
                "sample_rate": self.sample_rate,
            },
        });

        let response = self
            .client
            .post(format!("{}/tts/bytes", CARTESIA_API_BASE))
            .header("X-API-Key", &self.api_key)
            .header("Cartesia-Version", CARTESIA_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| LingoError::service(format!("TTS request error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(LingoError::service(format!("TTS API error {}: {}", status, detail)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LingoError::service(format!("TTS body error: {}", e)))?;

        Ok(bytes.to_vec())
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
