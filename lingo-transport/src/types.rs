//! Transport selection and configuration types.

use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// How the agent reaches its user.
///
/// The transport kind selects a [`TransportParams`] preset; it does not
/// change the wire protocol, only the media settings negotiated with the
/// room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    /// Hosted media rooms joined with a URL and token.
    #[default]
    Daily,
    /// Telephony bridge (8 kHz audio).
    Twilio,
    /// Peer-to-peer browser connection.
    Webrtc,
}

impl TransportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportType::Daily => "daily",
            TransportType::Twilio => "twilio",
            TransportType::Webrtc => "webrtc",
        }
    }
}

impl std::fmt::Display for TransportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransportType {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(TransportType::Daily),
            "twilio" => Ok(TransportType::Twilio),
            "webrtc" => Ok(TransportType::Webrtc),
            other => Err(TransportError::config(format!("unknown transport type: {other}"))),
        }
    }
}

/// Parameters needed to join a media room: where it is and who we are.
///
/// Both fields are carried verbatim to the transport. No validation or
/// normalization happens here; a room that rejects an empty token reports
/// that through the connection, not through this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectParams {
    /// Room URL to dial.
    pub url: String,
    /// Access token presented in the join envelope.
    pub token: String,
}

impl ConnectParams {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self { url: url.into(), token: token.into() }
    }
}

/// Voice Activity Detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VadConfig {
    /// Silence duration (ms) before considering a turn ended.
    pub stop_ms: u32,
    /// Speech duration (ms) before considering a turn started.
    pub start_ms: u32,
    /// Detection confidence threshold (0.0 - 1.0).
    pub confidence: f32,
    /// Whether user speech interrupts the agent mid-response.
    pub interrupt_on_speech: bool,
}

impl Default for VadConfig {
    fn default() -> Self {
        Self { stop_ms: 800, start_ms: 200, confidence: 0.7, interrupt_on_speech: true }
    }
}

impl VadConfig {
    /// Set the end-of-turn silence duration.
    pub fn with_stop_ms(mut self, ms: u32) -> Self {
        self.stop_ms = ms;
        self
    }

    /// Set whether user speech interrupts the agent.
    pub fn with_interrupt(mut self, interrupt: bool) -> Self {
        self.interrupt_on_speech = interrupt;
        self
    }
}

/// Media settings negotiated when joining a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportParams {
    /// Receive participant audio.
    pub audio_in_enabled: bool,
    /// Send agent audio.
    pub audio_out_enabled: bool,
    /// Sample rate (Hz) of audio received from the room.
    pub audio_in_sample_rate: u32,
    /// Sample rate (Hz) of audio sent to the room.
    pub audio_out_sample_rate: u32,
    /// Ask the room to transcribe participant speech.
    pub transcription_enabled: bool,
    /// Voice activity detection, or `None` for manual turn management.
    pub vad: Option<VadConfig>,
}

impl Default for TransportParams {
    fn default() -> Self {
        Self {
            audio_in_enabled: true,
            audio_out_enabled: true,
            audio_in_sample_rate: 16_000,
            audio_out_sample_rate: 24_000,
            transcription_enabled: false,
            vad: Some(VadConfig::default()),
        }
    }
}

impl TransportParams {
    /// Preset media settings for a transport kind.
    ///
    /// Hosted rooms get room-side transcription; the telephony bridge is
    /// pinned to 8 kHz in both directions.
    pub fn for_transport(transport_type: TransportType) -> Self {
        match transport_type {
            TransportType::Daily => Self { transcription_enabled: true, ..Self::default() },
            TransportType::Twilio => Self {
                audio_in_sample_rate: 8_000,
                audio_out_sample_rate: 8_000,
                ..Self::default()
            },
            TransportType::Webrtc => Self::default(),
        }
    }

    /// Set the VAD configuration.
    pub fn with_vad(mut self, vad: VadConfig) -> Self {
        self.vad = Some(vad);
        self
    }

    /// Disable VAD (manual turn management).
    pub fn without_vad(mut self) -> Self {
        self.vad = None;
        self
    }

    /// Enable or disable room-side transcription.
    pub fn with_transcription(mut self, enabled: bool) -> Self {
        self.transcription_enabled = enabled;
        self
    }

    /// Set the output sample rate.
    pub fn with_audio_out_sample_rate(mut self, rate: u32) -> Self {
        self.audio_out_sample_rate = rate;
        self
    }
}
