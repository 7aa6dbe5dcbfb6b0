//! Wire events exchanged with a media room.
//!
//! Audio is carried as raw bytes (`Vec<u8>`) internally and base64 on the
//! wire, decoded at the transport boundary so consumers never deal with
//! encoding.

use base64::Engine;
use serde::{Deserialize, Serialize};

// ── Custom serde for base64-encoded audio ───────────────────────────────

fn deserialize_audio_bytes<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    base64::engine::general_purpose::STANDARD.decode(&s).map_err(serde::de::Error::custom)
}

fn serialize_audio_bytes<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let s = base64::engine::general_purpose::STANDARD.encode(bytes);
    serializer.serialize_str(&s)
}

// ── Client Events ───────────────────────────────────────────────────────

/// Events sent from the agent to the room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// Join the room. Sent once, immediately after the socket opens.
    ///
    /// The token is presented exactly as configured; the room decides
    /// whether it (or an empty string) is acceptable.
    #[serde(rename = "room.join")]
    Join {
        /// Access token for the room.
        token: String,
        /// Media settings the agent wants for this session.
        #[serde(skip_serializing_if = "Option::is_none")]
        media: Option<serde_json::Value>,
    },

    /// A chunk of agent speech for the room to play.
    #[serde(rename = "audio.output")]
    AudioOutput {
        /// Audio data (raw bytes, serialized as base64 on the wire).
        #[serde(
            serialize_with = "serialize_audio_bytes",
            deserialize_with = "deserialize_audio_bytes"
        )]
        audio: Vec<u8>,
        /// Sample rate of the audio in Hz.
        sample_rate: u32,
    },

    /// A text message shown in the room chat.
    #[serde(rename = "text.output")]
    TextOutput {
        /// Message text.
        text: String,
    },

    /// Leave the room gracefully.
    #[serde(rename = "room.leave")]
    Leave,
}

// ── Room Events ─────────────────────────────────────────────────────────

/// Events received from the room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RoomEvent {
    /// The join envelope was accepted.
    #[serde(rename = "room.joined")]
    Joined {
        /// Room identifier assigned by the server.
        room_id: String,
        /// Our participant identifier within the room.
        participant_id: String,
    },

    /// Another participant entered the room.
    #[serde(rename = "participant.joined")]
    ParticipantJoined {
        /// Participant identifier.
        participant_id: String,
        /// Display name, if the room knows one.
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },

    /// A participant left the room.
    #[serde(rename = "participant.left")]
    ParticipantLeft {
        /// Participant identifier.
        participant_id: String,
    },

    /// A chunk of participant audio.
    #[serde(rename = "audio.input")]
    Audio {
        /// Participant the audio came from.
        participant_id: String,
        /// Audio data (raw bytes, serialized as base64 on the wire).
        #[serde(
            serialize_with = "serialize_audio_bytes",
            deserialize_with = "deserialize_audio_bytes"
        )]
        audio: Vec<u8>,
        /// Sample rate of the audio in Hz.
        sample_rate: u32,
    },

    /// VAD detected the start of participant speech.
    ///
    /// Only sent when the session was joined with a VAD configuration.
    #[serde(rename = "vad.started")]
    SpeechStarted {
        /// Participant who started speaking.
        participant_id: String,
    },

    /// VAD detected the end of participant speech.
    #[serde(rename = "vad.stopped")]
    SpeechStopped {
        /// Participant who stopped speaking.
        participant_id: String,
    },

    /// Room-side transcription of participant speech.
    ///
    /// Only sent when the session was joined with
    /// [`TransportParams::transcription_enabled`](crate::TransportParams).
    #[serde(rename = "transcription")]
    Transcription {
        /// Participant who spoke.
        participant_id: String,
        /// Transcribed text.
        text: String,
        /// Whether this is a final transcription or an interim guess.
        #[serde(rename = "final")]
        is_final: bool,
    },

    /// The room reported an error.
    #[serde(rename = "error")]
    Error {
        /// Human-readable error message.
        message: String,
        /// Machine-readable error code, when available.
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },

    /// The room ended the session.
    #[serde(rename = "room.left")]
    Left {
        /// Why the session ended, when the room says.
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// Unknown event type (for forward compatibility).
    #[serde(other)]
    Unknown,
}
