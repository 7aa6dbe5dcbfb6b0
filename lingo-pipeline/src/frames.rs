//! Frames are the unit of data flow inside a pipeline.
//!
//! Every processor receives frames from the stage above it and pushes
//! frames to the stage below it. Media frames (audio, text) carry the
//! conversation itself; control frames ([`Frame::Start`], [`Frame::Cancel`],
//! [`Frame::End`]) manage the lifecycle of the pipeline.

use lingo_core::Message;
use serde_json::Value;

/// Runtime parameters for a pipeline, carried by [`Frame::Start`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineParams {
    /// Whether user speech may interrupt an in-progress bot response.
    pub allow_interruptions: bool,
    /// Whether stages report processing metrics (such as time to first
    /// token) through the tracing layer.
    pub enable_metrics: bool,
    /// Whether model usage (token counts) is reported when available.
    pub enable_usage_metrics: bool,
    /// Report only the first time-to-first-byte measurement per session
    /// instead of one per response.
    pub report_only_initial_ttfb: bool,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            allow_interruptions: true,
            enable_metrics: false,
            enable_usage_metrics: false,
            report_only_initial_ttfb: false,
        }
    }
}

impl PipelineParams {
    /// Creates parameters with defaults (interruptions on, metrics off).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether user speech interrupts bot responses.
    pub fn with_interruptions(mut self, allow: bool) -> Self {
        self.allow_interruptions = allow;
        self
    }

    /// Enables metric reporting.
    pub fn with_metrics(mut self) -> Self {
        self.enable_metrics = true;
        self
    }

    /// Enables usage metric reporting.
    pub fn with_usage_metrics(mut self) -> Self {
        self.enable_usage_metrics = true;
        self
    }

    /// Restricts TTFB reporting to the first response.
    pub fn with_initial_ttfb_only(mut self) -> Self {
        self.report_only_initial_ttfb = true;
        self
    }
}

/// A single unit of data or control flowing through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// First frame through the pipeline; carries the runtime parameters.
    Start(PipelineParams),

    /// Raw PCM audio captured from the user.
    AudioIn {
        /// Signed 16-bit little-endian PCM samples.
        audio: Vec<u8>,
        /// Sample rate of the audio in Hz.
        sample_rate: u32,
    },

    /// VAD detected the start of user speech.
    UserStartedSpeaking,

    /// VAD detected the end of user speech. Speech-to-text stages treat
    /// this as the end of an utterance and finalize their transcript.
    UserStoppedSpeaking,

    /// A transcript of user speech.
    Transcription {
        /// The transcribed text.
        text: String,
        /// Whether the transcript is final or may still be revised.
        is_final: bool,
    },

    /// A conversation snapshot to run a language model completion over.
    LlmMessages(Vec<Message>),

    /// Marks the start of a language model response.
    LlmResponseStart,

    /// A chunk of generated text inside a response.
    LlmText(String),

    /// Marks the end of a language model response. Downstream stages
    /// flush anything they buffered for the response.
    LlmResponseEnd,

    /// The language model requested a tool invocation.
    FunctionCall {
        /// Name of the requested function.
        name: String,
        /// Arguments as a JSON object.
        arguments: Value,
    },

    /// Synthesized bot speech.
    TtsAudio {
        /// Signed 16-bit little-endian PCM samples.
        audio: Vec<u8>,
        /// Sample rate of the audio in Hz.
        sample_rate: u32,
    },

    /// Bot response text for display alongside (or instead of) audio.
    TextOut(String),

    /// Stops the pipeline without flushing queued work.
    Cancel,

    /// Stops the pipeline after every stage has seen the frame.
    End,
}

impl Frame {
    /// Whether this frame terminates the pipeline once processed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Frame::Cancel | Frame::End)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_defaults() {
        let params = PipelineParams::default();
        assert!(params.allow_interruptions);
        assert!(!params.enable_metrics);
        assert!(!params.report_only_initial_ttfb);
    }

    #[test]
    fn test_params_builder() {
        let params = PipelineParams::new()
            .with_interruptions(false)
            .with_metrics()
            .with_usage_metrics()
            .with_initial_ttfb_only();
        assert!(!params.allow_interruptions);
        assert!(params.enable_metrics);
        assert!(params.enable_usage_metrics);
        assert!(params.report_only_initial_ttfb);
    }

    #[test]
    fn test_terminal_frames() {
        assert!(Frame::Cancel.is_terminal());
        assert!(Frame::End.is_terminal());
        assert!(!Frame::Start(PipelineParams::default()).is_terminal());
        assert!(!Frame::LlmResponseEnd.is_terminal());
    }
}
