//! The stage that delivers bot output to a room transport.

use std::sync::Arc;

use async_trait::async_trait;
use lingo_core::{LingoError, Result};
use lingo_transport::RoomSession;

use crate::frames::Frame;
use crate::processor::{FrameProcessor, FrameSink};

/// Sends synthesized audio and response text to a room session.
///
/// Consumes [`Frame::TtsAudio`] and [`Frame::TextOut`]; everything else
/// passes through for stages further down.
pub struct TransportOutput {
    session: Arc<dyn RoomSession>,
}

impl TransportOutput {
    pub fn new(session: Arc<dyn RoomSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl FrameProcessor for TransportOutput {
    fn name(&self) -> &str {
        "transport.output"
    }

    async fn process_frame(&mut self, frame: Frame, sink: &FrameSink) -> Result<()> {
        match frame {
            Frame::TtsAudio { audio, .. } => self
                .session
                .send_audio(&audio)
                .await
                .map_err(|e| LingoError::pipeline(format!("audio send failed: {e}"))),
            Frame::TextOut(text) => self
                .session
                .send_text(&text)
                .await
                .map_err(|e| LingoError::pipeline(format!("text send failed: {e}"))),
            other => sink.push(other).await,
        }
    }
}
