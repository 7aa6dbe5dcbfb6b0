//! The processor trait implemented by every pipeline stage.

use async_trait::async_trait;
use lingo_core::{LingoError, Result};
use tokio::sync::mpsc;

use crate::frames::Frame;

/// Handle for pushing frames to the next stage of a pipeline.
#[derive(Debug, Clone)]
pub struct FrameSink {
    tx: mpsc::Sender<Frame>,
}

impl FrameSink {
    pub(crate) fn new(tx: mpsc::Sender<Frame>) -> Self {
        Self { tx }
    }

    /// Pushes a frame downstream.
    ///
    /// Fails only when the downstream stage has already shut down.
    pub async fn push(&self, frame: Frame) -> Result<()> {
        self.tx
            .send(frame)
            .await
            .map_err(|_| LingoError::pipeline("downstream stage is gone"))
    }
}

/// A single stage in a frame pipeline.
///
/// Stages receive every frame that reaches them and decide what to do
/// with it: transform it, consume it, emit new frames, or pass it along.
/// A stage that does not handle a frame kind must forward it unchanged
/// so that stages further down still see it.
#[async_trait]
pub trait FrameProcessor: Send {
    /// Short name used in log output.
    fn name(&self) -> &str;

    /// Processes one frame, pushing any output to `sink`.
    async fn process_frame(&mut self, frame: Frame, sink: &FrameSink) -> Result<()>;
}
