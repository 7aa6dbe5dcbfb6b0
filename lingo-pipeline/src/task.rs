//! Running pipelines and the frame queue that feeds them.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use lingo_core::{LingoError, Result};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use crate::frames::{Frame, PipelineParams};
use crate::pipeline::Pipeline;
use crate::processor::FrameSink;

/// Per-stage channel capacity. Audio frames arrive at roughly 50 per
/// second, so this buffers about a second of backlog per stage before
/// backpressure reaches the transport.
const STAGE_CAPACITY: usize = 64;

/// A running pipeline.
///
/// Creating a task spawns one tokio task per stage, wires them together
/// with bounded channels and queues [`Frame::Start`]. Frames queued with
/// [`queue_frame`](PipelineTask::queue_frame) enter the first stage;
/// frames that fall out of the last stage are available from
/// [`take_sink`](PipelineTask::take_sink).
///
/// The task is cheap to clone and all clones control the same pipeline.
#[derive(Clone)]
pub struct PipelineTask {
    inner: Arc<TaskInner>,
}

struct TaskInner {
    source: mpsc::Sender<Frame>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    sink: Mutex<Option<mpsc::UnboundedReceiver<Frame>>>,
    params: PipelineParams,
    cancelled: AtomicBool,
}

impl PipelineTask {
    /// Spawns the pipeline and queues [`Frame::Start`] with `params`.
    pub fn new(pipeline: Pipeline, params: PipelineParams) -> Self {
        let (source, mut rx) = mpsc::channel::<Frame>(STAGE_CAPACITY);
        let mut handles = Vec::with_capacity(pipeline.len() + 1);

        for mut processor in pipeline.into_processors() {
            let (tx, next_rx) = mpsc::channel(STAGE_CAPACITY);
            let sink = FrameSink::new(tx);
            handles.push(tokio::spawn(async move {
                while let Some(frame) = rx.recv().await {
                    let terminal = frame.is_terminal();
                    if let Err(e) = processor.process_frame(frame, &sink).await {
                        tracing::error!("Stage {} failed to process frame: {}", processor.name(), e);
                    }
                    if terminal {
                        break;
                    }
                }
                tracing::debug!("Stage {} stopped", processor.name());
            }));
            rx = next_rx;
        }

        // Forward whatever leaves the last stage into an unbounded sink
        // so an unread sink never blocks the pipeline.
        let (sink_tx, sink_rx) = mpsc::unbounded_channel();
        handles.push(tokio::spawn(async move {
            while let Some(frame) = rx.recv().await {
                let terminal = frame.is_terminal();
                let _ = sink_tx.send(frame);
                if terminal {
                    break;
                }
            }
        }));

        if let Err(e) = source.try_send(Frame::Start(params.clone())) {
            tracing::warn!("Failed to queue start frame: {}", e);
        }

        Self {
            inner: Arc::new(TaskInner {
                source,
                handles: Mutex::new(handles),
                sink: Mutex::new(Some(sink_rx)),
                params,
                cancelled: AtomicBool::new(false),
            }),
        }
    }

    /// The parameters this task was started with.
    pub fn params(&self) -> &PipelineParams {
        &self.inner.params
    }

    /// Queues a frame into the first stage.
    pub async fn queue_frame(&self, frame: Frame) -> Result<()> {
        self.inner
            .source
            .send(frame)
            .await
            .map_err(|_| LingoError::pipeline("pipeline task is no longer running"))
    }

    /// Queues several frames in order.
    pub async fn queue_frames(&self, frames: Vec<Frame>) -> Result<()> {
        for frame in frames {
            self.queue_frame(frame).await?;
        }
        Ok(())
    }

    /// Stops the pipeline by sending [`Frame::Cancel`].
    ///
    /// Frames queued before the cancel are still processed; frames
    /// queued after it never run. Calling cancel twice is a no-op.
    pub async fn cancel(&self) -> Result<()> {
        if self.inner.cancelled.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        tracing::info!("Cancelling pipeline task");
        // A closed source means the pipeline already stopped on its own.
        let _ = self.inner.source.send(Frame::Cancel).await;
        Ok(())
    }

    /// Whether [`cancel`](PipelineTask::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Takes the receiver for frames that exit the last stage.
    ///
    /// Returns `None` if the sink was already taken by another clone.
    pub async fn take_sink(&self) -> Option<mpsc::UnboundedReceiver<Frame>> {
        self.inner.sink.lock().await.take()
    }

    /// Waits until every stage has stopped.
    ///
    /// Stages stop once [`Frame::End`] or [`Frame::Cancel`] has passed
    /// through them. Returns immediately when called a second time.
    pub async fn wait(&self) -> Result<()> {
        let handles: Vec<JoinHandle<()>> = {
            let mut guard = self.inner.handles.lock().await;
            guard.drain(..).collect()
        };
        for handle in handles {
            handle
                .await
                .map_err(|e| LingoError::pipeline(format!("pipeline stage panicked: {e}")))?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for PipelineTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineTask")
            .field("params", &self.inner.params)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
