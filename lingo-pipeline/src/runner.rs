//! Drives a pipeline task to completion.

use lingo_core::Result;

use crate::task::PipelineTask;

/// Runs a [`PipelineTask`] until it finishes, optionally cancelling it
/// on Ctrl-C.
#[derive(Debug, Clone)]
pub struct PipelineRunner {
    handle_sigint: bool,
}

impl Default for PipelineRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineRunner {
    /// Creates a runner that cancels the pipeline on Ctrl-C.
    pub fn new() -> Self {
        Self { handle_sigint: true }
    }

    /// Sets whether the runner installs a Ctrl-C handler. Embedders that
    /// manage signals themselves should pass `false`.
    pub fn with_sigint(mut self, handle_sigint: bool) -> Self {
        self.handle_sigint = handle_sigint;
        self
    }

    /// Waits for the task to finish.
    pub async fn run(&self, task: &PipelineTask) -> Result<()> {
        if self.handle_sigint {
            let watched = task.clone();
            let watcher = tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Interrupt received, cancelling pipeline");
                    let _ = watched.cancel().await;
                }
            });
            let result = task.wait().await;
            watcher.abort();
            result
        } else {
            task.wait().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::{Frame, PipelineParams};
    use crate::pipeline::Pipeline;

    #[tokio::test]
    async fn test_runner_completes_on_end_frame() {
        let task = PipelineTask::new(Pipeline::new(vec![]), PipelineParams::default());
        task.queue_frame(Frame::End).await.unwrap();

        let runner = PipelineRunner::new().with_sigint(false);
        runner.run(&task).await.unwrap();
    }

    #[tokio::test]
    async fn test_runner_completes_after_cancel() {
        let task = PipelineTask::new(Pipeline::new(vec![]), PipelineParams::default());
        let runner = PipelineRunner::new().with_sigint(false);

        let waiter = {
            let task = task.clone();
            tokio::spawn(async move { runner.run(&task).await })
        };
        task.cancel().await.unwrap();
        waiter.await.unwrap().unwrap();
    }
}
