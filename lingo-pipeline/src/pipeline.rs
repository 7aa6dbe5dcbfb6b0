//! Ordered chains of frame processors.

use std::fmt;

use crate::processor::FrameProcessor;

/// An ordered chain of frame processors.
///
/// Frames queued at the head flow through every stage in order. A
/// pipeline is inert until handed to a
/// [`PipelineTask`](crate::PipelineTask), which spawns one task per
/// stage and connects them with channels.
pub struct Pipeline {
    processors: Vec<Box<dyn FrameProcessor>>,
}

impl Pipeline {
    /// Creates a pipeline from stages in upstream-to-downstream order.
    pub fn new(processors: Vec<Box<dyn FrameProcessor>>) -> Self {
        Self { processors }
    }

    /// Number of stages in the pipeline.
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// Whether the pipeline has no stages.
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    pub(crate) fn into_processors(self) -> Vec<Box<dyn FrameProcessor>> {
        self.processors
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.processors.iter().map(|p| p.name()).collect();
        f.debug_struct("Pipeline").field("stages", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::Frame;
    use crate::processor::FrameSink;
    use async_trait::async_trait;
    use lingo_core::Result;

    struct Named(&'static str);

    #[async_trait]
    impl FrameProcessor for Named {
        fn name(&self) -> &str {
            self.0
        }

        async fn process_frame(&mut self, frame: Frame, sink: &FrameSink) -> Result<()> {
            sink.push(frame).await
        }
    }

    #[test]
    fn test_debug_lists_stage_names() {
        let pipeline = Pipeline::new(vec![Box::new(Named("stt")), Box::new(Named("llm"))]);
        let debug = format!("{pipeline:?}");
        assert!(debug.contains("stt"));
        assert!(debug.contains("llm"));
        assert_eq!(pipeline.len(), 2);
        assert!(!pipeline.is_empty());
    }
}
