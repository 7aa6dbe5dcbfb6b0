//! # lingo-pipeline
//!
//! The frame pipeline that powers the ConvoLingo voice bot.
//!
//! ## Overview
//!
//! A [`Pipeline`] is an ordered chain of [`FrameProcessor`] stages.
//! [`Frame`]s queued at the head flow through every stage; each stage
//! transforms, consumes, or forwards them. The canonical ConvoLingo chain
//! is:
//!
//! ```text
//! transport events → SttStage → user aggregator → LlmStage
//!                  → TtsStage → TransportOutput → assistant aggregator
//! ```
//!
//! A [`PipelineTask`] runs the chain: one tokio task per stage, bounded
//! channels between them, [`Frame::Start`] queued first. A
//! [`PipelineRunner`] waits for the task and maps Ctrl-C to
//! [`PipelineTask::cancel`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use lingo_pipeline::{
//!     ContextAggregator, Frame, LlmContext, LlmStage, Pipeline, PipelineParams,
//!     PipelineRunner, PipelineTask, SttStage, TtsStage,
//! };
//!
//! let aggregator = ContextAggregator::new(LlmContext::with_messages(system_prompt));
//! let pipeline = Pipeline::new(vec![
//!     Box::new(SttStage::new(stt)),
//!     Box::new(aggregator.user()),
//!     Box::new(LlmStage::new(llm)),
//!     Box::new(TtsStage::new(tts)),
//!     Box::new(TransportOutput::new(session)),
//!     Box::new(aggregator.assistant()),
//! ]);
//!
//! let task = PipelineTask::new(pipeline, PipelineParams::new().with_metrics());
//! PipelineRunner::new().run(&task).await?;
//! ```

pub mod aggregator;
pub mod frames;
pub mod io;
pub mod pipeline;
pub mod processor;
pub mod runner;
pub mod stages;
pub mod task;

pub use aggregator::{
    AssistantContextAggregator, ContextAggregator, LlmContext, SharedContext,
    UserContextAggregator,
};
pub use frames::{Frame, PipelineParams};
pub use io::TransportOutput;
pub use pipeline::Pipeline;
pub use processor::{FrameProcessor, FrameSink};
pub use runner::PipelineRunner;
pub use stages::{LlmStage, SharedTools, SttStage, TtsStage};
pub use task::PipelineTask;
