//! Pipeline stages that wrap the speech and language model services.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::StreamExt;
use lingo_core::Result;
use lingo_services::{BoxedLlm, BoxedStt, BoxedTts, LlmChunk, ToolDefinition};
use tokio::sync::RwLock;

use crate::frames::{Frame, PipelineParams};
use crate::processor::{FrameProcessor, FrameSink};

/// Tool definitions shared between a flow manager and an [`LlmStage`].
///
/// Flows swap the definitions as the conversation moves between nodes;
/// the stage reads them on every completion.
pub type SharedTools = Arc<RwLock<Vec<ToolDefinition>>>;

/// Feeds user audio into a speech-to-text service and emits the
/// transcript when the user stops speaking.
pub struct SttStage {
    stt: BoxedStt,
}

impl SttStage {
    pub fn new(stt: BoxedStt) -> Self {
        Self { stt }
    }
}

#[async_trait]
impl FrameProcessor for SttStage {
    fn name(&self) -> &str {
        "stt"
    }

    async fn process_frame(&mut self, frame: Frame, sink: &FrameSink) -> Result<()> {
        match frame {
            Frame::AudioIn { audio, .. } => self.stt.send_audio(&audio).await,
            Frame::UserStoppedSpeaking => {
                sink.push(Frame::UserStoppedSpeaking).await?;
                if let Some(text) = self.stt.finalize().await? {
                    if !text.is_empty() {
                        sink.push(Frame::Transcription { text, is_final: true }).await?;
                    }
                }
                Ok(())
            }
            other => sink.push(other).await,
        }
    }
}

/// Runs language model completions over context snapshots.
///
/// Consumes [`Frame::LlmMessages`] and emits the response between
/// [`Frame::LlmResponseStart`] and [`Frame::LlmResponseEnd`] markers.
/// Tool requests surface as [`Frame::FunctionCall`].
pub struct LlmStage {
    llm: BoxedLlm,
    tools: SharedTools,
    params: PipelineParams,
    ttfb_reported: bool,
}

impl LlmStage {
    pub fn new(llm: BoxedLlm) -> Self {
        Self {
            llm,
            tools: Arc::new(RwLock::new(Vec::new())),
            params: PipelineParams::default(),
            ttfb_reported: false,
        }
    }

    /// Uses an externally owned tool list, letting a flow manager change
    /// the available tools between turns.
    pub fn with_tools(mut self, tools: SharedTools) -> Self {
        self.tools = tools;
        self
    }

    fn report_ttfb(&mut self, started: Instant) {
        if !self.params.enable_metrics {
            return;
        }
        if self.params.report_only_initial_ttfb && self.ttfb_reported {
            return;
        }
        self.ttfb_reported = true;
        tracing::info!("LLM time to first byte: {}ms", started.elapsed().as_millis());
    }
}

#[async_trait]
impl FrameProcessor for LlmStage {
    fn name(&self) -> &str {
        "llm"
    }

    async fn process_frame(&mut self, frame: Frame, sink: &FrameSink) -> Result<()> {
        match frame {
            Frame::Start(params) => {
                self.params = params.clone();
                sink.push(Frame::Start(params)).await
            }
            Frame::LlmMessages(messages) => {
                let tools = self.tools.read().await.clone();
                let started = Instant::now();
                sink.push(Frame::LlmResponseStart).await?;

                match self.llm.generate(&messages, &tools).await {
                    Ok(mut stream) => {
                        let mut first = true;
                        while let Some(chunk) = stream.next().await {
                            match chunk {
                                Ok(chunk) => {
                                    if first {
                                        first = false;
                                        self.report_ttfb(started);
                                    }
                                    let out = match chunk {
                                        LlmChunk::Text(text) => Frame::LlmText(text),
                                        LlmChunk::FunctionCall { name, arguments } => {
                                            Frame::FunctionCall { name, arguments }
                                        }
                                    };
                                    sink.push(out).await?;
                                }
                                Err(e) => {
                                    tracing::error!("Language model stream error: {}", e);
                                    break;
                                }
                            }
                        }
                    }
                    Err(e) => tracing::error!("Language model request failed: {}", e),
                }

                sink.push(Frame::LlmResponseEnd).await
            }
            other => sink.push(other).await,
        }
    }
}

/// Synthesizes bot speech from completed language model responses.
///
/// Text chunks are buffered until the response ends, then synthesized
/// in one piece. The response text is also emitted as
/// [`Frame::TextOut`] so transports can show it.
pub struct TtsStage {
    tts: BoxedTts,
    params: PipelineParams,
    buffer: Option<String>,
}

impl TtsStage {
    pub fn new(tts: BoxedTts) -> Self {
        Self { tts, params: PipelineParams::default(), buffer: None }
    }
}

#[async_trait]
impl FrameProcessor for TtsStage {
    fn name(&self) -> &str {
        "tts"
    }

    async fn process_frame(&mut self, frame: Frame, sink: &FrameSink) -> Result<()> {
        match &frame {
            Frame::Start(params) => {
                self.params = params.clone();
            }
            Frame::LlmResponseStart => {
                self.buffer = Some(String::new());
            }
            Frame::LlmText(text) => {
                if let Some(buffer) = self.buffer.as_mut() {
                    buffer.push_str(text);
                }
            }
            Frame::LlmResponseEnd => {
                if let Some(text) = self.buffer.take() {
                    if !text.is_empty() {
                        sink.push(Frame::TextOut(text.clone())).await?;
                        match self.tts.synthesize(&text).await {
                            Ok(audio) if !audio.is_empty() => {
                                sink.push(Frame::TtsAudio {
                                    audio,
                                    sample_rate: self.tts.sample_rate(),
                                })
                                .await?;
                            }
                            Ok(_) => {}
                            Err(e) => tracing::error!("Speech synthesis failed: {}", e),
                        }
                    }
                }
            }
            Frame::UserStartedSpeaking => {
                if self.params.allow_interruptions {
                    self.buffer = None;
                }
            }
            _ => {}
        }
        sink.push(frame).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_services::{MockLlm, MockStt, MockTts};
    use tokio::sync::mpsc;

    fn sink() -> (FrameSink, mpsc::Receiver<Frame>) {
        let (tx, rx) = mpsc::channel(16);
        (FrameSink::new(tx), rx)
    }

    async fn drain(rx: &mut mpsc::Receiver<Frame>) -> Vec<Frame> {
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            frames.push(frame);
        }
        frames
    }

    #[tokio::test]
    async fn test_stt_stage_emits_transcript_on_utterance_end() {
        let stt = Arc::new(MockStt::new().with_transcript("hola profesor"));
        let mut stage = SttStage::new(stt);
        let (sink, mut rx) = sink();

        stage
            .process_frame(Frame::AudioIn { audio: vec![0; 320], sample_rate: 16_000 }, &sink)
            .await
            .unwrap();
        stage.process_frame(Frame::UserStoppedSpeaking, &sink).await.unwrap();

        let frames = drain(&mut rx).await;
        assert_eq!(frames[0], Frame::UserStoppedSpeaking);
        assert_eq!(
            frames[1],
            Frame::Transcription { text: "hola profesor".into(), is_final: true }
        );
    }

    #[tokio::test]
    async fn test_stt_stage_consumes_audio_frames() {
        let stt = Arc::new(MockStt::new());
        let mut stage = SttStage::new(stt);
        let (sink, mut rx) = sink();

        stage
            .process_frame(Frame::AudioIn { audio: vec![1, 2], sample_rate: 16_000 }, &sink)
            .await
            .unwrap();

        assert!(drain(&mut rx).await.is_empty());
    }

    #[tokio::test]
    async fn test_llm_stage_wraps_response_in_markers() {
        let llm = Arc::new(MockLlm::new().with_text_response("¡Buenos días!"));
        let mut stage = LlmStage::new(llm);
        let (sink, mut rx) = sink();

        stage
            .process_frame(Frame::LlmMessages(vec![lingo_core::Message::user("hola")]), &sink)
            .await
            .unwrap();

        let frames = drain(&mut rx).await;
        assert_eq!(frames[0], Frame::LlmResponseStart);
        assert_eq!(frames[1], Frame::LlmText("¡Buenos días!".into()));
        assert_eq!(frames[2], Frame::LlmResponseEnd);
    }

    #[tokio::test]
    async fn test_llm_stage_surfaces_function_calls() {
        let llm = Arc::new(MockLlm::new().with_response(vec![LlmChunk::FunctionCall {
            name: "record_favorite_color".into(),
            arguments: serde_json::json!({"color": "azul"}),
        }]));
        let mut stage = LlmStage::new(llm);
        let (sink, mut rx) = sink();

        stage.process_frame(Frame::LlmMessages(vec![]), &sink).await.unwrap();

        let frames = drain(&mut rx).await;
        assert!(matches!(
            &frames[1],
            Frame::FunctionCall { name, .. } if name == "record_favorite_color"
        ));
    }

    #[tokio::test]
    async fn test_llm_stage_reads_shared_tools() {
        let llm = Arc::new(MockLlm::new().with_text_response("ok"));
        let tools: SharedTools = Arc::new(RwLock::new(vec![ToolDefinition::new("set_color")]));
        let mut stage = LlmStage::new(llm.clone()).with_tools(tools.clone());
        let (sink, _rx) = sink();

        stage.process_frame(Frame::LlmMessages(vec![]), &sink).await.unwrap();
        tools.write().await.clear();
        stage.process_frame(Frame::LlmMessages(vec![]), &sink).await.unwrap();

        // The mock records nothing about tools, but both completions ran
        // without blocking on the shared lock.
        assert_eq!(llm.requests().await.len(), 2);
    }

    #[tokio::test]
    async fn test_tts_stage_synthesizes_completed_response() {
        let tts = Arc::new(MockTts::new());
        let mut stage = TtsStage::new(tts);
        let (sink, mut rx) = sink();

        stage.process_frame(Frame::LlmResponseStart, &sink).await.unwrap();
        stage.process_frame(Frame::LlmText("Buenos ".into()), &sink).await.unwrap();
        stage.process_frame(Frame::LlmText("días".into()), &sink).await.unwrap();
        stage.process_frame(Frame::LlmResponseEnd, &sink).await.unwrap();

        let frames = drain(&mut rx).await;
        // Text chunks forward unchanged, then the flush emits text and audio.
        assert_eq!(frames[0], Frame::LlmResponseStart);
        assert_eq!(frames[1], Frame::LlmText("Buenos ".into()));
        assert_eq!(frames[2], Frame::LlmText("días".into()));
        assert_eq!(frames[3], Frame::TextOut("Buenos días".into()));
        assert!(matches!(&frames[4], Frame::TtsAudio { audio, .. } if !audio.is_empty()));
        assert_eq!(frames[5], Frame::LlmResponseEnd);
    }

    #[tokio::test]
    async fn test_tts_stage_drops_interrupted_buffer() {
        let tts = Arc::new(MockTts::new());
        let mut stage = TtsStage::new(tts.clone());
        let (sink, mut rx) = sink();

        stage.process_frame(Frame::LlmResponseStart, &sink).await.unwrap();
        stage.process_frame(Frame::LlmText("No importa".into()), &sink).await.unwrap();
        stage.process_frame(Frame::UserStartedSpeaking, &sink).await.unwrap();
        stage.process_frame(Frame::LlmResponseEnd, &sink).await.unwrap();

        let frames = drain(&mut rx).await;
        assert!(!frames.iter().any(|f| matches!(f, Frame::TtsAudio { .. })));
        assert!(tts.requests().await.is_empty());
    }
}
