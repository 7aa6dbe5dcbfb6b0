//! # lingo-services
//!
//! Speech and language model services for the ConvoLingo voice agent.
//!
//! ## Overview
//!
//! Three service traits cover the conversational loop:
//!
//! - [`SttService`] - speech to text, fed chunk by chunk per utterance
//! - [`LlmService`] - chat completion with optional function calling
//! - [`TtsService`] - text to speech
//!
//! Production implementations are [`CartesiaStt`] (WebSocket streaming),
//! [`GoogleLlm`] (REST), and [`CartesiaTts`] (REST). Each has a scripted
//! mock so pipelines and flows can be tested without credentials.
//!
//! ## Example
//!
//! ```rust,ignore
//! use lingo_core::{AppConfig, Language};
//! use lingo_services::{CartesiaStt, CartesiaTts, GoogleLlm};
//!
//! let config = AppConfig::from_env();
//! let stt = CartesiaStt::new(config.require_cartesia_api_key()?, config.language);
//! let tts = CartesiaTts::new(
//!     config.require_cartesia_api_key()?,
//!     &config.voice_id,
//!     config.language,
//! );
//! let llm = GoogleLlm::new(config.require_google_api_key()?);
//! ```

pub mod cartesia;
pub mod filter;
pub mod google;
pub mod mock;
pub mod service;

pub use cartesia::{CartesiaStt, CartesiaTts, DEFAULT_STT_MODEL, DEFAULT_TTS_MODEL};
pub use filter::{MarkdownTextFilter, TextFilter};
pub use google::{DEFAULT_LLM_MODEL, GoogleLlm};
pub use mock::{MockLlm, MockStt, MockTts};
pub use service::{
    BoxedLlm, BoxedStt, BoxedTts, LlmChunk, LlmService, LlmStream, SttService, ToolDefinition,
    TtsService,
};
