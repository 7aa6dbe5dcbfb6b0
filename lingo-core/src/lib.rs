//! # lingo-core
//!
//! Core types and configuration for the ConvoLingo voice agent.
//!
//! ## Overview
//!
//! This crate provides the foundational pieces shared by every other
//! ConvoLingo crate:
//!
//! - [`Message`] - A single chat turn (role + content)
//! - [`Language`] - Supported practice languages
//! - [`AppConfig`] - Environment-driven application configuration
//! - [`LingoError`] / [`Result`] - Unified error handling
//!
//! ## Configuration
//!
//! [`AppConfig::from_env`] reads the process environment and never fails;
//! missing credentials surface as `None` and are only rejected at the point
//! where a component actually needs them:
//!
//! ```rust
//! use lingo_core::AppConfig;
//!
//! let config = AppConfig::from_env();
//! if config.google_api_key.is_none() {
//!     // run against mock services instead
//! }
//! ```

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, DEFAULT_VOICE_ID};
pub use error::{LingoError, Result};
pub use types::{Language, Message};
