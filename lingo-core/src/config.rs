//! Environment-driven application configuration.
use std::env;

use crate::{Language, LingoError, Result};

/// Voice used for speech synthesis when `CARTESIA_VOICE_ID` is not set.
pub const DEFAULT_VOICE_ID: &str = "32b3f3c5-7171-46aa-abe7-b598964aa793";

/// Application configuration sourced from the process environment.
///
/// Construction never fails: anything missing is carried as `None` (or a
/// default) so the console and mock-backed tests can run without real
/// credentials. Components that genuinely need a key call the `require_*`
/// accessors and get a configuration error naming the variable to set.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Google LLM credential, from `GOOGLE_API_KEY` or `GEMINI_API_KEY`.
    pub google_api_key: Option<String>,
    /// Cartesia STT/TTS credential, from `CARTESIA_API_KEY`.
    pub cartesia_api_key: Option<String>,
    /// Voice for speech synthesis, from `CARTESIA_VOICE_ID`.
    pub voice_id: String,
    /// Media room to join, from `DAILY_ROOM_URL`.
    pub room_url: Option<String>,
    /// Access token for the media room, from `DAILY_ROOM_TOKEN`.
    pub room_token: Option<String>,
    /// Practice language, from `TARGET_LANGUAGE` (or legacy `LANGUAGE`).
    pub language: Language,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            google_api_key: None,
            cartesia_api_key: None,
            voice_id: DEFAULT_VOICE_ID.to_string(),
            room_url: None,
            room_token: None,
            language: Language::default(),
        }
    }
}

impl AppConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `GOOGLE_API_KEY` / `GEMINI_API_KEY` - LLM credential (first wins)
    /// - `CARTESIA_API_KEY` - speech credential
    /// - `CARTESIA_VOICE_ID` - synthesis voice (default: [`DEFAULT_VOICE_ID`])
    /// - `DAILY_ROOM_URL` - media room URL
    /// - `DAILY_ROOM_TOKEN` - media room access token
    /// - `TARGET_LANGUAGE` / `LANGUAGE` - practice language (default: en)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.google_api_key =
            env::var("GOOGLE_API_KEY").or_else(|_| env::var("GEMINI_API_KEY")).ok();
        config.cartesia_api_key = env::var("CARTESIA_API_KEY").ok();

        if let Ok(voice_id) = env::var("CARTESIA_VOICE_ID") {
            if !voice_id.is_empty() {
                config.voice_id = voice_id;
            }
        }

        config.room_url = env::var("DAILY_ROOM_URL").ok();
        config.room_token = env::var("DAILY_ROOM_TOKEN").ok();

        if let Ok(lang) = env::var("TARGET_LANGUAGE").or_else(|_| env::var("LANGUAGE")) {
            match lang.parse::<Language>() {
                Ok(language) => config.language = language,
                Err(_) => {
                    tracing::warn!(value = %lang, "unsupported language, falling back to en");
                }
            }
        }

        config
    }

    /// LLM credential, or a configuration error naming the variables to set.
    pub fn require_google_api_key(&self) -> Result<&str> {
        self.google_api_key.as_deref().ok_or_else(|| {
            LingoError::config("GOOGLE_API_KEY or GEMINI_API_KEY must be set")
        })
    }

    /// Speech credential, or a configuration error naming the variable to set.
    pub fn require_cartesia_api_key(&self) -> Result<&str> {
        self.cartesia_api_key
            .as_deref()
            .ok_or_else(|| LingoError::config("CARTESIA_API_KEY must be set"))
    }

    /// Room URL and token as a pair, or a configuration error.
    pub fn require_room(&self) -> Result<(&str, &str)> {
        let url = self
            .room_url
            .as_deref()
            .ok_or_else(|| LingoError::config("DAILY_ROOM_URL must be set"))?;
        let token = self
            .room_token
            .as_deref()
            .ok_or_else(|| LingoError::config("DAILY_ROOM_TOKEN must be set"))?;
        Ok((url, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.voice_id, DEFAULT_VOICE_ID);
        assert_eq!(config.language, Language::English);
        assert!(config.google_api_key.is_none());
        assert!(config.room_url.is_none());
    }

    #[test]
    fn test_require_google_api_key() {
        let mut config = AppConfig::default();
        let err = config.require_google_api_key().unwrap_err();
        assert!(err.to_string().contains("GOOGLE_API_KEY"));

        config.google_api_key = Some("key-123".to_string());
        assert_eq!(config.require_google_api_key().unwrap(), "key-123");
    }

    #[test]
    fn test_require_cartesia_api_key() {
        let mut config = AppConfig::default();
        assert!(config.require_cartesia_api_key().is_err());

        config.cartesia_api_key = Some("key-456".to_string());
        assert_eq!(config.require_cartesia_api_key().unwrap(), "key-456");
    }

    #[test]
    fn test_require_room_needs_both_parts() {
        let mut config = AppConfig::default();
        assert!(config.require_room().is_err());

        config.room_url = Some("wss://rooms.example/demo".to_string());
        let err = config.require_room().unwrap_err();
        assert!(err.to_string().contains("DAILY_ROOM_TOKEN"));

        config.room_token = Some("tok-demo".to_string());
        let (url, token) = config.require_room().unwrap();
        assert_eq!(url, "wss://rooms.example/demo");
        assert_eq!(token, "tok-demo");
    }
}
