use serde::{Deserialize, Serialize};

/// A single chat turn exchanged with the language model.
///
/// The same shape is used for prompt files on disk, for the LLM context
/// aggregated during a conversation, and for the wire format of the
/// Google provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self { role: role.into(), content: content.into() }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

/// Languages the tutor can run a practice session in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Spanish,
}

impl Language {
    /// Lowercase ISO 639-1 code, used for prompt directories and env values.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = crate::LingoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "es" | "spanish" => Ok(Language::Spanish),
            other => {
                Err(crate::LingoError::config(format!("unsupported language: {other}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let msg = Message::system("You are a language tutor.");
        assert_eq!(msg.role, "system");
        assert_eq!(msg.content, "You are a language tutor.");

        assert_eq!(Message::user("hola").role, "user");
        assert_eq!(Message::assistant("¡Hola!").role, "assistant");
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::user("hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hello"}"#);

        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::English);
        assert_eq!("ES".parse::<Language>().unwrap(), Language::Spanish);
        assert_eq!("spanish".parse::<Language>().unwrap(), Language::Spanish);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_language_code_round_trip() {
        for lang in [Language::English, Language::Spanish] {
            assert_eq!(lang.code().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn test_language_default() {
        assert_eq!(Language::default(), Language::English);
    }
}
