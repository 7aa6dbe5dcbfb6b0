//! Loading versioned prompt files from disk.

use std::fs;
use std::path::PathBuf;

use lingo_core::{Language, LingoError, Message, Result};

/// Loads prompt message lists from `{base}/{language}/{version}/{name}.json`.
///
/// Prompt files are JSON arrays of chat messages, kept per language so
/// the tutor can greet in the learner's practice language. The layout
/// puts the version between language and file name, so a prompt rewrite
/// ships as `v2` next to `v1` instead of replacing it.
#[derive(Debug, Clone)]
pub struct PromptLoader {
    base: PathBuf,
}

impl PromptLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Reads one prompt file as a message list.
    ///
    /// Fails when the file is missing, is not valid JSON, or is valid
    /// JSON that is not an array of messages.
    pub fn load(&self, language: Language, version: &str, name: &str) -> Result<Vec<Message>> {
        let path =
            self.base.join(language.code()).join(version).join(format!("{name}.json"));
        let data = fs::read_to_string(&path).map_err(|e| {
            LingoError::prompt(format!("cannot read prompt file {}: {e}", path.display()))
        })?;

        let value: serde_json::Value = serde_json::from_str(&data)?;
        if !value.is_array() {
            return Err(LingoError::prompt(format!(
                "prompt file must be an array of messages: {}",
                path.display()
            )));
        }
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_prompt(dir: &std::path::Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_load_message_list() {
        let dir = tempfile::tempdir().unwrap();
        write_prompt(
            dir.path(),
            "en/v1/role.json",
            r#"[{"role": "system", "content": "You are ConvoLingo."}]"#,
        );

        let loader = PromptLoader::new(dir.path());
        let messages = loader.load(Language::English, "v1", "role").unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "system");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loader = PromptLoader::new(dir.path());

        let err = loader.load(Language::Spanish, "v1", "initial").unwrap_err();
        assert!(err.to_string().contains("es/v1/initial.json"));
    }

    #[test]
    fn test_rejects_non_array_json() {
        let dir = tempfile::tempdir().unwrap();
        write_prompt(dir.path(), "en/v1/role.json", r#"{"role": "system"}"#);

        let loader = PromptLoader::new(dir.path());
        let err = loader.load(Language::English, "v1", "role").unwrap_err();
        assert!(err.to_string().contains("must be an array"));
    }

    #[test]
    fn test_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        write_prompt(dir.path(), "en/v1/role.json", "not json at all");

        let loader = PromptLoader::new(dir.path());
        assert!(loader.load(Language::English, "v1", "role").is_err());
    }
}
