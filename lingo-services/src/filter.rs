//! Text filters applied before speech synthesis.

use std::sync::OnceLock;

use regex::Regex;

/// Rewrites model output before it is spoken.
pub trait TextFilter: Send + Sync {
    fn filter(&self, text: &str) -> String;
}

/// Strips markdown markup so it is not read aloud.
///
/// Links keep their label, emphasis and code markers are dropped, heading
/// and list prefixes are removed.
#[derive(Debug, Default, Clone)]
pub struct MarkdownTextFilter;

impl MarkdownTextFilter {
    pub fn new() -> Self {
        Self
    }
}

fn link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("Invalid regex pattern"))
}

fn emphasis_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[*_`#]+").expect("Invalid regex pattern"))
}

fn spaces_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]{2,}").expect("Invalid regex pattern"))
}

impl TextFilter for MarkdownTextFilter {
    fn filter(&self, text: &str) -> String {
        let text = link_re().replace_all(text, "$1");
        let text = emphasis_re().replace_all(&text, "");
        let text = spaces_re().replace_all(&text, " ");
        text.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_emphasis() {
        let filter = MarkdownTextFilter::new();
        assert_eq!(filter.filter("**muy** _bien_"), "muy bien");
        assert_eq!(filter.filter("`código`"), "código");
    }

    #[test]
    fn test_keeps_link_labels() {
        let filter = MarkdownTextFilter::new();
        assert_eq!(
            filter.filter("see [the guide](https://example.com/guide)"),
            "see the guide"
        );
    }

    #[test]
    fn test_strips_headings_and_collapses_spaces() {
        let filter = MarkdownTextFilter::new();
        assert_eq!(filter.filter("## Lección   uno"), "Lección uno");
    }

    #[test]
    fn test_plain_text_unchanged() {
        let filter = MarkdownTextFilter::new();
        assert_eq!(filter.filter("¿Cuál es tu color favorito?"), "¿Cuál es tu color favorito?");
    }
}
