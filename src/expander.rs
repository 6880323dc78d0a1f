use std::sync::Arc;

use crate::completion::{CompletionError, CompletionOracle};

/// Upper bound on related keywords kept per seed, whatever the model returns.
pub const MAX_RELATED: usize = 5;

const EXPAND_MAX_TOKENS: u32 = 300;
const EXPAND_TEMPERATURE: f32 = 0.6;

/// Expands one seed keyword into a short list of related keywords by asking
/// the completion service for a JSON array.
pub struct KeywordExpander {
    oracle: Arc<dyn CompletionOracle>,
}

impl KeywordExpander {
    pub fn new(oracle: Arc<dyn CompletionOracle>) -> KeywordExpander {
        KeywordExpander { oracle }
    }

    pub async fn expand(&self, seed: &str) -> Result<Vec<String>, CompletionError> {
        let prompt = build_expand_prompt(seed);
        let text = self
            .oracle
            .complete(&prompt, EXPAND_MAX_TOKENS, EXPAND_TEMPERATURE)
            .await?;
        Ok(parse_related_keywords(&text))
    }
}

fn build_expand_prompt(seed: &str) -> String {
    format!(
        "请为关键词：\"{seed}\" 生成5个相关的中文长尾关键词。\n\
         要求：与主题高度相关，每个约5~8字。\n\
         只输出JSON数组格式，例如: [\"词1\",\"词2\",...]\n\
         不要添加任何多余说明。"
    )
}

/// Parse the model output into at most [`MAX_RELATED`] keywords.
///
/// The happy path is a strict JSON string array. Models drift, so anything
/// that fails the strict parse (prose, bare lists, non-string entries) is
/// split on common delimiters instead. Either path may legitimately come up
/// empty; that is degradation, not an error.
pub fn parse_related_keywords(text: &str) -> Vec<String> {
    if let Ok(arr) = serde_json::from_str::<Vec<String>>(text) {
        return arr
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .take(MAX_RELATED)
            .collect();
    }

    text.split(|c: char| matches!(c, ',' | '，' | ';' | '；') || c.is_whitespace())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .take(MAX_RELATED)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_array_of_five_or_more_truncates_to_five() {
        let text = r#"["词1", " 词2 ", "词3", "词4", "词5", "词6", "词7"]"#;
        let parsed = parse_related_keywords(text);
        assert_eq!(parsed, vec!["词1", "词2", "词3", "词4", "词5"]);
    }

    #[test]
    fn test_strict_array_shorter_than_five_is_kept_as_is() {
        let text = r#"["词1", "词2", "词3"]"#;
        let parsed = parse_related_keywords(text);
        assert_eq!(parsed, vec!["词1", "词2", "词3"]);
    }

    #[test]
    fn test_strict_array_preserves_model_order() {
        let text = r#"["zebra", "apple", "mango"]"#;
        let parsed = parse_related_keywords(text);
        assert_eq!(parsed, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_strict_array_keeps_duplicates() {
        let text = r#"["词1", "词1", "词2"]"#;
        let parsed = parse_related_keywords(text);
        assert_eq!(parsed, vec!["词1", "词1", "词2"]);
    }

    #[test]
    fn test_malformed_output_falls_back_to_delimiter_split() {
        let parsed = parse_related_keywords("词1, 词2; 词3");
        assert_eq!(parsed, vec!["词1", "词2", "词3"]);
    }

    #[test]
    fn test_fallback_handles_fullwidth_delimiters_and_newlines() {
        let parsed = parse_related_keywords("词1，词2；词3\n词4   词5");
        assert_eq!(parsed, vec!["词1", "词2", "词3", "词4", "词5"]);
    }

    #[test]
    fn test_fallback_truncates_to_five() {
        let parsed = parse_related_keywords("a, b, c, d, e, f, g");
        assert_eq!(parsed.len(), MAX_RELATED);
        assert_eq!(parsed, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_non_string_json_array_falls_back() {
        // Not a string array, so the strict path rejects it and the split
        // path chews through the raw text instead.
        let parsed = parse_related_keywords("[1, 2]");
        assert_eq!(parsed, vec!["[1", "2]"]);
    }

    #[test]
    fn test_unusable_output_degrades_to_empty() {
        assert!(parse_related_keywords("").is_empty());
        assert!(parse_related_keywords("  \n  ，，；  ").is_empty());
    }

    #[test]
    fn test_expand_prompt_embeds_seed() {
        let prompt = build_expand_prompt("在线教育平台");
        assert!(prompt.contains("\"在线教育平台\""));
        assert!(prompt.contains("JSON数组"));
    }
}
