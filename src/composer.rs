use std::sync::Arc;

use crate::completion::{CompletionError, CompletionOracle};

// Roomier than the expander's cap so the model can hit the requested
// 150~200 character length.
const COMPOSE_MAX_TOKENS: u32 = 500;
const COMPOSE_TEMPERATURE: f32 = 0.7;

/// Generates the one-line promotional paragraph for a seed keyword. All of
/// the structural constraints (opening literal, keyword density, length) are
/// carried by the prompt; the only thing enforced locally is whitespace
/// normalization.
pub struct ContentComposer {
    oracle: Arc<dyn CompletionOracle>,
}

impl ContentComposer {
    pub fn new(oracle: Arc<dyn CompletionOracle>) -> ContentComposer {
        ContentComposer { oracle }
    }

    pub async fn compose(
        &self,
        seed: &str,
        related: &[String],
        url: &str,
    ) -> Result<String, CompletionError> {
        let prompt = build_compose_prompt(seed, related, url);
        let text = self
            .oracle
            .complete(&prompt, COMPOSE_MAX_TOKENS, COMPOSE_TEMPERATURE)
            .await?;
        Ok(normalize_whitespace(&text))
    }
}

fn build_compose_prompt(seed: &str, related: &[String], url: &str) -> String {
    let related_str = related.join("，");
    format!(
        "请为主关键词 \"{seed}\" 写一段中文介绍：\n\
         1. 必须以：{seed}【网址：{url}】开头；\n\
         2. 在后续描述中自然融入 3~5 个以下关键词：{related_str}；\n\
         3. 确保主关键词 \"{seed}\" 在内容中出现 3-5 次；\n\
         4. 内容流畅自然，长度 150~200 字；\n\
         5. 不要换行，不要添加解释。"
    )
}

/// Collapse every whitespace run (including newlines) to a single space and
/// trim the ends, so the content is always one line.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}
