use serde::{Deserialize, Serialize};

/// Outcome for a single seed keyword. A batch response is a JSON array of
/// these, one per input line, in input order. Serialized untagged so the two
/// variants come out as the plain objects the frontend expects:
/// `{main, related, bing_url, content}` or `{main, error}`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum KeywordResult {
    Success {
        main: String,
        related: Vec<String>,
        bing_url: String,
        content: String,
    },
    Failure {
        main: String,
        error: String,
    },
}

impl KeywordResult {
    pub fn main(&self) -> &str {
        match self {
            KeywordResult::Success { main, .. } => main,
            KeywordResult::Failure { main, .. } => main,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, KeywordResult::Success { .. })
    }
}
