use serde::{Deserialize, Serialize};

/// Promoted address used when the caller doesn't supply one.
pub const DEFAULT_TARGET_URL: &str = "http://191.run";

/// `keywords` is optional at the type level so its absence maps to the 缺少关键词
/// error body instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub keywords: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> ErrorResponse {
        ErrorResponse {
            error: error.into(),
        }
    }
}
