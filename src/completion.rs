use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::CONFIG;

/// Errors a completion call can surface. Kept as distinct variants so the
/// pipeline can record a meaningful description per failed keyword.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion service rejected credentials (HTTP {0})")]
    Auth(u16),

    #[error("completion service rate limit exceeded")]
    RateLimited,

    #[error("completion service error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("completion response carried no generated text")]
    MalformedResponse,
}

/// An interface for sending a single prompt to a text-completion service and
/// receiving the generated text. The pipeline only depends on this trait, so
/// tests substitute a scripted implementation.
#[async_trait]
pub trait CompletionOracle: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, CompletionError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completions endpoint. Credentials,
/// endpoint and model are fixed at construction and read-only afterwards, so
/// one instance is safely shared across concurrently handled requests.
pub struct CompletionClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl CompletionClient {
    pub fn new(api_key: String, base_url: String, model: String) -> CompletionClient {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        CompletionClient {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    /// Build a client from environment configuration. First access to CONFIG
    /// aborts the process if the API key is missing.
    pub fn from_config() -> CompletionClient {
        Self::new(
            CONFIG.openai_api_key.clone(),
            CONFIG.openai_base_url.clone(),
            CONFIG.openai_model.clone(),
        )
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Pull a human-readable message out of an error response body. The
    /// service normally answers {"error": {"message": ...}}; anything else
    /// falls back to the raw body.
    fn extract_error_message(body: &str) -> String {
        if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
            if let Some(msg) = v["error"]["message"].as_str() {
                return msg.to_string();
            }
        }
        body.trim().to_string()
    }
}

#[async_trait]
impl CompletionOracle for CompletionClient {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
            temperature,
        };

        let response = self
            .client
            .post(self.url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    CompletionError::Auth(status.as_u16())
                }
                StatusCode::TOO_MANY_REQUESTS => CompletionError::RateLimited,
                _ => {
                    let body = response.text().await.unwrap_or_default();
                    CompletionError::Api {
                        status: status.as_u16(),
                        message: Self::extract_error_message(&body),
                    }
                }
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|_| CompletionError::MalformedResponse)?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(CompletionError::MalformedResponse)?;

        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message_from_json_body() {
        let body = r#"{"error": {"message": "Invalid model", "code": 400}}"#;
        assert_eq!(
            CompletionClient::extract_error_message(body),
            "Invalid model"
        );
    }

    #[test]
    fn test_extract_error_message_raw_body() {
        assert_eq!(
            CompletionClient::extract_error_message("  upstream exploded \n"),
            "upstream exploded"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = CompletionClient::new(
            "key".to_string(),
            "https://openrouter.ai/api/v1/".to_string(),
            "gpt-4o-mini".to_string(),
        );
        assert_eq!(client.url(), "https://openrouter.ai/api/v1/chat/completions");
    }
}
