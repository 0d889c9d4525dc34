//! Gemini `generateContent` client.
//!
//! Only the text of the first candidate is used. There is no request timeout
//! and no retry: a slow model holds the caller until it answers.
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::GeminiConfig;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("GOOGLE_API_KEY environment variable not set.")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Status { status: u16, message: String },
    #[error("response contained no text (finish reason: {reason})")]
    EmptyResponse { reason: String },
}

/// Anything that turns a prompt into free-form text.
#[async_trait]
pub trait StructuringModel: Send + Sync {
    fn name(&self) -> &str;
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn into_text(self) -> Result<String, InferenceError> {
        let block_reason = self.prompt_feedback.and_then(|f| f.block_reason);
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(InferenceError::EmptyResponse {
                reason: block_reason.unwrap_or_else(|| "no candidates".to_string()),
            });
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(InferenceError::EmptyResponse {
                reason: candidate
                    .finish_reason
                    .unwrap_or_else(|| "unknown".to_string()),
            });
        }
        Ok(text)
    }
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self, InferenceError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(InferenceError::MissingApiKey)?
            .to_string();

        let http_client = reqwest::Client::builder().build()?;

        debug!(base_url = %config.base_url, model = %config.model, "gemini client ready");

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl StructuringModel for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        let body = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        });

        debug!(model = %self.model, prompt_chars = prompt.len(), "calling gemini");

        let resp = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(InferenceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = resp.json().await?;
        parsed.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(server: &mockito::ServerGuard) -> GeminiConfig {
        GeminiConfig {
            api_key: Some("test-key".to_string()),
            model: "gemini-test".to_string(),
            base_url: server.url(),
        }
    }

    #[test]
    fn missing_key_is_rejected() {
        let err = GeminiClient::new(&GeminiConfig::default()).unwrap_err();
        assert!(matches!(err, InferenceError::MissingApiKey));

        let config = GeminiConfig {
            api_key: Some(String::new()),
            ..GeminiConfig::default()
        };
        assert!(matches!(
            GeminiClient::new(&config).unwrap_err(),
            InferenceError::MissingApiKey
        ));
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let config = GeminiConfig {
            api_key: Some("k".to_string()),
            model: "gemini-1.5-flash-latest".to_string(),
            base_url: "https://example.test/".to_string(),
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-1.5-flash-latest:generateContent"
        );
    }

    #[tokio::test]
    async fn generate_returns_candidate_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-test:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"contents":[{"role":"user","parts":[{"text":"hello"}]}]}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{\"a\":"},{"text":"1}"}]},"finishReason":"STOP"}]}"#,
            )
            .create_async()
            .await;

        let client = GeminiClient::new(&config_for(&server)).unwrap();
        let text = client.generate("hello").await.unwrap();
        assert_eq!(text, "{\"a\":1}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn api_error_message_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-test:generateContent")
            .with_status(403)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"code":403,"message":"API key not valid.","status":"PERMISSION_DENIED"}}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(&config_for(&server)).unwrap();
        match client.generate("hello").await.unwrap_err() {
            InferenceError::Status { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn blocked_prompt_is_empty_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-test:generateContent")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(&config_for(&server)).unwrap();
        let err = client.generate("hello").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "response contained no text (finish reason: SAFETY)"
        );
    }

    #[tokio::test]
    async fn candidate_without_text_is_empty_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-test:generateContent")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"finishReason":"RECITATION"}]}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(&config_for(&server)).unwrap();
        assert!(matches!(
            client.generate("hello").await.unwrap_err(),
            InferenceError::EmptyResponse { reason } if reason == "RECITATION"
        ));
    }
}
