//! OpenAI Provider - Implementation of ResponseGenerator for OpenAI's API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let provider = OpenAIProvider::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::conversation::Role;
use crate::ports::{
    retry_backoff, AIError, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    ResponseGenerator, TokenUsage,
};

/// Connection settings for [`OpenAIProvider`].
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    api_key: Secret<String>,
    pub model: String,
    /// Everything before `/chat/completions`.
    pub base_url: String,
    /// Per attempt.
    pub timeout: Duration,
    pub max_retries: u32,
    /// Omitted from the request when unset.
    pub temperature: Option<f32>,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
            temperature: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Chat-completions client. One composed prompt in, one reply out.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    pub fn new(config: OpenAIConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn to_openai_request(&self, request: &CompletionRequest) -> OpenAIRequest {
        let messages = request
            .messages
            .iter()
            .map(|msg| OpenAIMessage {
                role: match msg.role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                }
                .to_string(),
                content: Some(msg.content.clone()),
            })
            .collect();

        OpenAIRequest {
            model: self.config.model.clone(),
            messages,
            temperature: self.config.temperature,
        }
    }

    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let openai_request = self.to_openai_request(request);

        self.client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    /// Passes 2xx through; everything else becomes an [`AIError`].
    async fn handle_response_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        tracing::warn!(status = %status, "OpenAI request failed");

        Err(status_error(status.as_u16(), error_body))
    }

    /// Parses a response body.
    async fn parse_response(&self, response: Response) -> Result<CompletionResponse, AIError> {
        let response = self.handle_response_status(response).await?;

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        Self::into_completion(openai_response)
    }

    fn into_completion(openai_response: OpenAIResponse) -> Result<CompletionResponse, AIError> {
        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AIError::parse("No choices in response"))?;

        let finish_reason = match choice.finish_reason.as_deref() {
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            _ => FinishReason::Stop,
        };

        let content = choice.message.content.unwrap_or_default();
        if content.trim().is_empty() {
            return Err(if finish_reason == FinishReason::ContentFilter {
                AIError::content_filtered("reply withheld by provider")
            } else {
                AIError::EmptyResponse
            });
        }

        let usage = openai_response
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            usage,
            model: openai_response.model,
            finish_reason,
        })
    }
}

#[async_trait]
impl ResponseGenerator for OpenAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let mut retry_count = 0;

        loop {
            let result = match self.send_request(&request).await {
                Ok(response) => self.parse_response(response).await,
                Err(err) => Err(err),
            };

            match result {
                Ok(completion) => return Ok(completion),
                Err(err) if err.is_retryable() && retry_count < self.config.max_retries => {
                    tracing::debug!(
                        trace_id = %request.metadata.trace_id,
                        attempt = retry_count + 1,
                        error = %err,
                        "Retrying OpenAI completion"
                    );
                }
                Err(err) => return Err(err),
            }

            sleep(retry_backoff(retry_count)).await;
            retry_count += 1;
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openai", &self.config.model)
    }
}

fn status_error(status: u16, body: String) -> AIError {
    match status {
        401 => AIError::AuthenticationFailed,
        429 => AIError::rate_limited(retry_after_secs(&body)),
        400 => AIError::InvalidRequest(body),
        500..=599 => AIError::unavailable(format!("status {}: {}", status, body)),
        _ => AIError::network(format!("unexpected status {}: {}", status, body)),
    }
}

/// Reads "try again in Ns" out of a 429 body. 30s when absent.
fn retry_after_secs(body: &str) -> u32 {
    const MARKER: &str = "try again in ";
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|parsed| {
            let message = parsed["error"]["message"].as_str()?.to_owned();
            let rest = &message[message.find(MARKER)? + MARKER.len()..];
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()
        })
        .unwrap_or(30)
}

// ----- wire types -----

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    model: String,
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::ports::RequestMetadata;

    fn provider(config: OpenAIConfig) -> OpenAIProvider {
        OpenAIProvider::new(config).unwrap()
    }

    #[test]
    fn config_builder_works() {
        let config = OpenAIConfig::new("test-key")
            .with_model("gpt-4o")
            .with_base_url("https://custom.api.com")
            .with_timeout(Duration::from_secs(30))
            .with_max_retries(5)
            .with_temperature(Some(0.4));

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.base_url, "https://custom.api.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.temperature, Some(0.4));
        assert_eq!(config.api_key.expose_secret(), "test-key");
    }

    #[test]
    fn config_debug_does_not_leak_key() {
        let config = OpenAIConfig::new("sk-very-secret");
        assert!(!format!("{:?}", config).contains("sk-very-secret"));
    }

    #[test]
    fn completions_url_tolerates_trailing_slash() {
        let p = provider(OpenAIConfig::new("k").with_base_url("http://localhost:9000/v1/"));
        assert_eq!(p.completions_url(), "http://localhost:9000/v1/chat/completions");
    }

    #[test]
    fn request_carries_single_user_message() {
        let p = provider(OpenAIConfig::new("k").with_temperature(Some(0.2)));
        let request = CompletionRequest::for_prompt(
            "Respond with a neutral and empathetic tone.",
            RequestMetadata::new(SessionId::new(), "t"),
        );

        let body = serde_json::to_value(p.to_openai_request(&request)).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(
            body["messages"][0]["content"],
            "Respond with a neutral and empathetic tone."
        );
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn parses_completion_body() {
        let body: OpenAIResponse = serde_json::from_str(
            r#"{"model":"gpt-4o-mini","choices":[{"message":{"role":"assistant","content":"You're doing great."},"finish_reason":"stop"}],"usage":{"prompt_tokens":12,"completion_tokens":5}}"#,
        )
        .unwrap();

        let completion = OpenAIProvider::into_completion(body).unwrap();
        assert_eq!(completion.content, "You're doing great.");
        assert_eq!(completion.finish_reason, FinishReason::Stop);
        assert_eq!(completion.usage.total_tokens, 17);
    }

    #[test]
    fn empty_choices_is_parse_error() {
        let body: OpenAIResponse =
            serde_json::from_str(r#"{"model":"gpt-4o-mini","choices":[]}"#).unwrap();
        assert!(matches!(
            OpenAIProvider::into_completion(body),
            Err(AIError::Parse(_))
        ));
    }

    #[test]
    fn blank_content_is_empty_response() {
        let body: OpenAIResponse = serde_json::from_str(
            r#"{"model":"m","choices":[{"message":{"role":"assistant","content":"  "},"finish_reason":"stop"}]}"#,
        )
        .unwrap();
        assert!(matches!(
            OpenAIProvider::into_completion(body),
            Err(AIError::EmptyResponse)
        ));
    }

    #[test]
    fn filtered_null_content_is_content_filtered() {
        let body: OpenAIResponse = serde_json::from_str(
            r#"{"model":"m","choices":[{"message":{"role":"assistant","content":null},"finish_reason":"content_filter"}]}"#,
        )
        .unwrap();
        assert!(matches!(
            OpenAIProvider::into_completion(body),
            Err(AIError::ContentFiltered { .. })
        ));
    }

    #[test]
    fn provider_info_reports_model() {
        let p = provider(OpenAIConfig::new("k").with_model("gpt-4o-mini"));
        assert_eq!(p.provider_info(), ProviderInfo::new("openai", "gpt-4o-mini"));
    }

    #[test]
    fn retry_after_read_from_message() {
        let body = r#"{"error":{"message":"Rate limit exceeded. Please try again in 20 seconds."}}"#;
        assert_eq!(retry_after_secs(body), 20);
    }

    #[test]
    fn retry_after_defaults_to_thirty() {
        assert_eq!(retry_after_secs("not json"), 30);
        assert_eq!(retry_after_secs(r#"{"error":{"message":"Something went wrong"}}"#), 30);
    }

    #[test]
    fn statuses_map_to_errors() {
        assert!(matches!(
            status_error(401, String::new()),
            AIError::AuthenticationFailed
        ));
        assert!(matches!(
            status_error(429, String::new()),
            AIError::RateLimited { retry_after_secs: 30 }
        ));
        assert!(matches!(
            status_error(400, "bad".into()),
            AIError::InvalidRequest(_)
        ));
        assert!(status_error(503, String::new()).is_retryable());
        assert!(matches!(status_error(418, String::new()), AIError::Network(_)));
    }
}
