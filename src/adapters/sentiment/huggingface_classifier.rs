//! Hugging Face Inference API classifier.
//!
//! Posts the utterance to `{base_url}/{model}` and reads the star-rated
//! label with the highest score. The default model is
//! `nlptown/bert-base-multilingual-uncased-sentiment`, which labels text
//! "1 star" through "5 stars".

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::sentiment::SentimentLabel;
use crate::ports::{retry_backoff, ClassifierError, SentimentClassifier};

/// Configuration for the Hugging Face classifier.
#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    api_token: Option<Secret<String>>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            model: "nlptown/bert-base-multilingual-uncased-sentiment".to_string(),
            base_url: "https://api-inference.huggingface.co/models".to_string(),
            timeout: Duration::from_secs(20),
            max_retries: 2,
        }
    }
}

impl HuggingFaceConfig {
    /// Sets the API token. Public models answer without one, at a lower rate limit.
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(Secret::new(token.into()));
        self
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
}

/// Sentiment classifier backed by the Hugging Face Inference API.
pub struct HuggingFaceClassifier {
    config: HuggingFaceConfig,
    client: Client,
}

impl HuggingFaceClassifier {
    pub fn new(config: HuggingFaceConfig) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClassifierError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn model_url(&self) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn send_request(&self, text: &str) -> Result<Response, ClassifierError> {
        let mut builder = self
            .client
            .post(self.model_url())
            .json(&InferenceRequest { inputs: text });

        if let Some(token) = &self.config.api_token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ClassifierError::Timeout {
                    timeout_secs: self.config.timeout.as_secs() as u32,
                }
            } else {
                ClassifierError::Network(e.to_string())
            }
        })
    }

    async fn handle_response_status(&self, response: Response) -> Result<Response, ClassifierError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        tracing::warn!(status = %status, model = %self.config.model, "Sentiment request failed");

        match status.as_u16() {
            401 | 403 => Err(ClassifierError::AuthenticationFailed),
            429 => Err(ClassifierError::RateLimited),
            // 503 while the model is loading onto an inference worker
            500..=599 => Err(ClassifierError::Unavailable(format!(
                "{}: {}",
                status, error_body
            ))),
            _ => Err(ClassifierError::Network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    async fn classify_once(&self, text: &str) -> Result<SentimentLabel, ClassifierError> {
        let response = self.send_request(text).await?;
        let response = self.handle_response_status(response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| ClassifierError::Network(e.to_string()))?;
        parse_scores(&body)
    }
}

/// Picks the highest-scoring label from an inference response body.
///
/// The API nests results one level per input (`[[{label, score}, ...]]`);
/// some deployments return the flat form, so both are accepted.
fn parse_scores(body: &str) -> Result<SentimentLabel, ClassifierError> {
    let parsed: InferenceResponse =
        serde_json::from_str(body).map_err(|e| ClassifierError::Parse(e.to_string()))?;

    let scores = match parsed {
        InferenceResponse::Nested(mut batches) => {
            if batches.is_empty() {
                return Err(ClassifierError::EmptyResult);
            }
            batches.swap_remove(0)
        }
        InferenceResponse::Flat(scores) => scores,
    };

    let best = scores
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or(ClassifierError::EmptyResult)?;

    best.label
        .parse::<SentimentLabel>()
        .map_err(|_| ClassifierError::UnknownLabel(best.label))
}

#[async_trait]
impl SentimentClassifier for HuggingFaceClassifier {
    async fn classify(&self, text: &str) -> Result<SentimentLabel, ClassifierError> {
        let mut retry_count = 0;

        loop {
            match self.classify_once(text).await {
                Ok(label) => return Ok(label),
                Err(err) if err.is_retryable() && retry_count < self.config.max_retries => {
                    tracing::debug!(attempt = retry_count + 1, error = %err, "Retrying sentiment classification");
                }
                Err(err) => return Err(err),
            }

            sleep(retry_backoff(retry_count)).await;
            retry_count += 1;
        }
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

// ----- Inference API Types -----

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}
