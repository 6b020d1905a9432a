// ABOUTME: Google Gemini LLM provider for delegated workout recommendations
// ABOUTME: Calls the Generative Language API generateContent method with bounded timeouts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Gemini Provider
//!
//! Implementation of the `LlmProvider` trait for Google's Gemini models.
//!
//! ## Configuration
//!
//! Set the `GEMINI_API_KEY` environment variable with your API key from
//! Google AI Studio. `GEMINI_MODEL` and `GEMINI_BASE_URL` override the model
//! and endpoint; `LLM_TIMEOUT_SECS` bounds each call.
//!
//! The key travels in the `x-goog-api-key` header, never in the URL, so
//! transport errors (which render the URL) cannot carry it into logs.
//!
//! ## Example
//!
//! ```rust,no_run
//! use workout_ai_backend::config::ServerConfig;
//! use workout_ai_backend::errors::AppError;
//! use workout_ai_backend::llm::{CompletionRequest, GeminiProvider, LlmProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = ServerConfig::from_env()?;
//!     let provider = GeminiProvider::from_config(&config.llm)?;
//!     let request = CompletionRequest::new("You are a running coach.", "Plan a 20 minute warm-up.");
//!     let response = provider.complete(&request).await?;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::{CompletionRequest, CompletionResponse, LlmProvider, TokenUsage};
use crate::config::LlmConfig;
use crate::constants::env_vars;
use crate::errors::{AppError, ErrorCode};

/// Display name used in error messages
const SERVICE_NAME: &str = "Gemini";

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

// ============================================================================
// API Request/Response Types
// ============================================================================

/// Gemini API request structure
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// Content structure for Gemini API
#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

/// Part of content. Non-text parts are kept as raw JSON and skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ContentPart {
    Text { text: String },
    Other(serde_json::Value),
}

/// Generation configuration
#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    candidate_count: u32,
}

/// Gemini API response structure
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
    error: Option<GeminiError>,
}

/// Response candidate
#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<GeminiContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

/// Usage metadata from Gemini API response
#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount")]
    prompt: Option<u32>,
    #[serde(rename = "candidatesTokenCount")]
    candidates: Option<u32>,
    #[serde(rename = "totalTokenCount")]
    total: Option<u32>,
}

/// API error response from Gemini
#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Google Gemini LLM provider
pub struct GeminiProvider {
    api_key: String,
    client: Client,
    base_url: String,
    default_model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl GeminiProvider {
    /// Create a provider with default endpoint, model and timeouts
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, AppError> {
        let config = LlmConfig {
            api_key: Some(api_key.into()),
            ..LlmConfig::default()
        };
        Self::from_config(&config)
    }

    /// Create a provider from the LLM section of the server configuration
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured or the HTTP client cannot be built.
    pub fn from_config(config: &LlmConfig) -> Result<Self, AppError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            AppError::new(
                ErrorCode::ConfigMissing,
                format!("{} environment variable not set", env_vars::GEMINI_API_KEY),
            )
        })?;

        let client = ClientBuilder::new()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            default_model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Set a custom default model
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Set a custom API base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Build the API URL for a model and method
    fn build_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{model}:{method}", self.base_url)
    }

    /// Build a Gemini API request: persona as system instruction, prompt as the single user turn
    fn build_gemini_request(&self, request: &CompletionRequest) -> GeminiRequest {
        let system_instruction = (!request.system.is_empty()).then(|| GeminiContent {
            role: None,
            parts: vec![ContentPart::Text {
                text: request.system.clone(),
            }],
        });

        let generation_config = (self.temperature.is_some() || self.max_tokens.is_some())
            .then_some(GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_tokens,
                candidate_count: 1,
            });

        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_owned()),
                parts: vec![ContentPart::Text {
                    text: request.prompt.clone(),
                }],
            }],
            system_instruction,
            generation_config,
        }
    }

    /// Extract text content from Gemini response, joining all text parts of the first candidate
    fn extract_content(response: &GeminiResponse) -> Result<String, AppError> {
        let parts = response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default();

        let text: String = parts
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                ContentPart::Other(_) => None,
            })
            .collect();

        if text.is_empty() {
            return Err(AppError::external_service(
                SERVICE_NAME,
                "No text content in response",
            ));
        }
        Ok(text)
    }

    /// Convert usage metadata to our token usage format
    fn convert_usage(metadata: &UsageMetadata) -> TokenUsage {
        TokenUsage {
            prompt_tokens: metadata.prompt.unwrap_or(0),
            completion_tokens: metadata.candidates.unwrap_or(0),
            total_tokens: metadata.total.unwrap_or(0),
        }
    }

    /// Map API error status to appropriate error type
    fn map_api_error(status: u16, response_text: &str) -> AppError {
        let message = serde_json::from_str::<GeminiResponse>(response_text)
            .ok()
            .and_then(|r| r.error)
            .map_or_else(|| response_text.to_owned(), |e| e.message);

        match status {
            401 | 403 => AppError::new(
                ErrorCode::ExternalAuthFailed,
                format!("{SERVICE_NAME} rejected credentials ({status}): {message}"),
            ),
            429 => AppError::new(
                ErrorCode::ExternalRateLimited,
                Self::extract_quota_message(&message),
            ),
            _ => AppError::external_service(SERVICE_NAME, format!("API error ({status}): {message}")),
        }
    }

    /// Map transport failures; timeouts and connect errors mean the service is unavailable
    fn map_transport_error(err: reqwest::Error) -> AppError {
        let err = err.without_url();
        if err.is_timeout() || err.is_connect() {
            AppError::external_unavailable(SERVICE_NAME, format!("request failed: {err}"))
        } else {
            AppError::external_service(SERVICE_NAME, format!("HTTP request failed: {err}"))
        }
    }

    /// Extract a user-friendly quota/rate limit message from Gemini error
    fn extract_quota_message(message: &str) -> String {
        // Example: "... Please retry in 6.406453963s."
        const PREFIX: &str = "Please retry in ";
        if let Some(retry_pos) = message.find(PREFIX) {
            let after_prefix = &message[retry_pos + PREFIX.len()..];
            if let Some(s_pos) = after_prefix.find('s') {
                if let Ok(seconds) = after_prefix[..s_pos].parse::<f64>() {
                    let seconds_int = seconds.ceil() as u64;
                    return format!(
                        "AI service quota exceeded. Please try again in {seconds_int} seconds."
                    );
                }
            }
        }
        "AI service quota exceeded. Please wait a moment and try again.".to_owned()
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn display_name(&self) -> &'static str {
        "Google Gemini"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    #[instrument(skip_all, fields(provider = "gemini"))]
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, AppError> {
        let model = self.default_model.as_str();
        let url = self.build_url(model, "generateContent");
        let gemini_request = self.build_gemini_request(request);

        debug!(model, "Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&gemini_request)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(Self::map_transport_error)?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(Self::map_api_error(status.as_u16(), &response_text));
        }

        let gemini_response: GeminiResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                error!(error = %e, response = %response_text, "Failed to parse response");
                AppError::external_service(SERVICE_NAME, format!("Failed to parse response: {e}"))
            })?;

        if let Some(error) = gemini_response.error {
            return Err(AppError::external_service(SERVICE_NAME, error.message));
        }

        let content = Self::extract_content(&gemini_response)?;
        let usage = gemini_response
            .usage_metadata
            .as_ref()
            .map(Self::convert_usage);
        let finish_reason = gemini_response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.finish_reason.clone());

        debug!(?usage, "Successfully received Gemini response");

        Ok(CompletionResponse {
            content,
            model: model.to_owned(),
            usage,
            finish_reason,
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, AppError> {
        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        Ok(response.status().is_success())
    }
}

impl Debug for GeminiProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiProvider")
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;

    fn provider() -> GeminiProvider {
        GeminiProvider::new("test-key").unwrap()
    }

    #[test]
    fn test_persona_becomes_system_instruction() {
        let request = CompletionRequest::new("coach persona", "analyze this");
        let body = serde_json::to_value(provider().build_gemini_request(&request)).unwrap();

        assert_eq!(body["system_instruction"]["parts"][0]["text"], "coach persona");
        assert!(body["system_instruction"].get("role").is_none());
        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "analyze this");
        assert!(body.get("generation_config").is_none());
    }

    #[test]
    fn test_generation_config_from_provider_defaults() {
        let config = LlmConfig {
            api_key: Some("k".to_owned()),
            temperature: Some(0.5),
            max_tokens: Some(300),
            ..LlmConfig::default()
        };
        let provider = GeminiProvider::from_config(&config).unwrap();
        let request = CompletionRequest::new("", "hi");
        let body = serde_json::to_value(provider.build_gemini_request(&request)).unwrap();

        assert_eq!(body["generation_config"]["temperature"], 0.5);
        assert_eq!(body["generation_config"]["max_output_tokens"], 300);
        assert!(body.get("system_instruction").is_none());
        assert_eq!(body["generation_config"]["candidate_count"], 1);
    }

    #[test]
    fn test_extract_content_joins_text_parts() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "Increase volume. "},
                    {"functionCall": {"name": "noop", "args": {}}},
                    {"text": "Sleep more."}
                ]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();

        assert_eq!(
            GeminiProvider::extract_content(&response).unwrap(),
            "Increase volume. Sleep more."
        );
    }

    #[test]
    fn test_extract_content_without_candidates_fails() {
        let response: GeminiResponse =
            serde_json::from_value(json!({"candidates": []})).unwrap();
        let err = GeminiProvider::extract_content(&response).unwrap_err();
        assert_eq!(err.code, ErrorCode::ExternalServiceError);
    }

    #[test]
    fn test_map_api_error_by_status() {
        let body = r#"{"error": {"message": "API key not valid"}}"#;
        assert_eq!(
            GeminiProvider::map_api_error(403, body).code,
            ErrorCode::ExternalAuthFailed
        );
        assert_eq!(
            GeminiProvider::map_api_error(500, "boom").code,
            ErrorCode::ExternalServiceError
        );

        let limited = GeminiProvider::map_api_error(
            429,
            r#"{"error": {"message": "Quota exceeded. Please retry in 6.406453963s."}}"#,
        );
        assert_eq!(limited.code, ErrorCode::ExternalRateLimited);
        assert_eq!(
            limited.message,
            "AI service quota exceeded. Please try again in 7 seconds."
        );
    }

    #[test]
    fn test_quota_message_without_retry_hint() {
        assert_eq!(
            GeminiProvider::extract_quota_message("Resource exhausted"),
            "AI service quota exceeded. Please wait a moment and try again."
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", provider());
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("test-key"));
    }

    #[test]
    fn test_build_url_trims_trailing_slash() {
        let provider = provider().with_base_url("http://localhost:9999/v1beta/");
        assert_eq!(
            provider.build_url("gemini-2.5-flash", "generateContent"),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_transport_error_never_contains_api_key() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let secret = "secret-gemini-key-123";
        let provider = GeminiProvider::new(secret)
            .unwrap()
            .with_base_url(format!("http://{addr}/v1beta"));
        let err = provider
            .complete(&CompletionRequest::new("persona", "prompt"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);
        assert!(!err.to_string().contains(secret));
        assert!(!err.message.contains("key="));
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = GeminiProvider::from_config(&LlmConfig::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigMissing);
    }
}
