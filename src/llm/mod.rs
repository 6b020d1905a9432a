// ABOUTME: LLM provider abstraction layer for delegating recommendations to a hosted model
// ABOUTME: Defines the provider contract and the completion request and response types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Provider Interface
//!
//! The recommendation service only needs `complete(prompt) -> text`. Providers
//! implement [`LlmProvider`] so the concrete client (Gemini in production, a
//! fake in tests) is injected at startup. Sampling settings belong to the
//! provider's configuration, not to individual requests.

mod gemini;
pub mod prompts;

pub use gemini::GeminiProvider;
pub use prompts::{build_analysis_prompt, build_analysis_request, get_coach_system_prompt};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// One single-turn completion: standing instructions plus the prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Persona and output rules sent as the system instruction
    pub system: String,
    /// The user prompt
    pub prompt: String,
}

impl CompletionRequest {
    /// Create a request from instructions and prompt
    #[must_use]
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
        }
    }
}

/// Text produced by a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated text, returned to the caller verbatim
    pub content: String,
    /// Model that produced it
    pub model: String,
    /// Token accounting, when the provider reports it
    pub usage: Option<TokenUsage>,
    /// Why generation stopped
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,
    /// Number of tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

/// Hosted text-generation backend
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Unique provider identifier (e.g., "gemini")
    fn name(&self) -> &'static str;

    /// Human-readable display name for the provider
    fn display_name(&self) -> &'static str;

    /// Model used for completions
    fn default_model(&self) -> &str;

    /// Generate text for one request
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, AppError>;

    /// Check if the provider is reachable and the API key is valid
    async fn health_check(&self) -> Result<bool, AppError>;
}
