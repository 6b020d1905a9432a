// ABOUTME: In-process LLM provider doubles for delegated-mode tests
// ABOUTME: Replies with fixed text, fails with a given error, or never answers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use workout_ai_backend::config::ServerConfig;
use workout_ai_backend::errors::{AppError, ErrorCode};
use workout_ai_backend::llm::{CompletionRequest, CompletionResponse, LlmProvider};
use workout_ai_backend::resources::ServerResources;
use workout_ai_backend::services::RecommendationService;

/// What the fake does when asked for a completion
#[derive(Debug, Clone)]
pub enum FakeBehavior {
    /// Answer with this text
    Reply(String),
    /// Fail with this code and message
    Fail(ErrorCode, String),
    /// Sleep far past any configured timeout
    Hang,
}

/// Scriptable provider that records every request it receives
pub struct FakeLlmProvider {
    behavior: FakeBehavior,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeLlmProvider {
    pub fn new(behavior: FakeBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::new(FakeBehavior::Reply(text.to_owned()))
    }

    pub fn failing(code: ErrorCode, message: &str) -> Arc<Self> {
        Self::new(FakeBehavior::Fail(code, message.to_owned()))
    }

    pub fn hanging() -> Arc<Self> {
        Self::new(FakeBehavior::Hang)
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for FakeLlmProvider {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn display_name(&self) -> &'static str {
        "Fake LLM"
    }

    fn default_model(&self) -> &str {
        "fake-model"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.behavior {
            FakeBehavior::Reply(text) => Ok(CompletionResponse {
                content: text.clone(),
                model: "fake-model".to_owned(),
                usage: None,
                finish_reason: Some("stop".to_owned()),
            }),
            FakeBehavior::Fail(code, message) => Err(AppError::new(*code, message.clone())),
            FakeBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(AppError::internal("fake provider woke up"))
            }
        }
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(!matches!(self.behavior, FakeBehavior::Fail(..)))
    }
}

/// Resources in mock mode with default configuration
pub fn mock_resources() -> Arc<ServerResources> {
    Arc::new(ServerResources::new(
        ServerConfig::default(),
        RecommendationService::mock(),
    ))
}

/// Resources in delegated mode backed by `provider`
pub fn delegated_resources(provider: Arc<FakeLlmProvider>, timeout: Duration) -> Arc<ServerResources> {
    let config = ServerConfig {
        mode: workout_ai_backend::config::RecommendationMode::Delegated,
        ..ServerConfig::default()
    };
    Arc::new(ServerResources::new(
        config,
        RecommendationService::delegated(provider, timeout),
    ))
}
