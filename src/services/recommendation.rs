// ABOUTME: Recommendation service producing workout advice from a session and a goal
// ABOUTME: Templated mock mode or delegation to an injected LLM provider under a timeout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::config::{RecommendationMode, ServerConfig};
use crate::constants::messages;
use crate::errors::{AppError, AppResult};
use crate::llm::{build_analysis_request, GeminiProvider, LlmProvider};
use crate::models::{AnalysisRequest, AnalysisResponse};

/// How the service turns a request into advice
enum Engine {
    Mock,
    Delegated {
        provider: Arc<dyn LlmProvider>,
        timeout: Duration,
    },
}

/// Stateless recommendation service shared by all requests
pub struct RecommendationService {
    engine: Engine,
}

impl RecommendationService {
    /// Service that answers from the local template only
    #[must_use]
    pub const fn mock() -> Self {
        Self {
            engine: Engine::Mock,
        }
    }

    /// Service that forwards every request to `provider`, bounded by `timeout`
    #[must_use]
    pub fn delegated(provider: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self {
            engine: Engine::Delegated { provider, timeout },
        }
    }

    /// Build the service selected by the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if delegated mode is selected and the Gemini client cannot be created.
    pub fn from_config(config: &ServerConfig) -> AppResult<Self> {
        match config.mode {
            RecommendationMode::Mock => Ok(Self::mock()),
            RecommendationMode::Delegated => {
                let provider = GeminiProvider::from_config(&config.llm)?;
                info!(
                    provider = provider.display_name(),
                    model = provider.default_model(),
                    "LLM provider initialized"
                );
                Ok(Self::delegated(Arc::new(provider), config.llm.timeout()))
            }
        }
    }

    /// Active mode
    #[must_use]
    pub const fn mode(&self) -> RecommendationMode {
        match self.engine {
            Engine::Mock => RecommendationMode::Mock,
            Engine::Delegated { .. } => RecommendationMode::Delegated,
        }
    }

    /// Injected provider in delegated mode
    #[must_use]
    pub fn provider(&self) -> Option<&dyn LlmProvider> {
        match &self.engine {
            Engine::Mock => None,
            Engine::Delegated { provider, .. } => Some(provider.as_ref()),
        }
    }

    /// Templated advice used in mock mode
    #[must_use]
    pub fn mock_recommendation(request: &AnalysisRequest) -> String {
        if request.session.is_empty() {
            messages::NOT_ENOUGH_DATA.to_owned()
        } else {
            format!(
                "Based on {} data points, you should train with a focus on {}.",
                request.data_points(),
                request.goal
            )
        }
    }

    /// Produce a recommendation for one request
    ///
    /// Mock mode never fails.
    ///
    /// # Errors
    ///
    /// In delegated mode, returns the provider error, or an unavailable error
    /// when the provider does not answer within the configured timeout.
    #[instrument(skip_all, fields(mode = %self.mode(), data_points = request.data_points()))]
    pub async fn recommend(&self, request: &AnalysisRequest) -> AppResult<AnalysisResponse> {
        match &self.engine {
            Engine::Mock => Ok(AnalysisResponse::new(Self::mock_recommendation(request))),
            Engine::Delegated { provider, timeout } => {
                Self::delegate(provider.as_ref(), *timeout, request).await
            }
        }
    }

    async fn delegate(
        provider: &dyn LlmProvider,
        limit: Duration,
        request: &AnalysisRequest,
    ) -> AppResult<AnalysisResponse> {
        info!(
            goal = %request.goal,
            provider = provider.name(),
            "Requesting recommendation from LLM provider"
        );
        debug!(
            session = %serde_json::Value::Array(request.session.clone()),
            "Analysis payload"
        );

        let completion = build_analysis_request(&request.goal, &request.session);

        let response = timeout(limit, provider.complete(&completion))
            .await
            .map_err(|_| {
                warn!(timeout_secs = limit.as_secs(), "LLM provider timed out");
                AppError::external_unavailable(
                    provider.display_name(),
                    format!("no response within {}s", limit.as_secs()),
                )
            })??;

        debug!(
            model = %response.model,
            finish_reason = response.finish_reason.as_deref().unwrap_or("unknown"),
            "LLM provider answered"
        );

        Ok(AnalysisResponse::new(response.content))
    }
}

impl Debug for RecommendationService {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("RecommendationService");
        debug.field("mode", &self.mode());
        if let Engine::Delegated { provider, timeout } = &self.engine {
            debug.field("provider", &provider.name()).field("timeout", timeout);
        }
        debug.finish()
    }
}
