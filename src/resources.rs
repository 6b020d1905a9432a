// ABOUTME: Centralized resource container for dependency injection into route handlers
// ABOUTME: Holds the immutable configuration and the recommendation service behind Arc
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Resources
//!
//! Everything a handler needs is built once at startup and shared read-only.
//! Tests build resources around a fake LLM provider instead of Gemini.

use std::sync::Arc;
use std::time::Instant;

use crate::config::ServerConfig;
use crate::errors::AppResult;
use crate::services::RecommendationService;

/// Shared, immutable server resources
#[derive(Debug, Clone)]
pub struct ServerResources {
    /// Resolved configuration
    pub config: Arc<ServerConfig>,
    /// Recommendation service for the configured mode
    pub recommendations: Arc<RecommendationService>,
    /// Process start, for uptime reporting
    pub start_time: Instant,
}

impl ServerResources {
    /// Assemble resources from an already-built service
    #[must_use]
    pub fn new(config: ServerConfig, recommendations: RecommendationService) -> Self {
        Self {
            config: Arc::new(config),
            recommendations: Arc::new(recommendations),
            start_time: Instant::now(),
        }
    }

    /// Build the service selected by `config` and wrap everything
    ///
    /// # Errors
    ///
    /// Returns an error if the LLM provider cannot be created.
    pub fn from_config(config: ServerConfig) -> AppResult<Self> {
        let recommendations = RecommendationService::from_config(&config)?;
        Ok(Self::new(config, recommendations))
    }

    /// Seconds since the resources were created
    #[must_use]
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
