// ABOUTME: Health check route handlers for service monitoring and uptime checks
// ABOUTME: Provides the plain-text ping route and a JSON health status route
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring
//!
//! `/ping` is what uptime monitors hit; it never touches the LLM provider.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::constants::{messages, service_names};
use crate::resources::ServerResources;

/// Query parameters for `/health`
#[derive(Debug, Default, Deserialize)]
pub struct HealthQuery {
    /// Also check the LLM provider
    #[serde(default)]
    pub detail: bool,
}

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/ping", get(Self::ping))
            .route("/health", get(Self::health))
            .with_state(resources)
    }

    async fn ping() -> &'static str {
        messages::PONG
    }

    async fn health(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<HealthQuery>,
    ) -> Json<Value> {
        let mut body = json!({
            "status": "healthy",
            "service": service_names::WORKOUT_AI_BACKEND,
            "version": env!("CARGO_PKG_VERSION"),
            "mode": resources.recommendations.mode(),
            "uptime_seconds": resources.uptime_secs(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        if query.detail {
            if let Some(provider) = resources.recommendations.provider() {
                let reachable = match provider.health_check().await {
                    Ok(ok) => ok,
                    Err(e) => {
                        warn!(provider = provider.name(), error = %e, "LLM provider health check failed");
                        false
                    }
                };
                body["provider"] = json!({
                    "name": provider.name(),
                    "model": provider.default_model(),
                    "reachable": reachable,
                });
            }
        }

        Json(body)
    }
}
