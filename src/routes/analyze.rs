// ABOUTME: Workout analysis route handler turning a session and goal into a recommendation
// ABOUTME: Recovers every provider failure at the handler boundary with a fixed 500 body
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Analysis route
//!
//! `POST /analyze` accepts `{ "session": [...], "goal": "..." }` and answers
//! `{ "recommendation": "..." }`. Provider failures are logged in full here
//! and reach the caller only as a generic message with status 500.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tracing::error;

use crate::constants::messages;
use crate::errors::AppError;
use crate::middleware::REQUEST_ID_HEADER;
use crate::models::{AnalysisRequest, AnalysisResponse};
use crate::resources::ServerResources;

/// Analysis routes handler
pub struct AnalyzeRoutes;

impl AnalyzeRoutes {
    /// Create the analysis routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/analyze", post(Self::analyze))
            .with_state(resources)
    }

    fn request_id(headers: &HeaderMap) -> Option<&str> {
        headers.get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok())
    }

    /// Handle `POST /analyze`
    async fn analyze(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let request_id = Self::request_id(&headers);

        let request = AnalysisRequest::from_body(&body).map_err(|e| match request_id {
            Some(id) => e.with_request_id(id),
            None => e,
        })?;

        match resources.recommendations.recommend(&request).await {
            Ok(response) => Ok((StatusCode::OK, Json(response)).into_response()),
            Err(e) => {
                error!(
                    error = %e,
                    code = ?e.code,
                    request_id = request_id.unwrap_or("unknown"),
                    data_points = request.data_points(),
                    goal = %request.goal,
                    "Failed to generate recommendation"
                );
                Ok((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(AnalysisResponse::new(messages::GENERATION_FAILED)),
                )
                    .into_response())
            }
        }
    }
}
