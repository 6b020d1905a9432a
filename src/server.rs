// ABOUTME: HTTP server assembly and lifecycle for the workout recommendation service
// ABOUTME: Builds the axum router with middleware layers, binds, and shuts down gracefully
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server
//!
//! Layer order, outermost first: request id assignment, HTTP tracing,
//! request id propagation, CORS, body limit.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{extract::DefaultBodyLimit, http::Uri, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::middleware::{setup_cors, RecordResponse, RequestSpan};
use crate::resources::ServerResources;
use crate::routes::{AnalyzeRoutes, HealthRoutes};

/// Build the complete application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let max_body_bytes = resources.config.max_body_bytes;
    let cors = setup_cors(&resources.config.cors);

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(AnalyzeRoutes::routes(resources))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(RequestSpan)
                        .on_response(RecordResponse),
                )
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors),
        )
}

async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("Route {}", uri.path()))
}

/// Bind the configured address and serve until Ctrl-C or SIGTERM
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn run(resources: Arc<ServerResources>) -> Result<()> {
    let addr = format!("{}:{}", resources.config.host, resources.config.http_port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    serve(listener, resources).await
}

/// Serve on an already-bound listener
///
/// # Errors
///
/// Returns an error if the server fails.
pub async fn serve(listener: TcpListener, resources: Arc<ServerResources>) -> Result<()> {
    let local_addr = listener
        .local_addr()
        .context("Failed to read listener address")?;
    info!(
        address = %local_addr,
        mode = %resources.recommendations.mode(),
        "Workout AI backend listening"
    );

    let app = build_router(resources);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
