// ABOUTME: Main library entry point for the workout AI recommendation backend
// ABOUTME: Exposes configuration, routes, the recommendation service and the LLM provider seam
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Workout AI Backend
//!
//! A small HTTP service that turns a workout session and a fitness goal into a
//! training recommendation. Recommendations are either a local templated
//! sentence (mock mode) or text generated by Google Gemini (delegated mode).
//!
//! ## Routes
//!
//! - `GET /ping`: liveness, plain `pong`
//! - `GET /health`: JSON status, `?detail=true` also checks the LLM provider
//! - `POST /analyze`: `{ "session": [...], "goal": "..." }` to `{ "recommendation": "..." }`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use workout_ai_backend::config::ServerConfig;
//! use workout_ai_backend::resources::ServerResources;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     config.validate()?;
//!     let resources = Arc::new(ServerResources::from_config(config)?);
//!     workout_ai_backend::server::run(resources).await
//! }
//! ```

/// Environment-driven configuration
pub mod config;

/// Fixed messages, defaults and environment variable names
pub mod constants;

/// Unified error handling
pub mod errors;

/// LLM provider abstraction and the Gemini implementation
pub mod llm;

/// Structured logging setup
pub mod logging;

/// HTTP middleware: CORS and request tracing
pub mod middleware;

/// Request and response models
pub mod models;

/// Shared resources injected into handlers
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Router assembly and server lifecycle
pub mod server;

/// Recommendation service
pub mod services;
