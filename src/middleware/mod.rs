// ABOUTME: HTTP middleware for request tracing, request IDs and cross-origin access
// ABOUTME: Provides the tower layers applied to every route of the server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// CORS layer built from configuration
pub mod cors;
/// Request span creation and response logging
pub mod tracing;

// CORS configuration
pub use cors::setup_cors;

// Request tracing
pub use self::tracing::{RecordResponse, RequestSpan, REQUEST_ID_HEADER};
