// ABOUTME: Route module organization for the workout recommendation HTTP endpoints
// ABOUTME: Groups the analyze route and the liveness/health routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to the service layer.

/// Workout analysis route
pub mod analyze;
/// Liveness and health check routes
pub mod health;

/// Analysis route handlers
pub use analyze::AnalyzeRoutes;
/// Health route handlers
pub use health::HealthRoutes;
