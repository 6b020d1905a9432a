// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Hosts the recommendation service used by the analyze endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Route handlers stay thin and delegate here, so the same logic can be
//! exercised directly in tests without an HTTP round trip.

/// Mock and LLM-delegated workout recommendations
pub mod recommendation;

pub use recommendation::RecommendationService;
