// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports the environment-driven server configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! All settings come from the process environment (optionally seeded from a
//! `.env` file) and are resolved once at startup into a [`ServerConfig`].

/// Environment and server configuration
pub mod environment;

pub use environment::{
    load_dotenv, ConfigOverrides, CorsConfig, Environment, LlmConfig, RecommendationMode,
    ServerConfig,
};
