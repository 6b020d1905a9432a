// ABOUTME: System-wide constants for the workout recommendation service
// ABOUTME: Fixed response strings, configuration defaults and environment variable names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module
//!
//! Hardcoded strings and defaults. Anything a deployment may change is read
//! through `config::environment` using the names in [`env_vars`].

/// Fixed strings returned by the recommendation endpoint
pub mod messages {
    /// Recommendation returned in mock mode when the session is empty
    pub const NOT_ENOUGH_DATA: &str = "Not enough data to analyze.";

    /// Recommendation returned with a 500 when the provider call fails
    pub const GENERATION_FAILED: &str = "Error generating recommendation.";

    /// Body of the liveness route
    pub const PONG: &str = "pong";
}

/// Request defaults
pub mod defaults {
    /// Goal used when the request omits one
    pub const GOAL: &str = "general fitness";

    /// Default bind host
    pub const HOST: &str = "0.0.0.0";

    /// Default HTTP port
    pub const HTTP_PORT: u16 = 10000;

    /// Default Gemini model
    pub const GEMINI_MODEL: &str = "gemini-2.5-flash";

    /// Base URL for the Generative Language API
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Provider request timeout
    pub const LLM_TIMEOUT_SECS: u64 = 30;

    /// Provider connect timeout
    pub const LLM_CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Request body limit (the web client posts every workout file at once)
    pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

    /// Wildcard CORS origin
    pub const CORS_ALLOWED_ORIGINS: &str = "*";
}

/// Environment variable names
pub mod env_vars {
    /// Bind host
    pub const HOST: &str = "HOST";
    /// Bind port (hosting platforms set this one)
    pub const PORT: &str = "PORT";
    /// Bind port fallback
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// `mock` or `delegated`
    pub const RECOMMENDATION_MODE: &str = "RECOMMENDATION_MODE";
    /// Gemini API key
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    /// Gemini model id
    pub const GEMINI_MODEL: &str = "GEMINI_MODEL";
    /// Gemini API base URL
    pub const GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";
    /// Provider request timeout in seconds
    pub const LLM_TIMEOUT_SECS: &str = "LLM_TIMEOUT_SECS";
    /// Provider connect timeout in seconds
    pub const LLM_CONNECT_TIMEOUT_SECS: &str = "LLM_CONNECT_TIMEOUT_SECS";
    /// Optional sampling temperature
    pub const LLM_TEMPERATURE: &str = "LLM_TEMPERATURE";
    /// Optional output token cap
    pub const LLM_MAX_TOKENS: &str = "LLM_MAX_TOKENS";
    /// Allowed CORS origins
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
    /// Request body limit in bytes
    pub const MAX_BODY_BYTES: &str = "MAX_BODY_BYTES";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}

/// Service identity used in logs and health output
pub mod service_names {
    /// Service name
    pub const WORKOUT_AI_BACKEND: &str = "workout-ai-backend";
}
