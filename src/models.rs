// ABOUTME: Request and response models for the workout recommendation endpoint
// ABOUTME: Lenient parsing of the analysis payload with defaults for missing fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Analysis Models
//!
//! Session entries are opaque: whatever the client sends is kept as a
//! `serde_json::Value` and handed to the prompt untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::defaults;
use crate::errors::{AppError, AppResult};

/// One workout data point. The shape is owned by the client.
pub type SessionEntry = Value;

/// Body of `POST /analyze`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Ordered workout data points
    pub session: Vec<SessionEntry>,
    /// Free-text training goal
    pub goal: String,
}

impl AnalysisRequest {
    /// Create a request from parts
    #[must_use]
    pub fn new(session: Vec<SessionEntry>, goal: impl Into<String>) -> Self {
        Self {
            session,
            goal: goal.into(),
        }
    }

    /// Parse a raw request body
    ///
    /// Only a body that is not JSON is rejected. Everything else is coerced:
    /// an empty body or a non-object is `{}`, a missing or `null` field takes
    /// its default, a scalar `session` becomes a one-element session and a
    /// non-string `goal` is rendered as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error when the body is not valid JSON.
    pub fn from_body(body: &[u8]) -> AppResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::from_value(Value::Object(Map::new())));
        }
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            AppError::invalid_input(format!("Request body is not valid JSON: {e}"))
        })?;
        Ok(Self::from_value(value))
    }

    /// Coerce an already-parsed JSON value into a request
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::default();
        };

        let session = match fields.remove("session") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(entries)) => entries,
            Some(other) => vec![other],
        };

        let goal = match fields.remove("goal") {
            None | Some(Value::Null) => defaults::GOAL.to_owned(),
            Some(Value::String(goal)) => goal,
            Some(other) => other.to_string(),
        };

        Self { session, goal }
    }

    /// Number of data points in the session
    #[must_use]
    pub fn data_points(&self) -> usize {
        self.session.len()
    }
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        Self {
            session: Vec::new(),
            goal: defaults::GOAL.to_owned(),
        }
    }
}

/// Body returned by `POST /analyze`, on success and on provider failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    /// Advice text
    pub recommendation: String,
}

impl AnalysisResponse {
    /// Wrap a recommendation string
    #[must_use]
    pub fn new(recommendation: impl Into<String>) -> Self {
        Self {
            recommendation: recommendation.into(),
        }
    }
}
