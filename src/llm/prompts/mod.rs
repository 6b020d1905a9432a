// ABOUTME: Prompts for workout analysis requests sent to the LLM provider
// ABOUTME: Holds the coaching system prompt and renders the goal and session into a user prompt
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Prompts
//!
//! The system prompt is loaded at compile time from markdown for easy editing.
//! The user prompt is one free-text block: the goal, the number of data
//! points, then the session rendered as pretty JSON.

use super::CompletionRequest;
use crate::models::SessionEntry;

/// Coaching persona used for every analysis request
pub const COACH_SYSTEM_PROMPT: &str = include_str!("coach_system.md");

/// Get the coaching system prompt
#[must_use]
pub const fn get_coach_system_prompt() -> &'static str {
    COACH_SYSTEM_PROMPT
}

/// Render the analysis prompt for a goal and a session
#[must_use]
pub fn build_analysis_prompt(goal: &str, session: &[SessionEntry]) -> String {
    let session_text = serde_json::to_string_pretty(session)
        .unwrap_or_else(|_| format!("{session:?}"));

    format!(
        "Analyze the following workout session data and recommend how to train with a focus on {goal}.\n\
         Number of data points: {count}\n\
         \n\
         Session data (JSON):\n\
         {session_text}",
        count = session.len(),
    )
}

/// Build the completion request for an analysis: coaching persona plus the rendered prompt
#[must_use]
pub fn build_analysis_request(goal: &str, session: &[SessionEntry]) -> CompletionRequest {
    CompletionRequest::new(
        get_coach_system_prompt(),
        build_analysis_prompt(goal, session),
    )
}
