// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses environment variables into a typed server, CORS and LLM configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management for production deployment

use std::env;
use std::fmt::{self, Debug, Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{defaults, env_vars};
use crate::errors::{AppError, AppResult, ErrorCode};

/// Environment type for logging and other deployment-dependent behaviour
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// How recommendations are produced. Fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationMode {
    /// Templated sentence computed locally, no external call
    #[default]
    Mock,
    /// Text generated by the external LLM provider
    Delegated,
}

impl RecommendationMode {
    /// Lowercase name as accepted in configuration
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Delegated => "delegated",
        }
    }
}

impl FromStr for RecommendationMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mock" | "offline" => Ok(Self::Mock),
            "delegated" | "llm" | "gemini" => Ok(Self::Delegated),
            other => Err(AppError::new(
                ErrorCode::ConfigInvalid,
                format!("Unknown recommendation mode '{other}' (expected 'mock' or 'delegated')"),
            )),
        }
    }
}

impl Display for RecommendationMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cross-origin configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    /// `*` or a comma-separated list of origins
    pub allowed_origins: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: defaults::CORS_ALLOWED_ORIGINS.to_owned(),
        }
    }
}

/// External LLM provider configuration
#[derive(Clone, PartialEq)]
pub struct LlmConfig {
    /// Provider API key, required in delegated mode
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// API base URL
    pub base_url: String,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Output token cap
    pub max_tokens: Option<u32>,
}

impl LlmConfig {
    /// Request timeout as a `Duration`
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Connect timeout as a `Duration`
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: defaults::GEMINI_MODEL.to_owned(),
            base_url: defaults::GEMINI_BASE_URL.to_owned(),
            timeout_secs: defaults::LLM_TIMEOUT_SECS,
            connect_timeout_secs: defaults::LLM_CONNECT_TIMEOUT_SECS,
            temperature: None,
            max_tokens: None,
        }
    }
}

impl Debug for LlmConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Complete server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// HTTP port
    pub http_port: u16,
    /// Recommendation mode
    pub mode: RecommendationMode,
    /// Deployment environment
    pub environment: Environment,
    /// Cross-origin policy
    pub cors: CorsConfig,
    /// LLM provider settings
    pub llm: LlmConfig,
    /// Maximum accepted request body in bytes
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_owned(),
            http_port: defaults::HTTP_PORT,
            mode: RecommendationMode::default(),
            environment: Environment::default(),
            cors: CorsConfig::default(),
            llm: LlmConfig::default(),
            max_body_bytes: defaults::MAX_BODY_BYTES,
        }
    }
}

/// Load a `.env` file from the working directory into the process environment
///
/// Variables already set in the environment win. Returns the path of the
/// loaded file, so the caller can log it once logging is up.
#[must_use]
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Command-line overrides applied on top of the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Bind host
    pub host: Option<String>,
    /// HTTP port
    pub http_port: Option<u16>,
    /// Recommendation mode
    pub mode: Option<RecommendationMode>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Only parsing happens here. Call [`ServerConfig::validate`] once every
    /// override has been applied.
    ///
    /// # Errors
    ///
    /// Returns an error if a value fails to parse.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source
    ///
    /// # Errors
    ///
    /// Returns an error if a value fails to parse.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let http_port = match var(env_vars::PORT).or_else(|| var(env_vars::HTTP_PORT)) {
            Some(raw) => parse_value(env_vars::PORT, &raw)?,
            None => defaults::HTTP_PORT,
        };

        let mode = match var(env_vars::RECOMMENDATION_MODE) {
            Some(raw) => raw.parse()?,
            None => RecommendationMode::default(),
        };

        let llm = LlmConfig {
            api_key: var(env_vars::GEMINI_API_KEY),
            model: var(env_vars::GEMINI_MODEL).unwrap_or_else(|| defaults::GEMINI_MODEL.to_owned()),
            base_url: var(env_vars::GEMINI_BASE_URL)
                .map_or_else(|| defaults::GEMINI_BASE_URL.to_owned(), |url| {
                    url.trim_end_matches('/').to_owned()
                }),
            timeout_secs: parse_or(&var, env_vars::LLM_TIMEOUT_SECS, defaults::LLM_TIMEOUT_SECS)?,
            connect_timeout_secs: parse_or(
                &var,
                env_vars::LLM_CONNECT_TIMEOUT_SECS,
                defaults::LLM_CONNECT_TIMEOUT_SECS,
            )?,
            temperature: parse_optional(&var, env_vars::LLM_TEMPERATURE)?,
            max_tokens: parse_optional(&var, env_vars::LLM_MAX_TOKENS)?,
        };

        Ok(Self {
            host: var(env_vars::HOST).unwrap_or_else(|| defaults::HOST.to_owned()),
            http_port,
            mode,
            environment: var(env_vars::ENVIRONMENT)
                .map(|raw| Environment::from_str_or_default(&raw))
                .unwrap_or_default(),
            cors: CorsConfig {
                allowed_origins: var(env_vars::CORS_ALLOWED_ORIGINS)
                    .unwrap_or_else(|| defaults::CORS_ALLOWED_ORIGINS.to_owned()),
            },
            llm,
            max_body_bytes: parse_or(&var, env_vars::MAX_BODY_BYTES, defaults::MAX_BODY_BYTES)?,
        })
    }

    /// Apply command-line overrides; unset fields keep the environment value
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.http_port {
            self.http_port = port;
        }
        if let Some(mode) = overrides.mode {
            self.mode = mode;
        }
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns an error if delegated mode lacks an API key or a timeout is zero.
    pub fn validate(&self) -> AppResult<()> {
        if self.mode == RecommendationMode::Delegated && self.llm.api_key.is_none() {
            return Err(AppError::new(
                ErrorCode::ConfigMissing,
                format!(
                    "{} must be set when {}=delegated",
                    env_vars::GEMINI_API_KEY,
                    env_vars::RECOMMENDATION_MODE
                ),
            ));
        }
        if self.llm.timeout_secs == 0 {
            return Err(AppError::new(
                ErrorCode::ConfigInvalid,
                format!("{} must be greater than zero", env_vars::LLM_TIMEOUT_SECS),
            ));
        }
        Ok(())
    }

    /// One-line summary safe to log (no secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "workout-ai-backend config: addr={}:{} mode={} environment={} model={} timeout={}s cors={} api_key={}",
            self.host,
            self.http_port,
            self.mode,
            self.environment,
            self.llm.model,
            self.llm.timeout_secs,
            self.cors.allowed_origins,
            if self.llm.api_key.is_some() { "set" } else { "unset" },
        )
    }
}

fn parse_value<T>(name: &str, raw: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse().map_err(|e| {
        AppError::new(
            ErrorCode::ConfigInvalid,
            format!("Invalid {name} value '{raw}': {e}"),
        )
    })
}

fn parse_or<T, F>(var: &F, name: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    var(name).map_or(Ok(default), |raw| parse_value(name, &raw))
}

fn parse_optional<T, F>(var: &F, name: &str) -> AppResult<Option<T>>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    var(name).map(|raw| parse_value(name, &raw)).transpose()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.http_port, 10000);
        assert_eq!(config.mode, RecommendationMode::Mock);
        assert_eq!(config.cors.allowed_origins, "*");
    }

    #[test]
    fn test_port_prefers_platform_variable() {
        let config =
            ServerConfig::from_lookup(lookup(&[("PORT", "8080"), ("HTTP_PORT", "9090")])).unwrap();
        assert_eq!(config.http_port, 8080);

        let config = ServerConfig::from_lookup(lookup(&[("HTTP_PORT", "9090")])).unwrap();
        assert_eq!(config.http_port, 9090);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "not-a-port")])).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalid);
    }

    #[test]
    fn test_delegated_mode_requires_api_key() {
        let config = ServerConfig::from_lookup(lookup(&[("RECOMMENDATION_MODE", "delegated")])).unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigMissing);

        let config = ServerConfig::from_lookup(lookup(&[
            ("RECOMMENDATION_MODE", "delegated"),
            ("GEMINI_API_KEY", "test-key"),
            ("LLM_TEMPERATURE", "0.4"),
            ("LLM_MAX_TOKENS", "512"),
        ]))
        .unwrap();
        config.validate().unwrap();
        assert_eq!(config.mode, RecommendationMode::Delegated);
        assert_eq!(config.llm.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.llm.temperature, Some(0.4));
        assert_eq!(config.llm.max_tokens, Some(512));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config =
            ServerConfig::from_lookup(lookup(&[("GEMINI_MODEL", "  "), ("PORT", "")])).unwrap();
        assert_eq!(config.llm.model, defaults::GEMINI_MODEL);
        assert_eq!(config.http_port, defaults::HTTP_PORT);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("MOCK".parse::<RecommendationMode>().unwrap(), RecommendationMode::Mock);
        assert_eq!(
            " delegated ".parse::<RecommendationMode>().unwrap(),
            RecommendationMode::Delegated
        );
        assert!("smart".parse::<RecommendationMode>().is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = ServerConfig::from_lookup(lookup(&[("LLM_TIMEOUT_SECS", "0")])).unwrap();
        assert_eq!(config.validate().unwrap_err().code, ErrorCode::ConfigInvalid);
    }

    #[test]
    fn test_mode_override_is_validated_after_applying() {
        let mut config =
            ServerConfig::from_lookup(lookup(&[("RECOMMENDATION_MODE", "delegated")])).unwrap();
        config.apply_overrides(ConfigOverrides {
            mode: Some(RecommendationMode::Mock),
            ..ConfigOverrides::default()
        });
        config.validate().unwrap();
        assert_eq!(config.mode, RecommendationMode::Mock);

        let mut config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        config.apply_overrides(ConfigOverrides {
            mode: Some(RecommendationMode::Delegated),
            ..ConfigOverrides::default()
        });
        assert_eq!(config.validate().unwrap_err().code, ErrorCode::ConfigMissing);
    }

    #[test]
    fn test_unset_overrides_keep_environment_values() {
        let mut config =
            ServerConfig::from_lookup(lookup(&[("HOST", "127.0.0.1"), ("PORT", "8080")])).unwrap();
        config.apply_overrides(ConfigOverrides {
            http_port: Some(9000),
            ..ConfigOverrides::default()
        });
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.http_port, 9000);
        assert_eq!(config.mode, RecommendationMode::Mock);
    }

    #[test]
    fn test_debug_and_summary_hide_api_key() {
        let config = ServerConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "super-secret")])).unwrap();
        assert!(!format!("{config:?}").contains("super-secret"));
        assert!(!config.summary().contains("super-secret"));
        assert!(config.summary().contains("api_key=set"));
    }
}
