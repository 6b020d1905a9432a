// ABOUTME: Logging configuration and structured logging setup for observability and debugging
// ABOUTME: Configures log levels, formatters and noise reduction for the tracing subscriber
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Production-ready logging configuration with structured output

use std::env;
use std::io;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{
    filter::Directive,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::Environment;
use crate::constants::service_names;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Emit span open/close events
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Deployment environment, as resolved by the server configuration
    pub environment: Environment,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value, defaulting to pretty
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_spans: false,
            service_name: service_names::WORKOUT_AI_BACKEND.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: Environment::Development,
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    ///
    /// `environment` comes from the parsed server configuration so both agree
    /// on aliases such as `prod`.
    #[must_use]
    pub fn from_env(environment: Environment) -> Self {
        Self::from_lookup(environment, |name| env::var(name).ok())
    }

    /// Build logging configuration from an arbitrary variable source
    #[must_use]
    pub fn from_lookup<F>(environment: Environment, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let level = lookup("RUST_LOG").unwrap_or_else(|| "info".into());
        let format = lookup("LOG_FORMAT")
            .map_or(LogFormat::Pretty, |raw| LogFormat::from_str_or_default(&raw));

        Self {
            level,
            format,
            include_location: environment.is_production()
                || lookup("LOG_INCLUDE_LOCATION").is_some(),
            include_spans: lookup("LOG_INCLUDE_SPANS").is_some(),
            service_name: lookup("SERVICE_NAME")
                .unwrap_or_else(|| service_names::WORKOUT_AI_BACKEND.into()),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment,
        }
    }

    /// Build the filter: the configured level plus noise reduction for HTTP internals
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        let quiet = |directive: &str, fallback: tracing::Level| -> Directive {
            directive.parse().unwrap_or_else(|_| fallback.into())
        };

        EnvFilter::new(&self.level)
            .add_directive(quiet("hyper=warn", tracing::Level::WARN))
            .add_directive(quiet("hyper_util=warn", tracing::Level::WARN))
            .add_directive(quiet("reqwest=warn", tracing::Level::WARN))
            .add_directive(quiet("tower_http=info", tracing::Level::INFO))
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        match self.format {
            LogFormat::Json => {
                let json_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .with_span_events(span_events)
                    .json();
                registry.with(json_layer).try_init()?;
            }
            LogFormat::Pretty => {
                let pretty_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .with_span_events(span_events);
                registry.with(pretty_layer).try_init()?;
            }
            LogFormat::Compact => {
                let compact_layer = fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(io::stdout)
                    .with_span_events(FmtSpan::NONE);
                registry.with(compact_layer).try_init()?;
            }
        }

        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            "Logging initialized"
        );

        Ok(())
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env(environment: Environment) -> Result<()> {
    LoggingConfig::from_env(environment).init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str_or_default("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_str_or_default("COMPACT"), LogFormat::Compact);
        assert_eq!(LogFormat::from_str_or_default("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str_or_default("xml"), LogFormat::Pretty);
    }

    #[test]
    fn test_default_config_targets_this_service() {
        let config = LoggingConfig::default();
        assert_eq!(config.service_name, "workout-ai-backend");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.env_filter().to_string().contains("reqwest=warn"));
    }

    #[test]
    fn test_production_environment_includes_location() {
        let production = LoggingConfig::from_lookup(Environment::Production, |_| None);
        assert!(production.include_location);
        assert_eq!(production.environment, Environment::Production);

        let development = LoggingConfig::from_lookup(Environment::Development, |_| None);
        assert!(!development.include_location);
    }

    #[test]
    fn test_prod_alias_matches_server_configuration() {
        let environment = Environment::from_str_or_default("prod");
        let config = LoggingConfig::from_lookup(environment, |name| {
            (name == "LOG_FORMAT").then(|| "json".to_owned())
        });
        assert!(config.include_location);
        assert_eq!(config.format, LogFormat::Json);
    }
}
