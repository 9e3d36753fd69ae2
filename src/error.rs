// src/error.rs

//! Unified error handling for the job watcher.

use std::fmt;

use thiserror::Error;

use crate::models::RequiredSetting;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// One or more required settings were absent from the environment
    #[error("Missing required settings: {}", format_missing(.0))]
    MissingSettings(Vec<RequiredSetting>),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote API answered with a non-success status
    #[error("API error for {context}: HTTP {status}")]
    Api { context: String, status: u16 },

    /// Notification delivery failed
    #[error("Notification error: {0}")]
    Notify(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an API status error with context.
    pub fn api(context: impl Into<String>, status: reqwest::StatusCode) -> Self {
        Self::Api {
            context: context.into(),
            status: status.as_u16(),
        }
    }

    /// Create a notification error.
    pub fn notify(message: impl fmt::Display) -> Self {
        Self::Notify(message.to_string())
    }

    /// Whether this error comes from configuration rather than a runtime failure.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingSettings(_) | Self::Config(_) | Self::Toml(_) | Self::Url(_)
        )
    }
}

fn format_missing(settings: &[RequiredSetting]) -> String {
    settings
        .iter()
        .map(|s| format!("{} ({})", s.env_var(), s.message()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_settings_lists_every_variable() {
        let err = AppError::MissingSettings(vec![
            RequiredSetting::ApiEmail,
            RequiredSetting::SlackWebhookUrl,
        ]);
        let text = err.to_string();
        assert!(text.contains("GETRO_API_EMAIL"));
        assert!(text.contains("SLACK_WEBHOOK_URL"));
        assert!(err.is_fatal());
    }

    #[test]
    fn runtime_errors_are_not_fatal() {
        let err = AppError::notify("webhook returned 500");
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "Notification error: webhook returned 500");
    }
}
