//! Defines the application's primary error type `AppError` and a convenience `Result` alias.
//!
//! Uses the `thiserror` crate for ergonomic error definition and provides `From`
//! implementations to convert common external errors into `AppError` variants.
//! Errors that do not implement `Clone` are wrapped in `Arc` to allow `AppError` to be cloneable,
//! which lets screen controllers keep the last failure around for display.

use std::sync::Arc;
use thiserror::Error;

/// The primary error enumeration for all application-specific errors.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    /// User input rejected before any request was made (e.g. an empty city name).
    #[error("Validation Error: {0}")]
    Validation(String),

    /// Transport-level failure: connection refused, DNS, timeout.
    #[error("Network Error: {0}")]
    Network(Arc<reqwest::Error>),

    /// The backend has no data for the requested city (HTTP 404).
    #[error("No air quality data found for '{0}'")]
    NotFound(String),

    /// The backend answered with a failure status.
    #[error("Server Error ({status}): {message}")]
    Server { status: u16, message: String },

    /// HTTP 200 carrying `success: false`.
    #[error("Application Error: {0}")]
    Application(String),

    /// The response body did not match the expected JSON shape.
    #[error("JSON Parsing Error: {0}")]
    Decode(Arc<serde_json::Error>),

    /// Invalid configuration value (environment or flags).
    #[error("Configuration Error: {0}")]
    Config(String),

    /// Error related to standard I/O operations.
    #[error("I/O Error: {0}")]
    Io(Arc<std::io::Error>),

    /// Error specific to CLI logic or argument handling.
    #[error("CLI Error: {0}")]
    Cli(String),

    /// Error originating from user interaction prompts (`dialoguer`).
    #[error("Dialoguer Error: {0}")]
    Dialoguer(Arc<dialoguer::Error>),

    /// Error related to progress bar style templating (`indicatif`).
    #[error("Progress Style Template Error: {0}")]
    Template(Arc<indicatif::style::TemplateError>),
}

impl AppError {
    /// Message shown to the user when a fetch fails.
    ///
    /// Transport and backend failures collapse into one generic sentence; validation and
    /// application-level failures carry their own text.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::Application(msg) => msg.clone(),
            AppError::NotFound(city) => format!("No air quality data found for {}.", city),
            AppError::Network(_) | AppError::Server { .. } | AppError::Decode(_) => {
                "Failed to fetch air quality data. Please try again.".to_string()
            },
            other => other.to_string(),
        }
    }
}

/// A specialized `Result` type using the application's `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

// --- From implementations ---
// These allow easy conversion from external error types into AppError
// using the `?` operator. Arc is used for non-Clone error types.

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(Arc::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(Arc::new(err))
    }
}

impl From<dialoguer::Error> for AppError {
    fn from(err: dialoguer::Error) -> Self {
        AppError::Dialoguer(Arc::new(err))
    }
}

impl From<indicatif::style::TemplateError> for AppError {
    fn from(err: indicatif::style::TemplateError) -> Self {
        AppError::Template(Arc::new(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(Arc::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_collapses_backend_failures() {
        let err = AppError::Server {
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(
            err.user_message(),
            "Failed to fetch air quality data. Please try again."
        );
    }

    #[test]
    fn test_user_message_keeps_application_text() {
        let err = AppError::Application("Not enough history to predict".to_string());
        assert_eq!(err.user_message(), "Not enough history to predict");
    }

    #[test]
    fn test_json_error_converts_to_decode() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: AppError = json_err.into();
        assert!(matches!(err, AppError::Decode(_)));
    }
}
