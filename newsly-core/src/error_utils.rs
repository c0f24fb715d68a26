use crate::error::*;
use tracing::{error, info, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::Api(e) => {
                error!("API error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            CoreError::Network(e) => {
                error!(
                    "Network error details: timeout={} connect={} url={:?}",
                    e.is_timeout(),
                    e.is_connect(),
                    e.url().map(|u| u.as_str())
                );
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::Api(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Network(_) => "Connection error. Please try again.".to_string(),
            CoreError::InvalidInput { message } => message.clone(),
            CoreError::Aborted => "The request was cancelled.".to_string(),
            _ => "An unexpected error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::Api(_) => "API".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Serialization(_) => "SERIALIZATION".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
            CoreError::InvalidInput { .. } => "INVALID_INPUT".to_string(),
            CoreError::Aborted => "ABORTED".to_string(),
            CoreError::Internal { .. } => "INTERNAL".to_string(),
        }
    }
}

impl ErrorExt for ApiError {
    fn log_error(&self) -> &Self {
        error!("ApiError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ApiError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ApiError::Http { message, .. } => message.clone(),
            ApiError::InvalidCredentials => {
                "Invalid email or password. Please try again.".to_string()
            }
            ApiError::SignupFailed { .. } => "Signup failed!".to_string(),
            ApiError::Backend { message } => message.clone(),
            ApiError::InvalidResponse { .. } => {
                "The server sent a response we could not read.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ApiError::Http { .. } => "API_HTTP".to_string(),
            ApiError::InvalidCredentials => "API_INVALID_CREDENTIALS".to_string(),
            ApiError::SignupFailed { .. } => "API_SIGNUP_FAILED".to_string(),
            ApiError::Backend { .. } => "API_BACKEND".to_string(),
            ApiError::InvalidResponse { .. } => "API_INVALID_RESPONSE".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("ConfigError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ConfigError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => {
                format!("Configuration file '{}' not found.", path)
            }
            ConfigError::MissingField { field } => {
                format!("Required configuration field '{}' is missing.", field)
            }
            ConfigError::InvalidValue { field, .. } => {
                format!("Invalid value for configuration field '{}'.", field)
            }
            ConfigError::InvalidUrl { field, url } => {
                format!("Configuration field '{}' is not a valid URL: {}", field, url)
            }
            ConfigError::PermissionDenied { .. } => {
                "Permission denied accessing configuration. Please check file permissions."
                    .to_string()
            }
            ConfigError::Parse(_) => {
                "Configuration file could not be parsed. Please check its syntax.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::MissingField { .. } => "CONFIG_MISSING_FIELD".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::InvalidUrl { .. } => "CONFIG_INVALID_URL".to_string(),
            ConfigError::PermissionDenied { .. } => "CONFIG_PERMISSION_DENIED".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
        }
    }
}

pub struct ErrorReporter;

impl ErrorReporter {
    pub fn new() -> Self {
        Self
    }

    /// Logs the error and returns the message to show the user. Rejected
    /// input never reached the backend, so it is only a warning.
    pub fn report_error(&self, error: &CoreError) -> String {
        let message = error.user_friendly_message();
        match error {
            CoreError::InvalidInput { .. } => {
                error.log_warn();
            }
            _ => {
                error.log_error();
                info!("Error code: {}", error.error_code());
            }
        }
        info!("User message: {}", message);
        message
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
