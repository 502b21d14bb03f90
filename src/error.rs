//! Application-wide error types.
//!
//! This module defines the main error type hierarchy for the application,
//! allowing for type-safe error handling throughout the codebase.

pub use crate::config::ConfigError;
pub use crate::model::ModelError;
pub use crate::persist::StorageError;
pub use crate::share::ShareError;
pub use crate::state::StateError;

/// Main application error type.
///
/// This is the top-level error type that encompasses all error types
/// in the application. It uses `thiserror` for automatic error derivation
/// and conversion.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Store errors
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// Persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Sharing errors
    #[error("Share error: {0}")]
    Share(#[from] ShareError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Command line input that can not be acted on
    #[error("Invalid input: {0}")]
    Input(String),

    /// Logger initialization errors
    #[error("Logger error: {0}")]
    Logger(String),
}

impl From<ModelError> for AppError {
    fn from(error: ModelError) -> Self {
        AppError::State(StateError::InvalidField(error))
    }
}

/// Convenience type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_from_config_error() {
        let config_error = ConfigError::FilePathNotSet;
        let app_error: AppError = config_error.into();
        assert!(matches!(app_error, AppError::Config(_)));
        assert!(app_error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_app_error_from_state_error() {
        let state_error = StateError::NoCurrentForm;
        let app_error: AppError = state_error.into();
        assert!(matches!(app_error, AppError::State(_)));
        assert!(app_error.to_string().contains("State error"));
    }

    #[test]
    fn test_app_error_from_storage_error() {
        let app_error: AppError = StorageError::Poisoned.into();
        assert!(matches!(app_error, AppError::Storage(_)));
        assert!(app_error.to_string().contains("Storage error"));
    }

    #[test]
    fn test_app_error_from_model_error() {
        let app_error: AppError = ModelError::UnknownFieldType("slider".to_string()).into();
        assert!(matches!(
            app_error,
            AppError::State(StateError::InvalidField(_))
        ));
        assert!(app_error.to_string().contains("slider"));
    }

    #[test]
    fn test_app_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_error: AppError = io_error.into();
        assert!(matches!(app_error, AppError::Io(_)));
        assert!(app_error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_app_error_input() {
        let error = AppError::Input("expected field=value".to_string());
        assert_eq!(error.to_string(), "Invalid input: expected field=value");
    }
}
