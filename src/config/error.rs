//! Errors raised while reading or writing `config.yml`.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `save` was called before `load` chose a location
    #[error("Configuration file path not set")]
    FilePathNotSet,

    /// No home directory to put `.config/form-builder` in
    #[error("Failed to find home directory")]
    HomeDirectoryNotFound,

    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("Failed to save configuration to {path}: {source}")]
    SaveFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create configuration directory {path}: {source}")]
    CreateDirectoryFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    SerializationFailed(String),

    /// `config.yml` is not valid YAML or has a member of the wrong type
    #[error("Failed to deserialize configuration: {0}")]
    DeserializationFailed(String),

    /// A setting parsed but can not be used, such as an unknown log level
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_value_names_the_setting() {
        let error = ConfigError::InvalidValue {
            key: "log_level".to_string(),
            message: "unknown level 'loud'".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid value for 'log_level': unknown level 'loud'"
        );
    }

    #[test]
    fn io_failures_report_the_path() {
        let error = ConfigError::CreateDirectoryFailed {
            path: PathBuf::from("/home/ada/.config/form-builder"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let message = error.to_string();
        assert!(message.contains(".config/form-builder"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn unsaved_config_has_no_path() {
        assert!(ConfigError::FilePathNotSet
            .to_string()
            .contains("file path not set"));
    }
}
