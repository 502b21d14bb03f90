//! Model-specific error types.

use super::FieldType;

/// Errors raised when a value does not fit the form model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Field type name not recognised
    #[error("Unknown field type '{0}'")]
    UnknownFieldType(String),

    /// Choice field left without any usable option
    #[error("A {field_type} field needs at least one non-blank option")]
    MissingOptions { field_type: FieldType },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_error_display() {
        let error = ModelError::UnknownFieldType("password".to_string());
        assert!(error.to_string().contains("password"));

        let error = ModelError::MissingOptions {
            field_type: FieldType::Radio,
        };
        assert!(error.to_string().contains("radio"));
        assert!(error.to_string().contains("option"));
    }
}
