//! Store-specific error types.

use crate::model::ModelError;

/// Errors that can occur during store operations.
///
/// Unknown form and field ids are not errors for the store itself; the
/// lookup variants are raised by callers that need the target to exist.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Field definition does not fit the model
    #[error("Invalid field: {0}")]
    InvalidField(#[from] ModelError),

    /// Two fields of one form share an id
    #[error("Duplicate field id: {field_id}")]
    DuplicateFieldId { field_id: String },

    /// Form not found in the store
    #[error("Form not found: {id}")]
    FormNotFound { id: String },

    /// Field not found in the current form
    #[error("Field not found: {id}")]
    FieldNotFound { id: String },

    /// Operation needs a current form
    #[error("No current form selected")]
    NoCurrentForm,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldType;

    #[test]
    fn test_state_error_display() {
        let error = StateError::InvalidField(ModelError::MissingOptions {
            field_type: FieldType::Checkbox,
        });
        assert!(error.to_string().contains("Invalid field"));
        assert!(error.to_string().contains("checkbox"));

        let error = StateError::DuplicateFieldId {
            field_id: "f1".to_string(),
        };
        assert!(error.to_string().contains("Duplicate field id"));
        assert!(error.to_string().contains("f1"));

        let error = StateError::FormNotFound {
            id: "abc123".to_string(),
        };
        assert!(error.to_string().contains("Form not found"));
        assert!(error.to_string().contains("abc123"));

        let error = StateError::FieldNotFound {
            id: "f9".to_string(),
        };
        assert!(error.to_string().contains("f9"));

        let error = StateError::NoCurrentForm;
        assert!(error.to_string().contains("No current form"));
    }

    #[test]
    fn test_state_error_from_model_error() {
        let error: StateError = ModelError::UnknownFieldType("slider".to_string()).into();
        assert!(matches!(error, StateError::InvalidField(_)));
    }
}
