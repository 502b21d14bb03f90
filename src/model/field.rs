use super::ModelError;
use fake::Dummy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Specifying the different input types a field can render as.
///
#[derive(Clone, Copy, Debug, Dummy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Dropdown,
    Checkbox,
    Radio,
    Date,
    Number,
    Email,
}

impl FieldType {
    pub const ALL: [FieldType; 8] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Dropdown,
        FieldType::Checkbox,
        FieldType::Radio,
        FieldType::Date,
        FieldType::Number,
        FieldType::Email,
    ];

    /// Whether the type presents a fixed set of choices to pick from.
    ///
    pub fn requires_options(self) -> bool {
        matches!(
            self,
            FieldType::Dropdown | FieldType::Checkbox | FieldType::Radio
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Dropdown => "dropdown",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
            FieldType::Date => "date",
            FieldType::Number => "number",
            FieldType::Email => "email",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        FieldType::ALL
            .iter()
            .copied()
            .find(|field_type| field_type.as_str() == wanted)
            .ok_or_else(|| ModelError::UnknownFieldType(s.to_string()))
    }
}

/// A single typed input definition within a form.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl Field {
    /// Return a copy of this field with every member present in the patch
    /// replaced. The id never changes.
    ///
    pub fn merged(&self, patch: &FieldPatch) -> Field {
        let mut field = self.clone();
        field.apply(patch.clone());
        field
    }

    /// Replace every member present in the patch.
    ///
    pub fn apply(&mut self, patch: FieldPatch) {
        if let Some(field_type) = patch.field_type {
            self.field_type = field_type;
        }
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(placeholder) = patch.placeholder {
            self.placeholder = placeholder;
        }
        if let Some(required) = patch.required {
            self.required = required;
        }
        if let Some(help_text) = patch.help_text {
            self.help_text = help_text;
        }
        if let Some(options) = patch.options {
            self.options = options;
        }
        if let Some(default_value) = patch.default_value {
            self.default_value = default_value;
        }
    }

    /// Bring the options in line with the field type: choice types keep their
    /// trimmed, non-blank options and must have at least one; every other
    /// type carries none.
    ///
    pub fn normalized(mut self) -> Result<Field, ModelError> {
        self.options = normalize_options(self.field_type, self.options)?;
        Ok(self)
    }
}

fn normalize_options(
    field_type: FieldType,
    options: Option<Vec<String>>,
) -> Result<Option<Vec<String>>, ModelError> {
    if !field_type.requires_options() {
        return Ok(None);
    }
    let options: Vec<String> = options
        .unwrap_or_default()
        .into_iter()
        .map(|option| option.trim().to_string())
        .filter(|option| !option.is_empty())
        .collect();
    if options.is_empty() {
        return Err(ModelError::MissingOptions { field_type });
    }
    Ok(Some(options))
}

/// A field definition that has not been given an id yet.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewField {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl NewField {
    pub fn new(field_type: FieldType, label: impl Into<String>) -> NewField {
        NewField {
            field_type,
            label: label.into(),
            placeholder: None,
            required: false,
            help_text: None,
            options: None,
            default_value: None,
        }
    }

    pub fn required(mut self, required: bool) -> NewField {
        self.required = required;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> NewField {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn help_text(mut self, help_text: impl Into<String>) -> NewField {
        self.help_text = Some(help_text.into());
        self
    }

    pub fn options<I, S>(mut self, options: I) -> NewField
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn default_value(mut self, default_value: impl Into<String>) -> NewField {
        self.default_value = Some(default_value.into());
        self
    }

    /// Attach an id, producing a complete field.
    ///
    pub fn with_id(self, id: impl Into<String>) -> Field {
        Field {
            id: id.into(),
            field_type: self.field_type,
            label: self.label,
            placeholder: self.placeholder,
            required: self.required,
            help_text: self.help_text,
            options: self.options,
            default_value: self.default_value,
        }
    }
}

/// Partial update of a field. `None` leaves a member untouched; for optional
/// members `Some(None)` clears the value.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldPatch {
    pub field_type: Option<FieldType>,
    pub label: Option<String>,
    pub placeholder: Option<Option<String>>,
    pub required: Option<bool>,
    pub help_text: Option<Option<String>>,
    pub options: Option<Option<Vec<String>>>,
    pub default_value: Option<Option<String>>,
}

impl FieldPatch {
    pub fn is_empty(&self) -> bool {
        *self == FieldPatch::default()
    }
}
