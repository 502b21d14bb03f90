use super::{timestamp, Field};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A named, ordered collection of fields plus metadata.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Form {
    /// Return a new form without fields, created and updated at `at`.
    ///
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Form {
        Form {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            fields: vec![],
            created_at: at,
            updated_at: at,
        }
    }

    pub fn field(&self, field_id: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == field_id)
    }

    pub fn field_mut(&mut self, field_id: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|field| field.id == field_id)
    }

    pub fn has_field(&self, field_id: &str) -> bool {
        self.field(field_id).is_some()
    }

    pub fn field_ids(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.id.as_str()).collect()
    }

    /// Record a mutation at `at`. The update time always moves forward by at
    /// least one millisecond, even when the clock has not.
    ///
    pub fn touch(&mut self, at: DateTime<Utc>) {
        let floor = self.updated_at + Duration::milliseconds(1);
        self.updated_at = if at > floor { at } else { floor };
    }

    pub fn apply(&mut self, patch: FormPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(fields) = patch.fields {
            self.fields = fields;
        }
    }
}

/// Partial update of a form. Identity and timestamps are owned by the store
/// and can not be patched.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub fields: Option<Vec<Field>>,
}

impl FormPatch {
    pub fn title(title: impl Into<String>) -> FormPatch {
        FormPatch {
            title: Some(title.into()),
            ..FormPatch::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == FormPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::timestamp::from_millis;
    use crate::model::{FieldType, NewField};

    fn sample_form() -> Form {
        let mut form = Form::new("abc123", "Survey", "desc", from_millis(1_000).unwrap());
        form.fields = vec![
            NewField::new(FieldType::Text, "Name").with_id("f1"),
            NewField::new(FieldType::Email, "Email").with_id("f2"),
        ];
        form
    }

    #[test]
    fn new_form_has_equal_timestamps_and_no_fields() {
        let at = from_millis(42).unwrap();
        let form = Form::new("id", "title", "", at);
        assert!(form.fields.is_empty());
        assert_eq!(form.created_at, at);
        assert_eq!(form.updated_at, at);
    }

    #[test]
    fn touch_moves_forward_even_when_clock_stalls() {
        let mut form = sample_form();
        let stalled = form.updated_at;
        form.touch(stalled);
        assert_eq!(form.updated_at, stalled + Duration::milliseconds(1));
        form.touch(from_millis(0).unwrap());
        assert_eq!(form.updated_at, stalled + Duration::milliseconds(2));
        let later = from_millis(10_000).unwrap();
        form.touch(later);
        assert_eq!(form.updated_at, later);
        assert!(form.updated_at >= form.created_at);
    }

    #[test]
    fn field_lookup() {
        let form = sample_form();
        assert_eq!(form.field("f2").map(|f| f.label.as_str()), Some("Email"));
        assert!(form.field("missing").is_none());
        assert!(form.has_field("f1"));
        assert_eq!(form.field_ids(), vec!["f1", "f2"]);
    }

    #[test]
    fn apply_patch_keeps_untouched_members() {
        let mut form = sample_form();
        form.apply(FormPatch::title("X"));
        assert_eq!(form.title, "X");
        assert_eq!(form.description, "desc");
        assert_eq!(form.fields.len(), 2);
        assert!(FormPatch::default().is_empty());
        assert!(!FormPatch::title("X").is_empty());
    }

    #[test]
    fn serializes_timestamps_as_millis() {
        let json = serde_json::to_value(sample_form()).unwrap();
        assert_eq!(json["createdAt"], 1_000);
        assert_eq!(json["updatedAt"], 1_000);
        assert_eq!(json["fields"][1]["type"], "email");
    }
}
