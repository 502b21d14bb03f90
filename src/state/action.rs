use super::ReorderPolicy;
use crate::model::{Field, FieldPatch, FormPatch};
use chrono::{DateTime, Utc};

/// Specify the different state transitions.
///
/// Actions are complete: fresh ids and times are chosen by the dispatcher
/// before an action is built, so applying one is deterministic. Field
/// payloads are expected to be normalized already.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CreateForm {
        id: String,
        title: String,
        description: String,
        at: DateTime<Utc>,
    },
    UpdateForm {
        id: String,
        patch: FormPatch,
        at: DateTime<Utc>,
    },
    DeleteForm {
        id: String,
    },
    SetCurrentForm {
        id: Option<String>,
    },
    AddField {
        field: Field,
        at: DateTime<Utc>,
    },
    UpdateField {
        field_id: String,
        patch: FieldPatch,
        at: DateTime<Utc>,
    },
    DeleteField {
        field_id: String,
        at: DateTime<Utc>,
    },
    ReorderFields {
        order: Vec<String>,
        policy: ReorderPolicy,
        at: DateTime<Utc>,
    },
    MarkHydrated,
}

impl Action {
    /// Short name used in log output.
    ///
    pub fn name(&self) -> &'static str {
        match self {
            Action::CreateForm { .. } => "create_form",
            Action::UpdateForm { .. } => "update_form",
            Action::DeleteForm { .. } => "delete_form",
            Action::SetCurrentForm { .. } => "set_current_form",
            Action::AddField { .. } => "add_field",
            Action::UpdateField { .. } => "update_field",
            Action::DeleteField { .. } => "delete_field",
            Action::ReorderFields { .. } => "reorder_fields",
            Action::MarkHydrated => "mark_hydrated",
        }
    }
}
