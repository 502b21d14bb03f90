use super::reorder::reorder;
use super::Action;
use crate::model::Form;
use std::collections::BTreeMap;

/// Houses every form plus the pointer to the one being edited.
///
/// The current form is kept as an id and resolved by lookup, so it can not
/// drift away from the entry in `forms`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreState {
    forms: BTreeMap<String, Form>,
    current_form_id: Option<String>,
    hydrated: bool,
}

impl StoreState {
    pub fn new() -> StoreState {
        StoreState::default()
    }

    /// Assemble a state from its parts. A current id without a matching form
    /// is dropped.
    ///
    pub fn from_parts(
        forms: BTreeMap<String, Form>,
        current_form_id: Option<String>,
        hydrated: bool,
    ) -> StoreState {
        let current_form_id = current_form_id.filter(|id| forms.contains_key(id));
        StoreState {
            forms,
            current_form_id,
            hydrated,
        }
    }

    pub fn forms(&self) -> &BTreeMap<String, Form> {
        &self.forms
    }

    pub fn form(&self, id: &str) -> Option<&Form> {
        self.forms.get(id)
    }

    pub fn contains_form(&self, id: &str) -> bool {
        self.forms.contains_key(id)
    }

    pub fn current_form_id(&self) -> Option<&str> {
        self.current_form_id.as_deref()
    }

    pub fn current_form(&self) -> Option<&Form> {
        self.current_form_id
            .as_deref()
            .and_then(|id| self.forms.get(id))
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Return the state that results from applying `action`.
    ///
    pub fn reduce(mut self, action: Action) -> StoreState {
        self.apply(action);
        self
    }

    fn current_form_mut(&mut self) -> Option<&mut Form> {
        let id = self.current_form_id.as_deref()?;
        self.forms.get_mut(id)
    }

    /// Apply `action` in place, returning whether anything changed. Actions
    /// aimed at unknown forms or fields, or needing a current form when there
    /// is none, change nothing.
    ///
    pub(crate) fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::CreateForm {
                id,
                title,
                description,
                at,
            } => {
                if self.forms.contains_key(&id) {
                    return false;
                }
                self.forms
                    .insert(id.clone(), Form::new(id.clone(), title, description, at));
                self.current_form_id = Some(id);
                true
            }
            Action::UpdateForm { id, patch, at } => match self.forms.get_mut(&id) {
                Some(form) => {
                    form.apply(patch);
                    form.touch(at);
                    true
                }
                None => false,
            },
            Action::DeleteForm { id } => {
                if self.forms.remove(&id).is_none() {
                    return false;
                }
                if self.current_form_id.as_deref() == Some(id.as_str()) {
                    self.current_form_id = None;
                }
                true
            }
            Action::SetCurrentForm { id } => {
                let next = id.filter(|id| self.forms.contains_key(id));
                let changed = next != self.current_form_id;
                self.current_form_id = next;
                changed
            }
            Action::AddField { field, at } => match self.current_form_mut() {
                Some(form) if !form.has_field(&field.id) => {
                    form.fields.push(field);
                    form.touch(at);
                    true
                }
                _ => false,
            },
            Action::UpdateField {
                field_id,
                patch,
                at,
            } => {
                let form = match self.current_form_mut() {
                    Some(form) => form,
                    None => return false,
                };
                match form.field_mut(&field_id) {
                    Some(field) => field.apply(patch),
                    None => return false,
                }
                form.touch(at);
                true
            }
            Action::DeleteField { field_id, at } => {
                let form = match self.current_form_mut() {
                    Some(form) => form,
                    None => return false,
                };
                let before = form.fields.len();
                form.fields.retain(|field| field.id != field_id);
                if form.fields.len() == before {
                    return false;
                }
                form.touch(at);
                true
            }
            Action::ReorderFields { order, policy, at } => {
                let form = match self.current_form_mut() {
                    Some(form) => form,
                    None => return false,
                };
                let fields = std::mem::take(&mut form.fields);
                form.fields = reorder(fields, &order, policy);
                form.touch(at);
                true
            }
            Action::MarkHydrated => {
                let changed = !self.hydrated;
                self.hydrated = true;
                changed
            }
        }
    }
}
