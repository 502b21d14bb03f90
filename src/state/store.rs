use super::ids::{self, FIELD_ID_LEN, FORM_ID_LEN};
use super::{Action, Clock, ReorderPolicy, StateError, StoreState, Subscriber, SystemClock};
use crate::model::{Field, FieldPatch, Form, FormPatch, NewField};
use log::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{BTreeMap, HashSet};

/// Oversees the store state: generates ids, reads the clock, turns each
/// operation into an `Action`, and notifies subscribers after every
/// transition that changed the state.
///
pub struct Store {
    state: StoreState,
    rng: StdRng,
    clock: Box<dyn Clock>,
    reorder_policy: ReorderPolicy,
    subscribers: Vec<Box<dyn Subscriber>>,
}

impl Default for Store {
    fn default() -> Store {
        Store::new(StoreState::default())
    }
}

impl Store {
    /// Return a store over the given state, using the wall clock and an
    /// entropy-seeded id generator.
    ///
    pub fn new(state: StoreState) -> Store {
        Store {
            state,
            rng: StdRng::from_entropy(),
            clock: Box::new(SystemClock),
            reorder_policy: ReorderPolicy::default(),
            subscribers: vec![],
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Store {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Store {
        self.rng = rng;
        self
    }

    pub fn with_reorder_policy(mut self, policy: ReorderPolicy) -> Store {
        self.reorder_policy = policy;
        self
    }

    /// Register a listener for state changes.
    ///
    pub fn subscribe(&mut self, subscriber: impl Subscriber + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn forms(&self) -> &BTreeMap<String, Form> {
        self.state.forms()
    }

    pub fn form(&self, id: &str) -> Option<&Form> {
        self.state.form(id)
    }

    pub fn current_form(&self) -> Option<&Form> {
        self.state.current_form()
    }

    pub fn is_hydrated(&self) -> bool {
        self.state.is_hydrated()
    }

    pub fn reorder_policy(&self) -> ReorderPolicy {
        self.reorder_policy
    }

    /// Apply an action and notify subscribers if the state changed. Returns
    /// whether it did.
    ///
    pub fn dispatch(&mut self, action: Action) -> bool {
        let name = action.name();
        let changed = self.state.apply(action);
        if changed {
            trace!("Applied '{}', notifying {} subscriber(s)", name, self.subscribers.len());
            for subscriber in self.subscribers.iter_mut() {
                subscriber.notify(&self.state);
            }
        } else {
            debug!("Action '{}' left the state unchanged", name);
        }
        changed
    }

    /// Create a form with no fields, make it current, and return its id.
    ///
    pub fn create_form(&mut self, title: impl Into<String>, description: impl Into<String>) -> String {
        let forms = self.state.forms();
        let id = ids::generate_unique(&mut self.rng, FORM_ID_LEN, |id| forms.contains_key(id));
        let at = self.clock.now();
        self.dispatch(Action::CreateForm {
            id: id.clone(),
            title: title.into(),
            description: description.into(),
            at,
        });
        info!("Created form {}", id);
        id
    }

    /// Merge `patch` into the form with the given id. Unknown ids are
    /// ignored. A replacement field list is normalized and must not repeat a
    /// field id.
    ///
    pub fn update_form(&mut self, id: &str, patch: FormPatch) -> Result<(), StateError> {
        if !self.state.contains_form(id) {
            debug!("Ignoring update of unknown form {}", id);
            return Ok(());
        }
        let FormPatch {
            title,
            description,
            fields,
        } = patch;
        let fields = match fields {
            Some(fields) => Some(validate_fields(fields)?),
            None => None,
        };
        let at = self.clock.now();
        self.dispatch(Action::UpdateForm {
            id: id.to_string(),
            patch: FormPatch {
                title,
                description,
                fields,
            },
            at,
        });
        Ok(())
    }

    pub fn delete_form(&mut self, id: &str) {
        if self.dispatch(Action::DeleteForm { id: id.to_string() }) {
            info!("Deleted form {}", id);
        }
    }

    /// Point the store at a form. An unknown id clears the pointer.
    ///
    pub fn set_current_form(&mut self, id: Option<&str>) {
        let exists = id.map_or(true, |id| self.state.contains_form(id));
        if !exists {
            warn!("Form {} does not exist, clearing current form", id.unwrap_or_default());
        }
        self.dispatch(Action::SetCurrentForm {
            id: id.map(str::to_string),
        });
    }

    pub fn set_hydrated(&mut self) {
        self.dispatch(Action::MarkHydrated);
    }

    /// Append a field to the current form and return its new id, or `None`
    /// when there is no current form.
    ///
    pub fn add_field(&mut self, field: NewField) -> Result<Option<String>, StateError> {
        let form = match self.state.current_form() {
            Some(form) => form,
            None => {
                debug!("Ignoring new field without a current form");
                return Ok(None);
            }
        };
        let field_id = ids::generate_unique(&mut self.rng, FIELD_ID_LEN, |id| form.has_field(id));
        let field = field.with_id(field_id.clone()).normalized()?;
        let at = self.clock.now();
        self.dispatch(Action::AddField { field, at });
        Ok(Some(field_id))
    }

    /// Merge `patch` into a field of the current form. Missing form or field
    /// is ignored; a merge that leaves a choice field without options is
    /// rejected and changes nothing.
    ///
    pub fn update_field(&mut self, field_id: &str, patch: FieldPatch) -> Result<(), StateError> {
        let field = match self.state.current_form().and_then(|form| form.field(field_id)) {
            Some(field) => field,
            None => {
                debug!("Ignoring update of unknown field {}", field_id);
                return Ok(());
            }
        };
        let merged = field.merged(&patch).normalized()?;
        let patch = FieldPatch {
            options: Some(merged.options),
            ..patch
        };
        let at = self.clock.now();
        self.dispatch(Action::UpdateField {
            field_id: field_id.to_string(),
            patch,
            at,
        });
        Ok(())
    }

    pub fn delete_field(&mut self, field_id: &str) {
        let at = self.clock.now();
        self.dispatch(Action::DeleteField {
            field_id: field_id.to_string(),
            at,
        });
    }

    /// Rewrite the current form's field order. Fields left out of
    /// `new_order` are dropped or kept according to the reorder policy.
    ///
    pub fn reorder_fields<I, S>(&mut self, new_order: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let at = self.clock.now();
        self.dispatch(Action::ReorderFields {
            order: new_order.into_iter().map(Into::into).collect(),
            policy: self.reorder_policy,
            at,
        });
    }
}

fn validate_fields(fields: Vec<Field>) -> Result<Vec<Field>, StateError> {
    let mut seen = HashSet::new();
    fields
        .into_iter()
        .map(|field| {
            if !seen.insert(field.id.clone()) {
                return Err(StateError::DuplicateFieldId { field_id: field.id });
            }
            Ok(field.normalized()?)
        })
        .collect()
}
