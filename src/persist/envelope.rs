//! Persisted store layout.
//!
//! The store is kept under a single key as
//! `{ "state": { "forms", "currentForm", "hydrated" }, "version" }`, where
//! `currentForm` is a copy of the current form or `null`. Only its id is read
//! back. A bare `currentFormId` is accepted as well.
//!
//! Loaded forms are repaired before use: each form is keyed by its own id,
//! field ids are unique within a form, choice fields keep at least one option,
//! and `updatedAt` never precedes `createdAt`.

use super::StorageError;
use crate::model::Form;
use crate::state::StoreState;
use log::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const STORE_KEY: &str = "form-builder-store";
pub const ENVELOPE_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: StateRef<'a>,
    version: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StateRef<'a> {
    forms: &'a BTreeMap<String, Form>,
    current_form: Option<&'a Form>,
    hydrated: bool,
}

#[derive(Deserialize)]
struct WireEnvelope {
    #[serde(default)]
    state: Option<WireState>,
    #[serde(default)]
    version: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireState {
    #[serde(default)]
    forms: BTreeMap<String, Form>,
    #[serde(default)]
    current_form_id: Option<String>,
    #[serde(default)]
    current_form: Option<CurrentFormRef>,
    #[serde(default, alias = "isHydrated")]
    hydrated: bool,
}

#[derive(Deserialize)]
struct CurrentFormRef {
    id: String,
}

impl From<WireState> for StoreState {
    fn from(wire: WireState) -> StoreState {
        let current_form_id = wire
            .current_form_id
            .or_else(|| wire.current_form.map(|form| form.id));
        StoreState::from_parts(repair_forms(wire.forms), current_form_id, wire.hydrated)
    }
}

/// Key every form by its own id, keeping the first form seen for each id.
///
fn repair_forms(forms: BTreeMap<String, Form>) -> BTreeMap<String, Form> {
    let mut repaired = BTreeMap::new();
    for (key, mut form) in forms {
        if form.id.is_empty() {
            warn!("Form stored under '{}' has no id, using the key", key);
            form.id = key.clone();
        } else if form.id != key {
            warn!("Form stored under '{}' has id '{}', re-keying", key, form.id);
        }
        if repaired.contains_key(&form.id) {
            warn!("Dropping form stored under '{}': id '{}' already loaded", key, form.id);
            continue;
        }
        repair_form(&mut form);
        repaired.insert(form.id.clone(), form);
    }
    repaired
}

fn repair_form(form: &mut Form) {
    let mut seen = HashSet::new();
    let fields = std::mem::take(&mut form.fields);
    for field in fields {
        if !seen.insert(field.id.clone()) {
            warn!("Dropping repeated field '{}' of form '{}'", field.id, form.id);
            continue;
        }
        match field.normalized() {
            Ok(field) => form.fields.push(field),
            Err(e) => warn!("Dropping invalid field of form '{}': {}", form.id, e),
        }
    }
    if form.updated_at < form.created_at {
        warn!("Form '{}' was updated before it was created, clamping", form.id);
        form.updated_at = form.created_at;
    }
}

/// Serialize the state into the persisted envelope.
///
pub fn encode(state: &StoreState) -> Result<String, StorageError> {
    serde_json::to_string(&EnvelopeRef {
        state: StateRef {
            forms: state.forms(),
            current_form: state.current_form(),
            hydrated: state.is_hydrated(),
        },
        version: ENVELOPE_VERSION,
    })
    .map_err(|e| StorageError::SerializationFailed(e.to_string()))
}

/// Rebuild the state from a persisted envelope. An envelope without a
/// `state` member decodes to the empty state.
///
pub fn decode(raw: &str) -> Result<StoreState, StorageError> {
    let envelope: WireEnvelope = serde_json::from_str(raw)
        .map_err(|e| StorageError::DeserializationFailed(e.to_string()))?;
    if envelope.version > ENVELOPE_VERSION {
        warn!(
            "Persisted store has version {}, newer than {}; reading what is understood",
            envelope.version, ENVELOPE_VERSION
        );
    }
    Ok(envelope.state.map(StoreState::from).unwrap_or_default())
}
